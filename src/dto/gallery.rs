use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppError, models::GalleryImage};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGalleryImageRequest {
    pub url: String,
    /// Caption shown under the picture and used as its alt text.
    pub alt: String,
}

impl CreateGalleryImageRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.url.trim().is_empty() || self.alt.trim().is_empty() {
            return Err(AppError::BadRequest("url and alt are required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GalleryList {
    pub items: Vec<GalleryImage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_and_caption_are_both_required() {
        let ok = CreateGalleryImageRequest {
            url: "https://cdn.example.com/fade.jpg".into(),
            alt: "Degradê".into(),
        };
        assert!(ok.validate().is_ok());
        let no_alt = CreateGalleryImageRequest { alt: " ".into(), ..ok };
        assert!(matches!(no_alt.validate(), Err(AppError::BadRequest(_))));
        let no_url = CreateGalleryImageRequest { url: String::new(), alt: "Barba".into() };
        assert!(no_url.validate().is_err());
    }
}
