use std::{fmt, str::FromStr};

use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Staff,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    // Older accounts still carry the Portuguese role names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" | "cliente" => Ok(Role::Customer),
            "staff" | "operador" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            _ => Err(AppError::Unauthorized("Unknown role in token".into())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn is_staff(&self) -> bool {
        matches!(self.role, Role::Staff | Role::Admin)
    }
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    if user.role != Role::Admin {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Staff members and administrators.
pub fn ensure_staff(user: &AuthUser) -> Result<(), AppError> {
    if !user.is_staff() {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn decode_token(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    let user_id = Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;
    let role = decoded.claims.role.parse::<Role>()?;

    Ok(AuthUser { user_id, role })
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?
            .trim();

        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

        decode_token(token, &secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-secret";

    fn token_for(sub: &str, role: &str, secret: &str) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            role: role.to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn decodes_identity_and_role() {
        let user_id = Uuid::new_v4();
        let user = decode_token(&token_for(&user_id.to_string(), "staff", SECRET), SECRET).unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.role, Role::Staff);
        assert!(user.is_staff());
    }

    #[test]
    fn accepts_legacy_role_names() {
        assert_eq!("operador".parse::<Role>().unwrap(), Role::Staff);
        assert_eq!("cliente".parse::<Role>().unwrap(), Role::Customer);
        assert!("barber".parse::<Role>().is_err());
    }

    #[test]
    fn rejects_tokens_signed_with_another_secret() {
        let token = token_for(&Uuid::new_v4().to_string(), "admin", "other-secret");
        assert!(matches!(
            decode_token(&token, SECRET),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn role_guards() {
        let customer = AuthUser { user_id: Uuid::new_v4(), role: Role::Customer };
        let staff = AuthUser { user_id: Uuid::new_v4(), role: Role::Staff };
        let admin = AuthUser { user_id: Uuid::new_v4(), role: Role::Admin };

        assert!(ensure_staff(&customer).is_err());
        assert!(ensure_staff(&staff).is_ok());
        assert!(ensure_staff(&admin).is_ok());
        assert!(ensure_admin(&staff).is_err());
        assert!(ensure_admin(&admin).is_ok());
    }
}
