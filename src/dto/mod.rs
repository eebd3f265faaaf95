pub mod appointments;
pub mod auth;
pub mod barbers;
pub mod catalog;
pub mod gallery;
pub mod payments;
pub mod profiles;
pub mod promotions;
pub mod time_format;
