pub mod appointment_service;
pub mod barber_service;
pub mod booking_service;
pub mod catalog_service;
pub mod gallery_service;
pub mod payment_service;
pub mod profile_service;
pub mod promotion_service;
