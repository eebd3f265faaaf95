pub mod appointments;
pub mod audit_logs;
pub mod barbers;
pub mod coupons;
pub mod gallery_images;
pub mod payments;
pub mod plans;
pub mod profiles;
pub mod services;

pub use appointments::Entity as Appointments;
pub use audit_logs::Entity as AuditLogs;
pub use barbers::Entity as Barbers;
pub use coupons::Entity as Coupons;
pub use gallery_images::Entity as GalleryImages;
pub use payments::Entity as Payments;
pub use plans::Entity as Plans;
pub use profiles::Entity as Profiles;
pub use services::Entity as Services;
