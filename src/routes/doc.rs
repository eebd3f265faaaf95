use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        appointments::{AppointmentList, CreateAppointmentRequest, OpenDays, SlotList},
        barbers::{BarberList, CreateBarberRequest, UpdateBarberRequest},
        catalog::{CreateServiceRequest, ServiceList, UpdateServiceRequest},
        gallery::{CreateGalleryImageRequest, GalleryList},
        payments::{FinancialSummary, MethodTotal, RecordPaymentRequest},
        profiles::CreateProfileRequest,
        promotions::{
            CouponList, CreateCouponRequest, CreatePlanRequest, PlanList, Promotions,
            UpdateCouponRequest, UpdatePlanRequest,
        },
    },
    middleware::auth::Role,
    models::{
        Appointment, AppointmentStatus, Barber, Coupon, CustomerProfile, GalleryImage, Payment,
        PaymentMethod, Plan, Service,
    },
    response::{ApiResponse, Meta},
    routes::{
        appointments, barbers, catalog, gallery, health, params, payments, profiles, promotions,
        schedule,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        schedule::open_days,
        schedule::available_slots,
        appointments::create_appointment,
        appointments::list_appointments,
        appointments::list_my_appointments,
        appointments::get_appointment,
        appointments::cancel_appointment,
        appointments::confirm_appointment,
        appointments::complete_appointment,
        catalog::list_services,
        catalog::list_all_services,
        catalog::create_service,
        catalog::update_service,
        catalog::deactivate_service,
        barbers::list_barbers,
        barbers::list_all_barbers,
        barbers::get_barber,
        barbers::create_barber,
        barbers::update_barber,
        barbers::deactivate_barber,
        profiles::create_profile,
        profiles::my_profile,
        payments::record_payment,
        payments::financial_summary,
        gallery::list_images,
        gallery::add_image,
        gallery::delete_image,
        promotions::list_promotions,
        promotions::list_coupons,
        promotions::create_coupon,
        promotions::update_coupon,
        promotions::deactivate_coupon,
        promotions::list_plans,
        promotions::create_plan,
        promotions::update_plan,
        promotions::deactivate_plan
    ),
    components(
        schemas(
            Role,
            Appointment,
            AppointmentStatus,
            Barber,
            CustomerProfile,
            Payment,
            PaymentMethod,
            Service,
            GalleryImage,
            Coupon,
            Plan,
            AppointmentList,
            CreateAppointmentRequest,
            OpenDays,
            SlotList,
            BarberList,
            CreateBarberRequest,
            UpdateBarberRequest,
            ServiceList,
            CreateServiceRequest,
            UpdateServiceRequest,
            RecordPaymentRequest,
            MethodTotal,
            FinancialSummary,
            CreateProfileRequest,
            CreateGalleryImageRequest,
            GalleryList,
            CreateCouponRequest,
            UpdateCouponRequest,
            CouponList,
            CreatePlanRequest,
            UpdatePlanRequest,
            PlanList,
            Promotions,
            params::Pagination,
            params::AppointmentListQuery,
            params::Period,
            Meta,
            ApiResponse<Appointment>,
            ApiResponse<AppointmentList>,
            ApiResponse<SlotList>,
            ApiResponse<FinancialSummary>,
            ApiResponse<Promotions>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Schedule", description = "Open days and free slots"),
        (name = "Appointments", description = "Booking and appointment lifecycle"),
        (name = "Services", description = "Service catalog"),
        (name = "Barbers", description = "Barber roster"),
        (name = "Profiles", description = "Customer profiles"),
        (name = "Payments", description = "Payments and revenue summary"),
        (name = "Gallery", description = "Shop picture gallery"),
        (name = "Promotions", description = "Discount coupons and membership plans"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
