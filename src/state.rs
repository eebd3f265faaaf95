use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn},
    services::booking_service::BookingService,
    store::SeaOrmStore,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub booking: BookingService<SeaOrmStore>,
}

impl AppState {
    pub fn new(pool: DbPool, orm: OrmConn, config: &AppConfig) -> Self {
        let booking = BookingService::new(SeaOrmStore::new(orm.clone()), config.shop.clone());
        Self { pool, orm, booking }
    }
}
