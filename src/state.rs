use crate::{
    db::DbPool, locations::LocationDirectory, services::checkout_service::CheckoutService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub checkout: CheckoutService,
    pub locations: LocationDirectory,
}
