pub mod auth;
pub mod checkout;
pub mod locations;
pub mod shipping;
