pub mod audit;
pub mod checkout;
pub mod config;
pub mod coupons;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod i18n;
pub mod locations;
pub mod middleware;
pub mod models;
pub mod money;
pub mod response;
pub mod routes;
pub mod services;
pub mod shipping;
pub mod state;
pub mod store;
