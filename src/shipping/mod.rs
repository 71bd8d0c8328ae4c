pub mod carrier;
pub mod catalog;
pub mod rates;
pub mod weight;

pub use carrier::{CarrierClient, RateError, RateProvider, RateRequest};
pub use catalog::{ShippingMethod, ShippingMethodId, ShippingRules};
pub use rates::{RateKey, RateState, RateUnsupported};
