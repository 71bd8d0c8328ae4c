use serde::Serialize;
use utoipa::ToSchema;

use crate::locations::Country;

#[derive(Debug, Serialize, ToSchema)]
pub struct CountryList {
    pub items: Vec<Country>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CityList {
    pub country_code: String,
    pub items: Vec<String>,
}
