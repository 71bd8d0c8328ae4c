use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::locations::{CityList, CountryList},
    error::AppResult,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/countries", get(list_countries))
        .route("/countries/{code}/cities", get(list_cities))
}

#[utoipa::path(
    get,
    path = "/api/locations/countries",
    responses(
        (status = 200, description = "Countries we ship to", body = ApiResponse<CountryList>),
        (status = 502, description = "Location service unavailable"),
    ),
    tag = "Locations"
)]
pub async fn list_countries(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CountryList>>> {
    let countries = state.locations.countries().await?;
    let meta = Meta::list(countries.len());
    let data = CountryList {
        items: countries.to_vec(),
    };
    Ok(Json(ApiResponse::success("OK", data, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/locations/countries/{code}/cities",
    params(
        ("code" = String, Path, description = "ISO 3166-1 alpha-2 country code")
    ),
    responses(
        (status = 200, description = "Cities in the country", body = ApiResponse<CityList>),
        (status = 404, description = "Unknown country code"),
        (status = 502, description = "Location service unavailable"),
    ),
    tag = "Locations"
)]
pub async fn list_cities(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<CityList>>> {
    let cities = state.locations.cities(&code).await?;
    let meta = Meta::list(cities.len());
    let data = CityList {
        country_code: code.trim().to_ascii_uppercase(),
        items: cities.to_vec(),
    };
    Ok(Json(ApiResponse::success("OK", data, Some(meta))))
}
