//! Country and city lookups for the address form.
//!
//! The upstream service is slow to change, so [`LocationDirectory`] keeps
//! results in a `moka` cache: the country list under one entry and one entry
//! per country for its cities.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Country {
    pub code: String,
    pub name_en: String,
    pub name_ar: String,
}

#[derive(Debug, Clone, Error)]
pub enum LocationError {
    #[error("location service request failed: {0}")]
    Http(Arc<reqwest::Error>),

    #[error("location service responded with status {0}")]
    Status(reqwest::StatusCode),

    #[error("unknown country code {0}")]
    UnknownCountry(String),
}

impl From<reqwest::Error> for LocationError {
    fn from(err: reqwest::Error) -> Self {
        LocationError::Http(Arc::new(err))
    }
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn countries(&self) -> Result<Vec<Country>, LocationError>;
    async fn cities(&self, country_code: &str) -> Result<Vec<String>, LocationError>;
}

pub struct HttpLocations {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLocations {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LocationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl LocationProvider for HttpLocations {
    async fn countries(&self) -> Result<Vec<Country>, LocationError> {
        let response = self
            .client
            .get(format!("{}/countries", self.base_url))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(LocationError::Status(response.status()));
        }
        Ok(response.json().await?)
    }

    async fn cities(&self, country_code: &str) -> Result<Vec<String>, LocationError> {
        let response = self
            .client
            .get(format!("{}/countries/{}/cities", self.base_url, country_code))
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LocationError::UnknownCountry(country_code.to_string()));
        }
        if !response.status().is_success() {
            return Err(LocationError::Status(response.status()));
        }
        Ok(response.json().await?)
    }
}

#[derive(Clone)]
pub struct LocationDirectory {
    provider: Arc<dyn LocationProvider>,
    countries: Cache<(), Arc<Vec<Country>>>,
    cities: Cache<String, Arc<Vec<String>>>,
}

impl LocationDirectory {
    pub fn new(provider: Arc<dyn LocationProvider>, ttl: Duration) -> Self {
        Self {
            provider,
            countries: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
            cities: Cache::builder().max_capacity(300).time_to_live(ttl).build(),
        }
    }

    pub async fn countries(&self) -> Result<Arc<Vec<Country>>, LocationError> {
        let provider = self.provider.clone();
        self.countries
            .try_get_with((), async move { provider.countries().await.map(Arc::new) })
            .await
            .map_err(|err| (*err).clone())
    }

    pub async fn cities(&self, country_code: &str) -> Result<Arc<Vec<String>>, LocationError> {
        let code = country_code.trim().to_ascii_uppercase();
        if code.len() != 2 {
            return Err(LocationError::UnknownCountry(code));
        }
        let provider = self.provider.clone();
        let key = code.clone();
        self.cities
            .try_get_with(key, async move { provider.cities(&code).await.map(Arc::new) })
            .await
            .map_err(|err| (*err).clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct CountingProvider {
        city_calls: AtomicUsize,
    }

    #[async_trait]
    impl LocationProvider for CountingProvider {
        async fn countries(&self) -> Result<Vec<Country>, LocationError> {
            Ok(vec![Country {
                code: "OM".into(),
                name_en: "Oman".into(),
                name_ar: "عُمان".into(),
            }])
        }

        async fn cities(&self, country_code: &str) -> Result<Vec<String>, LocationError> {
            self.city_calls.fetch_add(1, Ordering::SeqCst);
            match country_code {
                "OM" => Ok(vec!["Muscat".into(), "Khasab".into()]),
                other => Err(LocationError::UnknownCountry(other.into())),
            }
        }
    }

    #[tokio::test]
    async fn cities_are_cached_per_country() {
        let provider = Arc::new(CountingProvider::default());
        let directory = LocationDirectory::new(provider.clone(), Duration::from_secs(60));

        let first = directory.cities("om").await.unwrap();
        let second = directory.cities("OM").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(provider.city_calls.load(Ordering::SeqCst), 1);

        assert!(matches!(
            directory.cities("XX").await,
            Err(LocationError::UnknownCountry(code)) if code == "XX"
        ));
        // failures are not cached
        let _ = directory.cities("XX").await;
        assert_eq!(provider.city_calls.load(Ordering::SeqCst), 3);
    }
}
