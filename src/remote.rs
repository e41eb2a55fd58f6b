//! Client for an Open Food Facts style product search.

use crate::errors::TrackerError;
use crate::models::FoodRecord;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

const PAGE_SIZE: &str = "10";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    nutriments: Nutriments,
}

#[derive(Debug, Default, Deserialize)]
struct Nutriments {
    #[serde(rename = "energy-kcal_100g", default)]
    energy_kcal_100g: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct RemoteFoodSearch {
    client: Client,
    search_url: String,
}

impl RemoteFoodSearch {
    pub fn new(search_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            search_url: search_url.into(),
        })
    }

    /// Queries the endpoint once. Failures are reported, never retried.
    pub async fn search(&self, query: &str) -> Result<FoodRecord, TrackerError> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[
                ("search_terms", query),
                ("search_simple", "1"),
                ("json", "1"),
                ("page_size", PAGE_SIZE),
            ])
            .send()
            .await
            .map_err(|err| {
                warn!(query, "food search request failed: {err}");
                TrackerError::Network(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(query, %status, "food search returned an error status");
            return Err(TrackerError::Network(format!(
                "food search returned status {status}"
            )));
        }

        let body: SearchResponse = response.json().await.map_err(|err| {
            warn!(query, "food search response could not be decoded: {err}");
            TrackerError::Network(err.to_string())
        })?;

        let record = pick_product(query, body)?;
        info!(query, food = %record.canonical_name, "resolved from remote search");
        Ok(record)
    }
}

fn pick_product(query: &str, body: SearchResponse) -> Result<FoodRecord, TrackerError> {
    if body.products.is_empty() {
        return Err(TrackerError::FoodNotFound(format!(
            "the food search returned no products for \"{query}\""
        )));
    }

    body.products
        .into_iter()
        .find_map(|product| {
            let calories = product
                .nutriments
                .energy_kcal_100g
                .filter(|kcal| kcal.is_finite() && *kcal > 0.0)?;
            let canonical_name = product
                .product_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| query.to_string());
            Some(FoodRecord {
                canonical_name,
                calories_per_100g: calories,
                image_url: product.image_url.filter(|url| !url.is_empty()),
            })
        })
        .ok_or_else(|| {
            TrackerError::FoodNotFound(format!(
                "no product for \"{query}\" lists calories per 100g"
            ))
        })
}
