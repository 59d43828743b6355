use crate::config::{VerychicConfig, VERYCHIC_HEADERS};
use crate::fetcher::OfferSource;
use crate::models::{Category, HotelListing, VerychicOffer, NOT_AVAILABLE};
use crate::parser;
use crate::utils;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::{debug, info};

pub struct VerychicSource {
    client: Client,
    config: VerychicConfig,
}

impl VerychicSource {
    pub fn new(config: VerychicConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in VERYCHIC_HEADERS {
            headers.insert(
                HeaderName::from_bytes(name.as_bytes()).context(format!("Invalid header name: {}", name))?,
                HeaderValue::from_str(value).context(format!("Invalid value for header {}", name))?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, config })
    }

    /// Single request against the products endpoint. Any non-2xx status is an
    /// error.
    pub fn fetch_products(&self) -> Result<Value> {
        info!("Fetching products from {}", self.config.endpoint);
        debug!("Query parameters: {:?}", self.config.params);

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&self.config.params)
            .send()
            .context("Failed to reach the products endpoint")?
            .error_for_status()
            .context("Products endpoint returned an error status")?;

        response.json().context("Failed to decode products response")
    }
}

impl OfferSource for VerychicSource {
    type Offer = VerychicOffer;

    fn name(&self) -> &str {
        "Verychic"
    }

    fn dataset(&self) -> &str {
        "verychic"
    }

    fn fetch_offers(&self) -> Result<Vec<VerychicOffer>> {
        let data = self.fetch_products()?;
        let listings = extract_listings(&data, Local::now().date_naive())?;

        if let Some(path) = &self.config.raw_json {
            utils::save_json(&listings, path)?;
        }

        Ok(process_listings(&listings))
    }
}

fn text_field(product: &Value, key: &str) -> String {
    product
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

fn number_field(product: &Value, key: &str) -> f64 {
    product.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

/// Pulls the fields we keep out of every product of the response. Missing
/// fields fall back to `N/A` or `0.0`; only a response without a `content`
/// list is an error.
pub fn extract_listings(data: &Value, retrieval_date: NaiveDate) -> Result<Vec<HotelListing>> {
    let products = data
        .get("content")
        .and_then(Value::as_array)
        .context("Products response has no 'content' list")?;

    let retrieval_date = retrieval_date.format("%Y-%m-%d").to_string();

    Ok(products
        .iter()
        .map(|product| HotelListing {
            name: text_field(product, "name"),
            destination_name: text_field(product, "destinationName"),
            normalized_price: number_field(product, "normalizedPrice"),
            discount: number_field(product, "discount"),
            offer_start_date: text_field(product, "offerStartDate"),
            offer_end_date: text_field(product, "offerEndDate"),
            retrieval_date: retrieval_date.clone(),
        })
        .collect())
}

pub fn process_listing(listing: &HotelListing) -> VerychicOffer {
    let (city, country) = parser::split_destination(&listing.destination_name);

    VerychicOffer {
        hotel_name: listing.name.clone(),
        city,
        country,
        category: Category::from_hotel_name(&listing.name),
        price: listing.normalized_price,
        discount: listing.discount,
        start_date: parser::transform_api_date(&listing.offer_start_date),
        end_date: parser::transform_api_date(&listing.offer_end_date),
        last_minute: parser::is_last_minute(&listing.name),
    }
}

pub fn process_listings(listings: &[HotelListing]) -> Vec<VerychicOffer> {
    listings.iter().map(process_listing).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn retrieval_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 14).unwrap()
    }

    fn sample_response() -> Value {
        json!({
            "content": [
                {
                    "name": "Dernière minute - Le Negresco *****",
                    "destinationName": "Nice, France",
                    "normalizedPrice": 289.0,
                    "discount": 42,
                    "offerStartDate": "2025-02-10T09:00+0100",
                    "offerEndDate": "2025-02-20T23:59+0100",
                    "opinions": []
                },
                {
                    "name": "Riad Dar Anika ****",
                    "destinationName": "Maroc",
                    "offerStartDate": "soon"
                },
                {}
            ],
            "totalElements": 3
        })
    }

    #[test]
    fn listings_fall_back_to_placeholders() {
        let listings = extract_listings(&sample_response(), retrieval_day()).unwrap();

        assert_eq!(listings.len(), 3);
        assert_eq!(listings[0].discount, 42.0);
        assert_eq!(listings[0].retrieval_date, "2025-02-14");
        assert_eq!(listings[1].normalized_price, 0.0);
        assert_eq!(listings[1].offer_end_date, NOT_AVAILABLE);
        assert_eq!(listings[2].name, NOT_AVAILABLE);
        assert_eq!(listings[2].destination_name, NOT_AVAILABLE);
    }

    #[test]
    fn response_without_content_is_an_error() {
        assert!(extract_listings(&json!({ "error": "maintenance" }), retrieval_day()).is_err());
    }

    #[test]
    fn listings_are_reshaped_into_offers() {
        let listings = extract_listings(&sample_response(), retrieval_day()).unwrap();
        let offers = process_listings(&listings);

        assert_eq!(
            offers[0],
            VerychicOffer {
                hotel_name: "Dernière minute - Le Negresco *****".to_string(),
                city: "Nice".to_string(),
                country: "France".to_string(),
                category: Category::FiveStar,
                price: 289.0,
                discount: 42.0,
                start_date: "2025-02-10 09:00:00.000000".to_string(),
                end_date: "2025-02-20 23:59:00.000000".to_string(),
                last_minute: true,
            }
        );

        assert_eq!(offers[1].city, "");
        assert_eq!(offers[1].country, "Maroc");
        assert_eq!(offers[1].category, Category::FourStar);
        assert_eq!(offers[1].start_date, NOT_AVAILABLE);
        assert!(!offers[1].last_minute);

        assert_eq!(offers[2].category, Category::Other);
        assert_eq!(offers[2].country, NOT_AVAILABLE);
    }

    #[test]
    fn raw_listings_serialize_with_api_field_names() {
        let listings = extract_listings(&sample_response(), retrieval_day()).unwrap();
        let value = serde_json::to_value(&listings[0]).unwrap();

        assert_eq!(value["destinationName"], "Nice, France");
        assert_eq!(value["retrievalDate"], "2025-02-14");
    }

    #[test]
    fn client_builds_with_fixed_headers() {
        assert!(VerychicSource::new(VerychicConfig::default()).is_ok());
    }
}
