use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::property::PropertyType;

fn csv(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Recommended,
    PriceLow,
    PriceHigh,
    Rating,
}

/// Search parameters as they arrive on the query string.
/// `amenities` is a comma separated list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub location: Option<String>,
    pub guests: Option<u32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_rating: Option<f64>,
    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,
    pub amenities: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
}

impl SearchQuery {
    pub const DEFAULT_MIN_PRICE: Decimal = Decimal::ZERO;
    pub const DEFAULT_MAX_PRICE: Decimal = Decimal::ONE_THOUSAND;

    pub fn price_range(&self) -> (Decimal, Decimal) {
        (
            self.min_price.unwrap_or(Self::DEFAULT_MIN_PRICE),
            self.max_price.unwrap_or(Self::DEFAULT_MAX_PRICE),
        )
    }

    pub fn amenity_list(&self) -> Vec<String> {
        csv(self.amenities.as_deref()).map(String::from).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSort {
    #[default]
    Newest,
    Oldest,
    Highest,
    Lowest,
}

/// `ratings` is a comma separated list of star values to keep; empty keeps all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewQuery {
    pub ratings: Option<String>,
    #[serde(default)]
    pub sort: ReviewSort,
}

impl ReviewQuery {
    /// Values outside 1..=5 or that do not parse are ignored
    pub fn rating_list(&self) -> Vec<u8> {
        csv(self.ratings.as_deref())
            .filter_map(|s| s.parse::<u8>().ok())
            .filter(|r| (1..=5).contains(r))
            .collect()
    }
}

/// Admin catalogue filter: `search` over name, city and country.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyFilter {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,
}

/// Admin user directory filter: `search` over name and email.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<String>,
}
