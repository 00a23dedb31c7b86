use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::property::PropertyListing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Trending,
    Personalized,
    Nearby,
    Popular,
}

impl FromStr for RecommendationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trending" => Ok(RecommendationKind::Trending),
            "personalized" => Ok(RecommendationKind::Personalized),
            "nearby" => Ok(RecommendationKind::Nearby),
            "popular" => Ok(RecommendationKind::Popular),
            other => Err(format!("Unknown recommendation list: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecommendationReason {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub property: PropertyListing,
    pub reason: RecommendationReason,
}
