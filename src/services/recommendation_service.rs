use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use rand::seq::SliceRandom;
use tokio::sync::RwLock;

use crate::db::repository::PropertyRepository;
use crate::error::BookingError;
use crate::models::property::PropertyListing;
use crate::models::recommendation::{Recommendation, RecommendationKind, RecommendationReason};

pub const DEFAULT_LIMIT: usize = 6;

const TRENDING: RecommendationReason = RecommendationReason {
    kind: "trending",
    text: "Trending now",
};
const POPULAR: RecommendationReason = RecommendationReason {
    kind: "popular",
    text: "Popular choice",
};

pub struct RecommendationService {
    properties: Arc<dyn PropertyRepository>,
    saved: RwLock<HashMap<String, BTreeSet<u32>>>,
}

impl RecommendationService {
    pub fn new(properties: Arc<dyn PropertyRepository>) -> Self {
        Self {
            properties,
            saved: RwLock::new(HashMap::new()),
        }
    }

    /// Personalized and nearby lists are shuffled on every call.
    pub async fn recommend(
        &self,
        kind: RecommendationKind,
        limit: usize,
    ) -> Result<Vec<Recommendation>, BookingError> {
        let mut listings: Vec<PropertyListing> = self
            .properties
            .list()
            .await?
            .iter()
            .map(|p| p.listing())
            .collect();

        match kind {
            RecommendationKind::Personalized | RecommendationKind::Nearby => {
                listings.shuffle(&mut rand::thread_rng());
            }
            RecommendationKind::Popular => {
                listings.sort_by(|a, b| b.review_count.cmp(&a.review_count));
            }
            RecommendationKind::Trending => {}
        }

        let reason = match kind {
            RecommendationKind::Trending => TRENDING,
            _ => POPULAR,
        };

        Ok(listings
            .into_iter()
            .take(limit)
            .map(|property| Recommendation { property, reason })
            .collect())
    }

    pub async fn save(&self, user_id: &str, property_id: u32) -> Result<(), BookingError> {
        if self.properties.get(property_id).await?.is_none() {
            return Err(BookingError::NotFound(format!("Property {}", property_id)));
        }
        self.saved
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .insert(property_id);
        Ok(())
    }

    /// Returns false when the property was not saved
    pub async fn unsave(&self, user_id: &str, property_id: u32) -> bool {
        self.saved
            .write()
            .await
            .get_mut(user_id)
            .map(|ids| ids.remove(&property_id))
            .unwrap_or(false)
    }

    pub async fn saved(&self, user_id: &str) -> Vec<u32> {
        self.saved
            .read()
            .await
            .get(user_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }
}
