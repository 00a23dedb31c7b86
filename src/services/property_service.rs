use std::collections::BTreeSet;
use std::sync::Arc;

use crate::db::repository::PropertyRepository;
use crate::error::BookingError;
use crate::models::account::Permission;
use crate::models::checkout::FieldErrors;
use crate::models::property::{Property, PropertyDraft, PropertyListing, Review};
use crate::models::search::{PropertyFilter, ReviewQuery, ReviewSort, SearchQuery, SortOrder};
use crate::services::access_service::Capabilities;

pub struct PropertyService {
    repository: Arc<dyn PropertyRepository>,
}

impl PropertyService {
    pub fn new(repository: Arc<dyn PropertyRepository>) -> Self {
        Self { repository }
    }

    pub async fn get(&self, id: u32) -> Result<Property, BookingError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Property {}", id)))
    }

    pub async fn all(&self) -> Result<Vec<Property>, BookingError> {
        self.repository.list().await
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<PropertyListing>, BookingError> {
        let properties = self.repository.list().await?;
        Ok(search_properties(properties, query))
    }

    pub async fn reviews(&self, id: u32, query: &ReviewQuery) -> Result<Vec<Review>, BookingError> {
        let property = self.get(id).await?;
        Ok(filter_reviews(property.reviews, query))
    }

    /// Admin catalogue view, unpriced and in catalogue order
    pub async fn manage(&self, filter: &PropertyFilter) -> Result<Vec<Property>, BookingError> {
        let search = filter.search.as_deref().unwrap_or("");
        Ok(self
            .all()
            .await?
            .into_iter()
            .filter(|p| matches_location(p, search))
            .filter(|p| filter.property_type.map_or(true, |t| p.property_type == t))
            .collect())
    }

    pub async fn create(
        &self,
        caps: &Capabilities,
        draft: PropertyDraft,
    ) -> Result<Property, BookingError> {
        caps.require(Permission::PropertiesCreate)?;
        validate_draft(&draft)?;
        let property = self.repository.create(draft).await?;
        log::info!("Property {} created by {:?}", property.id, caps.user_id());
        Ok(property)
    }

    pub async fn update(
        &self,
        caps: &Capabilities,
        id: u32,
        draft: PropertyDraft,
    ) -> Result<Property, BookingError> {
        caps.require(Permission::PropertiesUpdate)?;
        validate_draft(&draft)?;
        let property = self
            .repository
            .update(id, draft)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Property {}", id)))?;
        log::info!("Property {} updated by {:?}", id, caps.user_id());
        Ok(property)
    }

    pub async fn delete(&self, caps: &Capabilities, id: u32) -> Result<(), BookingError> {
        caps.require(Permission::PropertiesDelete)?;
        if !self.repository.delete(id).await? {
            return Err(BookingError::NotFound(format!("Property {}", id)));
        }
        log::info!("Property {} deleted by {:?}", id, caps.user_id());
        Ok(())
    }
}

fn validate_draft(draft: &PropertyDraft) -> Result<(), BookingError> {
    let mut errors = FieldErrors::new();
    for (field, value, message) in [
        ("name", &draft.name, "Property name is required"),
        ("city", &draft.city, "City is required"),
        ("country", &draft.country, "Country is required"),
    ] {
        if value.trim().is_empty() {
            errors.insert(field.to_string(), message.to_string());
        }
    }

    let mut room_ids = BTreeSet::new();
    let bad_room = draft.rooms.iter().find_map(|room| {
        if !room_ids.insert(room.id) {
            Some(format!("Duplicate room id {}", room.id))
        } else if room.price_per_night.is_sign_negative() {
            Some(format!("Room {} has a negative price", room.id))
        } else if room.max_guests == 0 {
            Some(format!("Room {} must admit at least one guest", room.id))
        } else {
            None
        }
    });
    if let Some(message) = bad_room {
        errors.insert("rooms".to_string(), message);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(BookingError::Validation(errors))
    }
}

/// Keeps the requested star values, then sorts. Ties fall back to newest first.
pub fn filter_reviews(mut reviews: Vec<Review>, query: &ReviewQuery) -> Vec<Review> {
    let ratings = query.rating_list();
    if !ratings.is_empty() {
        reviews.retain(|r| ratings.contains(&r.rating));
    }

    let newest = |a: &Review, b: &Review| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id));
    match query.sort {
        ReviewSort::Newest => reviews.sort_by(newest),
        ReviewSort::Oldest => reviews.sort_by(|a, b| newest(b, a)),
        ReviewSort::Highest => reviews.sort_by(|a, b| b.rating.cmp(&a.rating).then(newest(a, b))),
        ReviewSort::Lowest => reviews.sort_by(|a, b| a.rating.cmp(&b.rating).then(newest(a, b))),
    }
    reviews
}

fn matches_location(property: &Property, location: &str) -> bool {
    let needle = location.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [&property.city, &property.country, &property.name]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Filter then sort. `Recommended` keeps catalogue order.
pub fn search_properties(properties: Vec<Property>, query: &SearchQuery) -> Vec<PropertyListing> {
    let (min_price, max_price) = query.price_range();
    let min_rating = query.min_rating.unwrap_or(0.0);
    let amenities = query.amenity_list();

    let mut listings: Vec<PropertyListing> = properties
        .iter()
        .filter(|p| {
            query
                .location
                .as_deref()
                .map_or(true, |loc| matches_location(p, loc))
        })
        .filter(|p| query.property_type.map_or(true, |t| p.property_type == t))
        .filter(|p| amenities.iter().all(|a| p.has_amenity(a)))
        .filter(|p| {
            query
                .guests
                .map_or(true, |g| p.rooms.iter().any(|r| r.max_guests >= g))
        })
        .map(Property::listing)
        .filter(|l| l.min_price >= min_price && l.min_price <= max_price)
        .filter(|l| l.avg_rating >= min_rating)
        .collect();

    match query.sort {
        SortOrder::Recommended => {}
        SortOrder::PriceLow => listings.sort_by(|a, b| a.min_price.cmp(&b.min_price)),
        SortOrder::PriceHigh => listings.sort_by(|a, b| b.min_price.cmp(&a.min_price)),
        SortOrder::Rating => listings.sort_by(|a, b| b.avg_rating.total_cmp(&a.avg_rating)),
    }
    listings
}
