use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::bookings::RoomRate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Hotel,
    Resort,
    Apartment,
    Guesthouse,
    Lodge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: u32,
    pub name: String,
    pub price_per_night: Decimal,
    pub max_guests: u32,
    pub amenities: Vec<String>,
}

impl Room {
    pub fn rate(&self) -> RoomRate {
        RoomRate {
            price_per_night: self.price_per_night,
            max_guests: self.max_guests,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: u32,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: u32,
    pub name: String,
    pub city: String,
    pub country: String,
    pub address: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub description: String,
    pub images: Vec<String>,
    pub amenities: Vec<String>,
    pub rooms: Vec<Room>,
    pub reviews: Vec<Review>,
}

impl Property {
    pub fn room(&self, room_id: u32) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == room_id)
    }

    /// Mean review rating rounded to one decimal, 0 without reviews
    pub fn avg_rating(&self) -> f64 {
        if self.reviews.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.reviews.iter().map(|r| r.rating as u32).sum();
        let avg = sum as f64 / self.reviews.len() as f64;
        (avg * 10.0).round() / 10.0
    }

    /// Cheapest nightly rate across rooms, 0 without rooms
    pub fn min_price(&self) -> Decimal {
        self.rooms
            .iter()
            .map(|room| room.price_per_night)
            .min()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn has_amenity(&self, amenity: &str) -> bool {
        self.amenities
            .iter()
            .any(|a| a.eq_ignore_ascii_case(amenity))
    }

    pub fn listing(&self) -> PropertyListing {
        PropertyListing {
            avg_rating: self.avg_rating(),
            min_price: self.min_price(),
            review_count: self.reviews.len(),
            property: self.clone(),
        }
    }
}

/// The admin-editable part of a property. Reviews stay with the stored property.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PropertyDraft {
    pub name: String,
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub address: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl PropertyDraft {
    pub fn into_property(self, id: u32, reviews: Vec<Review>) -> Property {
        Property {
            id,
            name: self.name.trim().to_string(),
            city: self.city.trim().to_string(),
            country: self.country.trim().to_string(),
            address: self.address,
            property_type: self.property_type,
            description: self.description,
            images: self.images,
            amenities: self.amenities,
            rooms: self.rooms,
            reviews,
        }
    }
}

/// A property as it appears in search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyListing {
    #[serde(flatten)]
    pub property: Property,
    pub avg_rating: f64,
    pub min_price: Decimal,
    pub review_count: usize,
}
