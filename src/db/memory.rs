use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::db::repository::{BookingRepository, PropertyRepository, UserRepository};
use crate::error::BookingError;
use crate::models::{
    account::{User, UserRole},
    bookings::{Booking, BookingRequest, BookingStatus},
    property::{Property, PropertyDraft},
};

pub struct InMemoryPropertyRepository {
    properties: RwLock<Vec<Property>>,
}

impl InMemoryPropertyRepository {
    pub fn new(properties: Vec<Property>) -> Self {
        Self {
            properties: RwLock::new(properties),
        }
    }
}

#[async_trait]
impl PropertyRepository for InMemoryPropertyRepository {
    async fn list(&self) -> Result<Vec<Property>, BookingError> {
        Ok(self.properties.read().await.clone())
    }

    async fn get(&self, id: u32) -> Result<Option<Property>, BookingError> {
        Ok(self.properties.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, draft: PropertyDraft) -> Result<Property, BookingError> {
        let mut properties = self.properties.write().await;
        let id = properties.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let property = draft.into_property(id, Vec::new());
        properties.push(property.clone());
        Ok(property)
    }

    async fn update(&self, id: u32, draft: PropertyDraft) -> Result<Option<Property>, BookingError> {
        let mut properties = self.properties.write().await;
        Ok(properties.iter_mut().find(|p| p.id == id).map(|property| {
            let reviews = std::mem::take(&mut property.reviews);
            *property = draft.into_property(id, reviews);
            property.clone()
        }))
    }

    async fn delete(&self, id: u32) -> Result<bool, BookingError> {
        let mut properties = self.properties.write().await;
        let before = properties.len();
        properties.retain(|p| p.id != id);
        Ok(properties.len() != before)
    }
}

#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<HashMap<String, Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut bookings: Vec<Booking>) -> Vec<Booking> {
    bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    bookings
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn create(&self, request: BookingRequest) -> Result<Booking, BookingError> {
        let booking = Booking::from_request(request, Utc::now());
        self.bookings
            .write()
            .await
            .insert(booking.id.clone(), booking.clone());
        Ok(booking)
    }

    async fn get(&self, id: &str) -> Result<Option<Booking>, BookingError> {
        Ok(self.bookings.read().await.get(id).cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Booking>, BookingError> {
        let bookings = self
            .bookings
            .read()
            .await
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(bookings))
    }

    async fn list_all(&self) -> Result<Vec<Booking>, BookingError> {
        let bookings = self.bookings.read().await.values().cloned().collect();
        Ok(newest_first(bookings))
    }

    async fn update_status(
        &self,
        id: &str,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> Result<Option<Booking>, BookingError> {
        let mut bookings = self.bookings.write().await;
        let current = bookings.get_mut(id).filter(|booking| booking.status == expected);
        Ok(current.map(|booking| {
            booking.status = status;
            booking.updated_at = Utc::now();
            booking.clone()
        }))
    }
}

pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, BookingError> {
        Ok(self.users.read().await.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<User>, BookingError> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn update_role(&self, id: &str, role: UserRole) -> Result<Option<User>, BookingError> {
        let mut users = self.users.write().await;
        Ok(users.iter_mut().find(|u| u.id == id).map(|user| {
            user.role = role;
            user.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed;
    use crate::models::bookings::{DateRange, GuestInfo, PaymentSummary, PriceBreakdown};
    use crate::models::property::PropertyType;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn booking_request(user_id: &str) -> BookingRequest {
        let price = PriceBreakdown {
            nights: 2,
            room_total: Decimal::from(318),
            service_fee: Decimal::from(25),
            taxes: Decimal::from(38),
            total: Decimal::from(381),
        };
        BookingRequest {
            user_id: user_id.to_string(),
            property_id: 3,
            property_name: "Mountain Lodge".to_string(),
            room_id: 5,
            dates: DateRange::new(
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
            ),
            guests: 1,
            guest_info: GuestInfo {
                first_name: "Sarah".to_string(),
                last_name: "Smith".to_string(),
                email: "sarah@example.com".to_string(),
                phone: "5550102030".to_string(),
                special_requests: None,
            },
            payment: PaymentSummary {
                last_four: "1881".to_string(),
                card_name: "Sarah Smith".to_string(),
            },
            price,
            total_amount: price.total,
        }
    }

    #[tokio::test]
    async fn test_property_lookup() {
        let repo = InMemoryPropertyRepository::new(seed::properties());
        assert_eq!(repo.get(1).await.unwrap().unwrap().name, "Grand Palace Hotel");
        assert!(repo.get(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_property_crud_keeps_reviews() {
        let repo = InMemoryPropertyRepository::new(seed::properties());
        let mut draft = PropertyDraft {
            name: " Harbour Inn ".to_string(),
            city: "Lisbon".to_string(),
            country: "Portugal".to_string(),
            address: String::new(),
            property_type: PropertyType::Guesthouse,
            description: String::new(),
            images: vec![],
            amenities: vec!["WiFi".to_string()],
            rooms: vec![],
        };

        let created = repo.create(draft.clone()).await.unwrap();
        assert_eq!(created.id, 4);
        assert_eq!(created.name, "Harbour Inn");

        draft.name = "Grand Palace Renovated".to_string();
        let updated = repo.update(1, draft.clone()).await.unwrap().unwrap();
        assert_eq!(updated.name, "Grand Palace Renovated");
        assert_eq!(updated.reviews.len(), 2);
        assert!(repo.update(99, draft).await.unwrap().is_none());

        assert!(repo.delete(4).await.unwrap());
        assert!(!repo.delete(4).await.unwrap());
        assert_eq!(repo.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_status_update_requires_expected_status() {
        let repo = InMemoryBookingRepository::new();
        let booking = repo
            .create(booking_request("u-1001"))
            .await
            .unwrap();

        assert!(repo
            .update_status(&booking.id, BookingStatus::Completed, BookingStatus::Cancelled)
            .await
            .unwrap()
            .is_none());
        let cancelled = repo
            .update_status(&booking.id, BookingStatus::Confirmed, BookingStatus::Cancelled)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert!(repo
            .update_status(&booking.id, BookingStatus::Confirmed, BookingStatus::Cancelled)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_user_role() {
        let repo = InMemoryUserRepository::new(seed::users());
        assert!(repo
            .update_role("missing", UserRole::Admin)
            .await
            .unwrap()
            .is_none());
    }
}
