use async_trait::async_trait;

use crate::error::BookingError;
use crate::models::{
    account::{User, UserRole},
    bookings::{Booking, BookingRequest, BookingStatus},
    property::{Property, PropertyDraft},
};

#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Property>, BookingError>;
    async fn get(&self, id: u32) -> Result<Option<Property>, BookingError>;
    /// Stores a new property under the next free id
    async fn create(&self, draft: PropertyDraft) -> Result<Property, BookingError>;
    async fn update(&self, id: u32, draft: PropertyDraft) -> Result<Option<Property>, BookingError>;
    async fn delete(&self, id: u32) -> Result<bool, BookingError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, request: BookingRequest) -> Result<Booking, BookingError>;
    async fn get(&self, id: &str) -> Result<Option<Booking>, BookingError>;
    /// Newest first
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Booking>, BookingError>;
    async fn list_all(&self) -> Result<Vec<Booking>, BookingError>;
    /// Moves a booking from `expected` to `status`. Returns `None` when no booking
    /// with that id is currently in `expected`.
    async fn update_status(
        &self,
        id: &str,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> Result<Option<Booking>, BookingError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, BookingError>;
    async fn get(&self, id: &str) -> Result<Option<User>, BookingError>;
    async fn update_role(&self, id: &str, role: UserRole) -> Result<Option<User>, BookingError>;
}
