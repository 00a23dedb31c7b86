use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl DateRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        DateRange {
            check_in,
            check_out,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRate {
    pub price_per_night: Decimal,
    pub max_guests: u32,
}

/// Derived totals for a stay. Never stored on its own, always recomputed
/// from the dates and the room rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub nights: i64,
    pub room_total: Decimal,
    pub service_fee: Decimal,
    pub taxes: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub special_requests: Option<String>,
}

/// The only card data that outlives the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub last_four: String,
    pub card_name: String,
}

/// Payload handed to the booking store when a checkout is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub user_id: String,
    pub property_id: u32,
    pub property_name: String,
    pub room_id: u32,
    pub dates: DateRange,
    pub guests: u32,
    pub guest_info: GuestInfo,
    pub payment: PaymentSummary,
    pub price: PriceBreakdown,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub property_id: u32,
    pub property_name: String,
    pub room_id: u32,
    pub dates: DateRange,
    pub guests: u32,
    pub guest_info: GuestInfo,
    pub payment: PaymentSummary,
    pub price: PriceBreakdown,
    pub total_amount: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn from_request(request: BookingRequest, now: DateTime<Utc>) -> Self {
        Booking {
            id: Uuid::new_v4().to_string(),
            user_id: request.user_id,
            property_id: request.property_id,
            property_name: request.property_name,
            room_id: request.room_id,
            dates: request.dates,
            guests: request.guests,
            guest_info: request.guest_info,
            payment: request.payment,
            price: request.price,
            total_amount: request.total_amount,
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        }
    }
}
