use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStep {
    PropertyView,
    BookingStart,
    GuestInfo,
    PaymentInfo,
    BookingComplete,
}

impl FunnelStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunnelStep::PropertyView => "property_view",
            FunnelStep::BookingStart => "booking_start",
            FunnelStep::GuestInfo => "guest_info",
            FunnelStep::PaymentInfo => "payment_info",
            FunnelStep::BookingComplete => "booking_complete",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FunnelStep::PropertyView => "Property Viewed",
            FunnelStep::BookingStart => "Booking Started",
            FunnelStep::GuestInfo => "Guest Info Completed",
            FunnelStep::PaymentInfo => "Payment Info Entered",
            FunnelStep::BookingComplete => "Booking Completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub id: u64,
    pub name: String,
    pub user_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub properties: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodCounts {
    pub page_views: usize,
    pub searches: usize,
    pub bookings: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub today: PeriodCounts,
    pub week: PeriodCounts,
    pub month: PeriodCounts,
}
