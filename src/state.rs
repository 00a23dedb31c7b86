use std::sync::Arc;

use crate::db::memory::{InMemoryBookingRepository, InMemoryPropertyRepository, InMemoryUserRepository};
use crate::db::repository::{BookingRepository, PropertyRepository, UserRepository};
use crate::db::seed;
use crate::services::{
    analytics_service::AnalyticsTracker, booking_service::BookingService,
    checkout_service::CheckoutService, notification_service::NotificationCenter,
    pricing_service::PricingService, property_service::PropertyService,
    recommendation_service::RecommendationService,
};

/// Everything the handlers share, built once at startup and cloned into each worker.
pub struct AppState {
    pub properties: PropertyService,
    pub pricing: PricingService,
    pub checkout: CheckoutService,
    pub bookings: BookingService,
    pub users: Arc<dyn UserRepository>,
    pub notifications: Arc<NotificationCenter>,
    pub analytics: Arc<AnalyticsTracker>,
    pub recommendations: RecommendationService,
}

impl AppState {
    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        bookings: Arc<dyn BookingRepository>,
        users: Arc<dyn UserRepository>,
        pricing: PricingService,
        analytics: Arc<AnalyticsTracker>,
        notifications: Arc<NotificationCenter>,
    ) -> Self {
        Self {
            properties: PropertyService::new(properties.clone()),
            pricing,
            checkout: CheckoutService::new(
                properties.clone(),
                bookings.clone(),
                pricing,
                analytics.clone(),
                notifications.clone(),
            ),
            bookings: BookingService::new(bookings, notifications.clone()),
            users,
            notifications,
            analytics,
            recommendations: RecommendationService::new(properties),
        }
    }

    /// Seeded catalogue and accounts with in-memory bookings
    pub fn in_memory(pricing: PricingService, analytics: AnalyticsTracker) -> Self {
        Self::with_bookings(Arc::new(InMemoryBookingRepository::new()), pricing, analytics)
    }

    pub fn with_bookings(
        bookings: Arc<dyn BookingRepository>,
        pricing: PricingService,
        analytics: AnalyticsTracker,
    ) -> Self {
        Self::new(
            Arc::new(InMemoryPropertyRepository::new(seed::properties())),
            bookings,
            Arc::new(InMemoryUserRepository::new(seed::users())),
            pricing,
            Arc::new(analytics),
            Arc::new(NotificationCenter::default()),
        )
    }
}
