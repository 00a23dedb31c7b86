pub mod access_service;
pub mod analytics_service;
pub mod booking_service;
pub mod checkout_service;
pub mod notification_service;
pub mod pricing_service;
pub mod property_service;
pub mod recommendation_service;
pub mod validation;
