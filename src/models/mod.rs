pub mod account;
pub mod analytics;
pub mod bookings;
pub mod checkout;
pub mod notification;
pub mod property;
pub mod recommendation;
pub mod search;
