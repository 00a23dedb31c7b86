use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use tokio::sync::RwLock;

use crate::models::bookings::Booking;
use crate::models::notification::{
    Notification, NotificationDraft, NotificationKind, NotificationPreferences,
};

/// Where freshly added notifications are pushed for immediate display.
pub trait NotificationSink: Send + Sync {
    fn deliver(&self, user_id: &str, notification: &Notification);
}

/// Default sink, writes deliveries to the log
pub struct LogSink;

impl NotificationSink for LogSink {
    fn deliver(&self, user_id: &str, notification: &Notification) {
        match notification.kind {
            NotificationKind::CancellationNotice => {
                log::warn!("[{}] {}: {}", user_id, notification.title, notification.message)
            }
            _ => log::info!("[{}] {}: {}", user_id, notification.title, notification.message),
        }
    }
}

#[derive(Default)]
struct Inbox {
    /// Newest first
    notifications: Vec<Notification>,
    preferences: NotificationPreferences,
}

pub struct NotificationCenter {
    inboxes: RwLock<HashMap<String, Inbox>>,
    next_id: AtomicU64,
    sink: Arc<dyn NotificationSink>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(Arc::new(LogSink))
    }
}

impl NotificationCenter {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            inboxes: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            sink,
        }
    }

    pub async fn add(&self, user_id: &str, draft: NotificationDraft) -> u64 {
        let notification = Notification {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            read: false,
            created_at: Utc::now(),
            data: draft.data,
        };
        let id = notification.id;

        self.sink.deliver(user_id, &notification);
        self.inboxes
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .notifications
            .insert(0, notification);
        id
    }

    pub async fn list(&self, user_id: &str) -> Vec<Notification> {
        self.inboxes
            .read()
            .await
            .get(user_id)
            .map(|inbox| inbox.notifications.clone())
            .unwrap_or_default()
    }

    pub async fn unread_count(&self, user_id: &str) -> usize {
        self.inboxes
            .read()
            .await
            .get(user_id)
            .map(|inbox| inbox.notifications.iter().filter(|n| !n.read).count())
            .unwrap_or(0)
    }

    /// Returns false when the notification does not exist
    pub async fn mark_read(&self, user_id: &str, notification_id: u64) -> bool {
        let mut inboxes = self.inboxes.write().await;
        let Some(inbox) = inboxes.get_mut(user_id) else {
            return false;
        };
        match inbox
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
        {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub async fn mark_all_read(&self, user_id: &str) {
        if let Some(inbox) = self.inboxes.write().await.get_mut(user_id) {
            inbox.notifications.iter_mut().for_each(|n| n.read = true);
        }
    }

    pub async fn delete(&self, user_id: &str, notification_id: u64) -> bool {
        let mut inboxes = self.inboxes.write().await;
        let Some(inbox) = inboxes.get_mut(user_id) else {
            return false;
        };
        let before = inbox.notifications.len();
        inbox.notifications.retain(|n| n.id != notification_id);
        inbox.notifications.len() != before
    }

    pub async fn clear(&self, user_id: &str) {
        if let Some(inbox) = self.inboxes.write().await.get_mut(user_id) {
            inbox.notifications.clear();
        }
    }

    pub async fn preferences(&self, user_id: &str) -> NotificationPreferences {
        self.inboxes
            .read()
            .await
            .get(user_id)
            .map(|inbox| inbox.preferences)
            .unwrap_or_default()
    }

    pub async fn update_preferences(&self, user_id: &str, preferences: NotificationPreferences) {
        self.inboxes
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .preferences = preferences;
        log::info!("Notification preferences updated for {}", user_id);
    }

    async fn send_if(
        &self,
        user_id: &str,
        enabled: impl Fn(&NotificationPreferences) -> bool,
        draft: NotificationDraft,
    ) -> Option<u64> {
        if !enabled(&self.preferences(user_id).await) {
            return None;
        }
        Some(self.add(user_id, draft).await)
    }

    pub async fn send_booking_confirmation(&self, booking: &Booking) -> Option<u64> {
        let draft = NotificationDraft {
            kind: NotificationKind::BookingConfirmation,
            title: "Booking Confirmed".to_string(),
            message: format!(
                "Your booking at {} has been confirmed for {} - {}.",
                booking.property_name, booking.dates.check_in, booking.dates.check_out
            ),
            data: json!({
                "booking_id": booking.id,
                "property_name": booking.property_name,
                "check_in": booking.dates.check_in,
                "check_out": booking.dates.check_out,
            }),
        };
        self.send_if(&booking.user_id, |p| p.booking_confirmation, draft)
            .await
    }

    pub async fn send_payment_confirmation(
        &self,
        user_id: &str,
        booking_id: &str,
        amount: Decimal,
    ) -> Option<u64> {
        let draft = NotificationDraft {
            kind: NotificationKind::PaymentConfirmation,
            title: "Payment Processed".to_string(),
            message: format!(
                "Payment of ${} has been successfully processed for your booking.",
                amount
            ),
            data: json!({ "booking_id": booking_id, "amount": amount }),
        };
        self.send_if(user_id, |p| p.payment_confirmation, draft).await
    }

    pub async fn send_booking_reminder(&self, booking: &Booking, days_until: i64) -> Option<u64> {
        let draft = NotificationDraft {
            kind: NotificationKind::BookingReminder,
            title: "Upcoming Stay Reminder".to_string(),
            message: format!(
                "Your stay at {} is coming up in {} days.",
                booking.property_name, days_until
            ),
            data: json!({
                "booking_id": booking.id,
                "property_name": booking.property_name,
                "check_in": booking.dates.check_in,
                "days_until": days_until,
            }),
        };
        self.send_if(&booking.user_id, |p| p.booking_reminder, draft)
            .await
    }

    pub async fn send_cancellation_notice(&self, booking: &Booking) -> Option<u64> {
        let draft = NotificationDraft {
            kind: NotificationKind::CancellationNotice,
            title: "Booking Cancelled".to_string(),
            message: format!(
                "Your booking at {} has been cancelled. Refund will be processed within 3-5 business days.",
                booking.property_name
            ),
            data: json!({ "booking_id": booking.id, "property_name": booking.property_name }),
        };
        self.send_if(&booking.user_id, |p| p.cancellation_notice, draft)
            .await
    }

    pub async fn send_promotional_offer(
        &self,
        user_id: &str,
        title: &str,
        message: &str,
    ) -> Option<u64> {
        let draft = NotificationDraft {
            kind: NotificationKind::PromotionalOffer,
            title: title.to_string(),
            message: message.to_string(),
            data: serde_json::Value::Null,
        };
        self.send_if(user_id, |p| p.promotional_offers, draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        delivered: Mutex<Vec<String>>,
    }

    impl NotificationSink for RecordingSink {
        fn deliver(&self, _user_id: &str, notification: &Notification) {
            self.delivered
                .lock()
                .unwrap()
                .push(notification.title.clone());
        }
    }

    fn draft(title: &str) -> NotificationDraft {
        NotificationDraft {
            kind: NotificationKind::General,
            title: title.to_string(),
            message: "hello".to_string(),
            data: serde_json::Value::Null,
        }
    }

    #[tokio::test]
    async fn test_newest_first_and_unread_count() {
        let center = NotificationCenter::default();
        center.add("u-1", draft("first")).await;
        let second = center.add("u-1", draft("second")).await;

        let inbox = center.list("u-1").await;
        assert_eq!(inbox[0].title, "second");
        assert_eq!(center.unread_count("u-1").await, 2);

        assert!(center.mark_read("u-1", second).await);
        // marking twice must not drift the count
        assert!(center.mark_read("u-1", second).await);
        assert_eq!(center.unread_count("u-1").await, 1);
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let center = NotificationCenter::default();
        let id = center.add("u-1", draft("gone")).await;
        center.add("u-1", draft("kept")).await;

        assert!(center.delete("u-1", id).await);
        assert!(!center.delete("u-1", id).await);
        assert_eq!(center.unread_count("u-1").await, 1);

        center.clear("u-1").await;
        assert!(center.list("u-1").await.is_empty());
    }

    #[tokio::test]
    async fn test_mark_all_read() {
        let center = NotificationCenter::default();
        center.add("u-1", draft("a")).await;
        center.add("u-1", draft("b")).await;
        center.mark_all_read("u-1").await;
        assert_eq!(center.unread_count("u-1").await, 0);
    }

    #[tokio::test]
    async fn test_promotions_off_by_default() {
        let sink = Arc::new(RecordingSink::default());
        let center = NotificationCenter::new(sink.clone());

        assert!(center
            .send_promotional_offer("u-1", "Sale", "20% off")
            .await
            .is_none());

        let mut prefs = NotificationPreferences::default();
        prefs.promotional_offers = true;
        center.update_preferences("u-1", prefs).await;

        assert!(center
            .send_promotional_offer("u-1", "Sale", "20% off")
            .await
            .is_some());
        assert_eq!(*sink.delivered.lock().unwrap(), vec!["Sale".to_string()]);
    }

    #[tokio::test]
    async fn test_payment_confirmation_respects_preference() {
        let center = NotificationCenter::default();
        let mut prefs = NotificationPreferences::default();
        prefs.payment_confirmation = false;
        center.update_preferences("u-1", prefs).await;

        assert!(center
            .send_payment_confirmation("u-1", "b-1", Decimal::from(897))
            .await
            .is_none());
        assert!(center.list("u-1").await.is_empty());
    }

    #[tokio::test]
    async fn test_inboxes_are_per_user() {
        let center = NotificationCenter::default();
        let id = center.add("u-1", draft("mine")).await;
        assert!(!center.mark_read("u-2", id).await);
        assert!(center.list("u-2").await.is_empty());
    }
}
