use std::sync::Arc;

use chrono::NaiveDate;

use crate::db::repository::BookingRepository;
use crate::error::BookingError;
use crate::models::account::Permission;
use crate::models::bookings::{Booking, BookingStatus};
use crate::services::access_service::Capabilities;
use crate::services::notification_service::NotificationCenter;

pub struct BookingService {
    repository: Arc<dyn BookingRepository>,
    notifications: Arc<NotificationCenter>,
}

impl BookingService {
    pub fn new(
        repository: Arc<dyn BookingRepository>,
        notifications: Arc<NotificationCenter>,
    ) -> Self {
        Self {
            repository,
            notifications,
        }
    }

    /// The caller's own bookings, newest first
    pub async fn list_own(&self, caps: &Capabilities) -> Result<Vec<Booking>, BookingError> {
        if !caps.has_any(&[Permission::BookingsRead, Permission::BookingsReadOwn]) {
            return Err(BookingError::PermissionDenied);
        }
        let user_id = caps.user_id().ok_or(BookingError::PermissionDenied)?;
        self.repository.list_for_user(user_id).await
    }

    /// Every booking, for staff dashboards
    pub async fn list_all(&self, caps: &Capabilities) -> Result<Vec<Booking>, BookingError> {
        caps.require(Permission::BookingsRead)?;
        self.repository.list_all().await
    }

    async fn find(&self, id: &str) -> Result<Booking, BookingError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Booking {}", id)))
    }

    pub async fn get(&self, caps: &Capabilities, id: &str) -> Result<Booking, BookingError> {
        let booking = self.find(id).await?;
        caps.require_resource(Permission::BookingsRead, Some(&booking.user_id))?;
        Ok(booking)
    }

    pub async fn cancel(&self, caps: &Capabilities, id: &str) -> Result<Booking, BookingError> {
        let booking = self.find(id).await?;
        caps.require_resource(Permission::BookingsCancel, Some(&booking.user_id))?;

        match booking.status {
            BookingStatus::Cancelled => {
                return Err(BookingError::Conflict(
                    "Booking is already cancelled".to_string(),
                ))
            }
            BookingStatus::Completed => {
                return Err(BookingError::Conflict(
                    "Completed bookings cannot be cancelled".to_string(),
                ))
            }
            BookingStatus::Confirmed => {}
        }

        let cancelled = self
            .repository
            .update_status(id, BookingStatus::Confirmed, BookingStatus::Cancelled)
            .await?
            // lost the race to another cancellation
            .ok_or_else(|| BookingError::Conflict("Booking is already cancelled".to_string()))?;

        log::info!("Booking {} cancelled by {:?}", id, caps.user_id());
        self.notifications.send_cancellation_notice(&cancelled).await;
        Ok(cancelled)
    }

    /// Reminds guests of confirmed stays starting within `within_days` of `today`.
    /// Returns how many reminders were delivered.
    pub async fn send_reminders(
        &self,
        caps: &Capabilities,
        today: NaiveDate,
        within_days: i64,
    ) -> Result<usize, BookingError> {
        caps.require(Permission::BookingsUpdate)?;
        let mut sent = 0;
        for booking in self.repository.list_all().await? {
            if booking.status != BookingStatus::Confirmed {
                continue;
            }
            let days_until = (booking.dates.check_in - today).num_days();
            if !(1..=within_days).contains(&days_until) {
                continue;
            }
            if self
                .notifications
                .send_booking_reminder(&booking, days_until)
                .await
                .is_some()
            {
                sent += 1;
            }
        }
        log::info!("Sent {} booking reminders", sent);
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::InMemoryBookingRepository;
    use crate::models::account::UserRole;
    use crate::models::bookings::{
        BookingRequest, DateRange, GuestInfo, PaymentSummary, PriceBreakdown,
    };
    use rust_decimal::Decimal;

    fn request(user_id: &str) -> BookingRequest {
        let price = PriceBreakdown {
            nights: 3,
            room_total: Decimal::from(897),
            service_fee: Decimal::from(25),
            taxes: Decimal::from(108),
            total: Decimal::from(1030),
        };
        BookingRequest {
            user_id: user_id.to_string(),
            property_id: 1,
            property_name: "Grand Palace Hotel".to_string(),
            room_id: 1,
            dates: DateRange::new(
                NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 18).unwrap(),
            ),
            guests: 2,
            guest_info: GuestInfo {
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                email: "john@example.com".to_string(),
                phone: "5550102030".to_string(),
                special_requests: None,
            },
            payment: PaymentSummary {
                last_four: "4242".to_string(),
                card_name: "John Doe".to_string(),
            },
            price,
            total_amount: price.total,
        }
    }

    fn caps(user_id: &str, role: UserRole) -> Capabilities {
        Capabilities::for_role(Some(user_id.to_string()), role)
    }

    async fn setup() -> (BookingService, Arc<NotificationCenter>, Booking) {
        let repo = Arc::new(InMemoryBookingRepository::new());
        let booking = repo.create(request("u-1001")).await.unwrap();
        let notifications = Arc::new(NotificationCenter::default());
        (
            BookingService::new(repo, notifications.clone()),
            notifications,
            booking,
        )
    }

    #[tokio::test]
    async fn test_owner_cancels_own_booking() {
        let (service, notifications, booking) = setup().await;
        let cancelled = service
            .cancel(&caps("u-1001", UserRole::User), &booking.id)
            .await
            .unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let inbox = notifications.list("u-1001").await;
        assert_eq!(inbox[0].title, "Booking Cancelled");

        assert!(matches!(
            service
                .cancel(&caps("u-1001", UserRole::User), &booking.id)
                .await,
            Err(BookingError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_other_user_cannot_cancel() {
        let (service, _, booking) = setup().await;
        assert!(matches!(
            service
                .cancel(&caps("u-1002", UserRole::User), &booking.id)
                .await,
            Err(BookingError::PermissionDenied)
        ));
        assert!(matches!(
            service.cancel(&caps("u-staff", UserRole::Staff), &booking.id).await,
            Err(BookingError::PermissionDenied)
        ));
        assert!(service
            .cancel(&caps("u-admin", UserRole::Admin), &booking.id)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_reading_bookings() {
        let (service, _, booking) = setup().await;
        assert_eq!(
            service
                .list_own(&caps("u-1001", UserRole::User))
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(service
            .list_own(&caps("u-1002", UserRole::User))
            .await
            .unwrap()
            .is_empty());
        assert!(service
            .get(&caps("u-1002", UserRole::User), &booking.id)
            .await
            .is_err());
        assert!(service
            .get(&caps("u-staff", UserRole::Staff), &booking.id)
            .await
            .is_ok());
        assert!(matches!(
            service.list_all(&caps("u-1001", UserRole::User)).await,
            Err(BookingError::PermissionDenied)
        ));
        assert!(matches!(
            service.get(&caps("u-staff", UserRole::Staff), "missing").await,
            Err(BookingError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_cancels_notify_once() {
        let (service, notifications, booking) = setup().await;
        let owner = caps("u-1001", UserRole::User);
        let (first, second) = tokio::join!(
            service.cancel(&owner, &booking.id),
            service.cancel(&owner, &booking.id)
        );

        assert!(first.is_ok() != second.is_ok());
        assert_eq!(notifications.list("u-1001").await.len(), 1);
    }

    #[tokio::test]
    async fn test_reminders_cover_upcoming_confirmed_stays() {
        let (service, notifications, booking) = setup().await;
        // the sample stay starts on 2024-02-15
        let staff = caps("u-staff", UserRole::Staff);
        let day = |d: u32| NaiveDate::from_ymd_opt(2024, 2, d).unwrap();

        assert_eq!(service.send_reminders(&staff, day(1), 7).await.unwrap(), 0);
        assert_eq!(service.send_reminders(&staff, day(12), 7).await.unwrap(), 1);
        assert_eq!(service.send_reminders(&staff, day(15), 7).await.unwrap(), 0);

        let inbox = notifications.list("u-1001").await;
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].title, "Upcoming Stay Reminder");
        assert_eq!(inbox[0].data["days_until"], 3);

        assert!(matches!(
            service
                .send_reminders(&caps("u-1001", UserRole::User), day(12), 7)
                .await,
            Err(BookingError::PermissionDenied)
        ));

        service
            .cancel(&caps("u-1001", UserRole::User), &booking.id)
            .await
            .unwrap();
        assert_eq!(service.send_reminders(&staff, day(12), 7).await.unwrap(), 0);
    }
}
