use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::repository::{BookingRepository, PropertyRepository};
use crate::error::BookingError;
use crate::models::analytics::FunnelStep;
use crate::models::bookings::{Booking, BookingRequest, GuestInfo, PaymentSummary, PriceBreakdown};
use crate::models::checkout::{
    CheckoutStep, FieldErrors, GuestForm, MaskedPayment, PaymentForm, StaySelection,
};
use crate::services::analytics_service::AnalyticsTracker;
use crate::services::notification_service::NotificationCenter;
use crate::services::pricing_service::PricingService;
use crate::services::validation::{
    format_card_number, format_cvv, format_expiry_date, validate_guest, validate_payment,
};

pub const SUBMISSION_FAILED: &str = "Failed to create booking";

/// Outcome of a successful `advance`.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Moved(CheckoutStep),
    /// Card details passed; the payload must now be handed to the booking store.
    Submit(BookingRequest),
}

/// One guest's way through guest info, payment and confirmation.
#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    user_id: String,
    step: CheckoutStep,
    selection: StaySelection,
    property_name: String,
    room_name: String,
    price: PriceBreakdown,
    guest: GuestForm,
    payment: PaymentForm,
    errors: FieldErrors,
    submission_error: Option<String>,
    submitting: bool,
    booking: Option<Booking>,
}

impl CheckoutFlow {
    pub fn new(
        user_id: &str,
        selection: StaySelection,
        property_name: &str,
        room_name: &str,
        price: PriceBreakdown,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            step: CheckoutStep::GuestInfo,
            selection,
            property_name: property_name.to_string(),
            room_name: room_name.to_string(),
            price,
            guest: GuestForm::default(),
            payment: PaymentForm::default(),
            errors: FieldErrors::new(),
            submission_error: None,
            submitting: false,
            booking: None,
        }
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn guest(&self) -> &GuestForm {
        &self.guest
    }

    pub fn price(&self) -> &PriceBreakdown {
        &self.price
    }

    fn ensure_editable(&self, action: &'static str) -> Result<(), BookingError> {
        if self.step == CheckoutStep::Confirmation || self.submitting {
            return Err(BookingError::InvalidTransition {
                action,
                step: self.step.as_str(),
            });
        }
        Ok(())
    }

    /// Errors already shown for a field are dropped once that field is fixed.
    pub fn update_guest(&mut self, form: GuestForm) -> Result<(), BookingError> {
        self.ensure_editable("edit guest details")?;
        self.guest = form;
        let still_invalid = validate_guest(&self.guest);
        self.errors.retain(|field, _| still_invalid.contains_key(field));
        Ok(())
    }

    /// Card fields are stored the way the payment form masks them.
    pub fn update_payment(&mut self, form: PaymentForm, today: NaiveDate) -> Result<(), BookingError> {
        self.ensure_editable("edit payment details")?;
        self.payment = PaymentForm {
            card_number: format_card_number(&form.card_number),
            expiry_date: format_expiry_date(&form.expiry_date),
            cvv: format_cvv(&form.cvv),
            card_name: form.card_name,
        };
        let still_invalid = validate_payment(&self.payment, today);
        self.errors.retain(|field, _| still_invalid.contains_key(field));
        Ok(())
    }

    pub fn advance(&mut self, today: NaiveDate) -> Result<Transition, BookingError> {
        match self.step {
            CheckoutStep::GuestInfo => {
                self.errors = validate_guest(&self.guest);
                if !self.errors.is_empty() {
                    return Err(BookingError::Validation(self.errors.clone()));
                }
                self.step = CheckoutStep::Payment;
                Ok(Transition::Moved(CheckoutStep::Payment))
            }
            CheckoutStep::Payment if self.submitting => {
                Err(BookingError::Conflict("Booking is already being submitted".to_string()))
            }
            CheckoutStep::Payment => {
                self.errors = validate_payment(&self.payment, today);
                if !self.errors.is_empty() {
                    return Err(BookingError::Validation(self.errors.clone()));
                }
                self.submitting = true;
                self.submission_error = None;
                Ok(Transition::Submit(self.booking_request()))
            }
            CheckoutStep::Confirmation => Err(BookingError::InvalidTransition {
                action: "advance",
                step: self.step.as_str(),
            }),
        }
    }

    pub fn back(&mut self) -> Result<CheckoutStep, BookingError> {
        if self.step != CheckoutStep::Payment || self.submitting {
            return Err(BookingError::InvalidTransition {
                action: "go back",
                step: self.step.as_str(),
            });
        }
        self.step = CheckoutStep::GuestInfo;
        self.errors.clear();
        Ok(self.step)
    }

    pub fn complete(&mut self, booking: Booking) {
        self.submitting = false;
        self.step = CheckoutStep::Confirmation;
        self.booking = Some(booking);
    }

    /// Stays on the payment step so the guest can retry.
    pub fn fail(&mut self) {
        self.submitting = false;
        self.submission_error = Some(SUBMISSION_FAILED.to_string());
    }

    fn booking_request(&self) -> BookingRequest {
        let special_requests = self.guest.special_requests.trim();
        BookingRequest {
            user_id: self.user_id.clone(),
            property_id: self.selection.property_id,
            property_name: self.property_name.clone(),
            room_id: self.selection.room_id,
            dates: self.selection.dates,
            guests: self.selection.guests,
            guest_info: GuestInfo {
                first_name: self.guest.first_name.trim().to_string(),
                last_name: self.guest.last_name.trim().to_string(),
                email: self.guest.email.trim().to_string(),
                phone: self.guest.phone.trim().to_string(),
                special_requests: (!special_requests.is_empty())
                    .then(|| special_requests.to_string()),
            },
            payment: PaymentSummary {
                last_four: self.payment.last_four(),
                card_name: self.payment.card_name.trim().to_string(),
            },
            price: self.price,
            total_amount: self.price.total,
        }
    }

    pub fn view(&self, id: Uuid) -> CheckoutView {
        CheckoutView {
            id,
            step: self.step,
            selection: self.selection,
            property_name: self.property_name.clone(),
            room_name: self.room_name.clone(),
            price: self.price,
            guest: self.guest.clone(),
            payment: MaskedPayment::from(&self.payment),
            errors: self.errors.clone(),
            submission_error: self.submission_error.clone(),
            booking: self.booking.clone(),
        }
    }
}

/// What clients see of a checkout. Card number and CVV never leave the server.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutView {
    pub id: Uuid,
    pub step: CheckoutStep,
    pub selection: StaySelection,
    pub property_name: String,
    pub room_name: String,
    pub price: PriceBreakdown,
    pub guest: GuestForm,
    pub payment: MaskedPayment,
    pub errors: FieldErrors,
    pub submission_error: Option<String>,
    pub booking: Option<Booking>,
}

pub struct CheckoutService {
    sessions: RwLock<HashMap<Uuid, CheckoutFlow>>,
    properties: Arc<dyn PropertyRepository>,
    bookings: Arc<dyn BookingRepository>,
    pricing: PricingService,
    analytics: Arc<AnalyticsTracker>,
    notifications: Arc<NotificationCenter>,
}

impl CheckoutService {
    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        bookings: Arc<dyn BookingRepository>,
        pricing: PricingService,
        analytics: Arc<AnalyticsTracker>,
        notifications: Arc<NotificationCenter>,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            properties,
            bookings,
            pricing,
            analytics,
            notifications,
        }
    }

    async fn funnel(&self, step: FunnelStep, user_id: &str, extra: Value) {
        let extra = match extra {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.analytics
            .track_booking_funnel(step, Some(user_id), extra)
            .await;
    }

    /// Prices the selected stay and opens a session on the guest info step
    pub async fn start(
        &self,
        user_id: &str,
        selection: StaySelection,
    ) -> Result<CheckoutView, BookingError> {
        let property = self
            .properties
            .get(selection.property_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Property {}", selection.property_id)))?;
        let room = property
            .room(selection.room_id)
            .ok_or_else(|| BookingError::NotFound(format!("Room {}", selection.room_id)))?;

        let rate = room.rate();
        rate.admits(selection.guests)?;
        let price = self.pricing.quote(&selection.dates, &rate)?;

        let id = Uuid::new_v4();
        let flow = CheckoutFlow::new(user_id, selection, &property.name, &room.name, price);
        let view = flow.view(id);
        self.sessions.write().await.insert(id, flow);

        log::info!(
            "Checkout {} started by {} for property {} room {}",
            id,
            user_id,
            selection.property_id,
            selection.room_id
        );
        self.funnel(
            FunnelStep::BookingStart,
            user_id,
            json!({ "property_id": selection.property_id, "room_id": selection.room_id }),
        )
        .await;
        Ok(view)
    }

    /// Applies `f` to a session owned by `user_id`. Other users' sessions look missing.
    async fn with_flow<T>(
        &self,
        id: Uuid,
        user_id: &str,
        f: impl FnOnce(&mut CheckoutFlow) -> Result<T, BookingError>,
    ) -> Result<(T, CheckoutView), BookingError> {
        let mut sessions = self.sessions.write().await;
        let flow = sessions
            .get_mut(&id)
            .filter(|flow| flow.user_id == user_id)
            .ok_or_else(|| BookingError::NotFound(format!("Checkout {}", id)))?;
        let out = f(flow)?;
        Ok((out, flow.view(id)))
    }

    pub async fn get(&self, id: Uuid, user_id: &str) -> Result<CheckoutView, BookingError> {
        self.with_flow(id, user_id, |_| Ok(()))
            .await
            .map(|(_, view)| view)
    }

    pub async fn update_guest(
        &self,
        id: Uuid,
        user_id: &str,
        form: GuestForm,
    ) -> Result<CheckoutView, BookingError> {
        self.with_flow(id, user_id, |flow| flow.update_guest(form))
            .await
            .map(|(_, view)| view)
    }

    pub async fn update_payment(
        &self,
        id: Uuid,
        user_id: &str,
        form: PaymentForm,
        today: NaiveDate,
    ) -> Result<CheckoutView, BookingError> {
        self.with_flow(id, user_id, |flow| flow.update_payment(form, today))
            .await
            .map(|(_, view)| view)
    }

    pub async fn back(&self, id: Uuid, user_id: &str) -> Result<CheckoutView, BookingError> {
        self.with_flow(id, user_id, |flow| flow.back())
            .await
            .map(|(_, view)| view)
    }

    /// Drops the session. Returns false when there was nothing to drop.
    /// A session whose booking is being submitted cannot be dropped.
    pub async fn abandon(&self, id: Uuid, user_id: &str) -> Result<bool, BookingError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(&id) {
            Some(flow) if flow.user_id == user_id => {
                if flow.submitting {
                    return Err(BookingError::Conflict(
                        "Booking is already being submitted".to_string(),
                    ));
                }
                sessions.remove(&id);
                log::info!("Checkout {} abandoned", id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Moves the session forward. From the payment step this creates the booking;
    /// a completed session is discarded and its final view returned.
    pub async fn advance(
        &self,
        id: Uuid,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<CheckoutView, BookingError> {
        let ((transition, snapshot), view) = self
            .with_flow(id, user_id, |flow| Ok((flow.advance(today)?, flow.clone())))
            .await?;

        let request = match transition {
            Transition::Moved(step) => {
                log::debug!("Checkout {} moved to {}", id, step.as_str());
                self.funnel(FunnelStep::GuestInfo, user_id, json!({})).await;
                return Ok(view);
            }
            Transition::Submit(request) => request,
        };

        self.funnel(
            FunnelStep::PaymentInfo,
            user_id,
            json!({ "total": request.total_amount }),
        )
        .await;

        match self.bookings.create(request).await {
            Ok(booking) => {
                // the booking exists now, so a vanished session must not fail the request
                let mut flow = self
                    .sessions
                    .write()
                    .await
                    .remove(&id)
                    .filter(|flow| flow.user_id == user_id)
                    .unwrap_or(snapshot);
                flow.complete(booking.clone());
                let view = flow.view(id);

                log::info!("Checkout {} completed as booking {}", id, booking.id);
                self.funnel(
                    FunnelStep::BookingComplete,
                    user_id,
                    json!({ "booking_id": booking.id, "total": booking.total_amount }),
                )
                .await;
                self.notifications.send_booking_confirmation(&booking).await;
                self.notifications
                    .send_payment_confirmation(user_id, &booking.id, booking.total_amount)
                    .await;
                Ok(view)
            }
            Err(err) => {
                log::error!("Booking creation for checkout {} failed: {}", id, err);
                let reset = self
                    .with_flow(id, user_id, |flow| {
                        flow.fail();
                        Ok(())
                    })
                    .await;
                if reset.is_err() {
                    log::warn!("Checkout {} vanished during submission", id);
                }
                Err(BookingError::Submission(SUBMISSION_FAILED.to_string()))
            }
        }
    }
}
