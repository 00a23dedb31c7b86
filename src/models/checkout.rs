use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::bookings::DateRange;

/// Field name -> message
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    GuestInfo,
    Payment,
    Confirmation,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::GuestInfo => "guest_info",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Confirmation => "confirmation",
        }
    }
}

/// What the guest picked on the property page before starting checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaySelection {
    pub property_id: u32,
    pub room_id: u32,
    pub guests: u32,
    #[serde(flatten)]
    pub dates: DateRange,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuestForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub special_requests: String,
}

/// Raw card fields. Only ever deserialized; the flow exposes a masked view.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaymentForm {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub card_name: String,
}

impl PaymentForm {
    pub fn card_digits(&self) -> String {
        self.card_number.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    pub fn last_four(&self) -> String {
        let digits = self.card_digits();
        let skip = digits.len().saturating_sub(4);
        digits[skip..].to_string()
    }
}

impl fmt::Debug for PaymentForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentForm")
            .field("card_number", &format!("****{}", self.last_four()))
            .field("expiry_date", &self.expiry_date)
            .field("cvv", &"***")
            .field("card_name", &self.card_name)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaskedPayment {
    pub last_four: String,
    pub expiry_date: String,
    pub card_name: String,
}

impl From<&PaymentForm> for MaskedPayment {
    fn from(form: &PaymentForm) -> Self {
        MaskedPayment {
            last_four: form.last_four(),
            expiry_date: form.expiry_date.clone(),
            card_name: form.card_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_four_ignores_spacing() {
        let form = PaymentForm {
            card_number: "4242 4242 4242 1234".to_string(),
            ..Default::default()
        };
        assert_eq!(form.last_four(), "1234");
    }

    #[test]
    fn test_debug_masks_card_data() {
        let form = PaymentForm {
            card_number: "4111111111111111".to_string(),
            cvv: "987".to_string(),
            ..Default::default()
        };
        let printed = format!("{:?}", form);
        assert!(!printed.contains("4111111111111111"));
        assert!(!printed.contains("987"));
        assert!(printed.contains("****1111"));
    }
}
