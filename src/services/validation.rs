use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::checkout::{FieldErrors, GuestForm, PaymentForm};

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

fn expiry_pattern() -> &'static Regex {
    static EXPIRY: OnceLock<Regex> = OnceLock::new();
    EXPIRY.get_or_init(|| Regex::new(r"^(0[1-9]|1[0-2])/([0-9]{2})$").expect("valid expiry pattern"))
}

fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestField {
    FirstName,
    LastName,
    Email,
    Phone,
}

impl GuestField {
    pub const REQUIRED: [GuestField; 4] = [
        GuestField::FirstName,
        GuestField::LastName,
        GuestField::Email,
        GuestField::Phone,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GuestField::FirstName => "first_name",
            GuestField::LastName => "last_name",
            GuestField::Email => "email",
            GuestField::Phone => "phone",
        }
    }

    pub fn value<'a>(&self, form: &'a GuestForm) -> &'a str {
        match self {
            GuestField::FirstName => &form.first_name,
            GuestField::LastName => &form.last_name,
            GuestField::Email => &form.email,
            GuestField::Phone => &form.phone,
        }
    }

    /// Check a single field, as on blur. `None` means valid.
    pub fn validate(&self, value: &str) -> Option<&'static str> {
        match self {
            GuestField::FirstName => {
                value.trim().is_empty().then_some("First name is required")
            }
            GuestField::LastName => value.trim().is_empty().then_some("Last name is required"),
            GuestField::Email => {
                (!email_pattern().is_match(value)).then_some("Please enter a valid email address")
            }
            GuestField::Phone => {
                let count = digits(value).len();
                (!(7..=16).contains(&count)).then_some("Please enter a valid phone number")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentField {
    CardNumber,
    ExpiryDate,
    Cvv,
    CardName,
}

impl PaymentField {
    pub const REQUIRED: [PaymentField; 4] = [
        PaymentField::CardNumber,
        PaymentField::ExpiryDate,
        PaymentField::Cvv,
        PaymentField::CardName,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PaymentField::CardNumber => "card_number",
            PaymentField::ExpiryDate => "expiry_date",
            PaymentField::Cvv => "cvv",
            PaymentField::CardName => "card_name",
        }
    }

    pub fn value<'a>(&self, form: &'a PaymentForm) -> &'a str {
        match self {
            PaymentField::CardNumber => &form.card_number,
            PaymentField::ExpiryDate => &form.expiry_date,
            PaymentField::Cvv => &form.cvv,
            PaymentField::CardName => &form.card_name,
        }
    }

    pub fn validate(&self, value: &str, today: NaiveDate) -> Option<&'static str> {
        match self {
            PaymentField::CardNumber => {
                let count = digits(value).len();
                (!(13..=19).contains(&count)).then_some("Please enter a valid card number")
            }
            PaymentField::ExpiryDate => validate_expiry(value, today),
            PaymentField::Cvv => {
                let count = digits(value).len();
                (!(3..=4).contains(&count)).then_some("Please enter a valid CVV")
            }
            PaymentField::CardName => {
                (value.trim().chars().count() < 2).then_some("Please enter the name on card")
            }
        }
    }
}

/// `MM/YY`, valid while the first day of that month is still ahead of `today`.
fn validate_expiry(value: &str, today: NaiveDate) -> Option<&'static str> {
    let Some(caps) = expiry_pattern().captures(value) else {
        return Some("Please enter MM/YY format");
    };
    let month = caps[1].parse::<u32>();
    let year = caps[2].parse::<i32>().map(|yy| yy + 2000);

    let expiry = match (year, month) {
        (Ok(year), Ok(month)) => NaiveDate::from_ymd_opt(year, month, 1),
        _ => None,
    };
    match expiry {
        Some(expiry) if expiry > today => None,
        _ => Some("Card has expired"),
    }
}

pub fn validate_guest(form: &GuestForm) -> FieldErrors {
    GuestField::REQUIRED
        .iter()
        .filter_map(|field| {
            field
                .validate(field.value(form))
                .map(|msg| (field.name().to_string(), msg.to_string()))
        })
        .collect()
}

pub fn validate_payment(form: &PaymentForm, today: NaiveDate) -> FieldErrors {
    PaymentField::REQUIRED
        .iter()
        .filter_map(|field| {
            field
                .validate(field.value(form), today)
                .map(|msg| (field.name().to_string(), msg.to_string()))
        })
        .collect()
}

/// Digits grouped in fours, capped at 19 digits
pub fn format_card_number(raw: &str) -> String {
    let digits = digits(raw);
    if digits.len() < 4 {
        return digits;
    }
    digits
        .chars()
        .take(19)
        .collect::<Vec<_>>()
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `MMYY` -> `MM/YY`
pub fn format_expiry_date(raw: &str) -> String {
    let digits = digits(raw);
    if digits.len() >= 2 {
        let year: String = digits.chars().skip(2).take(2).collect();
        return format!("{}/{}", &digits[..2], year);
    }
    digits
}

pub fn format_cvv(raw: &str) -> String {
    digits(raw).chars().take(4).collect()
}
