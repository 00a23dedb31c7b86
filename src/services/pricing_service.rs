use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::BookingError;
use crate::models::bookings::{DateRange, PriceBreakdown, RoomRate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingConfig {
    /// Flat per-booking fee, not prorated by nights
    pub service_fee: Decimal,
    /// Applied to the room total, result rounded to whole units
    pub tax_rate: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            service_fee: Decimal::from(25),
            tax_rate: Decimal::new(12, 2),
        }
    }
}

impl PricingConfig {
    /// Create config from environment variables or use defaults
    /// Negative or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            service_fee: Self::amount_from_env("BOOKING_SERVICE_FEE")
                .unwrap_or(defaults.service_fee),
            tax_rate: Self::amount_from_env("BOOKING_TAX_RATE").unwrap_or(defaults.tax_rate),
        }
    }

    fn amount_from_env(key: &str) -> Option<Decimal> {
        std::env::var(key)
            .ok()
            .and_then(|s| s.trim().parse::<Decimal>().ok())
            .filter(|d| !d.is_sign_negative())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PricingService {
    pub config: PricingConfig,
}

impl PricingService {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Whole days between check-in and check-out
    pub fn nights(dates: &DateRange) -> Result<i64, BookingError> {
        let nights = (dates.check_out - dates.check_in).num_days();
        if nights <= 0 {
            return Err(BookingError::InvalidDateRange {
                check_in: dates.check_in,
                check_out: dates.check_out,
            });
        }
        Ok(nights)
    }

    /// Tax on the room total, half-up to the nearest whole unit
    pub fn calculate_taxes(&self, room_total: Decimal) -> Decimal {
        (room_total * self.config.tax_rate)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }

    pub fn quote(&self, dates: &DateRange, rate: &RoomRate) -> Result<PriceBreakdown, BookingError> {
        if rate.price_per_night < Decimal::ZERO {
            return Err(BookingError::InvalidRate);
        }
        let nights = Self::nights(dates)?;

        let room_total = rate.price_per_night * Decimal::from(nights);
        let service_fee = self.config.service_fee;
        let taxes = self.calculate_taxes(room_total);

        Ok(PriceBreakdown {
            nights,
            room_total,
            service_fee,
            taxes,
            total: room_total + service_fee + taxes,
        })
    }
}

impl RoomRate {
    pub fn admits(&self, guests: u32) -> Result<(), BookingError> {
        if guests == 0 || guests > self.max_guests {
            return Err(BookingError::GuestLimitExceeded {
                requested: guests,
                max_guests: self.max_guests,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dates(check_in: (i32, u32, u32), check_out: (i32, u32, u32)) -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(check_in.0, check_in.1, check_in.2).unwrap(),
            NaiveDate::from_ymd_opt(check_out.0, check_out.1, check_out.2).unwrap(),
        )
    }

    fn rate(price: i64) -> RoomRate {
        RoomRate {
            price_per_night: Decimal::from(price),
            max_guests: 2,
        }
    }

    #[test]
    fn test_three_night_quote() {
        let quote = PricingService::default()
            .quote(&dates((2024, 2, 15), (2024, 2, 18)), &rate(299))
            .unwrap();

        assert_eq!(quote.nights, 3);
        assert_eq!(quote.room_total, Decimal::from(897));
        assert_eq!(quote.service_fee, Decimal::from(25));
        assert_eq!(quote.taxes, Decimal::from(108));
        assert_eq!(quote.total, Decimal::from(1030));
    }

    #[test]
    fn test_taxes_round_up_from_fraction() {
        let quote = PricingService::default()
            .quote(&dates((2024, 3, 1), (2024, 3, 5)), &rate(189))
            .unwrap();

        assert_eq!(quote.room_total, Decimal::from(756));
        // 90.72
        assert_eq!(quote.taxes, Decimal::from(91));
        assert_eq!(quote.total, Decimal::from(872));
    }

    #[test]
    fn test_tax_midpoint_rounds_half_up() {
        let service = PricingService::default();
        // 12.5 * 0.12 = 1.5
        assert_eq!(service.calculate_taxes(Decimal::new(125, 1)), Decimal::from(2));
        // 4.125 * 0.12 = 0.495
        assert_eq!(service.calculate_taxes(Decimal::new(4125, 3)), Decimal::ZERO);
    }

    #[test]
    fn test_fractional_nightly_rate_is_exact() {
        let nightly = RoomRate {
            price_per_night: Decimal::new(9999, 2),
            max_guests: 2,
        };
        let quote = PricingService::default()
            .quote(&dates((2024, 1, 1), (2024, 1, 4)), &nightly)
            .unwrap();

        assert_eq!(quote.room_total, Decimal::new(29997, 2));
        assert_eq!(quote.taxes, Decimal::from(36));
        assert_eq!(quote.total, Decimal::new(36097, 2));
    }

    #[test]
    fn test_same_day_checkout_is_rejected() {
        let result =
            PricingService::default().quote(&dates((2024, 2, 15), (2024, 2, 15)), &rate(299));
        assert!(matches!(result, Err(BookingError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_checkout_before_checkin_is_rejected() {
        let result = PricingService::nights(&dates((2024, 2, 18), (2024, 2, 15)));
        assert!(matches!(result, Err(BookingError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_nights_across_month_boundary() {
        assert_eq!(
            PricingService::nights(&dates((2024, 2, 27), (2024, 3, 2))).unwrap(),
            4
        );
    }

    #[test]
    fn test_negative_rate_is_rejected() {
        let result =
            PricingService::default().quote(&dates((2024, 2, 15), (2024, 2, 18)), &rate(-10));
        assert!(matches!(result, Err(BookingError::InvalidRate)));
    }

    #[test]
    fn test_free_room_still_pays_service_fee() {
        let quote = PricingService::default()
            .quote(&dates((2024, 2, 15), (2024, 2, 17)), &rate(0))
            .unwrap();
        assert_eq!(quote.total, Decimal::from(25));
    }

    #[test]
    fn test_quote_is_repeatable() {
        let service = PricingService::default();
        let range = dates((2024, 2, 15), (2024, 2, 18));
        assert_eq!(
            service.quote(&range, &rate(299)).unwrap(),
            service.quote(&range, &rate(299)).unwrap()
        );
    }

    #[test]
    fn test_configured_fee_and_rate() {
        let service = PricingService::new(PricingConfig {
            service_fee: Decimal::from(40),
            tax_rate: Decimal::new(10, 2),
        });
        let quote = service
            .quote(&dates((2024, 2, 15), (2024, 2, 17)), &rate(100))
            .unwrap();
        assert_eq!(quote.taxes, Decimal::from(20));
        assert_eq!(quote.total, Decimal::from(260));
    }

    #[test]
    fn test_guest_capacity() {
        assert!(rate(100).admits(2).is_ok());
        assert!(matches!(
            rate(100).admits(3),
            Err(BookingError::GuestLimitExceeded { requested: 3, max_guests: 2 })
        ));
        assert!(rate(100).admits(0).is_err());
    }
}
