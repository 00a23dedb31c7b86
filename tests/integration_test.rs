mod common;

use actix_web::{http::header, test, web, App};
use rust_decimal::Decimal;
use serial_test::serial;

use common::{send, TEST_SECRET};
use staybook_api::{
    db::seed,
    middleware::auth::JwtConfig,
    models::bookings::{DateRange, RoomRate},
    routes,
    services::{
        analytics_service::{AnalyticsTracker, DEFAULT_BUFFER_SIZE},
        pricing_service::{PricingConfig, PricingService},
    },
    state::AppState,
};

fn clear_env() {
    for key in ["BOOKING_SERVICE_FEE", "BOOKING_TAX_RATE", "ANALYTICS_BUFFER_SIZE", "JWT_SECRET"] {
        std::env::remove_var(key);
    }
}

#[actix_rt::test]
#[serial]
async fn test_pricing_config_from_env() {
    clear_env();
    assert_eq!(PricingConfig::from_env(), PricingConfig::default());

    std::env::set_var("BOOKING_SERVICE_FEE", "30");
    std::env::set_var("BOOKING_TAX_RATE", "0.10");
    let pricing = PricingService::new(PricingConfig::from_env());
    let dates = DateRange::new(
        chrono::NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
        chrono::NaiveDate::from_ymd_opt(2024, 2, 18).unwrap(),
    );
    let quote = pricing
        .quote(
            &dates,
            &RoomRate {
                price_per_night: Decimal::from(299),
                max_guests: 2,
            },
        )
        .unwrap();
    // 897 * 0.10 = 89.7 -> 90
    assert_eq!(quote.total, Decimal::from(897 + 30 + 90));

    std::env::set_var("BOOKING_TAX_RATE", "not-a-number");
    assert_eq!(PricingConfig::from_env().tax_rate, Decimal::new(12, 2));

    std::env::set_var("BOOKING_SERVICE_FEE", "-5");
    std::env::set_var("BOOKING_TAX_RATE", "-0.12");
    assert_eq!(PricingConfig::from_env(), PricingConfig::default());
    clear_env();
}

#[actix_rt::test]
#[serial]
async fn test_analytics_buffer_size_from_env() {
    clear_env();
    std::env::set_var("ANALYTICS_BUFFER_SIZE", "2");
    let tracker = AnalyticsTracker::from_env();
    for page in ["/a", "/b", "/c"] {
        tracker.track_page_view(page, None).await;
    }
    assert_eq!(tracker.len().await, 2);
    clear_env();

    let tracker = AnalyticsTracker::from_env();
    for _ in 0..DEFAULT_BUFFER_SIZE + 5 {
        tracker.track_event("tick", None, Default::default()).await;
    }
    assert_eq!(tracker.len().await, DEFAULT_BUFFER_SIZE);
}

#[actix_rt::test]
#[serial]
async fn test_middleware_falls_back_to_env_secret() {
    clear_env();
    std::env::set_var("JWT_SECRET", TEST_SECRET);

    // no JwtConfig registered, so the middleware reads JWT_SECRET
    let state = web::Data::new(AppState::in_memory(
        PricingService::default(),
        AnalyticsTracker::default(),
    ));
    let app = test::init_service(App::new().app_data(state).configure(routes::config)).await;

    let user = seed::users().into_iter().find(|u| u.id == "u-1001").unwrap();
    let token = JwtConfig::new(TEST_SECRET)
        .issue(&user, chrono::Duration::hours(1))
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/bookings")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 200);

    let other = JwtConfig::new("another-secret")
        .issue(&user, chrono::Duration::hours(1))
        .unwrap();
    let req = test::TestRequest::get()
        .uri("/api/bookings")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", other)))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 401);
    clear_env();
}
