#![allow(dead_code)]

use actix_web::{
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test, web, App,
};
use chrono::Duration;
use serde_json::Value;

use staybook_api::db::seed;
use staybook_api::middleware::auth::JwtConfig;
use staybook_api::routes;
use staybook_api::services::analytics_service::AnalyticsTracker;
use staybook_api::services::pricing_service::PricingService;
use staybook_api::state::AppState;

pub const TEST_SECRET: &str = "test-secret";

pub struct TestApp {
    pub state: web::Data<AppState>,
    pub jwt: web::Data<JwtConfig>,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            state: web::Data::new(AppState::in_memory(
                PricingService::default(),
                AnalyticsTracker::default(),
            )),
            jwt: web::Data::new(JwtConfig::new(TEST_SECRET)),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .app_data(self.jwt.clone())
            .route("/health", web::get().to(routes::health::health_check))
            .configure(routes::config)
    }

    /// `Authorization` header value for one of the seeded accounts
    pub fn bearer(&self, user_id: &str) -> String {
        let user = seed::users()
            .into_iter()
            .find(|u| u.id == user_id)
            .unwrap_or_else(|| panic!("no seeded user {}", user_id));
        let token = self.jwt.issue(&user, Duration::hours(1)).unwrap();
        format!("Bearer {}", token)
    }
}

pub const GUEST_USER: &str = "u-1001";
pub const OTHER_USER: &str = "u-1002";
pub const ADMIN: &str = "u-admin";
pub const MANAGER: &str = "u-manager";
pub const STAFF: &str = "u-staff";

/// Status and JSON body of a call. Middleware rejections surface as `Err`
/// from the service, so they are turned back into their response status here.
pub async fn send<S, R>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse, Error = actix_web::Error>,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            let body = test::read_body(resp).await;
            (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
        }
        Err(err) => (err.as_response_error().status_code(), Value::Null),
    }
}
