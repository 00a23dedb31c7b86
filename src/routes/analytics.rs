use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::middleware::auth_context::MaybeUser;
use crate::services::analytics_service::RECENT_LIMIT;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EventInput {
    pub name: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

pub async fn track_event(
    state: web::Data<AppState>,
    user: MaybeUser,
    input: web::Json<EventInput>,
) -> HttpResponse {
    let input = input.into_inner();
    if input.name.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({ "error": "Event name is required" }));
    }

    let id = state
        .analytics
        .track_event(&input.name, user.0.as_deref(), input.properties)
        .await;
    HttpResponse::Accepted().json(json!({ "id": id }))
}

#[derive(Debug, Deserialize)]
pub struct EngagementInput {
    pub action: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

pub async fn track_engagement(
    state: web::Data<AppState>,
    user: MaybeUser,
    input: web::Json<EngagementInput>,
) -> HttpResponse {
    let input = input.into_inner();
    if input.action.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({ "error": "Action is required" }));
    }

    let id = state
        .analytics
        .track_engagement(&input.action, user.0.as_deref(), input.properties)
        .await;
    HttpResponse::Accepted().json(json!({ "id": id }))
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

/// Newest events first
pub async fn recent_events(
    state: web::Data<AppState>,
    query: web::Query<RecentQuery>,
) -> HttpResponse {
    let limit = query.limit.unwrap_or(RECENT_LIMIT);
    HttpResponse::Ok().json(state.analytics.recent(limit).await)
}

pub async fn insights(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.analytics.insights(Utc::now()).await)
}
