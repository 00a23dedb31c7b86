use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::error::BookingError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::recommendation::RecommendationKind;
use crate::services::recommendation_service::DEFAULT_LIMIT;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub limit: Option<usize>,
}

pub async fn get_recommendations(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<RecommendationQuery>,
) -> Result<HttpResponse, BookingError> {
    let kind = path
        .parse::<RecommendationKind>()
        .map_err(|_| BookingError::NotFound(format!("Recommendation list {}", path.as_str())))?;
    let recommendations = state
        .recommendations
        .recommend(kind, query.limit.unwrap_or(DEFAULT_LIMIT))
        .await?;
    Ok(HttpResponse::Ok().json(recommendations))
}

pub async fn list_saved(state: web::Data<AppState>, user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "property_ids": state.recommendations.saved(&user.user_id).await,
    }))
}

pub async fn save_property(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<u32>,
) -> Result<HttpResponse, BookingError> {
    state
        .recommendations
        .save(&user.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "property_ids": state.recommendations.saved(&user.user_id).await,
    })))
}

pub async fn unsave_property(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<u32>,
) -> Result<HttpResponse, BookingError> {
    let property_id = path.into_inner();
    if state
        .recommendations
        .unsave(&user.user_id, property_id)
        .await
    {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(BookingError::NotFound(format!("Saved property {}", property_id)))
    }
}
