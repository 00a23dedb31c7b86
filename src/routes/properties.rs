use actix_web::{web, HttpResponse};
use serde_json::{json, Map};

use crate::error::BookingError;
use crate::models::analytics::FunnelStep;
use crate::middleware::auth_context::MaybeUser;
use crate::models::search::{ReviewQuery, SearchQuery};
use crate::state::AppState;

pub async fn search_properties(
    state: web::Data<AppState>,
    user: MaybeUser,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, BookingError> {
    let query = query.into_inner();
    let listings = state.properties.search(&query).await?;

    state
        .analytics
        .track_search(
            query.location.as_deref().unwrap_or(""),
            listings.len(),
            json!(query),
            user.0.as_deref(),
        )
        .await;

    Ok(HttpResponse::Ok().json(listings))
}

pub async fn get_property(
    state: web::Data<AppState>,
    user: MaybeUser,
    path: web::Path<u32>,
) -> Result<HttpResponse, BookingError> {
    let property = state.properties.get(path.into_inner()).await?;

    let mut extra = Map::new();
    extra.insert("property_id".to_string(), json!(property.id));
    state
        .analytics
        .track_booking_funnel(FunnelStep::PropertyView, user.0.as_deref(), extra)
        .await;

    Ok(HttpResponse::Ok().json(property.listing()))
}

pub async fn list_reviews(
    state: web::Data<AppState>,
    path: web::Path<u32>,
    query: web::Query<ReviewQuery>,
) -> Result<HttpResponse, BookingError> {
    let reviews = state.properties.reviews(path.into_inner(), &query).await?;
    Ok(HttpResponse::Ok().json(reviews))
}
