use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::BookingError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::notification::NotificationPreferences;
use crate::state::AppState;

pub async fn list_notifications(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> HttpResponse {
    let notifications = state.notifications.list(&user.user_id).await;
    let unread_count = notifications.iter().filter(|n| !n.read).count();
    HttpResponse::Ok().json(json!({
        "notifications": notifications,
        "unread_count": unread_count,
    }))
}

pub async fn mark_read(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<u64>,
) -> Result<HttpResponse, BookingError> {
    let id = path.into_inner();
    if !state.notifications.mark_read(&user.user_id, id).await {
        return Err(BookingError::NotFound(format!("Notification {}", id)));
    }
    Ok(HttpResponse::Ok().json(json!({
        "unread_count": state.notifications.unread_count(&user.user_id).await,
    })))
}

pub async fn mark_all_read(state: web::Data<AppState>, user: AuthenticatedUser) -> HttpResponse {
    state.notifications.mark_all_read(&user.user_id).await;
    HttpResponse::Ok().json(json!({ "unread_count": 0 }))
}

pub async fn delete_notification(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<u64>,
) -> Result<HttpResponse, BookingError> {
    let id = path.into_inner();
    if state.notifications.delete(&user.user_id, id).await {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(BookingError::NotFound(format!("Notification {}", id)))
    }
}

pub async fn clear_notifications(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> HttpResponse {
    state.notifications.clear(&user.user_id).await;
    HttpResponse::NoContent().finish()
}

pub async fn get_preferences(state: web::Data<AppState>, user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(state.notifications.preferences(&user.user_id).await)
}

pub async fn update_preferences(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    input: web::Json<NotificationPreferences>,
) -> HttpResponse {
    let preferences = input.into_inner();
    state
        .notifications
        .update_preferences(&user.user_id, preferences)
        .await;
    HttpResponse::Ok().json(preferences)
}
