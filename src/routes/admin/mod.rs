use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::BookingError;
use crate::middleware::auth::AuthMiddleware;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::middleware::role_auth::RequirePermission;
use crate::models::account::{Permission, User, UserRole};
use crate::models::property::PropertyDraft;
use crate::models::search::{PropertyFilter, UserFilter};
use crate::services::access_service::{all_roles, filter_users};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateRoleResponse {
    pub success: bool,
    pub message: String,
    pub user: User,
}

pub async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<UserFilter>,
) -> Result<HttpResponse, BookingError> {
    let users = filter_users(state.users.list().await?, &query)?;
    Ok(HttpResponse::Ok().json(users))
}

pub async fn update_user_role(
    state: web::Data<AppState>,
    admin: AuthenticatedUser,
    path: web::Path<String>,
    input: web::Json<UpdateRoleRequest>,
) -> Result<HttpResponse, BookingError> {
    let role = admin.capabilities.authorize_role_change(&input.role)?;
    let user_id = path.into_inner();

    let user = state
        .users
        .update_role(&user_id, role)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("User {}", user_id)))?;

    log::info!("{} changed role of {} to {}", admin.user_id, user_id, role);
    Ok(HttpResponse::Ok().json(UpdateRoleResponse {
        success: true,
        message: format!("User role updated to {}", role.display_name()),
        user,
    }))
}

pub async fn list_roles() -> HttpResponse {
    HttpResponse::Ok().json(all_roles())
}

pub async fn list_all_bookings(
    state: web::Data<AppState>,
    admin: AuthenticatedUser,
) -> Result<HttpResponse, BookingError> {
    let bookings = state.bookings.list_all(&admin.capabilities).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

pub async fn list_properties(
    state: web::Data<AppState>,
    query: web::Query<PropertyFilter>,
) -> Result<HttpResponse, BookingError> {
    Ok(HttpResponse::Ok().json(state.properties.manage(&query).await?))
}

pub async fn create_property(
    state: web::Data<AppState>,
    admin: AuthenticatedUser,
    input: web::Json<PropertyDraft>,
) -> Result<HttpResponse, BookingError> {
    let property = state
        .properties
        .create(&admin.capabilities, input.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(property))
}

pub async fn update_property(
    state: web::Data<AppState>,
    admin: AuthenticatedUser,
    path: web::Path<u32>,
    input: web::Json<PropertyDraft>,
) -> Result<HttpResponse, BookingError> {
    let property = state
        .properties
        .update(&admin.capabilities, path.into_inner(), input.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(property))
}

pub async fn delete_property(
    state: web::Data<AppState>,
    admin: AuthenticatedUser,
    path: web::Path<u32>,
) -> Result<HttpResponse, BookingError> {
    state
        .properties
        .delete(&admin.capabilities, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[derive(Debug, Deserialize)]
pub struct ReminderQuery {
    pub days: Option<i64>,
}

pub const REMINDER_WINDOW_DAYS: i64 = 7;

pub async fn send_reminders(
    state: web::Data<AppState>,
    admin: AuthenticatedUser,
    query: web::Query<ReminderQuery>,
) -> Result<HttpResponse, BookingError> {
    let days = query.days.unwrap_or(REMINDER_WINDOW_DAYS);
    if days < 1 {
        return Err(BookingError::BadRequest(
            "Reminder window must be at least one day".to_string(),
        ));
    }
    let sent = state
        .bookings
        .send_reminders(&admin.capabilities, Utc::now().date_naive(), days)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "sent": sent })))
}

#[derive(Debug, Deserialize)]
pub struct PromotionRequest {
    pub title: String,
    pub message: String,
    /// Only users with this role; everyone when absent
    pub role: Option<String>,
}

/// Users who have opted out of promotional offers are skipped.
pub async fn send_promotion(
    state: web::Data<AppState>,
    admin: AuthenticatedUser,
    input: web::Json<PromotionRequest>,
) -> Result<HttpResponse, BookingError> {
    let input = input.into_inner();
    if input.title.trim().is_empty() || input.message.trim().is_empty() {
        return Err(BookingError::BadRequest(
            "Promotion title and message are required".to_string(),
        ));
    }
    let role = input
        .role
        .as_deref()
        .map(str::parse::<UserRole>)
        .transpose()
        .map_err(BookingError::BadRequest)?;

    let mut sent = 0;
    for user in state.users.list().await? {
        if role.map_or(false, |r| user.role != r) {
            continue;
        }
        if state
            .notifications
            .send_promotional_offer(&user.id, input.title.trim(), input.message.trim())
            .await
            .is_some()
        {
            sent += 1;
        }
    }
    log::info!("{} sent promotion {:?} to {} users", admin.user_id, input.title, sent);
    Ok(HttpResponse::Ok().json(json!({ "sent": sent })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AuthMiddleware)
            .service(
                web::scope("/users")
                    .wrap(RequirePermission::new(Permission::UsersRead))
                    .route("", web::get().to(list_users))
                    .route("/{id}/role", web::put().to(update_user_role)),
            )
            .service(
                web::resource("/roles")
                    .wrap(RequirePermission::new(Permission::RolesRead))
                    .route(web::get().to(list_roles)),
            )
            .service(
                web::scope("/bookings")
                    .wrap(RequirePermission::new(Permission::BookingsRead))
                    .route("", web::get().to(list_all_bookings))
                    .route("/reminders", web::post().to(send_reminders)),
            )
            .service(
                // create, update and delete check their own permission
                web::scope("/properties")
                    .wrap(RequirePermission::new(Permission::PropertiesRead))
                    .route("", web::get().to(list_properties))
                    .route("", web::post().to(create_property))
                    .route("/{id}", web::put().to(update_property))
                    .route("/{id}", web::delete().to(delete_property)),
            )
            .service(
                web::resource("/promotions")
                    .wrap(RequirePermission::new(Permission::SettingsUpdate))
                    .route(web::post().to(send_promotion)),
            ),
    );
}
