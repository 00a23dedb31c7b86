use actix_web::{web, HttpResponse};
use chrono::Utc;
use uuid::Uuid;

use crate::error::BookingError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::checkout::{GuestForm, PaymentForm, StaySelection};
use crate::state::AppState;

pub async fn start_checkout(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    input: web::Json<StaySelection>,
) -> Result<HttpResponse, BookingError> {
    let view = state
        .checkout
        .start(&user.user_id, input.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(view))
}

pub async fn get_checkout(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, BookingError> {
    let view = state.checkout.get(path.into_inner(), &user.user_id).await?;
    Ok(HttpResponse::Ok().json(view))
}

pub async fn update_guest(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    input: web::Json<GuestForm>,
) -> Result<HttpResponse, BookingError> {
    let view = state
        .checkout
        .update_guest(path.into_inner(), &user.user_id, input.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

pub async fn update_payment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    input: web::Json<PaymentForm>,
) -> Result<HttpResponse, BookingError> {
    let view = state
        .checkout
        .update_payment(
            path.into_inner(),
            &user.user_id,
            input.into_inner(),
            Utc::now().date_naive(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

pub async fn advance(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, BookingError> {
    let view = state
        .checkout
        .advance(path.into_inner(), &user.user_id, Utc::now().date_naive())
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

pub async fn back(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, BookingError> {
    let view = state.checkout.back(path.into_inner(), &user.user_id).await?;
    Ok(HttpResponse::Ok().json(view))
}

pub async fn abandon(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, BookingError> {
    let id = path.into_inner();
    if state.checkout.abandon(id, &user.user_id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(BookingError::NotFound(format!("Checkout {}", id)))
    }
}
