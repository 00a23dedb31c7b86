use actix_web::{web, HttpResponse};

use crate::error::BookingError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::state::AppState;

pub async fn list_bookings(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, BookingError> {
    let bookings = state.bookings.list_own(&user.capabilities).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

pub async fn get_booking(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, BookingError> {
    let booking = state.bookings.get(&user.capabilities, &path).await?;
    Ok(HttpResponse::Ok().json(booking))
}

pub async fn cancel_booking(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, BookingError> {
    let booking = state.bookings.cancel(&user.capabilities, &path).await?;
    Ok(HttpResponse::Ok().json(booking))
}
