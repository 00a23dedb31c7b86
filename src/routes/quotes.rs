use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::BookingError;
use crate::models::bookings::DateRange;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub property_id: u32,
    pub room_id: u32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: Option<u32>,
}

/// Price breakdown for a room and date range, without starting a checkout
pub async fn create_quote(
    state: web::Data<AppState>,
    input: web::Json<QuoteRequest>,
) -> Result<HttpResponse, BookingError> {
    let input = input.into_inner();
    let property = state.properties.get(input.property_id).await?;
    let room = property
        .room(input.room_id)
        .ok_or_else(|| BookingError::NotFound(format!("Room {}", input.room_id)))?;

    let rate = room.rate();
    if let Some(guests) = input.guests {
        rate.admits(guests)?;
    }

    let quote = state
        .pricing
        .quote(&DateRange::new(input.check_in, input.check_out), &rate)?;
    Ok(HttpResponse::Ok().json(quote))
}
