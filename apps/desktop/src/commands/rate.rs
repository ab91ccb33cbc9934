//! # Rate Catalog Commands
//!
//! Admin screen for rooms and their nightly rates. A rate change applies to
//! bookings made afterwards; saved bookings keep the rent they were made at.

use tracing::info;

use crate::error::ApiError;
use crate::state::DbState;
use swarna_core::booking::RateCatalog;
use swarna_core::validation::validate_room_rate;
use swarna_core::RoomRate;

pub async fn list_rates(db: &DbState) -> Result<Vec<RoomRate>, ApiError> {
    Ok(db.inner().rates().list().await?)
}

/// Room types in catalog order, for the "Unassigned (Type)" picker.
pub async fn list_room_types(db: &DbState) -> Result<Vec<String>, ApiError> {
    let catalog = RateCatalog::new(db.inner().rates().list().await?);
    Ok(catalog.room_types().into_iter().map(str::to_string).collect())
}

pub async fn add_rate(db: &DbState, rate: RoomRate) -> Result<(), ApiError> {
    validate_room_rate(&rate)?;
    db.inner().rates().insert(&rate).await?;
    Ok(())
}

pub async fn update_rate(db: &DbState, rate: RoomRate) -> Result<(), ApiError> {
    validate_room_rate(&rate)?;
    db.inner().rates().update(&rate).await?;
    info!(room_no = %rate.room_no, rate = rate.rate, "Room rate updated");
    Ok(())
}

pub async fn delete_rate(db: &DbState, room_no: String) -> Result<(), ApiError> {
    Ok(db.inner().rates().delete(&room_no).await?)
}
