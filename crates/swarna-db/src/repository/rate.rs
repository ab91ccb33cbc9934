//! # Rate Repository
//!
//! The room rate catalog, keyed by room number.
//!
//! Bookings copy the rate when they are saved, so editing or deleting a rate
//! here never changes an existing booking.

use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use swarna_core::types::RoomRate;

#[derive(Debug, FromRow)]
struct RateRow {
    room_no: String,
    room_type: String,
    rate: i64,
}

impl From<RateRow> for RoomRate {
    fn from(row: RateRow) -> Self {
        RoomRate {
            room_no: row.room_no,
            room_type: row.room_type,
            rate: row.rate,
        }
    }
}

/// Repository for the `rates` table.
#[derive(Debug, Clone)]
pub struct RateRepository {
    pool: SqlitePool,
}

impl RateRepository {
    /// Creates a new RateRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RateRepository { pool }
    }

    /// Every room, ordered by room number.
    pub async fn list(&self) -> DbResult<Vec<RoomRate>> {
        let rows: Vec<RateRow> =
            sqlx::query_as("SELECT room_no, room_type, rate FROM rates ORDER BY room_no")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(RoomRate::from).collect())
    }

    pub async fn get(&self, room_no: &str) -> DbResult<Option<RoomRate>> {
        let row: Option<RateRow> =
            sqlx::query_as("SELECT room_no, room_type, rate FROM rates WHERE room_no = ?1")
                .bind(room_no.trim())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(RoomRate::from))
    }

    /// Adds a room.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - The room number is already listed
    pub async fn insert(&self, rate: &RoomRate) -> DbResult<()> {
        let room_no = rate.room_no.trim();
        debug!(room_no, "Inserting room rate");

        sqlx::query("INSERT INTO rates (room_no, room_type, rate) VALUES (?1, ?2, ?3)")
            .bind(room_no)
            .bind(rate.room_type.trim())
            .bind(rate.rate)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from(e).with_value(room_no))?;

        info!(room_no, rate = rate.rate, "Room added to catalog");
        Ok(())
    }

    /// Changes the type and rate of an existing room.
    pub async fn update(&self, rate: &RoomRate) -> DbResult<()> {
        let room_no = rate.room_no.trim();
        debug!(room_no, "Updating room rate");

        let result = sqlx::query("UPDATE rates SET room_type = ?2, rate = ?3 WHERE room_no = ?1")
            .bind(room_no)
            .bind(rate.room_type.trim())
            .bind(rate.rate)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Room", room_no));
        }

        Ok(())
    }

    /// Removes a room from the catalog.
    pub async fn delete(&self, room_no: &str) -> DbResult<()> {
        let room_no = room_no.trim();
        debug!(room_no, "Deleting room rate");

        let result = sqlx::query("DELETE FROM rates WHERE room_no = ?1")
            .bind(room_no)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Room", room_no));
        }

        info!(room_no, "Room removed from catalog");
        Ok(())
    }
}
