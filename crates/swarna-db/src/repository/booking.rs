//! # Booking Repository
//!
//! The Booking Record Store.
//!
//! ## Reading Legacy Rows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Two Read Paths                                       │
//! │                                                                         │
//! │  bookings table (columns may hold anything an older install wrote)     │
//! │       │                                                                 │
//! │       ├──► list_all() / get_by_id() / find_by_field()                  │
//! │       │      every column CAST AS TEXT, then parsed leniently          │
//! │       │      rows whose stay dates cannot be read are skipped + warned │
//! │       │                                                                 │
//! │       └──► list_ledger()                                               │
//! │              raw text only, for the report aggregator, never skips     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## OTA Batches
//! `insert_ota_batch` runs inside one transaction and re-checks
//! `paymentRef` for every row before inserting it. Either the whole batch
//! commits or nothing does.

use sqlx::sqlite::Sqlite;
use sqlx::{Executor, FromRow, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use swarna_core::types::{
    format_timestamp, parse_lenient_amount, parse_timestamp, Booking, BookingSource, IdType,
    LedgerEntry, PaymentMode,
};

// =============================================================================
// Row Mapping
// =============================================================================

const BOOKING_COLUMNS: &str = r#"
    id,
    CAST(room AS TEXT)        AS room,
    CAST(name AS TEXT)        AS name,
    CAST(mobile AS TEXT)      AS mobile,
    CAST(email AS TEXT)       AS email,
    CAST(idType AS TEXT)      AS idType,
    CAST(idNumber AS TEXT)    AS idNumber,
    CAST(fileBase64 AS TEXT)  AS fileBase64,
    CAST(fileExt AS TEXT)     AS fileExt,
    CAST(checkIn AS TEXT)     AS checkIn,
    CAST(checkOut AS TEXT)    AS checkOut,
    CAST(days AS TEXT)        AS days,
    CAST(refBy AS TEXT)       AS refBy,
    CAST(commission AS TEXT)  AS commission,
    CAST(rent AS TEXT)        AS rent,
    CAST(advance AS TEXT)     AS advance,
    CAST(total AS TEXT)       AS total,
    CAST(due AS TEXT)         AS due,
    CAST(paymentMode AS TEXT) AS paymentMode,
    CAST(paymentRef AS TEXT)  AS paymentRef,
    CAST(createdAt AS TEXT)   AS createdAt
"#;

/// A `bookings` row exactly as stored.
#[derive(Debug, FromRow)]
#[sqlx(rename_all = "camelCase")]
struct BookingRow {
    id: i64,
    room: Option<String>,
    name: Option<String>,
    mobile: Option<String>,
    email: Option<String>,
    id_type: Option<String>,
    id_number: Option<String>,
    file_base64: Option<String>,
    file_ext: Option<String>,
    check_in: Option<String>,
    check_out: Option<String>,
    days: Option<String>,
    ref_by: Option<String>,
    commission: Option<String>,
    rent: Option<String>,
    advance: Option<String>,
    total: Option<String>,
    due: Option<String>,
    payment_mode: Option<String>,
    payment_ref: Option<String>,
    created_at: Option<String>,
}

fn amount(raw: &Option<String>) -> i64 {
    raw.as_deref().map(parse_lenient_amount).unwrap_or(0)
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

impl TryFrom<BookingRow> for Booking {
    type Error = String;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let check_in = row
            .check_in
            .as_deref()
            .and_then(parse_timestamp)
            .ok_or_else(|| format!("unreadable checkIn {:?}", row.check_in))?;
        let check_out = row
            .check_out
            .as_deref()
            .and_then(parse_timestamp)
            .ok_or_else(|| format!("unreadable checkOut {:?}", row.check_out))?;

        Ok(Booking {
            id: row.id,
            days: amount(&row.days).max(1),
            rent: amount(&row.rent),
            advance: amount(&row.advance),
            total: amount(&row.total),
            due: amount(&row.due),
            commission: amount(&row.commission),
            room: row.room.unwrap_or_default(),
            name: row.name.unwrap_or_default(),
            mobile: row.mobile.unwrap_or_default(),
            email: row.email.unwrap_or_default(),
            id_type: IdType::parse(row.id_type.as_deref().unwrap_or_default()),
            id_number: row.id_number.unwrap_or_default(),
            document_path: non_empty(row.file_base64),
            file_ext: non_empty(row.file_ext),
            check_in,
            check_out,
            ref_by: BookingSource::parse(row.ref_by.as_deref().unwrap_or_default()),
            payment_mode: PaymentMode::parse(row.payment_mode.as_deref().unwrap_or_default()),
            payment_ref: row.payment_ref.unwrap_or_default(),
            created_at: row.created_at.as_deref().and_then(parse_timestamp),
        })
    }
}

/// The columns the reports read, as text.
#[derive(Debug, FromRow)]
#[sqlx(rename_all = "camelCase")]
struct LedgerRow {
    ref_by: Option<String>,
    room: Option<String>,
    check_in: Option<String>,
    days: Option<String>,
    total: Option<String>,
    due: Option<String>,
    commission: Option<String>,
}

impl From<LedgerRow> for LedgerEntry {
    fn from(row: LedgerRow) -> Self {
        LedgerEntry {
            ref_by: row.ref_by.unwrap_or_default(),
            room: row.room.unwrap_or_default(),
            check_in: row.check_in.unwrap_or_default(),
            days: row.days.unwrap_or_default(),
            total: row.total.unwrap_or_default(),
            due: row.due.unwrap_or_default(),
            commission: row.commission.unwrap_or_default(),
        }
    }
}

fn decode_row(row: BookingRow) -> Option<Booking> {
    let id = row.id;
    match Booking::try_from(row) {
        Ok(booking) => Some(booking),
        Err(reason) => {
            warn!(id, %reason, "Skipping unreadable booking row");
            None
        }
    }
}

// =============================================================================
// Lookup Fields
// =============================================================================

/// Columns `find_by_field` may look up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingField {
    /// Returning-guest autofill.
    Mobile,
    /// OTA dedup.
    PaymentRef,
}

impl BookingField {
    fn column(&self) -> &'static str {
        match self {
            BookingField::Mobile => "mobile",
            BookingField::PaymentRef => "paymentRef",
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for booking database operations.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

/// Shared by single inserts and the OTA batch.
async fn insert_row<'e, E>(executor: E, booking: &Booking) -> DbResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO bookings (
            room, name, mobile, email, idType, idNumber, fileBase64, fileExt,
            checkIn, checkOut, days, refBy, commission, rent, advance,
            total, due, paymentMode, paymentRef
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8,
            ?9, ?10, ?11, ?12, ?13, ?14, ?15,
            ?16, ?17, ?18, ?19
        )
        "#,
    )
    .bind(&booking.room)
    .bind(&booking.name)
    .bind(&booking.mobile)
    .bind(&booking.email)
    .bind(booking.id_type.as_str())
    .bind(&booking.id_number)
    .bind(&booking.document_path)
    .bind(&booking.file_ext)
    .bind(format_timestamp(&booking.check_in))
    .bind(format_timestamp(&booking.check_out))
    .bind(booking.days)
    .bind(booking.ref_by.to_ref_by())
    .bind(booking.commission)
    .bind(booking.rent)
    .bind(booking.advance)
    .bind(booking.total)
    .bind(booking.due)
    .bind(booking.payment_mode.as_str())
    .bind(&booking.payment_ref)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

impl BookingRepository {
    /// Creates a new BookingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    /// Inserts a booking and returns the id the store assigned.
    ///
    /// `booking.id` and `booking.created_at` are ignored; the store sets both.
    pub async fn insert(&self, booking: &Booking) -> DbResult<i64> {
        debug!(room = %booking.room, name = %booking.name, "Inserting booking");

        let id = insert_row(&self.pool, booking).await?;

        info!(id, room = %booking.room, "Booking saved");
        Ok(id)
    }

    /// Replaces every editable column of booking `id`.
    ///
    /// `createdAt` is never touched.
    pub async fn update(&self, id: i64, booking: &Booking) -> DbResult<()> {
        debug!(id, "Updating booking");

        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                room = ?2, name = ?3, mobile = ?4, email = ?5,
                idType = ?6, idNumber = ?7, fileBase64 = ?8, fileExt = ?9,
                checkIn = ?10, checkOut = ?11, days = ?12, refBy = ?13,
                commission = ?14, rent = ?15, advance = ?16, total = ?17,
                due = ?18, paymentMode = ?19, paymentRef = ?20
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&booking.room)
        .bind(&booking.name)
        .bind(&booking.mobile)
        .bind(&booking.email)
        .bind(booking.id_type.as_str())
        .bind(&booking.id_number)
        .bind(&booking.document_path)
        .bind(&booking.file_ext)
        .bind(format_timestamp(&booking.check_in))
        .bind(format_timestamp(&booking.check_out))
        .bind(booking.days)
        .bind(booking.ref_by.to_ref_by())
        .bind(booking.commission)
        .bind(booking.rent)
        .bind(booking.advance)
        .bind(booking.total)
        .bind(booking.due)
        .bind(booking.payment_mode.as_str())
        .bind(&booking.payment_ref)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Booking", id));
        }

        Ok(())
    }

    /// Deletes booking `id`.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting booking");

        let result = sqlx::query("DELETE FROM bookings WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Booking", id));
        }

        info!(id, "Booking deleted");
        Ok(())
    }

    /// Every readable booking, newest id first.
    pub async fn list_all(&self) -> DbResult<Vec<Booking>> {
        let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY id DESC");
        let rows: Vec<BookingRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        let total = rows.len();
        let bookings: Vec<Booking> = rows.into_iter().filter_map(decode_row).collect();

        debug!(count = bookings.len(), skipped = total - bookings.len(), "Listed bookings");
        Ok(bookings)
    }

    /// Gets a booking by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Booking>> {
        let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1");
        let row: Option<BookingRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.and_then(decode_row))
    }

    /// Most recent booking whose `field` equals `value`.
    ///
    /// A blank `value` never matches.
    pub async fn find_by_field(&self, field: BookingField, value: &str) -> DbResult<Option<Booking>> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }

        debug!(field = field.column(), value, "Looking up booking");

        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE {} = ?1 ORDER BY id DESC",
            field.column()
        );
        let rows: Vec<BookingRow> = sqlx::query_as(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().find_map(decode_row))
    }

    /// The text of the report columns for every row, newest first.
    pub async fn list_ledger(&self) -> DbResult<Vec<LedgerEntry>> {
        let rows: Vec<LedgerRow> = sqlx::query_as(
            r#"
            SELECT
                CAST(refBy AS TEXT)      AS refBy,
                CAST(room AS TEXT)       AS room,
                CAST(checkIn AS TEXT)    AS checkIn,
                CAST(days AS TEXT)       AS days,
                CAST(total AS TEXT)      AS total,
                CAST(due AS TEXT)        AS due,
                CAST(commission AS TEXT) AS commission
            FROM bookings
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LedgerEntry::from).collect())
    }

    /// Counts stored bookings (for diagnostics and the seeder).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Inserts a batch of OTA bookings atomically.
    ///
    /// Rows whose `payment_ref` is already stored (including earlier rows
    /// of this batch) are skipped. Returns how many rows were inserted.
    ///
    /// ## Atomicity
    /// ```text
    /// BEGIN
    ///   for each booking:
    ///     SELECT id FROM bookings WHERE paymentRef = ?   → present? skip
    ///     INSERT INTO bookings ...                       → error? ROLLBACK
    /// COMMIT
    /// ```
    pub async fn insert_ota_batch(&self, bookings: &[Booking]) -> DbResult<usize> {
        if bookings.is_empty() {
            return Ok(0);
        }

        debug!(count = bookings.len(), "Inserting OTA batch");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut inserted = 0;
        for booking in bookings {
            let payment_ref = booking.payment_ref.trim();
            if !payment_ref.is_empty() {
                let existing: Option<i64> =
                    sqlx::query_scalar("SELECT id FROM bookings WHERE paymentRef = ?1 LIMIT 1")
                        .bind(payment_ref)
                        .fetch_optional(&mut *tx)
                        .await?;

                if let Some(existing_id) = existing {
                    debug!(payment_ref, existing_id, "Reservation already stored");
                    continue;
                }
            }

            // An error here drops `tx`, which rolls the whole batch back.
            insert_row(&mut *tx, booking).await?;
            inserted += 1;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(inserted, offered = bookings.len(), "OTA batch committed");
        Ok(inserted)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
