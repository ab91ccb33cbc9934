//! # Seed Data Generator
//!
//! Populates a development database with sample bookings.
//!
//! ## Usage
//! ```bash
//! # 60 bookings (default)
//! cargo run -p swarna-db --bin seed
//!
//! # Custom amount and location
//! cargo run -p swarna-db --bin seed -- --count 200 --db ./data/swarna.db
//! ```
//!
//! ## Generated Bookings
//! Stays are spread over the last few months across every room in the rate
//! card, with a mix of walk-ins, agents and OTA channels. Bookings in one room
//! are laid end to end, so the sample data has no double-bookings.

use chrono::{Days, Local, NaiveDateTime};
use std::collections::HashMap;
use std::env;
use swarna_core::booking::{prepare_booking, BookingDraft, RateCatalog};
use swarna_core::types::{IdType, PaymentMode, SourceSelection};
use swarna_db::{Database, DbConfig};

const GUESTS: &[(&str, &str)] = &[
    ("Asha Rao", "9800000101"),
    ("Vikram Singh", "9800000102"),
    ("Priya Nair", "9800000103"),
    ("Rahul Mehta", "9800000104"),
    ("Ananya Iyer", "9800000105"),
    ("Sara Khan", "9800000106"),
    ("Tom Becker", "9800000107"),
    ("Meera Das", "9800000108"),
    ("Arjun Patnaik", "9800000109"),
    ("Lena Fischer", "9800000110"),
];

const AGENTS: &[&str] = &["Ravi", "Sunita Travels", "Puri Tours"];
const CHANNELS: &[&str] = &["Booking.com", "Agoda", "MakeMyTrip", "Goibibo"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 60;
    let mut db_path = String::from("./swarna_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(60);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Swarna Villa Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of bookings to generate (default: 60)");
                println!("  -d, --db <PATH>    Database file path (default: ./swarna_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Swarna Villa Seed Data Generator");
    println!("===================================");
    println!("Database: {}", db_path);
    println!("Bookings: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.bookings().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} bookings", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let catalog = RateCatalog::new(db.rates().list().await?);
    if catalog.rooms().is_empty() {
        println!("⚠ Rate catalog is empty, nothing to book");
        return Ok(());
    }

    let start_day = Local::now()
        .date_naive()
        .checked_sub_days(Days::new(120))
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .ok_or("start date out of range")?;

    // Next free check-in per room.
    let mut next_free: HashMap<String, NaiveDateTime> = HashMap::new();
    let mut generated = 0;

    for seed in 0..count {
        let room = &catalog.rooms()[seed % catalog.rooms().len()];
        let check_in = *next_free.entry(room.room_no.clone()).or_insert(start_day);
        let draft = sample_draft(seed, &room.room_no, check_in, &catalog);

        let prepared = match prepare_booking(&draft, &[], None) {
            Ok(prepared) => prepared,
            Err(e) => {
                eprintln!("Skipping sample {}: {}", seed, e);
                continue;
            }
        };

        // One idle night between guests.
        let gap = prepared.booking.check_out.checked_add_days(Days::new(1));
        next_free.insert(room.room_no.clone(), gap.unwrap_or(prepared.booking.check_out));

        if let Err(e) = db.bookings().insert(&prepared.booking).await {
            eprintln!("Failed to insert sample {}: {}", seed, e);
            continue;
        }
        generated += 1;
    }

    println!();
    println!("✓ Generated {} bookings", generated);

    db.close().await;
    println!("✓ Seed complete!");
    Ok(())
}

/// Builds one sample booking form.
fn sample_draft(seed: usize, room: &str, check_in: NaiveDateTime, catalog: &RateCatalog) -> BookingDraft {
    let (name, mobile) = GUESTS[seed % GUESTS.len()];
    let days = 1 + (seed % 4) as i64;

    let mut draft = BookingDraft {
        name: name.to_string(),
        mobile: mobile.to_string(),
        id_type: IdType::Aadhar,
        id_number: format!("{:04} {:04} {:04}", seed, seed * 7 % 10_000, seed * 13 % 10_000),
        check_in: Some(check_in),
        days: Some(days),
        ..Default::default()
    };
    draft.select_room(room, catalog);

    match seed % 5 {
        0 | 1 => {
            draft.source = SourceSelection::walk_in();
            draft.payment_mode = PaymentMode::Cash;
            draft.advance = draft.rent;
        }
        2 => {
            draft.source = SourceSelection::agent(AGENTS[seed % AGENTS.len()]);
            draft.commission = draft.rent / 10;
            draft.payment_mode = PaymentMode::Upi;
            draft.payment_ref = format!("UPI{:06}", seed);
            draft.advance = draft.rent * days;
        }
        _ => {
            draft.source = SourceSelection::ota(CHANNELS[seed % CHANNELS.len()]);
            draft.commission = draft.rent * days * 15 / 100;
            draft.payment_mode = PaymentMode::Transfer;
            draft.payment_ref = format!("SEED-{:05}", seed);
        }
    }

    draft
}
