//! # Swarna Desktop Entry Point
//!
//! Headless front-desk runner. The windowed shell links the library
//! directly; this binary exposes the same commands for the back office and
//! scheduled jobs.
//!
//! ## Usage
//! ```bash
//! swarna-desktop status            # database, bookings, last OTA sync
//! swarna-desktop sync              # pull OTA reservations once
//! swarna-desktop report 2025       # dashboard figures for a year
//! swarna-desktop report 2025-03    # ... or a single month
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load config.toml and ota.toml
//! 3. Determine database path, connect and migrate
//! 4. Run the requested command, then close the pool

use std::env;
use std::error::Error;

use swarna_core::report::ReportPeriod;
use swarna_desktop_lib::{commands, init_tracing, AppContext};

const USAGE: &str = "Usage: swarna-desktop <status | sync | report [YYYY | YYYY-MM]>";

fn parse_period(raw: &str) -> Option<ReportPeriod> {
    match raw.split_once('-') {
        Some((year, month)) => {
            let month: u32 = month.parse().ok().filter(|m| (1..=12).contains(m))?;
            Some(ReportPeriod::Month {
                year: year.parse().ok()?,
                month,
            })
        }
        None => Some(ReportPeriod::Year {
            year: raw.parse().ok()?,
        }),
    }
}

async fn status(ctx: &AppContext) -> Result<(), Box<dyn Error>> {
    let db = ctx.db.inner();
    let (total, applied) = db.migration_status().await?;
    let config = commands::get_config(&ctx.config, ctx.mailer.as_ref());
    let sync = commands::get_sync_status(&ctx.sync);

    println!("🏨 {}", config.hotel_name);
    println!("   Database:    {}", if db.health_check().await { "ok" } else { "unreachable" });
    println!("   Migrations:  {}/{}", applied, total);
    println!("   Bookings:    {}", db.bookings().count().await?);
    println!("   Rooms:       {}", commands::list_rates(&ctx.db).await?.len());
    println!("   OTA channels: {}", sync.channels.join(", "));
    println!("   ID scans:    {}", ctx.docs.root().display());
    println!(
        "   Email:       {}",
        if config.email_enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}

async fn sync(ctx: &AppContext) -> Result<(), Box<dyn Error>> {
    let outcome = commands::sync_ota_bookings(&ctx.sync).await?;
    println!("✅ {}", outcome.summary);
    for rejected in &outcome.report.rejected {
        println!(
            "   ⚠️  {} {}: {}",
            rejected.source_platform, rejected.external_id, rejected.reason
        );
    }
    Ok(())
}

async fn report(ctx: &AppContext, period: Option<ReportPeriod>) -> Result<(), Box<dyn Error>> {
    let report = commands::get_report(&ctx.db, period).await?;
    let money = |units| commands::format_currency(&ctx.config, units);
    let s = &report.summary;

    println!("📊 {} bookings", s.total_bookings);
    println!("   Revenue:     {}", money(s.total_revenue));
    println!("   Due:         {}", money(s.total_due));
    println!("   Commission:  {}", money(s.total_commission));
    println!("   Net profit:  {}", money(s.net_profit));
    if s.overpaid_bookings > 0 {
        println!("   Overpaid:    {}", s.overpaid_bookings);
    }

    println!();
    println!("   By source:");
    for share in &report.source_breakdown {
        println!("     {:<24} {}", share.source, share.count);
    }

    println!();
    println!("   By agent / channel:");
    for agent in &report.agent_performance {
        println!(
            "     {:<24} {:>4}  {:>12}  commission {}",
            agent.ref_by,
            agent.bookings,
            money(agent.revenue),
            money(agent.commission)
        );
    }

    println!();
    println!("   Rooms:");
    for room in &report.occupancy {
        println!("     {:<28} {:>4} nights  {}", room.room, room.nights, money(room.revenue));
    }
    Ok(())
}

/// What the command line asked for, checked before anything is opened.
enum Command {
    Status,
    Sync,
    Report(Option<ReportPeriod>),
}

fn parse_command(args: &[String]) -> Result<Command, String> {
    match (args.get(1).map(String::as_str), args.get(2)) {
        (None, _) | (Some("status"), _) => Ok(Command::Status),
        (Some("sync"), _) => Ok(Command::Sync),
        (Some("report"), None) => Ok(Command::Report(None)),
        (Some("report"), Some(raw)) => parse_period(raw)
            .map(|p| Command::Report(Some(p)))
            .ok_or_else(|| format!("Invalid period '{}'. {}", raw, USAGE)),
        (Some(other), _) => Err(format!("Unknown command '{}'. {}", other, USAGE)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    if matches!(args.get(1).map(String::as_str), Some("--help" | "-h")) {
        println!("{}", USAGE);
        return Ok(());
    }
    let command = parse_command(&args)?;

    init_tracing();
    let ctx = AppContext::bootstrap().await?;

    let result = match command {
        Command::Status => status(&ctx).await,
        Command::Sync => sync(&ctx).await,
        Command::Report(period) => report(&ctx, period).await,
    };

    ctx.shutdown().await;
    result
}
