//! # Reporting Aggregator
//!
//! Folds the booking ledger into the dashboard views. Reads only.
//!
//! ## Views
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           aggregate()                                   │
//! │                                                                         │
//! │  &[LedgerEntry] ──┬──► summary            every row                    │
//! │                   ├──► monthly_series     rows with a readable checkIn │
//! │                   ├──► source_breakdown   every row, "OTA - x" → "OTA" │
//! │                   ├──► agent_performance  rows in period, full refBy   │
//! │                   └──► occupancy          rows in period, per room     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Malformed Rows
//! Numeric columns are read with [`parse_lenient_amount`]: `"6000"` is 6000,
//! `"12abc"` is 12, `"n/a"` is 0. A bad row is counted, never fatal. Sums
//! saturate, so absurd values like `"9e18"` pin a total at `i64::MAX`.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{parse_lenient_amount, parse_timestamp, unassigned_room_type, LedgerEntry};

const SOURCE_SEPARATOR: &str = " - ";
const DIRECT_SOURCE: &str = "Direct";

// =============================================================================
// Period
// =============================================================================

/// Restricts the per-agent and per-room views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReportPeriod {
    Year { year: i32 },
    Month { year: i32, month: u32 },
}

impl ReportPeriod {
    pub fn contains(&self, at: &NaiveDateTime) -> bool {
        match *self {
            ReportPeriod::Year { year } => at.year() == year,
            ReportPeriod::Month { year, month } => at.year() == year && at.month() == month,
        }
    }
}

// =============================================================================
// Report Shapes
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_bookings: usize,
    pub total_revenue: i64,
    pub total_due: i64,
    pub total_commission: i64,
    /// Revenue minus commission.
    pub net_profit: i64,
    /// Bookings whose advance exceeds the total.
    pub overpaid_bookings: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    /// `YYYY-MM`.
    pub period: String,
    pub bookings: usize,
    pub revenue: i64,
    pub commission: i64,
    pub profit: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SourceShare {
    pub source: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AgentPerformance {
    /// The full `refBy` string.
    pub ref_by: String,
    pub bookings: usize,
    pub revenue: i64,
    pub commission: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RoomOccupancy {
    /// Room number, or the bare type for unassigned OTA bookings.
    pub room: String,
    pub bookings: usize,
    pub nights: i64,
    pub revenue: i64,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub summary: ReportSummary,
    pub monthly_series: Vec<MonthlyPoint>,
    pub source_breakdown: Vec<SourceShare>,
    pub agent_performance: Vec<AgentPerformance>,
    pub occupancy: Vec<RoomOccupancy>,
}

// =============================================================================
// Grouping Keys
// =============================================================================

/// Source bucket: the part of `refBy` before the first `" - "`.
///
/// ```rust
/// use swarna_core::report::source_key;
///
/// assert_eq!(source_key("OTA - Agoda"), "OTA");
/// assert_eq!(source_key("Walk-in"), "Walk-in");
/// assert_eq!(source_key(""), "Direct");
/// ```
pub fn source_key(ref_by: &str) -> &str {
    if ref_by.is_empty() {
        return DIRECT_SOURCE;
    }
    ref_by
        .split_once(SOURCE_SEPARATOR)
        .map_or(ref_by, |(prefix, _)| prefix)
}

fn agent_key(ref_by: &str) -> &str {
    if ref_by.is_empty() {
        DIRECT_SOURCE
    } else {
        ref_by
    }
}

/// Occupancy bucket: `"Unassigned (Deluxe)"` is reported as `"Deluxe"`.
fn room_key(room: &str) -> &str {
    let room = room.trim();
    unassigned_room_type(room).unwrap_or(room)
}

// =============================================================================
// Aggregate
// =============================================================================

/// One ledger row with its numbers read.
struct Row<'a> {
    entry: &'a LedgerEntry,
    check_in: Option<NaiveDateTime>,
    nights: i64,
    total: i64,
    due: i64,
    commission: i64,
}

impl<'a> From<&'a LedgerEntry> for Row<'a> {
    fn from(entry: &'a LedgerEntry) -> Self {
        Row {
            entry,
            check_in: parse_timestamp(&entry.check_in),
            nights: parse_lenient_amount(&entry.days),
            total: parse_lenient_amount(&entry.total),
            due: parse_lenient_amount(&entry.due),
            commission: parse_lenient_amount(&entry.commission),
        }
    }
}

impl Row<'_> {
    fn in_period(&self, period: Option<ReportPeriod>) -> bool {
        match (period, &self.check_in) {
            (None, _) => true,
            (Some(p), Some(at)) => p.contains(at),
            (Some(_), None) => false,
        }
    }
}

/// Builds every dashboard view in one pass over the ledger.
///
/// `period` narrows `agent_performance` and `occupancy`; the summary, the
/// monthly series and the source breakdown always cover everything.
pub fn aggregate(entries: &[LedgerEntry], period: Option<ReportPeriod>) -> Report {
    let rows: Vec<Row<'_>> = entries.iter().map(Row::from).collect();

    let mut summary = ReportSummary {
        total_bookings: rows.len(),
        ..Default::default()
    };
    let mut monthly: BTreeMap<String, MonthlyPoint> = BTreeMap::new();
    let mut sources: HashMap<&str, usize> = HashMap::new();
    let mut agents: HashMap<&str, AgentPerformance> = HashMap::new();
    let mut rooms: HashMap<&str, RoomOccupancy> = HashMap::new();

    for row in &rows {
        let entry = row.entry;
        summary.total_revenue = summary.total_revenue.saturating_add(row.total);
        summary.total_due = summary.total_due.saturating_add(row.due);
        summary.total_commission = summary.total_commission.saturating_add(row.commission);
        if row.due < 0 {
            summary.overpaid_bookings += 1;
        }

        if let Some(at) = row.check_in {
            let key = format!("{:04}-{:02}", at.year(), at.month());
            let point = monthly.entry(key.clone()).or_insert_with(|| MonthlyPoint {
                period: key,
                ..Default::default()
            });
            point.bookings += 1;
            point.revenue = point.revenue.saturating_add(row.total);
            point.commission = point.commission.saturating_add(row.commission);
            point.profit = point.profit.saturating_add(row.total.saturating_sub(row.commission));
        }

        *sources.entry(source_key(&entry.ref_by)).or_default() += 1;

        if !row.in_period(period) {
            continue;
        }

        let ref_by = agent_key(&entry.ref_by);
        let agent = agents.entry(ref_by).or_insert_with(|| AgentPerformance {
            ref_by: ref_by.to_string(),
            ..Default::default()
        });
        agent.bookings += 1;
        agent.revenue = agent.revenue.saturating_add(row.total);
        agent.commission = agent.commission.saturating_add(row.commission);

        let room = room_key(&entry.room);
        let occupancy = rooms.entry(room).or_insert_with(|| RoomOccupancy {
            room: room.to_string(),
            ..Default::default()
        });
        occupancy.bookings += 1;
        occupancy.nights = occupancy.nights.saturating_add(row.nights);
        occupancy.revenue = occupancy.revenue.saturating_add(row.total);
    }

    summary.net_profit = summary.total_revenue.saturating_sub(summary.total_commission);

    let mut source_breakdown: Vec<SourceShare> = sources
        .into_iter()
        .map(|(source, count)| SourceShare {
            source: source.to_string(),
            count,
        })
        .collect();
    source_breakdown.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.source.cmp(&b.source)));

    let mut agent_performance: Vec<AgentPerformance> = agents.into_values().collect();
    agent_performance
        .sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.ref_by.cmp(&b.ref_by)));

    let mut occupancy: Vec<RoomOccupancy> = rooms.into_values().collect();
    occupancy.sort_by(|a, b| b.nights.cmp(&a.nights).then_with(|| a.room.cmp(&b.room)));

    Report {
        summary,
        monthly_series: monthly.into_values().collect(),
        source_breakdown,
        agent_performance,
        occupancy,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ref_by: &str, room: &str, check_in: &str, days: &str, total: &str, commission: &str) -> LedgerEntry {
        LedgerEntry {
            ref_by: ref_by.into(),
            room: room.into(),
            check_in: check_in.into(),
            days: days.into(),
            total: total.into(),
            due: "0".into(),
            commission: commission.into(),
        }
    }

    fn ledger() -> Vec<LedgerEntry> {
        vec![
            entry("Walk-in", "101", "2025-01-05T12:00:00", "2", "6000", "0"),
            entry("OTA - Agoda", "Unassigned (Deluxe)", "2025-01-20T12:00:00", "3", "6000", "600"),
            entry("Agent - Ravi", "102", "2025-02-01T12:00:00", "1", "3000", "300"),
            entry("OTA - Booking.com", "101", "2025-02-10T12:00:00", "4", "12000", "1200"),
            entry("", "201", "2024-12-31T12:00:00", "1", "5000", "0"),
        ]
    }

    #[test]
    fn test_summary_totals() {
        let report = aggregate(&ledger(), None);
        let s = &report.summary;
        assert_eq!(s.total_bookings, 5);
        assert_eq!(s.total_revenue, 32000);
        assert_eq!(s.total_commission, 2100);
        assert_eq!(s.net_profit, 29900);
    }

    #[test]
    fn test_non_numeric_total_counts_as_zero() {
        let mut rows = ledger();
        rows.push(entry("Walk-in", "102", "2025-01-07T12:00:00", "1", "abc", "xyz"));
        rows.push(entry("Walk-in", "102", "2025-01-08T12:00:00", "", "", ""));

        let report = aggregate(&rows, None);
        assert_eq!(report.summary.total_bookings, 7);
        assert_eq!(report.summary.total_revenue, 32000);
        assert_eq!(report.summary.net_profit, 29900);
    }

    #[test]
    fn test_huge_values_saturate() {
        let rows = vec![
            entry("Walk-in", "101", "2025-01-05T12:00:00", "1", "9e18", "0"),
            entry("Walk-in", "101", "2025-01-06T12:00:00", "1", "9e18", "0"),
            entry("Walk-in", "102", "2025-01-07T12:00:00", "1e300", "1000", "-9e18"),
            entry("Walk-in", "102", "2025-01-08T12:00:00", "2", "1000", "-9e18"),
        ];
        let report = aggregate(&rows, None);
        assert_eq!(report.summary.total_revenue, i64::MAX);
        assert_eq!(report.summary.net_profit, i64::MAX);
        assert_eq!(report.monthly_series[0].revenue, i64::MAX);

        let nights: Vec<(&str, i64)> = report
            .occupancy
            .iter()
            .map(|o| (o.room.as_str(), o.nights))
            .collect();
        assert_eq!(nights, [("102", i64::MAX), ("101", 2)]);
    }

    #[test]
    fn test_lenient_prefix_parse() {
        let rows = vec![entry("Walk-in", "101", "2025-01-05T12:00:00", "2 nights", "12abc", "1.6")];
        let report = aggregate(&rows, None);
        assert_eq!(report.summary.total_revenue, 12);
        assert_eq!(report.summary.total_commission, 2);
        assert_eq!(report.occupancy[0].nights, 2);
    }

    #[test]
    fn test_source_prefix_versus_full_agent_key() {
        let report = aggregate(&ledger(), None);

        let ota = report
            .source_breakdown
            .iter()
            .find(|s| s.source == "OTA")
            .unwrap();
        assert_eq!(ota.count, 2);
        assert!(report.source_breakdown.iter().all(|s| s.source != "OTA - Agoda"));
        assert!(report.source_breakdown.iter().any(|s| s.source == "Direct"));

        assert!(report
            .agent_performance
            .iter()
            .any(|a| a.ref_by == "OTA - Agoda" && a.revenue == 6000));
        assert!(report.agent_performance.iter().all(|a| a.ref_by != "OTA"));
    }

    #[test]
    fn test_breakdown_ordering() {
        let report = aggregate(&ledger(), None);
        let sources: Vec<&str> = report
            .source_breakdown
            .iter()
            .map(|s| s.source.as_str())
            .collect();
        assert_eq!(sources, vec!["OTA", "Agent", "Direct", "Walk-in"]);

        assert_eq!(report.agent_performance[0].ref_by, "OTA - Booking.com");
        assert_eq!(report.agent_performance[0].revenue, 12000);
    }

    #[test]
    fn test_monthly_series_sorted_and_skips_bad_dates() {
        let mut rows = ledger();
        rows.push(entry("Walk-in", "101", "someday", "1", "999", "0"));

        let report = aggregate(&rows, None);
        let keys: Vec<&str> = report
            .monthly_series
            .iter()
            .map(|p| p.period.as_str())
            .collect();
        assert_eq!(keys, vec!["2024-12", "2025-01", "2025-02"]);

        let jan = &report.monthly_series[1];
        assert_eq!(jan.revenue, 12000);
        assert_eq!(jan.commission, 600);
        assert_eq!(jan.profit, 11400);

        // Still part of the summary.
        assert_eq!(report.summary.total_revenue, 32999);
    }

    #[test]
    fn test_occupancy_rekeys_unassigned_and_sorts_by_nights() {
        let report = aggregate(&ledger(), None);
        let rooms: Vec<(&str, i64)> = report
            .occupancy
            .iter()
            .map(|o| (o.room.as_str(), o.nights))
            .collect();
        assert_eq!(
            rooms,
            vec![("101", 6), ("Deluxe", 3), ("102", 1), ("201", 1)]
        );
    }

    #[test]
    fn test_period_filters_agent_and_occupancy_only() {
        let rows = ledger();
        let feb = aggregate(&rows, Some(ReportPeriod::Month { year: 2025, month: 2 }));

        assert_eq!(feb.summary.total_bookings, 5);
        assert_eq!(feb.monthly_series.len(), 3);
        assert_eq!(feb.agent_performance.len(), 2);
        assert_eq!(feb.occupancy.len(), 2);
        assert_eq!(feb.occupancy[0].room, "101");
        assert_eq!(feb.occupancy[0].nights, 4);

        let y2024 = aggregate(&rows, Some(ReportPeriod::Year { year: 2024 }));
        assert_eq!(y2024.agent_performance.len(), 1);
        assert_eq!(y2024.agent_performance[0].ref_by, "Direct");
    }

    #[test]
    fn test_empty_ledger() {
        let report = aggregate(&[], None);
        assert_eq!(report, Report::default());
    }
}
