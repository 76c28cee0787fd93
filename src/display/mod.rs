//! Terminal formatting shared by the CLI commands.

use jiff::Timestamp;
use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;
use owo_colors::OwoColorize;
use terminal_size::{Height, Width};

use crate::types::{TicketStatus, Urgency};

pub mod tables;

pub use tables::{print_price, print_store_table, print_thread, print_ticket_table};

/// Width below which tables drop their secondary columns
pub const COMPACT_WIDTH: u16 = 80;

/// Severity as a bracketed, coloured badge
pub fn format_severity_colored(urgency: Urgency) -> String {
    let badge = format!("[{}]", urgency);
    match urgency {
        Urgency::Critical => badge.red().bold().to_string(),
        Urgency::High => badge.yellow().to_string(),
        Urgency::Normal => badge.blue().to_string(),
    }
}

pub fn format_status_colored(status: TicketStatus) -> String {
    let badge = format!("[{}]", status);
    match status {
        TicketStatus::Open => badge.green().to_string(),
        TicketStatus::Closed => badge.dimmed().to_string(),
    }
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 instants (converted to UTC), zone-less datetimes and
/// plain dates.
pub fn parse_backend_date(raw: &str) -> Option<DateTime> {
    let raw = raw.trim();
    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Some(ts.to_zoned(TimeZone::UTC).datetime());
    }
    if let Ok(dt) = raw.parse::<DateTime>() {
        return Some(dt);
    }
    raw.parse::<Date>()
        .ok()
        .map(|d| d.to_datetime(Time::midnight()))
}

/// Format a backend timestamp as `YYYY-MM-DD HH:MM`
///
/// Strings that do not parse are returned unchanged.
///
/// # Examples
///
/// ```
/// use gatedesk::display::format_date;
///
/// assert_eq!(format_date("2024-01-15T10:30:00Z"), "2024-01-15 10:30");
/// assert_eq!(format_date("2024-01-15"), "2024-01-15 00:00");
/// assert_eq!(format_date("last tuesday"), "last tuesday");
/// ```
pub fn format_date(raw: &str) -> String {
    match parse_backend_date(raw) {
        Some(dt) => dt.strftime("%Y-%m-%d %H:%M").to_string(),
        None => raw.to_string(),
    }
}

/// Today's date in UTC, the reference for relative labels
pub fn today() -> Date {
    Timestamp::now().to_zoned(TimeZone::UTC).date()
}

/// Relative age of a backend timestamp: "today", "1 day ago", "N days ago".
///
/// Dates in the future count as today. Unparseable input yields an empty
/// string.
pub fn days_ago(raw: &str, today: Date) -> String {
    let Some(dt) = parse_backend_date(raw) else {
        return String::new();
    };
    let days = dt
        .date()
        .until(today)
        .map(|span| span.get_days())
        .unwrap_or(0);
    match days {
        d if d <= 0 => "today".to_string(),
        1 => "1 day ago".to_string(),
        d => format!("{d} days ago"),
    }
}

/// Current terminal width, if stdout is a terminal
pub fn terminal_width() -> Option<u16> {
    if !atty::is(atty::Stream::Stdout) {
        return None;
    }
    width_of(terminal_size::terminal_size())
}

fn width_of(size: Option<(Width, Height)>) -> Option<u16> {
    size.map(|(Width(w), _)| w)
}

/// Whether tables should use the compact layout
pub fn is_compact(width: Option<u16>) -> bool {
    width.is_some_and(|w| w < COMPACT_WIDTH)
}
