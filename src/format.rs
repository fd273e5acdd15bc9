//! French display formatting applied by the list container after fetch.

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::model::BillStatus;

const MONTHS_SHORT_FR: [&str; 12] = [
    "Janv.", "Févr.", "Mars", "Avr.", "Mai", "Juin", "Juil.", "Août", "Sept.", "Oct.", "Nov.",
    "Déc.",
];

/// `"2004-04-04"` becomes `"4 Avr. 04"`. A date that does not parse as
/// `YYYY-MM-DD` is returned as-is.
pub fn format_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => {
            let month = MONTHS_SHORT_FR[parsed.month0() as usize];
            format!("{} {month} {:02}", parsed.day(), parsed.year() % 100)
        }
        Err(_) => {
            warn!(date, "unparseable bill date, rendering raw");
            date.to_string()
        }
    }
}

pub fn format_status(status: BillStatus) -> &'static str {
    match status {
        BillStatus::Pending => "En attente",
        BillStatus::Accepted => "Accepté",
        BillStatus::Refused => "Refusé",
    }
}
