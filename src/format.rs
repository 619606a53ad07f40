//! Number and date formatting for slip text.
//!
//! Amounts keep their stored precision; nothing here re-rounds a charge.

use chrono::{Datelike, NaiveDate};

/// Offset between Gregorian and Buddhist-era years.
pub const THAI_YEAR_OFFSET: i32 = 543;

/// The room-and-date line under the slip header, with the year shown in the
/// Buddhist era: `เลขห้อง 101 วันที่ 15/01/2567`.
pub fn thai_date_line(room_number: &str, date: NaiveDate) -> String {
    format!(
        "เลขห้อง {} วันที่ {:02}/{:02}/{}",
        room_number,
        date.day(),
        date.month(),
        date.year() + THAI_YEAR_OFFSET
    )
}

/// A baht amount with two forced decimals: `฿3000.00`.
pub fn baht(amount: f64) -> String {
    format!("฿{amount:.2}")
}

/// A bare number, integers without a decimal point: `50`, `50.5`.
pub fn plain(amount: f64) -> String {
    format!("{amount}")
}

/// A total with thousands separators and up to three fraction digits,
/// trailing zeros trimmed: `4,180` or `1,000.125`.
pub fn grouped(amount: f64) -> String {
    let s = format!("{:.3}", amount.abs());
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s.as_str(), ""),
    };
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if amount < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(String::from_utf8_lossy)
        .collect::<Vec<_>>()
        .join(",")
}
