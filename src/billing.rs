//! Monthly billing records and charge calculation.
//!
//! The arithmetic here is the single source of truth for every amount shown
//! on a slip; rendering only formats what this module computes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Water charge per metered unit, in baht.
pub const WATER_RATE_PER_UNIT: i64 = 18;

/// Minimum monthly water charge, in baht. Applied whenever metered usage
/// would bill below this amount.
pub const WATER_MINIMUM_CHARGE: i64 = 150;

/// Electricity charge per metered unit, in baht.
pub const ELECTRIC_RATE_PER_UNIT: i64 = 9;

/// Late-payment penalty per day past the due date, in baht.
pub const LATE_FEE_PER_DAY: i64 = 50;

/// Monthly charge per rented parking space, in baht.
pub const PARKING_RATE_PER_SPACE: i64 = 500;

fn current_date() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// One month of raw billing input for a single room.
///
/// Meter readings are taken as entered. Readings where the end is below the
/// start (meter rollover, replacement, or a typo the clerk wants anyway)
/// still bill: water bottoms out at [`WATER_MINIMUM_CHARGE`], electricity
/// goes negative and reduces the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRecord {
    /// Room identifier, printed verbatim on the slip and in the file name.
    pub room_number: String,
    /// Base monthly rent, in baht.
    #[serde(default)]
    pub room_rate: f64,
    /// Billing date; shown on the slip in Buddhist-era day/month/year.
    #[serde(rename = "date", default = "current_date")]
    pub billing_date: NaiveDate,
    /// Water meter reading at the start of the month.
    #[serde(default)]
    pub water_unit_start: i64,
    /// Water meter reading at the end of the month.
    #[serde(default)]
    pub water_unit_end: i64,
    /// Electricity meter reading at the start of the month.
    #[serde(default)]
    pub electric_unit_start: i64,
    /// Electricity meter reading at the end of the month.
    #[serde(default)]
    pub electric_unit_end: i64,
    /// Flat garbage-collection fee, in baht.
    #[serde(default)]
    pub garbage_fee: f64,
    /// Days past the payment due date.
    #[serde(default)]
    pub late_days: i64,
    /// Parking spaces rented this month.
    #[serde(default)]
    pub parking_spaces: i64,
}

impl ReceiptRecord {
    /// An empty record for the given room, dated today.
    pub fn new(room_number: impl Into<String>) -> Self {
        Self {
            room_number: room_number.into(),
            room_rate: 0.0,
            billing_date: current_date(),
            water_unit_start: 0,
            water_unit_end: 0,
            electric_unit_start: 0,
            electric_unit_end: 0,
            garbage_fee: 0.0,
            late_days: 0,
            parking_spaces: 0,
        }
    }
}

/// Every derived amount for one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeBreakdown {
    /// Metered water usage, end minus start.
    pub water_units: i64,
    /// Water charge after the monthly minimum.
    pub water_cost: i64,
    /// Metered electricity usage, end minus start.
    pub electric_units: i64,
    /// Electricity charge. Negative when the readings run backwards.
    pub electric_cost: i64,
    /// Late-payment penalty.
    pub late_fee: i64,
    /// Parking charge.
    pub parking_cost: i64,
    /// Grand total: rent, water, electricity, garbage, late fee, parking.
    pub total: f64,
}

impl ChargeBreakdown {
    /// Computes all charges for a record.
    ///
    /// Out-of-range readings saturate at the integer limits, so even absurd
    /// input still yields a breakdown.
    #[must_use]
    pub fn compute(record: &ReceiptRecord) -> Self {
        let water_units = record.water_unit_end.saturating_sub(record.water_unit_start);
        let water_cost = water_units
            .saturating_mul(WATER_RATE_PER_UNIT)
            .max(WATER_MINIMUM_CHARGE);

        let electric_units = record.electric_unit_end.saturating_sub(record.electric_unit_start);
        let electric_cost = electric_units.saturating_mul(ELECTRIC_RATE_PER_UNIT);

        let late_fee = record.late_days.saturating_mul(LATE_FEE_PER_DAY);
        let parking_cost = record.parking_spaces.saturating_mul(PARKING_RATE_PER_SPACE);

        let total = record.room_rate
            + water_cost as f64
            + electric_cost as f64
            + record.garbage_fee
            + late_fee as f64
            + parking_cost as f64;

        Self {
            water_units,
            water_cost,
            electric_units,
            electric_cost,
            late_fee,
            parking_cost,
            total,
        }
    }
}
