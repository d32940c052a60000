//! Shift scheduling and boot-time restore decisions
//!
//! Shift state is a pure function of the hour of day and is recomputed on
//! every evaluation; it is never persisted. The restore decision compares a
//! stored checkpoint against the current clock, walking the calendar
//! backwards across month ends and leap days where the night shift spans
//! midnight.

use crate::devices::rtc::ClockSnapshot;
use crate::storage::CounterRecord;

/// Daily counting window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftState {
    /// Day shift, 06:00..20:00
    Shift1,
    /// Night shift, 22:00..06:00, wraps midnight
    Shift2,
    /// No counting
    Break,
}

impl ShiftState {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            ShiftState::Shift1 => "Shift 1",
            ShiftState::Shift2 => "Shift 2",
            ShiftState::Break => "Break",
        }
    }
}

/// Classify an hour of day into its shift window
///
/// Total over 0..=23: `[6,20)` is Shift1, `[22,24)` and `[0,6)` are Shift2,
/// the remaining `[20,22)` is the break.
pub fn classify(hour: u8) -> ShiftState {
    if (6..20).contains(&hour) {
        ShiftState::Shift1
    } else if hour >= 22 || hour < 6 {
        ShiftState::Shift2
    } else {
        ShiftState::Break
    }
}

/// Days in a month for a two-digit year (2000-based, so `y % 4` covers
/// every leap year in range)
fn days_in_month(month: u8, year: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if year % 4 == 0 {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// True if the stored date is exactly the day before the current date
///
/// Handles month ends, February 29th, and the December 31st year wrap.
pub fn is_previous_day(now: &ClockSnapshot, day: u8, month: u8, year: u8) -> bool {
    if now.year != year {
        // Year boundary: only Dec 31 -> Jan 1
        return now.month == 1
            && now.day == 1
            && month == 12
            && day == 31
            && now.year == year.wrapping_add(1);
    }
    if now.month != month {
        // Month boundary: first of this month after the last of the previous
        return now.day == 1 && now.month == month + 1 && day == days_in_month(month, year);
    }
    now.day == day + 1
}

/// Decide whether a stored checkpoint continues the shift in progress
///
/// - Shift1: the record must be from today, and its hour must itself
///   classify as Shift1.
/// - Shift2 before midnight: the record must be from tonight.
/// - Shift2 after midnight: the record is either from earlier this morning
///   or from yesterday evening.
///
/// A break never restores.
pub fn continues_current_shift(now: &ClockSnapshot, rec: &CounterRecord) -> bool {
    let same_day = rec.day == now.day && rec.month == now.month && rec.year == now.year;

    match classify(now.hour) {
        ShiftState::Shift1 => same_day && classify(rec.hour) == ShiftState::Shift1,
        ShiftState::Shift2 => {
            if now.hour >= 22 {
                same_day && rec.hour >= 22
            } else {
                (same_day && rec.hour < 6)
                    || (is_previous_day(now, rec.day, rec.month, rec.year) && rec.hour >= 22)
            }
        }
        ShiftState::Break => false,
    }
}
