//! The weekly grid: weekdays, daily timeslots and the slots they form.
//!
//! A [`Slot`] is ordered by its rank `5 * day + timeslot`. Every ordering
//! constraint in the crate compares ranks, never raw `(day, timeslot)` pairs.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};

use super::error::InstanceError;

/// Number of weekdays in a scheduling week.
pub const DAYS_PER_WEEK: u8 = 5;

/// Number of teaching timeslots in a day.
pub const TIMESLOTS_PER_DAY: u8 = 4;

/// Number of slots in a full week.
pub const SLOTS_PER_WEEK: usize = (DAYS_PER_WEEK as usize) * (TIMESLOTS_PER_DAY as usize);

const DAY_NAMES: [&str; DAYS_PER_WEEK as usize] =
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

const TIMESLOT_STARTS: [&str; TIMESLOTS_PER_DAY as usize] = ["08:30", "11:00", "13:30", "16:00"];
const TIMESLOT_ENDS: [&str; TIMESLOTS_PER_DAY as usize] = ["10:30", "13:00", "15:30", "18:00"];

/// Weekday ordinal, Monday = 0 through Friday = 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Day(u8);

impl Day {
    pub const MONDAY: Day = Day(0);
    pub const TUESDAY: Day = Day(1);
    pub const WEDNESDAY: Day = Day(2);
    pub const THURSDAY: Day = Day(3);
    pub const FRIDAY: Day = Day(4);

    /// Returns the day for `ordinal`, or `None` if it is not a weekday ordinal.
    pub fn new(ordinal: u8) -> Option<Self> {
        (ordinal < DAYS_PER_WEEK).then_some(Self(ordinal))
    }

    pub fn ordinal(self) -> u8 {
        self.0
    }

    pub fn name(self) -> &'static str {
        DAY_NAMES[self.0 as usize]
    }

    /// All five weekdays in order.
    pub fn all() -> impl Iterator<Item = Day> {
        (0..DAYS_PER_WEEK).map(Day)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Daily timeslot ordinal, 0 (08:30) through 3 (16:00).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timeslot(u8);

impl Timeslot {
    /// The earliest timeslot of the day; lectures placed here are penalised.
    pub const FIRST: Timeslot = Timeslot(0);

    pub fn new(ordinal: u8) -> Option<Self> {
        (ordinal < TIMESLOTS_PER_DAY).then_some(Self(ordinal))
    }

    pub fn ordinal(self) -> u8 {
        self.0
    }

    /// Start time label, e.g. `"08:30"`.
    pub fn label(self) -> &'static str {
        TIMESLOT_STARTS[self.0 as usize]
    }

    /// Full span label, e.g. `"08:30-10:30"`.
    pub fn span(self) -> String {
        format!(
            "{}-{}",
            TIMESLOT_STARTS[self.0 as usize],
            TIMESLOT_ENDS[self.0 as usize]
        )
    }

    /// All four timeslots in order.
    pub fn all() -> impl Iterator<Item = Timeslot> {
        (0..TIMESLOTS_PER_DAY).map(Timeslot)
    }
}

impl fmt::Display for Timeslot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One `(day, timeslot)` cell of the weekly grid.
///
/// # Ordering
///
/// Slots are totally ordered by [`rank`](Self::rank), `5 * day + timeslot`.
/// Because a day has fewer than five timeslots this agrees with
/// lexicographic `(day, timeslot)` order, but the rank is what precedence
/// constraints compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot {
    pub day: Day,
    pub timeslot: Timeslot,
}

impl Slot {
    pub fn new(day: Day, timeslot: Timeslot) -> Self {
        Self { day, timeslot }
    }

    /// Linear position used by ordering constraints: `5 * day + timeslot`.
    pub fn rank(self) -> u32 {
        5 * self.day.0 as u32 + self.timeslot.0 as u32
    }

    /// Dense index in `0..SLOTS_PER_WEEK`, for slot-indexed tables.
    pub fn index(self) -> usize {
        self.day.0 as usize * TIMESLOTS_PER_DAY as usize + self.timeslot.0 as usize
    }

    /// Inverse of [`index`](Self::index).
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= SLOTS_PER_WEEK {
            return None;
        }
        let day = (index / TIMESLOTS_PER_DAY as usize) as u8;
        let timeslot = (index % TIMESLOTS_PER_DAY as usize) as u8;
        Some(Self::new(Day(day), Timeslot(timeslot)))
    }

    pub fn is_first_of_day(self) -> bool {
        self.timeslot == Timeslot::FIRST
    }
}

impl Ord for Slot {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Slot {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.timeslot.span())
    }
}

/// The calendar week that lecturer unavailability dates are mapped against.
///
/// Calendar dates are converted to [`Day`] ordinals exactly once, when the
/// instance is built. Dates outside Monday..=Friday of this week are an
/// instance error rather than being silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferenceWeek {
    monday: NaiveDate,
}

impl ReferenceWeek {
    /// Declares the week starting on `monday`.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError::NotMonday`] if `monday` is any other weekday.
    pub fn starting(monday: NaiveDate) -> Result<Self, InstanceError> {
        if monday.weekday() != Weekday::Mon {
            return Err(InstanceError::NotMonday {
                date: monday,
                weekday: monday.weekday(),
            });
        }
        Ok(Self { monday })
    }

    pub fn monday(&self) -> NaiveDate {
        self.monday
    }

    /// Maps a calendar date to its weekday ordinal, if it falls on
    /// Monday..=Friday of this week.
    pub fn day_of(&self, date: NaiveDate) -> Option<Day> {
        let offset = date.signed_duration_since(self.monday).num_days();
        u8::try_from(offset).ok().and_then(Day::new)
    }

    /// Calendar date of a weekday in this week.
    pub fn date_of(&self, day: Day) -> NaiveDate {
        self.monday + chrono::Duration::days(day.0 as i64)
    }
}
