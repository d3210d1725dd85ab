//! Soft quality metrics over a produced timetable.
//!
//! These never affect feasibility or the solver objective. They score how
//! comfortable a week is for students and rooms, so timetables from
//! different strategies can be compared beyond [`Timetable::penalty`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use log::debug;

use crate::config::QualityWeights;
use crate::instance::{Day, Instance, SessionKind, SessionRef};

use super::Timetable;

/// Sessions a program attends in one day before the excess is counted.
pub const MAX_DAILY_SESSIONS: usize = 3;

/// Raw metric values of one timetable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QualityReport {
    /// Sum over programs of the standard deviation of sessions per day.
    pub uneven_distribution: f64,
    /// Sessions beyond [`MAX_DAILY_SESSIONS`] per program and day.
    pub excessive_daily_sessions: usize,
    /// Idle timeslots between two sessions of a program on the same day.
    pub student_gaps: usize,
    /// Rooms beyond the first used by each course.
    pub room_changes: usize,
    /// Assignments filling less than half of their room.
    pub underutilised_rooms: usize,
    /// Sessions in runs of at least two back-to-back timeslots.
    pub continuous_blocks: usize,
}

#[derive(Default)]
struct ProgramDay<'a> {
    sessions: BTreeSet<&'a SessionRef>,
    timeslots: BTreeSet<u8>,
}

impl QualityReport {
    /// Computes every metric. Assignments of courses or rooms unknown to
    /// `instance` are ignored.
    pub fn evaluate(timetable: &Timetable, instance: &Instance) -> Self {
        let mut program_days: BTreeMap<(&str, Day), ProgramDay<'_>> = BTreeMap::new();
        let mut course_rooms: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        let mut underutilised_rooms = 0;

        for a in timetable {
            let Some(course) = instance.course(a.course()) else {
                continue;
            };
            for program in course.programs() {
                let day = program_days.entry((program.as_str(), a.slot.day)).or_default();
                day.sessions.insert(&a.session);
                day.timeslots.insert(a.slot.timeslot.ordinal());
            }
            course_rooms.entry(course.id()).or_default().insert(a.room.as_str());

            let room = instance.room(&a.room);
            let kind = instance.session_kind(&a.session);
            if let (Some(room), Some(kind)) = (room, kind) {
                let headcount = headcount(kind, instance.capacity_basis(course));
                if 2 * (headcount as u64) < room.capacity() as u64 {
                    underutilised_rooms += 1;
                }
            }
        }

        let mut report = Self {
            room_changes: course_rooms.values().map(|r| r.len().saturating_sub(1)).sum(),
            underutilised_rooms,
            ..Self::default()
        };

        for program in instance.programs() {
            let daily: Vec<usize> = instance
                .days()
                .map(|d| {
                    program_days
                        .get(&(program.id(), d))
                        .map_or(0, |pd| pd.sessions.len())
                })
                .collect();
            report.uneven_distribution += std_dev(&daily);
            report.excessive_daily_sessions += daily
                .iter()
                .map(|&n| n.saturating_sub(MAX_DAILY_SESSIONS))
                .sum::<usize>();
        }

        for day in program_days.values() {
            let (gaps, blocks) = runs(&day.timeslots);
            report.student_gaps += gaps;
            report.continuous_blocks += blocks;
        }

        debug!("Quality of timetable {}: {report:?}", timetable.id());
        report
    }

    /// Weighted score, higher is better. Penalties are subtracted and
    /// continuous blocks rewarded.
    pub fn score(&self, weights: &QualityWeights) -> f64 {
        weights.continuous_block * self.continuous_blocks as f64
            - weights.uneven_distribution * self.uneven_distribution
            - weights.excessive_daily_sessions * self.excessive_daily_sessions as f64
            - weights.student_gap * self.student_gaps as f64
            - weights.room_change * self.room_changes as f64
            - weights.underutilised_room * self.underutilised_rooms as f64
    }
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "uneven distribution:      {:.2}", self.uneven_distribution)?;
        writeln!(f, "excessive daily sessions: {}", self.excessive_daily_sessions)?;
        writeln!(f, "student gaps:             {}", self.student_gaps)?;
        writeln!(f, "room changes:             {}", self.room_changes)?;
        writeln!(f, "underutilised rooms:      {}", self.underutilised_rooms)?;
        write!(f, "continuous blocks:        {}", self.continuous_blocks)
    }
}

/// Students present in one assignment: everyone for a lecture, one of the
/// two groups for a tutorial.
fn headcount(kind: SessionKind, enrolled: u32) -> u32 {
    match kind {
        SessionKind::Lecture => enrolled,
        SessionKind::Tutorial => enrolled.div_ceil(2),
    }
}

fn std_dev(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 || counts.is_empty() {
        return 0.0;
    }
    let n = counts.len() as f64;
    let mean = total as f64 / n;
    let variance = counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Idle timeslots between occupied ones, and occupied timeslots lying in
/// runs of length two or more.
fn runs(timeslots: &BTreeSet<u8>) -> (usize, usize) {
    let mut gaps = 0;
    let mut blocks = 0;
    let mut run = 0;
    let mut previous: Option<u8> = None;

    for &ts in timeslots {
        match previous {
            Some(p) if ts == p + 1 => run += 1,
            Some(p) => {
                gaps += (ts - p - 1) as usize;
                if run >= 2 {
                    blocks += run;
                }
                run = 1;
            }
            None => run = 1,
        }
        previous = Some(ts);
    }
    if run >= 2 {
        blocks += run;
    }
    (gaps, blocks)
}
