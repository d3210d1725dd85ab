//! The first-available scan.

use log::trace;

use crate::config::SolverConfig;
use crate::instance::{Instance, Slot};
use crate::timetable::Assignment;

use super::super::error::SolveError;
use super::candidate::Candidate;
use super::occupancy::Occupancy;
use super::ordering::course_order;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub room: usize,
    pub slot: Slot,
}

/// Places every group of `candidate` at the first admissible `(slot, room)`
/// pairs strictly after rank `after`, slots in rank order and rooms in the
/// candidate's order. Bookings are permanent.
///
/// Returns the number of groups placed when the scan runs out of slots.
pub fn place_session(
    instance: &Instance,
    occupancy: &mut Occupancy,
    candidate: &Candidate,
    after: Option<u32>,
) -> Result<Vec<Placement>, usize> {
    let required = candidate.required();
    let lecturer = &instance.lecturers()[candidate.lecturer];
    let mut placed = Vec::with_capacity(required);

    for slot in instance.slots() {
        if after.is_some_and(|rank| slot.rank() <= rank) || !lecturer.is_available(slot.day) {
            continue;
        }
        for &room in &candidate.rooms {
            if placed.len() == required {
                break;
            }
            if occupancy.admits(candidate, room, slot) {
                occupancy.book(candidate, room, slot);
                trace!(
                    "Placed {} in {} at {}",
                    candidate.session,
                    instance.rooms()[room].id,
                    slot
                );
                placed.push(Placement { room, slot });
            }
        }
        if placed.len() == required {
            return Ok(placed);
        }
    }
    Err(placed.len())
}

/// One full constructive pass.
///
/// # Errors
///
/// `Unplaced` for the first session without enough admissible slots.
pub fn construct(
    instance: &Instance,
    config: &SolverConfig,
    attempt: u32,
) -> Result<Vec<Assignment>, SolveError> {
    let mut occupancy = Occupancy::default();
    let mut assignments = Vec::with_capacity(instance.required_assignments());

    for course in course_order(instance, config, attempt) {
        let mut after = None;
        for index in 0..instance.courses()[course].session_count() {
            let candidate = Candidate::new(instance, course, index, config.large_lecture.as_ref())?;
            let unplaced = |placed| SolveError::Unplaced {
                session: candidate.session().clone(),
                placed,
                required: candidate.required(),
            };
            if candidate.is_impossible() {
                return Err(unplaced(0));
            }
            let placements =
                place_session(instance, &mut occupancy, &candidate, after).map_err(unplaced)?;
            after = placements.iter().map(|p| p.slot.rank()).max();
            assignments.extend(placements.into_iter().map(|p| {
                Assignment::new(
                    candidate.session().clone(),
                    p.slot,
                    instance.rooms()[p.room].id.clone(),
                )
            }));
        }
    }
    trace!("Booked {} room slots", occupancy.booked_rooms());
    Ok(assignments)
}
