//! Minimum room capacity per session kind.
//!
//! A lecture needs seats for half of the enrolled students, a tutorial for a
//! quarter (its population is split over two rooms). Comparisons are done in
//! integers: `2 * capacity >= enrolled` and `4 * capacity >= enrolled`.

use crate::instance::SessionKind;

/// Denominator of the required fraction of enrolled students.
pub fn fraction_denominator(kind: SessionKind) -> u64 {
    match kind {
        SessionKind::Lecture => 2,
        SessionKind::Tutorial => 4,
    }
}

/// Whether a room of `capacity` seats can host a `kind` session of a course
/// with `enrolled` students.
pub fn meets(kind: SessionKind, capacity: u32, enrolled: u32) -> bool {
    fraction_denominator(kind) * capacity as u64 >= enrolled as u64
}

/// Smallest capacity satisfying [`meets`].
pub fn required_seats(kind: SessionKind, enrolled: u32) -> u32 {
    let d = fraction_denominator(kind);
    (enrolled as u64).div_ceil(d) as u32
}
