//! Bookings made so far by the constructive scan.

use std::collections::{HashMap, HashSet};

use crate::instance::{SessionRef, Slot};

use super::candidate::Candidate;

#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    rooms: HashSet<(usize, Slot)>,
    /// Course each lecturer teaches in a slot.
    lecturers: HashMap<(usize, Slot), usize>,
    /// Session each program attends in a slot.
    programs: HashMap<(usize, Slot), SessionRef>,
}

impl Occupancy {
    /// Whether `candidate` can take `room` at `slot`.
    ///
    /// The other group of the same tutorial never blocks: it shares the
    /// lecturer and the programs by definition.
    pub fn admits(&self, candidate: &Candidate, room: usize, slot: Slot) -> bool {
        if self.rooms.contains(&(room, slot)) {
            return false;
        }
        if self
            .lecturers
            .get(&(candidate.lecturer, slot))
            .is_some_and(|&course| course != candidate.course)
        {
            return false;
        }
        candidate.programs.iter().all(|&p| {
            self.programs
                .get(&(p, slot))
                .map_or(true, |s| s == &candidate.session)
        })
    }

    pub fn book(&mut self, candidate: &Candidate, room: usize, slot: Slot) {
        self.rooms.insert((room, slot));
        self.lecturers
            .insert((candidate.lecturer, slot), candidate.course);
        for &p in &candidate.programs {
            self.programs.insert((p, slot), candidate.session.clone());
        }
    }

    pub fn booked_rooms(&self) -> usize {
        self.rooms.len()
    }
}
