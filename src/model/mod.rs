//! Model Builder: the timetable as a 0/1 constraint model.
//!
//! [`TimetableModel::build`] enumerates, for an [`Instance`]:
//!
//! - an assignment variable `x(session, room, slot)` for every
//!   capacity-feasible room and every slot of the grid,
//! - a slot-used variable `y(session, slot)` for every tutorial,
//! - a lecturer-active variable `z(lecturer, course, slot)` for every
//!   lecturer teaching more than one course,
//!
//! the hard [`Constraint`] families over them and the linear [`Objective`].
//! The model does not solve anything; it is the shared contract both
//! solving strategies are checked against.

pub mod capacity;
pub mod constraint;
pub mod error;
pub mod linear;
pub mod objective;
pub mod precedence;
pub mod space;
pub mod variables;

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use log::{debug, info};

use crate::config::ObjectiveWeights;
use crate::instance::{EntityKind, Instance, SessionKind, SessionRef, Slot};
use crate::timetable::{Assignment, Timetable, TimetableError};
pub use constraint::{Constraint, Family};
pub use error::ModelError;
pub use linear::{LinearRow, Sense};
pub use objective::Objective;
pub use precedence::PrecedenceGraph;
pub use space::{CandidateSpace, RejectedRoom};
pub use variables::{SessionId, SessionInfo, VarId, Variable, VariableCounts};

/// A built model borrowing its instance.
#[derive(Debug, Clone)]
pub struct TimetableModel<'a> {
    instance: &'a Instance,
    sessions: Vec<SessionInfo>,
    session_by_ref: HashMap<SessionRef, SessionId>,
    variables: Vec<Variable>,
    assign_by_key: HashMap<(SessionId, usize, Slot), VarId>,
    slot_used_by_key: HashMap<(SessionId, Slot), VarId>,
    active_by_key: HashMap<(usize, usize, Slot), VarId>,
    space: CandidateSpace,
    constraints: Vec<Constraint>,
    objective: Objective,
    precedence: PrecedenceGraph,
}

impl<'a> TimetableModel<'a> {
    /// Builds the model for `instance`.
    ///
    /// # Errors
    ///
    /// `UnknownEntity` if a course's lecturer or a program's course cannot be
    /// resolved, which a validated instance rules out.
    pub fn build(instance: &'a Instance, weights: &ObjectiveWeights) -> Result<Self, ModelError> {
        let sessions = resolve_sessions(instance)?;
        let precedence = PrecedenceGraph::from_sessions(&sessions)?;
        let session_by_ref = sessions
            .iter()
            .enumerate()
            .map(|(i, s)| (s.session.clone(), SessionId(i)))
            .collect();

        let mut model = Self {
            instance,
            sessions,
            session_by_ref,
            variables: Vec::new(),
            assign_by_key: HashMap::new(),
            slot_used_by_key: HashMap::new(),
            active_by_key: HashMap::new(),
            space: CandidateSpace::default(),
            constraints: Vec::new(),
            objective: Objective::build(&[], &[], weights),
            precedence,
        };

        model.add_assignment_variables();
        model.add_slot_used_variables();
        model.add_lecturer_variables();

        model.add_exact_counts();
        model.add_room_slot_constraints();
        model.add_lecturer_constraints();
        model.add_unavailability_constraints();
        model.add_program_constraints();
        model.add_precedence_constraints();

        model.objective = Objective::build(&model.variables, &model.sessions, weights);

        let stats = model.stats();
        info!(
            "Model built: {} sessions, {} variables, {} constraints, {} rows, {} rooms rejected",
            stats.sessions,
            stats.variables.total(),
            stats.constraint_total(),
            stats.rows,
            stats.rejected_rooms
        );
        Ok(model)
    }

    fn push_variable(&mut self, var: Variable) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(var);
        id
    }

    fn add_assignment_variables(&mut self) {
        let instance = self.instance;
        self.space = CandidateSpace::with_sessions(self.sessions.len());
        for s in 0..self.sessions.len() {
            let session = SessionId(s);
            let (kind, basis) = (self.sessions[s].kind, self.sessions[s].capacity_basis);
            let mut rooms = Vec::new();
            for (r, room) in instance.rooms().iter().enumerate() {
                if capacity::meets(kind, room.capacity, basis) {
                    rooms.push(r);
                } else {
                    self.space.reject(RejectedRoom {
                        session,
                        room: r,
                        required: capacity::required_seats(kind, basis),
                        capacity: room.capacity,
                    });
                }
            }
            for slot in instance.slots() {
                for &room in &rooms {
                    let var = self.push_variable(Variable::Assign {
                        session,
                        room,
                        slot,
                    });
                    self.assign_by_key.insert((session, room, slot), var);
                    self.space.push(session, var);
                }
            }
        }
    }

    fn add_slot_used_variables(&mut self) {
        for s in 0..self.sessions.len() {
            if self.sessions[s].kind != SessionKind::Tutorial {
                continue;
            }
            let session = SessionId(s);
            let slots: Vec<Slot> = self.slots_of_candidates(session);
            for slot in slots {
                let var = self.push_variable(Variable::SlotUsed { session, slot });
                self.slot_used_by_key.insert((session, slot), var);
            }
        }
    }

    fn add_lecturer_variables(&mut self) {
        for lecturer in self.multi_course_lecturers() {
            let courses = self.courses_of_lecturer(lecturer);
            for course in courses {
                for slot in self.instance.slots().collect::<Vec<_>>() {
                    if self.assign_vars_of_course_at(course, slot).is_empty() {
                        continue;
                    }
                    let var = self.push_variable(Variable::LecturerActive {
                        lecturer,
                        course,
                        slot,
                    });
                    self.active_by_key.insert((lecturer, course, slot), var);
                }
            }
        }
    }

    fn add_exact_counts(&mut self) {
        for s in 0..self.sessions.len() {
            let session = SessionId(s);
            self.constraints.push(Constraint::ExactCount {
                session,
                vars: self.space.candidates(session).to_vec(),
                count: self.sessions[s].required_assignments(),
            });
        }
    }

    fn add_room_slot_constraints(&mut self) {
        let mut by_room_slot: BTreeMap<(usize, Slot), Vec<VarId>> = BTreeMap::new();
        for (i, var) in self.variables.iter().enumerate() {
            if let Variable::Assign { room, slot, .. } = *var {
                by_room_slot.entry((room, slot)).or_default().push(VarId(i));
            }
        }
        for ((room, slot), vars) in by_room_slot {
            if vars.len() > 1 {
                self.constraints
                    .push(Constraint::RoomSlot { room, slot, vars });
            }
        }
    }

    fn add_lecturer_constraints(&mut self) {
        for (i, var) in self.variables.iter().enumerate() {
            if let Variable::Assign { session, slot, .. } = *var {
                if let Some(&slot_used) = self.slot_used_by_key.get(&(session, slot)) {
                    self.constraints.push(Constraint::SlotUsedLink {
                        assign: VarId(i),
                        slot_used,
                    });
                }
            }
        }

        let mut by_lecturer_slot: BTreeMap<(usize, Slot), Vec<VarId>> = BTreeMap::new();
        let mut links = Vec::new();
        for (&(lecturer, course, slot), &active) in &self.active_by_key {
            links.push((active, self.assign_vars_of_course_at(course, slot)));
            by_lecturer_slot
                .entry((lecturer, slot))
                .or_default()
                .push(active);
        }
        links.sort();
        for (active, assign) in links {
            self.constraints
                .push(Constraint::LecturerLink { active, assign });
        }
        for ((lecturer, slot), mut active) in by_lecturer_slot {
            if active.len() > 1 {
                active.sort();
                self.constraints.push(Constraint::LecturerSlot {
                    lecturer,
                    slot,
                    active,
                });
            }
        }
    }

    fn add_unavailability_constraints(&mut self) {
        for (l, lecturer) in self.instance.lecturers().iter().enumerate() {
            for &day in lecturer.unavailable_days() {
                if day.ordinal() >= self.instance.day_count() {
                    continue;
                }
                let vars: Vec<VarId> = self
                    .assign_vars()
                    .filter(|&(_, session, _, slot)| {
                        self.sessions[session.0].lecturer == l && slot.day == day
                    })
                    .map(|(v, ..)| v)
                    .collect();
                if !vars.is_empty() {
                    self.constraints.push(Constraint::Unavailable {
                        lecturer: l,
                        day,
                        vars,
                    });
                }
            }
        }
    }

    fn add_program_constraints(&mut self) {
        let slots: Vec<Slot> = self.instance.slots().collect();
        for p in 0..self.instance.programs().len() {
            let sessions: Vec<SessionId> = (0..self.sessions.len())
                .filter(|&s| self.sessions[s].programs.contains(&p))
                .map(SessionId)
                .collect();
            for &slot in &slots {
                let mut occupancy = Vec::new();
                let mut contributing = 0;
                for &session in &sessions {
                    let vars = self.occupancy_of(session, slot);
                    if !vars.is_empty() {
                        contributing += 1;
                        occupancy.extend(vars);
                    }
                }
                if contributing > 1 {
                    self.constraints.push(Constraint::ProgramSlot {
                        program: p,
                        slot,
                        occupancy,
                    });
                }
            }
        }
    }

    fn add_precedence_constraints(&mut self) {
        let mut edges: Vec<(SessionId, SessionId)> = self.precedence.edges().collect();
        edges.sort();
        for (earlier, later) in edges {
            self.constraints
                .push(Constraint::Precedence { earlier, later });
        }
    }

    /// Variables marking `session` as present in `slot`: its assignment
    /// variables for a lecture, its slot-used variable for a tutorial.
    fn occupancy_of(&self, session: SessionId, slot: Slot) -> Vec<VarId> {
        match self.sessions[session.0].kind {
            SessionKind::Lecture => self
                .space
                .candidates(session)
                .iter()
                .copied()
                .filter(|&v| self.variables[v.0].slot() == slot)
                .collect(),
            SessionKind::Tutorial => self
                .slot_used_by_key
                .get(&(session, slot))
                .map(|&v| vec![v])
                .unwrap_or_default(),
        }
    }

    fn slots_of_candidates(&self, session: SessionId) -> Vec<Slot> {
        let mut slots: Vec<Slot> = self
            .space
            .candidates(session)
            .iter()
            .map(|&v| self.variables[v.0].slot())
            .collect();
        slots.dedup();
        slots
    }

    fn assign_vars(&self) -> impl Iterator<Item = (VarId, SessionId, usize, Slot)> + '_ {
        self.variables
            .iter()
            .enumerate()
            .filter_map(|(i, var)| match *var {
                Variable::Assign {
                    session,
                    room,
                    slot,
                } => Some((VarId(i), session, room, slot)),
                _ => None,
            })
    }

    fn assign_vars_of_course_at(&self, course: usize, slot: Slot) -> Vec<VarId> {
        self.assign_vars()
            .filter(|&(_, session, _, s)| s == slot && self.sessions[session.0].course == course)
            .map(|(v, ..)| v)
            .collect()
    }

    fn courses_of_lecturer(&self, lecturer: usize) -> Vec<usize> {
        let mut courses: Vec<usize> = self
            .sessions
            .iter()
            .filter(|s| s.lecturer == lecturer)
            .map(|s| s.course)
            .collect();
        courses.dedup();
        courses
    }

    /// Lecturers teaching more than one course, by position.
    pub fn multi_course_lecturers(&self) -> Vec<usize> {
        (0..self.instance.lecturers().len())
            .filter(|&l| self.courses_of_lecturer(l).len() > 1)
            .collect()
    }

    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    pub fn sessions(&self) -> &[SessionInfo] {
        &self.sessions
    }

    /// `None` for an id that does not belong to this model.
    pub fn session(&self, id: SessionId) -> Option<&SessionInfo> {
        self.sessions.get(id.0)
    }

    pub fn session_id(&self, session: &SessionRef) -> Option<SessionId> {
        self.session_by_ref.get(session).copied()
    }

    pub fn session_ids(&self) -> impl Iterator<Item = SessionId> {
        (0..self.sessions.len()).map(SessionId)
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, var: VarId) -> Option<&Variable> {
        self.variables.get(var.0)
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn assign_var(&self, session: SessionId, room: usize, slot: Slot) -> Option<VarId> {
        self.assign_by_key.get(&(session, room, slot)).copied()
    }

    pub fn slot_used_var(&self, session: SessionId, slot: Slot) -> Option<VarId> {
        self.slot_used_by_key.get(&(session, slot)).copied()
    }

    pub fn lecturer_active_var(&self, lecturer: usize, course: usize, slot: Slot) -> Option<VarId> {
        self.active_by_key.get(&(lecturer, course, slot)).copied()
    }

    pub fn space(&self) -> &CandidateSpace {
        &self.space
    }

    /// Candidate assignment variables of `session`, by slot rank then room.
    pub fn candidates(&self, session: SessionId) -> &[VarId] {
        self.space.candidates(session)
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub fn precedence(&self) -> &PrecedenceGraph {
        &self.precedence
    }

    /// The assignment an `x` variable stands for.
    pub fn assignment_of(&self, var: VarId) -> Option<Assignment> {
        match *self.variables.get(var.0)? {
            Variable::Assign {
                session,
                room,
                slot,
            } => Some(Assignment::new(
                self.sessions[session.0].session.clone(),
                slot,
                self.instance.rooms()[room].id.clone(),
            )),
            _ => None,
        }
    }

    /// Builds a timetable from chosen assignment variables.
    ///
    /// # Errors
    ///
    /// `DuplicateAssignment` if a variable is listed twice.
    pub fn timetable_from(
        &self,
        vars: impl IntoIterator<Item = VarId>,
    ) -> Result<Timetable, TimetableError> {
        Timetable::from_assignments(vars.into_iter().filter_map(|v| self.assignment_of(v)))
    }

    /// Variable values describing `timetable`: `x` as given, `y` and `z`
    /// at their smallest consistent values.
    ///
    /// # Errors
    ///
    /// `NotAVariable` for an assignment outside the candidate space.
    pub fn values_for(&self, timetable: &Timetable) -> Result<Vec<bool>, ModelError> {
        let mut values = vec![false; self.variables.len()];
        for a in timetable.iter() {
            let var = self
                .session_id(&a.session)
                .zip(self.instance.room_index(&a.room))
                .and_then(|(session, room)| self.assign_var(session, room, a.slot))
                .ok_or_else(|| ModelError::NotAVariable(a.clone()))?;
            values[var.0] = true;
            let Variable::Assign { session, slot, .. } = self.variables[var.0] else {
                continue;
            };
            if let Some(y) = self.slot_used_var(session, slot) {
                values[y.0] = true;
            }
            let info = &self.sessions[session.0];
            if let Some(z) = self.lecturer_active_var(info.lecturer, info.course, slot) {
                values[z.0] = true;
            }
        }
        Ok(values)
    }

    pub fn variable_counts(&self) -> VariableCounts {
        let mut counts = VariableCounts::default();
        for var in &self.variables {
            counts.record(var);
        }
        counts
    }

    pub fn stats(&self) -> ModelStats {
        let mut constraints = BTreeMap::new();
        for c in &self.constraints {
            *constraints.entry(c.family()).or_insert(0) += 1;
        }
        ModelStats {
            sessions: self.sessions.len(),
            variables: self.variable_counts(),
            constraints,
            rows: self.row_count(),
            rejected_rooms: self.space.rejected().len(),
        }
    }
}

/// Resolves every session of the instance to indices, course by course.
fn resolve_sessions(instance: &Instance) -> Result<Vec<SessionInfo>, ModelError> {
    let mut sessions = Vec::with_capacity(instance.session_count());
    for (c, course) in instance.courses().iter().enumerate() {
        let lecturer =
            instance
                .lecturer_index(&course.lecturer)
                .ok_or_else(|| ModelError::UnknownEntity {
                    kind: EntityKind::Lecturer,
                    id: course.lecturer.clone(),
                })?;
        let programs = course
            .programs
            .iter()
            .map(|p| {
                instance
                    .program_index(p)
                    .ok_or_else(|| ModelError::UnknownEntity {
                        kind: EntityKind::Program,
                        id: p.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let capacity_basis = instance.capacity_basis(course);
        for (session, kind) in course.sessions() {
            sessions.push(SessionInfo {
                session,
                kind,
                course: c,
                lecturer,
                programs: programs.clone(),
                capacity_basis,
            });
        }
    }
    debug!("Resolved {} sessions", sessions.len());
    Ok(sessions)
}

/// Model size summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelStats {
    pub sessions: usize,
    pub variables: VariableCounts,
    pub constraints: BTreeMap<Family, usize>,
    pub rows: usize,
    pub rejected_rooms: usize,
}

impl ModelStats {
    pub fn constraint_total(&self) -> usize {
        self.constraints.values().sum()
    }

    pub fn constraints_of(&self, family: Family) -> usize {
        self.constraints.get(&family).copied().unwrap_or(0)
    }
}

impl fmt::Display for ModelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timetable Model:")?;
        writeln!(f, "  Sessions:             {}", self.sessions)?;
        writeln!(f, "  Assignment vars:      {}", self.variables.assign)?;
        writeln!(f, "  Slot-used vars:       {}", self.variables.slot_used)?;
        writeln!(f, "  Lecturer-active vars: {}", self.variables.lecturer_active)?;
        for family in Family::ALL {
            writeln!(f, "  {:<22}{}", format!("{family}:"), self.constraints_of(family))?;
        }
        writeln!(f, "  Rows:                 {}", self.rows)?;
        writeln!(f, "  Rejected rooms:       {}", self.rejected_rooms)?;
        Ok(())
    }
}
