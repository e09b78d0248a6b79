use super::{Engine, Order};
use crate::model::{ProjectId, StudentId};
use rand::Rng;
use tracing::trace;

impl<R: Rng> Engine<R> {
    /// Projects with room left and students left to propose to.
    pub(super) fn active_projects(&self) -> Vec<ProjectId> {
        self.assignments.filter_projects(|p| {
            self.assignments.has_room(p)
                && self.project_cursor[p.0] < self.assignments.project(p).preference_list.len()
        })
    }

    /// Let one active project propose to the next student on its list.
    /// The project moves past that student whatever the answer.
    pub(super) fn project_step(&mut self, order: Order) {
        let active = self.active_projects();
        if active.is_empty() {
            return;
        }
        let project = match order {
            Order::Sequential => active[0],
            Order::Randomized => active[self.rng.random_range(0..active.len())],
        };
        let cursor = self.project_cursor[project.0];
        let student = self.assignments.project(project).preference_list[cursor];
        self.project_cursor[project.0] = cursor + 1;
        self.propose_to_student(project, student);
    }

    /// Returns `true` if `student` accepted `project`, possibly leaving a
    /// project it liked less.
    fn propose_to_student(&mut self, project: ProjectId, student: StudentId) -> bool {
        self.record_proposal(student, project);
        let Some(rank) = self.assignments.rank_of(student, project) else {
            trace!(
                student = %self.assignments.student(student),
                project = %self.assignments.project(project),
                "Student did not ask for this project"
            );
            self.reject(student, project);
            return false;
        };
        match self.assignments.project_for(student) {
            None => {
                self.hold(student, project);
                true
            }
            Some(current) => {
                let current_rank = self
                    .assignments
                    .rank_of(student, current)
                    .unwrap_or(usize::MAX);
                if rank < current_rank {
                    self.evict(student, current);
                    self.hold(student, project);
                    true
                } else {
                    self.reject(student, project);
                    false
                }
            }
        }
    }
}
