use super::{Engine, Order};
use crate::model::{ProjectId, StudentId};
use rand::Rng;
use tracing::{debug, trace};

impl<R: Rng> Engine<R> {
    fn next_free_student(&mut self, order: Order) -> Option<StudentId> {
        match order {
            Order::Sequential => self.free.pop_front(),
            Order::Randomized => {
                if self.free.is_empty() {
                    return None;
                }
                let idx = self.rng.random_range(0..self.free.len());
                self.free.remove(idx)
            }
        }
    }

    /// Take one free student and let it go down its preferences until a
    /// project holds it or nothing is left to try.
    pub(super) fn student_step(&mut self, order: Order) {
        let Some(student) = self.next_free_student(order) else {
            return;
        };
        let wishes = self.assignments.student(student).preferences.len();
        while self.student_cursor[student.0] < wishes {
            let cursor = self.student_cursor[student.0];
            let code = self.assignments.student(student).preferences[cursor].clone();
            let Some(project) = self.assignments.project_by_code(&code) else {
                trace!(
                    student = %self.assignments.student(student),
                    project = %code,
                    "Skipping unknown project"
                );
                self.reject_code(student, code);
                self.student_cursor[student.0] += 1;
                continue;
            };
            let grade = self.assignments.student(student).grade;
            if grade < self.assignments.project(project).min_grade {
                trace!(
                    student = %self.assignments.student(student),
                    project = %code,
                    "Grade below project minimum"
                );
                self.reject(student, project);
                self.student_cursor[student.0] += 1;
                continue;
            }
            if self.propose_to_project(student, project) {
                break;
            }
            self.student_cursor[student.0] += 1;
        }
        if self.assignments.project_for(student).is_none()
            && self.student_cursor[student.0] < wishes
        {
            debug!(
                student = %self.assignments.student(student),
                "Requeueing student with untried preferences"
            );
            self.free.push_back(student);
        }
    }

    /// Returns `true` if `project` now holds `student`. A displaced
    /// student goes back to the free queue and will not try `project`
    /// again.
    fn propose_to_project(&mut self, student: StudentId, project: ProjectId) -> bool {
        self.record_proposal(student, project);
        let Some(rank) = self.assignments.project_rank_of(project, student) else {
            self.reject(student, project);
            return false;
        };
        if self.assignments.has_room(project) {
            self.hold(student, project);
            return true;
        }
        let worst = self
            .assignments
            .worst_holder(project)
            .expect("a full project holds at least one student");
        let worst_rank = self
            .assignments
            .project_rank_of(project, worst)
            .unwrap_or(usize::MAX);
        if rank < worst_rank {
            self.evict(worst, project);
            self.student_cursor[worst.0] += 1;
            self.free.push_back(worst);
            self.hold(student, project);
            true
        } else {
            self.reject(student, project);
            false
        }
    }
}
