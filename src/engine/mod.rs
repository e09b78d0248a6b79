//! Deferred acceptance between students and projects.
//!
//! An [`Engine`] owns the students, the projects and every piece of
//! per-run state. [`Engine::run`] resets that state, lets one side
//! propose until nobody is left to propose (or the iteration bound is
//! reached), then cancels projects that did not reach their quorum.

use crate::error::ConfigurationError;
use crate::model::{Assignments, Project, ProjectId, Student, StudentId};
use crate::stats::{self, Stats};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use tracing::{debug, info, instrument, trace, warn};

pub use self::history::{Event, EventKind, EventLog, Snapshot};

mod history;
mod projects;
mod students;

/// Which side makes the proposals.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Students,
    Projects,
}

/// How the next proposer is picked among those still able to propose.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Sequential,
    Randomized,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Students => "students propose",
            Role::Projects => "projects propose",
        })
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Order::Sequential => "sequential",
            Order::Randomized => "randomized",
        })
    }
}

/// Result of a finalized run.
#[derive(Clone, Debug)]
pub struct Outcome {
    /// Project code to the codes of the students it retained.
    pub assignment: BTreeMap<String, Vec<String>>,
    /// Number of outer steps executed.
    pub iterations: usize,
    /// `false` if the iteration bound stopped the run early.
    pub converged: bool,
    /// Projects that ended below their quorum.
    pub cancelled: Vec<String>,
    pub snapshots: Option<Vec<Snapshot>>,
}

pub struct Engine<R = StdRng> {
    assignments: Assignments,
    student_cursor: Vec<usize>,
    project_cursor: Vec<usize>,
    rejections: BTreeSet<(String, String)>,
    log: EventLog,
    free: VecDeque<StudentId>,
    rng: R,
}

impl Engine<StdRng> {
    /// Build an engine whose randomized order is reproducible from `seed`.
    pub fn seeded(
        students: Vec<Student>,
        projects: Vec<Project>,
        seed: u64,
    ) -> Result<Self, ConfigurationError> {
        Self::new(students, projects, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Engine<R> {
    /// Validate the projects and derive their preference lists.
    pub fn new(
        students: Vec<Student>,
        projects: Vec<Project>,
        rng: R,
    ) -> Result<Self, ConfigurationError> {
        let assignments = Assignments::new(students, projects)?;
        Ok(Engine {
            student_cursor: vec![0; assignments.students.len()],
            project_cursor: vec![0; assignments.projects.len()],
            assignments,
            rejections: BTreeSet::new(),
            log: EventLog::default(),
            free: VecDeque::new(),
            rng,
        })
    }

    pub fn assignments(&self) -> &Assignments {
        &self.assignments
    }

    /// Outer steps after which either role has run out of proposals: one
    /// per student plus one per entry of every preference list.
    pub fn natural_bound(&self) -> usize {
        let a = &self.assignments;
        a.students.len()
            + a.students.iter().map(|s| s.preferences.len()).sum::<usize>()
            + a.projects
                .iter()
                .map(|p| p.preference_list.len())
                .sum::<usize>()
    }

    pub fn reset(&mut self) {
        self.assignments.clear_all_assignments();
        self.student_cursor.fill(0);
        self.project_cursor.fill(0);
        self.rejections.clear();
        self.log.clear();
        self.free.clear();
    }

    /// Run deferred acceptance with `role` as the proposing side.
    ///
    /// At most `max_iterations` outer steps are executed, one per selected
    /// proposer. When `collect_history` is set, a [`Snapshot`] is recorded
    /// after every step.
    #[instrument(
        skip(self),
        fields(
            students = self.assignments.students.len(),
            projects = self.assignments.projects.len()
        )
    )]
    pub fn run(
        &mut self,
        role: Role,
        order: Order,
        max_iterations: usize,
        collect_history: bool,
    ) -> Outcome {
        self.reset();
        if role == Role::Students {
            self.free.extend(self.assignments.all_students());
        }
        let mut snapshots = collect_history.then(Vec::new);
        let mut iterations = 0;
        let converged = loop {
            let done = match role {
                Role::Students => self.free.is_empty(),
                Role::Projects => self.active_projects().is_empty(),
            };
            if done {
                break true;
            }
            if iterations >= max_iterations {
                break false;
            }
            let mark = self.log.len();
            match role {
                Role::Students => self.student_step(order),
                Role::Projects => self.project_step(order),
            }
            if let Some(snapshots) = &mut snapshots {
                snapshots.push(self.snapshot(iterations, mark));
            }
            iterations += 1;
        };
        if !converged {
            warn!(
                iterations,
                "Iteration limit reached before every proposer was done"
            );
        }
        let cancelled = self.finalize();
        info!(
            iterations,
            converged,
            matched = self.assignments.matched_count(),
            cancelled = cancelled.len(),
            "Matching finalized"
        );
        Outcome {
            assignment: self.assignments.view(),
            iterations,
            converged,
            cancelled,
            snapshots,
        }
    }

    pub fn stats(&self) -> Stats {
        stats::summary(&self.assignments)
    }

    pub fn event_at(&self, index: usize) -> Option<&Event> {
        self.log.get(index)
    }

    pub fn events(&self) -> &[Event] {
        self.log.as_slice()
    }

    pub fn rejections(&self) -> &BTreeSet<(String, String)> {
        &self.rejections
    }

    pub fn assignment(&self) -> BTreeMap<String, Vec<String>> {
        self.assignments.view()
    }

    pub fn matched_project(&self, student: &str) -> Option<&str> {
        let student = self.assignments.student_by_code(student)?;
        self.assignments
            .project_for(student)
            .map(|p| self.assignments.project(p).code.as_str())
    }

    /// Cancel every project below its quorum. Released students stay
    /// unmatched.
    #[instrument(skip_all)]
    fn finalize(&mut self) -> Vec<String> {
        let mut cancelled = Vec::new();
        for project in self
            .assignments
            .filter_projects(|p| self.assignments.is_under_quorum(p))
        {
            let released = self.assignments.clear_assignments_for(project);
            if !released.is_empty() {
                debug!(
                    project = %self.assignments.project(project),
                    released = released.len(),
                    min_quorum = self.assignments.min_quorum(project),
                    "Cancelling project below quorum"
                );
            }
            for student in released {
                self.reject(student, project);
            }
            cancelled.push(self.assignments.project(project).code.clone());
        }
        cancelled
    }

    fn hold(&mut self, student: StudentId, project: ProjectId) {
        self.assignments.hold(student, project);
        self.log.push(
            &self.assignments.student(student).code,
            &self.assignments.project(project).code,
            EventKind::Held,
        );
    }

    fn record_proposal(&mut self, student: StudentId, project: ProjectId) {
        trace!(
            student = %self.assignments.student(student),
            project = %self.assignments.project(project),
            "Proposal"
        );
        self.log.push(
            &self.assignments.student(student).code,
            &self.assignments.project(project).code,
            EventKind::Proposed,
        );
    }

    /// Drop a tentative hold and remember the pair as rejected.
    fn evict(&mut self, student: StudentId, project: ProjectId) {
        debug!(
            student = %self.assignments.student(student),
            project = %self.assignments.project(project),
            "Evicting student"
        );
        self.assignments.release(student, project);
        self.reject(student, project);
    }

    fn reject(&mut self, student: StudentId, project: ProjectId) {
        let code = self.assignments.project(project).code.clone();
        self.reject_code(student, code);
    }

    fn reject_code(&mut self, student: StudentId, project: String) {
        let student = self.assignments.student(student).code.clone();
        self.rejections.insert((student, project));
    }

    fn snapshot(&self, iteration: usize, mark: usize) -> Snapshot {
        Snapshot {
            iteration,
            proposals: self
                .log
                .since(mark)
                .iter()
                .filter(|e| e.kind == EventKind::Proposed)
                .map(|e| (e.student.clone(), e.project.clone()))
                .collect(),
            holdings: self.assignments.held_pairs(),
            rejections: self.rejections.clone(),
            assignment: self.assignments.view(),
        }
    }
}
