use super::*;
use crate::error::ConfigurationError;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Students and projects of a run together with the tentative holdings.
///
/// Holdings (project to students) and the reverse index (student to
/// project) are only ever changed together through [`Assignments::hold`]
/// and [`Assignments::release`], so a student is held by at most one
/// project at any time.
#[derive(Debug)]
pub struct Assignments {
    pub students: Vec<Student>,
    pub projects: Vec<Project>,
    project_codes: HashMap<String, ProjectId>,
    assigned_to: Vec<Option<ProjectId>>,
    assigned: Vec<Vec<StudentId>>,
}

impl Assignments {
    pub fn new(
        mut students: Vec<Student>,
        mut projects: Vec<Project>,
    ) -> Result<Assignments, ConfigurationError> {
        let mut seen = HashSet::new();
        for (idx, student) in students.iter_mut().enumerate() {
            if !seen.insert(student.code.clone()) {
                return Err(ConfigurationError::DuplicateStudent(student.code.clone()));
            }
            student.id = StudentId(idx);
        }
        let mut project_codes = HashMap::new();
        for (idx, project) in projects.iter_mut().enumerate() {
            project.id = ProjectId(idx);
            if project_codes
                .insert(project.code.clone(), project.id)
                .is_some()
            {
                return Err(ConfigurationError::DuplicateProject(project.code.clone()));
            }
        }
        derive_preferences(&mut projects, &students)?;
        let slen = students.len();
        let plen = projects.len();
        Ok(Assignments {
            students,
            projects,
            project_codes,
            assigned_to: vec![None; slen],
            assigned: vec![Vec::new(); plen],
        })
    }

    pub fn student(&self, StudentId(student): StudentId) -> &Student {
        &self.students[student]
    }

    pub fn project(&self, ProjectId(project): ProjectId) -> &Project {
        &self.projects[project]
    }

    pub fn project_by_code(&self, code: &str) -> Option<ProjectId> {
        self.project_codes.get(code).copied()
    }

    pub fn student_by_code(&self, code: &str) -> Option<StudentId> {
        self.students.iter().find(|s| s.code == code).map(|s| s.id)
    }

    pub fn all_projects(&self) -> Vec<ProjectId> {
        self.filter_projects(|_| true)
    }

    pub fn filter_projects<F>(&self, condition: F) -> Vec<ProjectId>
    where
        F: Fn(ProjectId) -> bool,
    {
        (0..self.projects.len())
            .map(ProjectId)
            .filter(|&p| condition(p))
            .collect()
    }

    pub fn all_students(&self) -> Vec<StudentId> {
        (0..self.students.len()).map(StudentId).collect()
    }

    pub fn project_for(&self, StudentId(student): StudentId) -> Option<ProjectId> {
        self.assigned_to[student]
    }

    pub fn students_for(&self, ProjectId(project): ProjectId) -> &[StudentId] {
        &self.assigned[project]
    }

    /// Position of `project` in the student's own preferences.
    pub fn rank_of(&self, student: StudentId, project: ProjectId) -> Option<usize> {
        self.student(student).rank_of(&self.project(project).code)
    }

    /// Position of `student` in the project's derived preference list.
    pub fn project_rank_of(&self, project: ProjectId, student: StudentId) -> Option<usize> {
        self.project(project).rank_of(student)
    }

    pub fn size(&self, project: ProjectId) -> usize {
        self.students_for(project).len()
    }

    pub fn capacity(&self, project: ProjectId) -> usize {
        self.project(project).capacity as usize
    }

    pub fn min_quorum(&self, project: ProjectId) -> usize {
        self.project(project).min_quorum as usize
    }

    pub fn has_room(&self, project: ProjectId) -> bool {
        self.size(project) < self.capacity(project)
    }

    pub fn is_over_capacity(&self, project: ProjectId) -> bool {
        self.size(project) > self.capacity(project)
    }

    pub fn is_under_quorum(&self, project: ProjectId) -> bool {
        self.size(project) < self.min_quorum(project)
    }

    pub fn is_open(&self, project: ProjectId) -> bool {
        !self.students_for(project).is_empty()
    }

    /// The held student ranked last by the project. Students the project
    /// does not rank at all are considered worse than any ranked one.
    pub fn worst_holder(&self, project: ProjectId) -> Option<StudentId> {
        self.students_for(project)
            .iter()
            .copied()
            .max_by_key(|&s| self.project_rank_of(project, s).unwrap_or(usize::MAX))
    }

    pub fn hold(&mut self, student: StudentId, project: ProjectId) {
        assert!(
            self.project_for(student).is_none(),
            "a project is already holding this student"
        );
        assert!(
            self.has_room(project),
            "cannot hold a student in a full project"
        );
        self.assigned_to[student.0] = Some(project);
        self.assigned[project.0].push(student);
    }

    pub fn release(&mut self, student: StudentId, project: ProjectId) {
        assert_eq!(
            self.project_for(student),
            Some(project),
            "project is not holding this student"
        );
        self.assigned_to[student.0] = None;
        let pos = self.assigned[project.0]
            .iter()
            .position(|&s| s == student)
            .expect("student not found in project");
        self.assigned[project.0].remove(pos);
    }

    /// Release every student held by `project` and return them.
    pub fn clear_assignments_for(&mut self, project: ProjectId) -> Vec<StudentId> {
        let students = self.students_for(project).to_vec();
        for &student in &students {
            self.release(student, project);
        }
        students
    }

    pub fn clear_all_assignments(&mut self) {
        for project in self.all_projects() {
            self.clear_assignments_for(project);
        }
    }

    pub fn unassigned_students(&self) -> Vec<StudentId> {
        self.assigned_to
            .iter()
            .enumerate()
            .filter_map(|(id, assignment)| assignment.is_none().then_some(StudentId(id)))
            .collect()
    }

    pub fn matched_count(&self) -> usize {
        self.assigned_to.iter().filter(|a| a.is_some()).count()
    }

    /// Project code to held student codes, for every project.
    pub fn view(&self) -> BTreeMap<String, Vec<String>> {
        self.projects
            .iter()
            .map(|p| {
                (
                    p.code.clone(),
                    self.students_for(p.id)
                        .iter()
                        .map(|&s| self.student(s).code.clone())
                        .collect(),
                )
            })
            .collect()
    }

    /// Every currently held (student code, project code) pair.
    pub fn held_pairs(&self) -> Vec<(String, String)> {
        self.projects
            .iter()
            .flat_map(|p| {
                self.students_for(p.id)
                    .iter()
                    .map(|&s| (self.student(s).code.clone(), p.code.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Assignments {
        Assignments::new(
            vec![
                Student::new("A", vec!["P1".into()], 9),
                Student::new("B", vec!["P1".into()], 7),
                Student::new("C", vec!["P1".into()], 3),
            ],
            vec![Project::new("P1", 2, 5), Project::new("P2", 1, 0)],
        )
        .unwrap()
    }

    #[test]
    fn test_ids_and_lookup() {
        let a = sample();
        assert_eq!(a.project_by_code("P2"), Some(ProjectId(1)));
        assert_eq!(a.project_by_code("P9"), None);
        assert_eq!(a.student_by_code("C"), Some(StudentId(2)));
        assert_eq!(a.project(ProjectId(0)).preference_list.len(), 2);
    }

    #[test]
    fn test_hold_and_release_are_paired() {
        let mut a = sample();
        let (p1, p2) = (ProjectId(0), ProjectId(1));
        a.hold(StudentId(0), p1);
        a.hold(StudentId(1), p1);
        assert!(!a.has_room(p1));
        assert_eq!(a.project_for(StudentId(0)), Some(p1));
        assert_eq!(a.worst_holder(p1), Some(StudentId(1)));
        a.release(StudentId(1), p1);
        assert_eq!(a.project_for(StudentId(1)), None);
        assert_eq!(a.students_for(p1), &[StudentId(0)]);
        a.hold(StudentId(1), p2);
        assert_eq!(a.matched_count(), 2);
        assert_eq!(a.unassigned_students(), vec![StudentId(2)]);
        a.clear_all_assignments();
        assert_eq!(a.matched_count(), 0);
        assert!(!a.is_open(p1));
    }

    #[test]
    fn test_unranked_holder_is_worst() {
        let mut a = sample();
        let p2 = ProjectId(1);
        // C is below P1's grade threshold but P2 ranks everybody.
        a.hold(StudentId(2), p2);
        assert_eq!(a.worst_holder(p2), Some(StudentId(2)));
        assert_eq!(a.project_rank_of(ProjectId(0), StudentId(2)), None);
    }

    #[test]
    #[should_panic(expected = "a project is already holding this student")]
    fn test_double_hold_panics() {
        let mut a = sample();
        a.hold(StudentId(0), ProjectId(0));
        a.hold(StudentId(0), ProjectId(1));
    }

    #[test]
    fn test_duplicates_are_rejected() {
        let err = Assignments::new(
            vec![Student::new("A", Vec::new(), 1), Student::new("A", Vec::new(), 2)],
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateStudent("A".into()));
        let err = Assignments::new(
            Vec::new(),
            vec![Project::new("P", 1, 0), Project::new("P", 2, 0)],
        )
        .unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateProject("P".into()));
    }
}
