use super::{Project, Student};
use crate::error::ConfigurationError;
use std::cmp::Reverse;

/// Compute every project's ranked list of eligible students: those whose
/// grade reaches the project's minimum grade, best grade first and student
/// code as a tie-break.
pub fn derive_preferences(
    projects: &mut [Project],
    students: &[Student],
) -> Result<(), ConfigurationError> {
    for project in projects.iter() {
        project.validate()?;
    }
    let mut ranked = students.iter().collect::<Vec<_>>();
    ranked.sort_by(|a, b| (Reverse(a.grade), &a.code).cmp(&(Reverse(b.grade), &b.code)));
    for project in projects.iter_mut() {
        project.preference_list = ranked
            .iter()
            .filter(|s| s.grade >= project.min_grade)
            .map(|s| s.id)
            .collect();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StudentId;

    fn students() -> Vec<Student> {
        let mut students = vec![
            Student::new("B", Vec::new(), 7),
            Student::new("A", Vec::new(), 7),
            Student::new("C", Vec::new(), 9),
            Student::new("D", Vec::new(), 2),
        ];
        for (i, s) in students.iter_mut().enumerate() {
            s.id = StudentId(i);
        }
        students
    }

    #[test]
    fn test_order_and_threshold() {
        let students = students();
        let mut projects = vec![Project::new("P1", 2, 5), Project::new("P2", 1, 0)];
        derive_preferences(&mut projects, &students).unwrap();
        // C (9), then A and B (7) by code; D is below the threshold.
        assert_eq!(
            projects[0].preference_list,
            vec![StudentId(2), StudentId(1), StudentId(0)]
        );
        assert_eq!(
            projects[1].preference_list,
            vec![StudentId(2), StudentId(1), StudentId(0), StudentId(3)]
        );
    }

    #[test]
    fn test_idempotent() {
        let students = students();
        let mut projects = vec![Project::new("P1", 2, 7)];
        derive_preferences(&mut projects, &students).unwrap();
        let first = projects[0].preference_list.clone();
        derive_preferences(&mut projects, &students).unwrap();
        assert_eq!(projects[0].preference_list, first);
    }

    #[test]
    fn test_invalid_projects() {
        let students = students();
        let mut projects = vec![Project::new("P1", 0, 0).with_min_quorum(0)];
        assert_eq!(
            derive_preferences(&mut projects, &students),
            Err(ConfigurationError::InvalidCapacity {
                project: "P1".into()
            })
        );
        let mut projects = vec![Project::new("P1", 1, 0).with_min_quorum(2)];
        assert!(derive_preferences(&mut projects, &students).is_err());
    }

    #[test]
    fn test_no_students() {
        let mut projects = vec![Project::new("P1", 1, 0)];
        derive_preferences(&mut projects, &[]).unwrap();
        assert!(projects[0].preference_list.is_empty());
    }
}
