use crate::model::Assignments;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Stats {
    pub students_total: usize,
    pub students_matched: usize,
    pub projects_total: usize,
    pub projects_active: usize,
    pub matching_rate: f64,
}

pub fn summary(a: &Assignments) -> Stats {
    let students_total = a.students.len();
    let students_matched = a.matched_count();
    Stats {
        students_total,
        students_matched,
        projects_total: a.projects.len(),
        projects_active: a.filter_projects(|p| a.is_open(p)).len(),
        matching_rate: if students_total == 0 {
            0.0
        } else {
            students_matched as f64 / students_total as f64
        },
    }
}

/// Number of matched students per rank of their project in their own
/// preferences.
pub fn statistics(a: &Assignments) -> Vec<usize> {
    let mut ranks = Vec::new();
    for project in a.filter_projects(|p| a.is_open(p)) {
        for &student in a.students_for(project) {
            if let Some(rank) = a.rank_of(student, project) {
                if ranks.len() <= rank {
                    ranks.resize(rank + 1, 0);
                }
                ranks[rank] += 1;
            }
        }
    }
    ranks
}

/// Mean 1-based rank of the matched pairs, seen from the students then
/// from the projects. `None` when nobody is matched.
pub fn satisfaction(a: &Assignments) -> (Option<f64>, Option<f64>) {
    let pairs = a
        .all_students()
        .into_iter()
        .filter_map(|s| a.project_for(s).map(|p| (s, p)))
        .collect::<Vec<_>>();
    let mean = |ranks: Vec<usize>| {
        (!ranks.is_empty())
            .then(|| ranks.iter().map(|r| (r + 1) as f64).sum::<f64>() / ranks.len() as f64)
    };
    (
        mean(pairs.iter().filter_map(|&(s, p)| a.rank_of(s, p)).collect()),
        mean(
            pairs
                .iter()
                .filter_map(|&(s, p)| a.project_rank_of(p, s))
                .collect(),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Project, ProjectId, Student, StudentId};

    fn sample() -> Assignments {
        Assignments::new(
            vec![
                Student::new("A", vec!["P1".into(), "P2".into()], 9),
                Student::new("B", vec!["P1".into(), "P2".into()], 7),
                Student::new("C", Vec::new(), 5),
            ],
            vec![Project::new("P1", 1, 0), Project::new("P2", 2, 0)],
        )
        .unwrap()
    }

    #[test]
    fn test_summary() {
        let mut a = sample();
        a.hold(StudentId(0), ProjectId(0));
        a.hold(StudentId(1), ProjectId(1));
        let stats = summary(&a);
        assert_eq!(stats.students_total, 3);
        assert_eq!(stats.students_matched, 2);
        assert_eq!(stats.projects_total, 2);
        assert_eq!(stats.projects_active, 2);
        assert!((stats.matching_rate - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_rate() {
        let a = Assignments::new(Vec::new(), vec![Project::new("P1", 1, 0)]).unwrap();
        assert_eq!(summary(&a).matching_rate, 0.0);
        assert_eq!(satisfaction(&a), (None, None));
    }

    #[test]
    fn test_ranks() {
        let mut a = sample();
        a.hold(StudentId(0), ProjectId(0));
        a.hold(StudentId(1), ProjectId(1));
        assert_eq!(statistics(&a), vec![1, 1]);
        // Students: ranks 1 and 2. Projects: A is first for P1, B second for P2.
        let (students, projects) = satisfaction(&a);
        assert_eq!(students, Some(1.5));
        assert_eq!(projects, Some(1.5));
    }
}
