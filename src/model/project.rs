use super::StudentId;
use crate::error::ConfigurationError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ProjectId(pub usize);

#[derive(Clone, Debug)]
pub struct Project {
    pub id: ProjectId,
    pub code: String,
    pub capacity: u32,
    pub min_grade: i64,
    pub min_quorum: u32,
    /// Eligible students, most preferred first. Filled in by
    /// [`derive_preferences`](super::derive_preferences).
    pub preference_list: Vec<StudentId>,
}

impl Project {
    pub fn new(code: impl Into<String>, capacity: u32, min_grade: i64) -> Self {
        Self {
            id: ProjectId(0),
            code: code.into(),
            capacity,
            min_grade,
            min_quorum: 1,
            preference_list: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_min_quorum(self, min_quorum: u32) -> Self {
        Self { min_quorum, ..self }
    }

    pub fn rank_of(&self, student: StudentId) -> Option<usize> {
        self.preference_list.iter().position(|&s| s == student)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.capacity < 1 {
            return Err(ConfigurationError::InvalidCapacity {
                project: self.code.clone(),
            });
        }
        if self.min_quorum > self.capacity {
            return Err(ConfigurationError::QuorumAboveCapacity {
                project: self.code.clone(),
                min_quorum: self.min_quorum,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

#[test]
fn test_validate() {
    let p = Project::new("P1", 2, 5);
    assert_eq!(p.min_quorum, 1);
    assert!(p.validate().is_ok());
    let p = p.with_min_quorum(2);
    assert!(p.validate().is_ok());
    let p = p.with_min_quorum(3);
    assert!(matches!(
        p.validate(),
        Err(ConfigurationError::QuorumAboveCapacity {
            min_quorum: 3,
            capacity: 2,
            ..
        })
    ));
    let p = Project {
        capacity: 0,
        min_quorum: 0,
        ..p
    };
    assert!(matches!(
        p.validate(),
        Err(ConfigurationError::InvalidCapacity { .. })
    ));
}
