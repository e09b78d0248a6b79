use std::fmt;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StudentId(pub usize);

#[derive(Clone, Debug)]
pub struct Student {
    pub id: StudentId,
    pub code: String,
    pub grade: i64,
    /// Project codes, most preferred first. Codes may not match any
    /// known project.
    pub preferences: Vec<String>,
}

impl Student {
    pub fn new(code: impl Into<String>, preferences: Vec<String>, grade: i64) -> Self {
        Self {
            id: StudentId(0),
            code: code.into(),
            grade,
            preferences,
        }
    }

    pub fn rank_of(&self, project: &str) -> Option<usize> {
        self.preferences.iter().position(|p| p == project)
    }

    pub fn is_lazy(&self) -> bool {
        self.preferences.is_empty()
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_of() {
        let s = Student::new("A1", vec!["P2".into(), "P1".into()], 7);
        assert_eq!(s.rank_of("P2"), Some(0));
        assert_eq!(s.rank_of("P1"), Some(1));
        assert_eq!(s.rank_of("P3"), None);
        assert!(!s.is_lazy());
        assert!(Student::new("A2", Vec::new(), 3).is_lazy());
    }
}
