use thiserror::Error;

/// Invalid input detected before any matching run starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("project {project} must accept at least one student")]
    InvalidCapacity { project: String },

    #[error("project {project} requires {min_quorum} students but can only host {capacity}")]
    QuorumAboveCapacity {
        project: String,
        min_quorum: u32,
        capacity: u32,
    },

    #[error("project {0} is declared more than once")]
    DuplicateProject(String),

    #[error("student {0} is declared more than once")]
    DuplicateStudent(String),
}
