pub use self::assignments::Assignments;
pub use self::preferences::derive_preferences;
pub use self::project::{Project, ProjectId};
pub use self::student::{Student, StudentId};

mod assignments;
mod preferences;
mod project;
mod student;
