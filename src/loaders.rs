use crate::engine::{Event, EventKind};
use crate::model::{Project, Student};
use eyre::{Result, WrapErr};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{trace, warn};

/// Load projects and students from a text file.
pub fn load(path: &Path) -> Result<(Vec<Student>, Vec<Project>)> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read input file {}", path.display()))?;
    Ok(parse(&content))
}

/// Parse the input format. Each record sits on its own line:
///
/// ```text
/// // comment
/// (P1, 2, 5)              project, capacity, minimum grade
/// (P2, 3, 4, 2)           same with a minimum quorum
/// (A1):(P1, P3, P50) (5)  student, preferences, grade
/// ```
///
/// Lines matching neither form are skipped.
pub fn parse(content: &str) -> (Vec<Student>, Vec<Project>) {
    let mut students = Vec::new();
    let mut projects = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        if let Some(student) = parse_student(line) {
            trace!(%student, grade = student.grade, "Student loaded");
            students.push(student);
        } else if let Some(project) = parse_project(line) {
            trace!(%project, capacity = project.capacity, "Project loaded");
            projects.push(project);
        } else {
            warn!(line = lineno + 1, content = %line, "Skipping unrecognized line");
        }
    }
    (students, projects)
}

fn is_code(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parenthesized(s: &str) -> Option<&str> {
    s.strip_prefix('(')?.strip_suffix(')').map(str::trim)
}

fn parse_student(line: &str) -> Option<Student> {
    let (head, rest) = line.split_once(':')?;
    let code = parenthesized(head.trim()).filter(|c| is_code(c))?;
    let (preferences, grade) = rest.trim_start().strip_prefix('(')?.split_once(')')?;
    let grade = grade.trim();
    let grade = parenthesized(grade).unwrap_or(grade).parse().ok()?;
    let preferences = preferences
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();
    Some(Student::new(code, preferences, grade))
}

fn parse_project(line: &str) -> Option<Project> {
    let fields = parenthesized(line)?
        .split(',')
        .map(str::trim)
        .collect::<Vec<_>>();
    let (code, capacity, min_grade, quorum) = match fields[..] {
        [code, capacity, min_grade] => (code, capacity, min_grade, None),
        [code, capacity, min_grade, quorum] => (code, capacity, min_grade, Some(quorum)),
        _ => return None,
    };
    if !is_code(code) {
        return None;
    }
    let project = Project::new(code, capacity.parse().ok()?, min_grade.parse().ok()?);
    Some(match quorum {
        Some(quorum) => project.with_min_quorum(quorum.parse().ok()?),
        None => project,
    })
}

#[derive(Serialize)]
struct AssignmentRow<'a> {
    project: &'a str,
    student: &'a str,
}

#[derive(Serialize)]
struct EventRow<'a> {
    index: usize,
    student: &'a str,
    project: &'a str,
    kind: EventKind,
}

pub fn write_assignments<W: io::Write>(
    writer: W,
    assignment: &BTreeMap<String, Vec<String>>,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for (project, students) in assignment {
        for student in students {
            writer.serialize(AssignmentRow { project, student })?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn write_events<W: io::Write>(writer: W, events: &[Event]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for (index, event) in events.iter().enumerate() {
        writer.serialize(EventRow {
            index,
            student: &event.student,
            project: &event.project,
            kind: event.kind,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_assignments(path: &Path, assignment: &BTreeMap<String, Vec<String>>) -> Result<()> {
    let file = fs::File::create(path)
        .wrap_err_with(|| format!("cannot create {}", path.display()))?;
    write_assignments(file, assignment).wrap_err("cannot save assignments")
}

pub fn save_events(path: &Path, events: &[Event]) -> Result<()> {
    let file = fs::File::create(path)
        .wrap_err_with(|| format!("cannot create {}", path.display()))?;
    write_events(file, events).wrap_err("cannot save events")
}
