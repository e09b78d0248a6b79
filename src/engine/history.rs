use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum EventKind {
    Proposed,
    Held,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Event {
    pub student: String,
    pub project: String,
    pub kind: EventKind,
}

/// Append-only record of proposals and tentative holds, in the order
/// they happened.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn push(&mut self, student: &str, project: &str, kind: EventKind) {
        self.events.push(Event {
            student: student.to_owned(),
            project: project.to_owned(),
            kind,
        });
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    /// Events appended since the log had `mark` entries.
    pub fn since(&self, mark: usize) -> &[Event] {
        &self.events[mark.min(self.events.len())..]
    }

    pub(super) fn clear(&mut self) {
        self.events.clear();
    }
}

/// State of a run after one outer step, enough to replay the run
/// step by step.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub iteration: usize,
    /// (student, project) pairs proposed during this step.
    pub proposals: Vec<(String, String)>,
    /// (student, project) pairs tentatively held after this step.
    pub holdings: Vec<(String, String)>,
    pub rejections: BTreeSet<(String, String)>,
    pub assignment: BTreeMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_since() {
        let mut log = EventLog::default();
        log.push("A", "P1", EventKind::Proposed);
        let mark = log.len();
        log.push("A", "P1", EventKind::Held);
        log.push("B", "P1", EventKind::Proposed);
        assert_eq!(log.since(mark).len(), 2);
        assert_eq!(log.since(mark)[0].kind, EventKind::Held);
        assert!(log.since(10).is_empty());
        assert_eq!(log.get(2).map(|e| e.student.as_str()), Some("B"));
        assert!(log.get(3).is_none());
    }
}
