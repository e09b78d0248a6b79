use crate::model::{Assignments, ProjectId, StudentId};
use eyre::{Result, bail};

/// Pairs that would both rather be together than keep their current
/// outcome: the student ranks the project above its current one (or is
/// unmatched) and the project has room or ranks the student above its
/// worst holder.
pub fn blocking_pairs(a: &Assignments) -> Vec<(StudentId, ProjectId)> {
    let mut pairs = Vec::new();
    for s in a.all_students() {
        let current = a.project_for(s);
        let current_rank = current
            .and_then(|p| a.rank_of(s, p))
            .unwrap_or(usize::MAX);
        for code in a.student(s).preferences.iter().take(current_rank) {
            let Some(p) = a.project_by_code(code) else {
                continue;
            };
            if current == Some(p) {
                continue;
            }
            let Some(rank) = a.project_rank_of(p, s) else {
                continue;
            };
            let wanted = a.has_room(p)
                || a.worst_holder(p).is_some_and(|w| {
                    rank < a.project_rank_of(p, w).unwrap_or(usize::MAX)
                });
            if wanted {
                pairs.push((s, p));
            }
        }
    }
    pairs
}

/// Every project must be within its capacity, and every project still
/// holding students must have reached its quorum.
pub fn ensure_acceptable(a: &Assignments) -> Result<()> {
    for p in a.all_projects() {
        if a.is_over_capacity(p) {
            bail!(
                "project {} holds {} students for a capacity of {}",
                a.project(p),
                a.size(p),
                a.capacity(p)
            );
        }
        if a.is_open(p) && a.is_under_quorum(p) {
            bail!(
                "project {} holds {} students but requires {}",
                a.project(p),
                a.size(p),
                a.min_quorum(p)
            );
        }
    }
    Ok(())
}
