use crate::engine::{Order, Outcome, Role};
use crate::model::Assignments;
use crate::stats::{self, Stats};

pub fn display_scenario(role: Role, order: Order) {
    println!("{}", "=".repeat(72));
    println!("Scenario: {role}, {order} order");
    println!("{}", "=".repeat(72));
}

pub fn display_details(a: &Assignments) {
    let mut projects = a.projects.iter().collect::<Vec<_>>();
    projects.sort_by_key(|p| p.code.clone());
    for p in projects {
        let mut students = a.students_for(p.id).to_vec();
        students.sort_by_key(|&s| a.student(s).code.clone());
        if !students.is_empty() {
            println!("{}:", p.code);
            for s in students {
                print!("  - {} (grade {})", a.student(s), a.student(s).grade);
                if let Some(rank) = a.rank_of(s, p.id) {
                    print!(" (rank {})", rank + 1);
                }
                if let Some(rank) = a.project_rank_of(p.id, s) {
                    print!(" (project rank {})", rank + 1);
                }
                println!();
            }
            println!();
        }
    }
}

pub fn display_stats(stats: &Stats, outcome: &Outcome) {
    println!(
        "Students matched/total: {}/{} ({:.2}%)",
        stats.students_matched,
        stats.students_total,
        100.0 * stats.matching_rate
    );
    println!(
        "Projects active/total: {}/{}",
        stats.projects_active, stats.projects_total
    );
    println!(
        "Iterations: {}{}",
        outcome.iterations,
        if outcome.converged {
            ""
        } else {
            " (stopped before convergence)"
        }
    );
}

pub fn display_ranks(a: &Assignments) {
    let ranks = stats::statistics(a);
    let cumul = ranks.iter().scan(0, |s, &r| {
        *s += r;
        Some(*s)
    });
    let total: usize = ranks.iter().sum();
    if total == 0 {
        return;
    }
    println!("Final ranking:");
    for (rank, (n, c)) in ranks.iter().zip(cumul).enumerate() {
        if *n != 0 {
            println!(
                "  - rank {}: {} (cumulative {} - {:.2}%)",
                rank + 1,
                n,
                c,
                100.0 * c as f32 / total as f32
            );
        }
    }
}

pub fn display_satisfaction(a: &Assignments) {
    let (students, projects) = stats::satisfaction(a);
    if let Some(students) = students {
        println!("Average student satisfaction: {students:.4} (1.0 is best)");
    }
    if let Some(projects) = projects {
        println!("Average project satisfaction: {projects:.4} (1.0 is best)");
    }
}

pub fn display_cancelled(outcome: &Outcome) {
    if !outcome.cancelled.is_empty() {
        println!("Projects below quorum:");
        for p in &outcome.cancelled {
            println!("  - {p}");
        }
    }
}

pub fn display_unmatched(a: &Assignments) {
    let mut students = a.unassigned_students();
    students.sort_by_key(|&s| a.student(s).code.clone());
    if !students.is_empty() {
        println!("Unmatched students:");
        for s in students {
            if a.student(s).is_lazy() {
                println!("  - {} (no preferences)", a.student(s));
            } else {
                println!("  - {}", a.student(s));
            }
        }
    }
}
