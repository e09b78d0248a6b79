use clap::{ArgAction, Parser, ValueEnum};
use eyre::{Result, WrapErr, eyre};
use gsolver::config::Config;
use gsolver::engine::{Engine, Order, Role};
use gsolver::{checks, display, loaders};
use rand::Rng;
use std::path::PathBuf;
use tracing::{Level, info, warn};

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Students,
    Projects,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Students => Role::Students,
            RoleArg::Projects => Role::Projects,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Sequential,
    Randomized,
}

impl From<OrderArg> for Order {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Sequential => Order::Sequential,
            OrderArg::Randomized => Order::Randomized,
        }
    }
}

#[derive(Parser)]
#[command(version, about)]
struct Options {
    /// Use FILE instead of gsolver.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Do not write assignments or events to disk
    #[arg(short = 'n', long)]
    dry_run: bool,
    /// Set verbosity level (repeat for more)
    #[arg(short, action = ArgAction::Count)]
    verbose: u8,
    /// Proposing side
    #[arg(long, value_enum)]
    role: Option<RoleArg>,
    /// Proposer selection order
    #[arg(long, value_enum)]
    order: Option<OrderArg>,
    /// Seed for the randomized order
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of proposer selections (default: enough for the
    /// run to finish on its own)
    #[arg(long, value_name = "N")]
    max_iterations: Option<usize>,
    /// Run both roles with both orders
    #[arg(long)]
    all_scenarios: bool,
    /// Write the final assignment as CSV to FILE
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Write the proposal log as CSV to FILE
    #[arg(long, value_name = "FILE")]
    events: Option<PathBuf>,
    /// Projects and students description
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let options = Options::parse();
    let level = match options.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let mut config = Config::load_or_default(options.config.as_deref())?;
    config.input = options.input.or(config.input);
    config.solver.role = options.role.map_or(config.solver.role, Role::from);
    config.solver.order = options.order.map_or(config.solver.order, Order::from);
    config.solver.seed = options.seed.or(config.solver.seed);
    config.solver.max_iterations = options.max_iterations.or(config.solver.max_iterations);
    config.solver.scenarios |= options.all_scenarios;
    config.output.assignments = options.output.or(config.output.assignments);
    config.output.events = options.events.or(config.output.events);

    let input = config
        .input
        .ok_or_else(|| eyre!("no input file given on the command line or in the configuration"))?;
    let (students, projects) = loaders::load(&input)?;
    info!(
        projects = projects.len(),
        students = students.len(),
        "Input loaded"
    );
    let seed = config.solver.seed.unwrap_or_else(|| rand::rng().random());
    info!(seed, "Using random seed");
    let mut engine =
        Engine::seeded(students, projects, seed).wrap_err("invalid projects or students")?;
    let max_iterations = config
        .solver
        .max_iterations
        .unwrap_or_else(|| engine.natural_bound());
    info!(max_iterations, "Iteration bound");

    let scenarios = if config.solver.scenarios {
        vec![
            (Role::Students, Order::Sequential),
            (Role::Students, Order::Randomized),
            (Role::Projects, Order::Sequential),
            (Role::Projects, Order::Randomized),
        ]
    } else {
        vec![(config.solver.role, config.solver.order)]
    };
    let mut last = None;
    for (role, order) in scenarios {
        let outcome = engine.run(role, order, max_iterations, false);
        let a = engine.assignments();
        display::display_scenario(role, order);
        display::display_details(a);
        display::display_stats(&engine.stats(), &outcome);
        display::display_ranks(a);
        display::display_satisfaction(a);
        display::display_cancelled(&outcome);
        display::display_unmatched(a);
        checks::ensure_acceptable(a)?;
        let blocking = checks::blocking_pairs(a);
        if !blocking.is_empty() {
            warn!(
                pairs = blocking.len(),
                converged = outcome.converged,
                "Assignment is not stable"
            );
        }
        last = Some(outcome);
    }

    if !options.dry_run {
        if let (Some(path), Some(outcome)) = (&config.output.assignments, &last) {
            loaders::save_assignments(path, &outcome.assignment)?;
        }
        if let Some(path) = &config.output.events {
            loaders::save_events(path, engine.events())?;
        }
    }
    Ok(())
}
