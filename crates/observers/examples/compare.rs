//! Compares descent strategies on the polynomial pair.
//!
//! Runs single-objective descent on each objective and steepest
//! multi-objective descent from one shared starting point, then saves one
//! trajectory file per run.
//!
//! ```text
//! cargo run -p descent-observers --example compare -- [output-dir]
//! ```
//!
//! Files go to the system temp directory unless `output-dir` is given. Set
//! `DESCENT_DEBUG` to also log every step.

use std::{env, error::Error, fs, io, path::PathBuf};

use descent_core::catalog;
use descent_observers::{TrajectoryWriter, trajectory};
use descent_solvers::descent::{
    self, Config, Optimizer, SingleObjectiveDescent, SteepestMultiObjectiveDescent, Update,
};
use tracing::{Level, info};

fn main() -> Result<(), Box<dyn Error>> {
    let level = if env::var_os("DESCENT_DEBUG").is_some() {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let dir = env::args_os()
        .nth(1)
        .map_or_else(|| env::temp_dir().join("descent-compare"), PathBuf::from);
    fs::create_dir_all(&dir)?;

    let problem = catalog::polynomial_pair();
    for equation in problem.equations() {
        info!(%equation, "objective");
    }

    let start = problem.evaluate(vec![1.3, 0.7])?;
    let config = Config::default();

    let runs: Vec<(&str, Optimizer)> = vec![
        (
            "descent on f1",
            SingleObjectiveDescent::new(start.clone(), 0, config)?.into(),
        ),
        (
            "descent on f2",
            SingleObjectiveDescent::new(start.clone(), 1, config)?.into(),
        ),
        (
            "steepest multi-objective",
            SteepestMultiObjectiveDescent::new(start, config)
                .with_update(Update::Additive)
                .into(),
        ),
    ];

    for (index, (label, mut optimizer)) in runs.into_iter().enumerate() {
        let solution = if matches!(optimizer, Optimizer::SteepestMultiObjective(_)) {
            // Echo the multi-objective rows as they are produced.
            let mut echo = TrajectoryWriter::new(io::stdout().lock());
            let solution = descent::run(&mut optimizer, &mut echo)?;
            echo.finish()?;
            solution
        } else {
            descent::run_unobserved(&mut optimizer)?
        };

        let path = trajectory::save_trajectory(&dir, index + 1, &solution.trajectory)?;
        let last = solution.last();
        info!(
            run = label,
            status = ?solution.status,
            iters = solution.iters,
            inputs = %last.inputs(),
            objectives = %last.objective_values(),
            path = %path.display(),
            "finished"
        );
    }

    Ok(())
}
