//! Explicit time stepping of the 1D heat equation until the temperature profile
//! is stationary.

use itertools::Itertools;
use thermofem::{
  diffusion::{Outcome, Solution, StepReport},
  Result,
};

use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const ALPHA: f64 = 1.0;
const MAX_STEPS: usize = 100;

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let args: Vec<String> = std::env::args().collect();
  if args.len() != 4 {
    let program = args.first().map_or("simulate", String::as_str);
    eprintln!("usage: {program} <length> <deltaT> <deltaX>");
    return ExitCode::from(1);
  }

  let parsed: std::result::Result<Vec<f64>, _> = args[1..].iter().map(|a| a.parse::<f64>()).collect();
  let Ok(params) = parsed else {
    eprintln!("all arguments must be numbers, got {:?}", &args[1..]);
    return ExitCode::from(1);
  };

  match run(params[0], params[1], params[2]) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!("{e}");
      ExitCode::from(1)
    }
  }
}

fn run(length: f64, delta_t: f64, delta_x: f64) -> Result<()> {
  let mut solution = Solution::new(length, delta_x, delta_t, ALPHA, MAX_STEPS)?;
  println!("Number of grid points: {}", solution.gridfn().npoints());

  let outcome = solution.simulate(|report: &StepReport| {
    let grid = report
      .values
      .iter()
      .enumerate()
      .map(|(i, v)| format!(", Grid[{i}]={v}"))
      .join("");
    println!("step {} max error= {}{grid}", report.step, report.max_error);
  })?;

  if let Outcome::Converged { .. } = outcome {
    let profile = solution.final_profile();
    let xs = profile.iter().map(|p| p.0).join(" ");
    let ys = profile.iter().map(|p| p.1).join(" ");
    println!("Solution converged XCoordinates= {xs} , YCoordinates= {ys} ");
  }
  Ok(())
}
