//! Assembles the stiffness matrix of the benchmark mesh `<prefix>.node` / `<prefix>.elem`
//! and reports its structure.

use thermofem::{
  assemble::{assemble_stiffness_with, ElementStiffness, Material},
  mesh::{BoundaryClassifier, FeGrid},
  Result,
};

use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// $B^T C$ of the most recently assembled element.
const PARTIAL_DUMP: &str = "kijdump.bin";
/// Global matrix as text, written by debug builds only.
const GLOBAL_DUMP: &str = "GlobalKMatrixFile.txt";

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let args: Vec<String> = std::env::args().collect();
  if args.len() != 2 {
    let program = args.first().map_or("assemble", String::as_str);
    eprintln!(
      "usage: {program} <prefix>\n\
       takes the common name prefix of the .node and .elem files (without extension)"
    );
    return ExitCode::from(1);
  }

  match run(&args[1]) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!("{e}");
      ExitCode::from(1)
    }
  }
}

fn run(prefix: &str) -> Result<()> {
  let grid = FeGrid::from_prefix(prefix, &BoundaryClassifier::benchmark())?;

  let galmat = assemble_stiffness_with(
    &grid,
    &Material::default(),
    |elstiff: &ElementStiffness| -> Result<()> { elstiff.dump_partial(PARTIAL_DUMP) },
  )?;

  let bandwidth = galmat.bandwidth();
  println!("{}", galmat.structure());
  println!("Lower Bandwidth: {}", bandwidth.lower);
  println!("Upper Bandwidth: {}", bandwidth.upper);

  if cfg!(debug_assertions) {
    galmat.write_text(GLOBAL_DUMP)?;
  }
  Ok(())
}
