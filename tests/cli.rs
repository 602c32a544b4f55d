//! Output and exit codes of the `simulate` and `assemble` executables.

use std::{
  path::PathBuf,
  process::{Command, Output},
};

fn simulate(args: &[&str]) -> Output {
  Command::new(env!("CARGO_BIN_EXE_simulate"))
    .args(args)
    .output()
    .unwrap()
}

fn stdout_lines(output: &Output) -> Vec<String> {
  String::from_utf8(output.stdout.clone())
    .unwrap()
    .lines()
    .map(str::to_owned)
    .collect()
}

fn scratch_dir(name: &str) -> PathBuf {
  let dir = std::env::temp_dir().join(format!("thermofem-cli-{name}-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  dir
}

#[test]
fn simulate_prints_steps_and_converged_profile() {
  // len 1, dt 0.1, dx 0.5: 4 samples, r = 0.4
  let output = simulate(&["1", "0.1", "0.5"]);
  assert_eq!(output.status.code(), Some(0));

  let lines = stdout_lines(&output);
  assert_eq!(lines[0], "Number of grid points: 4");

  let first = &lines[1];
  assert!(first.starts_with("step 0 max error= "), "{first}");
  assert!(first.contains(", Grid[0]=0, Grid[1]="), "{first}");
  assert!(first.ends_with(", Grid[3]=0"), "{first}");

  let nsteps = lines.len() - 2;
  assert!(nsteps < 100);
  for (k, line) in lines[1..=nsteps].iter().enumerate() {
    assert!(line.starts_with(&format!("step {k} max error= ")), "{line}");
  }

  let last = lines.last().unwrap();
  assert!(
    last.starts_with("Solution converged XCoordinates= 0 0.5 1 1.5 , YCoordinates= 0 "),
    "{last}"
  );
}

#[test]
fn simulate_rejects_bad_arguments() {
  assert_eq!(simulate(&[]).status.code(), Some(1));
  assert_eq!(simulate(&["1", "0.1"]).status.code(), Some(1));
  assert_eq!(simulate(&["1", "0.1", "0.5", "7"]).status.code(), Some(1));
  assert_eq!(simulate(&["one", "0.1", "0.5"]).status.code(), Some(1));
  assert_eq!(simulate(&["1", "-0.1", "0.5"]).status.code(), Some(1));
  assert_eq!(simulate(&["1", "0.1", "1e-300"]).status.code(), Some(1));
}

#[test]
fn assemble_reports_bandwidth_and_dumps() {
  let dir = scratch_dir("assemble");

  // 4x4 nodes on the benchmark rectangle [0, 0.6] x [0, 0.4].
  let xs = ["0", "0.2", "0.4", "0.6"];
  let ys = ["0", "0.1", "0.2", "0.4"];
  let mut nodes = String::from("16\n");
  for (iy, y) in ys.iter().enumerate() {
    for (ix, x) in xs.iter().enumerate() {
      nodes.push_str(&format!("{} {x} {y}\n", 4 * iy + ix + 1));
    }
  }
  let id = |ix: usize, iy: usize| 4 * iy + ix + 1;
  let mut elements = String::from("18\n");
  let mut ielement = 0;
  for iy in 0..3 {
    for ix in 0..3 {
      for vertices in [
        [id(ix, iy), id(ix + 1, iy), id(ix + 1, iy + 1)],
        [id(ix + 1, iy + 1), id(ix, iy + 1), id(ix, iy)],
      ] {
        ielement += 1;
        elements.push_str(&format!(
          "{ielement} {} {} {}\n",
          vertices[0], vertices[1], vertices[2]
        ));
      }
    }
  }
  std::fs::write(dir.join("mesh.node"), nodes).unwrap();
  std::fs::write(dir.join("mesh.elem"), elements).unwrap();

  let output = Command::new(env!("CARGO_BIN_EXE_assemble"))
    .arg("mesh")
    .current_dir(&dir)
    .output()
    .unwrap();
  assert_eq!(output.status.code(), Some(0));

  let lines = stdout_lines(&output);
  assert_eq!(lines.len(), 3);
  assert!(lines[1].starts_with("Lower Bandwidth: "));
  assert!(lines[2].starts_with("Upper Bandwidth: "));

  // The last element has a single interior vertex: B^T C is 1 x 2.
  assert_eq!(std::fs::metadata(dir.join("kijdump.bin")).unwrap().len(), 16);
  if cfg!(debug_assertions) {
    let text = std::fs::read_to_string(dir.join("GlobalKMatrixFile.txt")).unwrap();
    assert_eq!(text.lines().count(), 4);
  }

  std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn assemble_rejects_bad_arguments() {
  let dir = scratch_dir("assemble-missing");
  let run = |args: &[&str]| {
    Command::new(env!("CARGO_BIN_EXE_assemble"))
      .args(args)
      .current_dir(&dir)
      .output()
      .unwrap()
      .status
      .code()
  };
  assert_eq!(run(&[]), Some(1));
  assert_eq!(run(&["a", "b"]), Some(1));
  assert_eq!(run(&["missing"]), Some(1));
  std::fs::remove_dir_all(&dir).unwrap();
}
