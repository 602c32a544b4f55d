use crate::{
  dump,
  error::{ensure_positive, Error, Result},
};

use std::{
  fs::File,
  io::{BufWriter, Write},
  path::Path,
};

/// Uniform grid over the square `[0, len]^2`.
///
/// The coordinates are `0, dx, 2 dx, ...` followed by `len` itself, so the
/// last interval is shorter whenever `len` is not a multiple of `dx`.
#[derive(Debug, Clone, PartialEq)]
pub struct RectDomain {
  len: f64,
  delta: f64,
  xs: Vec<f64>,
  ys: Vec<f64>,
}

/// Largest number of samples of a 1D grid.
pub const MAX_POINTS: usize = 1 << 26;

/// `floor(len / dx) + extra`, failing if that exceeds [`MAX_POINTS`].
pub(crate) fn checked_npoints(len: f64, dx: f64, extra: usize) -> Result<usize> {
  let nintervals = (len / dx).floor();
  let npoints = (nintervals < MAX_POINTS as f64)
    .then(|| (nintervals as usize).checked_add(extra))
    .flatten()
    .filter(|&n| n <= MAX_POINTS);
  npoints.ok_or(Error::InvalidArgument {
    name: "dx",
    value: dx,
    reason: "too small for len, the grid would exceed MAX_POINTS",
  })
}

impl RectDomain {
  pub fn new(len: f64, dx: f64) -> Result<Self> {
    let len = ensure_positive("len", len)?;
    let delta = ensure_positive("dx", dx)?;
    checked_npoints(len, delta, 2)?;
    let mut domain = Self {
      len,
      delta,
      xs: Vec::new(),
      ys: Vec::new(),
    };
    domain.generate_grid();
    Ok(domain)
  }

  fn generate_grid(&mut self) {
    self.xs = grid_points(self.len, self.delta);
    // square domain
    self.ys = self.xs.clone();
  }

  pub fn set_step_size(&mut self, dx: f64) -> Result<()> {
    let dx = ensure_positive("dx", dx)?;
    checked_npoints(self.len, dx, 2)?;
    self.delta = dx;
    self.generate_grid();
    Ok(())
  }

  pub fn len(&self) -> f64 {
    self.len
  }
  pub fn delta(&self) -> f64 {
    self.delta
  }
  pub fn xs(&self) -> &[f64] {
    &self.xs
  }
  pub fn ys(&self) -> &[f64] {
    &self.ys
  }
  pub fn npoints(&self) -> usize {
    self.xs.len()
  }

  /// Writes the x coordinates followed by the y coordinates as raw doubles.
  pub fn write_grid_to<W: Write>(&self, writer: &mut W) -> Result<()> {
    dump::write_f64s(writer, &self.xs)?;
    dump::write_f64s(writer, &self.ys)?;
    Ok(())
  }

  pub fn write_grid(&self, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    self.write_grid_to(&mut writer)?;
    writer.flush()?;
    Ok(())
  }
}

/// `0, dx, 2 dx, ... <= len`, always ending exactly in `len`.
fn grid_points(len: f64, dx: f64) -> Vec<f64> {
  let mut points: Vec<f64> = (0usize..)
    .map(|i| i as f64 * dx)
    .take_while(|&x| x <= len)
    .collect();

  // A last point within round-off of `len` is snapped instead of duplicated.
  match points.last_mut() {
    Some(last) if (len - *last).abs() <= 1e-9 * dx => *last = len,
    _ => points.push(len),
  }
  points
}
