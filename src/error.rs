use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid argument `{name}` = {value}: {reason}")]
  InvalidArgument {
    name: &'static str,
    value: f64,
    reason: &'static str,
  },

  #[error("{source_name}:{line}: {reason}")]
  Parse {
    source_name: String,
    line: usize,
    reason: String,
  },

  #[error("{kind} index {index} out of range (len {len})")]
  IndexOutOfRange {
    kind: &'static str,
    index: usize,
    len: usize,
  },

  /// Collinear vertices, the shape function gradients are undefined.
  #[error("element {element} is degenerate (det = {det:e})")]
  DegenerateElement { element: usize, det: f64 },

  #[error("solution diverged at step {step} (max |u| = {magnitude:e})")]
  Unstable { step: usize, magnitude: f64 },

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

impl Error {
  pub(crate) fn out_of_range(kind: &'static str, index: usize, len: usize) -> Self {
    Self::IndexOutOfRange { kind, index, len }
  }
}

/// Rejects non-finite and non-positive parameters.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
  if !value.is_finite() {
    return Err(Error::InvalidArgument {
      name,
      value,
      reason: "must be finite",
    });
  }
  if value <= 0.0 {
    return Err(Error::InvalidArgument {
      name,
      value,
      reason: "must be positive",
    });
  }
  Ok(value)
}
