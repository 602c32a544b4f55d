//! Module for the (Heat) Diffusion Equation, solved by explicit time stepping
//! until the solution is stationary.

use crate::{
  domain::RectDomain,
  error::{ensure_positive, Error, Result},
  gridfn::GridFn,
};

use tracing::{debug, info, warn};

/// Largest stability number for which the explicit scheme is stable.
pub const STABILITY_LIMIT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
  /// The run has converged once the largest change of a step is below this.
  pub tolerance: f64,
  /// Abort with [`Error::Unstable`] once any value exceeds this magnitude.
  /// `None` disables the check.
  pub divergence_limit: Option<f64>,
}
impl Default for SolverConfig {
  fn default() -> Self {
    Self {
      tolerance: 1e-6,
      divergence_limit: None,
    }
  }
}

/// Progress of a single time step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
  pub step: usize,
  /// Largest pointwise change caused by this step.
  pub max_error: f64,
  pub values: na::DVector<f64>,
}

pub trait StepObserver {
  fn on_step(&mut self, report: &StepReport);
}
impl<F> StepObserver for F
where
  F: FnMut(&StepReport),
{
  fn on_step(&mut self, report: &StepReport) {
    self(report)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Converged { steps: usize },
  StepBudgetExhausted { steps: usize },
}
impl Outcome {
  pub fn steps(&self) -> usize {
    match *self {
      Self::Converged { steps } | Self::StepBudgetExhausted { steps } => steps,
    }
  }
  pub fn is_converged(&self) -> bool {
    matches!(self, Self::Converged { .. })
  }
}

#[derive(Debug, Clone)]
pub struct Solution {
  domain: RectDomain,
  gridfn: GridFn,
  alpha: f64,
  delta_t: f64,
  max_steps: usize,
  config: SolverConfig,
}

impl Solution {
  pub fn new(len: f64, dx: f64, dt: f64, alpha: f64, max_steps: usize) -> Result<Self> {
    let domain = RectDomain::new(len, dx)?;
    let gridfn = GridFn::new(len, dx)?;
    let delta_t = ensure_positive("dt", dt)?;
    let alpha = ensure_positive("alpha", alpha)?;
    if max_steps == 0 {
      return Err(Error::InvalidArgument {
        name: "max_steps",
        value: 0.0,
        reason: "must be positive",
      });
    }

    let stability = gridfn.stability_number(alpha, delta_t);
    if stability > STABILITY_LIMIT {
      warn!(
        stability,
        "alpha*dt/dx^2 exceeds {STABILITY_LIMIT}, the explicit scheme will diverge"
      );
    }

    Ok(Self {
      domain,
      gridfn,
      alpha,
      delta_t,
      max_steps,
      config: SolverConfig::default(),
    })
  }

  pub fn with_config(mut self, config: SolverConfig) -> Self {
    self.config = config;
    self
  }

  pub fn domain(&self) -> &RectDomain {
    &self.domain
  }
  pub fn gridfn(&self) -> &GridFn {
    &self.gridfn
  }
  pub fn config(&self) -> &SolverConfig {
    &self.config
  }
  pub fn max_steps(&self) -> usize {
    self.max_steps
  }

  /// Time steps until the field is stationary or the step budget is used up.
  ///
  /// `observer` is called after every step. Steps are counted from 0.
  pub fn simulate(&mut self, mut observer: impl StepObserver) -> Result<Outcome> {
    info!(
      npoints = self.gridfn.npoints(),
      alpha = self.alpha,
      dt = self.delta_t,
      max_steps = self.max_steps,
      "starting simulation"
    );

    for step in 0..self.max_steps {
      let previous = self.gridfn.values().clone();
      self.gridfn.update(self.alpha, self.delta_t);
      let current = self.gridfn.values();

      let max_error = (current - &previous).amax();
      let magnitude = current.amax();
      debug!(step, max_error);
      observer.on_step(&StepReport {
        step,
        max_error,
        values: current.clone(),
      });

      if let Some(limit) = self.config.divergence_limit {
        if magnitude > limit || current.iter().any(|v| !v.is_finite()) {
          return Err(Error::Unstable { step, magnitude });
        }
      }

      if max_error < self.config.tolerance {
        info!(steps = step + 1, max_error, "converged");
        return Ok(Outcome::Converged { steps: step + 1 });
      }
    }

    info!(steps = self.max_steps, "step budget exhausted");
    Ok(Outcome::StepBudgetExhausted {
      steps: self.max_steps,
    })
  }

  /// Coordinate-value pairs `(i dx, u_i)` of the current field.
  pub fn final_profile(&self) -> Vec<(f64, f64)> {
    let delta = self.domain.delta();
    self
      .gridfn
      .values()
      .iter()
      .enumerate()
      .map(|(i, &v)| (i as f64 * delta, v))
      .collect()
  }
}
