use crate::{
  domain::checked_npoints,
  error::{ensure_positive, Result},
};

/// Scalar field sampled on the uniform 1D grid `x_i = i dx`,
/// `i = 0..floor(len/dx) + 2`.
///
/// The first and last sample are Dirichlet boundary values and are never
/// touched by [`GridFn::update`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridFn {
  len: f64,
  delta: f64,
  values: na::DVector<f64>,
}

impl GridFn {
  pub fn new(len: f64, dx: f64) -> Result<Self> {
    let len = ensure_positive("len", len)?;
    let delta = ensure_positive("dx", dx)?;

    let npoints = checked_npoints(len, delta, 2)?;
    let mut values =
      na::DVector::from_iterator(npoints, (0..npoints).map(|i| Self::profile(len, i as f64 * delta)));
    values[0] = 0.0;
    values[npoints - 1] = 0.0;

    Ok(Self { len, delta, values })
  }

  /// Initial temperature profile $f(x) = x sqrt((L - x)^3)$.
  ///
  /// Evaluates to zero beyond `len`.
  pub fn profile(len: f64, x: f64) -> f64 {
    let rem = (len - x).max(0.0);
    x * rem.sqrt() * rem
  }

  /// Advances the field by one explicit Euler step of $u_t = alpha u_(x x)$
  /// using the central second difference in space.
  ///
  /// Stable only if [`Self::stability_number`] is at most 1/2, which is not checked.
  pub fn update(&mut self, alpha: f64, delta_t: f64) {
    let n = self.values.len();
    let r = alpha * delta_t / (self.delta * self.delta);

    let old = &self.values;
    let mut new = old.clone();
    for i in 1..n - 1 {
      new[i] = old[i] + r * (old[i - 1] - 2.0 * old[i] + old[i + 1]);
    }
    self.values = new;
  }

  /// $alpha Delta t / Delta x^2$
  pub fn stability_number(&self, alpha: f64, delta_t: f64) -> f64 {
    alpha * delta_t / (self.delta * self.delta)
  }

  pub fn values(&self) -> &na::DVector<f64> {
    &self.values
  }
  pub fn len(&self) -> f64 {
    self.len
  }
  pub fn delta(&self) -> f64 {
    self.delta
  }
  pub fn npoints(&self) -> usize {
    self.values.len()
  }
  pub fn position(&self, i: usize) -> f64 {
    i as f64 * self.delta
  }
}
