//! Assembly of the global stiffness matrix for the scalar diffusion operator.
//!
//! Only interior nodes carry degrees of freedom. For each element the local
//! block `(B^T C) B` is formed, where the rows of `B^T` are the shape function
//! gradients of the interior vertices and `C` is the diagonal material matrix,
//! and scatter-added into the global matrix at the interior ids.

use crate::{
  error::Result,
  matrix::StiffnessMatrix,
  mesh::{ElementIdx, FeGrid, NodeIdx, VERTICES},
  DIM,
};

use std::path::Path;
use tracing::{debug, info};

/// Diagonal coefficient of the material matrix of the benchmark problem.
pub const POISSON_COEFF: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
  pub coeff: f64,
}
impl Default for Material {
  fn default() -> Self {
    Self {
      coeff: POISSON_COEFF,
    }
  }
}
impl Material {
  pub fn new(coeff: f64) -> Self {
    Self { coeff }
  }

  /// $C = K I$
  pub fn c_matrix(&self) -> na::DMatrix<f64> {
    na::DMatrix::from_diagonal_element(DIM, DIM, self.coeff)
  }
}

/// Contribution of a single element, restricted to its interior vertices.
#[derive(Debug, Clone)]
pub struct ElementStiffness {
  pub element: ElementIdx,
  /// Global node indices of the interior vertices, in local vertex order.
  pub interior_vertices: Vec<NodeIdx>,
  /// $B^T$, one gradient per row.
  pub grad_transpose: na::DMatrix<f64>,
  /// $B^T C$
  pub partial: na::DMatrix<f64>,
  /// $(B^T C) B$
  pub local: na::DMatrix<f64>,
}
impl ElementStiffness {
  pub fn ninterior(&self) -> usize {
    self.interior_vertices.len()
  }

  /// $B^T C$ in row-major order.
  pub fn partial_row_major(&self) -> Vec<f64> {
    self.partial.transpose().as_slice().to_vec()
  }

  /// Dumps $B^T C$ as raw doubles, truncating `path`.
  pub fn dump_partial(&self, path: impl AsRef<Path>) -> Result<()> {
    crate::dump::dump_f64s(path, &self.partial_row_major(), false)
  }
}

/// Observes every element contribution during assembly.
/// An error aborts the assembly.
pub trait ElementHook {
  fn visit(&mut self, elstiff: &ElementStiffness) -> Result<()>;
}
impl<F> ElementHook for F
where
  F: FnMut(&ElementStiffness) -> Result<()>,
{
  fn visit(&mut self, elstiff: &ElementStiffness) -> Result<()> {
    self(elstiff)
  }
}

pub fn element_stiffness(
  grid: &FeGrid,
  ielement: ElementIdx,
  material: &Material,
) -> Result<ElementStiffness> {
  let element = grid.element(ielement)?;

  let mut interior_locals = Vec::with_capacity(VERTICES);
  let mut interior_vertices = Vec::with_capacity(VERTICES);
  for (ilocal, &inode) in element.vertices().iter().enumerate() {
    if grid.node(inode)?.is_interior() {
      interior_locals.push(ilocal);
      interior_vertices.push(inode);
    }
  }
  let ninterior = interior_locals.len();

  let mut grad_transpose = na::DMatrix::zeros(ninterior, DIM);
  for (irow, &ilocal) in interior_locals.iter().enumerate() {
    let grad = grid.gradient(ielement, ilocal)?;
    grad_transpose.set_row(irow, &grad.transpose());
  }

  let c = material.c_matrix();
  let partial = &grad_transpose * &c;
  let grad = grad_transpose.transpose();
  let local = &partial * grad;

  Ok(ElementStiffness {
    element: ielement,
    interior_vertices,
    grad_transpose,
    partial,
    local,
  })
}

pub fn assemble_stiffness(grid: &FeGrid, material: &Material) -> Result<StiffnessMatrix> {
  assemble_stiffness_with(grid, material, |_: &ElementStiffness| -> Result<()> { Ok(()) })
}

/// Assembly algorithm for the global stiffness matrix.
pub fn assemble_stiffness_with(
  grid: &FeGrid,
  material: &Material,
  mut hook: impl ElementHook,
) -> Result<StiffnessMatrix> {
  let mut galmat = StiffnessMatrix::zeros(grid.ninterior_nodes());

  for ielement in 0..grid.nelements() {
    let elstiff = element_stiffness(grid, ielement, material)?;
    hook.visit(&elstiff)?;

    if elstiff.ninterior() == 0 {
      continue;
    }
    debug!(
      element = ielement,
      ninterior = elstiff.ninterior(),
      "scattering element matrix"
    );

    let global_ids: Vec<usize> = elstiff
      .interior_vertices
      .iter()
      .map(|&inode| match grid.nodes()[inode].interior_id() {
        Some(id) => id,
        None => panic!("interior node {inode} has no interior id"),
      })
      .collect();

    for (ilocal, &iglobal) in global_ids.iter().enumerate() {
      for (jlocal, &jglobal) in global_ids.iter().enumerate() {
        galmat.add(iglobal, jglobal, elstiff.local[(ilocal, jlocal)]);
      }
    }
  }

  info!(
    dim = galmat.dim(),
    nnz = galmat.nnz(),
    "assembled stiffness matrix"
  );
  Ok(galmat)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::mesh::{BoundaryClassifier, Element, Position};

  use approx::assert_relative_eq;

  /// Unit right triangle with the given vertices flagged as boundary.
  fn triangle(boundary: [bool; 3]) -> FeGrid {
    FeGrid::new(
      vec![
        Position::new(0.0, 0.0),
        Position::new(1.0, 0.0),
        Position::new(0.0, 1.0),
      ],
      vec![Element::new([0, 1, 2])],
      &BoundaryClassifier::Flags(boundary.to_vec()),
    )
    .unwrap()
  }

  #[test]
  fn all_interior_element_matrix() {
    let grid = triangle([false; 3]);
    let elstiff = element_stiffness(&grid, 0, &Material::new(1.0)).unwrap();

    #[rustfmt::skip]
    let expected = na::dmatrix![
       2.0,-1.0,-1.0;
      -1.0, 1.0, 0.0;
      -1.0, 0.0, 1.0;
    ];
    assert_relative_eq!(elstiff.local, expected);
    assert_eq!(elstiff.partial.shape(), (3, 2));
  }

  #[test]
  fn boundary_vertices_are_skipped() {
    let grid = triangle([true, false, true]);
    let elstiff = element_stiffness(&grid, 0, &Material::default()).unwrap();
    assert_eq!(elstiff.interior_vertices, vec![1]);
    assert_relative_eq!(elstiff.partial, na::dmatrix![POISSON_COEFF, 0.0]);
    assert_relative_eq!(elstiff.local, na::dmatrix![POISSON_COEFF]);

    let grid = triangle([true; 3]);
    let elstiff = element_stiffness(&grid, 0, &Material::default()).unwrap();
    assert_eq!(elstiff.ninterior(), 0);
    assert_eq!(elstiff.local.shape(), (0, 0));
  }

  #[test]
  fn partial_is_row_major() {
    let grid = triangle([false; 3]);
    let elstiff = element_stiffness(&grid, 0, &Material::new(2.0)).unwrap();
    assert_eq!(
      elstiff.partial_row_major(),
      vec![-2.0, -2.0, 2.0, 0.0, 0.0, 2.0]
    );
  }

  #[test]
  fn hook_sees_every_element_and_can_abort() {
    let grid = triangle([false, true, true]);
    let mut seen = Vec::new();
    let galmat = assemble_stiffness_with(&grid, &Material::new(1.0), |e: &ElementStiffness| -> Result<()> {
      seen.push(e.element);
      Ok(())
    })
    .unwrap();
    assert_eq!(seen, vec![0]);
    assert_relative_eq!(galmat.get(0, 0).unwrap(), 2.0);

    let result = assemble_stiffness_with(&grid, &Material::new(1.0), |e: &ElementStiffness| -> Result<()> {
      Err(crate::Error::out_of_range("element", e.element, 0))
    });
    assert!(result.is_err());
  }
}
