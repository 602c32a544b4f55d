//! Thermal diffusion on two discretizations.
//!
//! - [`mesh`] and [`assemble`]: linear triangle finite elements, assembled into a
//!   dense stiffness matrix over the interior nodes.
//! - [`domain`], [`gridfn`] and [`diffusion`]: explicit finite differences in time
//!   and space for the 1D heat equation.

extern crate nalgebra as na;
extern crate nalgebra_sparse as nas;

pub mod assemble;
pub mod diffusion;
pub mod domain;
pub mod dump;
pub mod error;
pub mod gridfn;
pub mod matrix;
pub mod mesh;

pub use error::{Error, Result};

pub type Dim = usize;

/// Spatial dimension of the finite element mesh.
pub const DIM: Dim = 2;
