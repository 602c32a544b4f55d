//! A mesh of linear triangles in the plane.
//!
//! The [`FeGrid`] owns all nodes and elements and provides the global
//! numbering used by the elements. On construction every node is classified
//! as interior or boundary, and the interior nodes receive a dense numbering
//! which is the row/column index into the assembled stiffness matrix.
//! The grid is immutable once built.

pub mod boundary;
pub mod io;

pub use boundary::BoundaryClassifier;

use crate::{
  error::{Error, Result},
  DIM,
};

use std::path::Path;
use tracing::info;

pub type NodeIdx = usize;
pub type ElementIdx = usize;
pub type Position = na::Vector2<f64>;

/// Number of vertices of an element.
pub const VERTICES: usize = DIM + 1;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
  position: Position,
  is_interior: bool,
  /// Index into the interior numbering. `Some` iff the node is interior.
  interior_id: Option<usize>,
}
impl Node {
  pub fn new_interior(position: Position, interior_id: usize) -> Self {
    Self {
      position,
      is_interior: true,
      interior_id: Some(interior_id),
    }
  }
  pub fn new_boundary(position: Position) -> Self {
    Self {
      position,
      is_interior: false,
      interior_id: None,
    }
  }

  pub fn position(&self) -> &Position {
    &self.position
  }
  pub fn is_interior(&self) -> bool {
    self.is_interior
  }
  pub fn interior_id(&self) -> Option<usize> {
    self.interior_id
  }
}

/// A triangle given by the global indices of its vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Element {
  vertices: [NodeIdx; VERTICES],
}
impl Element {
  /// Sentinel for a vertex slot that was never filled.
  pub const INVALID: NodeIdx = NodeIdx::MAX;

  pub fn new(vertices: [NodeIdx; VERTICES]) -> Self {
    Self { vertices }
  }

  pub fn vertices(&self) -> &[NodeIdx; VERTICES] {
    &self.vertices
  }
  /// Global index of the local vertex `ilocal`.
  pub fn vertex(&self, ilocal: usize) -> Result<NodeIdx> {
    self
      .vertices
      .get(ilocal)
      .copied()
      .ok_or(Error::out_of_range("local vertex", ilocal, VERTICES))
  }
  pub fn is_valid(&self) -> bool {
    self.vertices.iter().all(|&v| v != Self::INVALID)
  }
}
impl Default for Element {
  fn default() -> Self {
    Self {
      vertices: [Self::INVALID; VERTICES],
    }
  }
}

#[derive(Debug, Clone)]
pub struct FeGrid {
  nodes: Vec<Node>,
  elements: Vec<Element>,
  ninterior_nodes: usize,
}

// constructors
impl FeGrid {
  /// Builds the grid from node positions and element connectivity (0-based).
  pub fn new(
    positions: Vec<Position>,
    elements: Vec<Element>,
    classifier: &BoundaryClassifier,
  ) -> Result<Self> {
    let flags = classifier.classify(&positions)?;

    // Also catches unset vertex slots.
    for element in &elements {
      for &v in element.vertices() {
        if v >= positions.len() {
          return Err(Error::out_of_range("node", v, positions.len()));
        }
      }
    }

    let mut ninterior_nodes = 0;
    let nodes = positions
      .into_iter()
      .zip(flags)
      .map(|(position, is_boundary)| {
        if is_boundary {
          Node::new_boundary(position)
        } else {
          ninterior_nodes += 1;
          Node::new_interior(position, ninterior_nodes - 1)
        }
      })
      .collect();

    Ok(Self {
      nodes,
      elements,
      ninterior_nodes,
    })
  }

  /// Reads `.node` and `.elem` data from the given readers.
  pub fn from_readers<N, E>(nodes: N, elements: E, classifier: &BoundaryClassifier) -> Result<Self>
  where
    N: std::io::BufRead,
    E: std::io::BufRead,
  {
    let positions = io::read_nodes(nodes, "nodes")?;
    let elements = io::read_elements(elements, "elements", positions.len())?;
    Self::new(positions, elements, classifier)
  }

  pub fn from_files(
    node_path: impl AsRef<Path>,
    element_path: impl AsRef<Path>,
    classifier: &BoundaryClassifier,
  ) -> Result<Self> {
    let node_path = node_path.as_ref();
    let element_path = element_path.as_ref();

    let positions = io::read_nodes(
      io::open(node_path)?,
      &node_path.display().to_string(),
    )?;
    let elements = io::read_elements(
      io::open(element_path)?,
      &element_path.display().to_string(),
      positions.len(),
    )?;
    let grid = Self::new(positions, elements, classifier)?;

    info!(
      nnodes = grid.nnodes(),
      ninterior = grid.ninterior_nodes(),
      nelements = grid.nelements(),
      "loaded mesh from {}",
      node_path.display()
    );
    Ok(grid)
  }

  /// Resolves `<prefix>.node` and `<prefix>.elem`.
  pub fn from_prefix(prefix: &str, classifier: &BoundaryClassifier) -> Result<Self> {
    Self::from_files(
      format!("{prefix}.node"),
      format!("{prefix}.elem"),
      classifier,
    )
  }
}

// getters
impl FeGrid {
  pub fn nnodes(&self) -> usize {
    self.nodes.len()
  }
  pub fn nelements(&self) -> usize {
    self.elements.len()
  }
  pub fn ninterior_nodes(&self) -> usize {
    self.ninterior_nodes
  }
  pub fn nodes(&self) -> &[Node] {
    &self.nodes
  }
  pub fn elements(&self) -> &[Element] {
    &self.elements
  }
  pub fn node(&self, inode: NodeIdx) -> Result<&Node> {
    self
      .nodes
      .get(inode)
      .ok_or(Error::out_of_range("node", inode, self.nnodes()))
  }
  pub fn element(&self, ielement: ElementIdx) -> Result<&Element> {
    self
      .elements
      .get(ielement)
      .ok_or(Error::out_of_range("element", ielement, self.nelements()))
  }
  /// The node at local vertex `ilocal` of element `ielement`.
  pub fn element_node(&self, ielement: ElementIdx, ilocal: usize) -> Result<&Node> {
    let inode = self.element(ielement)?.vertex(ilocal)?;
    self.node(inode)
  }
}

// geometry
impl FeGrid {
  /// Edge vectors from local vertex `ilocal` to the two following vertices
  /// (in cyclic order) together with their determinant, which is twice the
  /// signed area of the element.
  fn edge_vectors(&self, ielement: ElementIdx, ilocal: usize) -> Result<(Position, Position, f64)> {
    let element = self.element(ielement)?;
    let base = self.node(element.vertex(ilocal)?)?.position();

    let d0 = self.node(element.vertex((ilocal + 1) % VERTICES)?)?.position() - base;
    let d1 = self.node(element.vertex((ilocal + 2) % VERTICES)?)?.position() - base;
    let det = d0.x * d1.y - d1.x * d0.y;
    Ok((d0, d1, det))
  }

  /// Constant gradient of the linear shape function belonging to local
  /// vertex `ilocal` of element `ielement`.
  ///
  /// Fails with [`Error::DegenerateElement`] for collinear vertices.
  pub fn gradient(&self, ielement: ElementIdx, ilocal: usize) -> Result<na::Vector2<f64>> {
    let (d0, d1, det) = self.edge_vectors(ielement, ilocal)?;

    // Written negated so that a NaN determinant counts as degenerate.
    if !(det.abs() > f64::EPSILON * d0.norm() * d1.norm()) {
      return Err(Error::DegenerateElement {
        element: ielement,
        det,
      });
    }

    Ok(na::Vector2::new(-(d1.y - d0.y), d1.x - d0.x) / det)
  }

  /// Unsigned area of element `ielement`.
  pub fn element_area(&self, ielement: ElementIdx) -> Result<f64> {
    let (_, _, det) = self.edge_vectors(ielement, 0)?;
    Ok(det.abs() / 2.0)
  }
}
