//! Boundary conditions at domain walls and embedded objects.
use crate::mesh::Direction;
use cutcell_geometry::Shape;
use nalgebra::Scalar;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryKind {
    /// The value is prescribed at the boundary.
    Dirichlet,
    /// The derivative is prescribed at the boundary.
    Neumann,
    /// No condition is imposed; the boundary rows use one-sided differences.
    Floating,
}

/// Boundary kinds of the six walls of the mesh, as `[lower, upper]` per axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainBoundaries {
    pub x: [BoundaryKind; 2],
    pub y: [BoundaryKind; 2],
    pub z: [BoundaryKind; 2],
}

impl Default for DomainBoundaries {
    fn default() -> Self {
        Self::uniform(BoundaryKind::Floating)
    }
}

impl DomainBoundaries {
    pub fn uniform(kind: BoundaryKind) -> Self {
        Self {
            x: [kind; 2],
            y: [kind; 2],
            z: [kind; 2],
        }
    }

    pub fn along(&self, direction: Direction) -> [BoundaryKind; 2] {
        match direction {
            Direction::X => self.x,
            Direction::Y => self.y,
            Direction::Z => self.z,
        }
    }

    /// The kind of the lower (`is_upper == false`) or upper wall along `direction`.
    pub fn wall(&self, direction: Direction, is_upper: bool) -> BoundaryKind {
        self.along(direction)[is_upper as usize]
    }

    pub fn with_walls(mut self, direction: Direction, walls: [BoundaryKind; 2]) -> Self {
        match direction {
            Direction::X => self.x = walls,
            Direction::Y => self.y = walls,
            Direction::Z => self.z = walls,
        }
        self
    }
}

/// Boundary kind per embedded object, keyed by object id.
pub type ObjectBoundaries = FxHashMap<usize, BoundaryKind>;

/// A shape placed in the mesh together with the condition imposed on its surface.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct EmbeddedObject<T: Scalar> {
    pub id: usize,
    pub shape: Shape<T>,
    pub boundary: BoundaryKind,
}

impl<T: Scalar> EmbeddedObject<T> {
    pub fn new(id: usize, shape: impl Into<Shape<T>>, boundary: BoundaryKind) -> Self {
        Self {
            id,
            shape: shape.into(),
            boundary,
        }
    }
}

/// Collects the boundary kind of each object. Later objects win on duplicate ids.
pub fn object_boundaries<T: Scalar>(objects: &[EmbeddedObject<T>]) -> ObjectBoundaries {
    objects
        .iter()
        .map(|object| (object.id, object.boundary))
        .collect()
}
