//! Plain-data description of a discretization and its construction.
use crate::boundary::{object_boundaries, DomainBoundaries, EmbeddedObject, ObjectBoundaries};
use crate::geometry::MeshGeometry;
use crate::mesh::{Direction, Mesh};
use crate::operator::DirectionalOperator;
use crate::stencil::Stencil;
use cutcell_traits::Real;
use eyre::{eyre, WrapErr};
use log::info;
use nalgebra::{Point3, Scalar};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct MeshConfig<T: Scalar> {
    /// Number of points along each axis.
    pub extents: [usize; 3],
    pub min: [T; 3],
    pub max: [T; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct DiscretizationConfig<T: Scalar> {
    pub mesh: MeshConfig<T>,
    #[serde(default)]
    pub objects: Vec<EmbeddedObject<T>>,
    #[serde(default)]
    pub domain_boundaries: DomainBoundaries,
}

/// A mesh with embedded objects and the derivative operators along each of its directions.
#[derive(Debug, Clone)]
pub struct Discretization<T: Real> {
    mesh: Mesh<T>,
    objects: Vec<EmbeddedObject<T>>,
    object_boundaries: ObjectBoundaries,
    domain_boundaries: DomainBoundaries,
    geometry: MeshGeometry<T>,
    operators: Vec<Option<DirectionalOperator<T>>>,
}

impl<T: Real> MeshConfig<T> {
    pub fn to_mesh(&self) -> eyre::Result<Mesh<T>> {
        for axis in 0..3 {
            if self.extents[axis] == 0 {
                return Err(eyre!("mesh extent along axis {} must be positive", axis));
            }
            if self.extents[axis] > 1 && !(self.min[axis] < self.max[axis]) {
                return Err(eyre!(
                    "mesh bounds along axis {} must be increasing (min {}, max {})",
                    axis,
                    self.min[axis],
                    self.max[axis]
                ));
            }
        }
        Ok(Mesh::new(self.extents, Point3::from(self.min), Point3::from(self.max)))
    }
}

impl<T: Real> Discretization<T> {
    /// Builds the mesh, the geometry and one operator for each direction with more than one
    /// mesh point. Directions are assembled in parallel.
    pub fn from_config<S>(config: &DiscretizationConfig<T>, stencil: &S) -> eyre::Result<Self>
    where
        S: ?Sized + Stencil<T> + Sync,
    {
        let mesh = config.mesh.to_mesh().wrap_err("invalid mesh configuration")?;

        let mut ids = FxHashSet::default();
        for object in &config.objects {
            if !ids.insert(object.id) {
                return Err(eyre!("duplicate object id {}", object.id));
            }
        }
        let objects = config.objects.clone();
        let object_boundaries = object_boundaries(&objects);
        let domain_boundaries = config.domain_boundaries;

        let geometry = MeshGeometry::new(&mesh, &objects).wrap_err("failed to intersect mesh lines with objects")?;

        let operators = Direction::ALL
            .par_iter()
            .map(|&direction| {
                if mesh.extent(direction) < 2 {
                    return Ok(None);
                }
                DirectionalOperator::new(
                    direction,
                    stencil,
                    &mesh,
                    &geometry,
                    &domain_boundaries,
                    &object_boundaries,
                )
                .map(Some)
                .wrap_err_with(|| format!("failed to assemble operator along {}", direction))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .collect::<eyre::Result<Vec<_>>>()?;

        info!(
            "Discretized {:?} mesh with {} objects ({} directional operators).",
            mesh.extents(),
            objects.len(),
            operators.iter().flatten().count()
        );

        Ok(Self {
            mesh,
            objects,
            object_boundaries,
            domain_boundaries,
            geometry,
            operators,
        })
    }

    pub fn mesh(&self) -> &Mesh<T> {
        &self.mesh
    }

    pub fn objects(&self) -> &[EmbeddedObject<T>] {
        &self.objects
    }

    pub fn object_boundaries(&self) -> &ObjectBoundaries {
        &self.object_boundaries
    }

    pub fn domain_boundaries(&self) -> &DomainBoundaries {
        &self.domain_boundaries
    }

    pub fn geometry(&self) -> &MeshGeometry<T> {
        &self.geometry
    }

    /// The operator along `direction`, or `None` if the mesh has a single point along it.
    pub fn operator(&self, direction: Direction) -> Option<&DirectionalOperator<T>> {
        self.operators[direction.axis()].as_ref()
    }
}
