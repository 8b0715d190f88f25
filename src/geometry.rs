//! Intersections of mesh lines with embedded objects.
//!
//! Every mesh line is marched as a ray from its first point, with the grid spacing as ray
//! direction so that the ray parameter counts grid points. Each crossing of an object surface
//! becomes a [`MeshObjectInfo`] record, and the points between an entering and the following
//! exiting record are collected as solid points. Solid points do not carry unknowns: record
//! `k` of a direction stores its boundary data at solid point `k` of the same direction.
use crate::boundary::EmbeddedObject;
use crate::mesh::{Direction, Mesh};
use cutcell_geometry::{closest_hit, HitInfo, Ray, Surface};
use cutcell_traits::Real;
use log::{debug, info};
use nalgebra::{convert, try_convert, Point3, Scalar, Vector3};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::ops::Range;

/// A crossing of a mesh line with an object surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MeshObjectInfo<T: Scalar> {
    /// Distance from the fluid point to the surface, in units of the grid spacing. Lies in
    /// `(0, 1]`.
    pub psi: T,
    pub position: Point3<T>,
    /// `true` if the line enters the object at this crossing.
    pub ray_outside: bool,
    /// Line coordinate of the solid point next to the surface.
    pub solid_coord: usize,
    /// Line coordinate of the fluid point next to the surface.
    pub fluid_coord: usize,
    pub shape_id: usize,
    pub slow: usize,
    pub fast: usize,
}

impl<T: Scalar> MeshObjectInfo<T> {
    pub fn is_entering(&self) -> bool {
        self.ray_outside
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// There are fewer solid points than surface crossings along a direction, so boundary data
    /// cannot be stored. Usually the mesh is too coarse for the objects.
    InsufficientSolidPoints {
        direction: Direction,
        solid_points: usize,
        records: usize,
    },
    /// Two consecutive crossings on a line both enter or both exit, e.g. for overlapping
    /// objects.
    NonAlternatingRecords {
        direction: Direction,
        slow: usize,
        fast: usize,
    },
    /// A line lies entirely inside an object and has no fluid points.
    FullySolidLine {
        direction: Direction,
        slow: usize,
        fast: usize,
    },
}

impl Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::InsufficientSolidPoints {
                direction,
                solid_points,
                records,
            } => write!(
                f,
                "Direction {} has {} solid points, which cannot store the data of {} boundary crossings.",
                direction, solid_points, records
            ),
            GeometryError::NonAlternatingRecords { direction, slow, fast } => write!(
                f,
                "Surface crossings on line ({}, {}) along {} do not alternate between entering and exiting.",
                slow, fast, direction
            ),
            GeometryError::FullySolidLine { direction, slow, fast } => {
                write!(f, "Line ({}, {}) along {} lies entirely inside an object.", slow, fast, direction)
            }
        }
    }
}

impl Error for GeometryError {}

/// Surface crossings and solid points of all lines along one direction.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionGeometry<T: Scalar> {
    direction: Direction,
    line_counts: (usize, usize),
    line_length: usize,
    records: Vec<MeshObjectInfo<T>>,
    record_offsets: Vec<usize>,
    shape_records: FxHashMap<usize, Vec<usize>>,
    solid_points: Vec<usize>,
    solid_offsets: Vec<usize>,
}

impl<T: Real> DirectionGeometry<T> {
    fn empty(mesh: &Mesh<T>, direction: Direction) -> Self {
        let (n_slow, n_fast) = mesh.line_counts(direction);
        Self {
            direction,
            line_counts: (n_slow, n_fast),
            line_length: mesh.extent(direction),
            records: Vec::new(),
            record_offsets: vec![0; n_slow * n_fast + 1],
            shape_records: FxHashMap::default(),
            solid_points: Vec::new(),
            solid_offsets: vec![0; n_slow * n_fast + 1],
        }
    }

    fn build(mesh: &Mesh<T>, objects: &[EmbeddedObject<T>], direction: Direction) -> Result<Self, GeometryError> {
        let mut geometry = Self::empty(mesh, direction);
        if geometry.line_length < 2 {
            debug!("Skipping intersections along {}: lines consist of a single point.", direction);
            return Ok(geometry);
        }

        let (n_slow, n_fast) = geometry.line_counts;
        let axis = direction.axis();
        let (slow_axis, fast_axis) = direction.transverse_axes();
        let mut ray_direction = Vector3::zeros();
        ray_direction[axis] = mesh.spacing()[axis];
        let t_max = convert::<f64, T>((geometry.line_length - 1) as f64);

        geometry.record_offsets.clear();
        geometry.solid_offsets.clear();
        geometry.record_offsets.push(0);
        geometry.solid_offsets.push(0);
        let mut candidates = Vec::with_capacity(objects.len());

        for slow in 0..n_slow {
            for fast in 0..n_fast {
                let origin = mesh.position(mesh.line_index(direction, slow, fast, 0));
                candidates.clear();
                candidates.extend(
                    objects
                        .iter()
                        .filter(|object| {
                            let bounds = object.shape.bounding_box();
                            bounds.spans(slow_axis, origin[slow_axis]) && bounds.spans(fast_axis, origin[fast_axis])
                        })
                        .map(|object| (object.id, &object.shape)),
                );

                let ray = Ray::new(origin, ray_direction);
                let line_start = geometry.records.len();
                let mut t_min = T::zero();
                while let Some(hit) = closest_hit(candidates.iter().copied(), &ray, t_min, t_max) {
                    t_min = hit.t.next_up();
                    match record_from_hit(&hit, slow, fast, geometry.line_length) {
                        Some(record) => {
                            geometry
                                .shape_records
                                .entry(record.shape_id)
                                .or_default()
                                .push(geometry.records.len());
                            geometry.records.push(record);
                        }
                        None => debug!(
                            "Dropped crossing with shape {} at t = {} on line ({}, {}) along {}: \
                             the surface passes through the end of the line.",
                            hit.shape_id, hit.t, slow, fast, direction
                        ),
                    }
                }
                geometry.record_offsets.push(geometry.records.len());

                let line_records = &geometry.records[line_start..];
                // Without crossings the line is either entirely inside or entirely outside. Points on
                // the surface itself are not strictly inside, so every point is tested.
                if line_records.is_empty()
                    && !candidates.is_empty()
                    && (0..geometry.line_length).any(|coordinate| {
                        let point = mesh.position(mesh.line_index(direction, slow, fast, coordinate));
                        candidates.iter().any(|(_, shape)| shape.contains(&point))
                    })
                {
                    return Err(GeometryError::FullySolidLine { direction, slow, fast });
                }
                let solid_runs = solid_runs(line_records, geometry.line_length)
                    .ok_or(GeometryError::NonAlternatingRecords { direction, slow, fast })?;
                for run in solid_runs {
                    geometry
                        .solid_points
                        .extend(run.map(|coordinate| mesh.line_point(direction, slow, fast, coordinate)));
                }
                geometry.solid_offsets.push(geometry.solid_points.len());
            }
        }

        if geometry.solid_points.len() < geometry.records.len() {
            return Err(GeometryError::InsufficientSolidPoints {
                direction,
                solid_points: geometry.solid_points.len(),
                records: geometry.records.len(),
            });
        }

        debug!(
            "Direction {}: {} surface crossings, {} solid points.",
            direction,
            geometry.records.len(),
            geometry.solid_points.len()
        );
        Ok(geometry)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of `(slow, fast)` line indices.
    pub fn line_counts(&self) -> (usize, usize) {
        self.line_counts
    }

    pub fn num_lines(&self) -> usize {
        self.line_counts.0 * self.line_counts.1
    }

    /// Number of points on each line.
    pub fn line_length(&self) -> usize {
        self.line_length
    }

    /// All crossings, ordered by line and then by position along the line.
    pub fn records(&self) -> &[MeshObjectInfo<T>] {
        &self.records
    }

    /// The range of record indices on line `line = slow * n_fast + fast`.
    pub fn record_range(&self, line: usize) -> Range<usize> {
        self.record_offsets[line]..self.record_offsets[line + 1]
    }

    pub fn records_on_line(&self, slow: usize, fast: usize) -> &[MeshObjectInfo<T>] {
        &self.records[self.record_range(slow * self.line_counts.1 + fast)]
    }

    /// Indices of the records produced by the shape with the given id.
    pub fn records_for_shape(&self, shape_id: usize) -> &[usize] {
        self.shape_records
            .get(&shape_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Flat mesh indices of all solid points, ordered by line and coordinate.
    pub fn solid_points(&self) -> &[usize] {
        &self.solid_points
    }

    pub fn solid_points_on_line(&self, slow: usize, fast: usize) -> &[usize] {
        let line = slow * self.line_counts.1 + fast;
        &self.solid_points[self.solid_offsets[line]..self.solid_offsets[line + 1]]
    }

    /// The flat mesh index where the boundary data of record `record` is stored.
    pub fn storage_index(&self, record: usize) -> usize {
        self.solid_points[record]
    }
}

/// Turns a surface hit at line parameter `t` into a record, or `None` if the fluid point next to
/// the surface lies outside of the line.
fn record_from_hit<T: Real>(hit: &HitInfo<T>, slow: usize, fast: usize, line_length: usize) -> Option<MeshObjectInfo<T>> {
    let (fluid_coord, solid_coord) = if hit.ray_outside {
        let fluid = to_coordinate(hit.t.ceil())?.checked_sub(1)?;
        (fluid, fluid + 1)
    } else {
        let fluid = to_coordinate(hit.t.floor())? + 1;
        (fluid, fluid - 1)
    };
    if fluid_coord >= line_length {
        return None;
    }

    let fluid = convert::<f64, T>(fluid_coord as f64);
    let psi = if hit.ray_outside { hit.t - fluid } else { fluid - hit.t };
    Some(MeshObjectInfo {
        psi,
        position: hit.position,
        ray_outside: hit.ray_outside,
        solid_coord,
        fluid_coord,
        shape_id: hit.shape_id,
        slow,
        fast,
    })
}

fn to_coordinate<T: Real>(value: T) -> Option<usize> {
    let value: f64 = try_convert(value)?;
    (value >= 0.0).then(|| value as usize)
}

/// Ranges of solid line coordinates between entering and exiting records.
///
/// A line that starts with an exiting record is solid from its first point, and a line that
/// ends with an entering record is solid up to its last point. Returns `None` if the records
/// do not alternate.
fn solid_runs<T: Real>(records: &[MeshObjectInfo<T>], line_length: usize) -> Option<Vec<Range<usize>>> {
    let mut runs = Vec::new();
    let mut open: Option<usize> = None;
    for (i, record) in records.iter().enumerate() {
        if record.is_entering() {
            if open.is_some() {
                return None;
            }
            open = Some(record.solid_coord);
        } else {
            let start = match (open.take(), i) {
                (Some(start), _) => start,
                (None, 0) => 0,
                (None, _) => return None,
            };
            // Objects thinner than the spacing give empty runs
            runs.push(start..(record.solid_coord + 1).max(start));
        }
    }
    if let Some(start) = open {
        runs.push(start..line_length);
    }
    Some(runs)
}

/// Surface crossings and solid points of a mesh along all three directions.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGeometry<T: Scalar> {
    directions: Vec<DirectionGeometry<T>>,
}

impl<T: Real> MeshGeometry<T> {
    /// Intersects every mesh line with the given objects.
    ///
    /// Directions are processed in parallel. Errors are deterministic: the error of the first
    /// failing direction (in `x`, `y`, `z` order) is returned.
    pub fn new(mesh: &Mesh<T>, objects: &[EmbeddedObject<T>]) -> Result<Self, GeometryError> {
        let directions = Direction::ALL
            .par_iter()
            .map(|direction| DirectionGeometry::build(mesh, objects, *direction))
            .collect::<Vec<_>>()
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            "Built mesh geometry for {} objects: {} surface crossings in total.",
            objects.len(),
            directions.iter().map(|d| d.records.len()).sum::<usize>()
        );
        Ok(Self { directions })
    }

    pub fn direction(&self, direction: Direction) -> &DirectionGeometry<T> {
        &self.directions[direction.axis()]
    }

    pub fn directions(&self) -> &[DirectionGeometry<T>] {
        &self.directions
    }
}
