//! Segmentation of mesh lines into boundary-to-boundary runs of fluid points.
use crate::geometry::DirectionGeometry;
use crate::mesh::{Direction, Mesh};
use cutcell_traits::Real;
use nalgebra::Scalar;
use std::ops::RangeInclusive;

/// The object side of a [`Boundary`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ObjectBoundary<T: Scalar> {
    /// Index of the crossing in the direction's record list.
    pub object_coordinate: usize,
    pub object_id: usize,
    pub psi: T,
}

/// One end of a [`Line`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Boundary<T: Scalar> {
    /// Flat mesh index of the outermost fluid point.
    pub mesh_index: usize,
    /// Coordinate of the outermost fluid point along the line.
    pub coordinate: usize,
    /// `None` for a domain wall.
    pub object: Option<ObjectBoundary<T>>,
}

impl<T: Scalar> Boundary<T> {
    pub fn is_domain_wall(&self) -> bool {
        self.object.is_none()
    }
}

/// A maximal run of fluid points along a mesh line, bounded by domain walls or objects.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Line<T: Scalar> {
    pub direction: Direction,
    /// Flat index step between consecutive points.
    pub stride: usize,
    pub slow: usize,
    pub fast: usize,
    pub start: Boundary<T>,
    pub end: Boundary<T>,
}

impl<T: Scalar> Line<T> {
    /// Number of points, including both boundary points.
    pub fn len(&self) -> usize {
        (self.end.coordinate + 1).saturating_sub(self.start.coordinate)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn coordinates(&self) -> RangeInclusive<usize> {
        self.start.coordinate..=self.end.coordinate
    }

    /// Flat mesh index of point `k` of the run.
    pub fn mesh_index(&self, k: usize) -> usize {
        self.start.mesh_index + k * self.stride
    }
}

/// Collects all lines along the direction of `geometry`, ordered by `(slow, fast)` and then by
/// position along the mesh line.
pub fn lines<T: Real>(mesh: &Mesh<T>, geometry: &DirectionGeometry<T>) -> Vec<Line<T>> {
    LineIter::new(mesh, geometry).collect()
}

/// Lazily enumerates the lines along one direction.
#[derive(Debug, Clone)]
pub struct LineIter<'a, T: Scalar> {
    mesh: &'a Mesh<T>,
    geometry: &'a DirectionGeometry<T>,
    line: usize,
    next_record: usize,
    pending: Option<Boundary<T>>,
    started: bool,
}

impl<'a, T: Real> LineIter<'a, T> {
    pub fn new(mesh: &'a Mesh<T>, geometry: &'a DirectionGeometry<T>) -> Self {
        Self {
            mesh,
            geometry,
            line: 0,
            next_record: 0,
            pending: None,
            started: false,
        }
    }

    fn domain_wall(&self, slow: usize, fast: usize, coordinate: usize) -> Boundary<T> {
        Boundary {
            mesh_index: self
                .mesh
                .line_point(self.geometry.direction(), slow, fast, coordinate),
            coordinate,
            object: None,
        }
    }

    fn make_line(&self, slow: usize, fast: usize, start: Boundary<T>, end: Boundary<T>) -> Line<T> {
        let direction = self.geometry.direction();
        Line {
            direction,
            stride: self.mesh.stride(direction),
            slow,
            fast,
            start,
            end,
        }
    }
}

impl<'a, T: Real> Iterator for LineIter<'a, T> {
    type Item = Line<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let (_, n_fast) = self.geometry.line_counts();
        let direction = self.geometry.direction();
        while self.line < self.geometry.num_lines() {
            let (slow, fast) = (self.line / n_fast, self.line % n_fast);
            let records = self.geometry.record_range(self.line);
            if !self.started {
                self.started = true;
                self.next_record = records.start;
                self.pending = Some(self.domain_wall(slow, fast, 0));
            }

            while self.next_record < records.end {
                let index = self.next_record;
                self.next_record += 1;
                let record = &self.geometry.records()[index];
                let boundary = Boundary {
                    mesh_index: self
                        .mesh
                        .line_point(direction, slow, fast, record.fluid_coord),
                    coordinate: record.fluid_coord,
                    object: Some(ObjectBoundary {
                        object_coordinate: index,
                        object_id: record.shape_id,
                        psi: record.psi,
                    }),
                };
                if record.is_entering() {
                    if let Some(start) = self.pending.take() {
                        return Some(self.make_line(slow, fast, start, boundary));
                    }
                } else {
                    self.pending = Some(boundary);
                }
            }

            self.line += 1;
            self.started = false;
            if let Some(start) = self.pending.take() {
                let end = self.domain_wall(slow, fast, self.geometry.line_length() - 1);
                return Some(self.make_line(slow, fast, start, end));
            }
        }
        None
    }
}
