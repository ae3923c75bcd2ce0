//! Axis-aligned bounding boxes

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Bounds of a point cloud, `None` when there are no points
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        Some(points.iter().skip(1).fold(
            Self {
                min: first,
                max: first,
            },
            |acc, p| Self {
                min: acc.min.min(*p),
                max: acc.max.max(*p),
            },
        ))
    }

    pub fn from_positions(positions: &[[f32; 3]]) -> Option<Self> {
        let points: Vec<Vec3> = positions.iter().map(|p| Vec3::from_array(*p)).collect();
        Self::from_points(&points)
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Bounds of this box after a world transform.
    ///
    /// Projects each axis extent through the rotation/scale columns, which
    /// gives the same result as transforming all eight corners.
    pub fn transformed(&self, mat: &Mat4) -> Aabb {
        let translation = mat.w_axis.truncate();
        let mut min = translation;
        let mut max = translation;

        let columns = [mat.x_axis.truncate(), mat.y_axis.truncate(), mat.z_axis.truncate()];
        for (i, column) in columns.iter().enumerate() {
            let a = *column * self.min[i];
            let b = *column * self.max[i];
            min += a.min(b);
            max += a.max(b);
        }

        Aabb { min, max }
    }
}
