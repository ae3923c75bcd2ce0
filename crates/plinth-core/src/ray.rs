//! Rays and hit-testing
//!
//! Pointer positions are unprojected through the camera's inverse
//! view-projection matrix; the resulting ray is tested against boxes,
//! triangles and the horizontal drag plane.

use crate::Aabb;
use glam::{Mat4, Vec2, Vec3, Vec4};

/// A ray with a normalized direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.try_normalize().unwrap_or(Vec3::NEG_Z),
        }
    }

    /// Pointer position in pixels to normalized device coordinates
    pub fn pointer_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
        Vec2::new(x / width * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
    }

    /// Unproject an NDC point through an inverse view-projection matrix.
    /// Clip-space depth runs from -1 (near) to 1 (far).
    pub fn from_ndc(ndc: Vec2, inverse_view_projection: &Mat4) -> Self {
        let unproject = |z: f32| {
            let p = *inverse_view_projection * Vec4::new(ndc.x, ndc.y, z, 1.0);
            p.truncate() / p.w
        };
        let near = unproject(-1.0);
        let far = unproject(1.0);
        Self::new(near, far - near)
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Slab test. Returns the distance to the nearest hit in front of the origin.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;

        for i in 0..3 {
            let (o, d) = (self.origin[i], self.direction[i]);
            if d.abs() < 1e-8 {
                if o < aabb.min[i] || o > aabb.max[i] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let (mut t1, mut t2) = ((aabb.min[i] - o) * inv, (aabb.max[i] - o) * inv);
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            tmin = tmin.max(t1);
            tmax = tmax.min(t2);
            if tmin > tmax {
                return None;
            }
        }

        if tmax < 0.0 {
            None
        } else {
            Some(tmin.max(0.0))
        }
    }

    /// Intersection with the horizontal plane `y = height`.
    /// `None` when the ray is parallel to the plane or points away from it.
    pub fn intersect_plane_y(&self, height: f32) -> Option<Vec3> {
        if self.direction.y.abs() < 1e-8 {
            return None;
        }
        let t = (height - self.origin.y) / self.direction.y;
        (t >= 0.0).then(|| self.at(t))
    }

    /// Möller–Trumbore, double sided
    pub fn intersect_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        const EPSILON: f32 = 1e-7;
        let edge1 = b - a;
        let edge2 = c - a;
        let h = self.direction.cross(edge2);
        let det = edge1.dot(h);
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = inv_det * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(edge1);
        let v = inv_det * self.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = inv_det * edge2.dot(q);
        (t > EPSILON).then_some(t)
    }
}
