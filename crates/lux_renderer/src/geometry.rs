//! Ray-cast contract for scene geometry.
//!
//! The scheduler never intersects geometry itself; tracers do. This module
//! fixes the contract they program against and ships a sphere as the
//! reference implementation.

use lux_math::{DVec3, Ray};

/// Record of a ray-geometry intersection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RayCastHit {
    /// Point of intersection
    pub point: DVec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: DVec3,
    /// Ray parameter at the intersection
    pub distance: f64,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl RayCastHit {
    /// Set the face normal based on ray direction and outward normal.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: DVec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Anything a ray can be cast against.
pub trait Geometry: Send + Sync {
    /// Cast `ray` and report the nearest hit farther than `epsilon`.
    ///
    /// Returns true and fills `hit` on a hit; leaves `hit` untouched
    /// otherwise.
    fn ray_cast(&self, ray: &Ray, epsilon: f64, hit: &mut RayCastHit) -> bool;
}

/// A sphere primitive.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub center: DVec3,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }
}

impl Geometry for Sphere {
    fn ray_cast(&self, ray: &Ray, epsilon: f64, hit: &mut RayCastHit) -> bool {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Nearest root past epsilon
        let mut root = (h - sqrtd) / a;
        if root <= epsilon {
            root = (h + sqrtd) / a;
            if root <= epsilon {
                return false;
            }
        }

        hit.distance = root;
        hit.point = ray.at(root);
        let outward_normal = (hit.point - self.center) / self.radius;
        hit.set_face_normal(ray, outward_normal);

        true
    }
}

impl<G: Geometry> Geometry for [G] {
    fn ray_cast(&self, ray: &Ray, epsilon: f64, hit: &mut RayCastHit) -> bool {
        let mut closest: Option<RayCastHit> = None;
        for geometry in self {
            let mut candidate = RayCastHit::default();
            if geometry.ray_cast(ray, epsilon, &mut candidate)
                && closest.map_or(true, |c| candidate.distance < c.distance)
            {
                closest = Some(candidate);
            }
        }

        match closest {
            Some(found) => {
                *hit = found;
                true
            }
            None => false,
        }
    }
}
