// Re-export glam for convenience
pub use glam::*;

// Lux math types
mod ray;
mod vector;

pub use ray::Ray;
pub use vector::{
    angle_degrees, component, project, project_on_plane, reflect, refract, set_component,
    MathError, MathResult,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dvec3_creation() {
        let v = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_dvec3_operations() {
        let a = DVec3::new(1.0, 2.0, 3.0);
        let b = DVec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, DVec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.cross(b), DVec3::new(-3.0, 6.0, -3.0));
    }
}
