//! Vector helpers used by shading and camera code.
//!
//! glam covers the arithmetic; these fill in the optics helpers and the
//! checked component access that glam only offers as a panicking index.

use crate::DVec3;
use thiserror::Error;

/// Errors from vector operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("Vector component index {0} out of range (expected 0, 1 or 2)")]
    ComponentOutOfRange(usize),
}

pub type MathResult<T> = Result<T, MathError>;

/// Mirror `i` about the normal `n`.
#[inline]
pub fn reflect(i: DVec3, n: DVec3) -> DVec3 {
    i - 2.0 * n.dot(i) * n
}

/// Refract `i` through a surface with normal `n` and relative index `eta`.
///
/// Returns the zero vector on total internal reflection.
pub fn refract(i: DVec3, n: DVec3, eta: f64) -> DVec3 {
    let cosi = (-i).dot(n);
    let cost2 = 1.0 - eta * eta * (1.0 - cosi * cosi);
    if cost2 > 0.0 {
        eta * i + (eta * cosi - cost2.abs().sqrt()) * n
    } else {
        DVec3::ZERO
    }
}

/// Angle between two vectors, in degrees.
pub fn angle_degrees(from: DVec3, to: DVec3) -> f64 {
    let d = from.normalize().dot(to.normalize()).clamp(-1.0, 1.0);
    d.acos().to_degrees()
}

/// Project `v` onto `normal`. A degenerate normal yields zero.
pub fn project(v: DVec3, normal: DVec3) -> DVec3 {
    let n = normal.dot(normal);
    if n >= f64::MIN_POSITIVE {
        normal * v.dot(normal) / n
    } else {
        DVec3::ZERO
    }
}

/// Remove the component of `v` along `plane_normal`.
pub fn project_on_plane(v: DVec3, plane_normal: DVec3) -> DVec3 {
    v - project(v, plane_normal)
}

/// Read component `index` (0 = x, 1 = y, 2 = z).
pub fn component(v: DVec3, index: usize) -> MathResult<f64> {
    match index {
        0 => Ok(v.x),
        1 => Ok(v.y),
        2 => Ok(v.z),
        _ => Err(MathError::ComponentOutOfRange(index)),
    }
}

/// Write component `index` (0 = x, 1 = y, 2 = z).
pub fn set_component(v: &mut DVec3, index: usize, value: f64) -> MathResult<()> {
    match index {
        0 => v.x = value,
        1 => v.y = value,
        2 => v.z = value,
        _ => return Err(MathError::ComponentOutOfRange(index)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_reflect_off_floor() {
        let i = DVec3::new(1.0, -1.0, 0.0);
        let r = reflect(i, DVec3::Y);
        assert_eq!(r, DVec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_straight_through() {
        // Head-on ray with matched indices passes unchanged
        let i = DVec3::new(0.0, -1.0, 0.0);
        let t = refract(i, DVec3::Y, 1.0);
        assert!((t - i).length() < EPS);
    }

    #[test]
    fn test_refract_bends_toward_normal() {
        let i = DVec3::new(1.0, -1.0, 0.0).normalize();
        let t = refract(i, DVec3::Y, 1.0 / 1.5);
        assert!(t.x > 0.0 && t.x < i.x);
        assert!((t.length() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_total_internal_reflection() {
        let i = DVec3::new(1.0, -0.1, 0.0).normalize();
        assert_eq!(refract(i, DVec3::Y, 1.5), DVec3::ZERO);
    }

    #[test]
    fn test_angle_degrees() {
        assert!((angle_degrees(DVec3::X, DVec3::Y) - 90.0).abs() < 1e-9);
        assert!(angle_degrees(DVec3::X, DVec3::X * 3.0).abs() < 1e-6);
        assert!((angle_degrees(DVec3::X, -DVec3::X) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_project() {
        let v = DVec3::new(3.0, 4.0, 5.0);
        assert_eq!(project(v, DVec3::Y * 2.0), DVec3::new(0.0, 4.0, 0.0));
        assert_eq!(project_on_plane(v, DVec3::Y), DVec3::new(3.0, 0.0, 5.0));
        assert_eq!(project(v, DVec3::ZERO), DVec3::ZERO);
    }

    #[test]
    fn test_component_access() {
        let mut v = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(component(v, 0), Ok(1.0));
        assert_eq!(component(v, 2), Ok(3.0));
        assert_eq!(component(v, 3), Err(MathError::ComponentOutOfRange(3)));

        set_component(&mut v, 1, 7.0).unwrap();
        assert_eq!(v.y, 7.0);
        assert_eq!(
            set_component(&mut v, 5, 0.0),
            Err(MathError::ComponentOutOfRange(5))
        );
        assert_eq!(v, DVec3::new(1.0, 7.0, 3.0));
    }
}
