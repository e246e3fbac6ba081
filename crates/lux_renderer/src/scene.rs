//! What the scheduler needs from a scene: something that turns a camera ray
//! into radiance, plus the sky that escaped rays see.

use lux_math::{Ray, Vec3};

use crate::Sampler;

/// Color type alias (linear RGB radiance)
pub type Color = Vec3;

/// Light-transport integrator driven by the render scheduler.
///
/// Called concurrently from worker threads during a parallel render.
pub trait Tracer: Send + Sync {
    /// Full-quality radiance along `ray`. The sampler is the one assigned to
    /// the current pixel and may be drawn from for secondary rays.
    fn trace(&self, ray: &Ray, sky: &Sky, sampler: &Sampler) -> Color;

    /// Cheap single-ray preview radiance. No sampler is involved.
    fn fast_trace(&self, ray: &Ray) -> Color;
}

/// Background radiance for rays that leave the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sky {
    /// Same color in every direction.
    Solid(Color),
    /// Blend from `horizon` (looking straight down) to `zenith` (straight up).
    Gradient { horizon: Color, zenith: Color },
}

impl Sky {
    /// Radiance seen along `direction`.
    pub fn radiance(&self, direction: lux_math::DVec3) -> Color {
        match *self {
            Sky::Solid(color) => color,
            Sky::Gradient { horizon, zenith } => {
                let unit_direction = direction.normalize_or_zero();
                let a = (0.5 * (unit_direction.y + 1.0)) as f32;
                horizon * (1.0 - a) + zenith * a
            }
        }
    }
}

impl Default for Sky {
    fn default() -> Self {
        Sky::Gradient {
            horizon: Color::new(1.0, 1.0, 1.0),
            zenith: Color::new(0.5, 0.7, 1.0),
        }
    }
}

/// A renderable scene: tracer plus sky.
pub struct Scene {
    pub tracer: Box<dyn Tracer>,
    pub sky: Sky,
}

impl Scene {
    pub fn new(tracer: impl Tracer + 'static, sky: Sky) -> Self {
        Self {
            tracer: Box::new(tracer),
            sky,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_math::DVec3;

    #[test]
    fn test_sky_gradient() {
        let sky = Sky::default();

        // Ray pointing up should be more blue (less red than white)
        let up_color = sky.radiance(DVec3::Y);
        // Ray pointing down should be white
        let down_color = sky.radiance(-DVec3::Y);

        assert!(
            up_color.x < down_color.x,
            "up_color.x={} should be < down_color.x={}",
            up_color.x,
            down_color.x
        );
        assert_eq!(down_color, Color::ONE);
        assert!((up_color - Color::new(0.5, 0.7, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_solid_sky_ignores_direction() {
        let sky = Sky::Solid(Color::new(0.2, 0.3, 0.4));
        assert_eq!(sky.radiance(DVec3::X), sky.radiance(DVec3::new(0.0, -5.0, 1.0)));
    }
}
