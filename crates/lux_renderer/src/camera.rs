//! Camera for ray generation and render orchestration.
//!
//! The camera owns its orientation (fixed at construction), the bound render
//! target and the sampler pool. Rendering itself is delegated to the
//! scheduler.

use std::sync::Arc;

use lux_math::{DVec2, DVec3, Ray};

use crate::config::{ExecutionMode, Quality, RenderConfig};
use crate::error::{RenderError, RenderResult};
use crate::sampler::{Sampler, SamplerKind, DEFAULT_NUM_SETS};
use crate::scene::Scene;
use crate::scheduler::{self, CancelToken, Progress, RenderPass};
use crate::target::RenderTarget;

/// Degrees to radians, at the precision reference renders were made with.
const DEG_TO_RAD: f64 = 0.01745329252;

/// Perspective camera with a near-plane ray origin.
pub struct Camera {
    position: DVec3,
    right: DVec3,
    up: DVec3,
    forward: DVec3,
    near: f64,
    field_of_view: f64,

    // Half extents of the near-plane viewport (set by set_render_target)
    viewport_width: f64,
    viewport_height: f64,

    target: Option<Arc<dyn RenderTarget>>,
    samplers: Vec<Sampler>,
    config: RenderConfig,
}

impl Camera {
    /// Create a camera at `position`, rotated by `euler` (degrees, applied
    /// about Z, then X, then Y), with the near plane at `near` and a vertical
    /// field of view of `field_of_view` degrees.
    pub fn new(position: DVec3, euler: DVec3, near: f64, field_of_view: f64) -> Self {
        let [right, up, forward] = basis_from_euler(euler);
        Self {
            position,
            right,
            up,
            forward,
            near,
            field_of_view,
            viewport_width: 0.0,
            viewport_height: 0.0,
            target: None,
            samplers: Vec::new(),
            config: RenderConfig::default(),
        }
    }

    /// Set render configuration. Call before `set_sampler`, which sizes the
    /// sampler pool from it.
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn right(&self) -> DVec3 {
        self.right
    }

    pub fn up(&self) -> DVec3 {
        self.up
    }

    pub fn forward(&self) -> DVec3 {
        self.forward
    }

    pub fn near(&self) -> f64 {
        self.near
    }

    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    /// Half width and half height of the near-plane viewport. Zero until a
    /// render target is bound.
    pub fn viewport(&self) -> (f64, f64) {
        (self.viewport_width, self.viewport_height)
    }

    /// Bind the image that renders write to and size the viewport from its
    /// aspect ratio.
    pub fn set_render_target(&mut self, target: Arc<dyn RenderTarget>) {
        // Aspect is taken in single precision to match reference output
        let aspect = target.width() as f32 / target.height() as f32;

        self.viewport_height = self.near * (self.field_of_view * 0.5 * DEG_TO_RAD).tan();
        self.viewport_width = aspect as f64 * self.viewport_height;
        self.target = Some(target);
    }

    /// Unbind the render target. Ray generation fails until a new one is set.
    pub fn clear_render_target(&mut self) {
        self.target = None;
    }

    pub fn render_target(&self) -> Option<&Arc<dyn RenderTarget>> {
        self.target.as_ref()
    }

    /// Build the sampler pool with the default number of pattern sets.
    pub fn set_sampler(&mut self, kind: SamplerKind, samples_per_pixel: usize) -> RenderResult<()> {
        self.set_sampler_with_sets(kind, samples_per_pixel, DEFAULT_NUM_SETS)
    }

    /// Build the sampler pool: one sampler per unit of parallelism, shared
    /// round-robin by pixel jobs.
    pub fn set_sampler_with_sets(
        &mut self,
        kind: SamplerKind,
        samples_per_pixel: usize,
        num_sets: usize,
    ) -> RenderResult<()> {
        let pool_size = self.config.parallelism();
        let samplers = (0..pool_size)
            .map(|i| match self.config.seed {
                Some(seed) => {
                    Sampler::with_seed(kind, samples_per_pixel, num_sets, seed.wrapping_add(i as u64))
                }
                None => Sampler::new(kind, samples_per_pixel, num_sets),
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Built {} {:?} samplers ({} samples x {} sets)",
            samplers.len(),
            kind,
            samplers[0].num_samples(),
            num_sets
        );
        self.samplers = samplers;
        Ok(())
    }

    /// The sampler pool (empty until `set_sampler` succeeds).
    pub fn samplers(&self) -> &[Sampler] {
        &self.samplers
    }

    /// Ray through raster position (x, y) of the bound render target.
    /// Fractional positions address points inside a pixel.
    pub fn get_ray_from_pixel(&self, x: f64, y: f64) -> RenderResult<Ray> {
        let target = self.target.as_ref().ok_or(RenderError::NoRenderTarget)?;
        Ok(self.ray_for_raster(target.width(), target.height(), x, y))
    }

    /// Ray through `point` on the near plane, in camera right/up units.
    ///
    /// The origin sits on the near plane, not at the eye.
    pub fn get_ray_from_point(&self, point: DVec2) -> Ray {
        let dir = self.right * point.x + self.up * point.y + self.forward * self.near;
        Ray::new(self.position + dir, dir.normalize())
    }

    pub(crate) fn ray_for_raster(&self, width: u32, height: u32, x: f64, y: f64) -> Ray {
        let x = x / width as f64 * 2.0 - 1.0;
        let y = y / height as f64 * 2.0 - 1.0;
        self.get_ray_from_point(DVec2::new(x * self.viewport_width, y * self.viewport_height))
    }

    /// Full-quality render: every pixel takes `num_samples` jittered rays
    /// through `Tracer::trace`.
    ///
    /// `progress` receives `(done, total)`; see [`ExecutionMode`] for what
    /// `done` means in each mode.
    pub fn render(
        &self,
        scene: Option<&Scene>,
        mode: ExecutionMode,
        progress: Option<&mut dyn FnMut(usize, usize)>,
    ) -> RenderResult<()> {
        self.render_cancellable(scene, Quality::Full, mode, progress, &CancelToken::new())
    }

    /// Preview render: one ray through each pixel center via
    /// `Tracer::fast_trace`. No sampler required.
    pub fn fast_render(
        &self,
        scene: Option<&Scene>,
        mode: ExecutionMode,
        progress: Option<&mut dyn FnMut(usize, usize)>,
    ) -> RenderResult<()> {
        self.render_cancellable(scene, Quality::Fast, mode, progress, &CancelToken::new())
    }

    /// Render that stops early once `cancel` fires, returning
    /// `RenderError::Cancelled`. Pixels finished before that stay written.
    ///
    /// Parallel renders block the calling thread while jobs run on the rayon
    /// pool, so don't call this from inside a rayon task.
    pub fn render_cancellable(
        &self,
        scene: Option<&Scene>,
        quality: Quality,
        mode: ExecutionMode,
        progress: Option<&mut dyn FnMut(usize, usize)>,
        cancel: &CancelToken,
    ) -> RenderResult<()> {
        let scene = scene.ok_or(RenderError::MissingScene)?;
        let target = self.target.as_deref().ok_or(RenderError::NoRenderTarget)?;
        if quality == Quality::Full && self.samplers.is_empty() {
            return Err(RenderError::NoSampler);
        }

        let pass = RenderPass::new(self, target, scene, quality);
        let progress = Progress::new(progress, pass.total());
        scheduler::run(&pass, mode, self.config.parallelism(), progress, cancel)
    }
}

/// Right, up and forward axes of the rotation given by Euler angles in
/// degrees (Z, then X, then Y).
fn basis_from_euler(euler: DVec3) -> [DVec3; 3] {
    let (sinx, cosx) = (euler.x * DEG_TO_RAD * 0.5).sin_cos();
    let (siny, cosy) = (euler.y * DEG_TO_RAD * 0.5).sin_cos();
    let (sinz, cosz) = (euler.z * DEG_TO_RAD * 0.5).sin_cos();

    // Quaternion
    let rx = cosy * sinx * cosz + siny * cosx * sinz;
    let ry = siny * cosx * cosz - cosy * sinx * sinz;
    let rz = cosy * cosx * sinz - siny * sinx * cosz;
    let rw = cosy * cosx * cosz + siny * sinx * sinz;

    let x2 = 2.0 * rx * rx;
    let y2 = 2.0 * ry * ry;
    let z2 = 2.0 * rz * rz;
    let xy = 2.0 * rx * ry;
    let xz = 2.0 * rx * rz;
    let xw = 2.0 * rx * rw;
    let yz = 2.0 * ry * rz;
    let yw = 2.0 * ry * rw;
    let zw = 2.0 * rz * rw;

    [
        DVec3::new(1.0 - y2 - z2, xy + zw, xz - yw),
        DVec3::new(xy - zw, 1.0 - x2 - z2, yz + xw),
        DVec3::new(xz + yw, yz - xw, 1.0 - x2 - y2),
    ]
}
