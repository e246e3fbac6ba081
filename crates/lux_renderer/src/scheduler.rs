//! Render scheduler.
//!
//! Visits every pixel of the bound target exactly once, in row-major order,
//! either on the calling thread or as one job per pixel on the rayon pool.
//!
//! Parallel mode bounds the number of jobs in flight to the configured width.
//! Every job reports completion on a shared channel, so a single `recv()` is
//! "wait for whichever job finishes first". The in-flight list is owned by the
//! scheduling thread; workers only send.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Instant;

use crate::camera::Camera;
use crate::config::{ExecutionMode, PixelResolve, Quality};
use crate::error::{RenderError, RenderResult};
use crate::sampler::Sampler;
use crate::scene::{Color, Scene};
use crate::target::RenderTarget;

/// Shared flag for stopping a render early.
///
/// Clones share the flag, so one can be handed to another thread (or a
/// progress callback) while the render runs.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Progress reporting for one render.
pub(crate) struct Progress<'p> {
    callback: Option<&'p mut dyn FnMut(usize, usize)>,
    total: usize,
}

impl<'p> Progress<'p> {
    pub(crate) fn new(callback: Option<&'p mut dyn FnMut(usize, usize)>, total: usize) -> Self {
        Self { callback, total }
    }

    fn report(&mut self, done: usize) {
        if let Some(callback) = self.callback.as_mut() {
            callback(done, self.total);
        }
    }
}

/// Everything a pixel job reads. Shared by reference with all workers.
pub(crate) struct RenderPass<'a> {
    camera: &'a Camera,
    target: &'a dyn RenderTarget,
    scene: &'a Scene,
    quality: Quality,
    resolve: PixelResolve,
    width: u32,
    height: u32,
}

impl<'a> RenderPass<'a> {
    pub(crate) fn new(
        camera: &'a Camera,
        target: &'a dyn RenderTarget,
        scene: &'a Scene,
        quality: Quality,
    ) -> Self {
        Self {
            camera,
            target,
            scene,
            quality,
            resolve: camera.config().resolve,
            width: target.width(),
            height: target.height(),
        }
    }

    pub(crate) fn total(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Pixel coordinates of row-major job `job`.
    fn pixel(&self, job: usize) -> (u32, u32) {
        let width = self.width as usize;
        ((job % width) as u32, (job / width) as u32)
    }

    /// Sampler for job `job`: round-robin over the pool. Preview renders
    /// never use one.
    fn sampler(&self, job: usize) -> Option<&'a Sampler> {
        match self.quality {
            Quality::Fast => None,
            Quality::Full => {
                let samplers = self.camera.samplers();
                samplers.get(job % samplers.len().max(1))
            }
        }
    }

    fn render_pixel(&self, x: u32, y: u32, sampler: Option<&Sampler>) {
        match sampler {
            Some(sampler) => self.render_sampled(x, y, sampler),
            None => self.render_center(x, y),
        }
    }

    fn render_sampled(&self, x: u32, y: u32, sampler: &Sampler) {
        let num_samples = sampler.num_samples();
        let mut sum = Color::ZERO;

        for _ in 0..num_samples {
            let offset = sampler.sample();
            let ray = self.camera.ray_for_raster(
                self.width,
                self.height,
                x as f64 + offset.x,
                y as f64 + offset.y,
            );
            let color = self.scene.tracer.trace(&ray, &self.scene.sky, sampler);

            match self.resolve {
                PixelResolve::LastSample => self.target.set_pixel(x, y, color),
                PixelResolve::Average => sum += color,
            }
        }

        if self.resolve == PixelResolve::Average {
            self.target.set_pixel(x, y, sum / num_samples as f32);
        }
    }

    fn render_center(&self, x: u32, y: u32) {
        let ray = self
            .camera
            .ray_for_raster(self.width, self.height, x as f64 + 0.5, y as f64 + 0.5);
        self.target.set_pixel(x, y, self.scene.tracer.fast_trace(&ray));
    }
}

/// Run a render pass to completion.
pub(crate) fn run(
    pass: &RenderPass<'_>,
    mode: ExecutionMode,
    width: usize,
    mut progress: Progress<'_>,
    cancel: &CancelToken,
) -> RenderResult<()> {
    log::info!(
        "Rendering {}x{} ({:?}, {:?}, width {})",
        pass.width,
        pass.height,
        pass.quality,
        mode,
        width
    );
    let start = Instant::now();

    let result = match mode {
        ExecutionMode::Sequential => run_sequential(pass, &mut progress, cancel),
        ExecutionMode::Parallel => run_parallel(pass, width.max(1), &mut progress, cancel),
    };

    match &result {
        Ok(()) => log::info!("Rendered in {:?}", start.elapsed()),
        Err(RenderError::Cancelled) => log::warn!("Render cancelled after {:?}", start.elapsed()),
        Err(e) => log::error!("Render failed: {}", e),
    }
    result
}

/// Row-major on the calling thread with a single sampler. Progress reports
/// the linear index of the pixel just written.
fn run_sequential(
    pass: &RenderPass<'_>,
    progress: &mut Progress<'_>,
    cancel: &CancelToken,
) -> RenderResult<()> {
    let sampler = pass.sampler(0);
    for job in 0..pass.total() {
        if cancel.is_cancelled() {
            return Err(RenderError::Cancelled);
        }
        let (x, y) = pass.pixel(job);
        pass.render_pixel(x, y, sampler);
        progress.report(job);
    }
    Ok(())
}

/// Completion signal of one pixel job.
struct JobDone {
    job: usize,
    outcome: std::thread::Result<()>,
}

/// Why submission stopped early.
enum Halt {
    Cancelled,
    Panicked(Box<dyn Any + Send>),
}

/// One job per pixel, at most `width` in flight. Progress reports a running
/// count of completions, which matches the pixel index only when jobs finish
/// in submission order.
fn run_parallel(
    pass: &RenderPass<'_>,
    width: usize,
    progress: &mut Progress<'_>,
    cancel: &CancelToken,
) -> RenderResult<()> {
    let (done_tx, done_rx) = mpsc::channel::<JobDone>();

    let halt = rayon::in_place_scope(|scope| -> RenderResult<Option<Halt>> {
        let mut in_flight: Vec<usize> = Vec::with_capacity(width);
        let mut finished = 0;
        let mut halt = None;

        for job in 0..pass.total() {
            if cancel.is_cancelled() {
                halt = Some(Halt::Cancelled);
                break;
            }

            let (x, y) = pass.pixel(job);
            let sampler = pass.sampler(job);
            let done_tx = done_tx.clone();
            scope.spawn(move |_| {
                let outcome =
                    panic::catch_unwind(AssertUnwindSafe(|| pass.render_pixel(x, y, sampler)));
                // The receiver lives until the scope has joined every job
                let _ = done_tx.send(JobDone { job, outcome });
            });
            in_flight.push(job);

            if in_flight.len() >= width {
                if let Err(payload) = wait_any(&done_rx, &mut in_flight)? {
                    halt = Some(Halt::Panicked(payload));
                    break;
                }
                progress.report(finished);
                finished += 1;
            }
        }

        // Drain
        while !in_flight.is_empty() {
            match wait_any(&done_rx, &mut in_flight)? {
                Ok(()) if halt.is_none() => {
                    progress.report(finished);
                    finished += 1;
                }
                Ok(()) => {}
                Err(payload) => {
                    if !matches!(halt, Some(Halt::Panicked(_))) {
                        halt = Some(Halt::Panicked(payload));
                    }
                }
            }
        }

        Ok(halt)
    })?;

    match halt {
        None => Ok(()),
        Some(Halt::Cancelled) => Err(RenderError::Cancelled),
        Some(Halt::Panicked(payload)) => panic::resume_unwind(payload),
    }
}

/// Block until any in-flight job completes and remove it from the list.
fn wait_any(
    done_rx: &Receiver<JobDone>,
    in_flight: &mut Vec<usize>,
) -> RenderResult<std::thread::Result<()>> {
    let done = done_rx.recv().map_err(|_| RenderError::WorkerDisconnected)?;
    if let Some(pos) = in_flight.iter().position(|&job| job == done.job) {
        in_flight.swap_remove(pos);
    }
    Ok(done.outcome)
}
