//! Lux renderer - sampling engine and render scheduler.
//!
//! Drives a [`Tracer`] across every pixel of a [`RenderTarget`]:
//!
//! - [`Sampler`]: precomputed, shuffled 2D sample patterns (random,
//!   jittered, regular, Hammersley), safe to share between threads
//! - [`Camera`]: Euler-angle camera that maps pixels to world-space rays
//! - Sequential or bounded-concurrency parallel scheduling on rayon
//!
//! Scene geometry and shading live outside this crate behind the
//! [`Tracer`] and [`Geometry`] traits.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lux_renderer::{Camera, ExecutionMode, ImageBuffer, SamplerKind, Scene, Sky};
//!
//! let image = Arc::new(ImageBuffer::new(320, 240));
//! let mut camera = Camera::new(DVec3::ZERO, DVec3::ZERO, 0.1, 60.0);
//! camera.set_render_target(image.clone());
//! camera.set_sampler(SamplerKind::Jittered, 16)?;
//! camera.render(Some(&Scene::new(my_tracer, Sky::default())), ExecutionMode::Parallel, None)?;
//! ```

mod camera;
mod config;
mod error;
mod geometry;
mod sampler;
mod scene;
mod scheduler;
mod target;

pub use camera::Camera;
pub use config::{ExecutionMode, PixelResolve, Quality, RenderConfig};
pub use error::{RenderError, RenderResult, SamplerError};
pub use geometry::{Geometry, RayCastHit, Sphere};
pub use sampler::{radical_inverse, Sampler, SamplerKind, DEFAULT_NUM_SETS};
pub use scene::{Color, Scene, Sky, Tracer};
pub use scheduler::CancelToken;
pub use target::{color_to_rgba, linear_to_gamma, ImageBuffer, RenderTarget};

/// Re-export common math types from lux_math
pub use lux_math::{DVec2, DVec3, Ray, Vec3};
