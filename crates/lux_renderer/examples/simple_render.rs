//! Simple ambient-occlusion render.
//!
//! Renders spheres over a gradient sky and saves to PPM format.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

use lux_renderer::{
    color_to_rgba, Camera, Color, DVec3, ExecutionMode, Geometry, ImageBuffer, Ray, RayCastHit,
    RenderConfig, RenderTarget, Sampler, SamplerKind, Scene, Sky, Sphere, Tracer,
};

/// Shades hits by how much of the hemisphere above them is open sky.
struct AmbientOcclusion {
    spheres: Vec<Sphere>,
}

impl AmbientOcclusion {
    fn cast(&self, ray: &Ray) -> Option<RayCastHit> {
        let mut hit = RayCastHit::default();
        self.spheres[..].ray_cast(ray, 1e-4, &mut hit).then_some(hit)
    }
}

impl Tracer for AmbientOcclusion {
    fn trace(&self, ray: &Ray, sky: &Sky, sampler: &Sampler) -> Color {
        let Some(hit) = self.cast(ray) else {
            return sky.radiance(ray.direction());
        };

        // Cosine-weighted direction around the normal
        let local = sampler.sample_hemisphere(1.0);
        let w = hit.normal;
        let helper = if w.x.abs() > 0.9 { DVec3::Y } else { DVec3::X };
        let u = helper.cross(w).normalize();
        let v = w.cross(u);
        let dir = u * local.x + v * local.y + w * local.z;

        let probe = Ray::new(hit.point, dir);
        match self.cast(&probe) {
            Some(_) => Color::ZERO,
            None => sky.radiance(dir),
        }
    }

    fn fast_trace(&self, ray: &Ray) -> Color {
        match self.cast(ray) {
            Some(hit) => {
                let n = 0.5 * (hit.normal + DVec3::ONE);
                Color::new(n.x as f32, n.y as f32, n.z as f32)
            }
            None => Color::ZERO,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let scene = Scene::new(
        AmbientOcclusion {
            spheres: vec![
                Sphere::new(DVec3::new(0.0, -100.5, 3.0), 100.0),
                Sphere::new(DVec3::new(0.0, 0.0, 3.0), 0.5),
                Sphere::new(DVec3::new(-1.1, 0.0, 3.5), 0.5),
                Sphere::new(DVec3::new(1.1, 0.0, 3.5), 0.5),
            ],
        },
        Sky::default(),
    );

    let image = Arc::new(ImageBuffer::new(400, 225));
    // Raster rows grow along +up, so roll the camera half a turn to get an
    // upright image.
    let mut camera = Camera::new(DVec3::new(0.0, 0.3, 0.0), DVec3::new(0.0, 0.0, 180.0), 0.1, 50.0)
        .with_config(RenderConfig::default());
    camera.set_render_target(image.clone());
    camera.set_sampler(SamplerKind::Jittered, 64)?;

    let start = std::time::Instant::now();
    let mut last_percent = 0;
    let mut report = |done: usize, total: usize| {
        let percent = (done + 1) * 100 / total;
        if percent >= last_percent + 10 {
            log::info!("{}% done", percent);
            last_percent = percent;
        }
    };
    camera.render(Some(&scene), ExecutionMode::Parallel, Some(&mut report))?;
    log::info!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    save_ppm(&image, filename)?;
    log::info!("Saved to {}", filename);
    Ok(())
}

fn save_ppm(image: &ImageBuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width(), image.height())?;
    writeln!(writer, "255")?;

    for y in 0..image.height() {
        for x in 0..image.width() {
            let rgba = color_to_rgba(image.get(x, y));
            writeln!(writer, "{} {} {}", rgba[0], rgba[1], rgba[2])?;
        }
    }

    Ok(())
}
