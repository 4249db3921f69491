//! fit_scene - run the shadow fitting once over a scene description and
//! print the resulting light projection.
//!
//! USAGE:
//! ```bash
//! cargo run --bin fit_scene -- --scene demos/harbor.json -v
//! ```

use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use glam::{EulerRot, Mat4, Quat, Vec3};
use log::info;
use serde::Deserialize;
use shadow_fit::{
    config::FitConfig,
    shadow::{CameraData, ShadowSlice, near_far},
    volume::{ShadowImportance, VolumeFlags, VolumeRegistry},
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Scene description (JSON)
    #[arg(long, value_name = "FILE")]
    scene: PathBuf,

    /// Fit config overrides (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log at debug level (twice for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// ------------------------------------------------------------------
//  Scene file
// ------------------------------------------------------------------
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct Scene {
    camera: CameraDesc,
    light: LightDesc,
    shadow_distance: f32,
    #[serde(default)]
    volumes: Vec<VolumeDesc>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct CameraDesc {
    position: Vec3,
    target: Vec3,
    fov_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

/// Directional light; the shadow box is centred on the camera target.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct LightDesc {
    direction: Vec3,
    half_extent: f32,
    #[serde(default = "default_depth")]
    depth: [f32; 2],
    resolution: u32,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct VolumeDesc {
    position: Vec3,
    /// Euler angles in degrees, applied yaw (y), pitch (x), roll (z).
    #[serde(default)]
    rotation: Vec3,
    #[serde(default = "default_scale")]
    scale: Vec3,
    #[serde(default = "yes")]
    shadow_adjustment: bool,
    #[serde(default = "yes")]
    quantize_movement: bool,
}

fn default_depth() -> [f32; 2] {
    [-100.0, 100.0]
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

fn yes() -> bool {
    true
}

impl VolumeDesc {
    fn transform(&self) -> Mat4 {
        let r = self.rotation * (std::f32::consts::PI / 180.0);
        let rotation = Quat::from_euler(EulerRot::YXZ, r.y, r.x, r.z);
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }

    fn flags(&self) -> VolumeFlags {
        let mut flags = VolumeFlags::empty();
        flags.set(VolumeFlags::SHADOW_ADJUSTMENT, self.shadow_adjustment);
        flags.set(VolumeFlags::QUANTIZE_MOVEMENT, self.quantize_movement);
        flags
    }
}

fn light_slice(light: &LightDesc, focus: Vec3) -> anyhow::Result<ShadowSlice> {
    let dir = light
        .direction
        .try_normalize()
        .context("light direction must be non-zero")?;
    let up = if dir.cross(Vec3::Y).length_squared() < 1e-6 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let h = light.half_extent;
    let [near, far] = light.depth;
    Ok(ShadowSlice {
        view: Mat4::look_at_rh(focus - dir, focus, up),
        projection: Mat4::orthographic_rh_gl(-h, h, -h, h, near, far),
        resolution: light.resolution,
    })
}

// ------------------------------------------------------------------
//  Entry point
// ------------------------------------------------------------------
fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    let level = match opts.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", level)).init();

    let config = match &opts.config {
        Some(path) => FitConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FitConfig::default(),
    };

    let text = fs::read_to_string(&opts.scene)
        .with_context(|| format!("reading scene {}", opts.scene.display()))?;
    let scene: Scene = serde_json::from_str(&text).context("parsing scene")?;

    let c = &scene.camera;
    let camera = CameraData::perspective(
        c.position,
        c.target,
        c.fov_degrees.to_radians(),
        c.aspect,
        c.near,
        c.far,
    );
    let mut slice = light_slice(&scene.light, c.target)?;

    let mut volumes = VolumeRegistry::new();
    for v in &scene.volumes {
        volumes.register(v.transform(), v.flags());
    }
    info!("{} volumes registered", volumes.len());

    let mut hook = ShadowImportance::new(config);
    let mut shadow_distance = scene.shadow_distance;
    let report = hook.adjust(&volumes, &camera, &mut slice, &mut shadow_distance);

    match report.nearest.and_then(|id| volumes.get(id)) {
        Some(v) => println!("nearest volume     : anchor {:?} flags {:?}", v.anchor, v.flags),
        None => println!("nearest volume     : none"),
    }
    println!("significant points : {}", report.point_count);
    println!("adjusted           : {}", report.adjusted);
    println!("quantized          : {}", report.quantized);
    println!(
        "shadow distance    : {:.3} (was {:.3})",
        shadow_distance, scene.shadow_distance
    );
    let (near, far) = near_far(&slice.projection);
    println!("light depth range  : {near:.3} .. {far:.3}");
    println!("light projection   :");
    for i in 0..4 {
        let r = slice.projection.row(i);
        println!("  [{:>10.5} {:>10.5} {:>10.5} {:>10.5}]", r.x, r.y, r.z, r.w);
    }
    Ok(())
}
