//! Viewer configuration.
//!
//! [`ViewerConfig::default`] reproduces the reference scene. The native
//! binary overrides individual fields from the command line.

use std::path::PathBuf;

use crate::{export::EXPORT_FILE_NAME, pipelines::light::Lighting};

/// Perspective camera placement.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fovy_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [6.0, 5.0, 8.0],
            target: [0.0, 1.0, 0.0],
            fovy_degrees: 45.0,
            znear: 0.1,
            zfar: 1000.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    /// Background as sRGB hex.
    pub background: u32,
    pub camera: CameraConfig,
    pub lighting: Lighting,
    /// Yaw added to the cart on every rendered frame, in radians.
    pub spin_per_frame: f32,
    pub export_file_name: String,
    /// Where native exports are written.
    pub out_dir: PathBuf,
    /// Seed of the cargo scatter; entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            background: 0x1a1a1a,
            camera: CameraConfig::default(),
            lighting: Lighting::default(),
            spin_per_frame: 0.005,
            export_file_name: EXPORT_FILE_NAME.to_string(),
            out_dir: PathBuf::from("."),
            seed: None,
        }
    }
}

impl ViewerConfig {
    /// The random source for the cargo scatter.
    pub fn rng(&self) -> rand::rngs::StdRng {
        use rand::SeedableRng;
        match self.seed {
            Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
            None => rand::rngs::StdRng::from_entropy(),
        }
    }
}
