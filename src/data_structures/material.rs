//! Surface descriptors shared between meshes.

/// A physically based surface description.
///
/// `colour` is an sRGB hex triplet (`0xRRGGBB`). Shaders and the glTF
/// exporter work in linear space and convert through [`Material::linear_rgba`].
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub colour: u32,
    pub flat_shading: bool,
    pub metalness: f32,
    pub roughness: f32,
}

impl Material {
    /// A dielectric, fully rough, flat-shaded material.
    pub fn flat(name: &str, colour: u32) -> Self {
        Self {
            name: name.to_string(),
            colour,
            flat_shading: true,
            metalness: 0.0,
            roughness: 1.0,
        }
    }

    pub fn with_metal(mut self, metalness: f32, roughness: f32) -> Self {
        self.metalness = metalness;
        self.roughness = roughness;
        self
    }

    pub fn srgb(&self) -> [f32; 3] {
        [
            ((self.colour >> 16) & 0xff) as f32 / 255.0,
            ((self.colour >> 8) & 0xff) as f32 / 255.0,
            (self.colour & 0xff) as f32 / 255.0,
        ]
    }

    pub fn linear_rgba(&self) -> [f32; 4] {
        let [r, g, b] = self.srgb().map(srgb_to_linear);
        [r, g, b, 1.0]
    }
}

pub fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.0773993808
    } else {
        (c * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

/// Converts an sRGB hex colour into a linear `wgpu::Color` for clearing.
pub fn clear_colour(hex: u32) -> wgpu::Color {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0) as f64;
    wgpu::Color {
        r: channel(16),
        g: channel(8),
        b: channel(0),
        a: 1.0,
    }
}
