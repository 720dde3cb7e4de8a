//! Render pipelines and the uniforms they bind.
//!
//! - `basic` is the flat-shaded, instanced pipeline every mesh is drawn with
//! - `light` holds the ambient/directional lighting uniform

pub mod basic;
pub mod light;

#[derive(Debug)]
pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
}
