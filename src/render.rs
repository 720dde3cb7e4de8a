//! Render composition.
//!
//! Flows describe what they want drawn with a [`Render`] value. The engine
//! flattens all renders of a frame into one list of [`Instanced`] draws and
//! issues them with the flat-shaded pipeline.
//!
//! - [`Render<'a>`] is the enum flows return from `on_render`
//! - [`Instanced<'a>`] is one instanced draw: mesh, material, instance buffer

use crate::data_structures::model::{GpuMaterial, GroupModel, Mesh};

/// One instanced draw call.
#[derive(Clone, Copy)]
pub struct Instanced<'a> {
    pub mesh: &'a Mesh,
    pub material: &'a GpuMaterial,
    pub instance: &'a wgpu::Buffer,
    pub amount: usize,
}

/// Specifies what a flow renders this frame.
///
/// - `None` renders nothing
/// - `Defaults(Vec<Instanced>)` renders a batch of instanced draws
pub enum Render<'a> {
    None,
    Defaults(Vec<Instanced<'a>>),
}

impl<'a> Render<'a> {
    pub(crate) fn collect(self, draws: &mut Vec<Instanced<'a>>) {
        match self {
            Render::None => (),
            Render::Defaults(mut vec) => draws.append(&mut vec),
        }
    }
}

impl<'a> From<&'a GroupModel> for Render<'a> {
    fn from(model: &'a GroupModel) -> Self {
        Render::Defaults(
            model
                .batches
                .iter()
                .filter_map(|batch| {
                    Some(Instanced {
                        mesh: model.meshes.get(batch.mesh)?,
                        material: model.materials.get(batch.material)?,
                        instance: &batch.instance_buffer,
                        amount: batch.nodes.len(),
                    })
                })
                .collect(),
        )
    }
}
