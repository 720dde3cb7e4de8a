//! GPU resources of a scene group.
//!
//! [`GroupModel`] mirrors the sharing of the CPU scene graph: each distinct
//! geometry gets one vertex and index buffer, each distinct material one
//! uniform bind group, and each (geometry, material) batch one instance
//! buffer holding the world transforms of its nodes.

use std::{ops::Range, sync::Arc};

use wgpu::util::DeviceExt;

use crate::data_structures::{
    geometry::Geometry,
    instance::{Instance, InstanceRaw},
    material::Material,
    scene_graph::Group,
};

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    colour: [f32; 4],
    metalness: f32,
    roughness: f32,
    flat_shading: u32,
    // Uniforms require 16 byte spacing
    _padding: u32,
}

impl From<&Material> for MaterialUniform {
    fn from(material: &Material) -> Self {
        Self {
            colour: material.linear_rgba(),
            metalness: material.metalness,
            roughness: material.roughness,
            flat_shading: material.flat_shading as u32,
            _padding: 0,
        }
    }
}

pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

impl Mesh {
    pub fn new(device: &wgpu::Device, geometry: &Geometry) -> Self {
        let vertices = geometry
            .positions
            .iter()
            .zip(geometry.normals.iter())
            .map(|(&position, &normal)| ModelVertex { position, normal })
            .collect::<Vec<_>>();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", geometry.name)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", geometry.name)),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            name: geometry.name.clone(),
            vertex_buffer,
            index_buffer,
            num_elements: geometry.indices.len() as u32,
        }
    }
}

pub struct GpuMaterial {
    pub name: String,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl GpuMaterial {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, material: &Material) -> Self {
        let uniform = MaterialUniform::from(material);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Material Buffer", material.name)),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some(&format!("{:?} Material Bind Group", material.name)),
        });
        Self {
            name: material.name.clone(),
            buffer,
            bind_group,
        }
    }
}

pub fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("material_bind_group_layout"),
    })
}

/// One instanced draw: indices into [`GroupModel::meshes`] and
/// [`GroupModel::materials`] plus the group children it draws.
pub struct InstancedBatch {
    pub mesh: usize,
    pub material: usize,
    pub nodes: Vec<usize>,
    pub instance_buffer: wgpu::Buffer,
}

pub struct GroupModel {
    pub meshes: Vec<Mesh>,
    pub materials: Vec<GpuMaterial>,
    pub batches: Vec<InstancedBatch>,
}

impl GroupModel {
    pub fn new(device: &wgpu::Device, group: &Group) -> Self {
        let layout = material_layout(device);
        let geometries = group.geometries();
        let materials = group.materials();
        let world = group.world_transforms();

        let batches = group
            .batches()
            .into_iter()
            .map(|batch| {
                let raw = raw_instances(&world, &batch.nodes);
                let instance_buffer =
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(&format!("{:?} Instance Buffer", batch.geometry.name)),
                        contents: bytemuck::cast_slice(&raw),
                        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    });
                InstancedBatch {
                    mesh: position_of(&geometries, &batch.geometry),
                    material: position_of(&materials, &batch.material),
                    nodes: batch.nodes,
                    instance_buffer,
                }
            })
            .collect();

        Self {
            meshes: geometries.iter().map(|g| Mesh::new(device, g)).collect(),
            materials: materials
                .iter()
                .map(|m| GpuMaterial::new(device, &layout, m))
                .collect(),
            batches,
        }
    }

    /// Upload the current world transforms of `group`.
    ///
    /// The group must be the one this model was created from; its children
    /// never change after construction, so buffer sizes stay valid.
    pub fn write_to_buffers(&self, queue: &wgpu::Queue, group: &Group) {
        let world = group.world_transforms();
        for batch in &self.batches {
            let raw = raw_instances(&world, &batch.nodes);
            queue.write_buffer(&batch.instance_buffer, 0, bytemuck::cast_slice(&raw));
        }
    }
}

fn raw_instances(world: &[Instance], nodes: &[usize]) -> Vec<InstanceRaw> {
    nodes
        .iter()
        .filter_map(|&idx| world.get(idx))
        .map(Instance::to_raw)
        .collect()
}

// Batches are derived from the same lists, so the lookup always hits.
fn position_of<T>(items: &[Arc<T>], item: &Arc<T>) -> usize {
    items
        .iter()
        .position(|known| Arc::ptr_eq(known, item))
        .unwrap_or_default()
}

pub trait DrawModel<'a> {
    fn draw_mesh_instanced(
        &mut self,
        mesh: &'a Mesh,
        material: &'a GpuMaterial,
        instances: Range<u32>,
        camera_bind_group: &'a wgpu::BindGroup,
        light_bind_group: &'a wgpu::BindGroup,
    );
}

impl<'a, 'b> DrawModel<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh_instanced(
        &mut self,
        mesh: &'b Mesh,
        material: &'b GpuMaterial,
        instances: Range<u32>,
        camera_bind_group: &'b wgpu::BindGroup,
        light_bind_group: &'b wgpu::BindGroup,
    ) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.set_bind_group(0, &material.bind_group, &[]);
        self.set_bind_group(1, camera_bind_group, &[]);
        self.set_bind_group(2, light_bind_group, &[]);
        self.draw_indexed(0..mesh.num_elements, 0, instances);
    }
}
