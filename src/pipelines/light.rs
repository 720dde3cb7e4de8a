//! Scene lighting: one ambient light and one directional sun.

use wgpu::util::DeviceExt;

/// A light as configured on the CPU side.
#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub colour: [f32; 3],
    pub intensity: f32,
}

/// A light shining from `position` towards the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    pub light: Light,
    pub position: [f32; 3],
}

#[derive(Clone, Debug, PartialEq)]
pub struct Lighting {
    pub ambient: Light,
    pub sun: DirectionalLight,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: Light {
                colour: [1.0; 3],
                intensity: 0.5,
            },
            sun: DirectionalLight {
                light: Light {
                    colour: [1.0; 3],
                    intensity: 1.0,
                },
                position: [5.0, 10.0, 5.0],
            },
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    // rgb premultiplied with the intensity, w unused: uniforms need 16 byte spacing
    ambient: [f32; 4],
    sun_direction: [f32; 4],
    sun_colour: [f32; 4],
}

impl From<&Lighting> for LightUniform {
    fn from(lighting: &Lighting) -> Self {
        let premultiply = |light: &Light| {
            let [r, g, b] = light.colour.map(|c| c * light.intensity);
            [r, g, b, 0.0]
        };
        let [x, y, z] = lighting.sun.position;
        let len = (x * x + y * y + z * z).sqrt().max(f32::EPSILON);
        Self {
            ambient: premultiply(&lighting.ambient),
            // direction from a fragment towards the sun
            sun_direction: [x / len, y / len, z / len, 0.0],
            sun_colour: premultiply(&lighting.sun.light),
        }
    }
}

#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(lighting: &Lighting, device: &wgpu::Device) -> Self {
        let uniform = LightUniform::from(lighting);
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn update(&mut self, lighting: &Lighting, queue: &wgpu::Queue) {
        self.uniform = LightUniform::from(lighting);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}
