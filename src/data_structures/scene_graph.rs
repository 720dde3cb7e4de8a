//! Scene graph of the viewer.
//!
//! A [`Group`] is a named container with its own transform that owns a flat
//! list of [`MeshNode`]s. Mesh nodes reference their geometry and material
//! through `Arc`, so nodes with the same shape share one definition. The
//! sharing is what lets the renderer and the exporter collapse nodes into
//! [`Batch`]es: one per distinct (geometry, material) pair.

use std::{collections::HashMap, f32::consts::TAU, sync::Arc};

use cgmath::{Rad, Rotation3};

use crate::data_structures::{geometry::Geometry, instance::Instance, material::Material};

/// A renderable leaf: shared geometry and material plus a local transform.
#[derive(Clone, Debug)]
pub struct MeshNode {
    pub name: String,
    pub geometry: Arc<Geometry>,
    pub material: Arc<Material>,
    pub local: Instance,
}

impl MeshNode {
    pub fn new(
        name: impl Into<String>,
        geometry: &Arc<Geometry>,
        material: &Arc<Material>,
        local: Instance,
    ) -> Self {
        Self {
            name: name.into(),
            geometry: Arc::clone(geometry),
            material: Arc::clone(material),
            local,
        }
    }
}

/// Mesh nodes of a group that share one geometry and one material.
///
/// `nodes` holds indices into [`Group::children`] in insertion order.
#[derive(Clone, Debug)]
pub struct Batch {
    pub geometry: Arc<Geometry>,
    pub material: Arc<Material>,
    pub nodes: Vec<usize>,
}

/// A container node that transforms all of its children as one unit.
///
/// Children can only be added, and the transform only changes through
/// [`Group::spin`], so the yaw and the rotation never disagree.
#[derive(Clone, Debug)]
pub struct Group {
    pub name: String,
    transform: Instance,
    children: Vec<MeshNode>,
    yaw: f32,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Instance::default(),
            children: Vec::new(),
            yaw: 0.0,
        }
    }

    pub fn add_child(&mut self, child: MeshNode) {
        self.children.push(child);
    }

    pub fn add_children(&mut self, children: impl IntoIterator<Item = MeshNode>) {
        self.children.extend(children);
    }

    pub fn children(&self) -> &[MeshNode] {
        &self.children
    }

    pub fn transform(&self) -> &Instance {
        &self.transform
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Rotation around the vertical axis in radians, always in `[0, 2π)`.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Advance the yaw by `step` radians and update the group transform.
    pub fn spin(&mut self, step: f32) {
        self.yaw = (self.yaw + step).rem_euclid(TAU);
        // rem_euclid may round up to exactly TAU for tiny negative sums
        if self.yaw >= TAU {
            self.yaw = 0.0;
        }
        self.transform.rotation = cgmath::Quaternion::from_angle_y(Rad(self.yaw));
    }

    /// World transform of every child, in child order.
    pub fn world_transforms(&self) -> Vec<Instance> {
        self.children
            .iter()
            .map(|child| &self.transform * &child.local)
            .collect()
    }

    /// Children grouped by shared (geometry, material), in order of first use.
    pub fn batches(&self) -> Vec<Batch> {
        let mut lookup: HashMap<(*const Geometry, *const Material), usize> = HashMap::new();
        let mut batches: Vec<Batch> = Vec::new();
        for (idx, child) in self.children.iter().enumerate() {
            let key = (Arc::as_ptr(&child.geometry), Arc::as_ptr(&child.material));
            match lookup.get(&key) {
                Some(&batch) => batches[batch].nodes.push(idx),
                None => {
                    lookup.insert(key, batches.len());
                    batches.push(Batch {
                        geometry: Arc::clone(&child.geometry),
                        material: Arc::clone(&child.material),
                        nodes: vec![idx],
                    });
                }
            }
        }
        batches
    }

    /// Distinct geometries in order of first use.
    pub fn geometries(&self) -> Vec<Arc<Geometry>> {
        distinct(self.children.iter().map(|child| &child.geometry))
    }

    /// Distinct materials in order of first use.
    pub fn materials(&self) -> Vec<Arc<Material>> {
        distinct(self.children.iter().map(|child| &child.material))
    }
}

fn distinct<'a, T: 'a>(items: impl Iterator<Item = &'a Arc<T>>) -> Vec<Arc<T>> {
    let mut seen: Vec<Arc<T>> = Vec::new();
    for item in items {
        if !seen.iter().any(|known| Arc::ptr_eq(known, item)) {
            seen.push(Arc::clone(item));
        }
    }
    seen
}
