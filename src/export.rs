//! glTF export of a scene group.
//!
//! The group becomes the single root node of the only scene; each mesh node
//! becomes one child node. Geometry and material sharing survives the
//! export: every distinct geometry is written once, and nodes with the same
//! (geometry, material) pair reference the same glTF mesh. All binary data
//! lives in one buffer that is embedded as a base64 data URI, so the result
//! is a single self-contained `.gltf` file.

use std::{collections::BTreeMap, mem, sync::Arc};

use anyhow::{Context as _, bail};
use base64::Engine;
use cgmath::{One, Vector3};
use gltf::json::{
    self,
    validation::{Checked::Valid, USize64},
};

use crate::data_structures::{
    geometry::Geometry,
    instance::Instance,
    material::Material,
    scene_graph::Group,
};

pub const EXPORT_FILE_NAME: &str = "minecart_full_separado.gltf";
pub const EXPORT_MIME_TYPE: &str = "application/json";
const GENERATOR: &str = concat!("minecart ", env!("CARGO_PKG_VERSION"));
const DATA_URI_PREFIX: &str = "data:application/octet-stream;base64,";

/// Accessors written for one geometry.
struct GeometryAccessors {
    positions: json::Index<json::Accessor>,
    normals: json::Index<json::Accessor>,
    indices: json::Index<json::Accessor>,
}

/// Build a glTF document from `group` and all of its mesh nodes.
pub fn to_gltf(group: &Group) -> anyhow::Result<json::Root> {
    if group.is_empty() {
        bail!(
            "group {:?} has no meshes; it has to be built before it can be exported",
            group.name
        );
    }

    let mut root = json::Root {
        asset: json::Asset {
            generator: Some(GENERATOR.to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    let mut bin: Vec<u8> = Vec::new();
    let geometries = group.geometries();
    let buffer = root.push(json::Buffer {
        byte_length: USize64(0),
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        uri: None,
    });
    let accessors = geometries
        .iter()
        .map(|geometry| push_geometry(&mut root, &mut bin, buffer, geometry))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let materials = group.materials();
    let material_indices: Vec<json::Index<json::Material>> = materials
        .iter()
        .map(|material| root.push(to_gltf_material(material)))
        .collect();

    let mut mesh_of_node: Vec<Option<json::Index<json::Mesh>>> = vec![None; group.children().len()];
    for batch in group.batches() {
        let geometry = geometries
            .iter()
            .position(|g| Arc::ptr_eq(g, &batch.geometry))
            .context("batch references a geometry outside of the group")?;
        let material = materials
            .iter()
            .position(|m| Arc::ptr_eq(m, &batch.material))
            .context("batch references a material outside of the group")?;
        let mesh = root.push(to_gltf_mesh(
            &batch.geometry.name,
            &accessors[geometry],
            material_indices[material],
        ));
        for node in batch.nodes {
            mesh_of_node[node] = Some(mesh);
        }
    }

    let children = group
        .children()
        .iter()
        .zip(mesh_of_node)
        .map(|(child, mesh)| {
            let mut node = to_gltf_node(&child.name, &child.local);
            node.mesh = mesh;
            root.push(node)
        })
        .collect();

    let mut group_node = to_gltf_node(&group.name, group.transform());
    group_node.children = Some(children);
    let group_node = root.push(group_node);

    let encoded = base64::engine::general_purpose::STANDARD.encode(&bin);
    let blob = &mut root.buffers[buffer.value()];
    blob.byte_length = USize64::from(bin.len());
    blob.uri = Some(format!("{DATA_URI_PREFIX}{encoded}"));

    let scene = root.push(json::Scene {
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        nodes: vec![group_node],
    });
    root.scene = Some(scene);

    Ok(root)
}

/// Serialise `group` into glTF JSON text.
pub fn to_gltf_string(group: &Group) -> anyhow::Result<String> {
    let root = to_gltf(group)?;
    json::serialize::to_string(&root).context("failed to serialise glTF document")
}

fn push_geometry(
    root: &mut json::Root,
    bin: &mut Vec<u8>,
    buffer: json::Index<json::Buffer>,
    geometry: &Geometry,
) -> anyhow::Result<GeometryAccessors> {
    let (min, max) = geometry
        .bounds()
        .with_context(|| format!("geometry {:?} has no vertices", geometry.name))?;
    let count = geometry.positions.len();

    let positions_view = push_view(
        root,
        bin,
        buffer,
        bytemuck::cast_slice(&geometry.positions),
        json::buffer::Target::ArrayBuffer,
    );
    let positions = root.push(json::Accessor {
        buffer_view: Some(positions_view),
        byte_offset: Some(USize64(0)),
        count: USize64::from(count),
        component_type: Valid(json::accessor::GenericComponentType(
            json::accessor::ComponentType::F32,
        )),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(json::accessor::Type::Vec3),
        min: Some(json::Value::from(Vec::from(min))),
        max: Some(json::Value::from(Vec::from(max))),
        name: None,
        normalized: false,
        sparse: None,
    });

    let normals_view = push_view(
        root,
        bin,
        buffer,
        bytemuck::cast_slice(&geometry.normals),
        json::buffer::Target::ArrayBuffer,
    );
    let normals = root.push(json::Accessor {
        buffer_view: Some(normals_view),
        byte_offset: Some(USize64(0)),
        count: USize64::from(geometry.normals.len()),
        component_type: Valid(json::accessor::GenericComponentType(
            json::accessor::ComponentType::F32,
        )),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(json::accessor::Type::Vec3),
        min: None,
        max: None,
        name: None,
        normalized: false,
        sparse: None,
    });

    let indices_view = push_view(
        root,
        bin,
        buffer,
        bytemuck::cast_slice(&geometry.indices),
        json::buffer::Target::ElementArrayBuffer,
    );
    let indices = root.push(json::Accessor {
        buffer_view: Some(indices_view),
        byte_offset: Some(USize64(0)),
        count: USize64::from(geometry.indices.len()),
        component_type: Valid(json::accessor::GenericComponentType(
            json::accessor::ComponentType::U32,
        )),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(json::accessor::Type::Scalar),
        min: None,
        max: None,
        name: None,
        normalized: false,
        sparse: None,
    });

    Ok(GeometryAccessors {
        positions,
        normals,
        indices,
    })
}

/// Append `bytes` to the binary blob and describe them with a buffer view.
/// Every chunk is a whole number of `f32`/`u32`, so views stay 4-byte aligned.
fn push_view(
    root: &mut json::Root,
    bin: &mut Vec<u8>,
    buffer: json::Index<json::Buffer>,
    bytes: &[u8],
    target: json::buffer::Target,
) -> json::Index<json::buffer::View> {
    debug_assert_eq!(bin.len() % mem::size_of::<f32>(), 0);
    let offset = bin.len();
    bin.extend_from_slice(bytes);
    root.push(json::buffer::View {
        buffer,
        byte_length: USize64::from(bytes.len()),
        byte_offset: Some(USize64::from(offset)),
        byte_stride: None,
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        target: Some(Valid(target)),
    })
}

fn to_gltf_mesh(
    name: &str,
    accessors: &GeometryAccessors,
    material: json::Index<json::Material>,
) -> json::Mesh {
    let mut attributes = BTreeMap::new();
    attributes.insert(Valid(json::mesh::Semantic::Positions), accessors.positions);
    attributes.insert(Valid(json::mesh::Semantic::Normals), accessors.normals);
    json::Mesh {
        extensions: Default::default(),
        extras: Default::default(),
        name: Some(name.to_string()),
        primitives: vec![json::mesh::Primitive {
            attributes,
            extensions: Default::default(),
            extras: Default::default(),
            indices: Some(accessors.indices),
            material: Some(material),
            mode: Valid(json::mesh::Mode::Triangles),
            targets: None,
        }],
        weights: None,
    }
}

fn to_gltf_material(material: &Material) -> json::Material {
    json::Material {
        name: Some(material.name.clone()),
        pbr_metallic_roughness: json::material::PbrMetallicRoughness {
            base_color_factor: json::material::PbrBaseColorFactor(material.linear_rgba()),
            metallic_factor: json::material::StrengthFactor(material.metalness),
            roughness_factor: json::material::StrengthFactor(material.roughness),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// A node carrying `instance` as TRS, leaving out identity components.
fn to_gltf_node(name: &str, instance: &Instance) -> json::Node {
    let translation = (instance.position != Vector3::new(0.0, 0.0, 0.0))
        .then(|| instance.position.into());
    let rotation = (instance.rotation != cgmath::Quaternion::one()).then(|| {
        let q = instance.rotation;
        json::scene::UnitQuaternion([q.v.x, q.v.y, q.v.z, q.s])
    });
    let scale = (instance.scale != Vector3::new(1.0, 1.0, 1.0)).then(|| instance.scale.into());
    json::Node {
        name: Some(name.to_string()),
        translation,
        rotation,
        scale,
        ..Default::default()
    }
}

/// Hand a finished document to the user.
///
/// On the web this triggers a browser download of `file_name`. The object
/// URL backing the download is left for the page to collect.
#[cfg(target_arch = "wasm32")]
pub fn deliver(document: &str, file_name: &str) -> anyhow::Result<()> {
    use wasm_bindgen::JsCast;

    let js_err = |what: &'static str| move |e: wasm_bindgen::JsValue| anyhow::anyhow!("{what}: {e:?}");

    let window = web_sys::window().context("no window available")?;
    let document_node = window.document().context("window has no document")?;

    let parts = js_sys_array(document);
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(EXPORT_MIME_TYPE);
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(js_err("failed to create blob"))?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(js_err("failed to create object url"))?;

    let link = document_node
        .create_element("a")
        .map_err(js_err("failed to create download link"))?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| anyhow::anyhow!("created element is not an anchor"))?;
    link.set_href(&url);
    link.set_download(file_name);
    link.click();
    log::info!("download of {} triggered", file_name);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn js_sys_array(text: &str) -> wasm_bindgen::JsValue {
    let parts = web_sys::js_sys::Array::new();
    parts.push(&wasm_bindgen::JsValue::from_str(text));
    parts.into()
}

/// Hand a finished document to the user.
///
/// Natively the document is written to `dir/file_name`; the returned path
/// points at the written file.
#[cfg(not(target_arch = "wasm32"))]
pub async fn deliver(
    document: String,
    dir: std::path::PathBuf,
    file_name: &str,
) -> anyhow::Result<std::path::PathBuf> {
    tokio::fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, document)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("exported {}", path.display());
    Ok(path)
}
