use minecart::{
    cart::{CART_NAME, Palette, build_cart},
    data_structures::scene_graph::Group,
    export::{self, EXPORT_FILE_NAME},
};
use rand::{SeedableRng, rngs::StdRng};

fn cart() -> Group {
    build_cart(&Palette::default(), &mut StdRng::seed_from_u64(11))
}

fn import(group: &Group) -> (gltf::Document, Vec<gltf::buffer::Data>) {
    let text = export::to_gltf_string(group).expect("cart should export");
    let (document, buffers, _) =
        gltf::import_slice(text.as_bytes()).expect("exported document should import");
    (document, buffers)
}

#[test]
fn should_export_one_root_node_holding_every_mesh() {
    let cart = cart();
    let (document, _) = import(&cart);

    let scene = document.default_scene().expect("a default scene is set");
    let roots: Vec<_> = scene.nodes().collect();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].name(), Some(CART_NAME));
    assert!(roots[0].mesh().is_none());

    let children: Vec<_> = roots[0].children().collect();
    assert_eq!(children.len(), cart.children().len());
    assert!(children.iter().all(|child| child.mesh().is_some()));
    let names: Vec<_> = children.iter().filter_map(|child| child.name()).collect();
    let expected: Vec<_> = cart.children().iter().map(|child| child.name.as_str()).collect();
    assert_eq!(names, expected);
    assert_eq!(document.nodes().count(), cart.children().len() + 1);
}

#[test]
fn should_keep_sharing_in_the_exported_document() {
    let cart = cart();
    let (document, _) = import(&cart);

    assert_eq!(document.meshes().count(), 7);
    assert_eq!(document.materials().count(), 3);
    assert_eq!(document.buffers().count(), 1);

    let root = document.default_scene().and_then(|s| s.nodes().next());
    let root = root.expect("root node");
    let mesh_of = |prefix: &str| -> Vec<usize> {
        root.children()
            .filter(|node| node.name().is_some_and(|name| name.starts_with(prefix)))
            .filter_map(|node| node.mesh().map(|mesh| mesh.index()))
            .collect()
    };
    let wheels = mesh_of("wheel_");
    assert_eq!(wheels.len(), 4);
    assert!(wheels.iter().all(|&mesh| mesh == wheels[0]));
    let rocks = mesh_of("rock_");
    assert_eq!(rocks.len(), 45);
    assert!(rocks.iter().all(|&mesh| mesh == rocks[0]));
    let ribs = mesh_of("rib_");
    assert!(ribs.iter().all(|&mesh| mesh == ribs[0]));
    assert_ne!(mesh_of("body")[0], ribs[0]);
}

#[test]
fn should_embed_readable_geometry() {
    let cart = cart();
    let (document, buffers) = import(&cart);

    let wheel = cart
        .children()
        .iter()
        .find(|child| child.name == "wheel_0")
        .expect("cart has wheels");
    let mesh = document
        .meshes()
        .find(|mesh| mesh.name() == Some("wheel"))
        .expect("wheel mesh is exported");
    let primitive = mesh.primitives().next().expect("one primitive per mesh");
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    let positions: Vec<[f32; 3]> = reader.read_positions().expect("positions").collect();
    let normals: Vec<[f32; 3]> = reader.read_normals().expect("normals").collect();
    let indices: Vec<u32> = reader
        .read_indices()
        .expect("indices")
        .into_u32()
        .collect();
    assert_eq!(positions, wheel.geometry.positions);
    assert_eq!(normals, wheel.geometry.normals);
    assert_eq!(indices, wheel.geometry.indices);

    let material = primitive.material();
    assert_eq!(material.name(), Some("iron"));
    let pbr = material.pbr_metallic_roughness();
    assert_eq!(pbr.metallic_factor(), 0.6);
    assert_eq!(pbr.roughness_factor(), 0.4);
}

#[test]
fn should_export_node_transforms() {
    let mut cart = cart();
    cart.spin(0.5);
    let (document, _) = import(&cart);

    let root = document.default_scene().and_then(|s| s.nodes().next());
    let root = root.expect("root node");
    let (_, rotation, _) = root.transform().decomposed();
    // Rotation around +Y only
    assert!(rotation[0].abs() < 1e-6);
    assert!(rotation[2].abs() < 1e-6);
    assert!((rotation[1] - (0.25f32).sin()).abs() < 1e-5);

    let body = root
        .children()
        .find(|node| node.name() == Some("body"))
        .expect("body node");
    let (translation, rotation, scale) = body.transform().decomposed();
    assert_eq!(translation, [0.0, 1.2, 0.0]);
    assert_eq!(rotation, [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(scale, [1.0, 1.0, 1.0]);
}

#[test]
fn should_refuse_to_export_an_empty_group() {
    let empty = Group::new(CART_NAME);
    assert!(export::to_gltf(&empty).is_err());
    assert!(export::to_gltf_string(&empty).is_err());
}

#[tokio::test]
async fn should_write_the_export_to_disk() {
    let dir = std::env::temp_dir().join(format!("minecart-export-{}", std::process::id()));
    let document = export::to_gltf_string(&cart()).expect("cart should export");

    let path = export::deliver(document.clone(), dir.clone(), EXPORT_FILE_NAME)
        .await
        .expect("export directory is writable");

    assert_eq!(path, dir.join(EXPORT_FILE_NAME));
    let written = tokio::fs::read_to_string(&path).await.expect("file exists");
    assert_eq!(written, document);
    let _ = tokio::fs::remove_dir_all(&dir).await;
}
