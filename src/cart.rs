//! Procedural construction of the minecart.
//!
//! Every part category has its own factory returning the mesh nodes for
//! that category. [`build_cart`] composes them into the `minecart` group.
//! All positions are relative to the group origin, which sits on the rails
//! below the cart.

use std::{f32::consts::FRAC_PI_2, sync::Arc};

use rand::Rng;

use crate::data_structures::{
    geometry::Geometry,
    instance::Instance,
    material::Material,
    scene_graph::{Group, MeshNode},
};

pub const CART_NAME: &str = "minecart";

pub const BODY_WIDTH: f32 = 2.2;
pub const BODY_HEIGHT: f32 = 1.4;
pub const BODY_DEPTH: f32 = 3.2;
pub const BODY_ELEVATION: f32 = 1.2;
pub const BODY_TAPER: f32 = 0.85;

const RIB_THICKNESS: f32 = 0.15;
const RIB_TILT: f32 = 0.1;
const SIDE_RIB_X: f32 = 1.05;
const SIDE_RIB_Z: [f32; 4] = [-1.4, -0.5, 0.5, 1.4];
const END_RIB_X: [f32; 2] = [-0.6, 0.6];
const END_RIB_Z: f32 = 1.55;

const RIM_OVERHANG: f32 = 0.2;
const RIM_HEIGHT: f32 = 0.15;
const CHASSIS_SCALE: f32 = 0.9;
const CHASSIS_HEIGHT: f32 = 0.2;
const CHASSIS_ELEVATION: f32 = 0.5;

pub const AXLE_Z: [f32; 2] = [1.0, -1.0];
const AXLE_RADIUS: f32 = 0.1;
const AXLE_LENGTH: f32 = 2.4;
const AXLE_SEGMENTS: u32 = 8;
const AXLE_ELEVATION: f32 = 0.3;
const WHEEL_RADIUS: f32 = 0.4;
const WHEEL_THICKNESS: f32 = 0.25;
const WHEEL_SEGMENTS: u32 = 12;
const WHEEL_X: [f32; 2] = [1.1, -1.1];

pub const ROCK_COUNT: usize = 45;
pub const ROCK_SPREAD_X: f32 = 1.6;
pub const ROCK_SPREAD_Z: f32 = 2.6;
pub const ROCK_FLOOR: f32 = 1.4;
const ROCK_RADIUS: f32 = 0.3;
const ROCK_JITTER: f32 = 0.2;
const ROCK_MOUND_PEAK: f32 = 0.6;
const ROCK_MOUND_FALLOFF: f32 = 0.3;
const ROCK_MAX_ANGLE: f32 = 3.0;
const ROCK_MIN_SCALE: f32 = 0.8;

/// The three materials shared by all cart parts.
#[derive(Clone, Debug)]
pub struct Palette {
    pub body: Arc<Material>,
    pub iron: Arc<Material>,
    pub rock: Arc<Material>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            body: Arc::new(Material::flat("body", 0xA04030)),
            iron: Arc::new(Material::flat("iron", 0x2A2A2A).with_metal(0.6, 0.4)),
            rock: Arc::new(Material::flat("rock", 0x151515)),
        }
    }
}

/// The untapered box the body starts from.
pub fn body_box() -> Geometry {
    Geometry::cuboid("body", BODY_WIDTH, BODY_HEIGHT, BODY_DEPTH)
}

/// Trapezoid tub: the bottom half of the box pulled towards the centre.
pub fn body(palette: &Palette) -> MeshNode {
    let mut geometry = body_box();
    geometry.taper_bottom(BODY_TAPER);
    geometry.compute_vertex_normals();
    MeshNode::new(
        "body",
        &Arc::new(geometry),
        &palette.body,
        Instance::from(cgmath::Vector3::new(0.0, BODY_ELEVATION, 0.0)),
    )
}

/// Struts on the outside of the tub, tilted slightly outwards.
pub fn ribs(palette: &Palette) -> Vec<MeshNode> {
    let geometry = Arc::new(Geometry::cuboid(
        "rib",
        RIB_THICKNESS,
        BODY_HEIGHT,
        RIB_THICKNESS,
    ));
    // (x, z, rotation around x, rotation around z)
    let sides = SIDE_RIB_Z.iter().flat_map(|&z| {
        [
            (SIDE_RIB_X, z, 0.0, -RIB_TILT),
            (-SIDE_RIB_X, z, 0.0, RIB_TILT),
        ]
    });
    let ends = END_RIB_X.iter().flat_map(|&x| {
        [
            (x, END_RIB_Z, RIB_TILT, 0.0),
            (x, -END_RIB_Z, -RIB_TILT, 0.0),
        ]
    });
    sides
        .chain(ends)
        .enumerate()
        .map(|(idx, (x, z, rot_x, rot_z))| {
            let local = Instance::from(cgmath::Vector3::new(x, BODY_ELEVATION, z))
                .with_euler(rot_x, 0.0, rot_z);
            MeshNode::new(format!("rib_{idx}"), &geometry, &palette.body, local)
        })
        .collect()
}

/// Iron lip around the top edge of the tub.
pub fn rim(palette: &Palette) -> MeshNode {
    let geometry = Geometry::cuboid(
        "rim",
        BODY_WIDTH + RIM_OVERHANG,
        RIM_HEIGHT,
        BODY_DEPTH + RIM_OVERHANG,
    );
    MeshNode::new(
        "rim",
        &Arc::new(geometry),
        &palette.iron,
        Instance::from(cgmath::Vector3::new(
            0.0,
            BODY_ELEVATION + BODY_HEIGHT / 2.0,
            0.0,
        )),
    )
}

/// Undercarriage frame below the tub.
pub fn chassis(palette: &Palette) -> MeshNode {
    let geometry = Geometry::cuboid(
        "chassis",
        BODY_WIDTH * CHASSIS_SCALE,
        CHASSIS_HEIGHT,
        BODY_DEPTH * CHASSIS_SCALE,
    );
    MeshNode::new(
        "chassis",
        &Arc::new(geometry),
        &palette.iron,
        Instance::from(cgmath::Vector3::new(0.0, CHASSIS_ELEVATION, 0.0)),
    )
}

/// Both axles with their wheels. One axle and one wheel geometry serve
/// every axle and every wheel.
pub fn wheel_sets(palette: &Palette) -> Vec<MeshNode> {
    let axle = Arc::new(Geometry::cylinder(
        "axle",
        AXLE_RADIUS,
        AXLE_RADIUS,
        AXLE_LENGTH,
        AXLE_SEGMENTS,
    ));
    let wheel = Arc::new(Geometry::cylinder(
        "wheel",
        WHEEL_RADIUS,
        WHEEL_RADIUS,
        WHEEL_THICKNESS,
        WHEEL_SEGMENTS,
    ));
    AXLE_Z
        .iter()
        .enumerate()
        .flat_map(|(set, &z)| wheel_set(set, z, &axle, &wheel, &palette.iron))
        .collect()
}

/// One axle across the width of the cart at depth `z` and a wheel on
/// either end, all lying on their side.
pub fn wheel_set(
    set: usize,
    z: f32,
    axle: &Arc<Geometry>,
    wheel: &Arc<Geometry>,
    iron: &Arc<Material>,
) -> Vec<MeshNode> {
    let lying = |x: f32| {
        Instance::from(cgmath::Vector3::new(x, AXLE_ELEVATION, z)).with_euler(0.0, 0.0, FRAC_PI_2)
    };
    let mut nodes = vec![MeshNode::new(format!("axle_{set}"), axle, iron, lying(0.0))];
    nodes.extend(WHEEL_X.iter().enumerate().map(|(side, &x)| {
        MeshNode::new(
            format!("wheel_{}", set * WHEEL_X.len() + side),
            wheel,
            iron,
            lying(x),
        )
    }));
    nodes
}

/// A mound of coal in the open top of the tub.
///
/// Rocks closer to the centre of the footprint sit higher, up to
/// `ROCK_MOUND_PEAK` above the floor of the pile.
pub fn cargo<R: Rng>(palette: &Palette, rng: &mut R) -> Vec<MeshNode> {
    let geometry = Arc::new(Geometry::icosahedron("rock", ROCK_RADIUS));
    (0..ROCK_COUNT)
        .map(|idx| {
            let x = (rng.r#gen::<f32>() - 0.5) * ROCK_SPREAD_X;
            let z = (rng.r#gen::<f32>() - 0.5) * ROCK_SPREAD_Z;
            let dist = (x * x + z * z).sqrt();
            let bias = (ROCK_MOUND_PEAK - dist * ROCK_MOUND_FALLOFF).max(0.0);
            let y = ROCK_FLOOR + rng.r#gen::<f32>() * ROCK_JITTER + bias;
            let local = Instance::from(cgmath::Vector3::new(x, y, z))
                .with_euler(
                    rng.r#gen::<f32>() * ROCK_MAX_ANGLE,
                    rng.r#gen::<f32>() * ROCK_MAX_ANGLE,
                    rng.r#gen::<f32>() * ROCK_MAX_ANGLE,
                )
                .with_uniform_scale(ROCK_MIN_SCALE + rng.r#gen::<f32>());
            MeshNode::new(format!("rock_{idx}"), &geometry, &palette.rock, local)
        })
        .collect()
}

/// Assemble the complete cart: body, ribs, rim, chassis, wheel sets, cargo.
pub fn build_cart<R: Rng>(palette: &Palette, rng: &mut R) -> Group {
    let mut group = Group::new(CART_NAME);
    group.add_child(body(palette));
    group.add_children(ribs(palette));
    group.add_child(rim(palette));
    group.add_child(chassis(palette));
    group.add_children(wheel_sets(palette));
    group.add_children(cargo(palette, rng));
    log::info!(
        "built {} with {} meshes in {} batches",
        group.name,
        group.children().len(),
        group.batches().len()
    );
    group
}
