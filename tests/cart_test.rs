use std::sync::Arc;

use cgmath::{InnerSpace, Rotation, Vector3};
use minecart::{
    cart::{
        BODY_TAPER, CART_NAME, Palette, ROCK_COUNT, ROCK_FLOOR, ROCK_SPREAD_X, ROCK_SPREAD_Z,
        body, body_box, build_cart, cargo, chassis, ribs, rim, wheel_sets,
    },
    data_structures::scene_graph::MeshNode,
};
use rand::{SeedableRng, rngs::StdRng};

const EPS: f32 = 1e-5;

fn assert_at(node: &MeshNode, expected: [f32; 3]) {
    let offset = node.local.position - Vector3::from(expected);
    assert!(
        offset.magnitude() < EPS,
        "{} is at {:?}, expected {:?}",
        node.name,
        node.local.position,
        expected
    );
}

fn assert_size(node: &MeshNode, expected: [f32; 3]) {
    let (min, max) = node.geometry.bounds().expect("parts have vertices");
    for axis in 0..3 {
        let size = max[axis] - min[axis];
        assert!(
            (size - expected[axis]).abs() < EPS,
            "{} has size {} on axis {}, expected {}",
            node.name,
            size,
            axis,
            expected[axis]
        );
    }
}

/// Where the local up axis of a node points after its rotation.
fn up_of(node: &MeshNode) -> Vector3<f32> {
    node.local.rotation.rotate_vector(Vector3::unit_y())
}

fn count_prefixed(names: &[&str], prefix: &str) -> usize {
    names.iter().filter(|name| name.starts_with(prefix)).count()
}

#[test]
fn should_build_every_part_of_the_cart() {
    let cart = build_cart(&Palette::default(), &mut StdRng::seed_from_u64(7));
    let names: Vec<&str> = cart.children().iter().map(|c| c.name.as_str()).collect();

    assert_eq!(cart.name, CART_NAME);
    assert_eq!(cart.children().len(), 66);
    assert_eq!(count_prefixed(&names, "body"), 1);
    assert_eq!(count_prefixed(&names, "rib_"), 12);
    assert_eq!(count_prefixed(&names, "rim"), 1);
    assert_eq!(count_prefixed(&names, "chassis"), 1);
    assert_eq!(count_prefixed(&names, "axle_"), 2);
    assert_eq!(count_prefixed(&names, "wheel_"), 4);
    assert_eq!(count_prefixed(&names, "rock_"), ROCK_COUNT);
}

#[test]
fn should_keep_rocks_inside_the_tub() {
    let palette = Palette::default();
    // A few seeds so the bounds are not checked against one lucky draw
    for seed in 0..8 {
        let rocks = cargo(&palette, &mut StdRng::seed_from_u64(seed));
        assert_eq!(rocks.len(), ROCK_COUNT);
        for rock in rocks {
            let p = rock.local.position;
            assert!(p.x.abs() <= ROCK_SPREAD_X / 2.0, "{} x = {}", rock.name, p.x);
            assert!(p.z.abs() <= ROCK_SPREAD_Z / 2.0, "{} z = {}", rock.name, p.z);
            assert!(p.y >= ROCK_FLOOR, "{} y = {}", rock.name, p.y);
            assert!(rock.local.scale.x >= 0.8 && rock.local.scale.x < 1.8);
            assert_eq!(rock.local.scale.x, rock.local.scale.y);
            assert_eq!(rock.local.scale.x, rock.local.scale.z);
        }
    }
}

#[test]
fn should_scatter_rocks_reproducibly_for_a_seed() {
    let palette = Palette::default();
    let first = cargo(&palette, &mut StdRng::seed_from_u64(42));
    let second = cargo(&palette, &mut StdRng::seed_from_u64(42));
    let positions = |rocks: &[minecart::data_structures::scene_graph::MeshNode]| {
        rocks.iter().map(|r| r.local.position).collect::<Vec<_>>()
    };
    assert_eq!(positions(&first), positions(&second));
}

#[test]
fn should_taper_only_the_bottom_of_the_body() {
    let untapered = body_box();
    let body = body(&Palette::default());
    let tapered = &body.geometry;

    assert_eq!(untapered.positions.len(), tapered.positions.len());
    for (before, after) in untapered.positions.iter().zip(&tapered.positions) {
        if before[1] < 0.0 {
            assert!((after[0] - before[0] * BODY_TAPER).abs() < 1e-6);
            assert!((after[2] - before[2] * BODY_TAPER).abs() < 1e-6);
        } else {
            assert_eq!(before[0], after[0]);
            assert_eq!(before[2], after[2]);
        }
        assert_eq!(before[1], after[1]);
    }
    assert_eq!(body.local.position.y, 1.2);
}

#[test]
fn should_tilt_side_normals_after_tapering() {
    let body = body(&Palette::default());
    // The first four vertices make up the +X side
    for normal in &body.geometry.normals[0..4] {
        assert!(normal[0] > 0.9);
        assert!(normal[1] < 0.0, "side normals should point slightly down");
    }
}

#[test]
fn should_share_geometry_between_repeated_parts() {
    let palette = Palette::default();

    let ribs = ribs(&palette);
    assert!(ribs.windows(2).all(|w| Arc::ptr_eq(&w[0].geometry, &w[1].geometry)));

    let wheel_sets = wheel_sets(&palette);
    let wheels: Vec<_> = wheel_sets.iter().filter(|n| n.name.starts_with("wheel_")).collect();
    let axles: Vec<_> = wheel_sets.iter().filter(|n| n.name.starts_with("axle_")).collect();
    assert_eq!(wheels.len(), 4);
    assert_eq!(axles.len(), 2);
    assert!(wheels.windows(2).all(|w| Arc::ptr_eq(&w[0].geometry, &w[1].geometry)));
    assert!(Arc::ptr_eq(&axles[0].geometry, &axles[1].geometry));
    assert!(wheel_sets.iter().all(|n| Arc::ptr_eq(&n.material, &palette.iron)));

    let rocks = cargo(&palette, &mut StdRng::seed_from_u64(1));
    assert!(rocks.windows(2).all(|w| Arc::ptr_eq(&w[0].geometry, &w[1].geometry)));
}

#[test]
fn should_draw_the_cart_in_seven_batches() {
    let cart = build_cart(&Palette::default(), &mut StdRng::seed_from_u64(3));
    let batches = cart.batches();

    assert_eq!(batches.len(), 7);
    assert_eq!(cart.geometries().len(), 7);
    assert_eq!(cart.materials().len(), 3);
    let covered: usize = batches.iter().map(|b| b.nodes.len()).sum();
    assert_eq!(covered, cart.children().len());
    assert_eq!(batches[0].nodes, vec![0]);
}

#[test]
fn should_place_ribs_leaning_outwards() {
    let ribs = ribs(&Palette::default());
    let tilt = 0.1f32.sin();

    let (sides, ends): (Vec<_>, Vec<_>) = ribs
        .iter()
        .partition(|rib| (rib.local.position.x.abs() - 1.05).abs() < EPS);
    assert_eq!(sides.len(), 8);
    assert_eq!(ends.len(), 4);

    let mut side_z: Vec<f32> = sides.iter().map(|rib| rib.local.position.z).collect();
    side_z.sort_by(f32::total_cmp);
    side_z.dedup();
    assert_eq!(side_z, vec![-1.4, -0.5, 0.5, 1.4]);
    for rib in &sides {
        let up = up_of(rib);
        assert!((rib.local.position.y - 1.2).abs() < EPS);
        // Rotated about the depth axis only, top away from the centre
        assert!(up.z.abs() < EPS, "{} tilts along z", rib.name);
        assert!((up.x - tilt * rib.local.position.x.signum()).abs() < EPS, "{}", rib.name);
    }

    for rib in &ends {
        let up = up_of(rib);
        let p = rib.local.position;
        assert!((p.x.abs() - 0.6).abs() < EPS);
        assert!((p.y - 1.2).abs() < EPS);
        assert!((p.z.abs() - 1.55).abs() < EPS);
        assert!(up.x.abs() < EPS, "{} tilts along x", rib.name);
        assert!((up.z - tilt * p.z.signum()).abs() < EPS, "{}", rib.name);
    }
    assert_size(&ribs[0], [0.15, 1.4, 0.15]);
}

#[test]
fn should_place_rim_on_top_of_the_tub() {
    let palette = Palette::default();
    let rim = rim(&palette);
    assert_at(&rim, [0.0, 1.9, 0.0]);
    assert_size(&rim, [2.4, 0.15, 3.4]);
    assert!(Arc::ptr_eq(&rim.material, &palette.iron));
}

#[test]
fn should_place_chassis_below_the_tub() {
    let palette = Palette::default();
    let chassis = chassis(&palette);
    assert_at(&chassis, [0.0, 0.5, 0.0]);
    assert_size(&chassis, [1.98, 0.2, 2.88]);
    assert!(Arc::ptr_eq(&chassis.material, &palette.iron));
}

#[test]
fn should_place_wheel_sets_on_their_side() {
    let parts = wheel_sets(&Palette::default());
    let find = |name: &str| {
        parts
            .iter()
            .find(|node| node.name == name)
            .unwrap_or_else(|| panic!("missing {name}"))
    };

    assert_at(find("axle_0"), [0.0, 0.3, 1.0]);
    assert_at(find("axle_1"), [0.0, 0.3, -1.0]);
    assert_at(find("wheel_0"), [1.1, 0.3, 1.0]);
    assert_at(find("wheel_1"), [-1.1, 0.3, 1.0]);
    assert_at(find("wheel_2"), [1.1, 0.3, -1.0]);
    assert_at(find("wheel_3"), [-1.1, 0.3, -1.0]);
    // A quarter turn about z lays the cylinder axis along -x
    for node in &parts {
        let up = up_of(node);
        assert!((up - Vector3::new(-1.0, 0.0, 0.0)).magnitude() < EPS, "{}", node.name);
    }
    assert_size(find("axle_0"), [0.2, 2.4, 0.2]);
    assert_size(find("wheel_0"), [0.8, 0.25, 0.8]);
}

#[test]
fn should_mound_rocks_towards_the_centre() {
    let palette = Palette::default();
    for seed in 0..8 {
        for rock in cargo(&palette, &mut StdRng::seed_from_u64(seed)) {
            let p = rock.local.position;
            let dist = (p.x * p.x + p.z * p.z).sqrt();
            let bias = (0.6 - dist * 0.3).max(0.0);
            let jitter = p.y - ROCK_FLOOR - bias;
            assert!(p.y <= 2.2 + EPS, "{} y = {}", rock.name, p.y);
            assert!(
                (-EPS..=0.2 + EPS).contains(&jitter),
                "{} sits {} above its mound height",
                rock.name,
                jitter
            );
        }
    }
}
