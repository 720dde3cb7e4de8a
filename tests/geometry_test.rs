use cgmath::{InnerSpace, Vector3};
use minecart::data_structures::geometry::Geometry;

fn assert_unit_normals(geometry: &Geometry) {
    assert_eq!(geometry.normals.len(), geometry.positions.len());
    for normal in &geometry.normals {
        let length = Vector3::from(*normal).magnitude();
        assert!((length - 1.0).abs() < 1e-5, "normal {:?} is not unit length", normal);
    }
}

#[test]
fn should_build_box_with_one_segment_per_side() {
    let cuboid = Geometry::cuboid("box", 2.2, 1.4, 3.2);

    assert_eq!(cuboid.positions.len(), 24);
    assert_eq!(cuboid.indices.len(), 36);
    assert!(cuboid.indices.iter().all(|&i| (i as usize) < cuboid.positions.len()));
    assert_eq!(cuboid.bounds(), Some(([-1.1, -0.7, -1.6], [1.1, 0.7, 1.6])));
    assert_eq!(cuboid.normals[0], [1.0, 0.0, 0.0]);
    assert_eq!(cuboid.normals[4], [-1.0, 0.0, 0.0]);
    assert_eq!(cuboid.normals[8], [0.0, 1.0, 0.0]);
    assert_unit_normals(&cuboid);
}

#[test]
fn should_keep_box_normals_when_recomputed() {
    let cuboid = Geometry::cuboid("box", 1.0, 2.0, 3.0);
    let mut recomputed = cuboid.clone();
    recomputed.compute_vertex_normals();

    for (given, computed) in cuboid.normals.iter().zip(&recomputed.normals) {
        let diff = Vector3::from(*given) - Vector3::from(*computed);
        assert!(diff.magnitude() < 1e-5, "{:?} != {:?}", given, computed);
    }
}

#[test]
fn should_build_closed_cylinder() {
    let wheel = Geometry::cylinder("wheel", 0.4, 0.4, 0.25, 12);

    // Torso: two rows of 13, caps: 12 centres and 13 rim vertices each
    assert_eq!(wheel.positions.len(), 26 + 2 * 25);
    assert_eq!(wheel.indices.len(), 12 * 6 + 2 * 12 * 3);
    let (min, max) = wheel.bounds().expect("cylinder has vertices");
    assert!((max[1] - 0.125).abs() < 1e-6);
    assert!((min[1] + 0.125).abs() < 1e-6);
    assert!(max[0] <= 0.4 + 1e-6);
    assert_unit_normals(&wheel);
}

#[test]
fn should_leave_out_caps_of_zero_radius() {
    let cone = Geometry::cylinder("cone", 0.0, 1.0, 1.0, 8);

    assert_eq!(cone.positions.len(), 18 + 17);
    // Only the lower triangle of each torso quad and the bottom cap remain
    assert_eq!(cone.indices.len(), 8 * 3 + 8 * 3);
}

#[test]
fn should_build_icosahedron_with_face_normals() {
    let rock = Geometry::icosahedron("rock", 0.3);

    assert_eq!(rock.positions.len(), 60);
    assert_eq!(rock.indices.len(), 60);
    for position in &rock.positions {
        assert!((Vector3::from(*position).magnitude() - 0.3).abs() < 1e-5);
    }
    assert_unit_normals(&rock);
    for face in rock.normals.chunks_exact(3) {
        assert_eq!(face[0], face[1]);
        assert_eq!(face[1], face[2]);
    }
    // Faces point away from the centre
    for (positions, normals) in rock.positions.chunks_exact(3).zip(rock.normals.chunks_exact(3)) {
        let centroid = (Vector3::from(positions[0])
            + Vector3::from(positions[1])
            + Vector3::from(positions[2]))
            / 3.0;
        assert!(centroid.dot(Vector3::from(normals[0])) > 0.0);
    }
}

#[test]
fn should_taper_only_vertices_below_origin() {
    let mut tub = Geometry::cuboid("tub", 2.0, 2.0, 2.0);
    tub.taper_bottom(0.5);

    for position in &tub.positions {
        let expected = if position[1] < 0.0 { 0.5 } else { 1.0 };
        assert_eq!(position[0].abs(), expected);
        assert_eq!(position[2].abs(), expected);
    }
}

#[test]
fn should_have_no_bounds_when_empty() {
    let mut nothing = Geometry::cuboid("nothing", 1.0, 1.0, 1.0);
    nothing.positions.clear();
    assert_eq!(nothing.bounds(), None);
}
