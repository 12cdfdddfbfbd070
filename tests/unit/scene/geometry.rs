use super::*;

#[test]
fn cuboid_normals_point_outward() {
    for face in cuboid(DVec3::new(7.8, 1.6, 2.4)) {
        let c = face.centroid();
        assert!(face.normal.dot(c) > 0.0, "normal {:?} at {:?}", face.normal, c);
    }
}

#[test]
fn octahedron_normals_point_outward() {
    let faces = octahedron(1.6);
    assert_eq!(faces.len(), 8);
    for face in faces {
        assert!(face.normal.dot(face.centroid()) > 0.0);
    }
}

#[test]
fn circle_points_lie_on_radius() {
    let pts = circle(1.1, 140);
    assert_eq!(pts.len(), 140);
    for p in pts {
        assert!((p.length() - 1.1).abs() < 1e-12);
        assert_eq!(p.z, 0.0);
    }
    assert_eq!(circle(1.0, 1).len(), 3);
}

#[test]
fn leaves_surround_the_ring() {
    let leaves = laurel_leaves(22, 1.1, 0.32, 0.14, 0.35);
    assert_eq!(leaves.len(), 22);
    for leaf in &leaves {
        let c = leaf.centroid();
        assert!((c.truncate().length() - 1.1).abs() < 1e-9);
    }
}

#[test]
fn transformed_face_moves_vertices_and_rotates_normal() {
    let f = Face::new(vec![DVec3::ZERO, DVec3::X, DVec3::Y]);
    assert!((f.normal - DVec3::Z).length() < 1e-12);
    let rot = DQuat::from_rotation_x(std::f64::consts::FRAC_PI_2);
    let g = f.transformed(rot, DVec3::new(0.0, 0.0, 5.0));
    assert!((g.normal - DVec3::new(0.0, -1.0, 0.0)).length() < 1e-12);
    assert!((g.verts[0] - DVec3::new(0.0, 0.0, 5.0)).length() < 1e-12);
}
