use chromascope::core::transform::{perspective_scale, project, Rotation3, Vec3};

#[test]
fn zero_rotation_in_plane_points_scale_by_view_radius() {
    let rot = Rotation3::default();
    for &(x, y) in &[(0.25, -0.75), (1.0, 1.0), (-0.5, 0.0)] {
        let [px, py] = project(Vec3::new(x, y, 0.0), rot, 700.0, 150.0);
        assert!((px - x * 150.0).abs() < 1e-3);
        assert!((py - y * 150.0).abs() < 1e-3);
    }
}

#[test]
fn positive_depth_shrinks_negative_depth_grows() {
    let rot = Rotation3::default();
    let near = project(Vec3::new(1.0, 0.0, -0.5), rot, 500.0, 200.0)[0];
    let far = project(Vec3::new(1.0, 0.0, 0.5), rot, 500.0, 200.0)[0];
    let mid = project(Vec3::new(1.0, 0.0, 0.0), rot, 500.0, 200.0)[0];
    assert!(near > mid && mid > far, "near={near} mid={mid} far={far}");
}

#[test]
fn camera_plane_degeneracy_is_clamped_finite() {
    // distance + z·radius == 0 exactly.
    let rot = Rotation3::default();
    let [px, py] = project(Vec3::new(1.0, 1.0, -2.5), rot, 500.0, 200.0);
    assert!(px.is_finite() && py.is_finite());
    assert!(px.abs() > 1_000.0, "degenerate point should fly outward");

    assert!(perspective_scale(500.0, -500.0).is_finite());
    assert!(perspective_scale(0.0, 0.0).is_finite());
}

#[test]
fn full_turn_returns_home() {
    let tau = std::f32::consts::TAU;
    let rot = Rotation3 {
        x: tau,
        y: tau,
        z: tau,
    };
    let p = Vec3::new(0.3, -0.4, 0.5);
    let q = rot.apply(p);
    assert!((p.x - q.x).abs() < 1e-5);
    assert!((p.y - q.y).abs() < 1e-5);
    assert!((p.z - q.z).abs() < 1e-5);
}
