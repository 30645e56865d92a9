//! Shared 3D rotation and perspective projection.
//!
//! Every 3D mode (particle cloud, mesh, orbitals, waveform sheets) goes
//! through this one routine with its own perspective distance, view radius
//! and rotation source.

use serde::{Deserialize, Serialize};

/// Denominators closer to the camera plane than this are clamped so the
/// projection stays finite instead of dividing by zero.
const MIN_DENOM: f32 = 1e-3;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Per-axis rotation switches and speeds (radians per second).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RotationAxes {
    #[serde(default = "RotationAxes::default_enable_x")]
    pub enable_x: bool,
    #[serde(default = "RotationAxes::default_enable_y")]
    pub enable_y: bool,
    #[serde(default)]
    pub enable_z: bool,
    #[serde(default = "RotationAxes::default_speed_x")]
    pub speed_x: f32,
    #[serde(default = "RotationAxes::default_speed_y")]
    pub speed_y: f32,
    #[serde(default = "RotationAxes::default_speed_z")]
    pub speed_z: f32,
}

impl RotationAxes {
    fn default_enable_x() -> bool {
        true
    }
    fn default_enable_y() -> bool {
        true
    }
    fn default_speed_x() -> f32 {
        0.3
    }
    fn default_speed_y() -> f32 {
        0.6
    }
    fn default_speed_z() -> f32 {
        0.2
    }
}

impl Default for RotationAxes {
    fn default() -> Self {
        Self {
            enable_x: Self::default_enable_x(),
            enable_y: Self::default_enable_y(),
            enable_z: false,
            speed_x: Self::default_speed_x(),
            speed_y: Self::default_speed_y(),
            speed_z: Self::default_speed_z(),
        }
    }
}

/// Euler angles in radians, applied in fixed X then Y then Z order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Rotation3 {
    pub fn around_y(angle: f32) -> Self {
        Self {
            x: 0.0,
            y: angle,
            z: 0.0,
        }
    }

    pub fn around_x(angle: f32) -> Self {
        Self {
            x: angle,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Angles derived from wall time: angle = elapsed × speed per enabled
    /// axis, recomputed each frame so missed ticks cannot accumulate drift.
    /// `drive` is an additional audio-driven offset, strongest on X.
    pub fn from_axes(axes: &RotationAxes, elapsed: f32, drive: f32) -> Self {
        Self {
            x: if axes.enable_x {
                elapsed * axes.speed_x + drive
            } else {
                0.0
            },
            y: if axes.enable_y {
                elapsed * axes.speed_y + drive * 0.8
            } else {
                0.0
            },
            z: if axes.enable_z {
                elapsed * axes.speed_z + drive * 0.6
            } else {
                0.0
            },
        }
    }

    /// Rotate `p` around X, then Y, then Z (right-handed).
    pub fn apply(&self, p: Vec3) -> Vec3 {
        let (sx, cx) = self.x.sin_cos();
        let y1 = p.y * cx - p.z * sx;
        let z1 = p.y * sx + p.z * cx;

        let (sy, cy) = self.y.sin_cos();
        let x2 = p.x * cy + z1 * sy;
        let z2 = -p.x * sy + z1 * cy;

        let (sz, cz) = self.z.sin_cos();
        Vec3 {
            x: x2 * cz - y1 * sz,
            y: x2 * sz + y1 * cz,
            z: z2,
        }
    }
}

/// Perspective divide: `distance / (distance + depth)`, with the denominator
/// clamped away from zero so points at the camera plane stay finite.
pub fn perspective_scale(distance: f32, depth: f32) -> f32 {
    let denom = distance + depth;
    if denom.abs() < MIN_DENOM {
        distance / if denom < 0.0 { -MIN_DENOM } else { MIN_DENOM }
    } else {
        distance / denom
    }
}

/// Rotate then project a point to 2D screen offsets (relative to center).
pub fn project(p: Vec3, rot: Rotation3, distance: f32, view_radius: f32) -> [f32; 2] {
    let r = rot.apply(p);
    let scale = perspective_scale(distance, r.z * view_radius);
    [r.x * view_radius * scale, r.y * view_radius * scale]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_rotation_is_pure_radial_scaling() {
        let rot = Rotation3::default();
        for &(x, y) in &[(0.0, 0.0), (1.0, -0.5), (-0.3, 0.9)] {
            let [px, py] = project(Vec3::new(x, y, 0.0), rot, 500.0, 200.0);
            assert_relative_eq!(px, x * 200.0, epsilon = 1e-4);
            assert_relative_eq!(py, y * 200.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn rotation_preserves_length() {
        let rot = Rotation3 {
            x: 0.7,
            y: -1.3,
            z: 2.1,
        };
        let p = Vec3::new(0.3, -0.8, 0.5);
        let q = rot.apply(p);
        let before = (p.x * p.x + p.y * p.y + p.z * p.z).sqrt();
        let after = (q.x * q.x + q.y * q.y + q.z * q.z).sqrt();
        assert_relative_eq!(before, after, epsilon = 1e-5);
    }

    #[test]
    fn quarter_turn_around_y() {
        let rot = Rotation3::around_y(std::f32::consts::FRAC_PI_2);
        let q = rot.apply(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(q.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(q.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn camera_plane_point_stays_finite() {
        // depth chosen so distance + depth == 0
        let s = perspective_scale(500.0, -500.0);
        assert!(s.is_finite());
        let [px, py] = project(
            Vec3::new(1.0, 1.0, -2.5),
            Rotation3::default(),
            500.0,
            200.0,
        );
        assert!(px.is_finite() && py.is_finite());
    }

    #[test]
    fn disabled_axes_ignore_elapsed_time() {
        let axes = RotationAxes {
            enable_x: false,
            enable_y: false,
            enable_z: false,
            ..Default::default()
        };
        let rot = Rotation3::from_axes(&axes, 123.0, 0.0);
        assert_eq!(rot, Rotation3::default());
    }

    #[test]
    fn angle_is_recomputed_from_elapsed_not_integrated() {
        let axes = RotationAxes::default();
        let a = Rotation3::from_axes(&axes, 10.0, 0.0);
        let b = Rotation3::from_axes(&axes, 10.0, 0.0);
        assert_eq!(a, b);
        assert_relative_eq!(a.x, 10.0 * axes.speed_x);
    }
}
