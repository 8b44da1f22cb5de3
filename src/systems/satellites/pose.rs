use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use super::frame::OrbitalFrame;
use super::visibility::brightness;
use crate::systems::globe::GlobeRotation;
use crate::systems::simulation::SimulationService;

/// Final world pose of one satellite, what the render layer consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatellitePose {
    pub position: Vec3,
    pub rotation: Quat,
    pub brightness: f32,
}

impl SatellitePose {
    // parked at the origin, dark
    pub const HIDDEN: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        brightness: 0.0,
    };

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.brightness.is_finite()
    }
}

/// Poses of the last update, index aligned with the simulation's satellites.
#[derive(Resource, Default, Debug)]
pub struct SatellitePoses(pub Vec<SatellitePose>);

impl SatellitePoses {
    pub fn get(&self, index: usize) -> Option<&SatellitePose> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// the satellite model is authored lying down, stand it up against the surface
fn mesh_correction() -> Quat {
    Quat::from_axis_angle(Vec3::NEG_X, FRAC_PI_2)
}

/// Raw simulation state plus globe orientation in, world pose out.
pub fn compute_pose(p: Vec3, spin: f32, globe: Quat) -> SatellitePose {
    if !p.is_finite() {
        return SatellitePose::HIDDEN;
    }

    // frame comes from the unrotated position
    let frame = OrbitalFrame::from_position(p);

    let q = globe * p;
    let oriented = globe * frame.to_quat() * mesh_correction();

    // spin about the satellite's own position vector, applied last
    let spin = if spin.is_finite() { spin } else { 0.0 };
    let axis = q.try_normalize().unwrap_or(Vec3::Z);
    let rotation = (Quat::from_axis_angle(axis, spin) * oriented).normalize();

    SatellitePose {
        position: q,
        rotation,
        brightness: brightness(q),
    }
}

/// One pose per satellite the simulation reports, empty when there are none.
pub fn compute_poses(service: &dyn SimulationService, rotation: &GlobeRotation) -> Vec<SatellitePose> {
    let count = service.satellite_count();
    if count == 0 {
        return Vec::new();
    }

    // scoped buffers, dropped at the end of this call
    let positions = service.positions();
    let rotations = service.rotations();
    let globe = rotation.quat();

    (0..count)
        .map(|i| match positions.get(i) {
            Some(p) => compute_pose(Vec3::from_array(*p), rotations.get(i).copied().unwrap_or(0.0), globe),
            None => SatellitePose::HIDDEN,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::simulation::{LabelOrbit, OrbitalSimulation};
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_identity_globe_keeps_position() {
        let p = Vec3::new(7.0, 0.0, 0.0);
        let pose = compute_pose(p, 0.0, Quat::IDENTITY);
        assert!(pose.position.abs_diff_eq(p, 1e-6));
        assert_eq!(pose.brightness, 0.0);
    }

    #[test]
    fn test_globe_rotation_moves_satellite() {
        let mut globe = GlobeRotation::default();
        globe.yaw = -FRAC_PI_2;
        // yaw -90° about Y swings +X round to +Z, towards the camera
        let pose = compute_pose(Vec3::new(1.0, 0.0, 0.0), 0.0, globe.quat());
        assert!(pose.position.abs_diff_eq(Vec3::Z, 1e-5));
        assert_approx_eq!(pose.brightness, 2.0, 1e-4);
    }

    #[test]
    fn test_mesh_stays_aligned_with_radial() {
        let mut rotation = GlobeRotation::default();
        rotation.yaw = 0.7;
        rotation.pitch = -0.3;
        let globe = rotation.quat();
        let p = Vec3::new(3.0, 4.0, 2.0);

        for spin in [0.0, 0.5, 2.0, 5.5] {
            let pose = compute_pose(p, spin, globe);
            let outward = pose.rotation * Vec3::NEG_Y;
            assert!(outward.abs_diff_eq(pose.position.normalize(), 1e-4));
        }
    }

    #[test]
    fn test_spin_turns_about_position() {
        let p = Vec3::new(3.0, 4.0, 2.0);
        let still = compute_pose(p, 0.0, Quat::IDENTITY);
        let spun = compute_pose(p, FRAC_PI_2, Quat::IDENTITY);

        assert_eq!(still.position, spun.position);
        let expected = Quat::from_axis_angle(p.normalize(), FRAC_PI_2) * still.rotation;
        assert!(spun.rotation.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_polar_satellite_has_no_nan() {
        let pose = compute_pose(Vec3::new(0.0, 0.0, 5.0), 1.0, Quat::IDENTITY);
        assert!(pose.is_finite());
        assert_eq!(pose.brightness, 2.0);

        let pose = compute_pose(Vec3::ZERO, 1.0, Quat::IDENTITY);
        assert!(pose.is_finite());
    }

    #[test]
    fn test_non_finite_input_is_hidden() {
        let pose = compute_pose(Vec3::new(f32::NAN, 0.0, 1.0), 0.0, Quat::IDENTITY);
        assert_eq!(pose, SatellitePose::HIDDEN);

        let pose = compute_pose(Vec3::new(0.0, 1.0, 1.0), f32::INFINITY, Quat::IDENTITY);
        assert!(pose.is_finite());
    }

    #[test]
    fn test_poses_follow_simulation() {
        let mut sim = OrbitalSimulation::new();
        sim.create_from_label(&LabelOrbit::new("ORBIT", "https://example.com")).unwrap();
        sim.create_from_label(&LabelOrbit::new("GO", "https://example.com/go").with_radius(9.0))
            .unwrap();

        let poses = compute_poses(&sim, &GlobeRotation::default());
        assert_eq!(poses.len(), sim.satellite_count());
        assert!(poses.iter().all(SatellitePose::is_finite));

        let positions = sim.positions();
        for (pose, p) in poses.iter().zip(positions) {
            assert!(pose.position.abs_diff_eq(Vec3::from_array(p), 1e-5));
        }
    }

    #[test]
    fn test_empty_simulation_is_noop() {
        let sim = OrbitalSimulation::new();
        assert!(compute_poses(&sim, &GlobeRotation::default()).is_empty());
    }
}
