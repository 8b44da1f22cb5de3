use std::f32::consts::TAU;

use bevy::prelude::*;

use super::{LabelOrbit, SimulationService};
use crate::config::LETTER_SPACING;
use crate::error::GlobeError;

// one letter of a label, riding its group's orbit
#[derive(Debug, Clone)]
struct Body {
    group: usize,
    angle: f32,
    spin: f32,
}

#[derive(Debug, Clone)]
struct Group {
    label: String,
    url: String,
    start: usize,
    count: usize,
    radius: f32,
    inclination: f32,
    angular_rate: f32,
    spin_rate: f32,
}

/// In-process simulation, circular orbits around the polar (Z) axis.
#[derive(Debug, Default)]
pub struct OrbitalSimulation {
    bodies: Vec<Body>,
    groups: Vec<Group>,
}

impl OrbitalSimulation {
    pub fn new() -> Self {
        Self::default()
    }

    fn position_of(&self, body: &Body) -> Vec3 {
        let group = &self.groups[body.group];

        // circle in the XY plane, then tilted about X
        let flat = Vec3::new(
            group.radius * body.angle.cos(),
            group.radius * body.angle.sin(),
            0.0,
        );
        Quat::from_rotation_x(group.inclination) * flat
    }
}

impl SimulationService for OrbitalSimulation {
    fn advance(&mut self, dt: f64) {
        let dt = dt as f32;
        for body in &mut self.bodies {
            let group = &self.groups[body.group];
            body.angle = (body.angle + group.angular_rate * dt).rem_euclid(TAU);
            body.spin = (body.spin + group.spin_rate * dt).rem_euclid(TAU);
        }
    }

    fn satellite_count(&self) -> usize {
        self.bodies.len()
    }

    fn positions(&self) -> Vec<[f32; 3]> {
        self.bodies
            .iter()
            .map(|body| self.position_of(body).to_array())
            .collect()
    }

    fn rotations(&self) -> Vec<f32> {
        self.bodies.iter().map(|body| body.spin).collect()
    }

    fn create_from_label(&mut self, orbit: &LabelOrbit) -> Result<usize, GlobeError> {
        orbit.validate()?;

        let start = self.bodies.len();
        let group_index = self.groups.len();
        let letters = orbit.label.chars().filter(|c| !c.is_whitespace()).count();

        // letters trail each other along the orbit
        for i in 0..letters {
            self.bodies.push(Body {
                group: group_index,
                angle: (orbit.phase - i as f32 * LETTER_SPACING).rem_euclid(TAU),
                spin: 0.0,
            });
        }

        self.groups.push(Group {
            label: orbit.label.clone(),
            url: orbit.url.clone(),
            start,
            count: letters,
            radius: orbit.radius,
            inclination: orbit.inclination,
            angular_rate: orbit.angular_rate,
            spin_rate: orbit.spin_rate,
        });

        Ok(start)
    }

    fn label_start_indices(&self) -> Vec<usize> {
        self.groups.iter().map(|group| group.start).collect()
    }

    fn link_for_label(&self, label_index: usize) -> Option<String> {
        self.groups.get(label_index).map(|group| group.url.clone())
    }

    fn label_text(&self, label_index: usize) -> Option<String> {
        self.groups.get(label_index).map(|group| group.label.clone())
    }

    // middle letter of the word
    fn representative_satellite(&self, label_index: usize) -> Option<usize> {
        self.groups
            .get(label_index)
            .map(|group| group.start + group.count / 2)
    }
}
