use bevy::prelude::*;

pub mod groups;
pub mod orbits;

pub use groups::{LabelOrbit, LinkConfig};
pub use orbits::OrbitalSimulation;

use crate::config::LINK_CONFIG_PATH;
use crate::error::GlobeError;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Simulation::default())
            .add_systems(Startup, start)
            .add_systems(Last, teardown);
    }
}

/// Source of raw orbital state for every satellite on the globe.
///
/// Bulk getters hand back owned buffers, one entry per satellite in
/// creation order.
pub trait SimulationService: Send + Sync {
    /// advance simulation time by `dt` seconds
    fn advance(&mut self, dt: f64);

    fn satellite_count(&self) -> usize;

    /// raw positions, simulation space
    fn positions(&self) -> Vec<[f32; 3]>;

    /// spin angle per satellite, radians
    fn rotations(&self) -> Vec<f32>;

    /// registers a label group, returns the index of its first satellite
    fn create_from_label(&mut self, orbit: &LabelOrbit) -> Result<usize, GlobeError>;

    /// first satellite index of every label, one entry per label
    fn label_start_indices(&self) -> Vec<usize>;

    fn link_for_label(&self, label_index: usize) -> Option<String>;

    fn label_text(&self, label_index: usize) -> Option<String>;

    /// satellite that stands for the label when hit testing
    fn representative_satellite(&self, label_index: usize) -> Option<usize> {
        self.label_start_indices().get(label_index).copied()
    }
}

/// Lifecycle wrapper around the simulation service.
#[derive(Default)]
pub enum SimulationState {
    #[default]
    Uninitialized,
    Ready(Box<dyn SimulationService>),
    Destroyed,
}

#[derive(Resource, Default)]
pub struct Simulation {
    state: SimulationState,
}

impl Simulation {
    #[cfg(test)]
    pub fn ready(service: impl SimulationService + 'static) -> Self {
        Self {
            state: SimulationState::Ready(Box::new(service)),
        }
    }

    #[cfg(test)]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, SimulationState::Ready(_))
    }

    #[cfg(test)]
    pub fn is_destroyed(&self) -> bool {
        matches!(self.state, SimulationState::Destroyed)
    }

    /// only an uninitialized simulation can be brought up
    pub fn initialize(&mut self, service: Box<dyn SimulationService>) -> bool {
        if !matches!(self.state, SimulationState::Uninitialized) {
            return false;
        }
        self.state = SimulationState::Ready(service);
        true
    }

    pub fn service(&self) -> Result<&dyn SimulationService, GlobeError> {
        match &self.state {
            SimulationState::Ready(service) => Ok(service.as_ref()),
            _ => Err(GlobeError::NotReady),
        }
    }

    pub fn service_mut(&mut self) -> Result<&mut (dyn SimulationService + 'static), GlobeError> {
        match &mut self.state {
            SimulationState::Ready(service) => Ok(service.as_mut()),
            _ => Err(GlobeError::NotReady),
        }
    }

    /// releases the service, returns false if there was nothing to release
    pub fn destroy(&mut self) -> bool {
        match std::mem::replace(&mut self.state, SimulationState::Destroyed) {
            SimulationState::Ready(_) => true,
            SimulationState::Uninitialized => {
                self.state = SimulationState::Uninitialized;
                false
            }
            SimulationState::Destroyed => false,
        }
    }
}

// build the in-process simulation from the link config
fn start(mut simulation: ResMut<Simulation>) {
    let config = LinkConfig::load_or_default(LINK_CONFIG_PATH);

    let mut service = OrbitalSimulation::new();
    for group in &config.groups {
        if let Err(e) = service.create_from_label(group) {
            warn!("Skipping label group {:?}: {}", group.label, e);
        }
    }

    info!(
        "Simulation ready: {} labels, {} satellites",
        service.label_start_indices().len(),
        service.satellite_count()
    );
    simulation.initialize(Box::new(service));
}

fn teardown(mut exit: EventReader<AppExit>, mut simulation: ResMut<Simulation>) {
    if exit.read().next().is_some() && simulation.destroy() {
        info!("Simulation destroyed");
    }
}
