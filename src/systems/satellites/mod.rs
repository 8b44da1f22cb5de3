use bevy::prelude::*;

pub mod frame;
pub mod labels;
pub mod pose;
pub mod visibility;

pub use pose::{SatellitePose, SatellitePoses, compute_poses};

use crate::config::{SATELLITE_EMISSIVE, SATELLITE_SIZE};
use crate::error::GlobeError;
use crate::systems::GlobeSet;
use crate::systems::globe::GlobeRotation;
use crate::systems::pointer::GestureController;
use crate::systems::simulation::Simulation;
use crate::systems::time::TimeState;

/// Main satellite plugin
pub struct SatellitePlugin;

impl Plugin for SatellitePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SatellitePoses::default())
            .add_systems(Startup, (setup_template, labels::setup_labels))
            .add_systems(Update, (
                spawn_satellites
                    .run_if(resource_exists::<SatelliteTemplate>)
                    .run_if(not(resource_exists::<SatellitesSpawned>))
                    .in_set(GlobeSet::Pose),
                tick.in_set(GlobeSet::Pose),
                (apply_poses, labels::update_labels).in_set(GlobeSet::Render),
            ));
    }
}

// stable index into the simulation's satellite arrays
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SatelliteIndex(pub usize);

// shared look for every satellite instance
#[derive(Resource)]
pub struct SatelliteTemplate {
    pub mesh: Handle<Mesh>,
    pub base_color: Color,
}

// marks the one-off spawn as done
#[derive(Resource)]
struct SatellitesSpawned;

fn setup_template(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    // flat panel, authored lying in the XZ plane
    let mesh = meshes.add(Cuboid::new(SATELLITE_SIZE * 3.0, SATELLITE_SIZE * 0.4, SATELLITE_SIZE * 1.2));

    commands.insert_resource(SatelliteTemplate {
        mesh,
        base_color: Srgba::hex("#ffff00").map(Color::from).unwrap_or(Color::WHITE),
    });
}

// waits for both the template and the simulation, order does not matter
fn spawn_satellites(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
    template: Res<SatelliteTemplate>,
    simulation: Res<Simulation>,
) {
    let service = match simulation.service() {
        Ok(service) => service,
        Err(e) => {
            debug!("Not spawning satellites yet: {}", e);
            return;
        }
    };

    let count = service.satellite_count();
    for i in 0..count {
        // each instance owns its material so brightness can differ
        let material = materials.add(StandardMaterial {
            base_color: template.base_color,
            emissive: LinearRgba::BLACK,
            metallic: 0.0,
            perceptual_roughness: 1.0,
            ..default()
        });

        commands.spawn((
            Mesh3d(template.mesh.clone()),
            MeshMaterial3d(material),
            Transform::default(),
            SatelliteIndex(i),
        ));
    }

    info!("Spawned {} satellites", count);
    commands.insert_resource(SatellitesSpawned);
}

/// Recompute every pose from the simulation and the current globe rotation.
pub fn refresh_poses(
    simulation: &Simulation,
    rotation: &GlobeRotation,
    poses: &mut SatellitePoses,
) -> Result<(), GlobeError> {
    let service = simulation.service()?;
    poses.0 = compute_poses(service, rotation);
    Ok(())
}

// one animation tick, starts once the satellites exist
fn tick(
    time: Res<Time>,
    time_state: Res<TimeState>,
    gesture: Res<GestureController>,
    spawned: Option<Res<SatellitesSpawned>>,
    mut simulation: ResMut<Simulation>,
    mut rotation: ResMut<GlobeRotation>,
    mut poses: ResMut<SatellitePoses>,
) {
    if spawned.is_none() {
        return;
    }

    if !gesture.is_dragging() {
        rotation.advance_default();
    }

    match simulation.service_mut() {
        Ok(service) => service.advance(time_state.sim_delta(time.delta_secs_f64())),
        Err(e) => {
            debug!("Skipping tick: {}", e);
            return;
        }
    }

    if let Err(e) = refresh_poses(&simulation, &rotation, &mut poses) {
        debug!("Skipping pose update: {}", e);
    }
}

// write poses out to the meshes
fn apply_poses(
    poses: Res<SatellitePoses>,
    mut satellite_query: Query<(&SatelliteIndex, &mut Transform, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut reported: Local<Option<usize>>,
) {
    let meshes = satellite_query.iter().count();
    if meshes == 0 || poses.is_empty() {
        return;
    }

    // more satellites than instances, the extra ones are skipped
    if poses.len() > meshes && *reported != Some(poses.len()) {
        warn!("{}", GlobeError::IndexMismatch { index: meshes, meshes });
        *reported = Some(poses.len());
    }

    for (index, mut transform, material_handle) in satellite_query.iter_mut() {
        let Some(pose) = poses.get(index.0) else { continue };
        if !pose.is_finite() {
            continue;
        }

        transform.translation = pose.position;
        transform.rotation = pose.rotation;

        if let Some(material) = materials.get_mut(&material_handle.0) {
            material.emissive = emissive(pose.brightness);
        }
    }
}

fn emissive(brightness: f32) -> LinearRgba {
    LinearRgba::new(
        SATELLITE_EMISSIVE.red * brightness,
        SATELLITE_EMISSIVE.green * brightness,
        SATELLITE_EMISSIVE.blue * brightness,
        1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::simulation::{LabelOrbit, OrbitalSimulation, SimulationService};

    #[test]
    fn test_refresh_skips_when_not_ready() {
        let simulation = Simulation::default();
        let mut poses = SatellitePoses(vec![SatellitePose::HIDDEN]);

        let result = refresh_poses(&simulation, &GlobeRotation::default(), &mut poses);
        assert!(matches!(result, Err(GlobeError::NotReady)));
        // previous poses are left alone
        assert_eq!(poses.len(), 1);
    }

    #[test]
    fn test_refresh_fills_poses() {
        let mut sim = OrbitalSimulation::new();
        sim.create_from_label(&LabelOrbit::new("LINK", "https://example.com")).unwrap();
        let simulation = Simulation::ready(sim);

        let mut poses = SatellitePoses::default();
        refresh_poses(&simulation, &GlobeRotation::default(), &mut poses).unwrap();
        assert_eq!(poses.len(), 4);
    }

    #[test]
    fn test_refresh_with_no_satellites() {
        let simulation = Simulation::ready(OrbitalSimulation::new());
        let mut poses = SatellitePoses(vec![SatellitePose::HIDDEN]);

        refresh_poses(&simulation, &GlobeRotation::default(), &mut poses).unwrap();
        assert!(poses.is_empty());
        assert_eq!(simulation.service().unwrap().satellite_count(), 0);
    }

    fn one_label_simulation() -> Simulation {
        let mut sim = OrbitalSimulation::new();
        sim.create_from_label(&LabelOrbit::new("GO", "https://example.com")).unwrap();
        Simulation::ready(sim)
    }

    fn tick_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeState::default())
            .insert_resource(GestureController::default())
            .insert_resource(GlobeRotation::default())
            .insert_resource(SatellitePoses::default())
            .insert_resource(one_label_simulation())
            .add_systems(Update, tick);
        app
    }

    fn render_app(poses: Vec<SatellitePose>) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<Assets<StandardMaterial>>()
            .insert_resource(SatellitePoses(poses))
            .add_systems(Update, apply_poses);
        app
    }

    fn spawn_satellite(app: &mut App, index: usize) -> Entity {
        let material = app
            .world_mut()
            .resource_mut::<Assets<StandardMaterial>>()
            .add(StandardMaterial::default());

        app.world_mut()
            .spawn((Transform::default(), MeshMaterial3d(material), SatelliteIndex(index)))
            .id()
    }

    fn emissive_of(app: &App, entity: Entity) -> LinearRgba {
        let handle = &app.world().get::<MeshMaterial3d<StandardMaterial>>(entity).unwrap().0;
        app.world().resource::<Assets<StandardMaterial>>().get(handle).unwrap().emissive
    }

    #[test]
    fn test_tick_waits_for_spawn() {
        let mut app = tick_app();

        app.update();
        assert!(app.world().resource::<SatellitePoses>().is_empty());
        assert_eq!(app.world().resource::<GlobeRotation>().yaw, 0.0);

        app.insert_resource(SatellitesSpawned);
        app.update();
        assert_eq!(app.world().resource::<SatellitePoses>().len(), 2);
        assert!(app.world().resource::<GlobeRotation>().yaw > 0.0);
    }

    #[test]
    fn test_apply_poses_skips_missing_instances() {
        let first = SatellitePose {
            position: Vec3::new(0.0, 0.0, 7.0),
            rotation: Quat::from_rotation_y(0.5),
            brightness: 2.0,
        };
        let second = SatellitePose { position: Vec3::new(7.0, 0.0, 0.0), ..SatellitePose::HIDDEN };
        let third = SatellitePose {
            position: Vec3::new(1.0, 2.0, 6.0),
            rotation: Quat::from_rotation_x(0.25),
            brightness: 0.5,
        };
        let mut app = render_app(vec![first, second, third]);

        // no instance for satellite 1
        let a = spawn_satellite(&mut app, 0);
        let c = spawn_satellite(&mut app, 2);
        app.update();

        let transform = app.world().get::<Transform>(a).unwrap();
        assert_eq!(transform.translation, first.position);
        assert_eq!(transform.rotation, first.rotation);
        assert_eq!(emissive_of(&app, a), emissive(2.0));

        let transform = app.world().get::<Transform>(c).unwrap();
        assert_eq!(transform.translation, third.position);
        assert_eq!(transform.rotation, third.rotation);
        assert_eq!(emissive_of(&app, c), emissive(0.5));

        // runs again without complaint
        app.update();
        assert_eq!(app.world().get::<Transform>(c).unwrap().translation, third.position);
    }

    #[test]
    fn test_apply_poses_ignores_non_finite() {
        let broken = SatellitePose { position: Vec3::new(f32::NAN, 0.0, 0.0), ..SatellitePose::HIDDEN };
        let mut app = render_app(vec![broken]);
        let entity = spawn_satellite(&mut app, 0);
        app.update();

        assert_eq!(app.world().get::<Transform>(entity).unwrap().translation, Vec3::ZERO);
    }

    #[test]
    fn test_emissive_scales_with_brightness() {
        assert_eq!(emissive(0.0), LinearRgba::new(0.0, 0.0, 0.0, 1.0));
        let full = emissive(2.0);
        assert_eq!(full.red, SATELLITE_EMISSIVE.red * 2.0);
        assert_eq!(full.blue, SATELLITE_EMISSIVE.blue * 2.0);
    }
}
