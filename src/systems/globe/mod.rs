use bevy::prelude::*;

pub mod rotation;

pub use rotation::GlobeRotation;

use crate::systems::GlobeSet;
use crate::config::{CAMERA_DISTANCE, CAMERA_FOV_DEGREES, EARTH_DIFFUSE_TEXTURE, GLOBE_RADIUS};

pub struct GlobePlugin;

impl Plugin for GlobePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GlobeRotation::default())
            .insert_resource(AmbientLight {
                color: Color::srgb_u8(0x40, 0x40, 0x40),
                brightness: 400.0,
                ..default()
            })
            .add_systems(Startup, start)
            .add_systems(Update, rotate.in_set(GlobeSet::Render));
    }
}

// globe tag
#[derive(Component)]
pub struct Globe;

// scene setup here
fn start(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
) {
    let diffuse_texture = asset_server.load(EARTH_DIFFUSE_TEXTURE);

    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(GLOBE_RADIUS).mesh().uv(32, 32))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color_texture: Some(diffuse_texture),
            metallic: 0.0,
            perceptual_roughness: 0.8,
            ..default()
        })),
        Transform::default(),
        Globe,
    ));

    // sun light
    commands.spawn((
        DirectionalLight {
            illuminance: 1_500.,
            ..default()
        },
        Transform::from_xyz(5.0, 3.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // fixed camera, looking down -Z at the globe
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            ..default()
        }),
        Transform::from_xyz(0.0, 0.0, CAMERA_DISTANCE).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

// globe mesh follows the rotation state
fn rotate(rotation: Res<GlobeRotation>, mut globe_query: Query<&mut Transform, With<Globe>>) {
    if let Ok(mut transform) = globe_query.single_mut() {
        transform.rotation = rotation.quat();
    }
}
