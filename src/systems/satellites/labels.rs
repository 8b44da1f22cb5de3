use std::collections::HashMap;

use bevy::prelude::*;
use bevy::render::camera::Camera;
use bevy::window::{PrimaryWindow, Window};

use super::SatellitePoses;
use crate::systems::simulation::Simulation;

// full ui screen container component
#[derive(Component)]
pub struct LabelContainer;

// caption floating next to a label's satellite
#[derive(Component)]
pub struct LabelCaption {
    pub label_index: usize,
}

// setup UI overlay
pub fn setup_labels(mut commands: Commands) {
    // create UI container covering entire screen
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(Color::NONE),
        LabelContainer,
    ));
}

pub fn update_labels(
    mut commands: Commands,
    simulation: Res<Simulation>,
    poses: Res<SatellitePoses>,
    camera: Query<(&Camera, &Transform), With<Camera3d>>,
    mut captions: Query<(Entity, &mut Node, &mut Visibility, &LabelCaption)>,
    container: Query<Entity, With<LabelContainer>>,
    window: Query<&Window, With<PrimaryWindow>>,
) {
    let (Ok(window), Ok((camera, cam_transform)), Ok(container)) =
        (window.single(), camera.single(), container.single()) else { return; };
    let Ok(service) = simulation.service() else { return; };

    // map existing captions by label
    let existing: HashMap<usize, Entity> = captions.iter()
        .map(|(entity, _, _, caption)| (caption.label_index, entity))
        .collect();

    for label in 0..service.label_start_indices().len() {
        let Some(pose) = service
            .representative_satellite(label)
            .and_then(|satellite| poses.get(satellite)) else { continue };

        // dark satellites get no caption
        let screen_pos = if pose.brightness > 0.0 {
            world_to_screen(pose.position, camera, cam_transform, window.width(), window.height())
        } else {
            None
        };

        if let Some(&entity) = existing.get(&label) {
            // update existing caption
            if let Ok((_, mut node, mut visibility, _)) = captions.get_mut(entity) {
                match screen_pos {
                    Some(pos) => {
                        *visibility = Visibility::Inherited;
                        node.left = Val::Px(pos.x);
                        node.top = Val::Px(pos.y);
                    }
                    None => *visibility = Visibility::Hidden,
                }
            }
        } else if let Some(pos) = screen_pos {
            let Some(text) = service.label_text(label) else { continue };

            commands.entity(container).with_children(|parent| {
                parent.spawn((
                    Text::new(text),
                    TextFont { font_size: 12.0, ..default() },
                    TextColor(Color::WHITE),
                    Node {
                        position_type: PositionType::Absolute,
                        left: Val::Px(pos.x),
                        top: Val::Px(pos.y),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)), // textbox background
                    LabelCaption { label_index: label },
                ));
            });
        }
    }
}

// UTILS

// convert world coordinates to screen coordinates
fn world_to_screen(
    world_pos: Vec3,
    camera: &Camera,
    camera_transform: &Transform,
    screen_width: f32,
    screen_height: f32,
) -> Option<Vec2> {
    let view_matrix = camera_transform.compute_matrix().inverse();
    let view_projection = camera.clip_from_view() * view_matrix;

    project(view_projection, world_pos, screen_width, screen_height)
}

fn project(view_projection: Mat4, world_pos: Vec3, screen_width: f32, screen_height: f32) -> Option<Vec2> {
    // transform to clip space
    let clip_pos = view_projection * world_pos.extend(1.0);

    if clip_pos.w <= 0.0 { return None; } // behind camera

    // convert to NDC and check bounds
    let ndc = clip_pos.xyz() / clip_pos.w;
    if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 { return None; } // offscreen

    // NDC to screen coordinates
    Some(Vec2::new(
        (ndc.x + 1.0) * 0.5 * screen_width,
        (1.0 - ndc.y) * 0.5 * screen_height, // Y is flipped
    ))
}
