use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::config::{HIT_RADIUS_WORLD, HOT_ZONE_NDC};
use crate::error::GlobeError;
use crate::systems::GlobeSet;
use crate::systems::satellites::SatellitePoses;
use crate::systems::simulation::{Simulation, SimulationService};
use crate::systems::simulation::groups::validate_url;

pub struct LinkPlugin;

impl Plugin for LinkPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PointerClick>()
            .add_event::<LinkActivated>()
            .add_systems(Update, (handle_clicks, follow_links).chain().after(GlobeSet::Input));
    }
}

// a press and release short and still enough to count as a click
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PointerClick {
    pub position: Vec2,
}

// a click landed on a label, the host should go there
#[derive(Event, Debug, Clone, PartialEq)]
pub struct LinkActivated {
    pub url: String,
}

/// Pixel rectangle of the render surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn from_window(window: &Window) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: window.width(),
            height: window.height(),
        }
    }

    /// pixel position to normalized device coordinates, y up
    pub fn to_ndc(&self, position: Vec2) -> Option<Vec2> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }

        Some(Vec2::new(
            (position.x - self.left) / self.width * 2.0 - 1.0,
            -((position.y - self.top) / self.height) * 2.0 + 1.0,
        ))
    }
}

pub fn in_hot_zone(ndc: Vec2) -> bool {
    ndc.x.abs() < HOT_ZONE_NDC && ndc.y.abs() < HOT_ZONE_NDC
}

// label's satellite is in front of the globe and near the middle
fn within_hit_radius(position: Vec3) -> bool {
    position.z > 0.0 && position.x.abs() < HIT_RADIUS_WORLD && position.y.abs() < HIT_RADIUS_WORLD
}

/// Works out which link a click at `ndc` goes to, if any.
///
/// When several labels qualify at once the one nearest the viewer wins, so a
/// single click only ever navigates once.
pub fn resolve_click(
    ndc: Vec2,
    service: &dyn SimulationService,
    poses: &SatellitePoses,
) -> Result<Option<String>, GlobeError> {
    if !in_hot_zone(ndc) {
        return Ok(None);
    }

    let labels = service.label_start_indices();

    let frontmost = (0..labels.len())
        .filter_map(|label| {
            let satellite = service.representative_satellite(label)?;
            let pose = poses.get(satellite)?;
            within_hit_radius(pose.position).then_some((label, pose.position.z))
        })
        .max_by(|a, b| a.1.total_cmp(&b.1));

    let Some((label, _)) = frontmost else {
        return Ok(None);
    };

    match service.link_for_label(label) {
        Some(url) => Ok(Some(validate_url(&url)?.to_string())),
        None => Ok(None),
    }
}

fn handle_clicks(
    mut clicks: EventReader<PointerClick>,
    window: Query<&Window, With<PrimaryWindow>>,
    simulation: Res<Simulation>,
    poses: Res<SatellitePoses>,
    mut links: EventWriter<LinkActivated>,
) {
    let Ok(window) = window.single() else { return; };
    let viewport = Viewport::from_window(window);

    for click in clicks.read() {
        let Some(ndc) = viewport.to_ndc(click.position) else { continue };

        let service = match simulation.service() {
            Ok(service) => service,
            Err(e) => {
                debug!("Ignoring click: {}", e);
                continue;
            }
        };

        match resolve_click(ndc, service, &poses) {
            Ok(Some(url)) => {
                links.write(LinkActivated { url });
            }
            Ok(None) => {}
            Err(e) => warn!("Click resolved to a bad link: {}", e),
        }
    }
}

fn follow_links(mut links: EventReader<LinkActivated>) {
    for link in links.read() {
        info!("Navigating to {}", link.url);
        if let Err(e) = open_url(&link.url) {
            error!("Failed to open {}: {}", link.url, e);
        }
    }
}

// full page navigation in the browser
#[cfg(target_arch = "wasm32")]
fn open_url(url: &str) -> Result<(), GlobeError> {
    let window = web_sys::window().ok_or_else(|| GlobeError::Navigation("no browser window".into()))?;
    window
        .location()
        .set_href(url)
        .map_err(|e| GlobeError::Navigation(format!("{e:?}")))
}

// hand it to the desktop's default browser
#[cfg(not(target_arch = "wasm32"))]
fn open_url(url: &str) -> Result<(), GlobeError> {
    let child = opener_command(url)
        .spawn()
        .map_err(|e| GlobeError::Navigation(format!("could not start browser: {e}")))?;

    reap(child);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn opener_command(url: &str) -> std::process::Command {
    use std::process::Command;

    let mut command = if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else if cfg!(target_os = "macos") {
        Command::new("open")
    } else {
        Command::new("xdg-open")
    };

    command.arg(url);
    command
}

// wait on the opener off the main thread so it does not linger as a zombie
#[cfg(not(target_arch = "wasm32"))]
fn reap(mut child: std::process::Child) -> std::thread::JoinHandle<std::io::Result<std::process::ExitStatus>> {
    std::thread::spawn(move || {
        let status = child.wait();
        if let Ok(status) = &status {
            if !status.success() {
                warn!("Browser opener exited with {}", status);
            }
        }
        status
    })
}
