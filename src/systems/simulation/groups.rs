use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;
use url::Url;

use crate::config::{DEFAULT_ORBIT_RADIUS, DEFAULT_ORBIT_RATE, DEFAULT_SPIN_RATE};
use crate::error::GlobeError;

// one orbiting word that links somewhere
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LabelOrbit {
    pub label: String,
    pub url: String,

    // starting angle along the orbit, radians
    #[serde(default)]
    pub phase: f32,
    #[serde(default = "default_radius")]
    pub radius: f32,
    // tilt of the orbital plane about X, radians
    #[serde(default)]
    pub inclination: f32,
    // radians per second
    #[serde(default = "default_rate")]
    pub angular_rate: f32,
    #[serde(default = "default_spin")]
    pub spin_rate: f32,
}

fn default_radius() -> f32 { DEFAULT_ORBIT_RADIUS }
fn default_rate() -> f32 { DEFAULT_ORBIT_RATE }
fn default_spin() -> f32 { DEFAULT_SPIN_RATE }

impl LabelOrbit {
    pub fn new(label: &str, url: &str) -> Self {
        Self {
            label: label.to_string(),
            url: url.to_string(),
            phase: 0.0,
            radius: DEFAULT_ORBIT_RADIUS,
            inclination: 0.0,
            angular_rate: DEFAULT_ORBIT_RATE,
            spin_rate: DEFAULT_SPIN_RATE,
        }
    }

    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_inclination(mut self, inclination: f32) -> Self {
        self.inclination = inclination;
        self
    }

    pub fn with_rate(mut self, angular_rate: f32) -> Self {
        self.angular_rate = angular_rate;
        self
    }

    /// checks the group can actually be put on an orbit
    pub fn validate(&self) -> Result<(), GlobeError> {
        if self.label.trim().is_empty() {
            return Err(GlobeError::Config("label has no visible characters".into()));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(GlobeError::Config(format!("orbit radius {} is not positive", self.radius)));
        }
        validate_url(&self.url)?;
        Ok(())
    }
}

// only plain web links are followed
pub fn validate_url(raw: &str) -> Result<Url, GlobeError> {
    let url = Url::parse(raw).map_err(|e| GlobeError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(GlobeError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {scheme:?}"),
        }),
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LinkConfig {
    pub groups: Vec<LabelOrbit>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        use std::f32::consts::TAU;

        Self {
            groups: vec![
                LabelOrbit::new("ABOUT", "https://example.com/about"),
                LabelOrbit::new("PROJECTS", "https://example.com/projects")
                    .with_phase(TAU / 3.0)
                    .with_radius(7.5)
                    .with_inclination(0.3)
                    .with_rate(0.03),
                LabelOrbit::new("CONTACT", "https://example.com/contact")
                    .with_phase(2.0 * TAU / 3.0)
                    .with_radius(8.0)
                    .with_inclination(-0.4)
                    .with_rate(0.07),
            ],
        }
    }
}

impl LinkConfig {
    pub fn parse(contents: &str) -> Result<Self, GlobeError> {
        let config: LinkConfig = serde_json::from_str(contents)?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GlobeError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    // missing or broken config still gives a usable globe
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                info!("Loaded {} label groups from {:?}", config.groups.len(), path);
                config
            }
            Err(e) => {
                warn!("Failed to load link config {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }
}
