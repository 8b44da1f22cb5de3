use bevy::prelude::*;

use crate::error::GlobeError;

// below this the tangent is numerically meaningless
const DEGENERATE_EPSILON: f32 = 1e-6;

/// Orthonormal basis a satellite faces along before the globe is rotated.
///
/// `radial` points away from the globe centre, `tangential` runs along the
/// circle of latitude through the satellite and `normal = radial × tangential`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalFrame {
    pub tangential: Vec3,
    pub normal: Vec3,
    pub radial: Vec3,
}

impl OrbitalFrame {
    /// Strict construction, fails when `p` sits on (or very near) the polar axis.
    pub fn try_new(p: Vec3) -> Result<Self, GlobeError> {
        let radial = p.try_normalize().ok_or(GlobeError::DegenerateGeometry)?;

        let tangent = Vec3::new(-p.y, p.x, 0.0);
        if tangent.length() < DEGENERATE_EPSILON {
            return Err(GlobeError::DegenerateGeometry);
        }

        Ok(Self::from_axes(radial, tangent.normalize()))
    }

    /// Never fails, polar positions get an arbitrary tangent and the origin
    /// gets a +Z radial axis.
    pub fn from_position(p: Vec3) -> Self {
        match Self::try_new(p) {
            Ok(frame) => frame,
            Err(_) => {
                let radial = p.try_normalize().unwrap_or(Vec3::Z);
                Self::from_axes(radial, radial.any_orthonormal_vector())
            }
        }
    }

    fn from_axes(radial: Vec3, tangential: Vec3) -> Self {
        Self {
            tangential,
            normal: radial.cross(tangential),
            radial,
        }
    }

    // columns in (tangential, normal, radial) order
    pub fn to_mat3(&self) -> Mat3 {
        Mat3::from_cols(self.tangential, self.normal, self.radial)
    }

    pub fn to_quat(&self) -> Quat {
        Quat::from_mat3(&self.to_mat3()).normalize()
    }
}
