// THEORY:
// Proximity is graded into three concentric zones around the virtual object. The
// object has a nominal radius and each zone extends a fixed margin beyond it:
//
//     distance <  radius + danger_margin    -> DANGER
//     distance <  radius + warning_margin   -> WARNING
//     otherwise                             -> SAFE
//
// The comparisons are strict, so a hand sitting exactly on a zone edge belongs to the
// calmer zone. With no hand in view the state is always SAFE.

use crate::core_modules::contour::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The alert level shown on the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum ProximityState {
    #[default]
    Safe,
    Warning,
    Danger,
}

impl ProximityState {
    /// The banner text for this state.
    pub const fn label(self) -> &'static str {
        match self {
            ProximityState::Safe => "SAFE",
            ProximityState::Warning => "WARNING",
            ProximityState::Danger => "DANGER",
        }
    }
}

impl fmt::Display for ProximityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Zone geometry around the virtual object, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityZones {
    /// Radius of the virtual object itself.
    pub object_radius: i32,
    /// How far beyond the object the DANGER zone reaches.
    pub danger_margin: i32,
    /// How far beyond the object the WARNING zone reaches.
    pub warning_margin: i32,
}

impl Default for ProximityZones {
    fn default() -> Self {
        Self {
            object_radius: 60,
            danger_margin: 60,
            warning_margin: 200,
        }
    }
}

impl ProximityZones {
    /// Grades a hand-to-object distance.
    pub fn classify(&self, distance: f64) -> ProximityState {
        if distance < (self.object_radius + self.danger_margin) as f64 {
            ProximityState::Danger
        } else if distance < (self.object_radius + self.warning_margin) as f64 {
            ProximityState::Warning
        } else {
            ProximityState::Safe
        }
    }
}

/// Euclidean distance between two pixel positions.
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    (dx * dx + dy * dy).sqrt()
}
