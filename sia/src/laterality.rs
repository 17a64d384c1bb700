use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::measurement::normalize_axis;

/// Which eye a case was measured on.
///
/// Left-eye axes are mirrored about the vertical meridian so that both eyes
/// share the right-eye (temporal = 0°) orientation.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Eye {
    #[default]
    #[strum(to_string = "RE", serialize = "right", serialize = "OD")]
    #[serde(alias = "RE", alias = "right", alias = "OD")]
    Right,
    #[strum(to_string = "LE", serialize = "left", serialize = "OS")]
    #[serde(alias = "LE", alias = "left", alias = "OS")]
    Left,
}

impl Eye {
    /// Maps an axis measured on this eye into right-eye orientation.
    #[inline]
    pub fn orient(self, axis_deg: f64) -> f64 {
        match self {
            Eye::Right => normalize_axis(axis_deg),
            Eye::Left => normalize_axis(180.0 - axis_deg),
        }
    }
}
