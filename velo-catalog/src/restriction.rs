use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::attribute::{FrameType, RimColor, Wheels};

/// How wheels missing from `wheelsToFrameType` treat a chosen frame type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnlistedWheels {
    /// No listed frame types, so no frame type fits.
    #[default]
    FitNoFrame,
    /// No restriction applies.
    FitAnyFrame,
}

/// Cross-attribute exclusions, keyed by the selected wheels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestrictionTable {
    /// Frame types each wheel option fits.
    #[serde(default)]
    pub wheels_to_frame_type: BTreeMap<Wheels, BTreeSet<FrameType>>,

    #[serde(default)]
    pub unlisted_wheels: UnlistedWheels,

    /// Rim colors that cannot be ordered with each wheel option.
    #[serde(default)]
    pub unavailable_rim_color: BTreeMap<Wheels, BTreeSet<RimColor>>,
}

impl RestrictionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_frame_types(
        mut self,
        wheels: Wheels,
        frame_types: impl IntoIterator<Item = FrameType>,
    ) -> Self {
        self.wheels_to_frame_type
            .entry(wheels)
            .or_default()
            .extend(frame_types);
        self
    }

    pub fn forbid_rim_colors(
        mut self,
        wheels: Wheels,
        rim_colors: impl IntoIterator<Item = RimColor>,
    ) -> Self {
        self.unavailable_rim_color
            .entry(wheels)
            .or_default()
            .extend(rim_colors);
        self
    }

    pub fn with_unlisted_wheels(mut self, policy: UnlistedWheels) -> Self {
        self.unlisted_wheels = policy;
        self
    }

    /// `None` when the wheels have no `wheelsToFrameType` entry.
    pub fn compatible_frame_types(&self, wheels: Wheels) -> Option<&BTreeSet<FrameType>> {
        self.wheels_to_frame_type.get(&wheels)
    }

    pub fn is_frame_type_compatible(&self, wheels: Wheels, frame_type: FrameType) -> bool {
        match self.compatible_frame_types(wheels) {
            Some(allowed) => allowed.contains(&frame_type),
            None => self.unlisted_wheels == UnlistedWheels::FitAnyFrame,
        }
    }

    pub fn is_rim_color_unavailable(&self, wheels: Wheels, rim_color: RimColor) -> bool {
        self.unavailable_rim_color
            .get(&wheels)
            .is_some_and(|forbidden| forbidden.contains(&rim_color))
    }
}
