//! Holder for the reference color and the two tuning parameters.

use crate::types::{Parameters, ReferenceColor, SENSITIVITY_RANGE, SMOOTHING_RANGE};

/// Current reference color and tuning parameters.
///
/// Every setter is a plain assignment (clamped to the slider range) and
/// returns the new snapshot, which the UI displays and the scheduler
/// later captures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParameterStore {
    color: ReferenceColor,
    parameters: Parameters,
}

impl ParameterStore {
    /// Set the sensitivity, clamped to [`SENSITIVITY_RANGE`].
    pub fn set_sensitivity(&mut self, value: u32) -> Parameters {
        let (min, max) = (*SENSITIVITY_RANGE.start(), *SENSITIVITY_RANGE.end());
        self.parameters.sensitivity = value.clamp(min, max);
        self.parameters
    }

    /// Set the smoothing, clamped to [`SMOOTHING_RANGE`].
    pub fn set_smoothing(&mut self, value: u32) -> Parameters {
        let (min, max) = (*SMOOTHING_RANGE.start(), *SMOOTHING_RANGE.end());
        self.parameters.smoothing = value.clamp(min, max);
        self.parameters
    }

    /// Replace the reference color.
    pub const fn set_color(&mut self, color: ReferenceColor) -> ReferenceColor {
        self.color = color;
        color
    }

    /// The current reference color.
    #[must_use]
    pub const fn color(&self) -> ReferenceColor {
        self.color
    }

    /// The current parameters.
    #[must_use]
    pub const fn parameters(&self) -> Parameters {
        self.parameters
    }

    /// Restore the default color and parameters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
