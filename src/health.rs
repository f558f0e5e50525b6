//! Wound and death states.
//!
//! Remaining hit points are compared against the wound threshold. A
//! wounded character loses half of ref, dex, int and will; a dying one
//! loses two thirds of every attribute.

use serde::{Deserialize, Serialize};

/// Health state driving the attribute override pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    #[default]
    Normal,
    Wounded,
    Dead,
}

impl HealthState {
    /// Classify remaining hit points against the wound threshold.
    ///
    /// Death wins over wounding. Being exactly at the threshold is not
    /// wounded, and a threshold of zero or less never wounds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sheetstat::HealthState;
    ///
    /// assert_eq!(HealthState::evaluate(0, 7), HealthState::Dead);
    /// assert_eq!(HealthState::evaluate(6, 7), HealthState::Wounded);
    /// assert_eq!(HealthState::evaluate(7, 7), HealthState::Normal);
    /// ```
    pub fn evaluate(hp_value: i32, wound_threshold: i32) -> HealthState {
        let state = if hp_value <= 0 {
            HealthState::Dead
        } else if hp_value < wound_threshold && wound_threshold > 0 {
            HealthState::Wounded
        } else {
            HealthState::Normal
        };

        if state != HealthState::Normal {
            tracing::debug!(hp_value, wound_threshold, ?state, "health override");
        }
        state
    }

    pub fn is_dead(self) -> bool {
        self == HealthState::Dead
    }

    pub fn is_wounded(self) -> bool {
        self == HealthState::Wounded
    }
}
