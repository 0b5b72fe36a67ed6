//! Layout parameters.

use serde::{Deserialize, Serialize};

/// Flow direction of the layered layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutDirection {
    /// Ranks stack downwards. The only direction the canvas offers.
    #[default]
    #[serde(rename = "TB")]
    TopToBottom,
    /// Ranks stack rightwards.
    #[serde(rename = "LR")]
    LeftToRight,
}

/// Spacing constants and fallbacks for unmeasured nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Gap between neighbouring nodes in the same rank.
    pub node_separation: f64,
    /// Gap between consecutive ranks.
    pub rank_separation: f64,
    pub default_width: f64,
    pub default_height: f64,
    /// Extra vertical offset applied below the trigger in top-to-bottom layouts.
    pub trigger_gap: f64,
    /// Upper bound on barycenter sweep rounds.
    pub max_sweeps: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            node_separation: 50.0,
            rank_separation: 80.0,
            default_width: 256.0,
            default_height: 96.0,
            trigger_gap: 50.0,
            max_sweeps: 8,
        }
    }
}
