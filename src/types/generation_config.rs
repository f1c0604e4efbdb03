use serde::{Deserialize, Serialize};

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default nucleus-sampling threshold.
pub const DEFAULT_TOP_P: f32 = 0.95;

/// Default number of candidate tokens considered per sampling step.
pub const DEFAULT_TOP_K: i32 = 40;

/// Sampling parameters sent with every request of a session.
///
/// The documented ranges are temperature and top_p in `[0, 1]` and top_k in
/// `[1, 100]`.  They are not enforced here; the API decides what it accepts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature.
    pub temperature: f32,

    /// Nucleus-sampling threshold.
    pub top_p: f32,

    /// Number of highest-probability tokens considered.
    pub top_k: i32,
}

impl GenerationConfig {
    /// Create a generation config from explicit values.
    pub fn new(temperature: f32, top_p: f32, top_k: i32) -> Self {
        Self {
            temperature,
            top_p,
            top_k,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPERATURE, DEFAULT_TOP_P, DEFAULT_TOP_K)
    }
}
