use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Serialize, Deserialize, Debug, PartialEq, PartialOrd)]
#[serde(rename_all = "lowercase")]
pub enum Tolerance {
    Ppm(f32),
    Da(f32),
}

impl Tolerance {
    /// Absolute confidence (in Da) for a measurement of `mass`. Ppm
    /// tolerances are applied to the observed mass, not the discrepancy
    pub fn confidence(&self, mass: f32) -> f32 {
        match self {
            Tolerance::Ppm(ppm) => Tolerance::ppm_to_delta_mass(mass, *ppm).abs(),
            Tolerance::Da(da) => da.abs(),
        }
    }

    pub fn ppm_to_delta_mass(center: f32, ppm: f32) -> f32 {
        ppm * center / 1_000_000.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::Da(1.0)
    }
}

/// Inclusive acceptance window `[target - confidence, target + confidence]`
///
/// Comparisons are exact; no epsilon is applied, so a confidence of zero
/// only accepts masses that compare equal to the target
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Window {
    pub lo: f32,
    pub hi: f32,
}

impl Window {
    pub fn new(target: f32, confidence: f32) -> Self {
        Window {
            lo: target - confidence,
            hi: target + confidence,
        }
    }

    pub fn contains(&self, mass: f32) -> bool {
        mass >= self.lo && mass <= self.hi
    }
}
