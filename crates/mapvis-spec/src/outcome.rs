//! Per-job outcomes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Result of one render job (or of loading a fixture).
///
/// Outcomes are created once and never mutated; the reporting sink consumes
/// them in enumeration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Difference within the backend threshold.
    Pass {
        diff: u64,
        #[serde(with = "duration_secs")]
        elapsed: Duration,
    },
    /// Difference above the backend threshold.
    Fail {
        diff: u64,
        #[serde(with = "duration_secs")]
        elapsed: Duration,
    },
    /// No reference artifact exists yet.
    ReferenceMissing,
    /// The fixture's style failed to load; none of its jobs ran.
    LoadError { message: String },
    /// Rendering or comparing this job failed.
    RenderError { message: String },
}

/// Outcome discriminant, used for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Pass,
    Fail,
    ReferenceMissing,
    LoadError,
    RenderError,
}

impl Outcome {
    /// Classifies a comparison result against a threshold.
    pub fn from_diff(diff: u64, threshold: u64, elapsed: Duration) -> Self {
        if diff > threshold {
            Outcome::Fail { diff, elapsed }
        } else {
            Outcome::Pass { diff, elapsed }
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Pass { .. } => OutcomeKind::Pass,
            Outcome::Fail { .. } => OutcomeKind::Fail,
            Outcome::ReferenceMissing => OutcomeKind::ReferenceMissing,
            Outcome::LoadError { .. } => OutcomeKind::LoadError,
            Outcome::RenderError { .. } => OutcomeKind::RenderError,
        }
    }

    /// Difference metric, if a comparison took place.
    pub fn diff(&self) -> Option<u64> {
        match self {
            Outcome::Pass { diff, .. } | Outcome::Fail { diff, .. } => Some(*diff),
            _ => None,
        }
    }

    /// Render time, if a comparison took place.
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            Outcome::Pass { elapsed, .. } | Outcome::Fail { elapsed, .. } => Some(*elapsed),
            _ => None,
        }
    }

    /// Whether this outcome fails the run regardless of reporting policy.
    ///
    /// A missing reference is not a hard failure; whether it fails the run
    /// depends on whether baselines are generated.
    pub fn is_hard_failure(&self) -> bool {
        matches!(
            self,
            Outcome::Fail { .. } | Outcome::LoadError { .. } | Outcome::RenderError { .. }
        )
    }
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Pass => "pass",
            OutcomeKind::Fail => "fail",
            OutcomeKind::ReferenceMissing => "reference_missing",
            OutcomeKind::LoadError => "load_error",
            OutcomeKind::RenderError => "render_error",
        }
    }
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Serializes a [`Duration`] as fractional seconds.
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(serde::de::Error::custom("duration must be a non-negative number"));
        }
        Ok(Duration::from_secs_f64(secs))
    }
}
