//! Sample type for measured records.
//!
//! A [`Sample`] is one fixed-shape record: four ordered `f32` measurements,
//! an optional true label assigned at data-collection time, and an optional
//! label assigned by running the classification rule.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One measured record, with or without a known label.
///
/// A sample with a true label is "known" and may be placed in a training
/// or testing subset; a sample without one is "unknown" and exists only to
/// be classified.
///
/// # Example
///
/// ```
/// use vecino::sample::Sample;
///
/// let mut query = Sample::unknown([5.1, 3.4, 1.4, 0.3]);
/// assert!(!query.is_known());
///
/// query.classify("setosa");
/// assert_eq!(query.assigned_label(), Some("setosa"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Ordered measurement vector
    measurements: [f32; 4],
    /// Ground-truth category, present for known samples
    true_label: Option<String>,
    /// Category produced by classification, set only via [`Sample::classify`]
    assigned_label: Option<String>,
}

impl Sample {
    /// Creates a known (labeled) sample.
    #[must_use]
    pub fn known(measurements: [f32; 4], label: impl Into<String>) -> Self {
        Self {
            measurements,
            true_label: Some(label.into()),
            assigned_label: None,
        }
    }

    /// Creates an unknown (unlabeled) sample to be classified.
    #[must_use]
    pub fn unknown(measurements: [f32; 4]) -> Self {
        Self {
            measurements,
            true_label: None,
            assigned_label: None,
        }
    }

    /// Returns the ordered measurement vector.
    #[must_use]
    pub fn measurements(&self) -> [f32; 4] {
        self.measurements
    }

    /// Returns the ground-truth label, if this sample is known.
    #[must_use]
    pub fn true_label(&self) -> Option<&str> {
        self.true_label.as_deref()
    }

    /// Returns the label assigned by classification, if any.
    #[must_use]
    pub fn assigned_label(&self) -> Option<&str> {
        self.assigned_label.as_deref()
    }

    /// Returns true if this sample carries a ground-truth label.
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.true_label.is_some()
    }

    /// Assigns a classification to this sample.
    ///
    /// Repeated calls overwrite the previous assignment. The true label is
    /// never touched.
    pub fn classify(&mut self, label: impl Into<String>) {
        self.assigned_label = Some(label.into());
    }

    /// Returns true iff the assigned label equals the true label.
    ///
    /// An unknown sample never matches: without a ground truth there is
    /// nothing to agree with, so this returns `false` rather than being an
    /// invalid call.
    #[must_use]
    pub fn matches(&self) -> bool {
        match (&self.assigned_label, &self.true_label) {
            (Some(assigned), Some(truth)) => assigned == truth,
            _ => false,
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_known() {
            "KnownSample"
        } else {
            "UnknownSample"
        };
        let [m1, m2, m3, m4] = self.measurements;
        write!(f, "{kind}([{m1}, {m2}, {m3}, {m4}]")?;
        if let Some(label) = &self.true_label {
            write!(f, ", label={label:?}")?;
        }
        if let Some(assigned) = &self.assigned_label {
            write!(f, ", assigned={assigned:?}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sample() {
        let sample = Sample::known([5.0, 3.5, 1.3, 0.3], "setosa");
        assert!(sample.is_known());
        assert_eq!(sample.true_label(), Some("setosa"));
        assert_eq!(sample.assigned_label(), None);
    }

    #[test]
    fn test_unknown_sample() {
        let sample = Sample::unknown([5.0, 3.5, 1.3, 0.3]);
        assert!(!sample.is_known());
        assert_eq!(sample.true_label(), None);
    }

    #[test]
    fn test_classify_overwrites() {
        let mut sample = Sample::known([5.0, 3.5, 1.3, 0.3], "setosa");
        sample.classify("versicolor");
        assert_eq!(sample.assigned_label(), Some("versicolor"));
        sample.classify("setosa");
        assert_eq!(sample.assigned_label(), Some("setosa"));
    }

    #[test]
    fn test_classify_never_touches_true_label() {
        let mut sample = Sample::known([5.0, 3.5, 1.3, 0.3], "setosa");
        sample.classify("virginica");
        assert_eq!(sample.true_label(), Some("setosa"));
    }

    #[test]
    fn test_matches_agreement() {
        let mut sample = Sample::known([5.0, 3.5, 1.3, 0.3], "setosa");
        assert!(!sample.matches());
        sample.classify("setosa");
        assert!(sample.matches());
        sample.classify("versicolor");
        assert!(!sample.matches());
    }

    #[test]
    fn test_unknown_sample_never_matches() {
        let mut sample = Sample::unknown([5.0, 3.5, 1.3, 0.3]);
        assert!(!sample.matches());
        sample.classify("setosa");
        assert!(!sample.matches());
    }

    #[test]
    fn test_display_known_vs_unknown() {
        let known = Sample::known([5.0, 3.5, 1.3, 0.3], "setosa");
        let rendered = known.to_string();
        assert!(rendered.starts_with("KnownSample("));
        assert!(rendered.contains("\"setosa\""));
        assert!(!rendered.contains("assigned"));

        let mut unknown = Sample::unknown([5.0, 3.5, 1.3, 0.3]);
        assert!(unknown.to_string().starts_with("UnknownSample("));
        unknown.classify("setosa");
        assert!(unknown.to_string().contains("assigned=\"setosa\""));
    }
}
