//! Grade AOV parameters.
//!
//! [`GradeAovParams`] is an immutable snapshot of everything the grade and
//! the merge need. It mirrors the knobs of a standard Grade node plus the
//! AOV merge controls (mix, mask, view, unpremult).
//!
//! Vector parameters carry four components for parity with RGBA knobs, but
//! only RGB feeds the grading math.
//!
//! # Example
//!
//! ```rust
//! use aovgrade_ops::GradeAovParams;
//!
//! let params = GradeAovParams::from_yaml_str("gain: [2, 2, 2, 1]\nmix: 0.5\n").unwrap();
//! assert_eq!(params.gain, [2.0, 2.0, 2.0, 1.0]);
//! assert_eq!(params.whitepoint, [1.0; 4]);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::OpsResult;

/// Grade and merge parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeAovParams {
    /// Input value mapped to output 0.
    pub blackpoint: [f32; 4],
    /// Input value mapped to output 1.
    pub whitepoint: [f32; 4],
    /// Output black level.
    pub lift: [f32; 4],
    /// Output white level.
    pub gain: [f32; 4],
    /// Overall slope multiplier.
    pub multiply: [f32; 4],
    /// Additive offset after the linear stage.
    pub offset: [f32; 4],
    /// Gamma exponent.
    pub gamma: [f32; 4],

    /// Black clamp toggle.
    pub black_clamp: bool,
    /// White clamp toggle.
    pub white_clamp: bool,
    /// Output the graded AOV on its own instead of merging it.
    #[serde(alias = "view_aov")]
    pub viewaov: bool,
    /// Apply the inverse grade.
    pub reverse: bool,
    /// Grade in the unpremultiplied domain.
    pub unpremult: bool,
    /// Blend strength between the original and graded AOV.
    pub mix: f32,
    /// Read the mask alpha.
    #[serde(alias = "useMask")]
    pub use_mask: bool,
}

impl GradeAovParams {
    /// Parse parameters from a YAML document. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> OpsResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read parameters from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> OpsResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> OpsResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check whether the grade itself is a no-op.
    ///
    /// The merge still runs for identity grades: output alpha always comes
    /// from the beauty pass.
    pub fn is_identity(&self) -> bool {
        let rgb_eq = |v: &[f32; 4], x: f32| v[..3].iter().all(|&c| c == x);
        rgb_eq(&self.blackpoint, 0.0)
            && rgb_eq(&self.whitepoint, 1.0)
            && rgb_eq(&self.lift, 0.0)
            && rgb_eq(&self.gain, 1.0)
            && rgb_eq(&self.multiply, 1.0)
            && rgb_eq(&self.offset, 0.0)
            && rgb_eq(&self.gamma, 1.0)
            && !self.black_clamp
            && !self.white_clamp
    }
}

impl Default for GradeAovParams {
    fn default() -> Self {
        Self {
            blackpoint: [0.0; 4],
            whitepoint: [1.0; 4],
            lift: [0.0; 4],
            gain: [1.0; 4],
            multiply: [1.0; 4],
            offset: [0.0; 4],
            gamma: [1.0; 4],
            black_clamp: false,
            white_clamp: false,
            viewaov: false,
            reverse: false,
            unpremult: false,
            mix: 1.0,
            use_mask: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_identity() {
        let p = GradeAovParams::default();
        assert!(p.is_identity());
        assert_eq!(p.mix, 1.0);
        assert!(!p.use_mask);
    }

    #[test]
    fn alpha_components_do_not_break_identity() {
        let mut p = GradeAovParams::default();
        p.gain[3] = 5.0;
        p.gamma[3] = 0.0;
        assert!(p.is_identity());

        p.gain[1] = 1.5;
        assert!(!p.is_identity());
    }

    #[test]
    fn clamps_break_identity() {
        let p = GradeAovParams { white_clamp: true, ..Default::default() };
        assert!(!p.is_identity());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let p = GradeAovParams::from_yaml_str("gamma: [2.2, 2.2, 2.2, 1.0]\nreverse: true\n").unwrap();
        assert_eq!(p.gamma, [2.2, 2.2, 2.2, 1.0]);
        assert!(p.reverse);
        assert_eq!(p.gain, [1.0; 4]);
        assert_eq!(p.mix, 1.0);
    }

    #[test]
    fn yaml_aliases() {
        let p = GradeAovParams::from_yaml_str("useMask: true\nview_aov: true\n").unwrap();
        assert!(p.use_mask);
        assert!(p.viewaov);
    }

    #[test]
    fn yaml_roundtrip() {
        let p = GradeAovParams {
            lift: [0.1, 0.0, -0.1, 0.0],
            mix: 0.25,
            unpremult: true,
            ..Default::default()
        };
        let yaml = p.to_yaml().unwrap();
        assert_eq!(GradeAovParams::from_yaml_str(&yaml).unwrap(), p);
    }

    #[test]
    fn bad_yaml_is_config_error() {
        let err = GradeAovParams::from_yaml_str("gain: not-a-list\n").unwrap_err();
        assert!(matches!(err, crate::OpsError::Config(_)));
    }

    #[test]
    fn yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grade.yaml");
        std::fs::write(&path, "mix: 0.5\n").unwrap();
        let p = GradeAovParams::from_yaml_file(&path).unwrap();
        assert_eq!(p.mix, 0.5);

        let missing = GradeAovParams::from_yaml_file(dir.path().join("nope.yaml"));
        assert!(matches!(missing, Err(crate::OpsError::Io(_))));
    }
}
