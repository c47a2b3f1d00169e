//! # aovgrade-ops
//!
//! Grade an AOV pass the way a Grade node would, then merge it back into
//! the beauty pass.
//!
//! The beauty and AOV are premultiplied, so the AOV's contribution can be
//! swapped additively: `beauty - aov + graded(aov)`. A mask alpha and a mix
//! amount blend between the original and graded AOV, and the grade can be
//! run forward or as its exact inverse.
//!
//! # Modules
//!
//! - [`params`] - Parameter snapshot, YAML loading
//! - [`linear_stage`] - Slope/offset compilation
//! - [`gamma_curve`] - Piecewise forward/reverse gamma
//! - [`grade`] - Grade transform and clamp policy
//! - [`compositor`] - Premultiply handling, mask/mix blend, beauty merge
//! - [`processor`] - Frame-level dispatch
//!
//! # Example
//!
//! ```rust
//! use aovgrade_ops::{GradeAovParams, PixelProcessor};
//!
//! let processor = PixelProcessor::new(GradeAovParams {
//!     gain: [2.0; 4],
//!     ..Default::default()
//! });
//!
//! let beauty = [0.5, 0.5, 0.5, 1.0];
//! let aov = [0.2, 0.2, 0.2, 1.0];
//! let out = processor.process_pixel(beauty, aov, None);
//! assert!((out[0] - 0.7).abs() < 1e-6);
//! assert_eq!(out[3], 1.0);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod compositor;
pub mod gamma_curve;
pub mod grade;
pub mod linear_stage;
pub mod params;
pub mod processor;

pub use compositor::PixelCompositor;
pub use error::{OpsError, OpsResult};
pub use grade::{ClampFlags, GradeDirection, GradeTransform};
pub use linear_stage::LinearStage;
pub use params::GradeAovParams;
pub use processor::{Frame, PixelProcessor};
