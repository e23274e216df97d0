//! Demarch Core - scene-description parameters for shape and camera plugins.
//!
//! The host renderer parses its scene file into a [`ParamSet`] per shape or
//! camera and hands it over once, at construction. Plugins read typed values
//! with defaults; nothing is consulted after construction.
//!
//! # Example
//!
//! ```
//! use demarch_core::ParamSet;
//!
//! let params = ParamSet::new().with_float("radius", 2.0).with_int("maxiters", 500);
//! assert_eq!(params.find_one_float("radius", 1.0), 2.0);
//! assert_eq!(params.find_one_int("maxiters", 1000), 500);
//! assert_eq!(params.find_one_float("hitEpsilon", 1e-2), 1e-2);
//! ```

pub mod params;

pub use params::{ParamError, ParamResult, ParamSet, ParamValue};
