//! Marching configuration and construction-time validation.

use demarch_core::ParamSet;
use thiserror::Error;

/// Construction-time contract violations.
///
/// These never surface from `intersect` or `generate_ray`; the `create_*`
/// factories log them and substitute defaults instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("\"{name}\" must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("\"{name}\" must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },

    #[error("\"{name}\" must be at least 1, got {value}")]
    ZeroCount { name: &'static str, value: i64 },

    #[error("camera grid {grid_x}x{grid_y} does not fit a {width}x{height} film")]
    CameraGrid {
        grid_x: u32,
        grid_y: u32,
        width: u32,
        height: u32,
    },

    #[error("field of view must lie in (0, 180) degrees, got {0}")]
    FieldOfView(f32),
}

pub(crate) fn require_positive(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

pub(crate) fn require_finite(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

/// Read a strictly positive float, logging and substituting `default` when it is not.
pub(crate) fn positive_param(params: &ParamSet, name: &'static str, default: f32) -> f32 {
    let value = params.find_one_float(name, default);
    require_positive(name, value).unwrap_or_else(|e| {
        log::warn!("{}; using {}", e, default);
        default
    })
}

/// Read an int that must be at least 1, logging and substituting `default` when it is not.
pub(crate) fn count_param(params: &ParamSet, name: &'static str, default: u32) -> u32 {
    let value = params.find_one_int(name, default as i32);
    if value >= 1 {
        value as u32
    } else {
        log::warn!(
            "{}; using {}",
            ConfigError::ZeroCount { name, value: value as i64 },
            default
        );
        default
    }
}

/// Parameters of the sphere-marching loop, carried alongside each surface.
///
/// All four values are strictly positive; the constructors enforce it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchConfig {
    max_iterations: u32,
    hit_epsilon: f32,
    ray_offset_multiplier: f32,
    normal_epsilon: f32,
}

impl MarchConfig {
    pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;
    pub const DEFAULT_RAY_OFFSET_MULTIPLIER: f32 = 10.0;

    pub fn new(
        max_iterations: u32,
        hit_epsilon: f32,
        ray_offset_multiplier: f32,
        normal_epsilon: f32,
    ) -> Result<Self, ConfigError> {
        if max_iterations == 0 {
            return Err(ConfigError::ZeroCount {
                name: "maxiters",
                value: 0,
            });
        }
        Ok(Self {
            max_iterations,
            hit_epsilon: require_positive("hitEpsilon", hit_epsilon)?,
            ray_offset_multiplier: require_positive("rayEpsilonMultiplier", ray_offset_multiplier)?,
            normal_epsilon: require_positive("normalEpsilon", normal_epsilon)?,
        })
    }

    /// Default iteration budget and offset multiplier, with `epsilon` used for
    /// both the hit and the normal tolerance.
    pub fn with_epsilon(epsilon: f32) -> Result<Self, ConfigError> {
        Self::new(
            Self::DEFAULT_MAX_ITERATIONS,
            epsilon,
            Self::DEFAULT_RAY_OFFSET_MULTIPLIER,
            epsilon,
        )
    }

    /// Read `maxiters`, `hitEpsilon`, `rayEpsilonMultiplier` and `normalEpsilon`.
    ///
    /// `default_epsilon` is the per-surface default for both tolerances and
    /// must itself be positive. Invalid values are logged and replaced.
    pub fn from_params(params: &ParamSet, default_epsilon: f32) -> Self {
        Self {
            max_iterations: count_param(params, "maxiters", Self::DEFAULT_MAX_ITERATIONS),
            hit_epsilon: positive_param(params, "hitEpsilon", default_epsilon),
            ray_offset_multiplier: positive_param(
                params,
                "rayEpsilonMultiplier",
                Self::DEFAULT_RAY_OFFSET_MULTIPLIER,
            ),
            normal_epsilon: positive_param(params, "normalEpsilon", default_epsilon),
        }
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn hit_epsilon(&self) -> f32 {
        self.hit_epsilon
    }

    pub fn ray_offset_multiplier(&self) -> f32 {
        self.ray_offset_multiplier
    }

    pub fn normal_epsilon(&self) -> f32 {
        self.normal_epsilon
    }

    /// Per-axis error bound reported for every hit point.
    pub fn error_bound(&self) -> f32 {
        self.ray_offset_multiplier * self.hit_epsilon
    }
}

impl Default for MarchConfig {
    fn default() -> Self {
        Self {
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            hit_epsilon: 1e-2,
            ray_offset_multiplier: Self::DEFAULT_RAY_OFFSET_MULTIPLIER,
            normal_epsilon: 1e-2,
        }
    }
}
