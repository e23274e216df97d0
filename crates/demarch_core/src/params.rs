//! Typed, named parameter lookups with defaults.
//!
//! Values are JSON-shaped (a number, a list of numbers, a bool or a string),
//! so a `ParamSet` deserializes straight from a JSON object. Every lookup
//! marks its name as consumed; [`ParamSet::report_unused`] then warns about
//! parameters that nothing asked for, which catches typos in scene files.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from strict parameter lookups and parsing.
#[derive(Error, Debug)]
pub enum ParamError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parameter \"{name}\" has the wrong type: expected {expected}")]
    TypeMismatch { name: String, expected: &'static str },

    #[error("{found} values supplied for \"{name}\". Expected {expected}.")]
    Count {
        name: String,
        expected: usize,
        found: usize,
    },
}

pub type ParamResult<T> = Result<T, ParamError>;

/// One parameter value as it appears in a scene description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Numbers(Vec<f64>),
    Text(String),
}

impl ParamValue {
    fn numbers(&self) -> Option<Vec<f64>> {
        match self {
            ParamValue::Number(x) => Some(vec![*x]),
            ParamValue::Numbers(xs) => Some(xs.clone()),
            _ => None,
        }
    }
}

/// Named scene parameters for one shape or camera.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet {
    values: BTreeMap<String, ParamValue>,
    #[serde(skip)]
    looked_up: RefCell<BTreeSet<String>>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object such as `{"radius": 2, "camerasperdim": [2, 2]}`.
    pub fn from_json(json: &str) -> ParamResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        self.values.insert(name.into(), value);
    }

    pub fn with_float(mut self, name: impl Into<String>, value: f32) -> Self {
        self.insert(name, ParamValue::Number(value as f64));
        self
    }

    pub fn with_floats(mut self, name: impl Into<String>, values: &[f32]) -> Self {
        let values = values.iter().map(|&v| v as f64).collect();
        self.insert(name, ParamValue::Numbers(values));
        self
    }

    pub fn with_int(mut self, name: impl Into<String>, value: i32) -> Self {
        self.insert(name, ParamValue::Number(value as f64));
        self
    }

    pub fn with_ints(mut self, name: impl Into<String>, values: &[i32]) -> Self {
        let values = values.iter().map(|&v| v as f64).collect();
        self.insert(name, ParamValue::Numbers(values));
        self
    }

    pub fn with_bool(mut self, name: impl Into<String>, value: bool) -> Self {
        self.insert(name, ParamValue::Bool(value));
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    fn lookup(&self, name: &str) -> Option<&ParamValue> {
        let value = self.values.get(name)?;
        self.looked_up.borrow_mut().insert(name.to_string());
        Some(value)
    }

    /// All values of a numeric parameter, or `None` if absent.
    pub fn floats(&self, name: &str) -> ParamResult<Option<Vec<f32>>> {
        let Some(value) = self.lookup(name) else {
            return Ok(None);
        };
        let numbers = value.numbers().ok_or_else(|| ParamError::TypeMismatch {
            name: name.to_string(),
            expected: "number",
        })?;
        Ok(Some(numbers.into_iter().map(|x| x as f32).collect()))
    }

    /// All values of an integer parameter, or `None` if absent.
    pub fn ints(&self, name: &str) -> ParamResult<Option<Vec<i32>>> {
        let Some(value) = self.lookup(name) else {
            return Ok(None);
        };
        let mismatch = || ParamError::TypeMismatch {
            name: name.to_string(),
            expected: "integer",
        };
        let numbers = value.numbers().ok_or_else(mismatch)?;
        let ints = numbers
            .into_iter()
            .map(|x| {
                if x.fract() == 0.0 && x >= i32::MIN as f64 && x <= i32::MAX as f64 {
                    Ok(x as i32)
                } else {
                    Err(mismatch())
                }
            })
            .collect::<ParamResult<Vec<i32>>>()?;
        Ok(Some(ints))
    }

    /// A single numeric value, or `None` if absent.
    pub fn float(&self, name: &str) -> ParamResult<Option<f32>> {
        self.floats(name)?.map(|values| single(name, values)).transpose()
    }

    /// A single integer value, or `None` if absent.
    pub fn int(&self, name: &str) -> ParamResult<Option<i32>> {
        self.ints(name)?.map(|values| single(name, values)).transpose()
    }

    /// A boolean value, or `None` if absent.
    pub fn bool(&self, name: &str) -> ParamResult<Option<bool>> {
        match self.lookup(name) {
            None => Ok(None),
            Some(ParamValue::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(ParamError::TypeMismatch {
                name: name.to_string(),
                expected: "bool",
            }),
        }
    }

    /// Single float with a default; malformed values are reported and replaced by the default.
    pub fn find_one_float(&self, name: &str, default: f32) -> f32 {
        or_default(self.float(name), default)
    }

    /// Single int with a default; malformed values are reported and replaced by the default.
    pub fn find_one_int(&self, name: &str, default: i32) -> i32 {
        or_default(self.int(name), default)
    }

    pub fn find_one_bool(&self, name: &str, default: bool) -> bool {
        or_default(self.bool(name), default)
    }

    /// Every value of a float array parameter; `None` when absent or malformed.
    pub fn find_floats(&self, name: &str) -> Option<Vec<f32>> {
        self.floats(name).unwrap_or_else(|e| {
            log::error!("{}", e);
            None
        })
    }

    /// Every value of an int array parameter; `None` when absent or malformed.
    pub fn find_ints(&self, name: &str) -> Option<Vec<i32>> {
        self.ints(name).unwrap_or_else(|e| {
            log::error!("{}", e);
            None
        })
    }

    /// Names of parameters no lookup has consumed, each logged as a warning.
    pub fn report_unused(&self) -> Vec<String> {
        let looked_up = self.looked_up.borrow();
        let unused: Vec<String> = self
            .values
            .keys()
            .filter(|name| !looked_up.contains(*name))
            .cloned()
            .collect();
        for name in &unused {
            log::warn!("Parameter \"{}\" not used", name);
        }
        unused
    }
}

fn single<T: Copy>(name: &str, values: Vec<T>) -> ParamResult<T> {
    match values.as_slice() {
        [value] => Ok(*value),
        _ => Err(ParamError::Count {
            name: name.to_string(),
            expected: 1,
            found: values.len(),
        }),
    }
}

fn or_default<T>(result: ParamResult<Option<T>>, default: T) -> T {
    match result {
        Ok(value) => value.unwrap_or(default),
        Err(e) => {
            log::warn!("{}; using default", e);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_defaults_when_absent() {
        let params = ParamSet::new();

        assert_eq!(params.find_one_float("radius", 1.0), 1.0);
        assert_eq!(params.find_one_int("maxiters", 1000), 1000);
        assert!(params.find_one_bool("flip", true));
        assert_eq!(params.find_floats("cameragridbounds"), None);
    }

    #[test]
    fn test_typed_lookups() {
        let params = ParamSet::new()
            .with_float("hitEpsilon", 1e-4)
            .with_int("mandelbulbPower", 8)
            .with_ints("camerasperdim", &[4, 2])
            .with_floats("screenwindow", &[-1.0, 1.0, -0.5, 0.5]);

        assert_eq!(params.find_one_float("hitEpsilon", 1e-2), 1e-4);
        assert_eq!(params.find_one_int("mandelbulbPower", 2), 8);
        assert_eq!(params.find_ints("camerasperdim"), Some(vec![4, 2]));
        assert_eq!(
            params.find_floats("screenwindow"),
            Some(vec![-1.0, 1.0, -0.5, 0.5])
        );
    }

    #[test]
    fn test_integer_param_reads_as_float() {
        let params = ParamSet::new().with_int("radius", 3);
        assert_eq!(params.find_one_float("radius", 1.0), 3.0);
    }

    #[test]
    fn test_fractional_int_falls_back_to_default() {
        init_logging();
        let params = ParamSet::new().with_float("maxiters", 2.5);

        assert!(matches!(params.int("maxiters"), Err(ParamError::TypeMismatch { .. })));
        assert_eq!(params.find_one_int("maxiters", 1000), 1000);
    }

    #[test]
    fn test_wrong_count_falls_back_to_default() {
        init_logging();
        let params = ParamSet::new().with_floats("radius", &[1.0, 2.0]);

        match params.float("radius") {
            Err(ParamError::Count { expected, found, .. }) => {
                assert_eq!(expected, 1);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(params.find_one_float("radius", 1.0), 1.0);
    }

    #[test]
    fn test_from_json() {
        let params = ParamSet::from_json(
            r#"{"radius": 2.5, "maxiters": 200, "camerasperdim": [3, 3], "flip": true}"#,
        )
        .unwrap();

        assert_eq!(params.len(), 4);
        assert_eq!(params.find_one_float("radius", 1.0), 2.5);
        assert_eq!(params.find_one_int("maxiters", 1000), 200);
        assert_eq!(params.find_ints("camerasperdim"), Some(vec![3, 3]));
        assert!(params.find_one_bool("flip", false));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(matches!(ParamSet::from_json("[1, 2]"), Err(ParamError::Json(_))));
    }

    #[test]
    fn test_report_unused() {
        init_logging();
        let params = ParamSet::new()
            .with_float("radius", 2.0)
            .with_float("raduis", 3.0);

        params.find_one_float("radius", 1.0);
        assert_eq!(params.report_unused(), vec!["raduis".to_string()]);
    }
}
