use std::fmt;

use serde::Serialize;

use super::ModelError;

/// One of the three hazard-curve parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    /// Initial effective average.
    Mu0,
    /// Asymptotic effective average.
    Mu1,
    /// Transition timescale `L`, in runs.
    Length,
}

impl Parameter {
    pub const ALL: [Parameter; 3] = [Parameter::Mu0, Parameter::Mu1, Parameter::Length];
    pub const COUNT: usize = Self::ALL.len();

    pub fn name(self) -> &'static str {
        match self {
            Parameter::Mu0 => "mu0",
            Parameter::Mu1 => "mu1",
            Parameter::Length => "L",
        }
    }

    fn index(self) -> usize {
        match self {
            Parameter::Mu0 => 0,
            Parameter::Mu1 => 1,
            Parameter::Length => 2,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strictly positive, finite `(mu0, mu1, L)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HazardParams {
    mu0: f64,
    mu1: f64,
    #[serde(rename = "L")]
    length: f64,
}

impl HazardParams {
    pub fn new(mu0: f64, mu1: f64, length: f64) -> Result<Self, ModelError> {
        for (param, value) in Parameter::ALL.into_iter().zip([mu0, mu1, length]) {
            check_positive(param, value)?;
        }
        Ok(Self { mu0, mu1, length })
    }

    pub fn from_array(values: [f64; 3]) -> Result<Self, ModelError> {
        Self::new(values[0], values[1], values[2])
    }

    pub fn mu0(&self) -> f64 {
        self.mu0
    }

    pub fn mu1(&self) -> f64 {
        self.mu1
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn get(&self, param: Parameter) -> f64 {
        self.as_array()[param.index()]
    }

    /// Copy with one parameter replaced.
    pub fn with(&self, param: Parameter, value: f64) -> Result<Self, ModelError> {
        check_positive(param, value)?;
        let mut values = self.as_array();
        values[param.index()] = value;
        Ok(Self {
            mu0: values[0],
            mu1: values[1],
            length: values[2],
        })
    }

    /// Swap `mu0` and `mu1` if `mu0 > mu1`.
    pub fn ordered(self) -> Self {
        if self.mu0 > self.mu1 {
            Self {
                mu0: self.mu1,
                mu1: self.mu0,
                length: self.length,
            }
        } else {
            self
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.mu0, self.mu1, self.length]
    }
}

fn check_positive(param: Parameter, value: f64) -> Result<(), ModelError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidParameter {
            name: param.name(),
            value,
        })
    }
}

impl fmt::Display for HazardParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.mu0, self.mu1, self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_values() {
        assert!(HazardParams::new(0.0, 10.0, 1.0).is_err());
        assert!(HazardParams::new(10.0, -1.0, 1.0).is_err());
        assert!(HazardParams::new(10.0, 10.0, f64::NAN).is_err());
        assert!(HazardParams::new(10.0, 10.0, f64::INFINITY).is_err());

        match HazardParams::new(10.0, 10.0, 0.0).unwrap_err() {
            ModelError::InvalidParameter { name, .. } => assert_eq!(name, "L"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn with_replaces_one_parameter() {
        let params = HazardParams::new(5.0, 30.0, 12.0).unwrap();
        let moved = params.with(Parameter::Mu1, 40.0).unwrap();
        assert_eq!(moved.as_array(), [5.0, 40.0, 12.0]);
        assert_eq!(moved.get(Parameter::Mu1), 40.0);
        assert!(params.with(Parameter::Length, -2.0).is_err());
    }

    #[test]
    fn ordered_swaps_abilities_only() {
        let params = HazardParams::new(40.0, 10.0, 3.0).unwrap().ordered();
        assert_eq!(params.as_array(), [10.0, 40.0, 3.0]);
        let already = HazardParams::new(10.0, 40.0, 3.0).unwrap();
        assert_eq!(already.ordered(), already);
    }

    #[test]
    fn display_is_space_separated() {
        let params = HazardParams::new(12.5, 40.0, 7.0).unwrap();
        assert_eq!(params.to_string(), "12.5 40 7");
    }
}
