//! Automation actions for an external view-sync relay
//!
//! The document keeps an ordered list of [`Action`]s. Writing them to the
//! relay's configuration file is left to the caller; the types here only
//! define the serialized shape (`name`, `action`, `constraints`).

use crate::error::{KmlError, Result};
use crate::render::fmt_num;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A two-element numeric range, serialized as `"[min, max]"`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub min: f64,
    pub max: f64,
}

impl Constraint {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl From<[f64; 2]> for Constraint {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", fmt_num(self.min), fmt_num(self.max))
    }
}

impl FromStr for Constraint {
    type Err = KmlError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || KmlError::InvalidValue(format!("constraint must look like [min, max], got {s:?}"));
        let inner = s
            .trim()
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(invalid)?;
        let (min, max) = inner.split_once(',').ok_or_else(invalid)?;
        let parse = |v: &str| v.trim().parse::<f64>().map_err(|_| invalid());
        Ok(Self::new(parse(min)?, parse(max)?))
    }
}

impl Serialize for Constraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Constraint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// One named relay action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    /// Command run when every constraint holds
    #[serde(rename = "action")]
    pub command: String,
    pub constraints: BTreeMap<String, Constraint>,
}

impl Action {
    #[must_use]
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            constraints: BTreeMap::new(),
        }
    }

    /// Builder form for adding a constraint on one viewer parameter
    #[must_use]
    pub fn with_constraint(mut self, key: impl Into<String>, range: impl Into<Constraint>) -> Self {
        self.constraints.insert(key.into(), range.into());
        self
    }
}

/// Top-level shape of the relay configuration: `{ actions: [...] }`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActionList<'a> {
    pub actions: &'a [Action],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::band;

    #[test]
    fn test_constraint_format() {
        assert_eq!(Constraint::from(band(100.0, 20.0)).to_string(), "[80, 120]");
        assert_eq!(Constraint::new(-1.5, 2.25).to_string(), "[-1.5, 2.25]");
    }

    #[test]
    fn test_constraint_parse() {
        let c: Constraint = "[ -3, 4.5 ]".parse().unwrap();
        assert_eq!(c, Constraint::new(-3.0, 4.5));
        assert!("3, 4".parse::<Constraint>().is_err());
        assert!("[3]".parse::<Constraint>().is_err());
    }

    #[test]
    fn test_action_serializes_command_as_action() {
        let action = Action::new("zoom", "echo hi").with_constraint("latitude", [10.0, 20.0]);
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["action"], "echo hi");
        assert_eq!(json["constraints"]["latitude"], "[10, 20]");
    }
}
