use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Measure model families supported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelType {
    #[serde(rename = "QI-Core v4.1.1")]
    QiCore411,
    #[serde(rename = "QDM v5.6")]
    Qdm56,
}

impl ModelType {
    pub const ALL: [ModelType; 2] = [Self::QiCore411, Self::Qdm56];

    /// Model key as stored on the measure.
    pub fn key(&self) -> &'static str {
        match self {
            Self::QiCore411 => "QI-Core v4.1.1",
            Self::Qdm56 => "QDM v5.6",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ModelType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|model| model.key() == s.trim())
            .ok_or_else(|| CoreError::unsupported_model(s))
    }
}
