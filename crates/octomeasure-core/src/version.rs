//! Semantic measure versions and the draft/final lifecycle.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// `major.minor.patch` version of a measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Next version for the given increment; lower components reset to zero.
    ///
    /// Returns `None` when the bumped component is already at `u32::MAX`.
    #[must_use]
    pub fn increment(self, increment: VersionIncrement) -> Option<Self> {
        match increment {
            VersionIncrement::Major => Some(Self::new(self.major.checked_add(1)?, 0, 0)),
            VersionIncrement::Minor => Some(Self::new(self.major, self.minor.checked_add(1)?, 0)),
            VersionIncrement::Patch => {
                Some(Self::new(self.major, self.minor, self.patch.checked_add(1)?))
            }
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        let [major, minor, patch] = parts.as_slice() else {
            return Err(CoreError::invalid_version(s));
        };
        let parse = |part: &str| part.parse::<u32>().map_err(|_| CoreError::invalid_version(s));
        Ok(Self::new(parse(major)?, parse(minor)?, parse(patch)?))
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Which component of the version a versioning request bumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VersionIncrement {
    Major,
    Minor,
    Patch,
}

impl VersionIncrement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "MAJOR",
            Self::Minor => "MINOR",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for VersionIncrement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionIncrement {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MAJOR" => Ok(Self::Major),
            "MINOR" => Ok(Self::Minor),
            "PATCH" => Ok(Self::Patch),
            _ => Err(CoreError::invalid_version_increment(s)),
        }
    }
}

/// Lifecycle state of a measure's current version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Draft,
    Final,
}

impl LifecycleState {
    pub fn from_draft_flag(draft: bool) -> Self {
        if draft { Self::Draft } else { Self::Final }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Final => write!(f, "final"),
        }
    }
}
