use std::str::FromStr;

use garde::Validate;
use serde::{Deserialize, Serialize};

/// Star rating on the platform scale, 1 to 5 inclusive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Validate, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[garde(transparent)]
pub struct Stars(#[garde(range(min = 1, max = 5))] i64);

impl Stars {
    pub fn new(value: i64) -> Result<Self, garde::Report> {
        let stars = Stars(value);
        stars.validate()?;
        Ok(stars)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl FromStr for Stars {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s.parse()?;
        let stars = Stars(value);
        stars.validate()?;
        Ok(stars)
    }
}

impl std::fmt::Display for Stars {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of entity that can be rated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Developer,
    Showcase,
    Video,
}

impl FromStr for SubjectKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "developer" => Ok(SubjectKind::Developer),
            "showcase" => Ok(SubjectKind::Showcase),
            "video" => Ok(SubjectKind::Video),
            other => Err(anyhow::anyhow!("Unknown subject kind: {other}")),
        }
    }
}

impl std::fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectKind::Developer => write!(f, "developer"),
            SubjectKind::Showcase => write!(f, "showcase"),
            SubjectKind::Video => write!(f, "video"),
        }
    }
}
