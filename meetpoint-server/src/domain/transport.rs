//! Transport modes understood by the isochrone providers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// How travelers move. Every traveler in a scenario shares one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Walking,
    Cycling,
    #[default]
    Driving,
}

impl TransportMode {
    pub const ALL: [TransportMode; 3] = [
        TransportMode::Walking,
        TransportMode::Cycling,
        TransportMode::Driving,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Walking => "walking",
            TransportMode::Cycling => "cycling",
            TransportMode::Driving => "driving",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        TransportMode::ALL
            .into_iter()
            .find(|m| m.as_str() == lowered)
            .ok_or_else(|| DomainError::UnknownTransportMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Walking".parse::<TransportMode>(), Ok(TransportMode::Walking));
        assert_eq!(" cycling ".parse::<TransportMode>(), Ok(TransportMode::Cycling));
        assert!("teleport".parse::<TransportMode>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&TransportMode::Driving).unwrap(),
            "\"driving\""
        );
        let mode: TransportMode = serde_json::from_str("\"walking\"").unwrap();
        assert_eq!(mode, TransportMode::Walking);
    }

    #[test]
    fn default_is_driving() {
        assert_eq!(TransportMode::default(), TransportMode::Driving);
    }
}
