//! Operator-facing datacenter codes and their configuration-store paths.

use std::fmt;
use std::str::FromStr;

use crate::error::GatewayError;

/// Closed enumeration of datacenter codes this gateway can target.
///
/// Each code maps to a fixed configuration-store path holding that
/// datacenter's database credentials. The mapping is defined at deploy
/// time; unknown codes are rejected before any network access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datacenter {
    /// Campinas 01.
    Tece01,
    /// São Paulo 02.
    Tesp02,
    /// São Paulo 03.
    Tesp03,
    /// São Paulo 05.
    Tesp05,
    /// São Paulo 06.
    Tesp06,
    /// São Paulo 07.
    Tesp07,
}

impl Datacenter {
    /// All known datacenters, in display order.
    pub const ALL: [Self; 6] = [
        Self::Tece01,
        Self::Tesp02,
        Self::Tesp03,
        Self::Tesp05,
        Self::Tesp06,
        Self::Tesp07,
    ];

    /// Returns the operator-facing code (e.g. `"TECE01"`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Tece01 => "TECE01",
            Self::Tesp02 => "TESP02",
            Self::Tesp03 => "TESP03",
            Self::Tesp05 => "TESP05",
            Self::Tesp06 => "TESP06",
            Self::Tesp07 => "TESP07",
        }
    }

    /// Returns the configuration-store path holding this datacenter's
    /// database credentials. Doubles as the pool-registry cache key.
    #[must_use]
    pub const fn config_path(self) -> &'static str {
        match self {
            Self::Tece01 => "/nemesis-api/env-tece1",
            Self::Tesp02 => "/nemesis-api/env-tesp2",
            Self::Tesp03 => "/nemesis-api/env-tesp3",
            Self::Tesp05 => "/nemesis-api/env-tesp5",
            Self::Tesp06 => "/nemesis-api/env-tesp6",
            Self::Tesp07 => "/nemesis-api/env-tesp7",
        }
    }
}

impl fmt::Display for Datacenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Datacenter {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|dc| dc.code() == s)
            .ok_or_else(|| GatewayError::InvalidRequest(format!("unknown datacenter: {s}")))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn every_code_round_trips() {
        for dc in Datacenter::ALL {
            let Ok(parsed) = dc.code().parse::<Datacenter>() else {
                panic!("known code failed to parse: {dc}");
            };
            assert_eq!(parsed, dc);
        }
    }

    #[test]
    fn paths_match_deploy_mapping() {
        assert_eq!(Datacenter::Tece01.config_path(), "/nemesis-api/env-tece1");
        assert_eq!(Datacenter::Tesp07.config_path(), "/nemesis-api/env-tesp7");
    }

    #[test]
    fn unknown_codes_are_rejected() {
        for bad in ["", "TESP99", "tece01", "TECE01 "] {
            let result = bad.parse::<Datacenter>();
            assert!(
                matches!(result, Err(GatewayError::InvalidRequest(_))),
                "expected rejection for {bad:?}"
            );
        }
    }
}
