use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access-control roles recognised by the ledger.
///
/// `Admin` is the root role: only its holders may grant or revoke roles,
/// `Admin` included. `Excluded` is not a privilege but a marker that exempts
/// the holder's transfers from tax.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Pauser,
    Minter,
    Governor,
    President,
    Excluded,
    Miner,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRoleError(pub String);

impl Role {
    /// Every role, in declaration order. The deployer receives all of them.
    pub const ALL: [Role; 7] = [
        Role::Admin,
        Role::Pauser,
        Role::Minter,
        Role::Governor,
        Role::President,
        Role::Excluded,
        Role::Miner,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Pauser => "PAUSER",
            Role::Minter => "MINTER",
            Role::Governor => "GOVERNOR",
            Role::President => "PRESIDENT",
            Role::Excluded => "EXCLUDED",
            Role::Miner => "MINER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRoleError;

    /// Accepts the canonical name case-insensitively, with or without a
    /// trailing `_ROLE` (`minter`, `MINTER_ROLE`). `DEFAULT_ADMIN` maps to
    /// `Admin`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let name = upper.strip_suffix("_ROLE").unwrap_or(&upper);
        let name = name.strip_prefix("DEFAULT_").unwrap_or(name);
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == name)
            .ok_or_else(|| UnknownRoleError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_role_aliases() {
        assert_eq!("minter".parse::<Role>().unwrap(), Role::Minter);
        assert_eq!("EXCLUDED_ROLE".parse::<Role>().unwrap(), Role::Excluded);
        assert_eq!("DEFAULT_ADMIN_ROLE".parse::<Role>().unwrap(), Role::Admin);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn display_matches_parse() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }
}
