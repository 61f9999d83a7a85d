use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Membership level. Variant order is the authorization order:
/// `Free < Bronze < Silver < Gold`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MembershipTier {
    #[default]
    Free,
    Bronze,
    Silver,
    Gold,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown membership tier '{0}' (expected free, bronze, silver or gold)")]
pub struct UnknownTier(pub String);

impl MembershipTier {
    pub const ALL: [MembershipTier; 4] = [
        MembershipTier::Free,
        MembershipTier::Bronze,
        MembershipTier::Silver,
        MembershipTier::Gold,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MembershipTier::Free => "free",
            MembershipTier::Bronze => "bronze",
            MembershipTier::Silver => "silver",
            MembershipTier::Gold => "gold",
        }
    }

    pub fn can_access(self, required: MembershipTier) -> bool {
        can_access(self, required)
    }
}

/// Access is granted iff the user's tier is at least the resource's tier.
pub fn can_access(user_tier: MembershipTier, resource_tier: MembershipTier) -> bool {
    user_tier >= resource_tier
}

impl fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipTier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(MembershipTier::Free),
            "bronze" => Ok(MembershipTier::Bronze),
            "silver" => Ok(MembershipTier::Silver),
            "gold" => Ok(MembershipTier::Gold),
            other => Err(UnknownTier(other.to_string())),
        }
    }
}
