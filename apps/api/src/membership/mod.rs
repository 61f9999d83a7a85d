pub mod catalog;
pub mod handlers;
pub mod tier;

pub use catalog::{tier_catalog, TierPlan};
pub use tier::{can_access, MembershipTier};
