use serde::Serialize;

use crate::membership::tier::MembershipTier;

/// A purchasable membership plan as shown on the pricing page.
#[derive(Debug, Clone, Serialize)]
pub struct TierPlan {
    pub name: MembershipTier,
    pub monthly_price: u32,
    pub yearly_price: u32,
    pub features: Vec<&'static str>,
    pub popular: bool,
}

/// The fixed plan catalog, ordered from the lowest tier to the highest.
pub fn tier_catalog() -> Vec<TierPlan> {
    vec![
        TierPlan {
            name: MembershipTier::Free,
            monthly_price: 0,
            yearly_price: 0,
            features: vec![
                "Daily coaching tips",
                "Browse course catalog (preview only)",
                "Limited community access (read-only)",
                "Full podcast access (ALL episodes free!)",
                "Industry news feed",
            ],
            popular: false,
        },
        TierPlan {
            name: MembershipTier::Bronze,
            monthly_price: 29,
            yearly_price: 290,
            features: vec![
                "Everything in Free, plus:",
                "Access to Bronze-tier courses",
                "Full community participation",
                "Downloadable resources",
            ],
            popular: false,
        },
        TierPlan {
            name: MembershipTier::Silver,
            monthly_price: 79,
            yearly_price: 790,
            features: vec![
                "Everything in Bronze, plus:",
                "Access to ALL courses (Bronze + Silver tier)",
                "Weekly live coaching sessions",
                "Priority community support",
                "Exclusive templates & scripts",
            ],
            popular: true,
        },
        TierPlan {
            name: MembershipTier::Gold,
            monthly_price: 149,
            yearly_price: 1490,
            features: vec![
                "Everything in Silver, plus:",
                "VIP access to ALL premium content",
                "Monthly 1-on-1 coaching session",
                "Advanced marketing resources",
                "Early access to new content",
                "Exclusive Gold member events",
            ],
            popular: false,
        },
    ]
}
