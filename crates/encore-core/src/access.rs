//! Role-based feature gating.
//!
//! Gating here only decides what a caller is shown. Data access itself is
//! enforced by the row store and identity service.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// AccessLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// No signed-in profile.
    Anonymous,
    Base,
    Premium,
    Enterprise,
    Admin,
}

impl AccessLevel {
    /// Level for a profile role. `subscriber` and `base` share the bottom
    /// tier, and anything unrecognised falls back to it as well.
    pub fn from_role(role: &str) -> AccessLevel {
        match role {
            "premium" => AccessLevel::Premium,
            "enterprise" => AccessLevel::Enterprise,
            "admin" => AccessLevel::Admin,
            _ => AccessLevel::Base,
        }
    }

    /// Numeric rank: base 0, premium 1, enterprise 2, admin 3.
    /// Anonymous sits below every role at -1.
    pub fn rank(self) -> i8 {
        match self {
            AccessLevel::Anonymous => -1,
            AccessLevel::Base => 0,
            AccessLevel::Premium => 1,
            AccessLevel::Enterprise => 2,
            AccessLevel::Admin => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccessLevel::Anonymous => "anonymous",
            AccessLevel::Base => "base",
            AccessLevel::Premium => "premium",
            AccessLevel::Enterprise => "enterprise",
            AccessLevel::Admin => "admin",
        }
    }

    /// Plan name shown in upgrade prompts.
    pub fn plan_name(self) -> &'static str {
        match self {
            AccessLevel::Enterprise => "Enterprise",
            AccessLevel::Admin => "Admin",
            _ => "Premium",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn level(role: Option<&str>) -> AccessLevel {
    role.map_or(AccessLevel::Anonymous, AccessLevel::from_role)
}

pub fn has_access(profile_role: &str, required_role: &str) -> bool {
    AccessLevel::from_role(profile_role) >= AccessLevel::from_role(required_role)
}

pub fn is_premium_or_higher(role: Option<&str>) -> bool {
    level(role) >= AccessLevel::Premium
}

pub fn is_enterprise_or_higher(role: Option<&str>) -> bool {
    level(role) >= AccessLevel::Enterprise
}

/// Exact admin role, not merely a level at or above it.
pub fn is_admin(role: Option<&str>) -> bool {
    role == Some("admin")
}

// ---------------------------------------------------------------------------
// GateDecision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    Allowed,
    SignInRequired,
    UpgradeRequired { required: AccessLevel },
}

impl GateDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, GateDecision::Allowed)
    }
}

/// Decide whether a caller with `role` (None when signed out) may see a
/// section that requires `required`.
pub fn gate(role: Option<&str>, required: AccessLevel) -> GateDecision {
    let Some(role) = role else {
        return GateDecision::SignInRequired;
    };
    if AccessLevel::from_role(role) >= required {
        GateDecision::Allowed
    } else {
        GateDecision::UpgradeRequired { required }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_hierarchy() {
        assert!(has_access("admin", "premium"));
        assert!(!has_access("subscriber", "premium"));
        assert!(!has_access("unknown-role", "enterprise"));
        assert!(has_access("enterprise", "enterprise"));
        assert!(has_access("subscriber", "subscriber"));
    }

    #[test]
    fn unknown_required_role_is_base() {
        assert!(has_access("subscriber", "superuser"));
    }

    #[test]
    fn ranks_are_monotonic() {
        let levels = [
            AccessLevel::Anonymous,
            AccessLevel::Base,
            AccessLevel::Premium,
            AccessLevel::Enterprise,
            AccessLevel::Admin,
        ];
        for pair in levels.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].rank() < pair[1].rank());
        }
        assert_eq!(AccessLevel::from_role("base").rank(), 0);
        assert_eq!(AccessLevel::from_role("admin").rank(), 3);
    }

    #[test]
    fn gate_without_profile_requires_sign_in() {
        assert_eq!(gate(None, AccessLevel::Base), GateDecision::SignInRequired);
    }

    #[test]
    fn gate_names_required_plan() {
        let decision = gate(Some("premium"), AccessLevel::Enterprise);
        assert_eq!(
            decision,
            GateDecision::UpgradeRequired {
                required: AccessLevel::Enterprise
            }
        );
        assert!(gate(Some("admin"), AccessLevel::Enterprise).is_allowed());
        assert_eq!(AccessLevel::Premium.plan_name(), "Premium");
    }

    #[test]
    fn convenience_checks() {
        assert!(is_premium_or_higher(Some("enterprise")));
        assert!(!is_premium_or_higher(None));
        assert!(!is_enterprise_or_higher(Some("premium")));
        assert!(is_admin(Some("admin")));
        assert!(!is_admin(Some("enterprise")));
    }
}
