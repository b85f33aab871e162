use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// DemoPhase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoPhase {
    Idle,
    Running,
    Complete,
}

impl DemoPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            DemoPhase::Idle => "idle",
            DemoPhase::Running => "running",
            DemoPhase::Complete => "complete",
        }
    }
}

impl fmt::Display for DemoPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SubscriberStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriberStatus {
    Active,
    Unsubscribed,
    Bounced,
}

impl SubscriberStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubscriberStatus::Active => "active",
            SubscriberStatus::Unsubscribed => "unsubscribed",
            SubscriberStatus::Bounced => "bounced",
        }
    }
}

impl fmt::Display for SubscriberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriberStatus {
    type Err = crate::error::EncoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriberStatus::Active),
            "unsubscribed" => Ok(SubscriberStatus::Unsubscribed),
            "bounced" => Ok(SubscriberStatus::Bounced),
            _ => Err(crate::error::EncoreError::InvalidStatus {
                kind: "subscriber",
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// IssueStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Draft,
    Scheduled,
    Sent,
}

impl IssueStatus {
    pub fn all() -> &'static [IssueStatus] {
        &[IssueStatus::Draft, IssueStatus::Scheduled, IssueStatus::Sent]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IssueStatus::Draft => "draft",
            IssueStatus::Scheduled => "scheduled",
            IssueStatus::Sent => "sent",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ArtistStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtistStatus {
    Featured,
    Tracked,
    Archived,
}

impl ArtistStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtistStatus::Featured => "featured",
            ArtistStatus::Tracked => "tracked",
            ArtistStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ArtistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SortKey
// ---------------------------------------------------------------------------

/// Orderings offered by the artist intelligence view. All of them sort
/// descending: highest value or most recent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Confidence,
    Growth,
    Listeners,
    Recent,
}

impl SortKey {
    pub fn all() -> &'static [SortKey] {
        &[
            SortKey::Confidence,
            SortKey::Growth,
            SortKey::Listeners,
            SortKey::Recent,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Confidence => "confidence",
            SortKey::Growth => "growth",
            SortKey::Listeners => "listeners",
            SortKey::Recent => "recent",
        }
    }

    /// Lenient lookup used by the filter engine: unknown keys yield `None`
    /// and leave the collection in its original order.
    pub fn parse(s: &str) -> Option<SortKey> {
        SortKey::all().iter().copied().find(|k| k.as_str() == s)
    }

    /// Row field the key orders by.
    pub fn field(self) -> &'static str {
        match self {
            SortKey::Confidence => "ai_confidence",
            SortKey::Growth => "growth_rate",
            SortKey::Listeners => "monthly_listeners",
            SortKey::Recent => "discovery_date",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortKey {
    type Err = crate::error::EncoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::parse(s).ok_or_else(|| crate::error::EncoreError::InvalidSortKey(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
