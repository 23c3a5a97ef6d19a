//! Identifiers and amounts
//!
//! Jobs are numbered, designs and accounts are opaque strings, and every
//! monetary value is an unsigned integer [`Amount`].

use serde::{Deserialize, Serialize};

/// Identifier of a manufacturing job
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl JobId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// Identifier of a registered design (usually a content hash)
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DesignId(pub String);

impl DesignId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for DesignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An identity that can hold funds, operate machines or administer the engine
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Custody account holding the bonification pool of a design
    pub fn pool_of(design: &DesignId) -> Self {
        Self(format!("pool:{}", design.0))
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Manufacturing category (e.g. "printing", "cnc")
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Category(pub String);

impl Category {
    /// Name of the fallback category
    pub const DEFAULT: &'static str = "default";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn default_category() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Token amount (smallest indivisible unit)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Amount(pub u64);

impl Amount {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// `floor(self * percent / 100)`
    pub fn percent(self, percent: u64) -> Self {
        Self(((self.0 as u128 * percent as u128) / 100) as u64)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(JobId::new(7).to_string(), "job-7");
        assert_eq!(DesignId::new("0xabc").to_string(), "0xabc");
        assert_eq!(AccountId::pool_of(&DesignId::new("d1")).to_string(), "pool:d1");
    }

    #[test]
    fn test_amount_percent_floors() {
        assert_eq!(Amount::new(1000).percent(10), Amount::new(100));
        assert_eq!(Amount::new(999).percent(10), Amount::new(99));
        assert_eq!(Amount::new(9).percent(10), Amount::zero());
        assert_eq!(Amount::new(u64::MAX).percent(100), Amount::new(u64::MAX));
    }

    #[test]
    fn test_amount_checked() {
        assert_eq!(Amount::new(5).checked_sub(Amount::new(6)), None);
        assert_eq!(Amount::new(u64::MAX).checked_add(Amount::new(1)), None);
        assert_eq!(
            Amount::new(5).checked_add(Amount::new(6)),
            Some(Amount::new(11))
        );
    }

    #[test]
    fn test_category_default() {
        assert!(Category::default_category().is_default());
        assert!(!Category::new("printing").is_default());
        assert!(Category::new("  ").is_empty());
    }
}
