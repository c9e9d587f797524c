//! Domain identifiers (strongly-typed IDs).
//!
//! # ULID ベースの ID
//! Campaign の ID は ULID (Universally Unique Lexicographically Sortable Identifier) です。
//! 生成は orchestrator が一度だけ行い、以後は不変です。
//!
//! ## Phantom Type パターン
//! `Id<T>` というジェネリック型で共通実装を提供しつつ、
//! `T` は実行時には使わない（PhantomData）マーカー型として、
//! コンパイル時の型安全性を提供します。
//!
//! Owner は外部の identity から渡される数値 ID なので、ULID ではなく
//! `OwnerId(u64)` として表現します（0 は「未指定」）。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"campaign-"）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
///
/// `T` は PhantomData で、実行時にはメモリを消費しませんが、
/// コンパイル時に型安全性を提供します。
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Display 形式（`campaign-01H...`）からの復元に失敗した
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed identifier: {0:?}")]
pub struct ParseIdError(pub String);

impl<T: IdMarker> FromStr for Id<T> {
    type Err = ParseIdError;

    /// Accepts both the prefixed display form and a bare ULID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix(T::prefix()).unwrap_or(s);
        Ulid::from_string(raw)
            .map(Self::from_ulid)
            .map_err(|_| ParseIdError(s.to_string()))
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// Campaign のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CampaignTag {}

impl IdMarker for CampaignTag {
    fn prefix() -> &'static str {
        "campaign-"
    }
}

/// Identifier of a Campaign (assigned once at creation, never mutated).
pub type CampaignId = Id<CampaignTag>;

/// Identifier of the owner of a campaign.
///
/// Zero is the wire-level "not provided" sentinel and is never a valid owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(u64);

impl OwnerId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn is_present(self) -> bool {
        self.0 != 0
    }
}

impl From<u64> for OwnerId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaign_id_displays_with_prefix() {
        let ulid = Ulid::new();
        let id = CampaignId::from_ulid(ulid);
        assert_eq!(id.as_ulid(), ulid);
        assert_eq!(id.to_string(), format!("campaign-{ulid}"));
    }

    #[test]
    fn campaign_id_parses_from_display_and_bare_form() {
        let id = CampaignId::from_ulid(Ulid::new());

        let parsed: CampaignId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);

        let bare: CampaignId = id.as_ulid().to_string().parse().unwrap();
        assert_eq!(bare, id);
    }

    #[test]
    fn malformed_campaign_id_is_rejected() {
        let err = "campaign-not-a-ulid".parse::<CampaignId>().unwrap_err();
        assert_eq!(err, ParseIdError("campaign-not-a-ulid".to_string()));
        assert!("".parse::<CampaignId>().is_err());
    }

    #[test]
    fn ulid_ids_can_be_serialized() {
        let id = CampaignId::from_ulid(Ulid::new());
        let serialized = serde_json::to_string(&id).unwrap();
        let deserialized: CampaignId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn zero_owner_is_not_present() {
        assert!(!OwnerId::new(0).is_present());
        assert!(OwnerId::new(42).is_present());
        assert_eq!(serde_json::to_string(&OwnerId::new(42)).unwrap(), "42");
    }

    #[test]
    fn phantom_data_does_not_consume_memory() {
        use std::mem::size_of;
        assert_eq!(size_of::<CampaignId>(), size_of::<Ulid>());
    }
}
