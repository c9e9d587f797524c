//! Errors - エラー型と分類
//!
//! `CampaignError` は orchestrator が呼び出し元へ返すエラーです。
//! `ErrorKind` は transport 層（gRPC status など）への写像に使う運用分類です。

use super::ids::CampaignId;
use super::validation::ValidationError;

/// ErrorKind は呼び出し元から見たエラーの分類
///
/// # 分類
/// - InvalidArgument: 呼び出し元の入力が不正（validation を含む）
/// - NotFound: 該当行なし（id、または id+owner の組）
/// - PermissionDenied: 手動での completed 設定など
/// - Internal: ストレージ・ブローカーの障害
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    PermissionDenied,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum CampaignError {
    /// Rejected before any storage access.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Missing or wrong-owner rows surface identically.
    #[error("campaign not found: {0}")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("internal error: {0}")]
    Internal(String),

    /// Event payload encoding failed. Logged by the orchestrator, never returned
    /// from a mutation.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl CampaignError {
    pub fn not_found(id: CampaignId) -> Self {
        CampaignError::NotFound(id.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CampaignError::Validation(_) | CampaignError::InvalidArgument(_) => {
                ErrorKind::InvalidArgument
            }
            CampaignError::NotFound(_) => ErrorKind::NotFound,
            CampaignError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            CampaignError::Internal(_) | CampaignError::Serialization(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_classify_as_invalid_argument() {
        let err: CampaignError = ValidationError::NonPositiveTarget.into();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.to_string(), "target amount must be positive");
    }

    #[test]
    fn kinds_cover_the_taxonomy() {
        assert_eq!(CampaignError::NotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(
            CampaignError::PermissionDenied("x".into()).kind(),
            ErrorKind::PermissionDenied
        );
        assert_eq!(CampaignError::Internal("x".into()).kind(), ErrorKind::Internal);
        assert_eq!(CampaignError::Serialization("x".into()).kind(), ErrorKind::Internal);
    }
}
