//! Approval state machine shared by asset records, faculty records and user
//! registrations.
//!
//! ```text
//! pending --approve--> approved            (terminal)
//! pending --reject{remark}--> rejected --resubmit--> pending
//! ```

use thiserror::Error;

use crate::error::AppError;
use crate::models::{enums::RecordStatus, AssetType, Role};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalState {
    Pending,
    Approved,
    Rejected { remark: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalAction {
    Approve,
    Reject { remark: String },
    Resubmit,
}

impl ApprovalAction {
    fn name(&self) -> &'static str {
        match self {
            ApprovalAction::Approve => "approve",
            ApprovalAction::Reject { .. } => "reject",
            ApprovalAction::Resubmit => "resubmit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("A remark is required to reject a record")]
    MissingRemark,
    #[error("Cannot {action} a record that is {state}")]
    NotAllowed {
        state: &'static str,
        action: &'static str,
    },
    #[error("At least one asset type must be granted to a {0} account")]
    MissingAccessGrant(Role),
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::MissingRemark | TransitionError::MissingAccessGrant(_) => {
                AppError::Validation(e.to_string())
            }
            TransitionError::NotAllowed { .. } => AppError::InvalidTransition(e.to_string()),
        }
    }
}

impl ApprovalState {
    pub fn from_parts(status: RecordStatus, remark: Option<&str>) -> Self {
        match status {
            RecordStatus::Pending => ApprovalState::Pending,
            RecordStatus::Approved => ApprovalState::Approved,
            RecordStatus::Rejected => ApprovalState::Rejected {
                remark: remark.unwrap_or_default().to_string(),
            },
        }
    }

    pub fn status(&self) -> RecordStatus {
        match self {
            ApprovalState::Pending => RecordStatus::Pending,
            ApprovalState::Approved => RecordStatus::Approved,
            ApprovalState::Rejected { .. } => RecordStatus::Rejected,
        }
    }

    pub fn remark(&self) -> Option<&str> {
        match self {
            ApprovalState::Rejected { remark } => Some(remark),
            _ => None,
        }
    }

    pub fn apply(&self, action: ApprovalAction) -> Result<ApprovalState, TransitionError> {
        match (self, action) {
            (ApprovalState::Pending, ApprovalAction::Approve) => Ok(ApprovalState::Approved),
            (ApprovalState::Pending, ApprovalAction::Reject { remark }) => {
                let remark = remark.trim();
                if remark.is_empty() {
                    return Err(TransitionError::MissingRemark);
                }
                Ok(ApprovalState::Rejected {
                    remark: remark.to_string(),
                })
            }
            (ApprovalState::Rejected { .. }, ApprovalAction::Resubmit) => Ok(ApprovalState::Pending),
            (state, action) => Err(TransitionError::NotAllowed {
                state: state.status().as_str(),
                action: action.name(),
            }),
        }
    }
}

/// Checks the capability grant that must accompany a registration approval
pub fn check_access_grant(role: Role, access: &[AssetType]) -> Result<(), TransitionError> {
    if role.needs_asset_access() && access.is_empty() {
        return Err(TransitionError::MissingAccessGrant(role));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_transitions() {
        let pending = ApprovalState::Pending;
        assert_eq!(pending.apply(ApprovalAction::Approve), Ok(ApprovalState::Approved));
        assert_eq!(
            pending.apply(ApprovalAction::Reject { remark: "  wrong bill no ".into() }),
            Ok(ApprovalState::Rejected { remark: "wrong bill no".into() })
        );
        assert!(matches!(
            pending.apply(ApprovalAction::Resubmit),
            Err(TransitionError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_reject_requires_remark() {
        let result = ApprovalState::Pending.apply(ApprovalAction::Reject { remark: "   ".into() });
        assert_eq!(result, Err(TransitionError::MissingRemark));
    }

    #[test]
    fn test_approved_is_terminal() {
        let approved = ApprovalState::Approved;
        for action in [
            ApprovalAction::Approve,
            ApprovalAction::Reject { remark: "late".into() },
            ApprovalAction::Resubmit,
        ] {
            assert!(approved.apply(action).is_err());
        }
    }

    #[test]
    fn test_rejected_only_resubmits() {
        let rejected = ApprovalState::from_parts(RecordStatus::Rejected, Some("missing bill"));
        assert_eq!(rejected.remark(), Some("missing bill"));
        assert_eq!(rejected.apply(ApprovalAction::Resubmit), Ok(ApprovalState::Pending));
        assert!(rejected.apply(ApprovalAction::Approve).is_err());
    }

    #[test]
    fn test_access_grant() {
        assert!(check_access_grant(Role::AssetEntry, &[]).is_err());
        assert!(check_access_grant(Role::AssetEntry, &[AssetType::Permanent]).is_ok());
        assert!(check_access_grant(Role::Principal, &[]).is_ok());
    }
}
