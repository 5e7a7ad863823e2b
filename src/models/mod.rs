//! Data models for CASFOS

pub mod asset;
pub mod disposal;
pub mod enums;
pub mod faculty;
pub mod maintenance;
pub mod record;
pub mod returned;
pub mod stock;
pub mod upgrade;
pub mod user;

// Re-export commonly used types
pub use asset::{AssetItem, IssueEntry, StoreEntry};
pub use disposal::{BuildingDisposal, ItemDisposal};
pub use enums::{AssetType, Condition, FacultyType, RecordKind, RecordStatus};
pub use faculty::{Faculty, FacultyInput};
pub use maintenance::{MaintenanceEntry, ServiceEntry};
pub use record::{AssetRecord, RecordPayload};
pub use returned::ReturnEntry;
pub use upgrade::{BuildingUpgradeEntry, Upgrade};
pub use user::{Role, User, UserClaims};

/// Replace an "Others"/"Other" selection by its paired free text.
///
/// A blank free text leaves the sentinel in place so validation can report it.
pub fn resolve_others(selected: &str, other: Option<&str>) -> String {
    match other.map(str::trim) {
        Some(text) if enums::is_others(selected) && !text.is_empty() => text.to_string(),
        _ => selected.to_string(),
    }
}
