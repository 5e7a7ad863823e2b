//! Storage-independent rules: validation, classification, approval
//! transitions, report filters, sorting and export.

pub mod classifier;
pub mod export;
pub mod filter;
pub mod lifecycle;
pub mod sort;
pub mod validation;

pub use classifier::{classify, ActiveTab, Classification, RejectedForm};
pub use filter::{build_payload, Choice, FilterField, FilterForm, FilterPayload, FilterTab};
pub use lifecycle::{ApprovalAction, ApprovalState, TransitionError};
pub use sort::{ColumnKind, SortDirection, SortState};
