//! Screen sessions used by clients of the API: entry forms and reports.

pub mod entry;
pub mod generations;
pub mod report;

pub use entry::{EntrySession, RejectedContext};
pub use generations::{Debouncer, QueryGenerations, Ticket, DEBOUNCE_DELAY};
pub use report::{PendingQuery, ReportSession};
