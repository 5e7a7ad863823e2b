//! Asset entry screen state.
//!
//! A session holds the active tab, the draft being edited, and, when a
//! rejected record is being corrected, the record id and the reviewer's
//! remark. `reset` returns every field to its initial value in one place.

use serde_json::Value;

use crate::domain::{classify, ActiveTab, Classification, RejectedForm};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedContext {
    pub record_id: i64,
    pub form: RejectedForm,
    pub remark: Option<String>,
    /// Show the "editing a rejected record" banner
    pub banner: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntrySession {
    tab: ActiveTab,
    draft: Value,
    rejected: Option<RejectedContext>,
}

impl Default for EntrySession {
    fn default() -> Self {
        Self {
            tab: ActiveTab::Store,
            draft: Value::Object(Default::default()),
            rejected: None,
        }
    }
}

impl EntrySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(&self) -> ActiveTab {
        self.tab
    }

    pub fn draft(&self) -> &Value {
        &self.draft
    }

    pub fn rejected(&self) -> Option<&RejectedContext> {
        self.rejected.as_ref()
    }

    /// Switching tabs starts a fresh draft
    pub fn select_tab(&mut self, tab: ActiveTab) {
        if tab != self.tab {
            self.reset();
            self.tab = tab;
        }
    }

    pub fn set_field(&mut self, field: &str, value: Value) {
        if let Value::Object(map) = &mut self.draft {
            map.insert(field.to_string(), value);
        }
    }

    /// Load a rejected record document into the form that produced it
    pub fn rehydrate(&mut self, doc: &Value) -> AppResult<Classification> {
        let record_id = doc
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| AppError::BadRequest("Rejected record has no id".to_string()))?;
        let classification = classify(doc);

        let mut draft = doc.clone();
        if let Value::Object(map) = &mut draft {
            for key in ["id", "rejected", "rejectedRemarks", "status"] {
                map.remove(key);
            }
        }

        self.tab = classification.tab;
        self.draft = draft;
        self.rejected = Some(RejectedContext {
            record_id,
            form: classification.form,
            remark: doc
                .get("rejectedRemarks")
                .and_then(Value::as_str)
                .map(str::to_string),
            banner: classification.editing_rejected,
        });
        Ok(classification)
    }

    /// Everything back to the initial state
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rehydrate_routes_to_originating_form() {
        let mut session = EntrySession::new();
        let doc = json!({
            "id": 42,
            "assetType": "Permanent",
            "assetCategory": "Building",
            "subCategory": "Hostel",
            "custody": "CPWD",
            "rejected": true,
            "rejectedRemarks": "Cost missing",
        });
        let c = session.rehydrate(&doc).unwrap();
        assert_eq!(c.form, RejectedForm::Maintenance);
        assert_eq!(session.tab(), ActiveTab::Serviced);

        let ctx = session.rejected().unwrap();
        assert_eq!(ctx.record_id, 42);
        assert_eq!(ctx.remark.as_deref(), Some("Cost missing"));
        assert!(ctx.banner);
        assert!(session.draft().get("rejected").is_none());
        assert_eq!(session.draft()["custody"], "CPWD");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = EntrySession::new();
        session
            .rehydrate(&json!({ "id": 7, "serviceNo": "S-1", "rejected": true }))
            .unwrap();
        session.set_field("serviceAmount", json!(900));

        session.reset();
        assert_eq!(session, EntrySession::default());
    }

    #[test]
    fn test_tab_switch_discards_draft() {
        let mut session = EntrySession::new();
        session.set_field("itemName", json!("Chair"));
        session.select_tab(ActiveTab::Issue);
        assert_eq!(session.tab(), ActiveTab::Issue);
        assert_eq!(session.draft(), &json!({}));
    }

    #[test]
    fn test_rehydrate_requires_id() {
        let mut session = EntrySession::new();
        assert!(session.rehydrate(&json!({ "serviceNo": "S-1" })).is_err());
    }
}
