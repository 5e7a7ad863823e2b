//! Report screen state: one filter form per tab, the visible rows and their sort.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;

use super::generations::{QueryGenerations, Ticket, DEBOUNCE_DELAY};
use crate::domain::{
    build_payload, export, sort, FilterField, FilterForm, FilterPayload, FilterTab, SortState,
};
use crate::error::AppResult;
use crate::models::enums::CategoryShape;

/// A query the caller should run, and when
#[derive(Debug, Clone)]
pub struct PendingQuery {
    pub ticket: Ticket,
    pub payload: FilterPayload,
    /// Set for free-text inputs; the query waits for typing to settle
    pub delay: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct ReportSession {
    active: Option<FilterTab>,
    forms: BTreeMap<FilterTab, FilterForm>,
    rows: Vec<Value>,
    sort: SortState,
    generations: QueryGenerations,
}

impl ReportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tab(&self) -> FilterTab {
        self.active.unwrap_or(FilterTab::Purchase)
    }

    pub fn form(&self, tab: FilterTab) -> FilterForm {
        self.forms.get(&tab).cloned().unwrap_or_default()
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn generations(&self) -> &QueryGenerations {
        &self.generations
    }

    /// Switch tabs; rows and sort belong to the previous tab and are dropped
    pub fn select_tab(&mut self, tab: FilterTab) -> PendingQuery {
        self.active = Some(tab);
        self.rows.clear();
        self.sort = SortState::default();
        self.query(None)
    }

    /// Apply one input change to the active form and plan the follow-up query
    pub fn change<F>(&mut self, field: FilterField, edit: F) -> PendingQuery
    where
        F: FnOnce(&mut FilterForm),
    {
        let tab = self.active_tab();
        let form = self.forms.entry(tab).or_default();
        edit(form);

        if field == FilterField::AssetCategory {
            if let Some(category) = form.asset_category.resolve() {
                if CategoryShape::of(&category) != CategoryShape::Items {
                    form.item_name.clear();
                    form.item_description.clear();
                }
            }
        }

        let delay = field.is_debounced().then_some(DEBOUNCE_DELAY);
        self.query(delay)
    }

    fn query(&self, delay: Option<Duration>) -> PendingQuery {
        let tab = self.active_tab();
        PendingQuery {
            ticket: self.generations.begin(tab),
            payload: build_payload(tab, &self.form(tab)),
            delay,
        }
    }

    /// Install a response; stale responses are discarded and false is returned
    pub fn accept(&mut self, ticket: &Ticket, rows: Vec<Value>) -> bool {
        if ticket.tab != self.active_tab() || !self.generations.is_current(ticket) {
            tracing::debug!(tab = ?ticket.tab, generation = ticket.generation, "discarding stale report response");
            return false;
        }
        self.rows = rows;
        self.apply_sort();
        true
    }

    pub fn toggle_sort(&mut self, key: &str) {
        self.sort.toggle(key);
        self.apply_sort();
    }

    fn apply_sort(&mut self) {
        if let Some(key) = self.sort.key.clone() {
            let kind = export::column_kind(self.active_tab(), &key);
            sort::sort_rows(&mut self.rows, &key, kind, self.sort.direction);
        }
    }

    /// Visible rows as CSV, in their current order
    pub fn export_csv(&self) -> AppResult<Vec<u8>> {
        export::to_csv(self.active_tab(), &self.rows)
    }

    /// Return to the initial state; in-flight responses are discarded
    pub fn reset(&mut self) {
        self.generations.invalidate_all();
        self.active = None;
        self.forms.clear();
        self.rows.clear();
        self.sort = SortState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Choice, SortDirection};
    use serde_json::json;

    #[test]
    fn test_building_category_clears_item_name() {
        let mut session = ReportSession::new();
        session.select_tab(FilterTab::Purchase);

        let typed = session.change(FilterField::ItemName, |f| f.item_name = "Chair".into());
        assert_eq!(typed.delay, Some(DEBOUNCE_DELAY));
        assert_eq!(typed.payload.item_name.as_deref(), Some("Chair"));

        let switched = session.change(FilterField::AssetCategory, |f| {
            f.asset_category = Choice::new("Building")
        });
        assert_eq!(switched.delay, None);
        assert_eq!(switched.payload.asset_category.as_deref(), Some("Building"));
        assert_eq!(switched.payload.item_name, None);
        assert!(session.form(FilterTab::Purchase).item_name.is_empty());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut session = ReportSession::new();
        let first = session.select_tab(FilterTab::StoreIssue);
        let second = session.change(FilterField::Location, |f| f.location = Choice::new("Hostel"));

        assert!(!session.accept(&first.ticket, vec![json!({ "itemName": "old" })]));
        assert!(session.accept(&second.ticket, vec![json!({ "itemName": "new" })]));
        assert_eq!(session.rows().len(), 1);
        assert_eq!(session.rows()[0]["itemName"], "new");
    }

    #[test]
    fn test_rows_follow_sort_toggle() {
        let mut session = ReportSession::new();
        let query = session.select_tab(FilterTab::DeadStock);
        session.accept(
            &query.ticket,
            vec![
                json!({ "itemName": "a", "overallQuantity": 5 }),
                json!({ "itemName": "b", "overallQuantity": 12 }),
            ],
        );
        session.toggle_sort("overallQuantity");
        assert_eq!(session.rows()[0]["itemName"], "a");
        session.toggle_sort("overallQuantity");
        assert_eq!(session.sort().direction, SortDirection::Desc);
        assert_eq!(session.rows()[0]["itemName"], "b");
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut session = ReportSession::new();
        let query = session.select_tab(FilterTab::Disposal);
        session.change(FilterField::MethodOfDisposal, |f| {
            f.method_of_disposal = Choice::with_other("Others", "Auction")
        });
        session.toggle_sort("quantity");

        session.reset();
        assert_eq!(session.active_tab(), FilterTab::Purchase);
        assert_eq!(session.form(FilterTab::Disposal), FilterForm::default());
        assert_eq!(session.sort(), &SortState::default());
        assert!(!session.generations().is_current(&query.ticket));
    }
}
