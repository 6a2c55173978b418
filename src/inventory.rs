use crate::client::FetchError;
use crate::model::{InventoryItem, SortCriteria};

/// View model backing the inventory screen. Fetches are sequenced so a slow
/// response from an earlier visit can never clobber a newer one.
#[derive(Debug, Default)]
pub struct InventoryView {
    items: Vec<InventoryItem>,
    criteria: SortCriteria,
    loading: bool,
    error: Option<String>,
    seq: u64,
}

impl InventoryView {
    pub fn new(criteria: SortCriteria) -> Self {
        Self {
            criteria,
            ..Default::default()
        }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn criteria(&self) -> SortCriteria {
        self.criteria
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Starts a fetch and returns its ticket. The caller must hand the ticket
    /// back to `complete_fetch` along with the result.
    pub fn begin_fetch(&mut self) -> u64 {
        self.seq += 1;
        self.loading = true;
        self.seq
    }

    /// Lands a fetch result. Returns false if the ticket is stale, in which
    /// case the state is untouched. On failure the previous list is kept so
    /// the user still sees something behind the error line.
    pub fn complete_fetch(
        &mut self,
        seq: u64,
        result: Result<Vec<InventoryItem>, FetchError>,
    ) -> bool {
        if seq < self.seq {
            return false;
        }
        self.loading = false;
        match result {
            Ok(mut items) => {
                self.criteria.apply(&mut items);
                self.items = items;
                self.error = None;
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Changing criteria re-sorts what we have; the UI additionally refetches.
    pub fn set_sort_criteria(&mut self, criteria: SortCriteria) {
        self.criteria = criteria;
        self.criteria.apply(&mut self.items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn item(name: &str) -> InventoryItem {
        InventoryItem {
            id: format!("id-{}", name),
            medicine_name: name.to_string(),
            stock: 1,
            compartment: 1,
            expiration_date: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_successful_fetch_lands_sorted() {
        let mut view = InventoryView::new(SortCriteria::Ascend);
        let seq = view.begin_fetch();
        assert!(view.is_loading());

        let landed = view.complete_fetch(seq, Ok(vec![item("Zinc"), item("aspirin")]));
        assert!(landed);
        assert!(!view.is_loading());
        assert!(view.error().is_none());
        assert_eq!(view.items()[0].medicine_name, "aspirin");
    }

    #[test]
    fn test_stale_fetch_is_ignored() {
        let mut view = InventoryView::default();
        let old = view.begin_fetch();
        let new = view.begin_fetch();

        assert!(view.complete_fetch(new, Ok(vec![item("Fresh")])));
        let landed = view.complete_fetch(old, Ok(vec![item("Stale")]));
        assert!(!landed);
        assert_eq!(view.items().len(), 1);
        assert_eq!(view.items()[0].medicine_name, "Fresh");
    }

    #[test]
    fn test_failed_fetch_keeps_previous_list() {
        let mut view = InventoryView::default();
        let seq = view.begin_fetch();
        view.complete_fetch(seq, Ok(vec![item("Kept")]));

        let seq = view.begin_fetch();
        view.complete_fetch(seq, Err(FetchError::NetworkUnreachable));

        assert!(!view.is_loading());
        assert_eq!(view.items().len(), 1);
        assert_eq!(
            view.error(),
            Some("Unable to connect. Please check your internet connection and try again.")
        );
    }

    #[test]
    fn test_set_criteria_resorts_in_place() {
        let mut view = InventoryView::default();
        let seq = view.begin_fetch();
        view.complete_fetch(seq, Ok(vec![item("b"), item("a")]));
        assert_eq!(view.items()[0].medicine_name, "b");

        view.set_sort_criteria(SortCriteria::Ascend);
        assert_eq!(view.items()[0].medicine_name, "a");
    }

    #[test]
    fn test_success_clears_earlier_error() {
        let mut view = InventoryView::default();
        let seq = view.begin_fetch();
        view.complete_fetch(seq, Err(FetchError::Unexpected));
        assert!(view.error().is_some());

        let seq = view.begin_fetch();
        view.complete_fetch(seq, Ok(vec![item("a")]));
        assert!(view.error().is_none());
    }
}
