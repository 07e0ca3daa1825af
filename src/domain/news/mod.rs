use serde::{Deserialize, Serialize};

use crate::domain::selection::SelectionState;

/// A single curated news entry as returned by the backend.
///
/// Immutable once received; the whole collection is replaced wholesale on
/// each successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub explainer: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// The pair that uniquely determines a news query.
///
/// Equality is field-wise, with set equality (order-independent) on the
/// concrete-selection case: `{ai, robotics}` and `{robotics, ai}` describe
/// the same query even though they serialize in their own selection order.
#[derive(Debug, Clone)]
pub struct FetchKey {
    pub explainer: bool,
    pub selection: SelectionState,
}

impl FetchKey {
    pub fn new(explainer: bool, selection: SelectionState) -> Self {
        Self {
            explainer,
            selection,
        }
    }

    /// The `categories` query parameter value: the literal `all`, or the
    /// selected categories comma-joined in selection order.
    pub fn categories_param(&self) -> String {
        match &self.selection {
            SelectionState::All => "all".to_string(),
            SelectionState::Only(selected) => selected.join(","),
        }
    }
}

impl PartialEq for FetchKey {
    fn eq(&self, other: &Self) -> bool {
        self.explainer == other.explainer && self.selection.same_filter(&other.selection)
    }
}

impl Eq for FetchKey {}
