/// A category identifier as reported by the backend. Opaque to the engine;
/// backend order is preserved for display only.
pub type Category = String;

/// Argument to [`SelectionState::toggle`]: either the "all" reset or a
/// concrete category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    All,
    Category(Category),
}

/// The user's active category filter.
///
/// Either unrestricted (`All`) or restricted to a concrete, non-empty set of
/// categories in selection order. An empty concrete set is never exposed;
/// removal of the last category collapses the state back to `All`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    All,
    Only(Vec<Category>),
}

impl Default for SelectionState {
    fn default() -> Self {
        SelectionState::All
    }
}

impl SelectionState {
    /// Apply a toggle event. Total: never fails and always leaves the state
    /// valid per the non-empty invariant.
    pub fn toggle(&mut self, toggle: Toggle) {
        match toggle {
            // Reset, not a toggle: any concrete selection is discarded.
            Toggle::All => *self = SelectionState::All,
            Toggle::Category(category) => match self {
                SelectionState::All => *self = SelectionState::Only(vec![category]),
                SelectionState::Only(selected) => {
                    if let Some(pos) = selected.iter().position(|c| c == &category) {
                        selected.remove(pos);
                        if selected.is_empty() {
                            *self = SelectionState::All;
                        }
                    } else {
                        selected.push(category);
                    }
                }
            },
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, SelectionState::All)
    }

    pub fn is_selected(&self, category: &str) -> bool {
        match self {
            SelectionState::All => false,
            SelectionState::Only(selected) => selected.iter().any(|c| c == category),
        }
    }

    /// Order-independent comparison: two concrete selections describe the
    /// same filter when they contain the same categories.
    pub fn same_filter(&self, other: &SelectionState) -> bool {
        match (self, other) {
            (SelectionState::All, SelectionState::All) => true,
            (SelectionState::Only(a), SelectionState::Only(b)) => {
                a.len() == b.len() && a.iter().all(|c| b.contains(c))
            }
            _ => false,
        }
    }

    /// Drop selected categories that are not in `known`, collapsing to `All`
    /// if nothing is left. Returns the categories that were dropped.
    pub fn retain_known(&mut self, known: &[Category]) -> Vec<Category> {
        let SelectionState::Only(selected) = self else {
            return Vec::new();
        };
        let removed: Vec<Category> = selected
            .iter()
            .filter(|c| !known.contains(*c))
            .cloned()
            .collect();
        if removed.is_empty() {
            return removed;
        }
        selected.retain(|c| known.contains(c));
        if selected.is_empty() {
            *self = SelectionState::All;
        }
        removed
    }
}
