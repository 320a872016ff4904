//! Per-axis slice selectors.

use std::cell::Cell;

use crate::signal::{Connection, Signal};

/// Axis names that are self-explanatory from their labels alone.
const UNCAPTIONED_AXES: [&str; 2] = ["STOKES", "COMPLEX"];

/// Selector for one extra axis: a list of labels with a current entry.
///
/// Changing the current entry through [`set_current_index`](Self::set_current_index)
/// notifies the panel; [`sync`](Self::sync) updates
/// the selection silently when the model changed elsewhere.
#[derive(Debug)]
pub struct SliceSelector {
    axis: usize,
    axis_name: String,
    caption: Option<String>,
    labels: Vec<String>,
    current: Cell<usize>,
    index_changed: Signal<usize>,
}

impl SliceSelector {
    pub(crate) fn new(axis: usize, axis_name: &str, labels: &[String], current: usize) -> Self {
        let caption = if UNCAPTIONED_AXES.contains(&axis_name.to_uppercase().as_str()) {
            None
        } else {
            Some(format!("{axis_name}:"))
        };
        Self {
            axis,
            axis_name: axis_name.to_string(),
            caption,
            labels: labels.to_vec(),
            current: Cell::new(current),
            index_changed: Signal::new(),
        }
    }

    /// Index of this selector's axis among the extra axes.
    #[must_use]
    pub fn axis(&self) -> usize {
        self.axis
    }

    #[must_use]
    pub fn axis_name(&self) -> &str {
        &self.axis_name
    }

    /// Caption shown before the selector, if any.
    #[must_use]
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.labels.len()
    }

    /// Axes with fewer than two positions are not shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.labels.len() >= 2
    }

    #[must_use]
    pub fn tooltip(&self) -> String {
        format!("Selects current slice along the {} axis.", self.axis_name)
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current.get()
    }

    #[must_use]
    pub fn current_label(&self) -> Option<&str> {
        self.labels.get(self.current.get()).map(String::as_str)
    }

    /// Select entry `index`, notifying observers if the selection changed.
    /// Out-of-range indices are ignored.
    pub fn set_current_index(&self, index: usize) {
        if index >= self.labels.len() || index == self.current.get() {
            return;
        }
        self.current.set(index);
        self.index_changed.emit(&index);
    }

    /// Select entry `index` without notifying observers.
    pub fn sync(&self, index: usize) {
        if index < self.labels.len() {
            self.current.set(index);
        }
    }

    pub(crate) fn on_index_changed<F>(&self, callback: F) -> Connection
    where
        F: Fn(&usize) + 'static,
    {
        self.index_changed.connect(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("ch{i}")).collect()
    }

    #[test]
    fn test_caption_rules() {
        assert_eq!(SliceSelector::new(0, "stokes", &labels(4), 0).caption(), None);
        assert_eq!(SliceSelector::new(0, "COMPLEX", &labels(2), 0).caption(), None);
        assert_eq!(
            SliceSelector::new(1, "FREQ", &labels(3), 0).caption(),
            Some("FREQ:")
        );
    }

    #[test]
    fn test_visibility_threshold() {
        assert!(!SliceSelector::new(0, "TIME", &labels(1), 0).is_visible());
        assert!(SliceSelector::new(0, "STOKES", &labels(2), 0).is_visible());
    }

    #[test]
    fn test_set_current_index_emits_only_on_change() {
        let sel = SliceSelector::new(0, "FREQ", &labels(3), 0);
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let _c = sel.on_index_changed(move |_| counter.set(counter.get() + 1));

        sel.set_current_index(0);
        sel.set_current_index(2);
        sel.set_current_index(5);
        sel.sync(1);

        assert_eq!(hits.get(), 1);
        assert_eq!(sel.current_index(), 1);
        assert_eq!(sel.current_label(), Some("ch1"));
    }
}
