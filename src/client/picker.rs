//! Pure state for the paginated interest picker: six categories per page, a
//! seven-button pagination window, and optimistic selection toggles that can
//! be rolled back when the server call fails.

use std::collections::BTreeSet;

use crate::categories::dto::Category;

pub const CATEGORIES_PER_PAGE: usize = 6;
const WINDOW: usize = 7;

/// Inverse of a toggle, applied when the mutation fails server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleEdit {
    pub category_id: i64,
    pub added: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PickerState {
    all: Vec<Category>,
    selected: BTreeSet<i64>,
    page: usize,
}

impl PickerState {
    pub fn new(all: Vec<Category>, selected: impl IntoIterator<Item = i64>) -> Self {
        Self {
            all,
            selected: selected.into_iter().collect(),
            page: 1,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.all.len().div_ceil(CATEGORIES_PER_PAGE).max(1)
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.page_count());
    }

    pub fn current_page(&self) -> &[Category] {
        let start = (self.page - 1) * CATEGORIES_PER_PAGE;
        let end = (start + CATEGORIES_PER_PAGE).min(self.all.len());
        if start >= self.all.len() {
            &[]
        } else {
            &self.all[start..end]
        }
    }

    pub fn is_selected(&self, category_id: i64) -> bool {
        self.selected.contains(&category_id)
    }

    pub fn selected_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.selected.iter().copied()
    }

    /// Optimistically flip the selection and return the edit that was made,
    /// so a failed server call can undo it.
    pub fn toggle(&mut self, category_id: i64) -> ToggleEdit {
        if self.selected.remove(&category_id) {
            ToggleEdit {
                category_id,
                added: false,
            }
        } else {
            self.selected.insert(category_id);
            ToggleEdit {
                category_id,
                added: true,
            }
        }
    }

    /// Reconcile back to the server's truth after a failed mutation.
    pub fn rollback(&mut self, edit: ToggleEdit) {
        if edit.added {
            self.selected.remove(&edit.category_id);
        } else {
            self.selected.insert(edit.category_id);
        }
    }

    /// The visible page buttons: a window of up to seven pages anchored at
    /// the start, around the current page, or at the end.
    pub fn pagination_window(&self) -> Vec<usize> {
        let count = self.page_count();
        if count <= WINDOW {
            return (1..=count).collect();
        }
        let start = if self.page < 4 {
            1
        } else if self.page > count - 3 {
            count - (WINDOW - 1)
        } else {
            self.page - 3
        };
        (start..start + WINDOW).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue(n: usize) -> Vec<Category> {
        (1..=n as i64)
            .map(|id| Category {
                id,
                name: format!("Category {id}"),
            })
            .collect()
    }

    #[test]
    fn pages_hold_six_categories() {
        let picker = PickerState::new(catalogue(14), []);
        assert_eq!(picker.page_count(), 3);
        assert_eq!(picker.current_page().len(), 6);

        let mut picker = picker;
        picker.set_page(3);
        assert_eq!(picker.current_page().len(), 2);
    }

    #[test]
    fn set_page_clamps_to_valid_range() {
        let mut picker = PickerState::new(catalogue(14), []);
        picker.set_page(99);
        assert_eq!(picker.page(), 3);
        picker.set_page(0);
        assert_eq!(picker.page(), 1);
    }

    #[test]
    fn toggle_and_rollback_are_inverse() {
        let mut picker = PickerState::new(catalogue(6), [2]);

        let edit = picker.toggle(4);
        assert!(edit.added);
        assert!(picker.is_selected(4));
        picker.rollback(edit);
        assert!(!picker.is_selected(4));

        let edit = picker.toggle(2);
        assert!(!edit.added);
        assert!(!picker.is_selected(2));
        picker.rollback(edit);
        assert!(picker.is_selected(2));
    }

    #[test]
    fn double_toggle_restores_the_selection() {
        let mut picker = PickerState::new(catalogue(6), [1, 2]);
        picker.toggle(3);
        picker.toggle(3);
        assert_eq!(picker.selected_ids().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn pagination_window_anchors_start_middle_end() {
        let mut picker = PickerState::new(catalogue(120), []);
        assert_eq!(picker.page_count(), 20);

        picker.set_page(1);
        assert_eq!(picker.pagination_window(), vec![1, 2, 3, 4, 5, 6, 7]);

        picker.set_page(10);
        assert_eq!(picker.pagination_window(), vec![7, 8, 9, 10, 11, 12, 13]);

        picker.set_page(20);
        assert_eq!(
            picker.pagination_window(),
            vec![14, 15, 16, 17, 18, 19, 20]
        );
    }

    #[test]
    fn small_catalogues_show_every_page() {
        let picker = PickerState::new(catalogue(20), []);
        assert_eq!(picker.pagination_window(), vec![1, 2, 3, 4]);
    }
}
