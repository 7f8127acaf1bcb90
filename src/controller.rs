//! The list/form controller. It owns the in-memory copy of the `Persona`
//! table, the filtered projection the table widget renders, and the current
//! selection. Everything that needs a human (edit form, confirmation, alerts)
//! goes through the [`Dialogs`] trait so the flows can run without a terminal.

use std::cmp::min;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::db::PersonStore;
use crate::models::Person;

const NO_SELECTION: &str = "No person selected.";

/// Severity of an [`Alert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

/// A blocking message shown to the user once an operation has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            title: "Success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}

/// Modal interactions the controller needs from the UI. Each call blocks
/// until the user closes the dialog. Errors are UI failures only.
pub trait Dialogs {
    /// Show the person form, pre-filled with `initial` when editing.
    /// `None` means the user cancelled.
    fn edit_person(&mut self, title: &str, initial: Option<&Person>) -> Result<Option<Person>>;

    fn confirm(&mut self, title: &str, message: &str) -> Result<bool>;

    fn alert(&mut self, alert: Alert) -> Result<()>;

    /// The visible list changed while a dialog flow was running. Called
    /// before the alert that reports the change, so anything painted behind
    /// that alert can show the new rows.
    fn list_changed(&mut self, _visible: &[&Person], _selected: Option<usize>, _total: usize) {}
}

/// Owns the person list and mediates between the store and the UI.
pub struct PersonController<S> {
    store: S,
    records: Vec<Person>,
    filter: String,
    /// Indices into `records` that match `filter`, in record order.
    visible: Vec<usize>,
    /// Position within `visible`.
    selected: Option<usize>,
}

impl<S: PersonStore> PersonController<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            records: Vec::new(),
            filter: String::new(),
            visible: Vec::new(),
            selected: None,
        }
    }

    /// Replace the in-memory list with whatever the store holds. On failure
    /// the list stays empty and the user gets an error alert.
    pub fn load(&mut self, dialogs: &mut dyn Dialogs) -> Result<()> {
        self.records.clear();
        let outcome = self.store.list_all();
        let alert = match outcome {
            Ok(persons) => {
                info!(count = persons.len(), "loaded persons");
                self.records = persons;
                None
            }
            Err(err) => {
                warn!(error = %err, "loading persons failed");
                Some(Alert::error(format!("Could not load records: {err}")))
            }
        };
        self.refresh_view(None);
        self.publish_list(dialogs);

        match alert {
            Some(alert) => dialogs.alert(alert),
            None => Ok(()),
        }
    }

    /// Show only records whose first name contains `text`, ignoring case.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
        let focus = self.selected_record().and_then(|p| p.id);
        self.refresh_view(focus);
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// The full list, regardless of the filter.
    pub fn records(&self) -> &[Person] {
        &self.records
    }

    /// The records the table should display.
    pub fn visible_records(&self) -> Vec<&Person> {
        self.visible.iter().map(|&idx| &self.records[idx]).collect()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Position of the highlighted row within `visible_records`.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&Person> {
        self.selected_position().map(|idx| &self.records[idx])
    }

    /// Highlight the visible row at `index`; out-of-range clears the selection.
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&idx| idx < self.visible.len());
    }

    /// Move the highlight by `offset` rows, clamped to the visible range. With
    /// nothing selected yet, any movement lands on the first row.
    pub fn move_selection(&mut self, offset: isize) {
        if self.visible.is_empty() {
            self.selected = None;
            return;
        }
        let last = self.visible.len() as isize - 1;
        self.selected = Some(match self.selected {
            None => 0,
            Some(current) => (current as isize + offset).clamp(0, last) as usize,
        });
    }

    pub fn select_first(&mut self) {
        self.select(Some(0));
    }

    pub fn select_last(&mut self) {
        self.select(self.visible.len().checked_sub(1));
    }

    /// Open an empty form and persist the result as a new record.
    pub fn request_add(&mut self, dialogs: &mut dyn Dialogs) -> Result<()> {
        let Some(person) = dialogs.edit_person("Add Person", None)? else {
            debug!("add cancelled");
            return Ok(());
        };

        match self.store.insert(&person) {
            Ok(id) => {
                self.records.push(person.with_id(id));
                self.refresh_view(Some(id));
                self.publish_list(dialogs);
                dialogs.alert(Alert::success("Person added successfully."))
            }
            Err(err) => {
                warn!(error = %err, "adding person failed");
                dialogs.alert(Alert::error(format!("Could not add person: {err}")))
            }
        }
    }

    /// Edit the selected record in place.
    pub fn request_modify(&mut self, dialogs: &mut dyn Dialogs) -> Result<()> {
        let Some(position) = self.selected_position() else {
            return dialogs.alert(Alert::error(NO_SELECTION));
        };
        let original = self.records[position].clone();
        let Some(id) = original.id else {
            return dialogs.alert(Alert::error("The selected person has not been saved yet."));
        };

        let Some(edited) = dialogs.edit_person("Modify Person", Some(&original))? else {
            debug!(id, "modify cancelled");
            return Ok(());
        };

        match self.store.update(id, &edited) {
            Ok(()) => {
                self.records[position] = edited.with_id(id);
                self.refresh_view(Some(id));
                self.publish_list(dialogs);
                dialogs.alert(Alert::success("Person modified successfully."))
            }
            Err(err) => {
                warn!(id, error = %err, "modifying person failed");
                dialogs.alert(Alert::error(format!("Could not modify person: {err}")))
            }
        }
    }

    /// Remove the selected record after the user confirms.
    pub fn request_delete(&mut self, dialogs: &mut dyn Dialogs) -> Result<()> {
        let (Some(position), Some(row)) = (self.selected_position(), self.selected) else {
            return dialogs.alert(Alert::error(NO_SELECTION));
        };
        let target = self.records[position].clone();
        let Some(id) = target.id else {
            return dialogs.alert(Alert::error("The selected person has not been saved yet."));
        };

        let question = format!("Delete {}?", target.full_name());
        if !dialogs.confirm("Delete Person", &question)? {
            debug!(id, "delete cancelled");
            return Ok(());
        }

        match self.store.delete_by_id(id) {
            Ok(()) => {
                self.records.remove(position);
                self.refresh_view(None);
                if !self.visible.is_empty() {
                    self.selected = Some(min(row, self.visible.len() - 1));
                }
                self.publish_list(dialogs);
                dialogs.alert(Alert::success("Person deleted successfully."))
            }
            Err(err) => {
                warn!(id, error = %err, "deleting person failed");
                dialogs.alert(Alert::error(format!("Could not delete person: {err}")))
            }
        }
    }

    fn publish_list(&self, dialogs: &mut dyn Dialogs) {
        dialogs.list_changed(&self.visible_records(), self.selected, self.records.len());
    }

    /// Index into `records` of the highlighted row.
    fn selected_position(&self) -> Option<usize> {
        self.selected.and_then(|row| self.visible.get(row).copied())
    }

    /// Recompute the filtered projection and put the highlight on `focus` if
    /// that record is visible; otherwise nothing is selected.
    fn refresh_view(&mut self, focus: Option<i64>) {
        let needle = self.filter.to_lowercase();
        self.visible = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, person)| person.matches_filter(&needle))
            .map(|(idx, _)| idx)
            .collect();

        self.selected = focus.and_then(|id| {
            self.visible
                .iter()
                .position(|&idx| self.records[idx].id == Some(id))
        });
    }
}
