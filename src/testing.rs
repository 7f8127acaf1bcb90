//! Test doubles for the store and dialog seams.

use std::collections::VecDeque;
use std::path::PathBuf;

use anyhow::Result;

use crate::controller::{Alert, Dialogs};
use crate::db::PersonStore;
use crate::error::{StoreError, StoreResult};
use crate::models::Person;

/// In-memory store. Ids are handed out from `next_id`; `fail` makes every
/// call return a connection error.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    pub(crate) rows: Vec<Person>,
    pub(crate) next_id: i64,
    pub(crate) fail: bool,
}

impl MemoryStore {
    pub(crate) fn with_rows(rows: &[(&str, &str, i64)]) -> Self {
        let rows: Vec<Person> = rows
            .iter()
            .zip(1..)
            .map(|(&(first, last, age), id)| Person::new(first, last, age).with_id(id))
            .collect();
        let next_id = rows.len() as i64 + 1;
        Self {
            rows,
            next_id,
            fail: false,
        }
    }

    fn check(&self) -> StoreResult<()> {
        if self.fail {
            let path = PathBuf::from("unreachable.sqlite");
            Err(StoreError::Connect {
                source: rusqlite::Error::InvalidPath(path.clone()),
                path,
            })
        } else {
            Ok(())
        }
    }

    fn position(&self, id: i64) -> StoreResult<usize> {
        self.rows
            .iter()
            .position(|p| p.id == Some(id))
            .ok_or(StoreError::NotFound(id))
    }
}

impl PersonStore for MemoryStore {
    fn list_all(&mut self) -> StoreResult<Vec<Person>> {
        self.check()?;
        Ok(self.rows.clone())
    }

    fn insert(&mut self, person: &Person) -> StoreResult<i64> {
        self.check()?;
        let id = self.next_id;
        self.next_id += 1;
        self.rows.push(person.clone().with_id(id));
        Ok(id)
    }

    fn update(&mut self, id: i64, person: &Person) -> StoreResult<()> {
        self.check()?;
        let idx = self.position(id)?;
        self.rows[idx] = person.clone().with_id(id);
        Ok(())
    }

    fn delete_by_id(&mut self, id: i64) -> StoreResult<()> {
        self.check()?;
        let idx = self.position(id)?;
        self.rows.remove(idx);
        Ok(())
    }
}

/// Dialogs that answer from queues and record what they were asked.
/// An empty queue behaves like the user cancelling.
#[derive(Debug, Default)]
pub(crate) struct ScriptedDialogs {
    pub(crate) edits: VecDeque<Option<Person>>,
    pub(crate) confirms: VecDeque<bool>,
    pub(crate) edit_requests: Vec<(String, Option<Person>)>,
    pub(crate) confirm_requests: Vec<String>,
    pub(crate) alerts: Vec<Alert>,
    /// First names, selection and total from each `list_changed` call.
    pub(crate) list_snapshots: Vec<(Vec<String>, Option<usize>, usize)>,
}

impl Dialogs for ScriptedDialogs {
    fn edit_person(&mut self, title: &str, initial: Option<&Person>) -> Result<Option<Person>> {
        self.edit_requests
            .push((title.to_string(), initial.cloned()));
        Ok(self.edits.pop_front().flatten())
    }

    fn confirm(&mut self, _title: &str, message: &str) -> Result<bool> {
        self.confirm_requests.push(message.to_string());
        Ok(self.confirms.pop_front().unwrap_or(false))
    }

    fn alert(&mut self, alert: Alert) -> Result<()> {
        self.alerts.push(alert);
        Ok(())
    }

    fn list_changed(&mut self, visible: &[&Person], selected: Option<usize>, total: usize) {
        let names = visible.iter().map(|p| p.first_name.clone()).collect();
        self.list_snapshots.push((names, selected, total));
    }
}
