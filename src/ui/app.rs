use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use tracing::debug;

use crate::controller::{Dialogs, PersonController};
use crate::db::PersonStore;

use super::screens::{render_table_screen, TableView};

/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 10;

/// Where keystrokes go on the main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Filtering,
}

/// Main-screen state: the controller plus the input focus.
pub struct App<S> {
    controller: PersonController<S>,
    mode: Mode,
}

impl<S: PersonStore> App<S> {
    pub fn new(controller: PersonController<S>) -> Self {
        Self {
            controller,
            mode: Mode::Normal,
        }
    }

    pub fn controller(&self) -> &PersonController<S> {
        &self.controller
    }

    /// Initial load from the store.
    pub fn start(&mut self, dialogs: &mut dyn Dialogs) -> Result<()> {
        self.controller.load(dialogs)
    }

    /// React to one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent, dialogs: &mut dyn Dialogs) -> Result<bool> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(true);
        }

        match self.mode {
            Mode::Normal => self.handle_normal_key(key.code, dialogs),
            Mode::Filtering => {
                self.handle_filter_key(key.code);
                Ok(false)
            }
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode, dialogs: &mut dyn Dialogs) -> Result<bool> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Up => self.controller.move_selection(-1),
            KeyCode::Down => self.controller.move_selection(1),
            KeyCode::PageUp => self.controller.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.controller.move_selection(PAGE_STEP),
            KeyCode::Home => self.controller.select_first(),
            KeyCode::End => self.controller.select_last(),
            KeyCode::Char('/') | KeyCode::Char('f') => {
                debug!("filter focused");
                self.mode = Mode::Filtering;
            }
            KeyCode::Char('a') | KeyCode::Char('+') => self.controller.request_add(dialogs)?,
            KeyCode::Char('e') | KeyCode::Char('m') | KeyCode::Enter => {
                self.controller.request_modify(dialogs)?
            }
            KeyCode::Char('d') | KeyCode::Char('-') | KeyCode::Delete => {
                self.controller.request_delete(dialogs)?
            }
            KeyCode::Char('r') => self.controller.load(dialogs)?,
            _ => {}
        }
        Ok(false)
    }

    fn handle_filter_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.controller.set_filter("");
                self.mode = Mode::Normal;
            }
            KeyCode::Enter => self.mode = Mode::Normal,
            KeyCode::Up => self.controller.move_selection(-1),
            KeyCode::Down => self.controller.move_selection(1),
            KeyCode::Backspace => {
                let mut filter = self.controller.filter().to_string();
                filter.pop();
                self.controller.set_filter(filter);
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                let filter = format!("{}{ch}", self.controller.filter());
                self.controller.set_filter(filter);
            }
            _ => {}
        }
    }

    /// Snapshot of what the main screen currently shows.
    pub(crate) fn table_view(&self) -> TableView {
        TableView::capture(&self.controller, self.mode == Mode::Filtering)
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        render_table_screen(frame, &self.table_view());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Alert;
    use crate::db::SqliteStore;
    use crate::models::Person;
    use crate::testing::{MemoryStore, ScriptedDialogs};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn started(rows: &[(&str, &str, i64)]) -> App<MemoryStore> {
        let mut app = App::new(PersonController::new(MemoryStore::with_rows(rows)));
        app.start(&mut ScriptedDialogs::default()).unwrap();
        app
    }

    fn type_keys(app: &mut App<MemoryStore>, dialogs: &mut ScriptedDialogs, text: &str) {
        for ch in text.chars() {
            assert!(!app.handle_key(press(KeyCode::Char(ch)), dialogs).unwrap());
        }
    }

    #[test]
    fn quit_keys() {
        let mut app = started(&[]);
        let mut dialogs = ScriptedDialogs::default();
        assert!(app.handle_key(press(KeyCode::Char('q')), &mut dialogs).unwrap());
        assert!(app
            .handle_key(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                &mut dialogs
            )
            .unwrap());
    }

    #[test]
    fn typing_in_filter_mode_filters_live() {
        let mut app = started(&[("Ana", "Lopez", 30), ("Carlos", "Ruiz", 40)]);
        let mut dialogs = ScriptedDialogs::default();

        app.handle_key(press(KeyCode::Char('/')), &mut dialogs).unwrap();
        type_keys(&mut app, &mut dialogs, "an");
        assert_eq!(app.controller().filter(), "an");
        assert_eq!(app.controller().visible_len(), 1);

        app.handle_key(press(KeyCode::Backspace), &mut dialogs).unwrap();
        assert_eq!(app.controller().visible_len(), 2);

        app.handle_key(press(KeyCode::Enter), &mut dialogs).unwrap();
        assert!(!app.table_view().filtering);
        assert_eq!(app.controller().filter(), "a");
    }

    #[test]
    fn escape_clears_the_filter() {
        let mut app = started(&[("Ana", "Lopez", 30), ("Carlos", "Ruiz", 40)]);
        let mut dialogs = ScriptedDialogs::default();

        app.handle_key(press(KeyCode::Char('f')), &mut dialogs).unwrap();
        // 'q' is filter text while the filter has focus.
        type_keys(&mut app, &mut dialogs, "qx");
        assert_eq!(app.controller().visible_len(), 0);

        app.handle_key(press(KeyCode::Esc), &mut dialogs).unwrap();
        assert_eq!(app.controller().filter(), "");
        assert_eq!(app.controller().visible_len(), 2);
        assert!(!app.table_view().filtering);
    }

    #[test]
    fn add_key_runs_the_add_flow() {
        let mut app = started(&[("Ana", "Lopez", 30)]);
        let mut dialogs = ScriptedDialogs::default();
        dialogs.edits.push_back(Some(Person::new("Luis", "Diaz", 25)));

        app.handle_key(press(KeyCode::Char('a')), &mut dialogs).unwrap();

        assert_eq!(app.controller().records().len(), 2);
        assert_eq!(dialogs.alerts, [Alert::success("Person added successfully.")]);
    }

    #[test]
    fn navigation_then_delete() {
        let mut app = started(&[("Ana", "Lopez", 30), ("Carlos", "Ruiz", 40)]);
        let mut dialogs = ScriptedDialogs::default();
        dialogs.confirms.push_back(true);

        app.handle_key(press(KeyCode::Down), &mut dialogs).unwrap();
        app.handle_key(press(KeyCode::Down), &mut dialogs).unwrap();
        app.handle_key(press(KeyCode::Char('d')), &mut dialogs).unwrap();

        let names: Vec<_> = app
            .controller()
            .records()
            .iter()
            .map(|p| p.first_name.as_str())
            .collect();
        assert_eq!(names, ["Ana"]);
    }

    #[test]
    fn modify_without_selection_alerts() {
        let mut app = started(&[("Ana", "Lopez", 30)]);
        let mut dialogs = ScriptedDialogs::default();

        app.handle_key(press(KeyCode::Char('e')), &mut dialogs).unwrap();

        assert_eq!(dialogs.alerts, [Alert::error("No person selected.")]);
        assert!(dialogs.edit_requests.is_empty());
    }

    #[test]
    fn reload_picks_up_store_changes() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("personas.sqlite");
        let mut writer = SqliteStore::new(&path);
        writer.insert(&Person::new("Ana", "Lopez", 30)).unwrap();

        let mut app = App::new(PersonController::new(SqliteStore::new(&path)));
        let mut dialogs = ScriptedDialogs::default();
        app.start(&mut dialogs).unwrap();
        assert_eq!(app.controller().records().len(), 1);

        writer.insert(&Person::new("Bea", "Gil", 21)).unwrap();
        app.handle_key(press(KeyCode::Char('r')), &mut dialogs).unwrap();

        assert_eq!(app.controller().records().len(), 2);
        assert!(dialogs.alerts.is_empty());
    }
}
