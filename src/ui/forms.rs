use anyhow::{anyhow, Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::Person;

/// Longest age input accepted, in digits.
const MAX_AGE_DIGITS: usize = 3;

/// Internal representation of the person form fields.
#[derive(Debug, Default, Clone)]
pub(crate) struct PersonForm {
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) age: String,
    pub(crate) active: PersonField,
    pub(crate) error: Option<String>,
}

/// Fields available within the person form, in focus order.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub(crate) enum PersonField {
    #[default]
    FirstName,
    LastName,
    Age,
}

/// What the form modal should do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum FormOutcome {
    Open,
    Submit(Person),
    Cancel,
}

impl PersonField {
    pub(crate) const ALL: [PersonField; 3] =
        [PersonField::FirstName, PersonField::LastName, PersonField::Age];

    pub(crate) fn label(self) -> &'static str {
        match self {
            PersonField::FirstName => "Name",
            PersonField::LastName => "Surname",
            PersonField::Age => "Age",
        }
    }

    fn next(self) -> Self {
        match self {
            PersonField::FirstName => PersonField::LastName,
            PersonField::LastName => PersonField::Age,
            PersonField::Age => PersonField::FirstName,
        }
    }

    fn previous(self) -> Self {
        match self {
            PersonField::FirstName => PersonField::Age,
            PersonField::LastName => PersonField::FirstName,
            PersonField::Age => PersonField::LastName,
        }
    }
}

impl PersonForm {
    /// Populate the form from an existing person when modifying.
    pub(crate) fn from_person(person: &Person) -> Self {
        Self {
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            age: person.age.to_string(),
            active: PersonField::FirstName,
            error: None,
        }
    }

    /// Apply one key press. Enter on invalid input keeps the form open and
    /// stores the validation message in `error`.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return FormOutcome::Cancel;
        }
        match key.code {
            KeyCode::Esc => return FormOutcome::Cancel,
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.previous_field(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Enter => match self.parse_inputs() {
                Ok(person) => return FormOutcome::Submit(person),
                Err(err) => self.error = Some(err.to_string()),
            },
            KeyCode::Char(ch) => {
                if self.push_char(ch) {
                    self.error = None;
                }
            }
            _ => {}
        }
        FormOutcome::Open
    }

    pub(crate) fn next_field(&mut self) {
        self.active = self.active.next();
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = self.active.previous();
    }

    /// Append a character to the active field. Names take any printable
    /// character; age only takes digits.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            PersonField::FirstName => self.first_name.push(ch),
            PersonField::LastName => self.last_name.push(ch),
            PersonField::Age => {
                if !ch.is_ascii_digit() || self.age.len() >= MAX_AGE_DIGITS {
                    return false;
                }
                self.age.push(ch);
            }
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.value_mut(self.active).pop();
    }

    /// Validate the inputs and build an unsaved person.
    pub(crate) fn parse_inputs(&self) -> Result<Person> {
        let first_name = self.first_name.trim();
        if first_name.is_empty() {
            return Err(anyhow!("First name is required."));
        }
        let last_name = self.last_name.trim();
        if last_name.is_empty() {
            return Err(anyhow!("Last name is required."));
        }
        let age_raw = self.age.trim();
        if age_raw.is_empty() {
            return Err(anyhow!("Age is required."));
        }
        let age = age_raw
            .parse::<u16>()
            .context("Age must be a whole number.")?;
        Ok(Person::new(first_name, last_name, i64::from(age)))
    }

    pub(crate) fn value(&self, field: PersonField) -> &str {
        match field {
            PersonField::FirstName => &self.first_name,
            PersonField::LastName => &self.last_name,
            PersonField::Age => &self.age,
        }
    }

    fn value_mut(&mut self, field: PersonField) -> &mut String {
        match field {
            PersonField::FirstName => &mut self.first_name,
            PersonField::LastName => &mut self.last_name,
            PersonField::Age => &mut self.age,
        }
    }

    /// Column where the cursor sits when `field` is focused.
    pub(crate) fn cursor_offset(&self, field: PersonField) -> u16 {
        (field_prefix(field).chars().count() + self.value(field).chars().count()) as u16
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: PersonField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(field_prefix(field)),
            Span::styled(display, style),
        ])
    }
}

fn field_prefix(field: PersonField) -> String {
    format!("{}: ", field.label())
}
