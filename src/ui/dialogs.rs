//! Terminal implementation of the controller's modal dialogs. Each dialog
//! runs its own draw/read loop on the UI thread and only returns once the
//! user has answered, which gives the same blocking feel as a native modal
//! window. The main screen snapshot is repainted underneath every frame.

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::controller::{Alert, AlertKind, Dialogs};
use crate::models::Person;

use super::forms::{FormOutcome, PersonField, PersonForm};
use super::helpers::centered_rect;
use super::screens::{render_table_screen, TableView};
use super::terminal::{next_key, Tui};

pub(crate) struct TerminalDialogs<'t> {
    terminal: &'t mut Tui,
    backdrop: TableView,
}

impl<'t> TerminalDialogs<'t> {
    pub(crate) fn new(terminal: &'t mut Tui, backdrop: TableView) -> Self {
        Self { terminal, backdrop }
    }

    fn draw(&mut self, popup: impl FnOnce(&mut Frame)) -> Result<()> {
        let backdrop = &self.backdrop;
        self.terminal
            .draw(|frame| {
                render_table_screen(frame, backdrop);
                popup(frame);
            })
            .context("failed to draw dialog")?;
        Ok(())
    }
}

impl Dialogs for TerminalDialogs<'_> {
    fn edit_person(&mut self, title: &str, initial: Option<&Person>) -> Result<Option<Person>> {
        let mut form = initial.map(PersonForm::from_person).unwrap_or_default();

        loop {
            self.draw(|frame| draw_person_form(frame, title, &form))?;

            let Some(key) = next_key()? else {
                continue;
            };
            match form.handle_key(key) {
                FormOutcome::Open => {}
                FormOutcome::Submit(person) => return Ok(Some(person)),
                FormOutcome::Cancel => return Ok(None),
            }
        }
    }

    fn confirm(&mut self, title: &str, message: &str) -> Result<bool> {
        loop {
            self.draw(|frame| draw_confirm(frame, title, message))?;

            if let Some(answer) = next_key()?.and_then(|key| confirm_answer(key.code)) {
                return Ok(answer);
            }
        }
    }

    fn alert(&mut self, alert: Alert) -> Result<()> {
        loop {
            self.draw(|frame| draw_alert(frame, &alert))?;

            if next_key()?.is_some() {
                return Ok(());
            }
        }
    }

    fn list_changed(&mut self, visible: &[&Person], selected: Option<usize>, total: usize) {
        self.backdrop.apply_list(visible, selected, total);
    }
}

/// Map a key in the confirmation popup to an answer; other keys are ignored.
fn confirm_answer(code: KeyCode) -> Option<bool> {
    match code {
        KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => Some(true),
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => Some(false),
        _ => None,
    }
}

fn popup_block(title: &str, area: Rect, frame: &mut Frame, border: Style) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(border);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

fn draw_person_form(frame: &mut Frame, title: &str, form: &PersonForm) {
    let popup_area = centered_rect(60, 40, frame.area());
    let inner = popup_block(title, popup_area, frame, Style::default());

    let mut lines: Vec<Line> = PersonField::ALL
        .iter()
        .map(|&field| form.build_line(field))
        .collect();
    lines.push(Line::from(""));

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Enter to save • Tab to switch • Esc to cancel",
            Style::default().fg(Color::Gray),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);

    let row = PersonField::ALL
        .iter()
        .position(|&field| field == form.active)
        .unwrap_or(0) as u16;
    frame.set_cursor_position((inner.x + form.cursor_offset(form.active), inner.y + row));
}

fn draw_confirm(frame: &mut Frame, title: &str, message: &str) {
    let popup_area = centered_rect(50, 30, frame.area());
    let inner = popup_block(title, popup_area, frame, Style::default());

    let lines = vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press Y to confirm or N / Esc to cancel.",
            Style::default().fg(Color::Gray),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}

fn draw_alert(frame: &mut Frame, alert: &Alert) {
    let accent = match alert.kind {
        AlertKind::Success => Color::Green,
        AlertKind::Error => Color::Red,
    };
    let popup_area = centered_rect(50, 30, frame.area());
    let inner = popup_block(&alert.title, popup_area, frame, Style::default().fg(accent));

    let lines = vec![
        Line::from(Span::styled(
            alert.message.clone(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to continue.",
            Style::default().fg(Color::Gray),
        )),
    ];
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}
