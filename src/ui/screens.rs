use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::controller::PersonController;
use crate::db::PersonStore;
use crate::models::Person;

use super::helpers::key_hints;

/// Height of the filter bar above the table.
const FILTER_HEIGHT: u16 = 3;
/// Footer space reserved for key hints.
const FOOTER_HEIGHT: u16 = 2;

/// Everything needed to draw the main screen. Built from the controller each
/// frame; modals keep a copy so they can repaint the screen behind them.
#[derive(Debug, Clone, Default)]
pub(crate) struct TableView {
    pub(crate) rows: Vec<Person>,
    pub(crate) selected: Option<usize>,
    pub(crate) filter: String,
    pub(crate) filtering: bool,
    pub(crate) total: usize,
}

impl TableView {
    pub(crate) fn capture<S: PersonStore>(controller: &PersonController<S>, filtering: bool) -> Self {
        Self {
            rows: controller.visible_records().into_iter().cloned().collect(),
            selected: controller.selected_index(),
            filter: controller.filter().to_string(),
            filtering,
            total: controller.records().len(),
        }
    }

    /// Swap in a new list while keeping the filter bar as captured.
    pub(crate) fn apply_list(&mut self, visible: &[&Person], selected: Option<usize>, total: usize) {
        self.rows = visible.iter().map(|&person| person.clone()).collect();
        self.selected = selected;
        self.total = total;
    }
}

/// Draw the filter bar, the person table and the footer.
pub(crate) fn render_table_screen(frame: &mut Frame, view: &TableView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FILTER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(frame.area());

    draw_filter_bar(frame, chunks[0], view);
    draw_person_table(frame, chunks[1], view);
    draw_footer(frame, chunks[2], view);
}

fn draw_filter_bar(frame: &mut Frame, area: Rect, view: &TableView) {
    let border_style = if view.filtering {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title("Filter by name")
        .borders(Borders::ALL)
        .border_style(border_style);
    let text = if view.filter.is_empty() && !view.filtering {
        Span::styled("press / to filter", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(view.filter.clone())
    };
    frame.render_widget(Paragraph::new(text).block(block.clone()), area);

    if view.filtering {
        let inner = block.inner(area);
        let cursor_x = inner.x + view.filter.chars().count() as u16;
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
    }
}

fn draw_person_table(frame: &mut Frame, area: Rect, view: &TableView) {
    let title = if view.filter.is_empty() {
        format!("Persons ({})", view.total)
    } else {
        format!("Persons ({} of {})", view.rows.len(), view.total)
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    if view.rows.is_empty() {
        let message = if view.total == 0 {
            "No persons yet. Press 'a' to add one."
        } else {
            "No persons match the current filter."
        };
        let paragraph = Paragraph::new(message)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(["Name", "Surname", "Age"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    let rows = view.rows.iter().map(|person| {
        Row::new([
            Cell::from(person.first_name.clone()),
            Cell::from(person.last_name.clone()),
            Cell::from(person.age.to_string()),
        ])
    });
    let widths = [
        Constraint::Percentage(40),
        Constraint::Percentage(45),
        Constraint::Percentage(15),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(view.selected);
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_footer(frame: &mut Frame, area: Rect, view: &TableView) {
    let hints = if view.filtering {
        key_hints(&[
            ("type", "Filter"),
            ("Enter", "Done"),
            ("Esc", "Clear"),
            ("↑↓", "Navigate"),
        ])
    } else {
        key_hints(&[
            ("↑↓", "Navigate"),
            ("/", "Filter"),
            ("a", "Add"),
            ("e", "Modify"),
            ("d", "Delete"),
            ("r", "Reload"),
            ("q", "Quit"),
        ])
    };
    let paragraph = Paragraph::new(vec![Line::from(""), hints]).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;

    fn render(view: &TableView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 14)).expect("test terminal");
        terminal
            .draw(|frame| render_table_screen(frame, view))
            .expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn table_lists_visible_rows_and_counts() {
        let view = TableView {
            rows: vec![Person::new("Ana", "Lopez", 30).with_id(1)],
            selected: Some(0),
            filter: "an".to_string(),
            filtering: false,
            total: 2,
        };
        let screen = render(&view);
        assert!(screen.contains("Persons (1 of 2)"));
        assert!(screen.contains("Surname"));
        assert!(screen.contains("Ana"));
        assert!(screen.contains("Lopez"));
        assert!(!screen.contains("Carlos"));
    }

    #[test]
    fn applied_list_replaces_rows_but_keeps_filter() {
        let ana = Person::new("Ana", "Lopez", 30).with_id(1);
        let carlos = Person::new("Carlos", "Ruiz", 40).with_id(2);
        let mut view = TableView {
            rows: vec![ana.clone(), carlos],
            selected: Some(1),
            filter: "a".to_string(),
            filtering: true,
            total: 2,
        };

        view.apply_list(&[&ana], Some(0), 1);

        assert_eq!(view.rows, [ana]);
        assert_eq!(view.selected, Some(0));
        assert_eq!(view.total, 1);
        assert_eq!(view.filter, "a");
        assert!(view.filtering);
        assert!(!render(&view).contains("Carlos"));
    }

    #[test]
    fn empty_table_explains_itself() {
        let screen = render(&TableView::default());
        assert!(screen.contains("No persons yet."));

        let filtered = TableView {
            filter: "zz".to_string(),
            total: 3,
            ..TableView::default()
        };
        assert!(render(&filtered).contains("No persons match the current filter."));
    }
}
