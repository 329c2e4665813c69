use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::{
    app_data::{AppData, DisplayRow},
    app_error::AppError,
};

use super::color_match::{AMBER, BLUE, GREEN, GREY, PURPLE, RED, WHITE};

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");
const ARROW: &str = "▶ ";
const NO_ARROW: &str = "  ";
const CHECKED: &str = "✓ ";
const UNCHECKED: &str = "☐ ";
const HELP: &str = "↑/↓ or j/k: navigate • space: select/deselect • d: delete selected • q: quit";

/// From a given &str, return the maximum number of chars on a single line
fn max_line_width(text: &str) -> usize {
    text.lines()
        .map(|i| i.chars().count())
        .max()
        .unwrap_or_default()
}

/// One line per row, cursor marker, then either a header title, or a checkbox & the item label
pub fn row_lines(app_data: &AppData) -> Vec<Line<'static>> {
    app_data
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let marker = if index == app_data.cursor() {
                Span::styled(
                    ARROW,
                    Style::default().fg(AMBER).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw(NO_ARROW)
            };
            match row {
                DisplayRow::Header(kind) => Line::from(vec![
                    marker,
                    Span::styled(
                        kind.title(),
                        Style::default().fg(BLUE).add_modifier(Modifier::BOLD),
                    ),
                ]),
                DisplayRow::Item(item) => {
                    let (checkbox, label_style) = if app_data.is_selected(index) {
                        (
                            Span::styled(
                                CHECKED,
                                Style::default().fg(GREEN).add_modifier(Modifier::BOLD),
                            ),
                            Style::default().fg(GREEN),
                        )
                    } else {
                        (
                            Span::styled(UNCHECKED, Style::default().fg(GREY)),
                            Style::default(),
                        )
                    };
                    Line::from(vec![
                        marker,
                        checkbox,
                        Span::styled(format!(" {}", item.label), label_style),
                    ])
                }
            }
        })
        .collect()
}

/// The help line, then at most one of cleaning, success, or error
pub fn status_lines(app_data: &AppData, loading_icon: &str) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(HELP, Style::default().fg(GREY)))];
    if app_data.is_cleaning() {
        lines.push(Line::from(Span::styled(
            format!("{loading_icon} Cleaning up..."),
            Style::default().fg(AMBER).add_modifier(Modifier::BOLD),
        )));
    } else if let Some(success) = app_data.get_success() {
        lines.push(Line::from(Span::styled(
            format!(" ✅ {success} "),
            Style::default().fg(WHITE).bg(GREEN),
        )));
    } else if let Some(error) = app_data.get_error() {
        lines.push(Line::from(Span::styled(
            format!(" ❌ {error} "),
            Style::default().fg(WHITE).bg(RED),
        )));
    }
    lines
}

/// Rows needed to show every status line, once wrapped to the given width
pub fn status_height(app_data: &AppData, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let height = status_lines(app_data, " ")
        .iter()
        .map(|line| (line.width().max(1) + width - 1) / width)
        .sum::<usize>();
    u16::try_from(height).unwrap_or(u16::MAX)
}

/// Draw the rows panel, the list scrolls to keep the cursor visible
pub fn rows<B: Backend>(
    f: &mut Frame<'_, B>,
    area: Rect,
    app_data: &AppData,
    loading_icon: &str,
    is_init: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Span::styled(
            format!(" 🐳 {NAME} v{VERSION} {loading_icon} "),
            Style::default().fg(PURPLE).add_modifier(Modifier::BOLD),
        ));

    if is_init || app_data.rows().is_empty() {
        let paragraph = Paragraph::new(format!("waiting for docker {loading_icon}"))
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
    } else {
        let items = row_lines(app_data)
            .into_iter()
            .map(ListItem::new)
            .collect::<Vec<_>>();
        let mut state = ListState::default();
        state.select(Some(app_data.cursor()));
        f.render_stateful_widget(List::new(items).block(block), area, &mut state);
    }
}

/// Draw the help & status lines
pub fn status<B: Backend>(
    f: &mut Frame<'_, B>,
    area: Rect,
    app_data: &AppData,
    loading_icon: &str,
) {
    let paragraph = Paragraph::new(status_lines(app_data, loading_icon))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Draw an error popup over whole screen
pub fn error<B: Backend>(f: &mut Frame<'_, B>, error: &AppError, seconds: Option<u8>) {
    let block = Block::default()
        .title(" Error ")
        .border_type(BorderType::Rounded)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL);

    let to_push = match error {
        AppError::DockerConnect => {
            format!(
                "\n\n {}::v{} closing in {:02} seconds",
                NAME,
                VERSION,
                seconds.unwrap_or(5)
            )
        }
        _ => String::new(),
    };

    let mut text = format!("\n{error}");
    text.push_str(to_push.as_str());

    // Find the maximum line width & height, and add some margins
    let max_line_width = max_line_width(&text) + 8;
    let lines = text.lines().count() + 3;

    let paragraph = Paragraph::new(text)
        .style(Style::default().bg(RED).fg(WHITE))
        .block(block)
        .alignment(Alignment::Center);

    let area = popup(lines, max_line_width, f.size());
    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

/// draw a box in the centre of the screen, based on max line width + number of lines
fn popup(text_lines: usize, text_width: usize, r: Rect) -> Rect {
    // Make sure blank_space can't be an negative, as will crash
    let calc = |x: u16, y: usize| usize::from(x).saturating_sub(y).saturating_div(2);

    let blank_vertical: u16 = calc(r.height, text_lines).try_into().unwrap_or_default();
    let blank_horizontal: u16 = calc(r.width, text_width).try_into().unwrap_or_default();

    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Max(blank_vertical),
            Constraint::Max(text_lines.try_into().unwrap_or_default()),
            Constraint::Max(blank_vertical),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Max(blank_horizontal),
            Constraint::Max(text_width.try_into().unwrap_or_default()),
            Constraint::Max(blank_horizontal),
        ])
        .split(popup_layout[1])[1]
}
