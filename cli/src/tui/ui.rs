use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::tui::app::{App, InputMode};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    // Header and Main Content Split
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    // Header
    let header = Paragraph::new("SNAPHUNT")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    // Split Content into Left (List) and Right (Detail)
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Percentage(55),
        ])
        .split(main_chunks[1]);

    draw_task_list(f, app, content_chunks[0]);
    draw_detail_view(f, app, content_chunks[1]);

    // Status line
    if let Some(status) = &app.status {
        let line = Paragraph::new(status.as_str()).style(Style::default().fg(Color::Yellow));
        f.render_widget(line, main_chunks[2]);
    }

    // Footer
    let help = match app.input_mode {
        InputMode::Normal => "j/k: Navigate | a: Attach | c: Capture | u: Upload | q: Quit",
        _ => "Enter: Confirm | Esc: Cancel",
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);

    if !matches!(app.input_mode, InputMode::Normal) {
        draw_path_prompt(f, app, size);
    }
}

fn draw_task_list(f: &mut Frame, app: &mut App, area: Rect) {
    let uploading = app.uploading_task();
    let rows: Vec<Row> = app.tasks.iter().map(|task| {
        let status_icon = if task.completed { "✔" } else { "☐" };

        let upload_cell = if uploading == Some(task.id) {
            Span::styled("...", Style::default().fg(Color::Yellow))
        } else if task.uploaded {
            Span::styled("sent", Style::default().fg(Color::Green))
        } else {
            Span::raw("-")
        };

        let location_icon = if task.location.is_some() { "@" } else { " " };

        let mut title_style = Style::default().add_modifier(Modifier::BOLD);
        if task.completed {
            title_style = title_style.add_modifier(Modifier::CROSSED_OUT);
        }

        Row::new(vec![
            Span::raw(status_icon),
            upload_cell,
            Span::raw(location_icon),
            Span::styled(task.title.clone(), title_style),
        ])
    }).collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),  // Status
            Constraint::Length(5),  // Upload
            Constraint::Length(2),  // Location
            Constraint::Min(10),    // Title
        ]
    )
    .header(Row::new(vec!["St", "Up", "Lo", "Task"]).style(Style::default().fg(Color::Yellow)))
    .block(Block::default().title(" Hunt ").borders(Borders::ALL).border_type(BorderType::Rounded))
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_detail_view(f: &mut Frame, app: &App, area: Rect) {
    let uploading = app.uploading_task();
    if let Some(task) = app.selected() {
        let mut detail_text = vec![
            Line::from(vec![
                Span::styled("Title: ", Style::default().fg(Color::Blue)),
                Span::styled(&task.title, Style::default().add_modifier(Modifier::BOLD)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("ID: ", Style::default().fg(Color::DarkGray)),
                Span::raw(task.id.to_string()),
            ]),
            Line::from(vec![
                Span::styled("Goal: ", Style::default().fg(Color::Blue)),
                Span::raw(task.description.as_str()),
            ]),
            Line::from(""),
        ];

        if task.completed {
            if let (Some(size), Some(source)) = (task.photo_size, task.photo_source) {
                detail_text.push(Line::from(vec![
                    Span::styled("Photo: ", Style::default().fg(Color::Blue)),
                    Span::raw(format!("{} via {}", human_size(size), source)),
                ]));
            }
            if let Some(at) = task.attached_at {
                detail_text.push(Line::from(vec![
                    Span::styled("Attached: ", Style::default().fg(Color::Blue)),
                    Span::raw(DateTime::<Local>::from(at).format("%Y-%m-%d %H:%M").to_string()),
                ]));
            }
            detail_text.push(Line::from(vec![
                Span::styled("Location: ", Style::default().fg(Color::Blue)),
                match task.location {
                    Some(c) => Span::raw(c.to_string()),
                    None => Span::styled("none recorded", Style::default().fg(Color::DarkGray)),
                },
            ]));
            detail_text.push(Line::from(""));

            if uploading == Some(task.id) {
                detail_text.push(Line::from(Span::styled(
                    "Uploading...",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
            } else if task.uploaded {
                detail_text.push(Line::from(Span::styled(
                    "✔ Photo uploaded!",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )));
                if let Some(c) = task.location {
                    detail_text.push(Line::from(""));
                    detail_text.push(Line::from(Span::styled(
                        "Map:",
                        Style::default().fg(Color::Blue),
                    )));
                    detail_text.push(Line::from(crate::osm_url(c)));
                }
            } else {
                detail_text.push(Line::from(Span::styled(
                    "Press u to upload",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        } else {
            detail_text.push(Line::from(Span::styled(
                "No photo yet. Press a to attach from the library, c to capture.",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let detail_block = Paragraph::new(detail_text)
            .block(Block::default().title(" Detail ").borders(Borders::ALL).border_type(BorderType::Rounded))
            .wrap(Wrap { trim: true });

        f.render_widget(detail_block, area);
    } else {
        let detail_block = Block::default().title(" Detail ").borders(Borders::ALL).border_type(BorderType::Rounded);
        f.render_widget(detail_block, area);
    }
}

fn draw_path_prompt(f: &mut Frame, app: &App, size: Rect) {
    let title = match app.input_mode {
        InputMode::AttachPath => " Library photo path ",
        InputMode::CapturePath => " Camera capture path ",
        InputMode::Normal => return,
    };

    let area = centered_rect(60, 3, size);
    f.render_widget(Clear, area);
    let prompt = Paragraph::new(app.input.as_str())
        .block(Block::default().title(title).borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(prompt, area);

    let cursor_x = (area.x + 1 + app.cursor_position as u16)
        .min(area.x + area.width.saturating_sub(2));
    f.set_cursor_position((cursor_x, area.y + 1));
}

/// A `percent_x` wide, `height` tall rectangle centered in `r`.
fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(height),
            Constraint::Min(1),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Compact byte count for the detail pane.
fn human_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_size_picks_sensible_units() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(412), "412 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(1536), "1.5 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn centered_rect_stays_inside_the_area() {
        let area = Rect::new(0, 0, 100, 30);
        let rect = centered_rect(60, 3, area);
        assert_eq!(rect.height, 3);
        assert!(rect.width <= 60);
        assert!(rect.x >= 19 && rect.x <= 21);
        assert!(rect.y > 0 && rect.y + rect.height < 30);
    }
}
