//! ratatui rendering for the two viewer screens.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use missive_core::reveal::EnvelopePhase;

use super::app::ViewerApp;

const ENVELOPE_ART: &str = "\
 ______________________
|\\                    /|
| \\                  / |
|  \\                /  |
|   \\______________/   |
|                      |
|______________________|";

pub fn draw(frame: &mut Frame, app: &ViewerApp) {
    if app.envelope_phase() == EnvelopePhase::Open {
        draw_letter(frame, app);
    } else {
        draw_envelope(frame, app);
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn draw_envelope(frame: &mut Frame, app: &ViewerApp) {
    let hint = match app.envelope_phase() {
        EnvelopePhase::Closed => "press Enter to open",
        EnvelopePhase::Opening | EnvelopePhase::Open => "opening...",
    };

    let mut lines: Vec<Line> = ENVELOPE_ART.lines().map(Line::from).collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("A letter for {}", app.letter.recipient_name),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        hint,
        Style::default().fg(Color::DarkGray),
    )));

    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX) + 2;
    let area = centered_rect(frame.area(), 40, height);
    let envelope = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("missive"));
    frame.render_widget(envelope, area);
}

fn draw_letter(frame: &mut Frame, app: &ViewerApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let header_lines = vec![
        Line::from(Span::styled(
            app.letter.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("To {}", app.letter.recipient_name)),
    ];
    let header = Paragraph::new(header_lines)
        .block(Block::default().borders(Borders::BOTTOM))
        .wrap(Wrap { trim: false });
    frame.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = app
        .items
        .iter()
        .map(|item| {
            let mut lines = vec![Line::from(Span::styled(
                item.label.clone(),
                Style::default().fg(Color::Cyan),
            ))];
            if app.is_unlocked(item) {
                lines.extend(item.body.iter().cloned().map(Line::from));
            } else if item.key.is_some() {
                lines.push(Line::from(Span::styled(
                    "  [ hidden, press Enter to reveal ]",
                    Style::default().fg(Color::DarkGray),
                )));
            } else {
                lines.push(Line::from(Span::styled(
                    "  [ sealed ]",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            lines.push(Line::from(""));
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, chunks[1], &mut list_state);

    let footer = Paragraph::new("j/k move   Enter reveal   q quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[2]);
}
