use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
};
use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use super::{ApplicationState, Reader};
use crate::models::{MessageType, Page};
use crate::playback::{PlaybackStatus, format_remaining};
use crate::settings::STYLE_PRESET_LIST;
use crate::ui::windows::{
    about::AboutWindow, help::HelpWindow, settings::SettingsWindow,
    style_chooser::StyleChooserWindow,
};

/// Map a style preset name onto a terminal style.
pub fn text_style(name: &str) -> Style {
    let style = Style::default();
    match name {
        "bold" => style.add_modifier(Modifier::BOLD),
        "italic" => style.add_modifier(Modifier::ITALIC),
        "underlined" => style.add_modifier(Modifier::UNDERLINED),
        "reversed" => style.add_modifier(Modifier::REVERSED),
        _ => style,
    }
}

fn theme_style(theme: &str) -> Style {
    match theme {
        "dark" => Style::default().fg(Color::Indexed(252)).bg(Color::Indexed(235)),
        "light" => Style::default().fg(Color::Indexed(238)).bg(Color::Indexed(253)),
        _ => Style::default(),
    }
}

/// Split the source around the byte range `span` into (before, highlighted,
/// after), keeping at most `context` graphemes on either side.
///
/// Only the text near the span is segmented. Line breaks and tabs become
/// spaces so the excerpt flows as one paragraph.
pub fn source_window(
    text: &str,
    span: Option<Range<usize>>,
    context: usize,
) -> (String, String, String) {
    let Some(span) = span.filter(|span| {
        span.start <= span.end
            && text.is_char_boundary(span.start)
            && text.is_char_boundary(span.end)
    }) else {
        let head = text.graphemes(true).take(context.saturating_mul(2));
        return (flatten(head), String::new(), String::new());
    };

    let mut before: Vec<&str> = text[..span.start].graphemes(true).rev().take(context).collect();
    before.reverse();
    let after = text[span.end..].graphemes(true).take(context);

    (
        flatten(before),
        flatten(text[span].graphemes(true)),
        flatten(after),
    )
}

fn flatten<'a>(graphemes: impl IntoIterator<Item = &'a str>) -> String {
    graphemes
        .into_iter()
        .map(|g| match g {
            "\n" | "\r" | "\r\n" | "\t" => " ",
            other => other,
        })
        .collect()
}

fn status_label(status: PlaybackStatus) -> &'static str {
    match status {
        PlaybackStatus::Idle => "Ready",
        PlaybackStatus::Running => "Playing",
        PlaybackStatus::Paused => "Paused",
    }
}

impl Reader {
    pub(super) fn render_static(frame: &mut Frame, state: &ApplicationState) {
        frame.render_widget(
            Block::default().style(theme_style(&state.config.settings.theme)),
            frame.area(),
        );

        Self::render_reader_static(frame, state);

        let settings = &state.config.settings;
        match state.ui_state.router.current() {
            Page::Reader => {}
            Page::Help => HelpWindow::render(
                frame,
                frame.area(),
                &state.config.keymaps,
                state.ui_state.help_scroll_offset,
            ),
            Page::Settings => SettingsWindow::render(
                frame,
                frame.area(),
                settings,
                state.ui_state.settings_selected_index,
            ),
            Page::StyleChooser { target } => {
                // Keep the settings list visible underneath
                SettingsWindow::render(
                    frame,
                    frame.area(),
                    settings,
                    state.ui_state.settings_selected_index,
                );
                let current = match target {
                    crate::models::StyleTarget::Display => &settings.display_style,
                    crate::models::StyleTarget::Highlight => &settings.highlight_style,
                };
                StyleChooserWindow::render(
                    frame,
                    frame.area(),
                    *target,
                    STYLE_PRESET_LIST,
                    current,
                    state.ui_state.chooser_selected_index,
                );
            }
            Page::About => AboutWindow::render(frame, frame.area()),
        }

        if let Some(message) = &state.ui_state.message {
            Self::render_message_static(frame, message, &state.ui_state.message_type);
        }
    }

    fn render_reader_static(frame: &mut Frame, state: &ApplicationState) {
        let settings = &state.config.settings;
        let session = &state.session;
        let frame_area = frame.area();

        let source_height = if settings.show_source_text {
            Constraint::Min(3)
        } else {
            Constraint::Length(0)
        };
        let progress_height = if settings.show_progress_indicator { 1 } else { 0 };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                source_height,
                Constraint::Length(5),
                Constraint::Length(progress_height),
                Constraint::Length(1),
            ])
            .split(frame_area);

        let right_text = format!("{} wpm", session.wpm());
        let header =
            Self::build_header_line(&state.document_title, Some(&right_text), rows[0].width);
        frame.render_widget(
            Paragraph::new(header).style(Style::default().add_modifier(Modifier::DIM)),
            rows[0],
        );

        if settings.show_source_text && rows[2].height > 2 {
            let block = Block::default().borders(Borders::ALL).title("Source");
            let inner = block.inner(rows[2]);
            let context = (inner.width as usize * inner.height as usize) / 2;
            let (before, highlighted, after) =
                source_window(session.source_text(), session.current_span(), context);
            let line = Line::from(vec![
                Span::raw(before),
                Span::styled(highlighted, text_style(&settings.highlight_style)),
                Span::raw(after),
            ]);
            frame.render_widget(
                Paragraph::new(line).block(block).wrap(Wrap { trim: false }),
                rows[2],
            );
        }

        let display_text = session
            .current_chunk()
            .map(|chunk| chunk.text.as_str())
            .unwrap_or("");
        let display = Paragraph::new(vec![
            Line::from(""),
            Line::from(""),
            Line::from(Span::styled(
                display_text.to_string(),
                text_style(&settings.display_style),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(display, rows[3]);

        if settings.show_progress_indicator {
            let total = session.chunks().len();
            let (ratio, label) = match session.current_index() {
                Some(index) if total > 0 => (
                    (index + 1) as f64 / total as f64,
                    format!("Chunk {} of {}", index + 1, total),
                ),
                _ => (0.0, "No text".to_string()),
            };
            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(Color::Cyan))
                .ratio(ratio.clamp(0.0, 1.0))
                .label(label);
            frame.render_widget(gauge, rows[4]);
        }

        let mut status = format!(
            "{} | {} wpm | chunk size {} | {} left",
            status_label(session.status()),
            session.wpm(),
            session.chunk_size(),
            format_remaining(session.remaining()),
        );
        if session.is_locked() {
            status.push_str(" | locked");
        }
        if !state.count_prefix.is_empty() {
            status.push_str(&format!(" | {}", state.count_prefix));
        }
        frame.render_widget(Paragraph::new(status), rows[5]);
    }

    fn build_header_line(title: &str, right_text: Option<&str>, width: u16) -> String {
        let width = width as usize;
        if width == 0 {
            return String::new();
        }

        let mut buffer = vec![' '; width];
        let right_len = right_text.map(|text| text.chars().count()).unwrap_or(0);
        let content_width = if right_len > 0 {
            width.saturating_sub(right_len + 1)
        } else {
            width
        };

        let title_chars: Vec<char> = title.chars().take(content_width).collect();
        let title_start = (content_width.saturating_sub(title_chars.len())) / 2;
        for (i, ch) in title_chars.into_iter().enumerate() {
            if title_start + i < buffer.len() {
                buffer[title_start + i] = ch;
            }
        }

        if let Some(right_text) = right_text {
            let start = width.saturating_sub(right_len);
            for (i, ch) in right_text.chars().enumerate() {
                if start + i < buffer.len() {
                    buffer[start + i] = ch;
                }
            }
        }

        buffer.into_iter().collect()
    }

    fn render_message_static(frame: &mut Frame, message: &str, message_type: &MessageType) {
        let color = match message_type {
            MessageType::Info => Color::Blue,
            MessageType::Warning => Color::Yellow,
            MessageType::Error => Color::Red,
        };

        let message_paragraph = Paragraph::new(message)
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });

        let frame_area = frame.area();
        let area = Rect {
            x: frame_area.x + 2,
            y: frame_area.y + 2,
            width: frame_area.width.saturating_sub(4),
            height: 3.min(frame_area.height.saturating_sub(2)),
        };

        frame.render_widget(Clear, area);
        frame.render_widget(message_paragraph, area);
    }
}
