use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem},
};

use super::fitted_popup_area;
use crate::models::StyleTarget;
use crate::ui::reader::text_style;

pub struct StyleChooserWindow;

impl StyleChooserWindow {
    pub fn title(target: StyleTarget) -> &'static str {
        match target {
            StyleTarget::Display => "Chunk style",
            StyleTarget::Highlight => "Highlight style",
        }
    }

    /// Each entry is drawn in the style it names.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        target: StyleTarget,
        styles: &[&str],
        current: &str,
        selected_index: usize,
    ) {
        let width = styles.iter().map(|s| s.len()).max().unwrap_or(0) as u16 + 8;
        let width = width.max(Self::title(target).len() as u16 + 4);
        let popup_area = fitted_popup_area(area, width, styles.len() as u16 + 2);

        frame.render_widget(Clear, popup_area);

        let items: Vec<ListItem> = styles
            .iter()
            .enumerate()
            .map(|(i, &name)| {
                let marker = if name == current { "* " } else { "  " };
                let line = Line::from(format!("{}{}", marker, name)).style(text_style(name));
                let style = if i == selected_index {
                    Style::default().bg(Color::Blue).fg(Color::White)
                } else {
                    Style::default()
                };
                ListItem::new(line).style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title(Self::title(target))
                .borders(Borders::ALL),
        );
        frame.render_widget(list, popup_area);
    }
}
