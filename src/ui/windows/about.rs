use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::centered_popup_area;

pub struct AboutWindow;

impl AboutWindow {
    pub fn render(frame: &mut Frame, area: Rect) {
        let popup_area = centered_popup_area(area, 60, 50);
        frame.render_widget(Clear, popup_area);

        let lines = vec![
            Line::from(format!("Quick Reader {}", env!("CARGO_PKG_VERSION"))),
            Line::from(""),
            Line::from("Flashes text a few words at a time so you can read"),
            Line::from("faster than by scanning lines."),
            Line::from(""),
            Line::from("Set the pace in words per minute and how many words"),
            Line::from("appear at once. Playback stops at the end of the text."),
            Line::from(""),
            Line::from("Press Esc to go back."),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().title("About").borders(Borders::ALL));
        frame.render_widget(paragraph, popup_area);
    }
}
