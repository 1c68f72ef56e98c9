use ratatui::{
    Frame,
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::fitted_popup_area;
use crate::settings::Keymaps;

pub struct HelpWindow;

fn key_label(binding: &str) -> String {
    if binding == " " {
        "Space".to_string()
    } else {
        binding.to_string()
    }
}

impl HelpWindow {
    pub fn lines(keymaps: &Keymaps) -> Vec<String> {
        let row = |keys: String, action: &str| format!("   {:<18}{}", keys, action);

        vec![
            " Playback:".to_string(),
            row(key_label(&keymaps.toggle_play), "Play / Pause"),
            row(key_label(&keymaps.stop), "Stop (rewind and unlock)"),
            row(key_label(&keymaps.restart), "Back to first chunk"),
            row(
                format!("{} / Left", key_label(&keymaps.jump_back)),
                "Jump back",
            ),
            row(
                format!("{} / Right", key_label(&keymaps.jump_forward)),
                "Jump forward",
            ),
            "   <count> before a jump multiplies it".to_string(),
            String::new(),
            " Speed:".to_string(),
            row(
                format!("{} / {}", key_label(&keymaps.wpm_up), key_label(&keymaps.wpm_down)),
                "Words per minute up / down",
            ),
            row(
                format!(
                    "{} / {}",
                    key_label(&keymaps.chunk_size_up),
                    key_label(&keymaps.chunk_size_down)
                ),
                "Chunk size up / down (paused only)",
            ),
            row(key_label(&keymaps.reset_speed), "Reset speed and chunk size"),
            String::new(),
            " Windows:".to_string(),
            row(key_label(&keymaps.settings), "Settings"),
            row(key_label(&keymaps.about), "About"),
            row(key_label(&keymaps.help), "Help"),
            row("Esc".to_string(), "Close window"),
            row(key_label(&keymaps.quit), "Quit / Close window"),
        ]
    }

    pub fn get_total_lines(keymaps: &Keymaps) -> usize {
        Self::lines(keymaps).len()
    }

    pub fn render(frame: &mut Frame, area: Rect, keymaps: &Keymaps, scroll_offset: u16) {
        let help_content: Vec<Line> = Self::lines(keymaps).into_iter().map(Line::from).collect();

        let max_width = help_content.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
        let popup_area = fitted_popup_area(
            area,
            max_width + 4,
            help_content.len() as u16 + 2,
        );

        frame.render_widget(Clear, popup_area);

        let help_paragraph = Paragraph::new(help_content)
            .block(Block::default().title("Help").borders(Borders::ALL))
            .scroll((scroll_offset, 0));

        frame.render_widget(help_paragraph, popup_area);
    }
}
