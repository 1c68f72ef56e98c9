use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::settings::{STYLE_PRESET_LIST, Settings, THEME_PRESET_LIST};

/// One editable row of the settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingItem {
    DefaultWpm,
    DefaultChunkSize,
    WpmStep,
    JumpBackChunks,
    JumpForwardChunks,
    DisplayStyle,
    HighlightStyle,
    ShowSourceText,
    ShowProgressIndicator,
    Theme,
}

impl SettingItem {
    pub fn all() -> &'static [SettingItem] {
        &[
            SettingItem::DefaultWpm,
            SettingItem::DefaultChunkSize,
            SettingItem::WpmStep,
            SettingItem::JumpBackChunks,
            SettingItem::JumpForwardChunks,
            SettingItem::DisplayStyle,
            SettingItem::HighlightStyle,
            SettingItem::ShowSourceText,
            SettingItem::ShowProgressIndicator,
            SettingItem::Theme,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            SettingItem::DefaultWpm => "Default speed",
            SettingItem::DefaultChunkSize => "Default chunk size",
            SettingItem::WpmStep => "Speed step",
            SettingItem::JumpBackChunks => "Jump back",
            SettingItem::JumpForwardChunks => "Jump forward",
            SettingItem::DisplayStyle => "Chunk style",
            SettingItem::HighlightStyle => "Highlight style",
            SettingItem::ShowSourceText => "Show source text",
            SettingItem::ShowProgressIndicator => "Show progress",
            SettingItem::Theme => "Theme",
        }
    }

    pub fn value(&self, settings: &Settings) -> String {
        let on_off = |value: bool| (if value { "On" } else { "Off" }).to_string();
        match self {
            SettingItem::DefaultWpm => format!("{} wpm", settings.default_wpm),
            SettingItem::DefaultChunkSize => settings.default_chunk_size.to_string(),
            SettingItem::WpmStep => format!("{} wpm", settings.wpm_step),
            SettingItem::JumpBackChunks => format!("{} chunks", settings.jump_back_chunks),
            SettingItem::JumpForwardChunks => format!("{} chunks", settings.jump_forward_chunks),
            SettingItem::DisplayStyle => settings.display_style.clone(),
            SettingItem::HighlightStyle => settings.highlight_style.clone(),
            SettingItem::ShowSourceText => on_off(settings.show_source_text),
            SettingItem::ShowProgressIndicator => on_off(settings.show_progress_indicator),
            SettingItem::Theme => settings.theme.clone(),
        }
    }

    /// Keys that change this row.
    pub fn hint(&self) -> &'static str {
        match self {
            SettingItem::DisplayStyle | SettingItem::HighlightStyle => "Enter choose, +/- cycle",
            SettingItem::ShowSourceText | SettingItem::ShowProgressIndicator => "Enter toggle",
            SettingItem::Theme => "Enter or +/- cycle",
            _ => "+/- adjust",
        }
    }

    /// Step a numeric value, flip a switch, or cycle through presets.
    pub fn adjust(&self, settings: &mut Settings, direction: i32) {
        let step_u32 = |value: u32, by: u32| {
            if direction >= 0 {
                value.saturating_add(by)
            } else {
                value.saturating_sub(by).max(1)
            }
        };
        let step_usize = |value: usize| {
            if direction >= 0 {
                value.saturating_add(1)
            } else {
                value.saturating_sub(1).max(1)
            }
        };

        match self {
            SettingItem::DefaultWpm => {
                settings.default_wpm = step_u32(settings.default_wpm, settings.wpm_step)
            }
            SettingItem::DefaultChunkSize => {
                settings.default_chunk_size = step_usize(settings.default_chunk_size)
            }
            SettingItem::WpmStep => settings.wpm_step = step_u32(settings.wpm_step, 10),
            SettingItem::JumpBackChunks => {
                settings.jump_back_chunks = step_usize(settings.jump_back_chunks)
            }
            SettingItem::JumpForwardChunks => {
                settings.jump_forward_chunks = step_usize(settings.jump_forward_chunks)
            }
            SettingItem::DisplayStyle => {
                settings.display_style = cycle(STYLE_PRESET_LIST, &settings.display_style, direction)
            }
            SettingItem::HighlightStyle => {
                settings.highlight_style =
                    cycle(STYLE_PRESET_LIST, &settings.highlight_style, direction)
            }
            SettingItem::ShowSourceText => settings.show_source_text = !settings.show_source_text,
            SettingItem::ShowProgressIndicator => {
                settings.show_progress_indicator = !settings.show_progress_indicator
            }
            SettingItem::Theme => {
                settings.theme = cycle(THEME_PRESET_LIST, &settings.theme, direction)
            }
        }
    }

    pub fn reset(&self, settings: &mut Settings) {
        let defaults = Settings::default();
        match self {
            SettingItem::DefaultWpm => settings.default_wpm = defaults.default_wpm,
            SettingItem::DefaultChunkSize => settings.default_chunk_size = defaults.default_chunk_size,
            SettingItem::WpmStep => settings.wpm_step = defaults.wpm_step,
            SettingItem::JumpBackChunks => settings.jump_back_chunks = defaults.jump_back_chunks,
            SettingItem::JumpForwardChunks => {
                settings.jump_forward_chunks = defaults.jump_forward_chunks
            }
            SettingItem::DisplayStyle => settings.display_style = defaults.display_style,
            SettingItem::HighlightStyle => settings.highlight_style = defaults.highlight_style,
            SettingItem::ShowSourceText => settings.show_source_text = defaults.show_source_text,
            SettingItem::ShowProgressIndicator => {
                settings.show_progress_indicator = defaults.show_progress_indicator
            }
            SettingItem::Theme => settings.theme = defaults.theme,
        }
    }
}

fn cycle(presets: &[&str], current: &str, direction: i32) -> String {
    let len = presets.len();
    let index = presets.iter().position(|p| *p == current).unwrap_or(0);
    let next = if direction >= 0 {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    };
    presets[next].to_string()
}

pub struct SettingsWindow;

impl SettingsWindow {
    /// Names on the left, current values in a column, and the keys for the
    /// selected row after it.
    pub fn render(frame: &mut Frame, area: Rect, settings: &Settings, selected_index: usize) {
        let items = SettingItem::all();
        let name_width = items.iter().map(|item| item.name().len()).max().unwrap_or(0);
        let value_width = items
            .iter()
            .map(|item| item.value(settings).len())
            .max()
            .unwrap_or(0);

        let width = (name_width + value_width + 32) as u16;
        let height = items.len() as u16 + 4;
        let popup_area = super::fitted_popup_area(area, width, height);

        frame.render_widget(Clear, popup_area);
        let block = Block::default().title("Settings").borders(Borders::ALL);
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        let list_items: Vec<ListItem> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let selected = i == selected_index;
                let mut spans = vec![
                    Span::raw(format!(" {:<name_width$}  ", item.name())),
                    Span::styled(
                        format!("{:<value_width$}", item.value(settings)),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                ];
                if selected {
                    spans.push(Span::styled(
                        format!("  {}", item.hint()),
                        Style::default().fg(Color::DarkGray),
                    ));
                }

                let style = if selected {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(spans)).style(style)
            })
            .collect();

        frame.render_widget(List::new(list_items), rows[0]);
        frame.render_widget(
            Paragraph::new(" j/k move | r reset row | q save and close")
                .style(Style::default().fg(Color::DarkGray)),
            rows[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn test_cycle_wraps_both_ways() {
        assert_eq!(cycle(THEME_PRESET_LIST, "auto", 1), "dark");
        assert_eq!(cycle(THEME_PRESET_LIST, "light", 1), "auto");
        assert_eq!(cycle(THEME_PRESET_LIST, "auto", -1), "light");
        assert_eq!(cycle(THEME_PRESET_LIST, "unknown", 1), "dark");
    }

    #[test]
    fn test_adjust_never_drops_below_one() {
        let mut settings = Settings::default();
        settings.jump_back_chunks = 1;
        SettingItem::JumpBackChunks.adjust(&mut settings, -1);
        assert_eq!(settings.jump_back_chunks, 1);

        settings.default_wpm = 20;
        SettingItem::DefaultWpm.adjust(&mut settings, -1);
        assert_eq!(settings.default_wpm, 1);
    }

    #[test]
    fn test_adjust_toggles_and_reset() {
        let mut settings = Settings::default();
        SettingItem::ShowSourceText.adjust(&mut settings, 1);
        assert!(!settings.show_source_text);

        SettingItem::ShowSourceText.reset(&mut settings);
        assert!(settings.show_source_text);

        SettingItem::DefaultWpm.adjust(&mut settings, 1);
        assert_eq!(settings.default_wpm, 350);
    }

    #[test]
    fn test_values_follow_settings() {
        let mut settings = Settings::default();
        assert_eq!(SettingItem::JumpForwardChunks.value(&settings), "5 chunks");
        assert_eq!(SettingItem::ShowSourceText.value(&settings), "On");

        settings.theme = "dark".to_string();
        assert_eq!(SettingItem::Theme.value(&settings), "dark");
    }

    #[test]
    fn test_only_selected_row_shows_hint() {
        let settings = Settings::default();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|f| SettingsWindow::render(f, f.area(), &settings, 7))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let rows: Vec<String> = (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect()
            })
            .collect();

        let source_row = rows.iter().find(|row| row.contains("Show source text")).unwrap();
        assert!(source_row.contains("On"));
        assert!(source_row.contains("Enter toggle"));

        let speed_row = rows.iter().find(|row| row.contains("Default speed")).unwrap();
        assert!(speed_row.contains("300 wpm"));
        assert!(!speed_row.contains("+/- adjust"));
    }
}
