mod render;

use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::config::Config;
use crate::logging;
use crate::models::{Document, MessageType, Page, Router, StyleTarget};
use crate::playback::PlaybackState;
use crate::settings::{Keymaps, STYLE_PRESET_LIST};
use crate::timer::{DeadlineTimer, TimerToken};
use crate::ui::windows::help::HelpWindow;
use crate::ui::windows::settings::SettingItem;

pub use render::{source_window, text_style};

const MESSAGE_LIFETIME: Duration = Duration::from_secs(3);
const IDLE_POLL: Duration = Duration::from_secs(60);

/// Everything the reader screen shows, independent of the terminal.
pub struct ApplicationState {
    pub session: PlaybackState<DeadlineTimer>,
    pub config: Config,
    pub document_title: String,
    pub ui_state: UiState,
    pub should_quit: bool,
    pub count_prefix: String, // For jump repetition (e.g., "3l")
    dirty: Rc<Cell<bool>>,
}

impl ApplicationState {
    pub fn new(config: Config, document: Document) -> Self {
        let mut session = PlaybackState::with_text(
            DeadlineTimer::new(),
            document.text,
            config.settings.default_chunk_size,
            config.settings.default_wpm,
        );

        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);
        session.subscribe(move |_| flag.set(true));

        Self {
            session,
            config,
            document_title: document.title,
            ui_state: UiState::new(),
            should_quit: false,
            count_prefix: String::new(),
            dirty,
        }
    }

    /// True once after any playback change since the last call.
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    /// How long the event loop may wait for input.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        let timer = self.session.scheduler().time_until_due(now);
        let message = self
            .ui_state
            .message_time
            .map(|t| MESSAGE_LIFETIME.saturating_sub(now.saturating_duration_since(t)));

        [timer, message]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(IDLE_POLL)
    }

    pub fn on_timer(&mut self, token: TimerToken) {
        let was_running = self.session.is_running();
        self.session.on_timer(token);
        if was_running && !self.session.is_running() {
            self.ui_state
                .set_message("Finished".to_string(), MessageType::Info);
        }
    }

    fn repeat_count(&self) -> usize {
        self.count_prefix.parse().unwrap_or(1).max(1)
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> eyre::Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        if self.ui_state.message.is_some() && *self.ui_state.router.current() == Page::Reader {
            self.ui_state.clear_message();
        }

        // Only the reader page takes a count prefix
        if *self.ui_state.router.current() == Page::Reader {
            if let KeyCode::Char(c) = key.code {
                if c.is_ascii_digit() && !(c == '0' && self.count_prefix.is_empty()) {
                    if self.count_prefix.len() < 6 {
                        self.count_prefix.push(c);
                    }
                    return Ok(());
                }
            }
        }

        match self.ui_state.router.current().clone() {
            Page::Reader => self.handle_reader_keys(key),
            Page::Help => self.handle_help_keys(key),
            Page::Settings => self.handle_settings_keys(key)?,
            Page::StyleChooser { target } => self.handle_style_chooser_keys(key, target),
            Page::About => self.handle_modal_close_keys(key),
        }

        self.count_prefix.clear();
        Ok(())
    }

    fn handle_reader_keys(&mut self, key: KeyEvent) {
        let count = self.repeat_count();
        let settings = &self.config.settings;
        let back = settings.jump_back_chunks.saturating_mul(count);
        let forward = settings.jump_forward_chunks.saturating_mul(count);
        let step = settings.wpm_step;

        let c = match key.code {
            KeyCode::Left => return self.session.jump_back(back),
            KeyCode::Right => return self.session.jump_forward(forward),
            KeyCode::Esc => return self.session.pause(),
            KeyCode::Char(c) => c,
            _ => return,
        };

        let keymaps = &self.config.keymaps;
        if Keymaps::matches(&keymaps.toggle_play, c) {
            self.session.toggle();
        } else if Keymaps::matches(&keymaps.stop, c) {
            self.session.stop();
        } else if Keymaps::matches(&keymaps.restart, c) {
            self.session.restart();
        } else if Keymaps::matches(&keymaps.jump_back, c) {
            self.session.jump_back(back);
        } else if Keymaps::matches(&keymaps.jump_forward, c) {
            self.session.jump_forward(forward);
        } else if Keymaps::matches(&keymaps.wpm_up, c) {
            self.session.set_wpm(self.session.wpm().saturating_add(step));
        } else if Keymaps::matches(&keymaps.wpm_down, c) {
            self.session.set_wpm(self.session.wpm().saturating_sub(step));
        } else if Keymaps::matches(&keymaps.chunk_size_up, c) {
            let size = self.session.chunk_size() + 1;
            self.change_chunk_size(size);
        } else if Keymaps::matches(&keymaps.chunk_size_down, c) {
            let size = self.session.chunk_size().saturating_sub(1);
            self.change_chunk_size(size);
        } else if Keymaps::matches(&keymaps.reset_speed, c) {
            self.session.reset_speed();
            if self.session.chunk_size() != crate::playback::DEFAULT_CHUNK_SIZE {
                self.warn_locked();
            }
        } else if Keymaps::matches(&keymaps.settings, c) {
            self.ui_state.router.push(Page::Settings);
        } else if Keymaps::matches(&keymaps.about, c) {
            self.ui_state.router.push(Page::About);
        } else if Keymaps::matches(&keymaps.help, c) {
            self.ui_state.help_scroll_offset = 0;
            self.ui_state.router.push(Page::Help);
        } else if Keymaps::matches(&keymaps.quit, c) {
            self.should_quit = true;
        }
    }

    fn change_chunk_size(&mut self, size: usize) {
        if size == 0 || size == self.session.chunk_size() {
            return;
        }
        if !self.session.set_chunk_size(size) {
            self.warn_locked();
        }
    }

    fn warn_locked(&mut self) {
        self.ui_state.set_message(
            "Chunk size is locked while playing".to_string(),
            MessageType::Warning,
        );
    }

    fn handle_help_keys(&mut self, key: KeyEvent) {
        let max_offset = HelpWindow::get_total_lines(&self.config.keymaps).saturating_sub(1) as u16;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
                self.ui_state.router.pop();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.ui_state.help_scroll_offset =
                    self.ui_state.help_scroll_offset.saturating_add(1).min(max_offset);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.ui_state.help_scroll_offset = self.ui_state.help_scroll_offset.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn handle_modal_close_keys(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter) {
            self.ui_state.router.pop();
        }
    }

    fn handle_settings_keys(&mut self, key: KeyEvent) -> eyre::Result<()> {
        let selected = SettingItem::all().get(self.ui_state.settings_selected_index).copied();

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.ui_state.router.pop();
                if let Err(err) = self.config.save() {
                    logging::error(format!("could not save configuration: {}", err));
                    self.ui_state.set_message(
                        format!("Could not save settings: {}", err),
                        MessageType::Error,
                    );
                }
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let max_index = SettingItem::all().len().saturating_sub(1);
                self.ui_state.settings_selected_index =
                    (self.ui_state.settings_selected_index + 1).min(max_index);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.ui_state.settings_selected_index =
                    self.ui_state.settings_selected_index.saturating_sub(1);
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('l') | KeyCode::Right => {
                if let Some(item) = selected {
                    item.adjust(&mut self.config.settings, 1);
                }
            }
            KeyCode::Char('-') | KeyCode::Char('h') | KeyCode::Left => {
                if let Some(item) = selected {
                    item.adjust(&mut self.config.settings, -1);
                }
            }
            KeyCode::Enter => match selected {
                Some(SettingItem::DisplayStyle) => self.open_style_chooser(StyleTarget::Display),
                Some(SettingItem::HighlightStyle) => {
                    self.open_style_chooser(StyleTarget::Highlight)
                }
                Some(item) => item.adjust(&mut self.config.settings, 1),
                None => {}
            },
            KeyCode::Char('r') => {
                if let Some(item) = selected {
                    item.reset(&mut self.config.settings);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn open_style_chooser(&mut self, target: StyleTarget) {
        let current = match target {
            StyleTarget::Display => &self.config.settings.display_style,
            StyleTarget::Highlight => &self.config.settings.highlight_style,
        };
        self.ui_state.chooser_selected_index = STYLE_PRESET_LIST
            .iter()
            .position(|style| style == current)
            .unwrap_or(0);
        self.ui_state.router.push(Page::StyleChooser { target });
    }

    fn handle_style_chooser_keys(&mut self, key: KeyEvent, target: StyleTarget) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.ui_state.router.pop();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.ui_state.chooser_selected_index = (self.ui_state.chooser_selected_index + 1)
                    .min(STYLE_PRESET_LIST.len() - 1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.ui_state.chooser_selected_index =
                    self.ui_state.chooser_selected_index.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(style) = STYLE_PRESET_LIST.get(self.ui_state.chooser_selected_index) {
                    let setting = match target {
                        StyleTarget::Display => &mut self.config.settings.display_style,
                        StyleTarget::Highlight => &mut self.config.settings.highlight_style,
                    };
                    *setting = style.to_string();
                }
                self.ui_state.router.pop();
            }
            _ => {}
        }
    }
}

/// UI-specific state management
#[derive(Debug, Clone)]
pub struct UiState {
    pub router: Router,
    pub settings_selected_index: usize,
    pub chooser_selected_index: usize,
    pub help_scroll_offset: u16,
    pub message: Option<String>,
    pub message_type: MessageType,
    pub message_time: Option<Instant>,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            settings_selected_index: 0,
            chooser_selected_index: 0,
            help_scroll_offset: 0,
            message: None,
            message_type: MessageType::Info,
            message_time: None,
        }
    }

    pub fn set_message(&mut self, message: String, message_type: MessageType) {
        self.message = Some(message);
        self.message_type = message_type;
        self.message_time = Some(Instant::now());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
        self.message_time = None;
    }

    /// Returns true if the current message has expired (older than 3 seconds).
    pub fn message_expired(&self) -> bool {
        self.message_time
            .is_some_and(|t| t.elapsed() >= MESSAGE_LIFETIME)
    }
}

/// Main reader application struct
pub struct Reader {
    state: ApplicationState,
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Reader {
    pub fn new(state: ApplicationState) -> eyre::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self { state, terminal })
    }

    /// Run the main application loop
    pub fn run(&mut self) -> eyre::Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
        self.terminal.clear()?;
        self.terminal.hide_cursor()?;

        let result = self.event_loop();

        self.state.session.pause();

        // Cleanup terminal even if the loop failed
        self.terminal.show_cursor()?;
        crossterm::execute!(io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
        crossterm::terminal::disable_raw_mode()?;

        result
    }

    fn event_loop(&mut self) -> eyre::Result<()> {
        let mut needs_draw = true;

        while !self.state.should_quit {
            if self.state.ui_state.message_expired() {
                self.state.ui_state.clear_message();
                needs_draw = true;
            }

            if let Some(token) = self
                .state
                .session
                .scheduler_mut()
                .poll_expired(Instant::now())
            {
                self.state.on_timer(token);
            }

            if self.state.take_dirty() || needs_draw {
                let state = &self.state;
                self.terminal.draw(|f| Self::render_static(f, state))?;
                needs_draw = false;
            }

            let timeout = self.state.poll_timeout(Instant::now());
            if !crossterm::event::poll(timeout)? {
                continue;
            }

            match crossterm::event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    self.state.handle_key_event(key)?;
                    needs_draw = true;
                }
                Event::Resize(_, _) => needs_draw = true,
                _ => {}
            }
        }

        logging::info("reader closed");
        Ok(())
    }
}
