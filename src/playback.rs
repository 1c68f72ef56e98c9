use std::ops::Range;
use std::time::Duration;

use crate::logging;
use crate::splitter::{self, TextChunk};
use crate::timer::{Scheduler, TimerToken};

pub const DEFAULT_TEXT: &str =
    r#"Welcome to "Quick Reader". Press start to begin reading quickly."#;
pub const DEFAULT_WPM: u32 = 300;
pub const DEFAULT_CHUNK_SIZE: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Read-only view handed to subscribers after every committed change.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub current_index: Option<usize>,
    pub chunks: &'a [TextChunk],
    pub is_running: bool,
    pub is_locked: bool,
    pub wpm: u32,
    pub chunk_size: usize,
}

impl<'a> Snapshot<'a> {
    pub fn current_chunk(&self) -> Option<&'a TextChunk> {
        self.current_index.and_then(|index| self.chunks.get(index))
    }
}

type Subscriber = Box<dyn FnMut(&Snapshot<'_>)>;

/// How long a chunk of `word_count` words stays on screen at `wpm`.
pub fn chunk_duration(word_count: usize, wpm: u32) -> Duration {
    Duration::from_secs(60 * word_count as u64) / wpm.max(1)
}

pub fn format_remaining(duration: Duration) -> String {
    let seconds = duration.as_secs();
    format!("{}m {}s", seconds / 60, seconds % 60)
}

/// Reading session: the chunked text, the position in it and the timer that
/// moves the position forward.
///
/// Every method runs on the owning thread and never fails. Invalid input is
/// clamped and operations that are not allowed in the current state are
/// ignored.
pub struct PlaybackState<S: Scheduler> {
    source_text: String,
    chunk_size: usize,
    chunks: Vec<TextChunk>,
    // Byte range of each chunk in `source_text`
    spans: Vec<Range<usize>>,
    current_index: usize,
    wpm: u32,
    is_running: bool,
    is_locked: bool,
    scheduler: S,
    armed: Option<TimerToken>,
    generation: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl<S: Scheduler> PlaybackState<S> {
    pub fn new(scheduler: S) -> Self {
        Self::with_text(scheduler, DEFAULT_TEXT, DEFAULT_CHUNK_SIZE, DEFAULT_WPM)
    }

    pub fn with_text(
        scheduler: S,
        text: impl Into<String>,
        chunk_size: usize,
        wpm: u32,
    ) -> Self {
        let source_text = text.into();
        let chunk_size = chunk_size.max(1);
        let (chunks, spans) = splitter::split_spans(&source_text, chunk_size)
            .into_iter()
            .unzip();

        Self {
            source_text,
            chunk_size,
            chunks,
            spans,
            current_index: 0,
            wpm: wpm.max(1),
            is_running: false,
            is_locked: false,
            scheduler,
            armed: None,
            generation: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn chunks(&self) -> &[TextChunk] {
        &self.chunks
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn wpm(&self) -> u32 {
        self.wpm
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    /// `None` when there is nothing to show.
    pub fn current_index(&self) -> Option<usize> {
        (!self.chunks.is_empty()).then_some(self.current_index)
    }

    pub fn current_chunk(&self) -> Option<&TextChunk> {
        self.chunks.get(self.current_index)
    }

    /// Byte range of the current chunk in `source_text`.
    pub fn current_span(&self) -> Option<Range<usize>> {
        self.spans.get(self.current_index).cloned()
    }

    pub fn status(&self) -> PlaybackStatus {
        if self.is_running {
            PlaybackStatus::Running
        } else if self.chunks.is_empty() || self.current_index == 0 {
            PlaybackStatus::Idle
        } else {
            PlaybackStatus::Paused
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            current_index: self.current_index(),
            chunks: &self.chunks,
            is_running: self.is_running,
            is_locked: self.is_locked,
            wpm: self.wpm,
            chunk_size: self.chunk_size,
        }
    }

    /// Display time left for the current chunk and everything after it.
    pub fn remaining(&self) -> Duration {
        self.chunks
            .iter()
            .skip(self.current_index)
            .map(|chunk| chunk_duration(chunk.word_count, self.wpm))
            .sum()
    }

    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&Snapshot<'_>) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(subscription, _)| *subscription != id);
        self.subscribers.len() != before
    }

    /// Replace the text and chunk size. Returns `false` while locked.
    pub fn load(&mut self, text: impl Into<String>, chunk_size: usize) -> bool {
        if self.is_locked {
            logging::debug("load ignored: text is locked during playback");
            return false;
        }

        self.cancel_timer();
        self.source_text = text.into();
        self.rechunk(chunk_size);
        true
    }

    /// Re-chunk the current text. Returns `false` while locked.
    pub fn set_chunk_size(&mut self, chunk_size: usize) -> bool {
        if self.is_locked {
            logging::debug("chunk size change ignored: text is locked during playback");
            return false;
        }

        self.cancel_timer();
        self.rechunk(chunk_size);
        true
    }

    /// Takes effect when the next timer is armed.
    pub fn set_wpm(&mut self, wpm: u32) {
        let wpm = wpm.max(1);
        if wpm != self.wpm {
            self.wpm = wpm;
            self.notify();
        }
    }

    pub fn play(&mut self) {
        if self.is_running {
            return;
        }
        if self.chunks.is_empty() || self.current_index + 1 >= self.chunks.len() {
            logging::debug("play ignored: nothing left to show");
            return;
        }

        self.is_running = true;
        self.is_locked = true;
        self.arm_for_current();
        logging::info(format!(
            "playback started at chunk {} of {} ({} wpm)",
            self.current_index + 1,
            self.chunks.len(),
            self.wpm
        ));
        self.notify();
    }

    pub fn pause(&mut self) {
        self.cancel_timer();
        if self.is_running || self.is_locked {
            self.is_running = false;
            self.is_locked = false;
            logging::info(format!("playback paused at chunk {}", self.current_index + 1));
            self.notify();
        }
    }

    pub fn toggle(&mut self) {
        if self.is_running {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Pause and rewind to the first chunk.
    pub fn stop(&mut self) {
        self.pause();
        self.seek(0);
    }

    pub fn restart(&mut self) {
        self.seek(0);
    }

    /// Back to the default speed and one word per chunk.
    pub fn reset_speed(&mut self) {
        self.set_wpm(DEFAULT_WPM);
        if self.chunk_size != DEFAULT_CHUNK_SIZE {
            self.set_chunk_size(DEFAULT_CHUNK_SIZE);
        }
    }

    /// Move to `index`, clamped to the chunk range. Pauses a running session.
    pub fn seek(&mut self, index: usize) {
        if self.chunks.is_empty() {
            return;
        }
        if self.is_running {
            self.pause();
        }

        let index = index.min(self.chunks.len() - 1);
        if index != self.current_index {
            self.current_index = index;
            self.notify();
        }
    }

    pub fn jump_back(&mut self, steps: usize) {
        self.seek(self.current_index.saturating_sub(steps));
    }

    pub fn jump_forward(&mut self, steps: usize) {
        self.seek(self.current_index.saturating_add(steps));
    }

    /// Deliver a fired timer. Tokens other than the one currently armed are
    /// stale and dropped.
    pub fn on_timer(&mut self, token: TimerToken) {
        if self.armed != Some(token) {
            logging::debug(format!(
                "dropping stale timer generation {}",
                token.generation()
            ));
            return;
        }

        self.armed = None;
        self.tick();
    }

    fn tick(&mut self) {
        if !self.is_running {
            return;
        }
        if self.current_index + 1 >= self.chunks.len() {
            logging::info("reached the end of the text");
            self.pause();
            return;
        }

        self.current_index += 1;
        self.arm_for_current();
        self.notify();
    }

    fn rechunk(&mut self, chunk_size: usize) {
        self.chunk_size = chunk_size.max(1);
        (self.chunks, self.spans) = splitter::split_spans(&self.source_text, self.chunk_size)
            .into_iter()
            .unzip();
        self.current_index = 0;
        self.is_running = false;
        logging::debug(format!(
            "text split into {} chunks of up to {} words",
            self.chunks.len(),
            self.chunk_size
        ));
        self.notify();
    }

    fn arm_for_current(&mut self) {
        self.cancel_timer();

        let Some(chunk) = self.chunks.get(self.current_index) else {
            return;
        };
        let delay = chunk_duration(chunk.word_count, self.wpm);

        self.generation += 1;
        let token = TimerToken::new(self.generation);
        self.scheduler.arm(token, delay);
        self.armed = Some(token);
    }

    fn cancel_timer(&mut self) {
        if let Some(token) = self.armed.take() {
            self.scheduler.cancel(token);
        }
    }

    fn notify(&mut self) {
        let snapshot = Snapshot {
            current_index: (!self.chunks.is_empty()).then_some(self.current_index),
            chunks: &self.chunks,
            is_running: self.is_running,
            is_locked: self.is_locked,
            wpm: self.wpm,
            chunk_size: self.chunk_size,
        };
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&snapshot);
        }
    }
}

impl<S: Scheduler> Drop for PlaybackState<S> {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
