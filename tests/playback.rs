use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use quick_reader::playback::{PlaybackState, PlaybackStatus};
use quick_reader::timer::{Scheduler, TimerToken};

/// Records every request instead of keeping time.
#[derive(Debug, Default)]
struct ManualScheduler {
    pending: Vec<(TimerToken, Duration)>,
    armed_total: usize,
    cancelled_total: usize,
}

impl ManualScheduler {
    fn pending_token(&self) -> Option<TimerToken> {
        self.pending.last().map(|(token, _)| *token)
    }

    fn pending_delay(&self) -> Option<Duration> {
        self.pending.last().map(|(_, delay)| *delay)
    }
}

impl Scheduler for ManualScheduler {
    fn arm(&mut self, token: TimerToken, delay: Duration) {
        self.armed_total += 1;
        self.pending.push((token, delay));
    }

    fn cancel(&mut self, token: TimerToken) {
        self.cancelled_total += 1;
        self.pending.retain(|(pending, _)| *pending != token);
    }
}

fn session(text: &str, chunk_size: usize, wpm: u32) -> PlaybackState<ManualScheduler> {
    PlaybackState::with_text(ManualScheduler::default(), text, chunk_size, wpm)
}

/// Fire whatever timer is pending, as an event loop would.
fn fire(state: &mut PlaybackState<ManualScheduler>) -> bool {
    let Some(token) = state.scheduler().pending_token() else {
        return false;
    };
    state.scheduler_mut().pending.retain(|(pending, _)| *pending != token);
    state.on_timer(token);
    true
}

#[test]
fn test_plays_to_the_end_and_stops() {
    let mut state = session("The quick brown fox", 2, 120);
    assert_eq!(state.chunks().len(), 2);

    state.play();
    assert!(state.is_running());
    assert!(state.is_locked());
    assert_eq!(state.scheduler().pending_delay(), Some(Duration::from_secs(1)));

    assert!(fire(&mut state));
    assert_eq!(state.current_index(), Some(1));
    assert!(state.is_running());

    assert!(fire(&mut state));
    assert_eq!(state.current_index(), Some(1));
    assert!(!state.is_running());
    assert!(!state.is_locked());
    assert!(state.scheduler().pending.is_empty());
    assert_eq!(state.status(), PlaybackStatus::Paused);
}

#[test]
fn test_play_at_last_chunk_does_nothing() {
    let mut state = session("one two three", 1, 300);
    state.seek(2);
    state.play();
    assert!(!state.is_running());
    assert_eq!(state.scheduler().armed_total, 0);
}

#[test]
fn test_empty_text_never_plays() {
    let mut state = session("   \n\t ", 3, 300);
    assert!(state.chunks().is_empty());
    assert_eq!(state.current_index(), None);

    state.play();
    state.seek(4);
    state.jump_forward(2);
    assert!(!state.is_running());
    assert_eq!(state.current_chunk(), None);
    assert_eq!(state.status(), PlaybackStatus::Idle);
    assert_eq!(state.remaining(), Duration::ZERO);
}

#[test]
fn test_chunk_size_is_locked_while_running() {
    let mut state = session("a b c d e f", 1, 300);
    state.play();
    fire(&mut state);
    assert_eq!(state.current_index(), Some(1));
    let chunks_before = state.chunks().to_vec();

    assert!(!state.set_chunk_size(3));
    assert!(!state.load("other text", 1));
    assert_eq!(state.chunk_size(), 1);
    assert_eq!(state.source_text(), "a b c d e f");
    assert_eq!(state.current_index(), Some(1));
    assert_eq!(state.chunks(), chunks_before.as_slice());
    assert!(state.is_running());
    assert_eq!(state.scheduler().pending.len(), 1);

    state.pause();
    assert!(state.set_chunk_size(3));
    assert_eq!(state.chunks().len(), 2);
    assert_eq!(state.current_index(), Some(0));
}

#[test]
fn test_rechunk_resets_position() {
    let mut state = session("a b c d e f", 1, 300);
    state.seek(4);
    assert!(state.set_chunk_size(2));
    assert_eq!(state.current_index(), Some(0));
    assert_eq!(state.chunks()[0].text, "a b");
}

#[test]
fn test_zero_chunk_size_means_one_word() {
    let mut state = session("a b c", 0, 300);
    assert_eq!(state.chunk_size(), 1);
    assert!(state.set_chunk_size(0));
    assert_eq!(state.chunks().len(), 3);
}

#[test]
fn test_pause_and_resume_never_leave_two_timers() {
    let mut state = session("a b c d e f g h", 1, 300);
    for _ in 0..5 {
        state.play();
        state.pause();
        state.play();
        assert_eq!(state.scheduler().pending.len(), 1);
    }
    state.play();
    assert_eq!(state.scheduler().pending.len(), 1);
}

#[test]
fn test_stale_timer_is_ignored() {
    let mut state = session("a b c d", 1, 300);
    state.play();
    let stale = state.scheduler().pending_token().unwrap();

    state.pause();
    state.play();
    let fresh = state.scheduler().pending_token().unwrap();
    assert_ne!(stale, fresh);

    state.on_timer(stale);
    assert_eq!(state.current_index(), Some(0));

    state.on_timer(fresh);
    assert_eq!(state.current_index(), Some(1));
}

#[test]
fn test_timer_after_pause_is_ignored() {
    let mut state = session("a b c d", 1, 300);
    state.play();
    let token = state.scheduler().pending_token().unwrap();
    state.pause();

    state.on_timer(token);
    assert_eq!(state.current_index(), Some(0));
    assert!(!state.is_running());
}

#[test]
fn test_wpm_change_applies_to_next_interval() {
    let mut state = session("a b c d", 1, 300);
    state.play();
    assert_eq!(state.scheduler().pending_delay(), Some(Duration::from_millis(200)));

    state.set_wpm(600);
    assert_eq!(state.scheduler().pending_delay(), Some(Duration::from_millis(200)));

    fire(&mut state);
    assert_eq!(state.scheduler().pending_delay(), Some(Duration::from_millis(100)));
}

#[test]
fn test_zero_wpm_is_clamped() {
    let mut state = session("a", 1, 0);
    assert_eq!(state.wpm(), 1);
    state.set_wpm(0);
    assert_eq!(state.wpm(), 1);
}

#[test]
fn test_seek_while_running_pauses() {
    let mut state = session("a b c d e f", 1, 300);
    state.play();
    state.seek(3);
    assert!(!state.is_running());
    assert!(!state.is_locked());
    assert_eq!(state.current_index(), Some(3));
    assert!(state.scheduler().pending.is_empty());
}

#[test]
fn test_jumps_clamp_to_range() {
    let mut state = session("a b c d e f", 1, 300);
    state.jump_forward(4);
    assert_eq!(state.current_index(), Some(4));
    state.jump_forward(100);
    assert_eq!(state.current_index(), Some(5));
    state.jump_back(2);
    assert_eq!(state.current_index(), Some(3));
    state.jump_back(usize::MAX);
    assert_eq!(state.current_index(), Some(0));
    state.seek(usize::MAX);
    assert_eq!(state.current_index(), Some(5));
}

#[test]
fn test_stop_rewinds_and_unlocks() {
    let mut state = session("a b c d", 1, 300);
    state.play();
    fire(&mut state);
    fire(&mut state);
    assert_eq!(state.current_index(), Some(2));

    state.stop();
    assert_eq!(state.current_index(), Some(0));
    assert!(!state.is_locked());
    assert_eq!(state.status(), PlaybackStatus::Idle);
}

#[test]
fn test_toggle() {
    let mut state = session("a b c", 1, 300);
    state.toggle();
    assert!(state.is_running());
    state.toggle();
    assert!(!state.is_running());
}

#[test]
fn test_reset_speed() {
    let mut state = session("a b c d", 3, 900);
    state.reset_speed();
    assert_eq!(state.wpm(), 300);
    assert_eq!(state.chunk_size(), 1);
    assert_eq!(state.chunks().len(), 4);
}

#[test]
fn test_remaining_counts_current_and_later_chunks() {
    let mut state = session("a b c d e", 2, 60);
    assert_eq!(state.remaining(), Duration::from_secs(5));
    state.seek(2);
    assert_eq!(state.remaining(), Duration::from_secs(1));
}

#[test]
fn test_subscribers_see_every_change() {
    let mut state = session("a b c", 1, 300);
    let seen = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&seen);
    let id = state.subscribe(move |snapshot| {
        log.borrow_mut()
            .push((snapshot.current_index, snapshot.is_running, snapshot.wpm));
    });

    state.play();
    fire(&mut state);
    state.set_wpm(450);
    state.set_wpm(450);
    state.pause();

    assert_eq!(
        *seen.borrow(),
        vec![
            (Some(0), true, 300),
            (Some(1), true, 300),
            (Some(1), true, 450),
            (Some(1), false, 450),
        ]
    );

    assert!(state.unsubscribe(id));
    assert!(!state.unsubscribe(id));
    state.seek(0);
    assert_eq!(seen.borrow().len(), 4);
}

#[test]
fn test_snapshot_exposes_current_chunk() {
    let mut state = session("The quick brown fox", 2, 300);
    state.seek(1);
    let snapshot = state.snapshot();
    assert_eq!(snapshot.current_chunk().map(|c| c.text.as_str()), Some("brown fox"));
    assert_eq!(snapshot.chunk_size, 2);
    assert!(!snapshot.is_locked);
}

#[test]
fn test_current_span_tracks_position() {
    let text = "  héllo wörld  again";
    let mut state = session(text, 2, 300);
    assert_eq!(state.current_span().map(|span| &text[span]), Some("héllo wörld"));

    state.seek(1);
    assert_eq!(state.current_span().map(|span| &text[span]), Some("again"));

    assert!(state.load("", 1));
    assert_eq!(state.current_span(), None);
}

#[test]
fn test_load_replaces_text() {
    let mut state = session("a b c", 1, 300);
    state.seek(2);
    assert!(state.load("x y z w", 2));
    assert_eq!(state.source_text(), "x y z w");
    assert_eq!(state.chunks().len(), 2);
    assert_eq!(state.current_index(), Some(0));
}

#[test]
fn test_drop_cancels_pending_timer() {
    let cancelled = Rc::new(RefCell::new(0));

    struct Counting(Rc<RefCell<usize>>);
    impl Scheduler for Counting {
        fn arm(&mut self, _token: TimerToken, _delay: Duration) {}
        fn cancel(&mut self, _token: TimerToken) {
            *self.0.borrow_mut() += 1;
        }
    }

    {
        let mut state = PlaybackState::with_text(Counting(Rc::clone(&cancelled)), "a b", 1, 300);
        state.play();
    }
    assert_eq!(*cancelled.borrow(), 1);
}
