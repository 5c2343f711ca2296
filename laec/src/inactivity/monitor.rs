//! Inactivity timer, warning countdown and timeout.

use super::config::InactivityConfig;
use crate::auth::SessionManager;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::{
    sync::broadcast,
    task::JoinHandle,
    time::{Instant, sleep_until},
};

/// Buffered events per subscriber; one countdown is 300 warnings plus a timeout
const EVENT_CAPACITY: usize = 512;

/// User interaction that counts as activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    PointerDown,
    PointerMove,
    KeyPress,
    Scroll,
    TouchStart,
    Click,
}

impl ActivityKind {
    /// DOM event name
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::PointerDown => "mousedown",
            ActivityKind::PointerMove => "mousemove",
            ActivityKind::KeyPress => "keypress",
            ActivityKind::Scroll => "scroll",
            ActivityKind::TouchStart => "touchstart",
            ActivityKind::Click => "click",
        }
    }
}

/// Notifications emitted while monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InactivityEvent {
    /// Session ends in `seconds_remaining` unless there is activity
    Warning { seconds_remaining: u64 },
    /// Session ended
    Timeout,
}

#[derive(Debug, Default)]
struct MonitorState {
    monitoring: bool,
    deadline: Option<Instant>,
    last_reset: Option<Instant>,
    warning_fired: bool,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl MonitorState {
    fn cancel_timer(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.monitoring && self.generation == generation
    }
}

struct Inner {
    config: InactivityConfig,
    session: Arc<SessionManager>,
    events: broadcast::Sender<InactivityEvent>,
    state: Mutex<MonitorState>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, MonitorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Emit a countdown tick if the window is still current
    fn warn(&self, generation: u64, seconds_remaining: u64) -> bool {
        let mut state = self.state();
        if !state.is_current(generation) {
            return false;
        }
        if !state.warning_fired {
            state.warning_fired = true;
            log::info!("Session ends in {}s without activity", seconds_remaining);
        }
        let _ = self
            .events
            .send(InactivityEvent::Warning { seconds_remaining });
        true
    }

    fn time_out(&self, generation: u64) {
        {
            let mut state = self.state();
            if !state.is_current(generation) {
                return;
            }
            state.monitoring = false;
            state.deadline = None;
            state.warning_fired = false;
            // Running inside this task; detach rather than abort
            state.timer = None;
        }

        log::warn!("Inactivity timeout reached; ending session");
        let _ = self.events.send(InactivityEvent::Timeout);
        self.session.expire_for_inactivity();
    }
}

/// Inactivity monitor
///
/// Clones share the same timer and event stream.
#[derive(Clone)]
pub struct InactivityMonitor {
    inner: Arc<Inner>,
}

impl InactivityMonitor {
    /// Create an idle monitor that ends `session` on timeout
    pub fn new(config: InactivityConfig, session: Arc<SessionManager>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                config,
                session,
                events,
                state: Mutex::new(MonitorState::default()),
            }),
        }
    }

    /// Timing parameters
    pub fn config(&self) -> &InactivityConfig {
        &self.inner.config
    }

    /// Start the inactivity window; no-op if already monitoring
    pub fn start_monitoring(&self) {
        let mut state = self.inner.state();
        if state.monitoring {
            return;
        }

        state.monitoring = true;
        log::debug!(
            "Inactivity monitoring started ({}s timeout)",
            self.inner.config.timeout.as_secs()
        );
        self.reset(&mut state, Instant::now());
    }

    /// Stop monitoring and cancel any pending warning or timeout; idempotent
    pub fn stop_monitoring(&self) {
        let mut state = self.inner.state();
        if state.monitoring {
            log::debug!("Inactivity monitoring stopped");
        }
        state.cancel_timer();
        state.monitoring = false;
        state.deadline = None;
        state.last_reset = None;
        state.warning_fired = false;
    }

    /// Report user activity.
    ///
    /// Returns `true` if the deadline was pushed forward. Events while not
    /// monitoring, or within the debounce interval of the last reset, are
    /// dropped.
    pub fn record_activity(&self, kind: ActivityKind) -> bool {
        let mut state = self.inner.state();
        if !state.monitoring {
            return false;
        }

        let now = Instant::now();
        let debounced = state
            .last_reset
            .is_some_and(|last| now.saturating_duration_since(last) < self.inner.config.debounce);
        if debounced {
            return false;
        }

        log::trace!("Activity ({}) resets the inactivity timer", kind.as_str());
        self.reset(&mut state, now);
        true
    }

    /// Restart the full window, ignoring the debounce ("stay signed in")
    pub fn extend_session(&self) {
        let mut state = self.inner.state();
        if !state.monitoring {
            return;
        }

        log::info!("Session extended by user");
        self.reset(&mut state, Instant::now());
    }

    /// Events emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<InactivityEvent> {
        self.inner.events.subscribe()
    }

    /// Whether an inactivity window is running
    pub fn is_monitoring(&self) -> bool {
        self.inner.state().monitoring
    }

    /// When the session will end without further activity
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.state().deadline
    }

    /// Whether the current window has reached its warning phase
    pub fn warning_fired(&self) -> bool {
        self.inner.state().warning_fired
    }

    fn reset(&self, state: &mut MonitorState, now: Instant) {
        state.cancel_timer();

        let deadline = now + self.inner.config.timeout;
        state.deadline = Some(deadline);
        state.last_reset = Some(now);
        state.warning_fired = false;

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                log::error!("Cannot arm inactivity timer outside a runtime: {}", e);
                return;
            }
        };

        let inner = Arc::clone(&self.inner);
        let generation = state.generation;
        let warning_at = deadline
            .checked_sub(self.inner.config.warning_lead)
            .unwrap_or(now);
        state.timer = Some(handle.spawn(run_timer(inner, generation, warning_at, deadline)));
    }
}

/// Single timer task for one inactivity window
async fn run_timer(inner: Arc<Inner>, generation: u64, warning_at: Instant, deadline: Instant) {
    sleep_until(warning_at).await;

    let mut tick = warning_at;
    loop {
        let remaining = seconds_until(tick, deadline);
        if remaining == 0 {
            break;
        }
        if !inner.warn(generation, remaining) {
            return;
        }
        tick += Duration::from_secs(1);
        sleep_until(tick.min(deadline)).await;
    }

    sleep_until(deadline).await;
    inner.time_out(generation);
}

/// Whole seconds from `now` to `deadline`, rounded up
fn seconds_until(now: Instant, deadline: Instant) -> u64 {
    let remaining = deadline.saturating_duration_since(now);
    let secs = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}
