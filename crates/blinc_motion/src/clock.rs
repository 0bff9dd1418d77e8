//! Time source for motions
//!
//! Motions never read wall-clock time directly. Waiting goes through a
//! [`Clock`] carried by the [`Stage`](crate::motion::Stage), so the same
//! choreography runs against a deterministic [`VirtualClock`] in headless
//! runs and tests.

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

new_key_type! {
    struct TimerId;
}

/// Injected scheduling capability
pub trait Clock {
    /// Current logical time in milliseconds
    fn now_ms(&self) -> u64;

    /// A future that completes `ms` milliseconds after it is first polled
    fn sleep(&self, ms: u64) -> LocalBoxFuture<'static, ()>;
}

struct Timer {
    deadline: u64,
    waker: Waker,
}

#[derive(Default)]
struct ClockState {
    now: u64,
    timers: SlotMap<TimerId, Timer>,
}

/// A manually advanced clock
///
/// Time only moves when [`advance_to`](VirtualClock::advance_to) is called;
/// every sleeper whose deadline has been reached is woken at that point.
#[derive(Clone, Default)]
pub struct VirtualClock {
    state: Rc<RefCell<ClockState>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Earliest deadline of any pending sleeper
    pub fn next_deadline(&self) -> Option<u64> {
        self.state
            .borrow()
            .timers
            .values()
            .map(|timer| timer.deadline)
            .min()
    }

    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Move time forward to `ms` and wake every sleeper that is now due.
    /// Time never moves backwards.
    pub fn advance_to(&self, ms: u64) {
        let due: Vec<Waker> = {
            let mut state = self.state.borrow_mut();
            state.now = state.now.max(ms);
            let now = state.now;
            state
                .timers
                .values()
                .filter(|timer| timer.deadline <= now)
                .map(|timer| timer.waker.clone())
                .collect()
        };
        for waker in due {
            waker.wake();
        }
    }
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> u64 {
        self.state.borrow().now
    }

    fn sleep(&self, ms: u64) -> LocalBoxFuture<'static, ()> {
        Sleep {
            state: self.state.clone(),
            duration: ms,
            deadline: None,
            timer: None,
        }
        .boxed_local()
    }
}

struct Sleep {
    state: Rc<RefCell<ClockState>>,
    duration: u64,
    deadline: Option<u64>,
    timer: Option<TimerId>,
}

impl Future for Sleep {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = &mut *self;
        let mut state = this.state.borrow_mut();
        let now = state.now;
        let end = now.saturating_add(this.duration);
        let deadline = *this.deadline.get_or_insert(end);

        if now >= deadline {
            if let Some(id) = this.timer.take() {
                state.timers.remove(id);
            }
            return Poll::Ready(());
        }

        match this.timer.and_then(|id| state.timers.get_mut(id)) {
            Some(timer) => timer.waker.clone_from(cx.waker()),
            None => {
                this.timer = Some(state.timers.insert(Timer {
                    deadline,
                    waker: cx.waker().clone(),
                }));
            }
        }
        Poll::Pending
    }
}

impl Drop for Sleep {
    fn drop(&mut self) {
        if let Some(id) = self.timer.take() {
            if let Ok(mut state) = self.state.try_borrow_mut() {
                state.timers.remove(id);
            }
        }
    }
}
