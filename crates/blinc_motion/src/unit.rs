//! Completion units
//!
//! A [`CompletionUnit`] turns one platform-driven transition into a
//! resolve-once future. The platform side receives a [`Completion`] handle
//! and reports the outcome through it exactly once; the first report wins
//! and later ones are ignored. If every copy of the handle is dropped without
//! a report the unit fails with [`MotionError::TargetUnavailable`], so a lost
//! callback never leaves a caller waiting forever.

use crate::driver::AnimationDriver;
use crate::error::{MotionError, Result};
use crate::motion::{Signal, Stage};
use crate::scene::ElementId;
use crate::transition::TransitionSpec;
use futures::FutureExt;
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

#[derive(Default)]
struct SettleState {
    settled: bool,
    outcome: Option<Result<()>>,
    waker: Option<Waker>,
}

struct Notifier {
    target: ElementId,
    state: Rc<RefCell<SettleState>>,
}

impl Notifier {
    fn settle(&self, outcome: Result<()>) -> bool {
        let waker = {
            let mut state = self.state.borrow_mut();
            if state.settled {
                tracing::trace!("ignoring duplicate completion for {:?}", self.target);
                return false;
            }
            state.settled = true;
            state.outcome = Some(outcome);
            state.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
        true
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        let settled = self.state.try_borrow().map_or(true, |state| state.settled);
        if !settled {
            tracing::debug!(
                "completion for {:?} dropped without a report, treating target as unavailable",
                self.target
            );
            self.settle(Err(MotionError::TargetUnavailable(self.target)));
        }
    }
}

/// Callback handle given to the platform driver for one transition
#[derive(Clone)]
pub struct Completion {
    notifier: Rc<Notifier>,
}

impl Completion {
    /// The element this completion reports for
    pub fn target(&self) -> ElementId {
        self.notifier.target
    }

    /// Report the transition's outcome. Returns `false` if an outcome was
    /// already reported.
    pub fn settle(&self, outcome: Result<()>) -> bool {
        self.notifier.settle(outcome)
    }

    /// Report that the transition reached its target values
    pub fn resolve(&self) -> bool {
        self.settle(Ok(()))
    }

    /// Report that the target went away before the transition settled
    pub fn target_lost(&self) -> bool {
        self.settle(Err(MotionError::TargetUnavailable(self.target())))
    }

    pub fn is_settled(&self) -> bool {
        self.notifier.state.borrow().settled
    }
}

/// Future side of a [`Completion`]
pub struct Settlement {
    state: Rc<RefCell<SettleState>>,
}

impl Future for Settlement {
    type Output = Result<()>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<()>> {
        let mut state = self.state.borrow_mut();
        match state.outcome.take() {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                state.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

/// Create a linked completion handle and the future it settles
pub fn completion(target: ElementId) -> (Completion, Settlement) {
    let state = Rc::new(RefCell::new(SettleState::default()));
    let completion = Completion {
        notifier: Rc::new(Notifier {
            target,
            state: state.clone(),
        }),
    };
    (completion, Settlement { state })
}

/// One element transition, not yet started
#[derive(Clone, Debug)]
pub struct CompletionUnit {
    target: ElementId,
    spec: TransitionSpec,
}

impl CompletionUnit {
    pub fn new(target: ElementId, spec: TransitionSpec) -> Self {
        Self { target, spec }
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    pub fn spec(&self) -> &TransitionSpec {
        &self.spec
    }

    /// Start the transition on the stage's driver.
    ///
    /// Nothing happens until the returned signal is polled. Immediate specs
    /// are applied synchronously on that first poll and resolve without
    /// involving the platform's completion callback.
    pub fn start(self, stage: &Stage) -> Signal {
        let driver = stage.driver();
        async move {
            let CompletionUnit { target, spec } = self;
            if spec.is_immediate() {
                tracing::trace!("applying immediate transition to {:?}", target);
                return driver.apply(target, spec.deltas());
            }

            let (completion, settlement) = completion(target);
            tracing::debug!(
                "starting transition on {:?}: {}ms after {}ms",
                target,
                spec.duration_ms(),
                spec.delay_ms()
            );
            driver.animate(target, &spec, completion);
            settlement.await
        }
        .boxed_local()
    }
}
