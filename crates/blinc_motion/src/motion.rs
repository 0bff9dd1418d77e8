//! Motion composition
//!
//! A [`Motion`] is either a single leaf (a transition, an instant hide, a
//! wait or a synchronous action) or a [`Combinator`] over further motions.
//! Every motion is cold: it does nothing until [`Motion::start`] is called
//! and the returned [`Signal`] is polled. Starting consumes the motion, so a
//! motion can never be started twice.
//!
//! # Example
//!
//! ```rust
//! use blinc_motion::{Motion, MotionConfig, MotionRuntime, TransitionBuilder};
//!
//! let mut runtime = MotionRuntime::new(MotionConfig::default());
//! let a = runtime.scene_mut().add_element(None);
//! let b = runtime.scene_mut().add_element(None);
//!
//! let motion = Motion::sequential([
//!     TransitionBuilder::new(a).duration(100).fade_out().into_motion(),
//!     TransitionBuilder::new(b).duration(100).fade_out().into_motion(),
//! ]);
//!
//! let outcome = runtime.play(motion);
//! runtime.run_until_idle();
//! assert_eq!(outcome.result(), Some(Ok(())));
//! assert_eq!(outcome.settled_at(), Some(200));
//! ```

use crate::clock::Clock;
use crate::driver::AnimationDriver;
use crate::error::{MotionError, Result};
use crate::hide;
use crate::scene::ElementId;
use crate::transition::TransitionBuilder;
use crate::unit::CompletionUnit;
use futures::future::LocalBoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::task::{LocalSpawn, LocalSpawnExt};
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

/// Resolve-once completion of a started motion
pub type Signal = LocalBoxFuture<'static, Result<()>>;

/// Synchronous side effect run by [`Motion::after_delay`]
pub type Action = Box<dyn FnOnce() -> anyhow::Result<()>>;

/// Scheduling context motions run in: time source, animation driver and a
/// spawner for work that outlives its parent signal.
#[derive(Clone)]
pub struct Stage {
    clock: Rc<dyn Clock>,
    driver: Rc<dyn AnimationDriver>,
    spawner: Rc<dyn LocalSpawn>,
}

impl Stage {
    pub fn new(
        clock: Rc<dyn Clock>,
        driver: Rc<dyn AnimationDriver>,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Self {
        Self {
            clock,
            driver,
            spawner,
        }
    }

    pub fn clock(&self) -> Rc<dyn Clock> {
        self.clock.clone()
    }

    pub fn driver(&self) -> Rc<dyn AnimationDriver> {
        self.driver.clone()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Keep `future` running without anyone awaiting it
    pub fn detach(&self, future: impl Future<Output = ()> + 'static) {
        if let Err(err) = self.spawner.spawn_local(future) {
            tracing::warn!("failed to detach motion: {}", err);
        }
    }
}

/// Composition law of a [`Combinator`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Start every child at once, resolve when all have resolved
    Parallel,
    /// Start each child after its predecessor resolved
    Sequential,
    /// Start child `i` after an extra `i * stride_ms`, resolve when all have
    /// resolved
    Staggered { stride_ms: u64 },
}

/// An atomic motion
pub enum Leaf {
    Transition(CompletionUnit),
    /// Instantly hide every plain element below a container
    HideChildren(ElementId),
    /// Resolve after a number of milliseconds
    Wait(u64),
    Action(Action),
}

impl fmt::Debug for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leaf::Transition(unit) => f.debug_tuple("Transition").field(unit).finish(),
            Leaf::HideChildren(root) => f.debug_tuple("HideChildren").field(root).finish(),
            Leaf::Wait(ms) => f.debug_tuple("Wait").field(ms).finish(),
            Leaf::Action(_) => f.write_str("Action(..)"),
        }
    }
}

impl Leaf {
    fn start(self, stage: &Stage) -> Signal {
        match self {
            Leaf::Transition(unit) => unit.start(stage),
            Leaf::HideChildren(root) => {
                let driver = stage.driver();
                async move { hide::hide_children(driver.as_ref(), root).map(|_| ()) }.boxed_local()
            }
            Leaf::Wait(ms) => stage.clock.sleep(ms).map(Ok).boxed_local(),
            Leaf::Action(action) => {
                async move { action().map_err(MotionError::action) }.boxed_local()
            }
        }
    }
}

/// Ordered children under one composition law
#[derive(Debug)]
pub struct Combinator {
    mode: Mode,
    children: Vec<Motion>,
}

impl Combinator {
    pub fn new(mode: Mode, children: Vec<Motion>) -> Self {
        Self { mode, children }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn children(&self) -> &[Motion] {
        &self.children
    }

    fn start(self, stage: &Stage) -> Signal {
        let stage = stage.clone();
        let Combinator { mode, children } = self;

        match mode {
            Mode::Sequential => async move {
                for (index, child) in children.into_iter().enumerate() {
                    if let Err(err) = child.start(&stage).await {
                        tracing::debug!("sequence halted at step {}: {}", index, err);
                        return Err(err);
                    }
                }
                Ok(())
            }
            .boxed_local(),
            Mode::Parallel => async move {
                let signals = children
                    .into_iter()
                    .map(|child| child.start(&stage))
                    .collect();
                settle_all(&stage, signals).await
            }
            .boxed_local(),
            Mode::Staggered { stride_ms } => async move {
                let clock = stage.clock();
                let signals = children
                    .into_iter()
                    .enumerate()
                    .map(|(index, child)| {
                        let offset = clock.sleep((index as u64).saturating_mul(stride_ms));
                        let signal = child.start(&stage);
                        async move {
                            offset.await;
                            signal.await
                        }
                        .boxed_local()
                    })
                    .collect();
                settle_all(&stage, signals).await
            }
            .boxed_local(),
        }
    }
}

/// Await every signal. The first failure is returned right away; the
/// remaining signals are detached onto the stage and run to their own end.
async fn settle_all(stage: &Stage, signals: Vec<Signal>) -> Result<()> {
    let mut pending: FuturesUnordered<Signal> = signals.into_iter().collect();

    while let Some(outcome) = pending.next().await {
        if let Err(err) = outcome {
            if !pending.is_empty() {
                tracing::debug!(
                    "parallel motion failed ({}), {} siblings keep running",
                    err,
                    pending.len()
                );
                stage.detach(async move {
                    while let Some(outcome) = pending.next().await {
                        if let Err(err) = outcome {
                            tracing::debug!("detached sibling failed: {}", err);
                        }
                    }
                });
            }
            return Err(err);
        }
    }
    Ok(())
}

/// A composable, awaitable unit of animation
#[derive(Debug)]
pub enum Motion {
    Leaf(Leaf),
    Group(Combinator),
}

impl Motion {
    /// Run all motions at once; resolves when the last one resolves
    pub fn parallel<I>(motions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Motion>,
    {
        Self::group(Mode::Parallel, motions)
    }

    /// Run motions one after another; stops at the first failure
    pub fn sequential<I>(motions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Motion>,
    {
        Self::group(Mode::Sequential, motions)
    }

    /// Run motions at once, with motion `i` starting `i * stride_ms` late
    pub fn staggered<I>(stride_ms: u64, motions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Motion>,
    {
        Self::group(Mode::Staggered { stride_ms }, motions)
    }

    fn group<I>(mode: Mode, motions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Motion>,
    {
        let children = motions.into_iter().map(Into::into).collect();
        Motion::Group(Combinator::new(mode, children))
    }

    /// Wait `delay_ms`, then run `action`; an error from `action` fails the
    /// motion with [`MotionError::ActionFailed`]
    pub fn after_delay<F>(delay_ms: u64, action: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<()> + 'static,
    {
        Self::sequential([Motion::wait(delay_ms), Motion::action(action)])
    }

    pub fn wait(ms: u64) -> Self {
        Motion::Leaf(Leaf::Wait(ms))
    }

    pub fn action<F>(action: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<()> + 'static,
    {
        Motion::Leaf(Leaf::Action(Box::new(action)))
    }

    /// Instantly hide every plain element below `root`; resolves on first poll
    pub fn hide_children(root: ElementId) -> Self {
        Motion::Leaf(Leaf::HideChildren(root))
    }

    /// Start the motion on `stage`
    pub fn start(self, stage: &Stage) -> Signal {
        match self {
            Motion::Leaf(leaf) => leaf.start(stage),
            Motion::Group(combinator) => combinator.start(stage),
        }
    }
}

impl From<CompletionUnit> for Motion {
    fn from(unit: CompletionUnit) -> Self {
        Motion::Leaf(Leaf::Transition(unit))
    }
}

impl From<TransitionBuilder> for Motion {
    fn from(builder: TransitionBuilder) -> Self {
        builder.build().into()
    }
}

impl From<Combinator> for Motion {
    fn from(combinator: Combinator) -> Self {
        Motion::Group(combinator)
    }
}
