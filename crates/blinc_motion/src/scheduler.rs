//! Headless transition scheduler
//!
//! [`SceneDriver`] is the [`AnimationDriver`] for a [`Scene`]. It keeps every
//! in-flight transition and interpolates it on each [`tick`](SceneDriver::tick),
//! reading time from the injected [`Clock`].

use crate::clock::Clock;
use crate::driver::{AnimationDriver, Structure};
use crate::error::{MotionError, Result};
use crate::scene::{ElementId, ElementKind, Scene, VisualProps};
use crate::transition::{PropertyDelta, TransitionSpec};
use crate::unit::Completion;
use slotmap::{new_key_type, SlotMap};
use std::cell::{Ref, RefCell};
use std::rc::Rc;

new_key_type! {
    pub struct TransitionId;
}

/// Lifecycle point of a scheduled transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionPhase {
    /// The start delay elapsed and properties began to change
    Started,
    /// Properties reached their target values
    Settled,
    /// The target went away before settling
    Failed,
}

/// A recorded lifecycle point
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionEvent {
    pub at_ms: u64,
    pub target: ElementId,
    pub phase: TransitionPhase,
}

struct ActiveTransition {
    target: ElementId,
    spec: TransitionSpec,
    start_at: u64,
    /// Start and end values, captured when the delay elapses
    span: Option<(VisualProps, VisualProps)>,
    completion: Completion,
}

impl ActiveTransition {
    fn end_at(&self) -> u64 {
        let duration = self.spec.duration_ms() as u64;
        self.start_at.saturating_add(duration)
    }
}

/// Frame-stepped driver for a [`Scene`]
pub struct SceneDriver {
    scene: Rc<RefCell<Scene>>,
    clock: Rc<dyn Clock>,
    active: RefCell<SlotMap<TransitionId, ActiveTransition>>,
    history: RefCell<Vec<TransitionEvent>>,
    frame_interval_ms: u64,
    record_history: bool,
}

impl SceneDriver {
    pub fn new(scene: Rc<RefCell<Scene>>, clock: Rc<dyn Clock>, frame_interval_ms: u64) -> Self {
        Self {
            scene,
            clock,
            active: RefCell::new(SlotMap::with_key()),
            history: RefCell::new(Vec::new()),
            frame_interval_ms: frame_interval_ms.max(1),
            record_history: true,
        }
    }

    pub fn set_record_history(&mut self, record: bool) {
        self.record_history = record;
    }

    pub fn scene(&self) -> Ref<'_, Scene> {
        self.scene.borrow()
    }

    /// Recorded lifecycle events, in the order they happened
    pub fn history(&self) -> Ref<'_, [TransitionEvent]> {
        Ref::map(self.history.borrow(), |history| history.as_slice())
    }

    /// Number of transitions that have not settled yet
    pub fn active_count(&self) -> usize {
        self.active.borrow().len()
    }

    pub fn has_active_transitions(&self) -> bool {
        self.active_count() > 0
    }

    /// The next time at which [`tick`](Self::tick) has work to do: a pending
    /// start, a completion, or the next frame of a running transition
    pub fn next_deadline(&self) -> Option<u64> {
        let next_frame = self.clock.now_ms().saturating_add(self.frame_interval_ms);
        self.active
            .borrow()
            .values()
            .map(|transition| match transition.span {
                None => transition.start_at,
                Some(_) => transition.end_at().min(next_frame),
            })
            .min()
    }

    /// Advance every transition to the clock's current time
    pub fn tick(&self) {
        let now = self.clock.now_ms();
        let mut settled: Vec<(Completion, Result<()>)> = Vec::new();

        {
            let mut active = self.active.borrow_mut();
            let mut scene = self.scene.borrow_mut();
            let mut finished: Vec<TransitionId> = Vec::new();

            for (id, transition) in active.iter_mut() {
                if now < transition.start_at {
                    continue;
                }
                let target = transition.target;

                let Some(props) = scene.props_mut(target) else {
                    tracing::debug!("target {:?} detached mid-transition", target);
                    self.record(now, target, TransitionPhase::Failed);
                    settled.push((
                        transition.completion.clone(),
                        Err(MotionError::TargetUnavailable(target)),
                    ));
                    finished.push(id);
                    continue;
                };

                let (from, to) = match transition.span {
                    Some(span) => span,
                    None => {
                        let span = (*props, transition.spec.destination(*props));
                        transition.span = Some(span);
                        self.record(now, target, TransitionPhase::Started);
                        span
                    }
                };

                let duration = transition.spec.duration_ms() as u64;
                let progress = if duration == 0 || now >= transition.end_at() {
                    1.0
                } else {
                    ((now - transition.start_at) as f32 / duration as f32).min(1.0)
                };
                let eased = transition.spec.easing().apply(progress);

                for delta in transition.spec.deltas() {
                    let (a, b) = (from.get(delta.property), to.get(delta.property));
                    let value = if progress >= 1.0 {
                        b
                    } else {
                        a + (b - a) * eased
                    };
                    props.set(delta.property, value);
                }
                tracing::trace!("{:?} at {:.3} (t={}ms)", target, progress, now);

                if progress >= 1.0 {
                    self.record(now, target, TransitionPhase::Settled);
                    settled.push((transition.completion.clone(), Ok(())));
                    finished.push(id);
                }
            }

            for id in finished {
                active.remove(id);
            }
        }

        // Completions wake their futures; report after releasing the scene
        for (completion, outcome) in settled {
            completion.settle(outcome);
        }
    }

    fn record(&self, at_ms: u64, target: ElementId, phase: TransitionPhase) {
        if self.record_history {
            self.history.borrow_mut().push(TransitionEvent {
                at_ms,
                target,
                phase,
            });
        }
    }
}

impl AnimationDriver for SceneDriver {
    fn animate(&self, target: ElementId, spec: &TransitionSpec, completion: Completion) {
        let now = self.clock.now_ms();
        if !self.scene.borrow().is_attached(target) {
            tracing::debug!("refusing transition on unavailable target {:?}", target);
            self.record(now, target, TransitionPhase::Failed);
            completion.target_lost();
            return;
        }

        self.active.borrow_mut().insert(ActiveTransition {
            target,
            spec: spec.clone(),
            start_at: now.saturating_add(spec.delay_ms() as u64),
            span: None,
            completion,
        });
    }

    fn apply(&self, target: ElementId, deltas: &[PropertyDelta]) -> Result<()> {
        let mut scene = self.scene.borrow_mut();
        let props = scene
            .props_mut(target)
            .ok_or(MotionError::TargetUnavailable(target))?;
        let from = *props;
        for delta in deltas {
            props.set(delta.property, delta.resolve(from.get(delta.property)));
        }
        Ok(())
    }

    fn structure(&self, target: ElementId) -> Result<Structure> {
        let scene = self.scene.borrow();
        if !scene.is_attached(target) {
            return Err(MotionError::TargetUnavailable(target));
        }
        Ok(match scene.kind(target) {
            Some(ElementKind::Container) => {
                Structure::Container(scene.children(target).iter().copied().collect())
            }
            _ => Structure::Leaf,
        })
    }
}
