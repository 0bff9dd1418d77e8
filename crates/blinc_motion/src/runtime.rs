//! Headless motion runtime
//!
//! Owns a local executor, a [`VirtualClock`], a [`Scene`] and its
//! [`SceneDriver`], and advances virtual time deterministically. Time only
//! moves inside [`advance`](MotionRuntime::advance) and
//! [`run_until_idle`](MotionRuntime::run_until_idle), and every ready task is
//! run to a stall before the clock moves again.

use crate::clock::{Clock, VirtualClock};
use crate::config::MotionConfig;
use crate::error::Result;
use crate::motion::{Motion, Stage};
use crate::presets::AnimationPreset;
use crate::scene::Scene;
use crate::scheduler::{SceneDriver, TransitionEvent};
use futures::executor::LocalPool;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

#[derive(Default)]
struct OutcomeState {
    result: Option<Result<()>>,
    settled_at: Option<u64>,
}

/// Observer for a motion started with [`MotionRuntime::play`]
#[derive(Clone, Default)]
pub struct Outcome {
    state: Rc<RefCell<OutcomeState>>,
}

impl Outcome {
    pub fn is_settled(&self) -> bool {
        self.state.borrow().result.is_some()
    }

    /// The terminal result, once the motion has settled
    pub fn result(&self) -> Option<Result<()>> {
        self.state.borrow().result.clone()
    }

    /// Virtual time at which the motion settled
    pub fn settled_at(&self) -> Option<u64> {
        self.state.borrow().settled_at
    }

    fn settle(&self, result: Result<()>, at_ms: u64) {
        let mut state = self.state.borrow_mut();
        debug_assert!(state.result.is_none(), "motion settled twice");
        state.result = Some(result);
        state.settled_at = Some(at_ms);
    }
}

/// Deterministic runtime for playing motions against a headless scene
pub struct MotionRuntime {
    pool: LocalPool,
    clock: VirtualClock,
    scene: Rc<RefCell<Scene>>,
    driver: Rc<SceneDriver>,
    stage: Stage,
    config: MotionConfig,
}

impl MotionRuntime {
    pub fn new(config: MotionConfig) -> Self {
        let clock = VirtualClock::new();
        let scene = Rc::new(RefCell::new(Scene::new()));

        let mut driver = SceneDriver::new(
            scene.clone(),
            Rc::new(clock.clone()),
            config.frame_interval_ms,
        );
        driver.set_record_history(config.record_history);
        let driver = Rc::new(driver);

        let pool = LocalPool::new();
        let stage = Stage::new(
            Rc::new(clock.clone()),
            driver.clone(),
            Rc::new(pool.spawner()),
        );

        tracing::debug!(
            "motion runtime ready (frame interval {}ms)",
            config.frame_interval_ms
        );

        Self {
            pool,
            clock,
            scene,
            driver,
            stage,
            config,
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Presets using this runtime's configured defaults
    pub fn presets(&self) -> AnimationPreset {
        AnimationPreset::from_config(&self.config)
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn scene(&self) -> Ref<'_, Scene> {
        self.scene.borrow()
    }

    pub fn scene_mut(&self) -> RefMut<'_, Scene> {
        self.scene.borrow_mut()
    }

    pub fn driver(&self) -> &SceneDriver {
        &self.driver
    }

    pub fn history(&self) -> Ref<'_, [TransitionEvent]> {
        self.driver.history()
    }

    /// Start `motion` and run it until it blocks on time
    pub fn play(&mut self, motion: Motion) -> Outcome {
        let outcome = Outcome::default();
        let observer = outcome.clone();
        let clock = self.clock.clone();
        let signal = motion.start(&self.stage);

        self.stage.detach(async move {
            let result = signal.await;
            observer.settle(result, clock.now_ms());
        });
        self.pool.run_until_stalled();
        outcome
    }

    /// Advance virtual time by `ms`, stopping at every timer, transition
    /// boundary and frame on the way
    pub fn advance(&mut self, ms: u64) {
        let end = self.clock.now_ms().saturating_add(ms);
        while let Some(next) = self.step_until(end) {
            self.clock.advance_to(next);
            self.driver.tick();
        }
        self.clock.advance_to(end);
        self.driver.tick();
        self.pool.run_until_stalled();
    }

    /// Advance until no timer or transition is pending. Returns the virtual
    /// time that elapsed.
    pub fn run_until_idle(&mut self) -> u64 {
        let start = self.clock.now_ms();
        while let Some(next) = self.step_until(u64::MAX) {
            self.clock.advance_to(next);
            self.driver.tick();
        }
        self.clock.now_ms() - start
    }

    /// Run ready tasks, then report the next point in time with pending work
    /// if it is not later than `end`
    fn step_until(&mut self, end: u64) -> Option<u64> {
        self.pool.run_until_stalled();
        let next = [self.clock.next_deadline(), self.driver.next_deadline()]
            .into_iter()
            .flatten()
            .min()?;
        (next <= end).then_some(next)
    }
}

impl Default for MotionRuntime {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::TransitionBuilder;

    #[test]
    fn test_advance_moves_clock_exactly() {
        let mut runtime = MotionRuntime::default();
        runtime.advance(37);
        assert_eq!(runtime.now_ms(), 37);
        assert_eq!(runtime.run_until_idle(), 0);
    }

    #[test]
    fn test_advance_stops_at_end_of_time() {
        let mut runtime = MotionRuntime::default();
        runtime.advance(5);
        runtime.advance(u64::MAX);
        assert_eq!(runtime.now_ms(), u64::MAX);
    }

    #[test]
    fn test_intermediate_frames_are_rendered() {
        let mut runtime = MotionRuntime::default();
        let id = runtime.scene_mut().add_element(None);
        let outcome = runtime.play(
            TransitionBuilder::new(id)
                .duration(160)
                .easing(crate::Easing::Linear)
                .translate_by(160.0, 0.0)
                .into_motion(),
        );

        runtime.advance(80);
        let x = runtime.scene().props(id).unwrap().translate_x;
        assert!((x - 80.0).abs() < 0.01);
        assert!(!outcome.is_settled());

        assert_eq!(runtime.run_until_idle(), 80);
        assert_eq!(runtime.scene().props(id).unwrap().translate_x, 160.0);
        assert_eq!(outcome.settled_at(), Some(160));
    }

    #[test]
    fn test_runtime_uses_config() {
        let config = MotionConfig {
            record_history: false,
            ..Default::default()
        };
        let mut runtime = MotionRuntime::new(config);
        let id = runtime.scene_mut().add_element(None);
        runtime.play(TransitionBuilder::new(id).duration(10).fade_out().into());
        runtime.run_until_idle();

        assert!(runtime.history().is_empty());
        assert_eq!(
            runtime.presets(),
            AnimationPreset::from_config(runtime.config())
        );
    }
}
