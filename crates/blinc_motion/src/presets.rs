//! Motion presets for common entry/exit choreography
//!
//! Each preset is a [`TransitionBuilder`] template (fixed easing and property
//! deltas) optionally grouped under one of the [`Motion`] combinators.

use crate::config::MotionConfig;
use crate::easing::Easing;
use crate::motion::Motion;
use crate::scene::ElementId;
use crate::transition::{TransitionBuilder, DEFAULT_DURATION_MS};

/// Pre-built motions for common patterns
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationPreset {
    duration_ms: u32,
    easing: Easing,
}

impl Default for AnimationPreset {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            easing: Easing::default(),
        }
    }
}

impl AnimationPreset {
    pub fn from_config(config: &MotionConfig) -> Self {
        Self {
            duration_ms: config.default_duration_ms,
            easing: config.default_easing,
        }
    }

    /// Builder carrying this preset's default duration and easing
    pub fn animate(&self, target: ElementId) -> TransitionBuilder {
        TransitionBuilder::with_defaults(target, self.duration_ms, self.easing)
    }

    fn immediate(&self, target: ElementId) -> TransitionBuilder {
        self.animate(target).duration(0)
    }

    // ========================================================================
    // Grouping
    // ========================================================================

    /// Run motions in parallel
    pub fn animate_together<I>(&self, motions: I) -> Motion
    where
        I: IntoIterator,
        I::Item: Into<Motion>,
    {
        Motion::parallel(motions)
    }

    /// Run `action` once `delay_ms` has elapsed
    pub fn after_delay<F>(&self, delay_ms: u64, action: F) -> Motion
    where
        F: FnOnce() -> anyhow::Result<()> + 'static,
    {
        Motion::after_delay(delay_ms, action)
    }

    // ========================================================================
    // Instant visibility
    // ========================================================================

    /// Make an element transparent without animating
    pub fn hide(&self, target: ElementId) -> Motion {
        self.immediate(target).fade_out().into_motion()
    }

    pub fn hide_all(&self, targets: &[ElementId]) -> Motion {
        Motion::parallel(targets.iter().map(|target| self.hide(*target)))
    }

    /// Make an element opaque without animating
    pub fn show(&self, target: ElementId) -> Motion {
        self.immediate(target).fade_in().into_motion()
    }

    /// Instantly hide the plain elements below each container
    pub fn hide_children_of(&self, roots: &[ElementId]) -> Motion {
        Motion::parallel(roots.iter().map(|root| Motion::hide_children(*root)))
    }

    // ========================================================================
    // Fades
    // ========================================================================

    pub fn fade_in(&self, target: ElementId) -> Motion {
        self.animate(target).fade_in().into_motion()
    }

    pub fn fade_in_for(&self, target: ElementId, duration_ms: u32) -> Motion {
        self.animate(target)
            .easing(Easing::Decelerate)
            .duration(duration_ms)
            .fade_in()
            .into_motion()
    }

    pub fn fade_in_after(&self, target: ElementId, duration_ms: u32, delay_ms: u32) -> Motion {
        self.animate(target)
            .easing(Easing::Decelerate)
            .duration(duration_ms)
            .delay(delay_ms)
            .fade_in()
            .into_motion()
    }

    /// Fade elements in one after another, `stride_ms` apart
    pub fn fade_in_staggered(
        &self,
        stride_ms: u32,
        duration_ms: u32,
        targets: &[ElementId],
    ) -> Motion {
        Motion::staggered(
            stride_ms as u64,
            targets.iter().map(|target| {
                self.animate(*target)
                    .easing(Easing::Linear)
                    .duration(duration_ms)
                    .fade_in()
            }),
        )
    }

    // ========================================================================
    // Slides and entrances
    // ========================================================================

    pub fn slide_in(&self, target: ElementId, duration_ms: u32, x_offset: f32) -> Motion {
        self.animate(target)
            .easing(Easing::Decelerate)
            .duration(duration_ms)
            .translate_by(x_offset, 0.0)
            .into_motion()
    }

    /// Fade in while moving by (`x_offset`, `y_offset`)
    pub fn enter(&self, target: ElementId, x_offset: f32, y_offset: f32) -> Motion {
        self.enter_after(target, 0, x_offset, y_offset)
    }

    pub fn enter_after(
        &self,
        target: ElementId,
        delay_ms: u32,
        x_offset: f32,
        y_offset: f32,
    ) -> Motion {
        self.animate(target)
            .easing(Easing::Decelerate)
            .delay(delay_ms)
            .fade_in()
            .translate_by(x_offset, y_offset)
            .into_motion()
    }

    pub fn enter_with(
        &self,
        target: ElementId,
        duration_ms: u32,
        x_offset: f32,
        y_offset: f32,
        delay_ms: u32,
    ) -> Motion {
        self.animate(target)
            .easing(Easing::Decelerate)
            .duration(duration_ms)
            .delay(delay_ms)
            .fade_in()
            .translate_by(x_offset, y_offset)
            .into_motion()
    }

    /// Enter every element at once after a shared delay
    pub fn enter_together(&self, delay_ms: u32, x_offset: f32, targets: &[ElementId]) -> Motion {
        Motion::parallel(
            targets
                .iter()
                .map(|target| self.enter_after(*target, delay_ms, x_offset, 0.0)),
        )
    }

    pub fn enter_staggered(
        &self,
        stride_ms: u32,
        duration_ms: u32,
        x_offset: f32,
        targets: &[ElementId],
    ) -> Motion {
        self.enter_staggered_from(0, stride_ms, duration_ms, x_offset, targets)
    }

    /// Enter elements one after another, the first after `initial_delay_ms`
    pub fn enter_staggered_from(
        &self,
        initial_delay_ms: u32,
        stride_ms: u32,
        duration_ms: u32,
        x_offset: f32,
        targets: &[ElementId],
    ) -> Motion {
        Motion::staggered(
            stride_ms as u64,
            targets.iter().map(|target| {
                self.enter_with(*target, duration_ms, x_offset, 0.0, initial_delay_ms)
            }),
        )
    }

    pub fn enter_with_rotation(
        &self,
        target: ElementId,
        duration_ms: u32,
        x_offset: f32,
        y_offset: f32,
        delay_ms: u32,
        rotation: f32,
    ) -> Motion {
        self.animate(target)
            .duration(duration_ms)
            .delay(delay_ms)
            .fade_in()
            .rotate(rotation)
            .translate_by(x_offset, y_offset)
            .into_motion()
    }

    // ========================================================================
    // Exits
    // ========================================================================

    /// Fade out while moving back by (`x_offset`, `y_offset`)
    pub fn leave(&self, target: ElementId, x_offset: f32, y_offset: f32) -> Motion {
        self.animate(target)
            .easing(Easing::Accelerate)
            .fade_out()
            .translate_by(-x_offset, -y_offset)
            .into_motion()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{Leaf, Mode};
    use crate::runtime::MotionRuntime;
    use crate::scene::VisualProps;
    use crate::transition::{Property, PropertyDelta};
    use crate::unit::CompletionUnit;

    fn ids(count: usize) -> Vec<ElementId> {
        let mut scene = crate::Scene::new();
        (0..count).map(|_| scene.add_element(None)).collect()
    }

    fn unit(motion: &Motion) -> &CompletionUnit {
        match motion {
            Motion::Leaf(Leaf::Transition(unit)) => unit,
            other => panic!("expected a transition, got {other:?}"),
        }
    }

    #[test]
    fn test_hide_is_immediate() {
        let presets = AnimationPreset::default();
        let id = ids(1)[0];
        let hide = presets.hide(id);
        let spec = unit(&hide).spec();
        assert!(spec.is_immediate());
        assert_eq!(spec.deltas(), &[PropertyDelta::to(Property::Opacity, 0.0)]);
    }

    #[test]
    fn test_fade_in_uses_configured_defaults() {
        let config = MotionConfig {
            default_duration_ms: 120,
            default_easing: Easing::Linear,
            ..Default::default()
        };
        let presets = AnimationPreset::from_config(&config);
        let id = ids(1)[0];
        let fade = presets.fade_in(id);
        let spec = unit(&fade).spec();
        assert_eq!(spec.duration_ms(), 120);
        assert_eq!(spec.easing(), Easing::Linear);
    }

    #[test]
    fn test_leave_reverses_offsets() {
        let presets = AnimationPreset::default();
        let id = ids(1)[0];
        let leave = presets.leave(id, 30.0, 10.0);
        let spec = unit(&leave).spec();
        assert_eq!(spec.easing(), Easing::Accelerate);

        let end = spec.destination(VisualProps::default());
        assert_eq!(end.opacity, 0.0);
        assert_eq!(end.translate_x, -30.0);
        assert_eq!(end.translate_y, -10.0);
    }

    #[test]
    fn test_staggered_presets_select_staggered_mode() {
        let presets = AnimationPreset::default();
        let targets = ids(3);

        for motion in [
            presets.fade_in_staggered(50, 200, &targets),
            presets.enter_staggered_from(100, 50, 200, 24.0, &targets),
        ] {
            match motion {
                Motion::Group(group) => {
                    assert_eq!(group.mode(), Mode::Staggered { stride_ms: 50 });
                    assert_eq!(group.children().len(), 3);
                }
                other => panic!("expected a group, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_enter_staggered_from_applies_initial_delay() {
        let mut runtime = MotionRuntime::default();
        let targets: Vec<_> = (0..3)
            .map(|_| runtime.scene_mut().add_element(None))
            .collect();
        let presets = runtime.presets();
        let motion = presets.enter_staggered_from(100, 50, 200, 24.0, &targets);

        let outcome = runtime.play(motion);
        runtime.run_until_idle();

        let mut starts: Vec<_> = runtime
            .history()
            .iter()
            .filter(|e| e.phase == crate::TransitionPhase::Started)
            .map(|e| e.at_ms)
            .collect();
        starts.sort();
        assert_eq!(starts, vec![100, 150, 200]);
        assert_eq!(outcome.settled_at(), Some(400));
        for id in targets {
            let props = runtime.scene().props(id).unwrap();
            assert_eq!(props.opacity, 1.0);
            assert_eq!(props.translate_x, 24.0);
        }
    }

    #[test]
    fn test_show_and_hide_children_of() {
        let mut runtime = MotionRuntime::default();
        let (root, leaf, other_root, other_leaf) = {
            let mut scene = runtime.scene_mut();
            let root = scene.add_container(None);
            let leaf = scene.add_element(Some(root));
            let other_root = scene.add_container(None);
            let other_leaf = scene.add_element(Some(other_root));
            (root, leaf, other_root, other_leaf)
        };

        let presets = runtime.presets();
        let outcome = runtime.play(presets.hide_children_of(&[root, other_root]));
        assert_eq!(outcome.result(), Some(Ok(())));
        assert_eq!(runtime.scene().props(leaf).unwrap().opacity, 0.0);
        assert_eq!(runtime.scene().props(other_leaf).unwrap().opacity, 0.0);

        let outcome = runtime.play(presets.show(leaf));
        assert_eq!(outcome.settled_at(), Some(0));
        assert_eq!(runtime.scene().props(leaf).unwrap().opacity, 1.0);
    }

    #[test]
    fn test_enter_with_rotation() {
        let mut runtime = MotionRuntime::default();
        let id = runtime.scene_mut().add_element(None);
        let presets = runtime.presets();

        runtime.play(presets.hide(id));
        let motion = presets.enter_with_rotation(id, 200, 0.0, 40.0, 50, 180.0);
        let outcome = runtime.play(motion);
        runtime.run_until_idle();

        assert_eq!(outcome.settled_at(), Some(250));
        let props = runtime.scene().props(id).unwrap();
        assert_eq!(props.opacity, 1.0);
        assert_eq!(props.rotation, 180.0);
        assert_eq!(props.translate_y, 40.0);
    }
}
