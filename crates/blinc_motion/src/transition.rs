//! Transition descriptions and the builder that produces completion units

use crate::easing::Easing;
use crate::motion::Motion;
use crate::scene::{ElementId, VisualProps};
use crate::unit::CompletionUnit;
use smallvec::SmallVec;

/// Duration used when a builder is not given one explicitly
pub const DEFAULT_DURATION_MS: u32 = 300;

/// An animatable visual property
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    Opacity,
    TranslateX,
    TranslateY,
    /// Rotation in degrees (Z-axis)
    Rotation,
}

/// How a delta's value relates to the property's current value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeltaMode {
    /// Animate to the value
    To,
    /// Animate by the value, relative to where the property is when the
    /// transition begins
    By,
}

/// A single property change
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertyDelta {
    pub property: Property,
    pub mode: DeltaMode,
    pub value: f32,
}

impl PropertyDelta {
    pub fn to(property: Property, value: f32) -> Self {
        Self {
            property,
            mode: DeltaMode::To,
            value,
        }
    }

    pub fn by(property: Property, value: f32) -> Self {
        Self {
            property,
            mode: DeltaMode::By,
            value,
        }
    }

    /// The value this delta settles at, given the property's starting value
    pub fn resolve(&self, from: f32) -> f32 {
        match self.mode {
            DeltaMode::To => self.value,
            DeltaMode::By => from + self.value,
        }
    }
}

/// Immutable description of one element transition
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionSpec {
    duration_ms: u32,
    delay_ms: u32,
    easing: Easing,
    deltas: SmallVec<[PropertyDelta; 4]>,
}

impl TransitionSpec {
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn deltas(&self) -> &[PropertyDelta] {
        &self.deltas
    }

    /// A zero-duration, zero-delay spec is a direct state set
    pub fn is_immediate(&self) -> bool {
        self.duration_ms == 0 && self.delay_ms == 0
    }

    /// Final property values when starting from `from`
    pub fn destination(&self, from: VisualProps) -> VisualProps {
        let mut to = from;
        for delta in &self.deltas {
            to.set(delta.property, delta.resolve(from.get(delta.property)));
        }
        to
    }
}

/// Builder for a single element transition
///
/// ```rust
/// use blinc_motion::{Easing, Scene, TransitionBuilder};
///
/// let mut scene = Scene::new();
/// let card = scene.add_element(None);
///
/// let unit = TransitionBuilder::new(card)
///     .duration(250)
///     .easing(Easing::Decelerate)
///     .fade_in()
///     .translate_by(40.0, 0.0)
///     .build();
/// assert_eq!(unit.spec().deltas().len(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct TransitionBuilder {
    target: ElementId,
    spec: TransitionSpec,
}

impl TransitionBuilder {
    pub fn new(target: ElementId) -> Self {
        Self::with_defaults(target, DEFAULT_DURATION_MS, Easing::default())
    }

    pub fn with_defaults(target: ElementId, duration_ms: u32, easing: Easing) -> Self {
        Self {
            target,
            spec: TransitionSpec {
                duration_ms,
                delay_ms: 0,
                easing,
                deltas: SmallVec::new(),
            },
        }
    }

    pub fn duration(mut self, duration_ms: u32) -> Self {
        self.spec.duration_ms = duration_ms;
        self
    }

    pub fn delay(mut self, delay_ms: u32) -> Self {
        self.spec.delay_ms = delay_ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.spec.easing = easing;
        self
    }

    /// Add an arbitrary property delta
    pub fn delta(mut self, delta: PropertyDelta) -> Self {
        self.spec.deltas.push(delta);
        self
    }

    pub fn opacity(self, value: f32) -> Self {
        self.delta(PropertyDelta::to(Property::Opacity, value))
    }

    pub fn fade_in(self) -> Self {
        self.opacity(1.0)
    }

    pub fn fade_out(self) -> Self {
        self.opacity(0.0)
    }

    pub fn translate_by(self, dx: f32, dy: f32) -> Self {
        self.delta(PropertyDelta::by(Property::TranslateX, dx))
            .delta(PropertyDelta::by(Property::TranslateY, dy))
    }

    pub fn translate_to(self, x: f32, y: f32) -> Self {
        self.delta(PropertyDelta::to(Property::TranslateX, x))
            .delta(PropertyDelta::to(Property::TranslateY, y))
    }

    /// Rotate to an absolute angle in degrees
    pub fn rotate(self, degrees: f32) -> Self {
        self.delta(PropertyDelta::to(Property::Rotation, degrees))
    }

    pub fn build(self) -> CompletionUnit {
        CompletionUnit::new(self.target, self.spec)
    }

    pub fn into_motion(self) -> Motion {
        self.build().into()
    }
}
