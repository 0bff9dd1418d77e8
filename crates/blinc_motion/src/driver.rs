//! Platform animation driver interface

use crate::error::Result;
use crate::scene::ElementId;
use crate::transition::{PropertyDelta, TransitionSpec};
use crate::unit::Completion;
use smallvec::SmallVec;

/// Structural shape of a target, as seen by tree traversals
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Structure {
    /// A plain element with no children
    Leaf,
    /// A container and its direct children
    Container(SmallVec<[ElementId; 8]>),
}

/// The per-property animation engine motions are executed on
///
/// Implementations run the interpolation and frame scheduling themselves and
/// report back through the [`Completion`] handle.
pub trait AnimationDriver {
    /// Run `spec` on `target`. The driver must report through `completion`
    /// once the transition settles, or report the target as lost if it
    /// becomes invalid first.
    fn animate(&self, target: ElementId, spec: &TransitionSpec, completion: Completion);

    /// Set properties directly, with no animation
    fn apply(&self, target: ElementId, deltas: &[PropertyDelta]) -> Result<()>;

    /// Read the target's structure
    fn structure(&self, target: ElementId) -> Result<Structure>;
}
