//! Blinc Motion
//!
//! Composable, awaitable element transitions.
//!
//! # Features
//!
//! - **Completion Units**: one element transition as a resolve-once future
//! - **Combinators**: parallel, sequential and staggered composition, nestable
//! - **Instant Hide**: zero the opacity of every element below a container
//! - **Presets**: fade, slide, enter and leave choreography
//! - **Headless Runtime**: deterministic virtual-time playback on an in-memory scene
//!
//! # Example
//!
//! ```rust
//! use blinc_motion::{MotionRuntime, TransitionPhase};
//!
//! let mut runtime = MotionRuntime::default();
//! let rows: Vec<_> = (0..3).map(|_| runtime.scene_mut().add_element(None)).collect();
//!
//! let presets = runtime.presets();
//! runtime.play(presets.hide_all(&rows));
//! let outcome = runtime.play(presets.fade_in_staggered(50, 200, &rows));
//! runtime.run_until_idle();
//!
//! assert_eq!(outcome.settled_at(), Some(300));
//! let starts: Vec<u64> = runtime
//!     .history()
//!     .iter()
//!     .filter(|event| event.phase == TransitionPhase::Started)
//!     .map(|event| event.at_ms)
//!     .collect();
//! assert_eq!(starts, vec![0, 50, 100]);
//! ```

pub mod clock;
pub mod config;
pub mod driver;
pub mod easing;
pub mod error;
pub mod hide;
pub mod motion;
pub mod presets;
pub mod runtime;
pub mod scene;
pub mod scheduler;
pub mod transition;
pub mod unit;

pub use clock::{Clock, VirtualClock};
pub use config::MotionConfig;
pub use driver::{AnimationDriver, Structure};
pub use easing::Easing;
pub use error::{MotionError, Result};
pub use motion::{Combinator, Leaf, Mode, Motion, Signal, Stage};
pub use presets::AnimationPreset;
pub use runtime::{MotionRuntime, Outcome};
pub use scene::{ElementId, ElementKind, Scene, VisualProps};
pub use scheduler::{SceneDriver, TransitionEvent, TransitionPhase};
pub use transition::{DeltaMode, Property, PropertyDelta, TransitionBuilder, TransitionSpec};
pub use unit::{completion, Completion, CompletionUnit, Settlement};
