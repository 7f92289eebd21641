//! Course ("DLC") engine: step model, check validation, ghost playback and
//! gated navigation. UI-independent; the presentation layer consumes it
//! through [`CourseEngine`], [`validate::validate_step`] and the playback
//! events of [`ghost`].

pub mod engine;
pub mod ghost;
pub mod library;
pub mod progress;
pub mod spec;
pub mod validate;

pub use engine::{CourseEngine, CourseError, StepState};
pub use spec::{CourseDoc, Step, StepKind, flatten_course_steps};
