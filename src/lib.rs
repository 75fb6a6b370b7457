pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod geometry;
pub mod loaders;
pub mod locomotion;
pub mod math;
pub mod scenes;
pub mod script;
pub mod session;
pub mod triggers;

pub use camera::{Axis, Pose};
pub use config::NavigationConfig;
pub use geometry::{BoxSurface, CollidableSurface, GeometryProvider, RayHit, SceneGeometry, TriangleMesh};
pub use locomotion::{GroundOutcome, HorizontalOutcome, StepReport};
pub use session::{FrameOutput, NavigationSession, PoseReporter};
pub use triggers::{Trigger, TriggerEvent, TriggerKind, TriggerListener, TriggerRegistry};
