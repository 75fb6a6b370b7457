pub mod bvh;
pub mod clock;
pub mod controller;
pub mod input_adapter;
pub mod input_sampler;
pub mod perf;
pub mod triangle_intersection;

pub use clock::Clock;
pub use controller::{Button, Controller, Key};
pub use input_adapter::WinitInput;
pub use input_sampler::{InputSampler, MoveIntent};
pub use perf::FrameStats;
