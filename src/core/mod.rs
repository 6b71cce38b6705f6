pub mod sample;
pub mod trajectory;

pub use sample::{Pose, Sample, Velocity};
pub use trajectory::SampleBuffer;
