pub mod frame;
pub mod sampler;
pub mod scene_change;
pub mod source;
pub mod thumbnail;

pub use frame::{Frame, FrameKind, SampledFrame};
pub use sampler::FrameSampler;
pub use scene_change::SceneChangeDetector;
pub use source::{FrameSequenceSource, VideoInfo, VideoSource};
pub use thumbnail::{create_thumbnail, create_thumbnail_sized};
