pub mod video;

pub use video::{SummarizeOptions, VideoSummarizer};
