pub mod analysis;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod summary;
pub mod video;

pub use error::AnalysisError;
pub use pipeline::AnalysisPipeline;
