use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("frame budget must be at least 1")]
    InvalidFrameBudget,
    #[error("frame buffer length {actual} does not match {width}x{height} RGBA geometry")]
    BadFrameGeometry {
        width: u32,
        height: u32,
        actual: usize,
    },
    #[error("image encode failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
