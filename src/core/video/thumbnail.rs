use std::io::Cursor;

use image::ImageOutputFormat;
use log::debug;

use crate::core::error::AnalysisError;

use super::frame::SampledFrame;

pub const THUMBNAIL_WIDTH: u32 = 320;
pub const THUMBNAIL_HEIGHT: u32 = 240;
pub const THUMBNAIL_JPEG_QUALITY: u8 = 85;

/// 取时间上最接近视频中点的采样帧，缩放后编码为 JPEG。
/// 没有可用帧时返回 None。
pub fn create_thumbnail(samples: &[SampledFrame]) -> Result<Option<Vec<u8>>, AnalysisError> {
    create_thumbnail_sized(
        samples,
        THUMBNAIL_WIDTH,
        THUMBNAIL_HEIGHT,
        THUMBNAIL_JPEG_QUALITY,
    )
}

pub fn create_thumbnail_sized(
    samples: &[SampledFrame],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Option<Vec<u8>>, AnalysisError> {
    let valid: Vec<&SampledFrame> = samples
        .iter()
        .filter(|s| s.frame.check_geometry().is_ok())
        .collect();

    let Some(last) = valid.last() else {
        return Ok(None);
    };
    let midpoint = last.timestamp / 2.0;

    let picked = valid
        .iter()
        .min_by(|a, b| {
            let da = (a.timestamp - midpoint).abs();
            let db = (b.timestamp - midpoint).abs();
            da.total_cmp(&db)
        })
        .map(|s| &s.frame);

    let Some(frame) = picked else {
        return Ok(None);
    };
    debug!(
        "thumbnail from frame {} ({}x{} -> {}x{})",
        frame.frame_index, frame.width, frame.height, width, height
    );

    let scaled = frame.resize_to(width, height);
    // JPEG 不带 alpha，先转 RGB
    let img = match image::RgbaImage::from_raw(scaled.width, scaled.height, scaled.data) {
        Some(img) => image::DynamicImage::ImageRgba8(img).to_rgb8(),
        None => return Ok(None),
    };

    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageOutputFormat::Jpeg(quality))?;
    Ok(Some(buffer.into_inner()))
}
