use serde::{Deserialize, Serialize};

use crate::core::error::AnalysisError;

/// 帧数据结构
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>, // RGBA 格式
    pub frame_index: u64,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>, frame_index: u64) -> Self {
        Self {
            width,
            height,
            data,
            frame_index,
        }
    }

    pub fn pixel_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// 校验像素缓冲区与宽高是否一致
    pub fn check_geometry(&self) -> Result<(), AnalysisError> {
        let expected = self.pixel_count() * 4;
        if self.data.len() != expected {
            return Err(AnalysisError::BadFrameGeometry {
                width: self.width,
                height: self.height,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// RGB 转单通道灰度（整数运算）
    pub fn to_intensity(&self) -> Vec<u8> {
        self.data
            .chunks_exact(4)
            .map(|rgba| {
                ((rgba[0] as u32 * 299 + rgba[1] as u32 * 587 + rgba[2] as u32 * 114) / 1000) as u8
            })
            .collect()
    }

    pub fn resize_to(&self, target_width: u32, target_height: u32) -> Frame {
        if self.width == target_width && self.height == target_height {
            return self.clone();
        }
        let img = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .expect("Invalid frame data");
        let resized = image::imageops::resize(
            &img,
            target_width,
            target_height,
            image::imageops::FilterType::Triangle,
        );

        Frame {
            width: target_width,
            height: target_height,
            data: resized.into_raw(),
            frame_index: self.frame_index,
        }
    }
}

/// 采样帧的来源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    Regular,
    SceneChange,
    UserRequested,
}

impl FrameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameKind::Regular => "regular",
            FrameKind::SceneChange => "scene_change",
            FrameKind::UserRequested => "user_requested",
        }
    }
}

/// 从视频流中选出的一帧，带时间戳与来源标记。
/// 采样产出后不再修改。
#[derive(Debug, Clone)]
pub struct SampledFrame {
    pub frame: Frame,
    /// 秒，fps 未知时为 0
    pub timestamp: f64,
    pub kind: FrameKind,
    /// 仅场景切换帧携带：变化像素占比
    pub change_ratio: Option<f64>,
}

impl SampledFrame {
    pub fn regular(frame: Frame, timestamp: f64) -> Self {
        Self {
            frame,
            timestamp,
            kind: FrameKind::Regular,
            change_ratio: None,
        }
    }

    pub fn scene_change(frame: Frame, timestamp: f64, change_ratio: f64) -> Self {
        Self {
            frame,
            timestamp,
            kind: FrameKind::SceneChange,
            change_ratio: Some(change_ratio),
        }
    }

    pub fn user_requested(frame: Frame, timestamp: f64) -> Self {
        Self {
            frame,
            timestamp,
            kind: FrameKind::UserRequested,
            change_ratio: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let data = vec![255u8; 100 * 100 * 4]; // 100x100 white image
        let frame = Frame::new(100, 100, data, 30);

        assert_eq!(frame.width, 100);
        assert_eq!(frame.height, 100);
        assert_eq!(frame.pixel_count(), 10000);
        assert_eq!(frame.frame_index, 30);
        assert!(frame.check_geometry().is_ok());
    }

    #[test]
    fn test_frame_geometry_mismatch() {
        let frame = Frame::new(100, 100, vec![0u8; 16], 0);
        assert!(frame.check_geometry().is_err());
    }

    #[test]
    fn test_frame_resize() {
        let data = vec![255u8; 100 * 100 * 4];
        let frame = Frame::new(100, 100, data, 0);
        let resized = frame.resize_to(32, 32);

        assert_eq!(resized.width, 32);
        assert_eq!(resized.height, 32);
        assert_eq!(resized.data.len(), 32 * 32 * 4);
        assert_eq!(resized.frame_index, 0);
    }

    #[test]
    fn test_to_intensity() {
        // 纯白 -> 255, 纯黑 -> 0
        let mut data = vec![255u8; 2 * 1 * 4];
        data[4] = 0;
        data[5] = 0;
        data[6] = 0;
        let frame = Frame::new(2, 1, data, 0);

        let gray = frame.to_intensity();
        assert_eq!(gray.len(), 2);
        assert_eq!(gray[0], 255);
        assert_eq!(gray[1], 0);
    }

    #[test]
    fn test_sampled_frame_kinds() {
        let frame = Frame::new(2, 2, vec![0u8; 16], 0);

        let regular = SampledFrame::regular(frame.clone(), 1.5);
        assert_eq!(regular.kind, FrameKind::Regular);
        assert!(regular.change_ratio.is_none());

        let change = SampledFrame::scene_change(frame.clone(), 2.0, 0.8);
        assert_eq!(change.kind, FrameKind::SceneChange);
        assert_eq!(change.change_ratio, Some(0.8));
        assert_eq!(change.kind.as_str(), "scene_change");

        let requested = SampledFrame::user_requested(frame, 3.0);
        assert_eq!(requested.kind, FrameKind::UserRequested);
    }
}
