use crate::core::config::SceneChangeConfig;

use super::frame::Frame;

/// 场景切换检测器
///
/// 与"上一帧"做逐像素灰度差，变化像素占比超过阈值即判定为切换。
/// 上一帧缓存仅由本检测器持有，每次比较后覆盖。
pub struct SceneChangeDetector {
    intensity_delta: u8,
    pixel_ratio: f64,
    last_intensity: Option<Vec<u8>>,
}

impl SceneChangeDetector {
    pub fn new() -> Self {
        Self::with_config(SceneChangeConfig::default())
    }

    pub fn with_config(config: SceneChangeConfig) -> Self {
        Self {
            intensity_delta: config.intensity_delta,
            pixel_ratio: config.pixel_ratio,
            last_intensity: None,
        }
    }

    /// 比较当前帧与上一帧，超过阈值时返回变化占比。
    /// 首帧或分辨率变化时不产生比较结果，仅更新缓存。
    pub fn detect(&mut self, frame: &Frame) -> Option<f64> {
        let gray = frame.to_intensity();

        let ratio = match &self.last_intensity {
            Some(last) if last.len() == gray.len() && !gray.is_empty() => {
                Some(Self::changed_ratio(last, &gray, self.intensity_delta))
            }
            _ => None,
        };

        self.last_intensity = Some(gray);

        ratio.filter(|&r| r > self.pixel_ratio)
    }

    fn changed_ratio(last: &[u8], current: &[u8], delta: u8) -> f64 {
        let changed = last
            .iter()
            .zip(current.iter())
            .filter(|(&a, &b)| a.abs_diff(b) > delta)
            .count();
        changed as f64 / current.len() as f64
    }

    pub fn reset(&mut self) {
        self.last_intensity = None;
    }
}

impl Default for SceneChangeDetector {
    fn default() -> Self {
        Self::new()
    }
}
