use serde::{Deserialize, Serialize};

use crate::core::config::ActivityThresholds;
use crate::core::error::AnalysisError;
use crate::core::video::frame::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Low,
    Medium,
    High,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Low => "low",
            ActivityLevel::Medium => "medium",
            ActivityLevel::High => "high",
        }
    }
}

/// 画面活动度
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityAnalysis {
    /// Sobel 梯度幅值均值
    pub score: f64,
    pub level: ActivityLevel,
    pub motion_detected: bool,
}

pub struct ActivityAnalyzer {
    thresholds: ActivityThresholds,
}

impl ActivityAnalyzer {
    pub fn new() -> Self {
        Self::with_thresholds(ActivityThresholds::default())
    }

    pub fn with_thresholds(thresholds: ActivityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn analyze(&self, frame: &Frame) -> Result<ActivityAnalysis, AnalysisError> {
        frame.check_geometry()?;

        let w = frame.width as usize;
        let h = frame.height as usize;
        if w < 3 || h < 3 {
            return Ok(self.build(0.0));
        }

        let gray = frame.to_intensity();
        let mut sum = 0.0f64;
        let mut count = 0u64;

        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let i = y * w + x;
                let gx = (gray[i - w + 1] as i32 + 2 * gray[i + 1] as i32 + gray[i + w + 1] as i32)
                    - (gray[i - w - 1] as i32 + 2 * gray[i - 1] as i32 + gray[i + w - 1] as i32);
                let gy = (gray[i + w - 1] as i32 + 2 * gray[i + w] as i32 + gray[i + w + 1] as i32)
                    - (gray[i - w - 1] as i32 + 2 * gray[i - w] as i32 + gray[i - w + 1] as i32);
                sum += ((gx * gx + gy * gy) as f64).sqrt();
                count += 1;
            }
        }

        let score = if count > 0 { sum / count as f64 } else { 0.0 };
        Ok(self.build(score))
    }

    fn build(&self, score: f64) -> ActivityAnalysis {
        let level = if score > self.thresholds.high {
            ActivityLevel::High
        } else if score > self.thresholds.medium {
            ActivityLevel::Medium
        } else {
            ActivityLevel::Low
        };
        ActivityAnalysis {
            score,
            level,
            motion_detected: score > self.thresholds.motion,
        }
    }
}

impl Default for ActivityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
