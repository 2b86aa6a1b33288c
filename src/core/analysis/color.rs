use serde::{Deserialize, Serialize};

use crate::core::error::AnalysisError;
use crate::core::video::frame::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTemperature {
    Warm,
    Cool,
    Neutral,
}

impl ColorTemperature {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTemperature::Warm => "warm",
            ColorTemperature::Cool => "cool",
            ColorTemperature::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    Monochromatic,
    HighContrast,
    Balanced,
}

impl ColorScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Monochromatic => "monochromatic",
            ColorScheme::HighContrast => "high_contrast",
            ColorScheme::Balanced => "balanced",
        }
    }
}

/// 色彩分析结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorAnalysis {
    /// 三通道均值，即画面主色调
    pub dominant_rgb: [u8; 3],
    pub temperature: ColorTemperature,
    /// HSV 饱和度均值 (0-255)
    pub saturation: f64,
    pub scheme: ColorScheme,
}

pub struct ColorAnalyzer {
    /// 三通道两两差值都小于该值视为单色调
    mono_spread: f64,
    /// 通道极差超过该值视为高对比
    contrast_spread: f64,
}

impl ColorAnalyzer {
    pub fn new() -> Self {
        Self {
            mono_spread: 20.0,
            contrast_spread: 100.0,
        }
    }

    pub fn analyze(&self, frame: &Frame) -> Result<ColorAnalysis, AnalysisError> {
        frame.check_geometry()?;

        let pixel_count = frame.pixel_count();
        if pixel_count == 0 {
            return Ok(ColorAnalysis {
                dominant_rgb: [0, 0, 0],
                temperature: ColorTemperature::Neutral,
                saturation: 0.0,
                scheme: ColorScheme::Balanced,
            });
        }

        let mut sum_r = 0u64;
        let mut sum_g = 0u64;
        let mut sum_b = 0u64;
        let mut sum_saturation = 0.0f64;

        for rgba in frame.data.chunks_exact(4) {
            let (r, g, b) = (rgba[0], rgba[1], rgba[2]);
            sum_r += r as u64;
            sum_g += g as u64;
            sum_b += b as u64;

            let max = r.max(g).max(b);
            let min = r.min(g).min(b);
            if max > 0 {
                sum_saturation += (max - min) as f64 * 255.0 / max as f64;
            }
        }

        let n = pixel_count as f64;
        let r = sum_r as f64 / n;
        let g = sum_g as f64 / n;
        let b = sum_b as f64 / n;

        let temperature = if r > g && r > b {
            ColorTemperature::Warm
        } else if b > r && b > g {
            ColorTemperature::Cool
        } else {
            ColorTemperature::Neutral
        };

        let max_channel = r.max(g).max(b);
        let min_channel = r.min(g).min(b);
        let scheme = if (r - g).abs() < self.mono_spread
            && (g - b).abs() < self.mono_spread
            && (r - b).abs() < self.mono_spread
        {
            ColorScheme::Monochromatic
        } else if max_channel - min_channel > self.contrast_spread {
            ColorScheme::HighContrast
        } else {
            ColorScheme::Balanced
        };

        Ok(ColorAnalysis {
            dominant_rgb: [
                r.round().min(255.0) as u8,
                g.round().min(255.0) as u8,
                b.round().min(255.0) as u8,
            ],
            temperature,
            saturation: sum_saturation / n,
            scheme,
        })
    }
}

impl Default for ColorAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
