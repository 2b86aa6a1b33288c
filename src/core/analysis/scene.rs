use serde::{Deserialize, Serialize};

use crate::core::error::AnalysisError;
use crate::core::video::frame::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneType {
    #[serde(rename = "outdoor/nature")]
    OutdoorNature,
    #[serde(rename = "indoor/complex")]
    IndoorComplex,
    #[serde(rename = "static/presentation")]
    StaticPresentation,
    #[serde(rename = "dynamic/action")]
    DynamicAction,
    #[serde(rename = "standard")]
    Standard,
}

impl SceneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneType::OutdoorNature => "outdoor/nature",
            SceneType::IndoorComplex => "indoor/complex",
            SceneType::StaticPresentation => "static/presentation",
            SceneType::DynamicAction => "dynamic/action",
            SceneType::Standard => "standard",
        }
    }
}

/// 粗粒度画面描述标签
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFeatures {
    pub brightness_level: String,
    pub contrast_level: String,
    pub complexity: String,
    pub color_richness: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneAnalysis {
    pub scene_type: SceneType,
    pub brightness: f64,
    pub contrast: f64,
    pub edge_density: f64,
    pub color_diversity: f64,
    pub features: SceneFeatures,
}

/// 场景分类器
///
/// 由亮度/对比度/边缘密度/色彩多样性四个统计量按固定顺序的规则判型,
/// 规则之间有优先级, 先命中先生效
pub struct SceneAnalyzer;

impl SceneAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, frame: &Frame) -> Result<SceneAnalysis, AnalysisError> {
        frame.check_geometry()?;

        let w = frame.width as usize;
        let h = frame.height as usize;
        let total = w * h;
        if total == 0 {
            return Ok(self.classify(0.0, 0.0, 0.0, 0.0));
        }

        let gray = frame.to_intensity();

        let mut sum = 0u64;
        let mut sum_sq = 0u64;
        for &v in &gray {
            sum += v as u64;
            sum_sq += (v as u64) * (v as u64);
        }
        let brightness = sum as f64 / total as f64;
        let variance = sum_sq as f64 / total as f64 - brightness * brightness;
        let contrast = variance.max(0.0).sqrt();

        // 边缘密度: Sobel 幅值超过 100 的像素占比
        let mut edges = 0usize;
        if w >= 3 && h >= 3 {
            for y in 1..h - 1 {
                for x in 1..w - 1 {
                    let i = y * w + x;
                    let gx = (gray[i - w + 1] as i32
                        + 2 * gray[i + 1] as i32
                        + gray[i + w + 1] as i32)
                        - (gray[i - w - 1] as i32
                            + 2 * gray[i - 1] as i32
                            + gray[i + w - 1] as i32);
                    let gy = (gray[i + w - 1] as i32
                        + 2 * gray[i + w] as i32
                        + gray[i + w + 1] as i32)
                        - (gray[i - w - 1] as i32
                            + 2 * gray[i - w] as i32
                            + gray[i - w + 1] as i32);
                    if ((gx * gx + gy * gy) as f64).sqrt() > 100.0 {
                        edges += 1;
                    }
                }
            }
        }
        let edge_density = edges as f64 / total as f64;

        // 色彩多样性: 逐像素饱和度的标准差
        let mut sat_sum = 0u64;
        let mut sat_sum_sq = 0u64;
        for px in frame.data.chunks_exact(4) {
            let max = px[0].max(px[1]).max(px[2]) as u64;
            let min = px[0].min(px[1]).min(px[2]) as u64;
            let s = if max > 0 { (max - min) * 255 / max } else { 0 };
            sat_sum += s;
            sat_sum_sq += s * s;
        }
        let sat_mean = sat_sum as f64 / total as f64;
        let sat_var = sat_sum_sq as f64 / total as f64 - sat_mean * sat_mean;
        let color_diversity = sat_var.max(0.0).sqrt();

        Ok(self.classify(brightness, contrast, edge_density, color_diversity))
    }

    fn classify(
        &self,
        brightness: f64,
        contrast: f64,
        edge_density: f64,
        color_diversity: f64,
    ) -> SceneAnalysis {
        let scene_type = if brightness > 180.0 && color_diversity > 40.0 {
            SceneType::OutdoorNature
        } else if brightness < 80.0 && edge_density > 0.15 {
            SceneType::IndoorComplex
        } else if edge_density < 0.05 && contrast < 30.0 {
            SceneType::StaticPresentation
        } else if edge_density > 0.2 {
            SceneType::DynamicAction
        } else {
            SceneType::Standard
        };

        let features = SceneFeatures {
            brightness_level: if brightness > 127.0 { "bright" } else { "dark" }.to_string(),
            contrast_level: if contrast > 50.0 { "high" } else { "low" }.to_string(),
            complexity: if edge_density > 0.1 { "complex" } else { "simple" }.to_string(),
            color_richness: if color_diversity > 30.0 {
                "colorful"
            } else {
                "monochrome"
            }
            .to_string(),
        };

        SceneAnalysis {
            scene_type,
            brightness,
            contrast,
            edge_density,
            color_diversity,
            features,
        }
    }
}

impl Default for SceneAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_from(width: u32, height: u32, pixel_of: impl Fn(u32, u32) -> [u8; 3]) -> Frame {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let [r, g, b] = pixel_of(x, y);
                data.extend_from_slice(&[r, g, b, 255]);
            }
        }
        Frame::new(width, height, data, 0)
    }

    #[test]
    fn test_uniform_gray_is_static_presentation() {
        let analyzer = SceneAnalyzer::new();
        let frame = frame_from(64, 48, |_, _| [128, 128, 128]);

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert_eq!(result.scene_type, SceneType::StaticPresentation);
        assert!((result.brightness - 128.0).abs() < 1e-9);
        assert_eq!(result.contrast, 0.0);
        assert_eq!(result.edge_density, 0.0);
    }

    #[test]
    fn test_striped_gray_is_standard() {
        // 16 像素宽的 112/144 竖条纹: 亮度 128, 对比度 16,
        // 边缘密度约 0.09, 四条规则都不命中
        let analyzer = SceneAnalyzer::new();
        let frame = frame_from(64, 48, |x, _| {
            let v = if (x / 16) % 2 == 0 { 112 } else { 144 };
            [v, v, v]
        });

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert_eq!(result.scene_type, SceneType::Standard);
        assert!((result.brightness - 128.0).abs() < 1e-9);
        assert!(result.contrast < 30.0);
        assert!(result.edge_density > 0.05 && result.edge_density < 0.15);
    }

    #[test]
    fn test_bright_colorful_is_outdoor_nature() {
        // 高亮度 + 饱和度分布分散
        let analyzer = SceneAnalyzer::new();
        let frame = frame_from(64, 48, |x, _| {
            if (x / 8) % 2 == 0 {
                [255, 200, 100]
            } else {
                [255, 255, 255]
            }
        });

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert_eq!(result.scene_type, SceneType::OutdoorNature);
        assert!(result.brightness > 180.0);
        assert!(result.color_diversity > 40.0);
    }

    #[test]
    fn test_dark_busy_is_indoor_complex() {
        let analyzer = SceneAnalyzer::new();
        let frame = frame_from(64, 32, |x, _| {
            let v = if x % 4 < 2 { 0 } else { 100 };
            [v, v, v]
        });

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert_eq!(result.scene_type, SceneType::IndoorComplex);
        assert!(result.brightness < 80.0);
        assert!(result.edge_density > 0.15);
    }

    #[test]
    fn test_mid_bright_busy_is_dynamic_action() {
        // 亮度居中躲开前两条规则, 边缘密度压过 0.2
        let analyzer = SceneAnalyzer::new();
        let frame = frame_from(64, 32, |x, _| {
            let v = if x % 4 < 2 { 60 } else { 200 };
            [v, v, v]
        });

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert_eq!(result.scene_type, SceneType::DynamicAction);
        assert!(result.edge_density > 0.2);
    }

    #[test]
    fn test_feature_labels() {
        let analyzer = SceneAnalyzer::new();
        let frame = frame_from(32, 32, |_, _| [40, 40, 40]);

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert_eq!(result.features.brightness_level, "dark");
        assert_eq!(result.features.contrast_level, "low");
        assert_eq!(result.features.complexity, "simple");
        assert_eq!(result.features.color_richness, "monochrome");
    }

    #[test]
    fn test_scene_type_serializes_with_slash() {
        let json = serde_json::to_string(&SceneType::OutdoorNature).expect("serialize");
        assert_eq!(json, "\"outdoor/nature\"");
    }
}
