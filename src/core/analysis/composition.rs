use serde::{Deserialize, Serialize};

use crate::core::error::AnalysisError;
use crate::core::video::frame::Frame;

/// 九宫格各区域的平均亮度 (RGB 三通道均值)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionGrid {
    pub top_left: f64,
    pub top_center: f64,
    pub top_right: f64,
    pub middle_left: f64,
    pub middle_center: f64,
    pub middle_right: f64,
    pub bottom_left: f64,
    pub bottom_center: f64,
    pub bottom_right: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionAnalysis {
    /// 最亮的九宫格区域名
    pub focus_area: String,
    pub region_brightness: RegionGrid,
    /// 左右镜像相似度, 1.0 为完全对称
    pub symmetry_score: f64,
    pub balance: String,
}

const REGION_NAMES: [[&str; 3]; 3] = [
    ["top_left", "top_center", "top_right"],
    ["middle_left", "middle_center", "middle_right"],
    ["bottom_left", "bottom_center", "bottom_right"],
];

pub struct CompositionAnalyzer;

impl CompositionAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, frame: &Frame) -> Result<CompositionAnalysis, AnalysisError> {
        frame.check_geometry()?;

        let w = frame.width as usize;
        let h = frame.height as usize;
        if w == 0 || h == 0 {
            return Ok(CompositionAnalysis {
                focus_area: REGION_NAMES[0][0].to_string(),
                region_brightness: RegionGrid::default(),
                symmetry_score: 1.0,
                balance: "asymmetric".to_string(),
            });
        }

        let mut means = [[0.0f64; 3]; 3];
        for gy in 0..3 {
            for gx in 0..3 {
                let x0 = gx * w / 3;
                let x1 = (gx + 1) * w / 3;
                let y0 = gy * h / 3;
                let y1 = (gy + 1) * h / 3;

                let mut sum = 0u64;
                for y in y0..y1 {
                    for x in x0..x1 {
                        let i = (y * w + x) * 4;
                        sum += frame.data[i] as u64
                            + frame.data[i + 1] as u64
                            + frame.data[i + 2] as u64;
                    }
                }
                let count = (x1 - x0) * (y1 - y0) * 3;
                means[gy][gx] = if count > 0 {
                    sum as f64 / count as f64
                } else {
                    0.0
                };
            }
        }

        // 行优先找最亮区域, 同值取先出现的
        let mut focus = REGION_NAMES[0][0];
        let mut best = means[0][0];
        for gy in 0..3 {
            for gx in 0..3 {
                if means[gy][gx] > best {
                    best = means[gy][gx];
                    focus = REGION_NAMES[gy][gx];
                }
            }
        }

        // 左右镜像逐通道差值
        let half = w / 2;
        let mut diff_sum = 0u64;
        let samples = h * half * 3;
        for y in 0..h {
            for x in 0..half {
                let left = (y * w + x) * 4;
                let right = (y * w + (w - 1 - x)) * 4;
                for c in 0..3 {
                    diff_sum += frame.data[left + c].abs_diff(frame.data[right + c]) as u64;
                }
            }
        }
        let symmetry_score = if samples > 0 {
            1.0 - diff_sum as f64 / samples as f64 / 255.0
        } else {
            1.0
        };

        let balance = if symmetry_score > 0.4 && symmetry_score < 0.6 {
            "balanced"
        } else {
            "asymmetric"
        };

        Ok(CompositionAnalysis {
            focus_area: focus.to_string(),
            region_brightness: RegionGrid {
                top_left: means[0][0],
                top_center: means[0][1],
                top_right: means[0][2],
                middle_left: means[1][0],
                middle_center: means[1][1],
                middle_right: means[1][2],
                bottom_left: means[2][0],
                bottom_center: means[2][1],
                bottom_right: means[2][2],
            },
            symmetry_score,
            balance: balance.to_string(),
        })
    }
}

impl Default for CompositionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_from(width: u32, height: u32, pixel_of: impl Fn(u32, u32) -> u8) -> Frame {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = pixel_of(x, y);
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Frame::new(width, height, data, 0)
    }

    #[test]
    fn test_uniform_frame_focus_defaults_to_first_region() {
        let analyzer = CompositionAnalyzer::new();
        let frame = frame_from(60, 60, |_, _| 128);

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert_eq!(result.focus_area, "top_left");
        assert!((result.symmetry_score - 1.0).abs() < 1e-9);
        // 完全对称落在 (0.4, 0.6) 区间之外
        assert_eq!(result.balance, "asymmetric");
        assert!((result.region_brightness.middle_center - 128.0).abs() < 1e-9);
    }

    #[test]
    fn test_bright_corner_wins_focus() {
        let analyzer = CompositionAnalyzer::new();
        let frame = frame_from(60, 60, |x, y| if x >= 40 && y >= 40 { 250 } else { 20 });

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert_eq!(result.focus_area, "bottom_right");
        assert!((result.region_brightness.bottom_right - 250.0).abs() < 1e-9);
        assert!((result.region_brightness.top_left - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_half_split_kills_symmetry() {
        let analyzer = CompositionAnalyzer::new();
        let frame = frame_from(64, 32, |x, _| if x < 32 { 0 } else { 255 });

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert!((result.symmetry_score - 0.0).abs() < 1e-9);
        assert_eq!(result.balance, "asymmetric");
    }

    #[test]
    fn test_moderate_asymmetry_is_balanced() {
        // 左黑右 128: 平均镜像差 128/255, 得分约 0.498
        let analyzer = CompositionAnalyzer::new();
        let frame = frame_from(64, 32, |x, _| if x < 32 { 0 } else { 128 });

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert!(result.symmetry_score > 0.4 && result.symmetry_score < 0.6);
        assert_eq!(result.balance, "balanced");
    }

    #[test]
    fn test_region_bounds_use_integer_thirds() {
        // 宽 10: 分界在 3 和 6, 右列有 4 像素
        let analyzer = CompositionAnalyzer::new();
        let frame = frame_from(10, 3, |x, _| if x >= 6 { 240 } else { 0 });

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert!((result.region_brightness.top_right - 240.0).abs() < 1e-9);
        assert!((result.region_brightness.top_center - 0.0).abs() < 1e-9);
    }
}
