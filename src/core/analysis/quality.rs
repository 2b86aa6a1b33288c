use serde::{Deserialize, Serialize};

use crate::core::config::QualityThresholds;
use crate::core::error::AnalysisError;
use crate::core::video::frame::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityRating::Excellent => "excellent",
            QualityRating::Good => "good",
            QualityRating::Fair => "fair",
            QualityRating::Poor => "poor",
        }
    }

    pub fn from_score(score: f64, thresholds: &QualityThresholds) -> Self {
        if score > thresholds.excellent {
            QualityRating::Excellent
        } else if score > thresholds.good {
            QualityRating::Good
        } else if score > thresholds.fair {
            QualityRating::Fair
        } else {
            QualityRating::Poor
        }
    }
}

/// 画质评估结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityAnalysis {
    /// Laplacian 响应方差, 越大越锐
    pub sharpness: f64,
    /// 高斯残差标准差
    pub noise_level: f64,
    pub overexposed_ratio: f64,
    pub underexposed_ratio: f64,
    /// 0-100 综合分
    pub overall_score: f64,
    pub rating: QualityRating,
}

pub struct QualityAnalyzer {
    thresholds: QualityThresholds,
}

impl QualityAnalyzer {
    pub fn new() -> Self {
        Self::with_thresholds(QualityThresholds::default())
    }

    pub fn with_thresholds(thresholds: QualityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn analyze(&self, frame: &Frame) -> Result<QualityAnalysis, AnalysisError> {
        frame.check_geometry()?;

        let w = frame.width as usize;
        let h = frame.height as usize;
        let total = w * h;
        if total == 0 {
            return Ok(self.build(0.0, 0.0, 0.0, 0.0));
        }

        let gray = frame.to_intensity();

        let sharpness = laplacian_variance(&gray, w, h);

        let blurred = gaussian_blur(&gray, w, h);
        let mut diff_sum = 0.0f64;
        let mut diff_sum_sq = 0.0f64;
        for i in 0..total {
            let d = gray[i] as f64 - blurred[i] as f64;
            diff_sum += d;
            diff_sum_sq += d * d;
        }
        let diff_mean = diff_sum / total as f64;
        let noise_level = (diff_sum_sq / total as f64 - diff_mean * diff_mean)
            .max(0.0)
            .sqrt();

        let over = gray.iter().filter(|&&v| v > 250).count() as f64 / total as f64;
        let under = gray.iter().filter(|&&v| v < 5).count() as f64 / total as f64;

        Ok(self.build(sharpness, noise_level, over, under))
    }

    fn build(&self, sharpness: f64, noise: f64, over: f64, under: f64) -> QualityAnalysis {
        let score = (sharpness / self.thresholds.sharpness_scale) * 30.0
            + (1.0 - noise / self.thresholds.noise_scale) * 30.0
            + (1.0 - over) * 20.0
            + (1.0 - under) * 20.0;
        let overall_score = score.clamp(0.0, 100.0);

        QualityAnalysis {
            sharpness,
            noise_level: noise,
            overexposed_ratio: over,
            underexposed_ratio: under,
            overall_score,
            rating: QualityRating::from_score(overall_score, &self.thresholds),
        }
    }
}

impl Default for QualityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// 四邻域 Laplacian 响应的方差
fn laplacian_variance(gray: &[u8], w: usize, h: usize) -> f64 {
    if w < 3 || h < 3 {
        return 0.0;
    }
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut count = 0u64;
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let i = y * w + x;
            let r = gray[i - w] as i32
                + gray[i + w] as i32
                + gray[i - 1] as i32
                + gray[i + 1] as i32
                - 4 * gray[i] as i32;
            sum += r as f64;
            sum_sq += (r * r) as f64;
            count += 1;
        }
    }
    if count == 0 {
        return 0.0;
    }
    let mean = sum / count as f64;
    (sum_sq / count as f64 - mean * mean).max(0.0)
}

/// 5x5 二项式核的可分离高斯模糊, 边界复制, 每趟整数舍入
fn gaussian_blur(gray: &[u8], w: usize, h: usize) -> Vec<u8> {
    const KERNEL: [u32; 5] = [1, 4, 6, 4, 1];

    let mut rows = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0u32;
            for (k, &weight) in KERNEL.iter().enumerate() {
                let sx = (x as isize + k as isize - 2).clamp(0, w as isize - 1) as usize;
                acc += gray[y * w + sx] as u32 * weight;
            }
            rows[y * w + x] = ((acc + 8) / 16) as u8;
        }
    }

    let mut out = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0u32;
            for (k, &weight) in KERNEL.iter().enumerate() {
                let sy = (y as isize + k as isize - 2).clamp(0, h as isize - 1) as usize;
                acc += rows[sy * w + x] as u32 * weight;
            }
            out[y * w + x] = ((acc + 8) / 16) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_frame_from(width: u32, height: u32, value_of: impl Fn(u32, u32) -> u8) -> Frame {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = value_of(x, y);
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Frame::new(width, height, data, 0)
    }

    #[test]
    fn test_uniform_gray_scores_seventy() {
        // 平坦画面: 锐度 0 噪声 0 曝光正常, 30 分的锐度项拿不到
        let analyzer = QualityAnalyzer::new();
        let frame = gray_frame_from(32, 32, |_, _| 128);

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert_eq!(result.sharpness, 0.0);
        assert_eq!(result.noise_level, 0.0);
        assert!((result.overall_score - 70.0).abs() < 1e-9);
        assert_eq!(result.rating, QualityRating::Good);
    }

    #[test]
    fn test_black_frame_is_underexposed() {
        let analyzer = QualityAnalyzer::new();
        let frame = gray_frame_from(32, 32, |_, _| 0);

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert!((result.underexposed_ratio - 1.0).abs() < 1e-9);
        assert_eq!(result.overexposed_ratio, 0.0);
        assert!((result.overall_score - 50.0).abs() < 1e-9);
        assert_eq!(result.rating, QualityRating::Fair);
    }

    #[test]
    fn test_white_frame_is_overexposed() {
        let analyzer = QualityAnalyzer::new();
        let frame = gray_frame_from(32, 32, |_, _| 255);

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert!((result.overexposed_ratio - 1.0).abs() < 1e-9);
        assert!((result.overall_score - 50.0).abs() < 1e-9);
        assert_eq!(result.rating, QualityRating::Fair);
    }

    #[test]
    fn test_sharp_stripes_hit_ceiling() {
        // 黑白条纹的 Laplacian 方差远超量程, 总分截断在 100
        let analyzer = QualityAnalyzer::new();
        let frame = gray_frame_from(64, 32, |x, _| if x % 4 < 2 { 0 } else { 255 });

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert!(result.sharpness > 1000.0);
        assert!((result.overall_score - 100.0).abs() < 1e-9);
        assert_eq!(result.rating, QualityRating::Excellent);
    }

    #[test]
    fn test_speckle_raises_noise_estimate() {
        let analyzer = QualityAnalyzer::new();
        let frame = gray_frame_from(32, 32, |x, y| {
            if (x + y * 32) % 16 == 0 {
                255
            } else {
                128
            }
        });

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert!(result.noise_level > 0.0);
    }

    #[test]
    fn test_rating_boundaries_are_strict() {
        let t = QualityThresholds::default();
        assert_eq!(QualityRating::from_score(80.0, &t), QualityRating::Good);
        assert_eq!(
            QualityRating::from_score(80.1, &t),
            QualityRating::Excellent
        );
        assert_eq!(QualityRating::from_score(60.0, &t), QualityRating::Fair);
        assert_eq!(QualityRating::from_score(60.1, &t), QualityRating::Good);
        assert_eq!(QualityRating::from_score(40.0, &t), QualityRating::Poor);
        assert_eq!(QualityRating::from_score(40.1, &t), QualityRating::Fair);
        assert_eq!(QualityRating::from_score(0.0, &t), QualityRating::Poor);
    }

    #[test]
    fn test_blur_preserves_flat_field() {
        let gray = vec![128u8; 16 * 16];
        let blurred = gaussian_blur(&gray, 16, 16);
        assert_eq!(gray, blurred);
    }
}
