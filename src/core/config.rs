//! 分析管线的阈值配置
//!
//! 所有可调常量集中在这里，各组件通过注入配置获取，
//! 避免魔法数字散落在调用点。

/// 场景切换检测配置
#[derive(Debug, Clone)]
pub struct SceneChangeConfig {
    /// 单像素灰度差阈值 (0-255)
    pub intensity_delta: u8,
    /// 变化像素占比阈值，超过即判定为场景切换
    pub pixel_ratio: f64,
}

impl Default for SceneChangeConfig {
    fn default() -> Self {
        Self {
            intensity_delta: 30,
            pixel_ratio: 0.30,
        }
    }
}

/// 抽帧配置
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// 最多输出的采样帧数
    pub frame_budget: u32,
    /// 统一的工作分辨率（分析前缩放到该尺寸）
    pub working_width: u32,
    pub working_height: u32,
    pub scene_change: SceneChangeConfig,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            frame_budget: 20,
            working_width: 800,
            working_height: 600,
            scene_change: SceneChangeConfig::default(),
        }
    }
}

/// 活动度分级阈值（Sobel 梯度均值）
#[derive(Debug, Clone)]
pub struct ActivityThresholds {
    pub high: f64,
    pub medium: f64,
    /// 超过该值标记 motion_detected
    pub motion: f64,
}

impl Default for ActivityThresholds {
    fn default() -> Self {
        Self {
            high: 50.0,
            medium: 25.0,
            motion: 30.0,
        }
    }
}

/// 画质评分阈值与归一化系数
#[derive(Debug, Clone)]
pub struct QualityThresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
    /// 清晰度（拉普拉斯方差）归一化分母
    pub sharpness_scale: f64,
    /// 噪点标准差归一化分母
    pub noise_scale: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            excellent: 80.0,
            good: 60.0,
            fair: 40.0,
            sharpness_scale: 1000.0,
            noise_scale: 50.0,
        }
    }
}

/// 整条管线的配置入口
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    pub sampler: SamplerConfig,
    pub activity: ActivityThresholds,
    pub quality: QualityThresholds,
}

impl AnalysisConfig {
    /// 快速扫描预设：帧预算减半，适合长视频粗扫
    pub fn quick_scan() -> Self {
        Self {
            sampler: SamplerConfig {
                frame_budget: 10,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn with_frame_budget(frame_budget: u32) -> Self {
        Self {
            sampler: SamplerConfig {
                frame_budget,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.sampler.frame_budget, 20);
        assert_eq!(config.sampler.working_width, 800);
        assert_eq!(config.sampler.working_height, 600);
        assert_eq!(config.sampler.scene_change.intensity_delta, 30);
        assert!((config.sampler.scene_change.pixel_ratio - 0.30).abs() < 1e-9);
    }

    #[test]
    fn test_quick_scan_preset() {
        let config = AnalysisConfig::quick_scan();
        assert_eq!(config.sampler.frame_budget, 10);
        // 其余阈值与默认一致
        assert!((config.activity.high - 50.0).abs() < 1e-9);
        assert!((config.quality.excellent - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_with_frame_budget() {
        let config = AnalysisConfig::with_frame_budget(5);
        assert_eq!(config.sampler.frame_budget, 5);
    }
}
