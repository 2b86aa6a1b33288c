use log::info;

use crate::core::analysis::{FeatureExtractor, FeatureRecord};
use crate::core::config::AnalysisConfig;
use crate::core::error::AnalysisError;
use crate::core::summary::{TimelineAggregator, VideoSummary};
use crate::core::video::frame::SampledFrame;
use crate::core::video::sampler::FrameSampler;
use crate::core::video::source::VideoSource;

/// 视觉分析流水线: 采样 → 逐帧特征 → 时间线聚合
///
/// 严格单线程顺序执行, 帧与帧之间不共享可变状态
/// (场景切换的前帧缓冲归采样器私有)
pub struct AnalysisPipeline {
    config: AnalysisConfig,
    extractor: FeatureExtractor,
    aggregator: TimelineAggregator,
}

impl AnalysisPipeline {
    pub fn new() -> Self {
        Self::with_config(AnalysisConfig::default())
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        let extractor = FeatureExtractor::with_config(&config);
        let aggregator = TimelineAggregator::with_thresholds(config.quality.clone());
        Self {
            config,
            extractor,
            aggregator,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// 整条流水线。只有契约级错误 (比如预算为 0) 会向外抛,
    /// 打不开的源走"无帧"摘要
    pub fn analyze(&self, source: &mut dyn VideoSource) -> Result<VideoSummary, AnalysisError> {
        let mut sampler = FrameSampler::with_config(self.config.sampler.clone());
        let samples = sampler.sample(source)?;
        info!("pipeline: {} frames sampled, extracting features", samples.len());
        Ok(self.analyze_samples(&samples))
    }

    /// 调用方自备帧序列的入口 (比如用户点选的时间点),
    /// 输出与整管线同形的摘要
    pub fn analyze_samples(&self, samples: &[SampledFrame]) -> VideoSummary {
        let records: Vec<FeatureRecord> = samples
            .iter()
            .map(|sample| self.extractor.extract(sample))
            .collect();
        self.aggregator.aggregate(&records)
    }
}

impl Default for AnalysisPipeline {
    fn default() -> Self {
        Self::new()
    }
}
