//! 视频摘要入口

use chrono::Utc;
use log::info;

use crate::core::config::{AnalysisConfig, SamplerConfig};
use crate::core::error::AnalysisError;
use crate::core::pipeline::AnalysisPipeline;
use crate::core::summary::{SummaryMetadata, VideoSummary};
use crate::core::video::frame::SampledFrame;
use crate::core::video::sampler::FrameSampler;
use crate::core::video::source::{VideoInfo, VideoSource};
use crate::core::video::thumbnail::create_thumbnail;

/// 摘要调用选项
///
/// format_options 是外层格式化服务的私货, 这里原样盖进 metadata,
/// 核心不做任何解释
#[derive(Debug, Clone)]
pub struct SummarizeOptions {
    pub frame_budget: u32,
    pub format_options: Option<serde_json::Value>,
}

impl Default for SummarizeOptions {
    fn default() -> Self {
        Self {
            frame_budget: SamplerConfig::default().frame_budget,
            format_options: None,
        }
    }
}

/// 视频摘要器 - 抽帧 + 逐帧启发式特征 + 时间线聚合
pub struct VideoSummarizer {
    pipeline: AnalysisPipeline,
    options: SummarizeOptions,
}

impl VideoSummarizer {
    pub fn new() -> Self {
        Self::with_options(SummarizeOptions::default())
    }

    pub fn with_options(options: SummarizeOptions) -> Self {
        info!(
            "🎬 VideoSummarizer: created (frame_budget={})",
            options.frame_budget
        );
        let config = AnalysisConfig::with_frame_budget(options.frame_budget);
        Self {
            pipeline: AnalysisPipeline::with_config(config),
            options,
        }
    }

    /// 完整摘要一支视频
    pub fn summarize(
        &self,
        source: &mut dyn VideoSource,
    ) -> Result<VideoSummary, AnalysisError> {
        let mut summary = self.pipeline.analyze(source)?;
        self.stamp(&mut summary);
        info!(
            "✅ VideoSummarizer: {} frames analyzed, {} scene changes",
            summary.total_frames_analyzed,
            summary.scene_changes.len()
        );
        Ok(summary)
    }

    /// 摘要并直接序列化成 JSON 字符串
    pub fn summarize_to_json(
        &self,
        source: &mut dyn VideoSource,
    ) -> Result<String, AnalysisError> {
        let summary = self.summarize(source)?;
        Ok(serde_json::to_string(&summary)?)
    }

    /// 对调用方点选的帧出摘要, 帧的 user_requested 标记原样保留
    pub fn summarize_samples(&self, samples: &[SampledFrame]) -> VideoSummary {
        let mut summary = self.pipeline.analyze_samples(samples);
        self.stamp(&mut summary);
        summary
    }

    /// 读源的基本元信息, 不消费帧
    pub fn probe(&self, source: &dyn VideoSource) -> VideoInfo {
        VideoInfo::probe(source)
    }

    /// 取视频中点附近的采样帧做 JPEG 缩略图
    pub fn thumbnail(
        &self,
        source: &mut dyn VideoSource,
    ) -> Result<Option<Vec<u8>>, AnalysisError> {
        let mut sampler = FrameSampler::with_config(self.pipeline.config().sampler.clone());
        let samples = sampler.sample(source)?;
        create_thumbnail(&samples)
    }

    fn stamp(&self, summary: &mut VideoSummary) {
        summary.metadata = Some(SummaryMetadata {
            generated_at: Utc::now(),
            processing_mode: "visual_only".to_string(),
            frame_budget: self.options.frame_budget,
            format_options: self.options.format_options.clone(),
        });
    }
}

impl Default for VideoSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for VideoSummarizer {
    fn drop(&mut self) {
        info!("🗑️ VideoSummarizer: released");
    }
}
