use log::{debug, info, warn};

use crate::core::config::SamplerConfig;
use crate::core::error::AnalysisError;

use super::frame::SampledFrame;
use super::scene_change::SceneChangeDetector;
use super::source::VideoSource;

/// 帧采样器
///
/// 按帧预算把视频均匀切成区间，取每个区间的第一帧；
/// 同时在顺序读流的过程中做场景切换检测，命中时额外产出一帧。
/// 两类产出共享同一个预算上限。
pub struct FrameSampler {
    config: SamplerConfig,
    scene_change: SceneChangeDetector,
}

impl FrameSampler {
    pub fn new() -> Self {
        Self::with_config(SamplerConfig::default())
    }

    pub fn with_config(config: SamplerConfig) -> Self {
        let scene_change = SceneChangeDetector::with_config(config.scene_change.clone());
        Self {
            config,
            scene_change,
        }
    }

    /// 从视频源采样。打不开的源返回空列表而不是错误，
    /// 让下游以"无帧"摘要降级；预算为 0 属于调用方契约错误。
    pub fn sample(
        &mut self,
        source: &mut dyn VideoSource,
    ) -> Result<Vec<SampledFrame>, AnalysisError> {
        if self.config.frame_budget == 0 {
            return Err(AnalysisError::InvalidFrameBudget);
        }
        let budget = self.config.frame_budget as usize;

        let mut samples = Vec::new();
        if !source.is_open() {
            warn!("video source is not open, yielding empty sample set");
            return Ok(samples);
        }

        let total = source.frame_count();
        let fps = source.fps();
        let interval = Self::interval_for(total, budget as u64);
        debug!(
            "sampling: total={} fps={} budget={} interval={}",
            total, fps, budget, interval
        );

        self.scene_change.reset();

        let mut index: u64 = 0;
        while samples.len() < budget {
            let Some(frame) = source.read_next_frame() else {
                break;
            };

            // 几何不一致的坏帧跳过，不中断整个批次
            if frame.check_geometry().is_err() {
                warn!(
                    "skipping malformed frame at index {}: {} bytes for {}x{}",
                    index,
                    frame.data.len(),
                    frame.width,
                    frame.height
                );
                index += 1;
                continue;
            }

            let mut working =
                frame.resize_to(self.config.working_width, self.config.working_height);
            working.frame_index = index;

            let timestamp = if fps > 0.0 { index as f64 / fps } else { 0.0 };

            if index % interval == 0 && samples.len() < budget {
                samples.push(SampledFrame::regular(working.clone(), timestamp));
            }

            // 每一帧都要喂给检测器，保证"上一帧"始终是流中的前一帧
            if let Some(ratio) = self.scene_change.detect(&working) {
                if samples.len() < budget {
                    samples.push(SampledFrame::scene_change(working, timestamp, ratio));
                }
            }

            index += 1;
        }

        let scene_changes = samples
            .iter()
            .filter(|s| s.change_ratio.is_some())
            .count();
        info!(
            "sampled {} frames ({} scene changes) from {} streamed",
            samples.len(),
            scene_changes,
            index
        );
        Ok(samples)
    }

    /// 区间长度 = ⌈总帧数 / 预算⌉，至少为 1
    fn interval_for(total: u64, budget: u64) -> u64 {
        ((total + budget - 1) / budget).max(1)
    }
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self::new()
    }
}
