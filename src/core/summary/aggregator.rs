use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::analysis::{FeatureRecord, QualityRating};
use crate::core::config::QualityThresholds;
use crate::core::summary::narrative::build_narrative;
use crate::core::summary::timeline::TimelineEvent;
use crate::core::video::frame::FrameKind;

/// 关键时刻上限
pub const MAX_KEY_MOMENTS: usize = 5;
const MAX_SCENE_CHANGE_MOMENTS: usize = 3;
const MAX_HIGH_ACTIVITY_MOMENTS: usize = 2;
const MAX_TEXT_MOMENTS: usize = 2;
const MAX_TEXT_TIMESTAMPS: usize = 5;
const TOP_DISTRIBUTION: usize = 3;

/// 插入序稳定的频次表
///
/// most_common 的并列名次按首次出现的先后定胜负,
/// 不依赖哈希表的遍历顺序
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
}

impl FrequencyTable {
    pub fn add(&mut self, label: &str) {
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some(entry) => entry.1 += 1,
            None => self.entries.push((label.to_string(), 1)),
        }
    }

    pub fn most_common(&self, n: usize) -> Vec<LabelCount> {
        let mut sorted = self.entries.clone();
        // 稳定排序, 同频保持出现顺序
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
            .into_iter()
            .take(n)
            .map(|(label, count)| LabelCount { label, count })
            .collect()
    }

    pub fn top(&self) -> Option<String> {
        self.most_common(1).into_iter().next().map(|e| e.label)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatus {
    Ok,
    NoFrames,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoCharacteristics {
    pub dominant_scene_types: Vec<LabelCount>,
    pub color_schemes: Vec<LabelCount>,
    pub activity_levels: Vec<LabelCount>,
    pub average_quality_score: f64,
    pub text_present: bool,
    pub text_timestamps: Vec<f64>,
}

impl VideoCharacteristics {
    fn empty() -> Self {
        VideoCharacteristics {
            dominant_scene_types: Vec::new(),
            color_schemes: Vec::new(),
            activity_levels: Vec::new(),
            average_quality_score: 0.0,
            text_present: false,
            text_timestamps: Vec::new(),
        }
    }
}

/// 摘要生成时的上下文信息, 由 api 层盖戳
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryMetadata {
    pub generated_at: DateTime<Utc>,
    pub processing_mode: String,
    pub frame_budget: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_options: Option<serde_json::Value>,
}

/// 一支视频的聚合摘要, 构建后只读
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSummary {
    pub status: SummaryStatus,
    pub total_frames_analyzed: usize,
    pub video_characteristics: VideoCharacteristics,
    pub timeline: Vec<TimelineEvent>,
    pub scene_changes: Vec<TimelineEvent>,
    pub key_moments: Vec<TimelineEvent>,
    pub visual_summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SummaryMetadata>,
}

impl VideoSummary {
    /// 空输入的兜底摘要, 绝不以错误形式冒出去
    pub fn no_frames() -> Self {
        VideoSummary {
            status: SummaryStatus::NoFrames,
            total_frames_analyzed: 0,
            video_characteristics: VideoCharacteristics::empty(),
            timeline: Vec::new(),
            scene_changes: Vec::new(),
            key_moments: Vec::new(),
            visual_summary: "No visual content could be analyzed.".to_string(),
            metadata: None,
        }
    }
}

/// 时间线聚合器
pub struct TimelineAggregator {
    quality: QualityThresholds,
}

impl TimelineAggregator {
    pub fn new() -> Self {
        Self::with_thresholds(QualityThresholds::default())
    }

    pub fn with_thresholds(quality: QualityThresholds) -> Self {
        Self { quality }
    }

    pub fn aggregate(&self, records: &[FeatureRecord]) -> VideoSummary {
        if records.is_empty() {
            return VideoSummary::no_frames();
        }

        // 1. 投影成时间线 (采样顺序即时间顺序)
        let timeline: Vec<TimelineEvent> = records.iter().map(TimelineEvent::from_record).collect();

        // 2. 分布统计, 出错的类别不计入
        let mut scenes = FrequencyTable::default();
        let mut schemes = FrequencyTable::default();
        let mut activities = FrequencyTable::default();
        for record in records {
            if let Some(scene) = record.scene.ok() {
                scenes.add(scene.scene_type.as_str());
            }
            if let Some(colors) = record.colors.ok() {
                schemes.add(colors.scheme.as_str());
            }
            if let Some(activity) = record.activity.ok() {
                activities.add(activity.level.as_str());
            }
        }

        // 3. 画质均分
        let mut quality_sum = 0.0f64;
        let mut quality_count = 0usize;
        for record in records {
            if let Some(quality) = record.quality.ok() {
                quality_sum += quality.overall_score;
                quality_count += 1;
            }
        }
        let average_quality_score = if quality_count > 0 {
            quality_sum / quality_count as f64
        } else {
            0.0
        };

        // 4. 文字出现情况
        let text_present = timeline.iter().any(|e| e.has_text);
        let text_timestamps: Vec<f64> = timeline
            .iter()
            .filter(|e| e.has_text)
            .map(|e| e.timestamp)
            .take(MAX_TEXT_TIMESTAMPS)
            .collect();

        let scene_changes: Vec<TimelineEvent> = timeline
            .iter()
            .filter(|e| e.frame_type == FrameKind::SceneChange)
            .cloned()
            .collect();

        // 5. 关键时刻: 场景切换 + 高活动 + 含文字, 按时间戳去重后升序截断
        let mut key_moments: Vec<TimelineEvent> = Vec::new();
        key_moments.extend(scene_changes.iter().take(MAX_SCENE_CHANGE_MOMENTS).cloned());
        key_moments.extend(
            timeline
                .iter()
                .filter(|e| e.activity_level == "high")
                .take(MAX_HIGH_ACTIVITY_MOMENTS)
                .cloned(),
        );
        key_moments.extend(
            timeline
                .iter()
                .filter(|e| e.has_text)
                .take(MAX_TEXT_MOMENTS)
                .cloned(),
        );
        let mut seen: Vec<f64> = Vec::new();
        key_moments.retain(|e| {
            if seen.iter().any(|&t| t == e.timestamp) {
                false
            } else {
                seen.push(e.timestamp);
                true
            }
        });
        key_moments.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        key_moments.truncate(MAX_KEY_MOMENTS);

        // 6. 叙述文本
        let adjective = QualityRating::from_score(average_quality_score, &self.quality).as_str();
        let visual_summary = build_narrative(
            scenes.top().as_deref(),
            activities.top().as_deref(),
            schemes.top().as_deref(),
            adjective,
        );

        VideoSummary {
            status: SummaryStatus::Ok,
            total_frames_analyzed: records.len(),
            video_characteristics: VideoCharacteristics {
                dominant_scene_types: scenes.most_common(TOP_DISTRIBUTION),
                color_schemes: schemes.most_common(TOP_DISTRIBUTION),
                activity_levels: activities.most_common(usize::MAX),
                average_quality_score,
                text_present,
                text_timestamps,
            },
            timeline,
            scene_changes,
            key_moments,
            visual_summary,
            metadata: None,
        }
    }
}

impl Default for TimelineAggregator {
    fn default() -> Self {
        Self::new()
    }
}
