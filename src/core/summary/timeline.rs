use serde::{Deserialize, Serialize};

use crate::core::analysis::FeatureRecord;
use crate::core::video::frame::FrameKind;

/// 时间线条目: 对单帧特征的扁平投影, 供摘要直接消费
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub timestamp: f64,
    /// MM:SS
    pub timestamp_formatted: String,
    pub scene_type: String,
    pub activity_level: String,
    pub quality_rating: String,
    pub has_text: bool,
    pub frame_type: FrameKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_score: Option<f64>,
}

impl TimelineEvent {
    /// 出错的类别统一记成 "unknown", 不让单类失败拖垮时间线
    pub fn from_record(record: &FeatureRecord) -> Self {
        let scene_type = record
            .scene
            .ok()
            .map(|s| s.scene_type.as_str().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let activity_level = record
            .activity
            .ok()
            .map(|a| a.level.as_str().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let quality_rating = record
            .quality
            .ok()
            .map(|q| q.rating.as_str().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let has_text = record.text.ok().map(|t| t.has_text).unwrap_or(false);

        TimelineEvent {
            timestamp: record.timestamp,
            timestamp_formatted: format_timestamp(record.timestamp),
            scene_type,
            activity_level,
            quality_rating,
            has_text,
            frame_type: record.frame_type,
            change_score: record.change_ratio,
        }
    }
}

pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}
