use serde::{Deserialize, Serialize};

use crate::core::analysis::activity::{ActivityAnalysis, ActivityAnalyzer};
use crate::core::analysis::color::{ColorAnalysis, ColorAnalyzer};
use crate::core::analysis::composition::{CompositionAnalysis, CompositionAnalyzer};
use crate::core::analysis::quality::{QualityAnalysis, QualityAnalyzer};
use crate::core::analysis::scene::{SceneAnalysis, SceneAnalyzer};
use crate::core::analysis::shape::{ShapeAnalysis, ShapeAnalyzer};
use crate::core::analysis::text::{TextAnalysis, TextAnalyzer};
use crate::core::config::AnalysisConfig;
use crate::core::error::AnalysisError;
use crate::core::video::frame::{FrameKind, SampledFrame};

/// 单个特征类别的结果, 失败时序列化成 {"error": "..."}
/// 一个类别报错不拖垮整帧的其他类别
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryResult<T> {
    Ok(T),
    Err { error: String },
}

impl<T> CategoryResult<T> {
    pub fn ok(&self) -> Option<&T> {
        match self {
            CategoryResult::Ok(v) => Some(v),
            CategoryResult::Err { .. } => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CategoryResult::Ok(_))
    }

    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }
}

impl<T> From<Result<T, AnalysisError>> for CategoryResult<T> {
    fn from(res: Result<T, AnalysisError>) -> Self {
        match res {
            Ok(v) => CategoryResult::Ok(v),
            Err(e) => CategoryResult::Err {
                error: e.to_string(),
            },
        }
    }
}

/// 一帧的全部视觉特征
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub timestamp: f64,
    pub frame_type: FrameKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_ratio: Option<f64>,
    pub colors: CategoryResult<ColorAnalysis>,
    pub shapes: CategoryResult<ShapeAnalysis>,
    pub text: CategoryResult<TextAnalysis>,
    pub activity: CategoryResult<ActivityAnalysis>,
    pub scene: CategoryResult<SceneAnalysis>,
    pub composition: CategoryResult<CompositionAnalysis>,
    pub quality: CategoryResult<QualityAnalysis>,
}

/// 特征提取器: 把七个分析器按固定顺序跑一遍
pub struct FeatureExtractor {
    color: ColorAnalyzer,
    shape: ShapeAnalyzer,
    text: TextAnalyzer,
    activity: ActivityAnalyzer,
    scene: SceneAnalyzer,
    composition: CompositionAnalyzer,
    quality: QualityAnalyzer,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self::with_config(&AnalysisConfig::default())
    }

    pub fn with_config(config: &AnalysisConfig) -> Self {
        Self {
            color: ColorAnalyzer::new(),
            shape: ShapeAnalyzer::new(),
            text: TextAnalyzer::new(),
            activity: ActivityAnalyzer::with_thresholds(config.activity.clone()),
            scene: SceneAnalyzer::new(),
            composition: CompositionAnalyzer::new(),
            quality: QualityAnalyzer::with_thresholds(config.quality.clone()),
        }
    }

    pub fn extract(&self, sampled: &SampledFrame) -> FeatureRecord {
        let frame = &sampled.frame;
        FeatureRecord {
            timestamp: sampled.timestamp,
            frame_type: sampled.kind,
            change_ratio: sampled.change_ratio,
            colors: self.color.analyze(frame).into(),
            shapes: self.shape.analyze(frame).into(),
            text: self.text.analyze(frame).into(),
            activity: self.activity.analyze(frame).into(),
            scene: self.scene.analyze(frame).into(),
            composition: self.composition.analyze(frame).into(),
            quality: self.quality.analyze(frame).into(),
        }
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}
