pub mod activity;
pub mod color;
pub mod composition;
pub mod extractor;
pub mod quality;
pub mod scene;
pub mod shape;
pub mod text;

pub use activity::{ActivityAnalysis, ActivityAnalyzer, ActivityLevel};
pub use color::{ColorAnalysis, ColorAnalyzer, ColorScheme, ColorTemperature};
pub use composition::{CompositionAnalysis, CompositionAnalyzer, RegionGrid};
pub use extractor::{CategoryResult, FeatureExtractor, FeatureRecord};
pub use quality::{QualityAnalysis, QualityAnalyzer, QualityRating};
pub use scene::{SceneAnalysis, SceneAnalyzer, SceneFeatures, SceneType};
pub use shape::{ShapeAnalysis, ShapeAnalyzer, ShapeCounts};
pub use text::{TextAnalysis, TextAnalyzer, TextRegion};
