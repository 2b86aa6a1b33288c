pub mod aggregator;
pub mod narrative;
pub mod timeline;

pub use aggregator::{
    FrequencyTable, LabelCount, SummaryMetadata, SummaryStatus, TimelineAggregator,
    VideoCharacteristics, VideoSummary, MAX_KEY_MOMENTS,
};
pub use narrative::build_narrative;
pub use timeline::{format_timestamp, TimelineEvent};
