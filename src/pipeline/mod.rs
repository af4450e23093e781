pub mod aggregation;
mod diagnostics;

pub use aggregation::{
    AggregationPipeline, AnalysisReport, BandResult, OVERALL_LABEL, OpponentLookups,
    OpponentResult, PipelineOptions,
};
pub use diagnostics::Diagnostics;
