pub mod analysis;
pub mod reference;

pub use analysis::{AnalysisRequest, AnalysisService};
pub use reference::ReferenceBuildService;
