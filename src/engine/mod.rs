pub mod pipeline;

pub use pipeline::{ExportSummary, SiteEngine};
