pub mod reading_cleaner;
pub mod report_builder;
pub mod resampler;

pub use reading_cleaner::{CleaningReport, ClippedValue, ReadingCleaner};
pub use report_builder::{ReportBuilder, ReportContext};
pub use resampler::Resampler;
