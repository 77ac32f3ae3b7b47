pub mod frame;
pub mod image;
pub mod issue;
pub mod report;

pub use frame::{format_clock, AnalysisType, FrameEvent, FrameTimestamp, PERFECT_SCORE};
pub use image::{StillImage, DEFAULT_JPEG_QUALITY};
pub use issue::{Category, Issue, Severity};
pub use report::{Detection, FirstOccurrence, IssueBreakdown, Report, ReportKind};
