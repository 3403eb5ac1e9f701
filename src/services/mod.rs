pub mod analytics;
pub mod grading;

pub use analytics::AnalyticsService;
pub use grading::GradingService;
