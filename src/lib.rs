//! Fee Projection - long-run cost of investment fees and tax drag across regions
//!
//! This library provides:
//! - A registry of region rules (account kinds, contribution limits, tax tables)
//! - A deterministic projection engine comparing fee-free and fee-laden growth
//! - Fee erosion and retention metrics with a yearly growth series
//! - A scenario runner with session-scoped saved scenarios and batch runs
//!
//! # Example
//!
//! ```rust,ignore
//! use fee_projection::{project, ProjectionInput};
//!
//! let input = ProjectionInput::new("uk", "ISA")
//!     .with_initial_amount(10_000.0)
//!     .with_annual_contribution(5_000.0)
//!     .with_fee("Expense ratio", 0.8);
//!
//! let result = project(&input)?;
//! println!("Retained: {:.1}%", result.retention_score()?);
//! ```

pub mod error;
pub mod regions;
pub mod projection;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use error::{EngineError, EngineResult};
pub use regions::{get_region_rules, RegionRegistry, RegionRules};
pub use projection::{project, ProjectionEngine, ProjectionInput, ProjectionResult};
pub use scenario::{SavedScenario, ScenarioRunner};
