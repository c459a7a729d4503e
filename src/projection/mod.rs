//! Projection engine: contribution clamping, fee aggregation, tax drag and
//! the yearly growth recurrence

mod engine;
mod input;
mod result;
mod tax_drag;

pub use engine::{effective_contribution, future_value, growth_path, project, ProjectionEngine};
pub use input::{FeeComponent, ProjectionInput, TaxSettings, MAX_HORIZON_YEARS};
pub use result::{ErosionMetrics, ProjectionResult, YearPoint};
pub use tax_drag::tax_drag_pct;
