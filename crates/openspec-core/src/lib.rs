pub mod advisor;
pub mod classifier;
pub mod compliance;
pub mod error;
pub mod pipeline;
pub mod project_structure;
pub mod reports;
pub mod rewriter;
pub mod spec_parser;
pub mod templates;
pub mod types;

pub use advisor::advise;
pub use classifier::{classify, classify_at};
pub use compliance::analyze;
pub use error::*;
pub use pipeline::{generate_spec, optimize, optimize_at, GeneratedSpec, OptimizationOutcome};
pub use project_structure::{format_structure, project_structure, StructureNode};
pub use reports::{error_envelope, optimization_report, spec_report, CreationReport};
pub use rewriter::{rewrite, rewrite_at};
pub use templates::{lookup, resolve, synthesize};
pub use types::*;
