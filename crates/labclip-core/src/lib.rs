pub mod abbrev;
pub mod config;
pub mod dates;
pub mod dedupe;
pub mod group;
pub mod pipeline;
pub mod reference_range;
pub mod value;

pub use config::{CrossDuplicateRule, PipelineConfig, RangeOverride, RangeOverrides};
pub use dedupe::{Candidate, Deduplicated};
pub use group::{DatedItem, group_items};
pub use pipeline::process_records;
pub use reference_range::{ResolvedReference, parse_reference, resolve_range};
pub use value::{MergedReading, classify, format_decimal, merge_readings, normalize_value};
