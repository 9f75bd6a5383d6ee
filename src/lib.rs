// epochlens - spot Unix timestamps in free-form text and explain them
//
// Pipeline: scanner -> context (+ json_path) -> confidence -> gate ->
// timestamp -> tooltip rows. Everything here is synchronous and pure apart
// from the settings file helpers.
pub mod annotate;
pub mod cli_output;
pub mod confidence;
pub mod context;
pub mod explain;
pub mod highlight;
pub mod json_path;
pub mod path_formats;
pub mod scanner;
pub mod settings;
pub mod timestamp;
pub mod tooltip;

pub use annotate::{annotate, annotate_into, explain_value, Annotation, AnnotationRegistry};
pub use confidence::{compute_confidence, Confidence};
pub use context::{detect_context, ContextInfo, ContextKind};
pub use json_path::infer_json_path;
pub use scanner::{scan_candidates, Candidate};
pub use settings::{Settings, SettingsError};
pub use timestamp::{interpret, relative_time_from};
pub use tooltip::{tooltip_for, tooltip_for_now, TooltipRow};
