// Human explanation of why a value was flagged
use crate::context::{ContextInfo, ContextKind};
use crate::scanner::digit_len;

pub fn explain_context(value: u64, context: &ContextInfo) -> String {
    match context.kind() {
        ContextKind::Json => match context.json_path() {
            Some(path) => {
                let key = path.rsplit('.').next().unwrap_or(path);
                format!(
                    "Detected because JSON key \"{}\" matches common timestamp fields",
                    key
                )
            }
            None => "Detected because value appears in JSON context".to_string(),
        },
        ContextKind::Log => "Detected because value follows a log time field".to_string(),
        ContextKind::Sql => "Detected because value appears in a SQL time column".to_string(),
        ContextKind::Raw => match digit_len(value) {
            10 => "Detected because value length matches Unix timestamp (seconds)".to_string(),
            13 => {
                "Detected because value length matches Unix timestamp (milliseconds)".to_string()
            }
            _ => "Detected because value resembles a Unix timestamp".to_string(),
        },
    }
}
