// Terminal output for the CLI host: human (colored), plain, or JSON
use crate::annotate::Annotation;
use crate::tooltip::{TooltipRow, LABEL_CONFIDENCE, LABEL_RELATIVE};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use serde::Serialize;
use std::io::{self, IsTerminal};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Colors and box-drawing
    Human,
    /// Machine-readable JSON
    Json,
    /// Plain text without colors (for pipes/logs)
    Plain,
}

impl OutputMode {
    /// Auto-detect output mode based on environment
    pub fn auto() -> Self {
        if std::env::var("EPOCHLENS_JSON").is_ok() {
            Self::Json
        } else if !io::stdout().is_terminal() {
            Self::Plain
        } else {
            Self::Human
        }
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "plain" | "text" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            "auto" => Ok(Self::auto()),
            _ => Err(format!("Unknown format: {}. Supported: human, plain, json, auto", s)),
        }
    }
}

/// Pad the label before coloring it; escape codes would otherwise count toward the width
fn human_row_line(row: &TooltipRow, width: usize) -> String {
    let label = format!("{:width$}", row.label, width = width);
    let display = match row.label.as_str() {
        LABEL_CONFIDENCE => row.display.green().to_string(),
        LABEL_RELATIVE => row.display.italic().to_string(),
        _ => row.display.clone(),
    };
    format!("  {} │ {}", label.yellow(), display)
}

/// Scan report emitted in JSON mode
#[derive(Debug, Serialize)]
pub struct ScanReport<'a> {
    pub source: &'a str,
    pub candidates: usize,
    pub surfaced: usize,
    pub annotations: &'a [Annotation],
}

pub struct OutputWriter {
    mode: OutputMode,
}

impl OutputWriter {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Print a section header
    pub fn section(&self, title: &str) {
        match self.mode {
            OutputMode::Human => {
                println!();
                println!("{}", title.cyan().bold());
                println!("{}", "═".repeat(title.chars().count()).cyan());
            }
            OutputMode::Plain => {
                println!();
                println!("{}", title);
                println!("{}", "=".repeat(title.chars().count()));
            }
            OutputMode::Json => {}
        }
    }

    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Human => println!("  {} {}", "✓".green(), message),
            OutputMode::Plain => println!("  [OK] {}", message),
            OutputMode::Json => {}
        }
    }

    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Human => eprintln!("  {} {}", "⚠".yellow(), message),
            OutputMode::Plain | OutputMode::Json => eprintln!("  [WARN] {}", message),
        }
    }

    pub fn info(&self, message: &str) {
        match self.mode {
            OutputMode::Human | OutputMode::Plain => println!("  {}", message),
            OutputMode::Json => {}
        }
    }

    /// Print tooltip rows as an aligned label/value block
    pub fn rows(&self, rows: &[TooltipRow]) {
        let width = rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
        match self.mode {
            OutputMode::Human => {
                for row in rows {
                    println!("{}", human_row_line(row, width));
                }
            }
            OutputMode::Plain => {
                for row in rows {
                    println!("  {:width$} : {}", row.label, row.display, width = width);
                }
            }
            OutputMode::Json => {
                if let Ok(json) = serde_json::to_string_pretty(rows) {
                    println!("{}", json);
                }
            }
        }
    }

    /// One line per candidate, then the full rows of each surfaced one
    pub fn scan_report(&self, source: &str, annotations: &[Annotation], show_all: bool) {
        let surfaced = annotations.iter().filter(|a| a.is_surfaced()).count();

        if self.mode == OutputMode::Json {
            let shown: Vec<Annotation> = annotations
                .iter()
                .filter(|a| show_all || a.is_surfaced())
                .cloned()
                .collect();
            let report = ScanReport {
                source,
                candidates: annotations.len(),
                surfaced,
                annotations: &shown,
            };
            if let Ok(json) = serde_json::to_string_pretty(&report) {
                println!("{}", json);
            }
            return;
        }

        self.section(&format!("Timestamps in {}", source));
        self.info(&format!(
            "{} candidates, {} surfaced",
            annotations.len(),
            surfaced
        ));

        let shown: Vec<&Annotation> = annotations
            .iter()
            .filter(|a| show_all || a.is_surfaced())
            .collect();
        if shown.is_empty() {
            return;
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec![
            "#", "Offset", "Value", "Context", "Path", "Confidence", "Shown",
        ]);
        for a in &shown {
            table.add_row(vec![
                a.id.to_string(),
                a.offset.to_string(),
                a.raw.clone(),
                a.context.kind().label().to_string(),
                a.context.json_path().unwrap_or("-").to_string(),
                format!("{}%", a.confidence.percent),
                if a.is_surfaced() { "yes" } else { "no" }.to_string(),
            ]);
        }
        println!("{table}");

        for a in shown {
            if let Some(rows) = &a.rows {
                self.section(&format!("#{} {} @ {}", a.id, a.raw, a.offset));
                self.rows(rows);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_mode() {
        let mode = OutputMode::auto();
        assert!(matches!(mode, OutputMode::Plain | OutputMode::Human | OutputMode::Json));
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("json".parse::<OutputMode>(), Ok(OutputMode::Json));
        assert_eq!("TEXT".parse::<OutputMode>(), Ok(OutputMode::Plain));
        assert_eq!("human".parse::<OutputMode>(), Ok(OutputMode::Human));
        assert!("xml".parse::<OutputMode>().is_err());
    }

    #[test]
    fn test_human_rows_pad_label_inside_color() {
        let row = TooltipRow {
            label: "jq".to_string(),
            display: ".createdAt".to_string(),
            copy: ".createdAt".to_string(),
        };
        let width = "DateTime (Local)".len();

        colored::control::set_override(true);
        let colored_line = human_row_line(&row, width);
        colored::control::set_override(false);
        let plain_line = human_row_line(&row, width);
        colored::control::unset_override();

        let padded = format!("jq{}", " ".repeat(width - 2));
        assert!(colored_line.contains(&padded));
        assert!(colored_line.contains('\x1b'));
        assert_eq!(plain_line, format!("  {} │ .createdAt", padded));
    }
}
