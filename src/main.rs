use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use epochlens::cli_output::{OutputMode, OutputWriter};
use epochlens::{
    annotate, compute_confidence, detect_context, interpret, tooltip_for, ContextInfo, Settings,
};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "epochlens")]
#[command(about = "Find Unix timestamps in text and explain what they mean", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (default: <config dir>/epochlens/settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a file (or stdin) for timestamps
    Scan {
        /// File to scan; reads stdin when omitted
        file: Option<PathBuf>,

        /// Also list candidates that were rejected or below the confidence gate
        #[arg(long)]
        all: bool,

        /// Host the text came from; skipped if disabled in settings
        #[arg(long)]
        host: Option<String>,

        /// Reference time in epoch milliseconds (default: now)
        #[arg(long)]
        now: Option<i64>,

        /// Output format (human, plain, json, auto)
        #[arg(short, long, default_value = "auto")]
        format: String,
    },

    /// Explain a single value
    Explain {
        /// Epoch value in seconds (10 digits) or milliseconds (13 digits)
        value: String,

        /// Surrounding text used to classify the value
        #[arg(long)]
        text: Option<String>,

        /// Byte offset of the value inside --text (default: first occurrence)
        #[arg(long, requires = "text")]
        offset: Option<usize>,

        /// Reference time in epoch milliseconds (default: now)
        #[arg(long)]
        now: Option<i64>,

        /// Output format (human, plain, json, auto)
        #[arg(short, long, default_value = "auto")]
        format: String,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print current settings
    Show,
    /// Print the settings file location
    Path,
    /// Restore defaults
    Reset,
    /// Set a value, e.g. `set minConfidence 70`
    Set { key: String, value: String },
    /// Skip scanning text from this host
    DisableHost { host: String },
    /// Re-enable a previously disabled host
    EnableHost { host: String },
}

fn settings_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => Ok(Settings::config_file_path()?),
    }
}

fn reference_time(now_ms: Option<i64>) -> Result<DateTime<Utc>> {
    match now_ms {
        Some(ms) => Utc
            .timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| anyhow!("Invalid --now value: {}", ms)),
        None => Ok(Utc::now()),
    }
}

fn parse_mode(format: &str) -> Result<OutputMode> {
    format.parse::<OutputMode>().map_err(|e| anyhow!(e))
}

fn run_scan(
    settings: &Settings,
    file: Option<PathBuf>,
    all: bool,
    host: Option<String>,
    now: DateTime<Utc>,
    out: &OutputWriter,
) -> Result<()> {
    if let Some(host) = host.as_deref() {
        if settings.is_host_disabled(host) {
            out.warning(&format!("Host {} is disabled in settings, nothing scanned", host));
            return Ok(());
        }
    }

    let (source, text) = match file {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Could not read {}", path.display()))?;
            (path.display().to_string(), text)
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Could not read stdin")?;
            ("stdin".to_string(), text)
        }
    };

    debug!("Scanning {} bytes from {}", text.len(), source);
    let annotations = annotate(&text, settings, &now);
    out.scan_report(&source, &annotations, all);
    Ok(())
}

fn run_explain(
    settings: &Settings,
    value: &str,
    text: Option<String>,
    offset: Option<usize>,
    now: DateTime<Utc>,
    out: &OutputWriter,
) -> Result<()> {
    let value: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("Not an integer: {}", value))?;

    let context = match text.as_deref() {
        Some(text) => {
            let offset = match offset {
                Some(o) => o,
                None => text
                    .find(&value.to_string())
                    .ok_or_else(|| anyhow!("{} does not occur in --text", value))?,
            };
            detect_context(text, offset)
        }
        None => ContextInfo::raw(),
    };

    if interpret(value).is_none() {
        out.warning(&format!(
            "{} is not a 10/13 digit epoch between 2000 and 2100",
            value
        ));
        return Ok(());
    }

    let confidence = compute_confidence(value, &context, settings);
    if !confidence.passes(settings.min_confidence) {
        out.warning(&format!(
            "Confidence {}% is below the configured minimum of {}%; it would not be surfaced",
            confidence.percent, settings.min_confidence
        ));
    }

    if let Some(rows) = tooltip_for(value, settings, &context, &now) {
        out.section(&value.to_string());
        out.rows(&rows);
    }
    Ok(())
}

fn run_config(action: ConfigAction, path: &Path, out: &OutputWriter) -> Result<()> {
    let mut settings = Settings::load_from(path)?;

    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            return Ok(());
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            return Ok(());
        }
        ConfigAction::Reset => settings = Settings::default(),
        ConfigAction::Set { key, value } => settings.set(&key, &value)?,
        ConfigAction::DisableHost { host } => {
            if !settings.disable_host(&host) {
                out.info(&format!("{} was already disabled", host));
            }
        }
        ConfigAction::EnableHost { host } => {
            if !settings.enable_host(&host) {
                out.info(&format!("{} was not disabled", host));
            }
        }
    }

    settings.save_to(path)?;
    out.success(&format!("Saved {}", path.display()));
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let path = settings_path(cli.config.as_deref())?;

    match cli.command {
        Commands::Scan {
            file,
            all,
            host,
            now,
            format,
        } => {
            let settings = Settings::load_from(&path)?;
            let out = OutputWriter::new(parse_mode(&format)?);
            run_scan(&settings, file, all, host, reference_time(now)?, &out)
        }

        Commands::Explain {
            value,
            text,
            offset,
            now,
            format,
        } => {
            let settings = Settings::load_from(&path)?;
            let out = OutputWriter::new(parse_mode(&format)?);
            run_explain(&settings, &value, text, offset, reference_time(now)?, &out)
        }

        Commands::Config { action } => {
            debug!("Settings file: {}", path.display());
            run_config(action, &path, &OutputWriter::new(OutputMode::auto()))
        }
    }
}
