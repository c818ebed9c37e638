// SPDX-License-Identifier: PMPL-1.0-or-later
//! Wcagbot CLI - WCAG criteria lookup and conformance checking
//!
//! Part of the gitbot-fleet ecosystem.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wcagbot::catalog::{self, Level, Principle};
use wcagbot::config::{self, Config};
use wcagbot::report::{self, OutputFormat};
use wcagbot::{scanner, Rgb, TextSize};

/// WCAG success-criteria catalog and conformance evaluator for gitbot-fleet
#[derive(Parser)]
#[command(name = "wcagbot")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one success criterion
    Criterion {
        /// Dotted criterion id, e.g. 1.4.3
        id: String,

        #[command(flatten)]
        out: LookupOutput,
    },

    /// Search criteria by title, description or guideline
    Search {
        /// Search term (case-insensitive)
        term: String,

        #[command(flatten)]
        out: LookupOutput,
    },

    /// List criteria, optionally filtered
    List {
        /// Only criteria at exactly this level
        #[arg(long)]
        level: Option<WcagLevelArg>,

        /// Only criteria under this principle
        #[arg(long)]
        principle: Option<String>,

        #[command(flatten)]
        out: LookupOutput,
    },

    /// The four principles, their guidelines and catalog totals
    Principles {
        #[command(flatten)]
        out: LookupOutput,
    },

    /// Criteria relevant to a topic (images, forms, color, keyboard, ...)
    Guidance {
        topic: String,

        #[command(flatten)]
        out: LookupOutput,
    },

    /// Contrast ratio of a colour pair against AA and AAA
    Contrast {
        /// Foreground colour (#rgb, #rrggbb, rgb(), or a CSS colour name)
        foreground: String,

        /// Background colour
        background: String,

        /// Treat the text as large (18pt, or 14pt bold)
        #[arg(long)]
        large: bool,

        #[command(flatten)]
        out: LookupOutput,
    },

    /// Run every rule over a single file
    Check {
        /// File to check
        file: PathBuf,

        #[command(flatten)]
        out: ReportOutput,
    },

    /// Evaluate a file or directory against a conformance level
    Validate {
        /// File or directory to validate
        path: PathBuf,

        /// WCAG conformance level (defaults to the config file, then AA)
        #[arg(long)]
        level: Option<WcagLevelArg>,

        #[command(flatten)]
        out: ReportOutput,
    },
}

#[derive(Args)]
struct LookupOutput {
    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ReportOutput {
    /// Output format (defaults to the config file, then text)
    #[arg(long)]
    format: Option<FormatArg>,

    /// Only report errors
    #[arg(long)]
    errors_only: bool,

    /// Output file (stdout if not specified)
    #[arg(long)]
    output: Option<PathBuf>,
}

/// WCAG conformance level CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum WcagLevelArg {
    /// Level A - minimum
    A,
    /// Level AA - standard
    Aa,
    /// Level AAA - enhanced
    Aaa,
}

impl From<WcagLevelArg> for Level {
    fn from(arg: WcagLevelArg) -> Self {
        match arg {
            WcagLevelArg::A => Level::A,
            WcagLevelArg::Aa => Level::AA,
            WcagLevelArg::Aaa => Level::AAA,
        }
    }
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI
    Sarif,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Sarif => OutputFormat::Sarif,
        }
    }
}

impl ReportOutput {
    fn format(&self, config: &Config) -> anyhow::Result<OutputFormat> {
        match self.format {
            Some(f) => Ok(f.into()),
            None => Ok(config.output_format()?),
        }
    }

    fn include_warnings(&self, config: &Config) -> bool {
        config.include_warnings && !self.errors_only
    }
}

fn init_logging(verbose: bool, config: &Config) {
    let filter = match (&config.log.level, verbose) {
        (_, true) => EnvFilter::new("wcagbot=debug"),
        (Some(directive), false) => EnvFilter::new(directive),
        (None, false) => EnvFilter::new("wcagbot=warn"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let config = config::load_config(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    init_logging(cli.verbose, &config);

    let catalog = catalog::global()?;
    debug!(
        "Catalog {} loaded with {} criteria",
        catalog.metadata().dataset_version,
        catalog.len()
    );

    match cli.command {
        Commands::Criterion { id, out } => {
            let criterion = catalog.get(&id)?;
            if out.json {
                println!("{}", report::to_json(criterion));
            } else {
                print!("{}", report::criterion_text(criterion));
            }
        }

        Commands::Search { term, out } => {
            print_criteria(&catalog.search(&term), out.json);
        }

        Commands::List { level, principle, out } => {
            let principle = principle
                .as_deref()
                .map(str::parse::<Principle>)
                .transpose()?;
            print_criteria(&catalog.filter(level.map(Level::from), principle), out.json);
        }

        Commands::Principles { out } => {
            if out.json {
                let principles: Vec<_> = catalog
                    .principles()
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "number": p.number(),
                            "name": p,
                            "summary": p.summary(),
                            "guidelines": catalog.guidelines(*p),
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    report::to_json(&serde_json::json!({
                        "metadata": catalog.metadata(),
                        "level_counts": catalog.level_counts(),
                        "principles": principles,
                    }))
                );
            } else {
                print!("{}", report::principles_text(catalog));
            }
        }

        Commands::Guidance { topic, out } => {
            print_criteria(&catalog.for_topic(&topic)?, out.json);
        }

        Commands::Contrast { foreground, background, large, out } => {
            let fg: Rgb = foreground.parse().map_err(anyhow::Error::msg)?;
            let bg: Rgb = background.parse().map_err(anyhow::Error::msg)?;
            let size = if large { TextSize::Large } else { TextSize::Normal };
            let assessment = wcagbot::evaluate_contrast(fg, bg, size);
            if out.json {
                println!("{}", report::to_json(&assessment));
            } else {
                print!("{}", report::contrast_text(&assessment));
            }
        }

        Commands::Check { file, out } => {
            let checked = scanner::check_file(&file)
                .with_context(|| format!("Failed to check {}", file.display()))?;
            let rendered = report::check_report(
                &checked,
                out.format(&config)?,
                out.include_warnings(&config),
            );
            write_output(&rendered, out.output.as_deref())?;

            if checked.violations.iter().any(|v| v.severity == wcagbot::Severity::Error) {
                std::process::exit(1);
            }
        }

        Commands::Validate { path, level, out } => {
            let level = level.map(Level::from).unwrap_or(config.level);
            let files = scanner::validate_path(&path, level, &config)
                .with_context(|| format!("Failed to validate {}", path.display()))?;
            let rendered = report::compliance_report(
                &files,
                out.format(&config)?,
                out.include_warnings(&config),
            );
            write_output(&rendered, out.output.as_deref())?;

            if files.iter().any(|f| !f.report.is_compliant()) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn print_criteria(criteria: &[&catalog::Criterion], json: bool) {
    if json {
        println!("{}", report::to_json(&criteria));
    } else {
        print!("{}", report::criteria_list_text(criteria));
    }
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
