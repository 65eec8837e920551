// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use subtrans::app_config::{self, Config};
use subtrans::app_controller::Controller;
use subtrans::errors::AppError;
use subtrans::subtitle_processor::SubtitleFormat;
use subtrans::translation::TranslationCache;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for SubtitleFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliSubtitleFormat {
    Srt,
    Vtt,
}

impl From<CliSubtitleFormat> for SubtitleFormat {
    fn from(cli_format: CliSubtitleFormat) -> Self {
        match cli_format {
            CliSubtitleFormat::Srt => SubtitleFormat::Srt,
            CliSubtitleFormat::Vtt => SubtitleFormat::WebVtt,
        }
    }
}

/// Options shared by every command that reads the configuration
#[derive(Args, Debug)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a subtitle file or URL
    Translate(TranslateArgs),

    /// Inspect or clear the translation cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Check that the translation backend answers
    Check {
        /// Target language code used for the test request
        #[arg(short, long)]
        target_language: Option<String>,
    },

    /// Generate shell completions for subtrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    /// Show cache statistics
    Stats,

    /// List the most served cached translations
    List {
        /// Maximum number of entries
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },

    /// Remove every cached translation
    Clear,

    /// Remove the cached translation of one source
    Remove {
        /// Subtitle URL or path, as it was translated
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Target language code of the entry
        #[arg(short, long)]
        target_language: Option<String>,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Subtitle URL (http/https/file) or local path
    #[arg(value_name = "SOURCE")]
    source: String,

    /// Target language code (e.g., 'he', 'ar', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Subtitle format, detected from the source when omitted
    #[arg(long, value_enum)]
    format: Option<CliSubtitleFormat>,

    /// Write the translation to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Bypass the translation cache
    #[arg(long)]
    no_cache: bool,

    /// Send backend requests without pacing
    #[arg(long)]
    no_delay: bool,
}

/// subtrans - Subtitle translation pipeline
///
/// Fetches a subtitle file, translates every cue while keeping timing and
/// format, and caches the result per source and target language.
#[derive(Parser, Debug)]
#[command(name = "subtrans")]
#[command(version)]
#[command(about = "Subtitle translation tool")]
#[command(long_about = "subtrans translates SRT and WebVTT subtitles while preserving their timing.

EXAMPLES:
    subtrans translate https://example.com/movie.srt           # Translate to the configured language
    subtrans translate movie.srt -t ar -o movie.ar.srt          # Translate a local file to Arabic
    subtrans translate https://example.com/ep1 --format vtt     # Force the WebVTT parser
    subtrans check -t he                                        # Check the translation backend
    subtrans cache stats                                        # Show cache statistics
    subtrans cache remove https://example.com/movie.srt -t he   # Forget one translation
    subtrans completions bash > subtrans.bash                   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    common: CommonArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The record filter is the global max level, adjusted after config load
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let cli = CommandLineOptions::parse();

    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: CommandLineOptions) -> Result<(), AppError> {
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subtrans", &mut std::io::stdout());
        return Ok(());
    }

    // Command line level applies before the config is read
    if let Some(level) = cli.common.log_level {
        log::set_max_level(app_config::LogLevel::from(level).to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.common.config_path)?;
    if let Some(level) = cli.common.log_level {
        config.log_level = level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    match cli.command {
        Commands::Translate(args) => run_translate(config, args).await?,
        Commands::Cache { action } => run_cache(config, action).await?,
        Commands::Check { target_language } => run_check(config, target_language).await?,
        Commands::Completions { .. } => {}
    }

    Ok(())
}

async fn run_translate(mut config: Config, args: TranslateArgs) -> Result<()> {
    if let Some(target_language) = &args.target_language {
        config.target_language = target_language.clone();
    }
    if args.no_cache {
        config.cache.enabled = false;
    }
    if args.no_delay {
        config.translation.rate_limit_delay_ms = 0;
    }

    config.validate()
        .context("Configuration validation failed")?;

    let format_hint = args.format.map(|f| SubtitleFormat::from(f).extension());
    let controller = Controller::with_config(config)?.with_progress_bar(true);

    let outcome = controller
        .translate(&args.source, format_hint, args.output.as_deref())
        .await?;

    if outcome.output_path.is_none() {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(outcome.content.as_bytes())
            .context("Failed to write translation to stdout")?;
        stdout.flush()?;
    }

    Ok(())
}

async fn run_cache(config: Config, action: CacheAction) -> Result<()> {
    let default_language = config.target_language.clone();
    let controller = Controller::with_config(config)?;

    match action {
        CacheAction::Stats => {
            info!("{}", controller.cache_summary().await?);
        }
        CacheAction::List { limit } => {
            let entries = controller.cache_entries(limit).await?;
            if entries.is_empty() {
                info!("No durable cache entries");
            }
            for entry in entries {
                println!("{}", entry);
            }
        }
        CacheAction::Clear => {
            let removed = controller.clear_cache().await?;
            info!("Removed {} cached translations", removed);
        }
        CacheAction::Remove { source, target_language } => {
            let target_language = target_language.unwrap_or(default_language);
            if controller.remove_from_cache(&source, &target_language).await? {
                info!("Removed cached translation of {} ({})", source, target_language);
            } else {
                info!("No cached translation of {} ({})", source, target_language);
            }
        }
    }

    Ok(())
}

async fn run_check(mut config: Config, target_language: Option<String>) -> Result<()> {
    if let Some(target_language) = target_language {
        config.target_language = target_language;
    }
    config.validate()
        .context("Configuration validation failed")?;

    let controller = Controller::with_cache(config, TranslationCache::disabled(), None);
    controller.test_connection().await?;
    info!("Translation backend is reachable");
    Ok(())
}
