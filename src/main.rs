// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, error, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

use ytcaptions::app_config::{self, Config, OutputFormat};
use ytcaptions::formatters;
use ytcaptions::{TranscriptApi, TranscriptKind, TranscriptSelection, TranscriptSegment};

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Json,
    Pretty,
    Text,
    Srt,
    #[value(name = "webvtt", alias = "vtt")]
    WebVtt,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Pretty => OutputFormat::Pretty,
            CliOutputFormat::Text => OutputFormat::Text,
            CliOutputFormat::Srt => OutputFormat::Srt,
            CliOutputFormat::WebVtt => OutputFormat::WebVtt,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for ytcaptions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// ytcaptions - Video transcripts without an API key
///
/// Retrieves the captions of videos from their public watch page and prints them
/// as plain text, JSON, SRT or WebVTT.
#[derive(Parser, Debug)]
#[command(name = "ytcaptions")]
#[command(version)]
#[command(about = "Retrieve video transcripts from the watch page")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "ytcaptions retrieves the transcripts of videos without using an official API.

EXAMPLES:
    ytcaptions dQw4w9WgXcQ                              # Print the English transcript
    ytcaptions -l de,en dQw4w9WgXcQ                     # Prefer German, fall back to English
    ytcaptions --list-transcripts dQw4w9WgXcQ           # Show available transcripts
    ytcaptions -l en -t fr dQw4w9WgXcQ                  # Translate the English transcript to French
    ytcaptions -f srt --exclude-generated dQw4w9WgXcQ   # Manually created captions as SRT
    ytcaptions completions bash > ytcaptions.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Ids of the videos (not their URLs)
    #[arg(value_name = "VIDEO_IDS")]
    video_ids: Vec<String>,

    /// Language codes in descending priority, comma separated
    #[arg(short, long, value_delimiter = ',')]
    languages: Vec<String>,

    /// List the available transcripts instead of fetching one
    #[arg(long)]
    list_transcripts: bool,

    /// Only consider manually created transcripts
    #[arg(long)]
    exclude_generated: bool,

    /// Only consider generated transcripts
    #[arg(long)]
    exclude_manually_created: bool,

    /// Translate the selected transcript into this language code
    #[arg(short, long)]
    translate: Option<String>,

    /// Keep inline formatting tags such as <b> and <i>
    #[arg(short, long)]
    preserve_formatting: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn decoration_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::decoration_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "ytcaptions", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&cli)?;
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    if cli.video_ids.is_empty() {
        return Err(anyhow!("At least one VIDEO_ID is required"));
    }
    if cli.exclude_generated && cli.exclude_manually_created {
        return Err(anyhow!(
            "--exclude-generated and --exclude-manually-created together exclude every transcript"
        ));
    }

    let api = TranscriptApi::from_config(&config)?;

    if cli.list_transcripts {
        return list_transcripts(&api, &cli.video_ids).await;
    }

    let kind = if cli.exclude_generated {
        TranscriptKind::ManuallyCreated
    } else if cli.exclude_manually_created {
        TranscriptKind::Generated
    } else {
        TranscriptKind::Any
    };
    let selection = TranscriptSelection::new(config.default_languages.as_slice())
        .kind(kind)
        .translate_to(cli.translate.clone())
        .preserve_formatting(config.preserve_formatting);

    let batch = api.get_selected_transcripts(cli.video_ids.as_slice(), &selection, true).await?;
    for e in &batch.failed {
        error!("{}", e);
    }
    let failures = batch.failed.len();

    let transcripts: Vec<Vec<TranscriptSegment>> =
        batch.transcripts.into_iter().map(|(_, segments)| segments).collect();
    if !transcripts.is_empty() {
        let formatter = formatters::for_format(config.output_format);
        println!("{}", formatter.format_transcripts(&transcripts)?);
    }

    if failures > 0 {
        return Err(anyhow!("Failed to retrieve {} of {} transcript(s)", failures, cli.video_ids.len()));
    }
    Ok(())
}

// Load the config file and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config_path)?;

    if !cli.languages.is_empty() {
        config.default_languages = cli.languages.clone();
    }
    if cli.preserve_formatting {
        config.preserve_formatting = true;
    }
    if let Some(format) = &cli.format {
        config.output_format = format.clone().into();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate()?;
    debug!("Using configuration: {:?}", config);
    Ok(config)
}

async fn list_transcripts(api: &TranscriptApi, video_ids: &[String]) -> Result<()> {
    let mut failures = 0;
    for video_id in video_ids {
        match api.fetch_transcript_list(video_id).await {
            Ok(list) => println!("{}\n", list),
            Err(e) => {
                error!("{}", e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(anyhow!("Failed to list transcripts for {} video(s)", failures));
    }
    Ok(())
}
