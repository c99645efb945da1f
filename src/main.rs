// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use tablecheck::app_config::{self, Config, Variant};
use tablecheck::app_controller::{render_summary, Controller, ItemReport};
use tablecheck::file_utils::FileManager;
use tablecheck::templates::{TemplateGenerator, DEFAULT_TOKEN};

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

/// CLI Wrapper for Variant to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliVariant {
    Forms,
    Publications,
}

impl From<CliVariant> for Variant {
    fn from(cli_variant: CliVariant) -> Self {
        match cli_variant {
            CliVariant::Forms => Variant::Forms,
            CliVariant::Publications => Variant::Publications,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile the table links of every listed item (default command)
    #[command(alias = "check")]
    Reconcile(ReconcileArgs),

    /// Generate item documents from per-language templates
    Generate(GenerateArgs),

    /// Generate shell completions for tablecheck
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every command that loads the configuration
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

#[derive(Args, Debug, Clone)]
struct ReconcileArgs {
    /// File listing one item code per line
    #[arg(value_name = "ITEMS_FILE")]
    items_file: PathBuf,

    /// Directory holding the item documents
    #[arg(value_name = "DOCS_DIR")]
    docs_dir: PathBuf,

    /// Probe timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Report changes without writing any document
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Table variant
    #[arg(short, long, value_enum)]
    variant: Option<CliVariant>,

    /// Base URL for relative links
    #[arg(long)]
    base_url: Option<String>,

    /// Write a JSON report of every item to this path
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

#[derive(Args, Debug, Clone)]
struct GenerateArgs {
    /// File listing one item code per line
    #[arg(value_name = "ITEMS_FILE")]
    items_file: PathBuf,

    /// Directory holding template-<lang>.html files
    #[arg(value_name = "TEMPLATE_DIR")]
    template_dir: PathBuf,

    /// Directory receiving the generated documents
    #[arg(value_name = "OUT_DIR")]
    out_dir: PathBuf,

    /// Overwrite documents that already exist
    #[arg(short, long)]
    force: bool,

    /// Token replaced by the item code
    #[arg(long, default_value = DEFAULT_TOKEN)]
    token: String,
}

/// tablecheck - bilingual table link reconciler
///
/// Checks the links of paired English and French HTML tables and rewrites
/// cells so that both documents agree on what is available.
#[derive(Parser, Debug)]
#[command(name = "tablecheck")]
#[command(version)]
#[command(about = "Bilingual HTML table link reconciler")]
#[command(long_about = "tablecheck validates the links of paired language documents and keeps their tables in agreement.

EXAMPLES:
    tablecheck items.txt docs/                          # Reconcile using default config
    tablecheck -n items.txt docs/                       # Dry run, nothing is written
    tablecheck -v publications items.txt docs/          # Publications tables
    tablecheck --report report.json items.txt docs/     # Also write a JSON report
    tablecheck generate items.txt templates/ docs/      # Create documents from templates
    tablecheck completions bash > tablecheck.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically unless --dry-run is given.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    common: CommonArgs,

    /// File listing one item code per line
    #[arg(value_name = "ITEMS_FILE")]
    items_file: Option<PathBuf>,

    /// Directory holding the item documents
    #[arg(value_name = "DOCS_DIR")]
    docs_dir: Option<PathBuf>,

    /// Probe timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Report changes without writing any document
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Table variant
    #[arg(short, long, value_enum)]
    variant: Option<CliVariant>,

    /// Base URL for relative links
    #[arg(long)]
    base_url: Option<String>,

    /// Write a JSON report of every item to this path
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
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

    // @returns: Prefix and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
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
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (prefix, color) = Self::style_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, prefix, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // The level is lowered or raised once the config is loaded
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    if let Err(e) = run().await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "tablecheck", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Reconcile(args)) => run_reconcile(&cli.common, args).await,
        Some(Commands::Generate(args)) => run_generate(&cli.common, args),
        None => {
            // Default behavior - the top-level positional arguments
            let items_file = cli
                .items_file
                .ok_or_else(|| anyhow!("ITEMS_FILE is required when no subcommand is specified"))?;
            let docs_dir = cli
                .docs_dir
                .ok_or_else(|| anyhow!("DOCS_DIR is required when no subcommand is specified"))?;

            let args = ReconcileArgs {
                items_file,
                docs_dir,
                timeout: cli.timeout,
                dry_run: cli.dry_run,
                variant: cli.variant,
                base_url: cli.base_url,
                report: cli.report,
                no_progress: cli.no_progress,
            };
            run_reconcile(&cli.common, args).await
        }
    }
}

/// Load the configuration file; a missing file yields defaults, written out when `persist_default` is set
fn load_config(common: &CommonArgs, persist_default: bool) -> Result<Config> {
    if let Some(level) = &common.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config_path = Path::new(&common.config_path);
    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        let config = Config::default();
        if persist_default {
            warn!("Config file not found at '{}', creating default config.", common.config_path);
            config.save(config_path)?;
        } else {
            warn!("Config file not found at '{}', using defaults.", common.config_path);
        }
        config
    };

    match &common.log_level {
        Some(level) => config.log_level = level.clone().into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }
    Ok(config)
}

async fn run_reconcile(common: &CommonArgs, options: ReconcileArgs) -> Result<()> {
    let mut config = load_config(common, !options.dry_run)?;

    // Override config with CLI options if provided
    if let Some(timeout) = options.timeout {
        config.validation.timeout_secs = timeout;
    }
    if let Some(variant) = &options.variant {
        config.reconcile.variant = variant.clone().into();
    }
    if let Some(base_url) = &options.base_url {
        config.validation.base_url = Some(base_url.clone());
    }
    if options.dry_run {
        config.dry_run = true;
    }

    config.validate().context("Configuration validation failed")?;

    if !FileManager::file_exists(&options.items_file) {
        return Err(anyhow!("Items file does not exist: {:?}", options.items_file));
    }
    if !FileManager::dir_exists(&options.docs_dir) {
        return Err(anyhow!("Document directory does not exist: {:?}", options.docs_dir));
    }

    let items = FileManager::read_item_list(&options.items_file)?;
    if items.is_empty() {
        warn!("No items listed in {:?}", options.items_file);
    }
    info!(
        "Reconciling {} item(s) as {} tables{}",
        items.len(),
        config.reconcile.variant,
        if config.dry_run { " (dry run)" } else { "" }
    );

    let controller = Controller::with_config(config)?.with_progress(!options.no_progress);

    let cancel_flag = controller.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing probes already in flight");
            cancel_flag.cancel();
        }
    });

    let reports = controller.run(&items, &options.docs_dir).await?;
    print!("{}", render_summary(&reports));

    if let Some(report_path) = &options.report {
        write_report(report_path, &reports)?;
        info!("Report written to {:?}", report_path);
    }
    Ok(())
}

fn write_report(path: &Path, reports: &[ItemReport]) -> Result<()> {
    let json = serde_json::to_string_pretty(reports).context("Failed to serialize report")?;
    FileManager::write_to_file(path, &json)
}

fn run_generate(common: &CommonArgs, options: GenerateArgs) -> Result<()> {
    let config = load_config(common, true)?;
    config.validate().context("Configuration validation failed")?;

    if !FileManager::dir_exists(&options.template_dir) {
        return Err(anyhow!("Template directory does not exist: {:?}", options.template_dir));
    }
    let items = FileManager::read_item_list(&options.items_file)?;

    let languages = [
        config.languages.primary.code.as_str(),
        config.languages.secondary.code.as_str(),
    ];
    let generator = TemplateGenerator::new(options.token, options.force);
    let written = generator.generate_pairs(&options.template_dir, &items, &languages, &options.out_dir)?;

    println!("{} document(s) written to {}", written.len(), options.out_dir.display());
    Ok(())
}
