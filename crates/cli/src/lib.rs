use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use context_code_splitter::{scope_index, BoundaryStrategy, Dialect, Splitter, SplitterConfig};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

mod config_file;
mod report;

use report::{ChunkReport, ExtractReport, GrepReport, ScopeReport, SplitReport};

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "context-split")]
#[command(about = "Split large source files into paste-ready parts", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(long, global = true)]
    quiet: bool,

    /// Splitter config file (JSON or TOML); flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Start from a built-in preset instead of the defaults
    #[arg(long, global = true, value_enum)]
    preset: Option<Preset>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    ChatPaste,
    SmallContext,
    ConstructFirst,
}

impl Preset {
    fn config(self) -> SplitterConfig {
        match self {
            Self::ChatPaste => SplitterConfig::for_chat_paste(),
            Self::SmallContext => SplitterConfig::for_small_context(),
            Self::ConstructFirst => SplitterConfig::construct_first(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Split a file into newline-aligned parts
    Split(SplitArgs),

    /// Extract a named function or class verbatim
    Extract(ExtractArgs),

    /// Show the lines around each literal occurrence of a string
    Grep(GrepArgs),

    /// Index identifiers, DOM ids, selectors and storage keys of a whole file
    Scope(ScopeArgs),
}

#[derive(Args)]
struct SplitArgs {
    /// Source file ("-" reads stdin)
    file: PathBuf,

    /// Soft cap on part size in characters
    #[arg(long)]
    max_chars: Option<usize>,

    /// Soft cap on part size in lines
    #[arg(long)]
    max_lines: Option<usize>,

    /// Boundary strategy: strict|construct-priority|hybrid (or C|A|B)
    #[arg(long)]
    strategy: Option<BoundaryStrategy>,

    /// Hybrid search distance as a fraction of the tentative cut offset
    #[arg(long)]
    grace_ratio: Option<f64>,

    /// Include defined names and frequent identifiers per part
    #[arg(long)]
    hints: bool,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ExtractArgs {
    /// Source file ("-" reads stdin)
    file: PathBuf,

    /// Construct name
    #[arg(long, short = 'n')]
    name: String,

    /// Block dialect (detected from the file extension by default)
    #[arg(long)]
    dialect: Option<Dialect>,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct GrepArgs {
    /// Source file ("-" reads stdin)
    file: PathBuf,

    /// Literal text to search for
    #[arg(long)]
    needle: String,

    /// Lines shown above and below each hit
    #[arg(long, short = 'C')]
    context_lines: Option<usize>,

    /// Maximum number of windows shown
    #[arg(long, short = 'm')]
    max_matches: Option<usize>,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ScopeArgs {
    /// Source file ("-" reads stdin)
    file: PathBuf,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

pub fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    let json_output = match &cli.command {
        Commands::Split(args) => args.json,
        Commands::Extract(args) => args.json,
        Commands::Grep(args) => args.json,
        Commands::Scope(args) => args.json,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let base = base_config(&cli)?;
    match cli.command {
        Commands::Split(args) => run_split(args, base)?,
        Commands::Extract(args) => run_extract(args, base)?,
        Commands::Grep(args) => run_grep(args, base)?,
        Commands::Scope(args) => run_scope(args)?,
    }

    Ok(())
}

fn base_config(cli: &Cli) -> Result<SplitterConfig> {
    match (&cli.config, cli.preset) {
        (Some(path), _) => {
            let config = config_file::load_config(path)?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        }
        (None, Some(preset)) => Ok(preset.config()),
        (None, None) => Ok(SplitterConfig::default()),
    }
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read source from stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn display_name(path: &Path) -> String {
    if path == Path::new("-") {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}

fn run_split(args: SplitArgs, mut config: SplitterConfig) -> Result<()> {
    if let Some(max_chars) = args.max_chars {
        config.max_chars = max_chars;
    }
    if let Some(max_lines) = args.max_lines {
        config.max_lines = max_lines;
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(grace_ratio) = args.grace_ratio {
        config.grace_ratio = grace_ratio;
    }
    let splitter = Splitter::new(config).context("Invalid split settings")?;

    let source = read_source(&args.file)?;
    let chunks = splitter.split(&source)?;
    let stats = splitter.stats(&chunks);
    log::info!("{}: {stats}", display_name(&args.file));
    if stats.oversized_chunks > 0 {
        log::warn!(
            "{} part(s) exceed max_chars={} to end on a construct",
            stats.oversized_chunks,
            splitter.config().max_chars
        );
    }

    let report = SplitReport {
        file: display_name(&args.file),
        strategy: splitter.config().strategy,
        stats,
        chunks: chunks
            .iter()
            .map(|chunk| ChunkReport {
                chunk,
                hints: args.hints.then(|| chunk.hints()),
            })
            .collect(),
    };

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&report)?)
    } else {
        print_stdout(&report::render_split(&report))
    }
}

fn run_extract(args: ExtractArgs, config: SplitterConfig) -> Result<()> {
    let splitter = Splitter::new(config).context("Invalid settings")?;
    let dialect = args
        .dialect
        .unwrap_or_else(|| Dialect::from_path(&args.file));
    let source = read_source(&args.file)?;

    let result = splitter.extract(&source, &args.name, dialect);
    if !result.found {
        log::warn!(
            "{} not extracted from {} ({})",
            args.name,
            display_name(&args.file),
            dialect.as_str()
        );
    }

    let report = ExtractReport {
        file: display_name(&args.file),
        name: &args.name,
        result: &result,
    };
    if args.json {
        print_stdout(&serde_json::to_string_pretty(&report)?)
    } else {
        print_stdout(&report::render_extract(&report))
    }
}

fn run_grep(args: GrepArgs, mut config: SplitterConfig) -> Result<()> {
    if let Some(context_lines) = args.context_lines {
        config.context_lines = context_lines;
    }
    if let Some(max_matches) = args.max_matches {
        config.max_matches = max_matches;
    }
    let splitter = Splitter::new(config).context("Invalid grep settings")?;

    let source = read_source(&args.file)?;
    let extraction = splitter.grep(&source, &args.needle)?;
    if extraction.is_truncated() {
        log::info!(
            "{} hits for '{}'; showing first {}",
            extraction.hit_count,
            args.needle,
            extraction.matches.len()
        );
    }

    let report = GrepReport {
        file: display_name(&args.file),
        needle: &args.needle,
        extraction: &extraction,
    };
    if args.json {
        print_stdout(&serde_json::to_string_pretty(&report)?)
    } else {
        print_stdout(&report::render_grep(&report))
    }
}

fn run_scope(args: ScopeArgs) -> Result<()> {
    let source = read_source(&args.file)?;
    let index = scope_index(&source);
    log::info!(
        "{}: {} identifiers, {} selectors",
        display_name(&args.file),
        index.identifiers.total,
        index.selectors.total
    );

    let report = ScopeReport {
        file: display_name(&args.file),
        index: &index,
    };
    if args.json {
        print_stdout(&serde_json::to_string_pretty(&report)?)
    } else {
        print_stdout(&report::render_scope(&report))
    }
}
