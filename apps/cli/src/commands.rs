//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use campaignforge_analyzer::{AnalyzerState, WebsiteAnalyzer};
use campaignforge_core::{
    CampaignGenerator, DEFAULT_WEEK_COUNT, ParseOutcome, build_channel_matrix,
};
use campaignforge_shared::{
    AnalyzerOptions, AppConfig, CampaignContent, CampaignTopic, ContentType, GenerationContext,
    ProviderConfig, init_config, load_config, load_config_from,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// CampaignForge: AI-assisted marketing campaigns.
#[derive(Parser)]
#[command(
    name = "campaignforge",
    version,
    about = "Generate marketing topics, plans, and content from a company profile.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.campaignforge/campaignforge.toml.
    #[arg(long, global = true, env = "CAMPAIGNFORGE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Overrides for the `[provider]` config section.
#[derive(Args, Debug, Default)]
pub(crate) struct ProviderArgs {
    /// AI vendor: openai or anthropic.
    #[arg(long)]
    pub vendor: Option<String>,

    /// Model identifier.
    #[arg(long)]
    pub model: Option<String>,
}

/// Where a command's JSON result goes.
#[derive(Args, Debug, Default)]
pub(crate) struct OutputArgs {
    /// Write the result to this file instead of stdout.
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate weekly campaign topics.
    Topics {
        /// Company profile (GenerationContext JSON).
        #[arg(long)]
        context: PathBuf,

        /// Number of weeks (1-52). Defaults to the config value.
        #[arg(short, long)]
        weeks: Option<usize>,

        #[command(flatten)]
        provider: ProviderArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate a detailed campaign plan for a topic list.
    Plan {
        #[arg(long)]
        context: PathBuf,

        /// JSON array of topic titles or of topics from `topics`.
        #[arg(long)]
        topics: PathBuf,

        #[command(flatten)]
        provider: ProviderArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate content for one topic.
    Content {
        #[arg(long)]
        context: PathBuf,

        /// Topic title.
        #[arg(long)]
        topic: String,

        /// Content types (comma-separated): blog, video, social, email. Defaults to all.
        #[arg(long, value_delimiter = ',')]
        types: Vec<ContentType>,

        #[command(flatten)]
        provider: ProviderArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Simulate the target audience's reaction to generated content.
    Simulate {
        #[arg(long)]
        context: PathBuf,

        /// Content JSON produced by `content`.
        #[arg(long)]
        content: PathBuf,

        #[command(flatten)]
        provider: ProviderArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the channel matrix for a profile (no AI call).
    Channels {
        #[arg(long)]
        context: PathBuf,

        /// Optional topic list to map onto channels.
        #[arg(long)]
        topics: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Analyze a website in a headless browser.
    Analyze {
        /// Website URL (http or https).
        url: String,

        /// Also derive the brand-visual profile.
        #[arg(long)]
        brand: bool,

        /// Merge the brand-visual profile into this context file.
        #[arg(long)]
        merge_into: Option<PathBuf>,

        /// Skip the full-page screenshot.
        #[arg(long)]
        no_screenshot: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries results.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "campaignforge=info",
        1 => "campaignforge=debug",
        _ => "campaignforge=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Topics {
            context,
            weeks,
            provider,
            output,
        } => cmd_topics(config_path, &context, weeks, &provider, output.out.as_deref()).await,
        Command::Plan {
            context,
            topics,
            provider,
            output,
        } => cmd_plan(config_path, &context, &topics, &provider, output.out.as_deref()).await,
        Command::Content {
            context,
            topic,
            types,
            provider,
            output,
        } => {
            let out = output.out.as_deref();
            cmd_content(config_path, &context, &topic, &types, &provider, out).await
        }
        Command::Simulate {
            context,
            content,
            provider,
            output,
        } => cmd_simulate(config_path, &context, &content, &provider, output.out.as_deref()).await,
        Command::Channels {
            context,
            topics,
            output,
        } => cmd_channels(&context, topics.as_deref(), output.out.as_deref()),
        Command::Analyze {
            url,
            brand,
            merge_into,
            no_screenshot,
            output,
        } => {
            cmd_analyze(
                config_path,
                &url,
                brand,
                merge_into.as_deref(),
                no_screenshot,
                output.out.as_deref(),
            )
            .await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn app_config(path: Option<&Path>) -> Result<AppConfig> {
    Ok(match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    })
}

fn provider_config(config: &AppConfig, args: &ProviderArgs) -> Result<ProviderConfig> {
    let mut settings = config.provider.clone();
    if let Some(vendor) = &args.vendor {
        settings.vendor = vendor.clone();
    }
    if let Some(model) = &args.model {
        settings.model = model.clone();
    }
    Ok(settings.resolve()?)
}

fn generator(
    config_path: Option<&Path>,
    args: &ProviderArgs,
) -> Result<(AppConfig, CampaignGenerator)> {
    let config = app_config(config_path)?;
    let provider = provider_config(&config, args)?;
    info!(vendor = %provider.vendor, model = %provider.model, "using provider");
    let generator = CampaignGenerator::new(Some(provider))?;
    Ok((config, generator))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).wrap_err_with(|| format!("failed to parse {}", path.display()))
}

/// Topics file: either a list of titles or a list of topic objects.
fn read_topics(path: &Path) -> Result<Vec<CampaignTopic>> {
    let value: serde_json::Value = read_json(path)?;
    let items = value
        .as_array()
        .ok_or_else(|| eyre!("{} must contain a JSON array", path.display()))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            serde_json::Value::String(title) => Ok(CampaignTopic {
                week: i as u32 + 1,
                title: title.clone(),
                ..Default::default()
            }),
            other => serde_json::from_value(other.clone())
                .wrap_err_with(|| format!("invalid topic at index {i} in {}", path.display())),
        })
        .collect()
}

fn emit<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn emit_outcome<T: Serialize>(
    task: &str,
    outcome: ParseOutcome<T>,
    out: Option<&Path>,
) -> Result<()> {
    if outcome.is_fallback() {
        eprintln!(
            "note: the model's {task} output could not be parsed; showing the fallback result"
        );
    }
    emit(outcome.as_ref(), out)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_topics(
    config_path: Option<&Path>,
    context: &Path,
    weeks: Option<usize>,
    args: &ProviderArgs,
    out: Option<&Path>,
) -> Result<()> {
    let (config, generator) = generator(config_path, args)?;
    let context: GenerationContext = read_json(context)?;
    let week_count = weeks.unwrap_or(config.generation.week_count);
    info!(week_count, default = DEFAULT_WEEK_COUNT, "generating topics");

    let progress = CliProgress::start(format!("Generating {week_count} weekly topics"));
    let result = generator.generate_topics(&context, week_count).await;
    progress.finish();

    emit_outcome("topics", result?, out)
}

async fn cmd_plan(
    config_path: Option<&Path>,
    context: &Path,
    topics: &Path,
    args: &ProviderArgs,
    out: Option<&Path>,
) -> Result<()> {
    let (_, generator) = generator(config_path, args)?;
    let context: GenerationContext = read_json(context)?;
    let titles: Vec<String> = read_topics(topics)?.into_iter().map(|t| t.title).collect();

    let progress = CliProgress::start(format!("Planning a {}-week campaign", titles.len()));
    let result = generator.generate_plan(&context, &titles).await;
    progress.finish();

    emit_outcome("plan", result?, out)
}

async fn cmd_content(
    config_path: Option<&Path>,
    context: &Path,
    topic: &str,
    types: &[ContentType],
    args: &ProviderArgs,
    out: Option<&Path>,
) -> Result<()> {
    let (_, generator) = generator(config_path, args)?;
    let context: GenerationContext = read_json(context)?;

    let progress = CliProgress::start(format!("Writing content for \"{topic}\""));
    let result = generator.generate_content(&context, topic, types).await;
    progress.finish();

    emit_outcome("content", result?, out)
}

async fn cmd_simulate(
    config_path: Option<&Path>,
    context: &Path,
    content: &Path,
    args: &ProviderArgs,
    out: Option<&Path>,
) -> Result<()> {
    let (_, generator) = generator(config_path, args)?;
    let context: GenerationContext = read_json(context)?;
    let content: CampaignContent = read_json(content)?;
    if content.is_empty() {
        return Err(eyre!("content file has no blog, video, social, or email section"));
    }

    let progress = CliProgress::start("Simulating audience engagement");
    let result = generator.simulate_engagement(&context, &content).await;
    progress.finish();

    emit_outcome("engagement", result?, out)
}

fn cmd_channels(context: &Path, topics: Option<&Path>, out: Option<&Path>) -> Result<()> {
    let context: GenerationContext = read_json(context)?;
    let topics = topics.map(read_topics).transpose()?;
    let matrix = build_channel_matrix(&context, topics.as_deref());
    emit(&matrix, out)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOutput<'a> {
    analysis: &'a campaignforge_shared::WebsiteAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    brand_visuals: Option<&'a campaignforge_shared::BrandVisualAnalysis>,
}

async fn cmd_analyze(
    config_path: Option<&Path>,
    url: &str,
    brand: bool,
    merge_into: Option<&Path>,
    no_screenshot: bool,
    out: Option<&Path>,
) -> Result<()> {
    let config = app_config(config_path)?;
    let mut options = AnalyzerOptions::from(&config);
    if no_screenshot {
        options.capture_screenshot = false;
    }

    let analyzer = WebsiteAnalyzer::new(options);
    let progress = CliProgress::start(format!("Analyzing {url}"));
    let result = if brand || merge_into.is_some() {
        analyzer
            .analyze_and_extract(url)
            .await
            .map(|(analysis, visuals)| (analysis, Some(visuals)))
    } else {
        analyzer.analyze_website(url).await.map(|a| (a, None))
    };
    progress.finish();

    if analyzer.state().await != AnalyzerState::Uninitialized {
        analyzer.cleanup().await?;
    }
    let (analysis, visuals) = result?;

    if let (Some(path), Some(visuals)) = (merge_into, &visuals) {
        let context: GenerationContext = read_json(path)?;
        let merged = context.with_brand_visuals(visuals.clone());
        emit(&merged, Some(path))?;
        info!(path = %path.display(), "brand visuals merged into context");
    }

    emit(
        &AnalyzeOutput {
            analysis: &analysis,
            brand_visuals: visuals.as_ref(),
        },
        out,
    )
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = app_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress
// ---------------------------------------------------------------------------

/// Spinner shown on stderr while a long operation runs.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn start(message: impl Into<String>) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.set_message(message.into());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn content_types_parse_from_comma_list() {
        let cli = Cli::try_parse_from([
            "campaignforge",
            "content",
            "--context",
            "ctx.json",
            "--topic",
            "Launch",
            "--types",
            "blog,email",
        ])
        .unwrap();
        match cli.command {
            Command::Content { types, .. } => {
                assert_eq!(types, [ContentType::Blog, ContentType::Email]);
            }
            _ => panic!("expected content command"),
        }
    }

    #[test]
    fn output_path_is_shared_across_commands() {
        let cli = Cli::try_parse_from([
            "campaignforge",
            "channels",
            "--context",
            "ctx.json",
            "-o",
            "matrix.json",
        ])
        .unwrap();
        match cli.command {
            Command::Channels { output, .. } => {
                assert_eq!(output.out, Some(PathBuf::from("matrix.json")));
            }
            _ => panic!("expected channels command"),
        }

        let cli = Cli::try_parse_from([
            "campaignforge",
            "topics",
            "--context",
            "ctx.json",
            "--vendor",
            "anthropic",
            "--out",
            "topics.json",
        ])
        .unwrap();
        match cli.command {
            Command::Topics {
                provider, output, ..
            } => {
                assert_eq!(provider.vendor.as_deref(), Some("anthropic"));
                assert_eq!(output.out, Some(PathBuf::from("topics.json")));
            }
            _ => panic!("expected topics command"),
        }
    }

    #[test]
    fn topics_file_accepts_titles_or_objects() {
        let dir = std::env::temp_dir().join(format!("campaignforge-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let titles = dir.join("titles.json");
        std::fs::write(&titles, r#"["Alpha", "Beta"]"#).unwrap();
        let topics = read_topics(&titles).unwrap();
        assert_eq!(topics[1].week, 2);
        assert_eq!(topics[1].title, "Beta");

        let objects = dir.join("objects.json");
        std::fs::write(&objects, r#"[{"week": 3, "title": "Gamma", "primaryChannel": "Blog"}]"#)
            .unwrap();
        let topics = read_topics(&objects).unwrap();
        assert_eq!(topics[0].week, 3);
        assert_eq!(topics[0].primary_channel, "Blog");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
