use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tgreports::{CallSite, Fault, Payload, Report, Reporter, Severity};
use tgreports_config::ReportsConfig;
use tgreports_telemetry::{ReportLogger, ReportMetrics};
use tracing::debug;

#[derive(Parser)]
#[command(name = "tgreports", version, about)]
pub struct Cli {
    /// Configuration file to load instead of `./tgreports.yaml`
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Journal a report and send it to chat when the gate allows
    Send(ReportArgs),
    /// Print the chat message and delivery decision without sending
    Render(ReportArgs),
    /// Print the effective configuration as YAML
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// debug, info, warning, error, critical, important or request
    #[arg(short, long, default_value = "info")]
    pub severity: Severity,

    /// Message text
    pub text: String,

    /// Payload field as KEY=VALUE; VALUE is read as JSON when it parses
    #[arg(short = 'x', long = "extra", value_parser = parse_field)]
    pub extra: Vec<(String, Value)>,

    /// Whole payload as a JSON object; replaces --extra
    #[arg(long, conflicts_with = "extra")]
    pub json: Option<String>,

    /// Hashtag to append (repeatable)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Write to the log files only
    #[arg(long)]
    pub silent: bool,

    /// Error message to attach as the report's fault
    #[arg(long)]
    pub fault: Option<String>,

    /// Source location to show instead of this tool's, as FILE:LINE
    #[arg(long, value_parser = parse_call_site)]
    pub at: Option<CallSite>,

    /// Print Prometheus metrics after sending
    #[arg(long)]
    pub metrics: bool,
}

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Send(args) => send(&config, args).await,
        Commands::Render(args) => render(&config, args),
        Commands::Config => {
            print!("{}", dump_config(&config)?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ReportsConfig> {
    let config = match path {
        Some(path) => ReportsConfig::load_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ReportsConfig::load().context("loading configuration")?,
    };
    Ok(config)
}

async fn send(config: &ReportsConfig, args: ReportArgs) -> anyhow::Result<()> {
    let _guard = ReportLogger::init(&config.logging).context("initializing log files")?;
    if !config.telegram.is_configured() {
        debug!("telegram credentials missing, chat delivery will fail");
    }

    let metrics = ReportMetrics::new()?;
    let reporter = Reporter::from_config(config)?.with_metrics(metrics.clone());
    let delivery = build_report(&reporter, &args)?.await;
    println!("{delivery:?}");

    if args.metrics {
        print!("{}", metrics.gather_metrics()?);
    }
    Ok(())
}

fn render(config: &ReportsConfig, args: ReportArgs) -> anyhow::Result<()> {
    let reporter = Reporter::from_config(config)?;
    let rendered = build_report(&reporter, &args)?.render();
    println!("{}", rendered.text);
    println!();
    println!("severity: {}", rendered.severity);
    println!("delivery: {:?}", rendered.delivery);
    println!("journal:  {}", rendered.journal);
    Ok(())
}

fn build_report<'a>(reporter: &'a Reporter, args: &ReportArgs) -> anyhow::Result<Report<'a>> {
    let mut report = reporter
        .report(args.severity, args.text.clone())
        .tags(args.tags.iter().cloned())
        .silent(args.silent);

    if let Some(json) = &args.json {
        let value: Value = serde_json::from_str(json).context("--json is not valid JSON")?;
        report = report.extra_json(value)?;
    } else if !args.extra.is_empty() {
        let payload: Payload = args.extra.iter().cloned().collect();
        report = report.extra(payload);
    }

    // Without --at the only location known is this tool's own.
    if let Some(message) = &args.fault {
        let fault = Fault::from_message(message.clone());
        report = report.fault(match &args.at {
            Some(at) => fault.at(at.clone()),
            None => fault.without_origin(),
        });
    }
    report = match &args.at {
        Some(at) => report.at(at.clone()),
        None => report.without_call_site(),
    };
    Ok(report)
}

fn dump_config(config: &ReportsConfig) -> anyhow::Result<String> {
    let mut shown = config.clone();
    if !shown.telegram.token.is_empty() {
        shown.telegram.token = "***".into();
    }
    Ok(serde_yaml::to_string(&shown)?)
}

fn parse_field(raw: &str) -> anyhow::Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("expected KEY=VALUE, got `{raw}`");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("empty key in `{raw}`");
    }
    let value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn parse_call_site(raw: &str) -> anyhow::Result<CallSite> {
    let (file, line) = raw
        .rsplit_once(':')
        .with_context(|| format!("expected FILE:LINE, got `{raw}`"))?;
    let line = line
        .parse()
        .with_context(|| format!("`{line}` is not a line number"))?;
    Ok(CallSite::new(file, line))
}
