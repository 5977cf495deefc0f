mod commands;
mod core;
mod pipeline;
mod release;
mod steps;
mod tools;
mod ui;
mod utils;

use clap::Parser;
use commands::RunOptions;
use core::config::{ConfigOverrides, Configuration};
use core::error::{PipelineError, print_error};
use pipeline::Target;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Build, pack and publish a .NET library from git state
#[derive(Parser)]
#[command(name = "pack-rail")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Target to run (its dependencies and triggered targets are planned too)
  #[arg(value_enum, ignore_case = true, default_value = "pack")]
  target: Target,

  // ============================================================================
  // Build inputs
  // ============================================================================
  /// Build configuration (default: release on CI, debug locally)
  #[arg(short, long, value_enum, ignore_case = true)]
  configuration: Option<Configuration>,
  /// Project file to build and pack
  #[arg(long)]
  project: Option<PathBuf>,
  /// Directory receiving packages
  #[arg(long)]
  artifacts_dir: Option<PathBuf>,
  /// Changelog used for release notes
  #[arg(long)]
  changelog: Option<PathBuf>,
  /// Copyright stamped into packages
  #[arg(long)]
  copyright: Option<String>,
  /// Glob selecting publishable artifacts
  #[arg(long)]
  artifacts_type: Option<String>,
  /// Suffix or glob excluding artifacts from publishing
  #[arg(long)]
  excluded_artifacts_type: Option<String>,
  /// Force Major.Minor.Patch instead of deriving it from tags
  #[arg(long, value_name = "VERSION")]
  version_override: Option<String>,

  // ============================================================================
  // Feeds & credentials
  // ============================================================================
  /// MyGet feed URL
  #[arg(long)]
  myget_feed: Option<String>,
  /// MyGet API key
  #[arg(long, env = "MYGET_API_KEY", hide_env_values = true)]
  myget_api_key: Option<String>,
  /// NuGet feed URL
  #[arg(long)]
  nuget_feed: Option<String>,
  /// NuGet API key
  #[arg(long, env = "NUGET_API_KEY", hide_env_values = true)]
  nuget_api_key: Option<String>,
  /// GitHub token for package pushes and releases
  #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
  github_token: Option<String>,

  // ============================================================================
  // Execution
  // ============================================================================
  /// Skip these targets (repeat or comma-separate)
  #[arg(long, value_enum, ignore_case = true, value_delimiter = ',')]
  skip: Vec<Target>,
  /// Print the execution plan without running anything
  #[arg(long)]
  plan: bool,
  /// Print the plan as JSON (with --plan)
  #[arg(long, requires = "plan")]
  json: bool,
  /// Verbose logging (same as RUST_LOG=pack_rail=debug)
  #[arg(short, long)]
  verbose: bool,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_logging(verbose: bool) {
  let default = if verbose { "pack_rail=debug" } else { "pack_rail=warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let start_dir = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  let overrides = ConfigOverrides {
    configuration: cli.configuration,
    project: cli.project,
    artifacts_dir: cli.artifacts_dir,
    changelog: cli.changelog,
    myget_feed: cli.myget_feed,
    myget_api_key: cli.myget_api_key,
    nuget_feed: cli.nuget_feed,
    nuget_api_key: cli.nuget_api_key,
    github_token: cli.github_token,
    copyright: cli.copyright,
    artifacts_type: cli.artifacts_type,
    excluded_artifacts_type: cli.excluded_artifacts_type,
    version: cli.version_override,
  };
  let options = RunOptions {
    target: cli.target,
    skip: cli.skip,
    plan_only: cli.plan,
    json: cli.json,
  };

  if let Err(err) = commands::run_pipeline(&start_dir, overrides, options) {
    handle_error(err);
  }
}

fn handle_error(err: PipelineError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
