mod commands;
mod core;
mod values;
mod version;

use clap::{Parser, Subcommand};
use crate::core::error::{StampError, print_error};

/// Derive SemVer 2 versions from git history and stamp them into charts
#[derive(Parser)]
#[command(name = "chartstamp")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct StampCli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Derive versions and write them into Chart.yaml and values.yaml
  Update {
    /// Explicitly set the image tags and chart version
    #[arg(long, conflicts_with = "long")]
    tag: Option<String>,
    /// Always emit the build suffix, even when the commit has a tag
    #[arg(long)]
    long: bool,
    /// Fail on chart versions that are not valid SemVer 2
    #[arg(long)]
    strict: bool,
    /// Print the changes without writing any file
    #[arg(long)]
    dry_run: bool,
  },

  /// Restore the configured reset version and tags (no git queries)
  Reset {
    /// Print the changes without writing any file
    #[arg(long)]
    dry_run: bool,
  },

  /// Print the derived image specs without modifying anything
  ListImages {
    /// Always emit the build suffix, even when the commit has a tag
    #[arg(long)]
    long: bool,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },
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

fn main() {
  let cli = StampCli::parse();

  let result = match cli.command {
    Commands::Update {
      tag,
      long,
      strict,
      dry_run,
    } => commands::run_update(tag, long, strict, dry_run),
    Commands::Reset { dry_run } => commands::run_reset(dry_run),
    Commands::ListImages { long, json } => commands::run_list_images(long, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: StampError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
