use clap::{Parser, Subcommand};
use clap_verbosity_flag::Verbosity;

use crate::commands;

/// Styles for CLI
fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .literal(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::BrightCyan))),
    )
    .usage(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
}

#[derive(Debug, Parser)]
#[command(author, about, version)]
#[command(propagate_version = true)]
#[command(styles=get_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  #[clap(flatten)]
  pub verbose: Verbosity,

  /// Disable colored log output
  #[arg(long, global = true)]
  pub no_color: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
  /// Upload the kubeadm and kubelet bootstrap configuration into a tenant control plane
  Upload(commands::upload::Upload),

  /// Print a bootstrap configuration document without contacting a cluster
  Render(commands::render::Render),

  /// Print the ConfigMap and RBAC names used for a Kubernetes version
  Names(commands::names::Names),
}
