//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Extract translatable messages from Python sources
//! - `init`: Initialize pyglot configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(args)) => args.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// JSON array of messages
    Json,
    /// gettext template
    Pot,
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Files or directories to scan (overrides `includes` in the config file)
    pub paths: Vec<String>,

    /// Additional keyword, e.g. `lazy_gettext` or `tr:1c,2`
    /// Can be specified multiple times: -k lazy_gettext -k tr:2
    #[arg(short = 'k', long = "keyword", value_name = "SPEC")]
    pub keywords: Vec<String>,

    /// Only keep messages of this domain (overrides config file)
    #[arg(long)]
    pub domain: Option<String>,

    /// Domain of messages that do not name one (overrides config file)
    #[arg(long)]
    pub default_domain: Option<String>,

    /// Attach comment blocks starting with TAG (overrides config file)
    #[arg(long, value_name = "TAG", conflicts_with = "add_comments")]
    pub comment_tag: Option<String>,

    /// Attach every comment block preceding a message
    #[arg(long)]
    pub add_comments: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Offset added to every reported line number
    #[arg(long, default_value_t = 0)]
    pub lineno: usize,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract translatable messages from Python source files
    Extract(ExtractArgs),
    /// Initialize a new .pyglotrc.json configuration file
    Init,
}
