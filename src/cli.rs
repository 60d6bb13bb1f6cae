use clap::{Parser, Subcommand};
use promptpack::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "promptpack")]
#[command(
    about = "Pick project files and pack them with a request into one token-counted LLM prompt",
    long_about = None
)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub pack: PackArgs,

    #[arg(short, long, global = true, help = "Show debug logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Only log errors")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Write a default config file")]
    Init(InitArgs),
}

#[derive(Parser, Default)]
pub struct PackArgs {
    #[arg(help = "Files to include (skips interactive selection unless -i)")]
    pub files: Vec<String>,

    #[arg(short, long, help = "Read file paths from a list file, one per line")]
    pub list: Option<PathBuf>,

    #[arg(short, long, help = "Directory to discover files in (default: current directory)")]
    pub dir: Option<PathBuf>,

    #[arg(short, long, help = "Output file (default: prompt.txt)")]
    pub output: Option<PathBuf>,

    #[arg(short, long, help = "Request text (prompted for when omitted)")]
    pub request: Option<String>,

    #[arg(short, long, help = "Tokenizer encoding or model name (default: cl100k_base)")]
    pub encoding: Option<String>,

    #[arg(long, help = "Token count that triggers a warning (default: 100000)")]
    pub threshold: Option<usize>,

    #[arg(long, help = "Fuzzy matches shown at once (default: 20)")]
    pub page_size: Option<usize>,

    #[arg(short, long, help = "Number of parallel discovery jobs (0 = auto)")]
    pub jobs: Option<usize>,

    #[arg(short, long, help = "Pick interactively from the given files")]
    pub interactive: bool,

    #[arg(long, help = "Summary format: text, json (default: text)")]
    pub format: Option<String>,

    #[arg(long, help = "Disable colors")]
    pub no_color: bool,
}

impl PackArgs {
    /// Command-line layer, merged over the config files.
    pub fn overrides(&self) -> Config {
        Config {
            output: self.output.clone(),
            encoding: self.encoding.clone(),
            token_threshold: self.threshold,
            page_size: self.page_size,
            jobs: self.jobs,
            no_color: if self.no_color { Some(true) } else { None },
            ..Config::default()
        }
    }

    pub fn has_explicit_files(&self) -> bool {
        !self.files.is_empty() || self.list.is_some()
    }
}

#[derive(Parser)]
pub struct InitArgs {
    #[arg(short, long, help = "Write ~/.promptpack/config.toml instead of ./.promptpack.toml")]
    pub global: bool,

    #[arg(short, long, help = "Overwrite an existing file")]
    pub force: bool,
}
