pub mod assembly;
pub mod config;
pub mod discover;
pub mod document;
pub mod error;
pub mod fuzzy;
pub mod ignore;
pub mod output;
pub mod prompt;
pub mod reader;
pub mod selection;
pub mod tokens;

pub use assembly::{validate_request, AssembledDocument, AssemblyPipeline, BlockCost};
pub use config::{load_config, Config, Settings};
pub use discover::{discover, parse_list, read_list, validate_files};
pub use error::{Error, Result};
pub use fuzzy::{FuzzyRanker, Ranker};
pub use ignore::IgnorePatterns;
pub use output::{OutputFormat, RunSummary};
pub use prompt::TerminalPrompter;
pub use reader::{FileReader, FsReader, MemoryReader};
pub use selection::{Action, Event, Phase, Prompter, Selection, SelectionEngine, View};
pub use tokens::{count_tokens, HeuristicTokenizer, TiktokenTokenizer, Tokenizer};
