pub mod json;

use crate::assembly::{AssembledDocument, BlockCost};
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid format: {}. Use text or json", s)),
        }
    }
}

/// What a finished run reports after the document is written.
#[derive(Serialize, Debug, Clone)]
pub struct RunSummary {
    pub output: String,
    pub files: Vec<BlockCost>,
    pub request_tokens: usize,
    pub total_tokens: usize,
    pub token_threshold: usize,
    pub over_threshold: bool,
}

impl RunSummary {
    pub fn new(output: &Path, document: &AssembledDocument, token_threshold: usize) -> Self {
        RunSummary {
            output: output.display().to_string(),
            files: document.files().to_vec(),
            request_tokens: document.request_tokens(),
            total_tokens: document.total_tokens(),
            token_threshold,
            over_threshold: document.total_tokens() > token_threshold,
        }
    }
}
