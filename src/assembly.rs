use crate::document::{request_block, wrap_block, BLOCK_SEPARATOR};
use crate::error::{Error, Result};
use crate::reader::FileReader;
use crate::tokens::Tokenizer;
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BlockCost {
    pub path: String,
    pub tokens: usize,
}

/// The final document and its exact token count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledDocument {
    body: String,
    files: Vec<BlockCost>,
    request_tokens: usize,
    total_tokens: usize,
}

impl AssembledDocument {
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn files(&self) -> &[BlockCost] {
        &self.files
    }

    pub fn request_tokens(&self) -> usize {
        self.request_tokens
    }

    pub fn total_tokens(&self) -> usize {
        self.total_tokens
    }
}

/// Rejects request text that is blank after trimming.
pub fn validate_request(request: &str) -> Result<String> {
    let trimmed = request.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyRequest);
    }
    Ok(trimmed.to_string())
}

/// Builds the document from an ordered file list and a request. Every file
/// is read and measured fresh; nothing is reused from selection time.
pub struct AssemblyPipeline<'a> {
    reader: &'a dyn FileReader,
    tokenizer: &'a dyn Tokenizer,
}

impl<'a> AssemblyPipeline<'a> {
    pub fn new(reader: &'a dyn FileReader, tokenizer: &'a dyn Tokenizer) -> Self {
        AssemblyPipeline { reader, tokenizer }
    }

    fn wrapped(&self, id: &str) -> Result<(String, usize)> {
        let content = self.reader.read(id).map_err(|source| Error::Read {
            path: id.to_string(),
            source,
        })?;
        let block = wrap_block(id, &content);
        let tokens = self.tokenizer.count(&block);
        Ok((block, tokens))
    }

    /// File-only total, shown before the request text is asked for.
    pub fn advisory_total(&self, files: &[String]) -> Result<usize> {
        let mut total = 0;
        for id in files {
            let (_, tokens) = self.wrapped(id)?;
            total += tokens;
        }
        Ok(total)
    }

    pub fn assemble(&self, files: &[String], request: &str) -> Result<AssembledDocument> {
        let request = validate_request(request)?;

        let mut blocks = Vec::with_capacity(files.len() + 1);
        let mut costs = Vec::with_capacity(files.len());
        for id in files {
            let (block, tokens) = self.wrapped(id)?;
            log::debug!("{}: {} tokens", id, tokens);
            blocks.push(block);
            costs.push(BlockCost {
                path: id.clone(),
                tokens,
            });
        }

        let request = request_block(&request);
        let request_tokens = self.tokenizer.count(&request);
        blocks.push(request);

        let total_tokens = costs.iter().map(|c| c.tokens).sum::<usize>() + request_tokens;

        Ok(AssembledDocument {
            body: blocks.join(BLOCK_SEPARATOR),
            files: costs,
            request_tokens,
            total_tokens,
        })
    }
}
