use crate::error::{Error, Result};
use tiktoken_rs::CoreBPE;

pub const DEFAULT_ENCODING: &str = "cl100k_base";

/// Splits text into token units. The token cost of a string is the length
/// of that sequence, so implementations must be deterministic.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<u32>;

    fn count(&self, text: &str) -> usize {
        self.tokenize(text).len()
    }
}

/// BPE tokenizer backed by tiktoken-rs.
///
/// Accepts the encoding names directly:
/// - "o200k_base"  (GPT-4o)
/// - "cl100k_base" (GPT-3.5/4)
/// - "p50k_base", "r50k_base"
///
/// Any other name is resolved as a model name ("gpt-4o", "gpt-4", ...).
pub struct TiktokenTokenizer {
    encoding: String,
    bpe: CoreBPE,
}

impl TiktokenTokenizer {
    pub fn new(encoding: &str) -> Result<Self> {
        let bpe = match encoding {
            "cl100k_base" => tiktoken_rs::cl100k_base(),
            "o200k_base" => tiktoken_rs::o200k_base(),
            "p50k_base" => tiktoken_rs::p50k_base(),
            "r50k_base" => tiktoken_rs::r50k_base(),
            model => tiktoken_rs::get_bpe_from_model(model),
        }
        .map_err(|_| Error::Tokenizer(encoding.to_string()))?;

        Ok(TiktokenTokenizer {
            encoding: encoding.to_string(),
            bpe,
        })
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn tokenize(&self, text: &str) -> Vec<u32> {
        self.bpe.encode_ordinary(text)
    }
}

/// Naive `len / 4` estimate, one unit per 4-byte chunk.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicTokenizer;

impl Tokenizer for HeuristicTokenizer {
    fn tokenize(&self, text: &str) -> Vec<u32> {
        (0..text.len()).step_by(4).map(|offset| offset as u32).collect()
    }

    fn count(&self, text: &str) -> usize {
        fallback_tokens(text)
    }
}

/// Loads `encoding`, or the heuristic when it is unavailable.
pub fn load(encoding: &str) -> Box<dyn Tokenizer> {
    match TiktokenTokenizer::new(encoding) {
        Ok(tokenizer) => Box::new(tokenizer),
        Err(e) => {
            log::warn!("{}; falling back to a 4-bytes-per-token estimate", e);
            Box::new(HeuristicTokenizer)
        }
    }
}

/// Count tokens for given text using the named encoding.
pub fn count_tokens(text: &str, encoding: &str) -> usize {
    load(encoding).count(text)
}

#[inline]
fn fallback_tokens(text: &str) -> usize {
    (text.len() + 3) / 4 // round up
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;
    use proptest::prelude::*;

    lazy_static! {
        static ref CL100K: TiktokenTokenizer = TiktokenTokenizer::new(DEFAULT_ENCODING).unwrap();
    }

    #[test]
    fn hello_world_count() {
        let text = "hello world";
        // cl100k_base encodes to 2 tokens. Allow ±1 tolerance.
        let tokens = count_tokens(text, "cl100k_base");
        assert!(
            tokens >= 1 && tokens <= 3,
            "expected 1-3 tokens, got {}",
            tokens
        );
    }

    #[test]
    fn unknown_encoding_is_rejected() {
        assert!(matches!(
            TiktokenTokenizer::new("no-such-encoding"),
            Err(Error::Tokenizer(_))
        ));
    }

    #[test]
    fn unknown_encoding_falls_back_to_heuristic() {
        assert_eq!(count_tokens("abcdefgh", "no-such-encoding"), 2);
        assert_eq!(count_tokens("abcdefghi", "no-such-encoding"), 3);
    }

    #[test]
    fn heuristic_units_match_count() {
        let text = "fn main() { println!(\"hi\"); }";
        let tokenizer = HeuristicTokenizer;
        assert_eq!(tokenizer.tokenize(text).len(), tokenizer.count(text));
        assert_eq!(tokenizer.count(""), 0);
    }

    #[test]
    fn model_names_resolve() {
        let tokenizer = TiktokenTokenizer::new("gpt-4o").unwrap();
        assert_eq!(tokenizer.encoding(), "gpt-4o");
        assert!(tokenizer.count("hello world") > 0);
    }

    proptest! {
        #[test]
        fn token_bounds(s in "[a-zA-Z0-9 ]{0,200}") {
            let byte_len = s.len();
            let tokens = CL100K.count(&s);
            prop_assert!(tokens >= byte_len / 6, "too small: {} vs {}", tokens, byte_len);
            prop_assert!(tokens <= byte_len * 2 + 1, "too big: {} vs {}", tokens, byte_len);
        }

        #[test]
        fn tokenizing_is_deterministic(s in "\\PC{0,120}") {
            prop_assert_eq!(CL100K.tokenize(&s), CL100K.tokenize(&s));
        }
    }
}
