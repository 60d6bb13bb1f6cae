//! Delimited document format.
//!
//! Each file becomes a block tagged with its identifier, blocks are joined by
//! one blank line and the request block closes the document:
//!
//! ```text
//! <src/main.rs>
//! fn main() {}
//! </src/main.rs>
//!
//! <request>
//! add logging
//! </request>
//! ```

pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Wraps raw file content in open/close tags that carry the identifier
/// verbatim (no escaping).
pub fn wrap_block(id: &str, content: &str) -> String {
    format!("<{id}>\n{content}\n</{id}>")
}

pub fn request_block(request: &str) -> String {
    format!("<request>\n{request}\n</request>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_block() {
        assert_eq!(wrap_block("a.txt", "hello"), "<a.txt>\nhello\n</a.txt>");
    }

    #[test]
    fn test_wrap_block_keeps_content_verbatim() {
        let block = wrap_block("src/lib.rs", "pub fn f() {}\n");
        assert_eq!(block, "<src/lib.rs>\npub fn f() {}\n\n</src/lib.rs>");
    }

    #[test]
    fn test_identifier_is_not_escaped() {
        let block = wrap_block("dir/a&b <x>.txt", "");
        assert!(block.starts_with("<dir/a&b <x>.txt>\n"));
        assert!(block.ends_with("</dir/a&b <x>.txt>"));
    }

    #[test]
    fn test_request_block() {
        assert_eq!(request_block("fix bugs"), "<request>\nfix bugs\n</request>");
    }
}
