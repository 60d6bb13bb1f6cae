use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("request text is empty")]
    EmptyRequest,

    #[error("no candidate files found under {}", .0.display())]
    EmptyPool(PathBuf),

    #[error("no valid files in {0}")]
    NoValidFiles(String),

    #[error("no files selected")]
    NothingSelected,

    #[error("unknown tokenizer encoding '{0}'")]
    Tokenizer(String),

    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("prompt failed: {0}")]
    Prompt(#[source] io::Error),

    #[error("cancelled")]
    Cancelled,
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        #[allow(unreachable_patterns)]
        match err {
            dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::Interrupted => Error::Cancelled,
            dialoguer::Error::IO(e) => Error::Prompt(e),
            other => Error::Prompt(io::Error::new(io::ErrorKind::Other, other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupted_prompt_is_cancellation() {
        let interrupted = io::Error::new(io::ErrorKind::Interrupted, "read interrupted");
        let err: Error = dialoguer::Error::IO(interrupted).into();
        assert!(matches!(err, Error::Cancelled));

        let not_a_tty = io::Error::new(io::ErrorKind::Other, "not a terminal");
        let err: Error = dialoguer::Error::IO(not_a_tty).into();
        assert!(matches!(err, Error::Prompt(_)));
    }

    #[test]
    fn read_error_names_the_file() {
        let err = Error::Read {
            path: "src/missing.rs".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };
        let msg = err.to_string();
        assert!(msg.contains("src/missing.rs"));
        assert!(msg.contains("No such file"));
    }
}
