use crate::error::Error;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR: &str = ".promptpack";
pub const LOCAL_CONFIG_FILE: &str = ".promptpack.toml";

pub const DEFAULT_OUTPUT: &str = "prompt.txt";
pub const DEFAULT_TOKEN_THRESHOLD: usize = 100_000;
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 200_000;

lazy_static! {
    static ref DEFAULT_IGNORE: Vec<&'static str> = vec![
        ".git/",
        "node_modules/",
        "target/",
        "dist/",
        "build/",
        "out/",
        ".next/",
        "coverage/",
        "__pycache__/",
        ".venv/",
        ".idea/",
        ".vscode/",
        "*.lock",
        "package-lock.json",
        "*.min.js",
        "*.min.css",
        "*.map",
        ".DS_Store",
    ];
    static ref DEFAULT_BINARY_EXTENSIONS: Vec<&'static str> = vec![
        // images
        "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "tiff", "psd",
        // archives
        "zip", "tar", "gz", "tgz", "bz2", "xz", "7z", "rar", "jar", "war",
        // executables and objects
        "exe", "dll", "so", "dylib", "a", "o", "obj", "lib", "class", "pyc", "wasm", "bin",
        // documents
        "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx",
        // media
        "mp3", "mp4", "wav", "flac", "ogg", "avi", "mov", "mkv", "webm",
        // fonts
        "ttf", "otf", "woff", "woff2", "eot",
        // data
        "db", "sqlite", "dat",
    ];
}

/// Written by `promptpack init`. Every key is optional.
pub const TEMPLATE: &str = r#"# promptpack configuration

# File the assembled prompt is written to
# output = "prompt.txt"

# Tokenizer encoding (cl100k_base, o200k_base, p50k_base, r50k_base) or model name
# encoding = "cl100k_base"

# Warn once the selected files exceed this many tokens
# token_threshold = 100000

# Fuzzy matches shown at once while filtering
# page_size = 20

# Discovery skips files larger than this (bytes)
# max_file_size = 200000

# Discovery worker threads, 0 = one per CPU
# jobs = 0

# Extra ignore patterns, appended to the defaults
# `name/` prunes directories, `*.ext` matches at any depth
extra_ignore = [
    "*.log",
]

# Replace the default binary extension list
# binary_extensions = ["png", "jpg", "zip"]
"#;

/// Resolved settings handed to every component at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Where the assembled document is written. Default: `prompt.txt`.
    pub output: PathBuf,
    /// Tokenizer encoding or model name. Default: `cl100k_base`.
    pub encoding: String,
    /// Running total above which a warning is raised. Default: 100,000.
    pub token_threshold: usize,
    /// Maximum number of fuzzy matches shown at once. Default: 20.
    pub page_size: usize,
    /// Discovery skips files larger than this many bytes. Default: 200,000.
    pub max_file_size: u64,
    /// Ignore patterns applied during discovery.
    pub ignore: Vec<String>,
    /// Extensions (without the dot, lowercase) treated as binary.
    pub binary_extensions: Vec<String>,
    /// Discovery worker threads, 0 = one per CPU.
    pub jobs: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            output: PathBuf::from(DEFAULT_OUTPUT),
            encoding: crate::tokens::DEFAULT_ENCODING.to_string(),
            token_threshold: DEFAULT_TOKEN_THRESHOLD,
            page_size: DEFAULT_PAGE_SIZE,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            ignore: DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect(),
            binary_extensions: DEFAULT_BINARY_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            jobs: 0,
        }
    }
}

impl Settings {
    pub fn is_binary_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.binary_extensions.iter().any(|b| *b == ext)
            })
            .unwrap_or(false)
    }
}

/// One layer of optional overrides, as read from a TOML file or the command
/// line.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub output: Option<PathBuf>,
    pub encoding: Option<String>,
    pub token_threshold: Option<usize>,
    pub page_size: Option<usize>,
    pub max_file_size: Option<u64>,
    pub jobs: Option<usize>,
    /// Replaces the default ignore list.
    pub ignore: Option<Vec<String>>,
    /// Appended to the ignore list.
    pub extra_ignore: Option<Vec<String>>,
    /// Replaces the default binary extension list.
    pub binary_extensions: Option<Vec<String>>,
    pub no_color: Option<bool>,
}

impl Config {
    pub fn merge(&mut self, other: Config) {
        if other.output.is_some() {
            self.output = other.output;
        }
        if other.encoding.is_some() {
            self.encoding = other.encoding;
        }
        if other.token_threshold.is_some() {
            self.token_threshold = other.token_threshold;
        }
        if other.page_size.is_some() {
            self.page_size = other.page_size;
        }
        if other.max_file_size.is_some() {
            self.max_file_size = other.max_file_size;
        }
        if other.jobs.is_some() {
            self.jobs = other.jobs;
        }
        if other.ignore.is_some() {
            self.ignore = other.ignore;
        }
        if let Some(extra) = other.extra_ignore {
            self.extra_ignore.get_or_insert_with(Vec::new).extend(extra);
        }
        if other.binary_extensions.is_some() {
            self.binary_extensions = other.binary_extensions;
        }
        if other.no_color.is_some() {
            self.no_color = other.no_color;
        }
    }

    pub fn parse(path: &Path, content: &str) -> Result<Config, Error> {
        toml::from_str(content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn resolve(&self) -> Settings {
        let mut settings = Settings::default();

        if let Some(ref output) = self.output {
            settings.output = output.clone();
        }
        if let Some(ref encoding) = self.encoding {
            settings.encoding = encoding.clone();
        }
        if let Some(threshold) = self.token_threshold {
            settings.token_threshold = threshold;
        }
        if let Some(page_size) = self.page_size {
            settings.page_size = page_size.max(1);
        }
        if let Some(max) = self.max_file_size {
            settings.max_file_size = max;
        }
        if let Some(jobs) = self.jobs {
            settings.jobs = jobs;
        }
        if let Some(ref ignore) = self.ignore {
            settings.ignore = ignore.clone();
        }
        if let Some(ref extra) = self.extra_ignore {
            settings.ignore.extend(extra.iter().cloned());
        }
        if let Some(ref exts) = self.binary_extensions {
            settings.binary_extensions = exts
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect();
        }

        settings
    }
}

pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join("config.toml"))
}

fn load_layer(path: &Path) -> Option<Config> {
    let content = fs::read_to_string(path).ok()?;
    match Config::parse(path, &content) {
        Ok(config) => {
            log::debug!("loaded config {}", path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}, skipping", e);
            None
        }
    }
}

pub fn load_config() -> Config {
    let mut config = Config::default();

    // 1. Load global config: ~/.promptpack/config.toml
    if let Some(global_path) = global_config_path() {
        if let Some(global_config) = load_layer(&global_path) {
            config.merge(global_config);
        }
    }

    // 2. Load local config: ./.promptpack.toml
    if let Some(local_config) = load_layer(Path::new(LOCAL_CONFIG_FILE)) {
        config.merge(local_config);
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parsing() {
        let toml_str = r#"
            output = "context.txt"
            token_threshold = 8000
            ignore = ["vendor/"]
        "#;
        let config = Config::parse(Path::new("t.toml"), toml_str).unwrap();
        assert_eq!(config.output, Some(PathBuf::from("context.txt")));
        assert_eq!(config.token_threshold, Some(8000));
        assert_eq!(config.ignore, Some(vec!["vendor/".to_string()]));
    }

    #[test]
    fn test_config_rejects_unknown_keys() {
        let err = Config::parse(Path::new("bad.toml"), "min_score = 3\n").unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_config_merge() {
        let mut c1 = Config {
            output: Some(PathBuf::from("a.txt")),
            page_size: Some(10),
            extra_ignore: Some(vec!["*.log".to_string()]),
            ..Config::default()
        };
        let c2 = Config {
            output: Some(PathBuf::from("b.txt")),
            extra_ignore: Some(vec!["tmp/".to_string()]),
            ..Config::default()
        };
        c1.merge(c2);
        assert_eq!(c1.output, Some(PathBuf::from("b.txt")));
        assert_eq!(c1.page_size, Some(10));
        assert_eq!(
            c1.extra_ignore,
            Some(vec!["*.log".to_string(), "tmp/".to_string()])
        );
    }

    #[test]
    fn test_template_parses() {
        let config = Config::parse(Path::new(LOCAL_CONFIG_FILE), TEMPLATE).unwrap();
        assert_eq!(config.extra_ignore, Some(vec!["*.log".to_string()]));
        assert_eq!(config.output, None);
    }

    #[test]
    fn test_defaults() {
        let settings = Config::default().resolve();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.output, PathBuf::from("prompt.txt"));
        assert_eq!(settings.token_threshold, 100_000);
        assert_eq!(settings.page_size, 20);
        assert!(settings.ignore.iter().any(|p| p == "node_modules/"));
    }

    #[test]
    fn test_resolve_overrides() {
        let config = Config {
            encoding: Some("o200k_base".to_string()),
            page_size: Some(0),
            extra_ignore: Some(vec!["*.log".to_string()]),
            binary_extensions: Some(vec![".BIN".to_string()]),
            ..Config::default()
        };
        let settings = config.resolve();
        assert_eq!(settings.encoding, "o200k_base");
        assert_eq!(settings.page_size, 1);
        assert_eq!(settings.ignore.last().map(String::as_str), Some("*.log"));
        assert_eq!(settings.binary_extensions, vec!["bin".to_string()]);
    }

    #[test]
    fn test_binary_extension() {
        let settings = Settings::default();
        assert!(settings.is_binary_extension(Path::new("logo.PNG")));
        assert!(settings.is_binary_extension(Path::new("dist/app.wasm")));
        assert!(!settings.is_binary_extension(Path::new("src/main.rs")));
        assert!(!settings.is_binary_extension(Path::new("Makefile")));
    }
}
