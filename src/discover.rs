use crate::config::Settings;
use crate::error::{Error, Result};
use crate::ignore::IgnorePatterns;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use walkdir::WalkDir;

const SNIFF_BYTES: u64 = 8192;

/// Splits a list file into identifiers: one per line, trimmed, with blank
/// lines and `#` comments skipped.
pub fn parse_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

pub fn read_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_list(&content))
}

/// Keeps the entries that are readable, non-binary regular files, dropping
/// repeats. `source` names where the list came from for the error message.
pub fn validate_files(ids: &[String], settings: &Settings, source: &str) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut valid = Vec::new();

    for id in ids {
        if !seen.insert(id.as_str()) {
            log::debug!("skipping duplicate entry {}", id);
            continue;
        }

        let path = Path::new(id);
        match fs::metadata(path) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                log::warn!("skipping {}: not a regular file", id);
                continue;
            }
            Err(e) => {
                log::warn!("skipping {}: {}", id, e);
                continue;
            }
        }

        if !is_text_file(path, settings, None) {
            log::warn!("skipping {}: binary file", id);
            continue;
        }

        valid.push(id.clone());
    }

    if valid.is_empty() {
        return Err(Error::NoValidFiles(source.to_string()));
    }

    Ok(valid)
}

/// Recursively collects text files under `root`, sorted by walk order.
pub fn discover(root: &Path, settings: &Settings) -> Result<Vec<String>> {
    let ignore = IgnorePatterns::new(&settings.ignore);

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !entry
                    .file_name()
                    .to_str()
                    .map(|name| ignore.is_ignored_dir(name))
                    .unwrap_or(false)
        });

    let mut candidates = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("failed to read entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = match entry.path().strip_prefix(root) {
            Ok(rel) => rel,
            Err(_) => entry.path(),
        };
        let Some(rel) = rel.to_str() else {
            log::debug!("skipping non UTF-8 path {}", entry.path().display());
            continue;
        };
        if ignore.is_ignored(&rel.replace('\\', "/")) {
            log::debug!("ignored {}", rel);
            continue;
        }

        if let Some(id) = identifier(entry.path()) {
            candidates.push(id);
        }
    }

    let jobs = if settings.jobs == 0 {
        num_cpus::get()
    } else {
        settings.jobs
    };
    let keep = |id: &&String| {
        is_text_file(Path::new(id.as_str()), settings, Some(settings.max_file_size))
    };
    let files: Vec<String> = match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
        Ok(pool) if jobs > 1 => {
            pool.install(|| candidates.par_iter().filter(keep).cloned().collect())
        }
        _ => candidates.iter().filter(keep).cloned().collect(),
    };

    log::info!("found {} candidate files under {}", files.len(), root.display());

    if files.is_empty() {
        return Err(Error::EmptyPool(root.to_path_buf()));
    }

    Ok(files)
}

fn identifier(path: &Path) -> Option<String> {
    let path = path.strip_prefix(".").unwrap_or(path);
    path.to_str().map(String::from)
}

/// Extension, mime and content sniffing check. `max_size` bounds the file
/// size when given.
pub fn is_text_file(path: &Path, settings: &Settings, max_size: Option<u64>) -> bool {
    if settings.is_binary_extension(path) {
        return false;
    }

    use mime_guess::mime;
    if let Some(guess) = mime_guess::from_path(path).first() {
        // `.ts` guesses as video; video files are left to the extension list
        // and the NUL sniff
        let likely_binary = match guess.type_() {
            mime::IMAGE | mime::AUDIO => true,
            mime::APPLICATION => guess.subtype() == mime::OCTET_STREAM,
            _ => false,
        };
        if likely_binary && guess.subtype() != mime::SVG {
            return false;
        }
    }

    if let Some(max) = max_size {
        if let Ok(metadata) = fs::metadata(path) {
            if metadata.len() > max {
                log::debug!(
                    "skipping large file {} ({} bytes > {})",
                    path.display(),
                    metadata.len(),
                    max
                );
                return false;
            }
        }
    }

    !has_nul_byte(path)
}

fn has_nul_byte(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut head = Vec::new();
    if file.take(SNIFF_BYTES).read_to_end(&mut head).is_err() {
        return false;
    }
    head.contains(&0)
}
