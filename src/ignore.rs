use glob::Pattern;

/// Ignore rules for directory discovery.
///
/// - `name/` prunes every directory called `name`
/// - entries with `*` or `?` match at any depth
/// - `**/...` entries and plain paths match the relative path as written
#[derive(Debug, Default)]
pub struct IgnorePatterns {
    dirs: Vec<Pattern>,
    patterns: Vec<Pattern>,
}

impl IgnorePatterns {
    pub fn new<S: AsRef<str>>(entries: &[S]) -> Self {
        let mut ignore = IgnorePatterns::default();

        for line in entries {
            let line = line.as_ref().trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(dir) = line.strip_suffix('/') {
                match Pattern::new(dir) {
                    Ok(p) => ignore.dirs.push(p),
                    Err(e) => log::warn!("invalid ignore pattern '{}': {}", line, e),
                }
                continue;
            }

            let pattern = if line.starts_with("**/") {
                line.to_string()
            } else if line.contains('*') || line.contains('?') {
                format!("**/{}", line)
            } else {
                line.to_string()
            };

            match Pattern::new(&pattern) {
                Ok(p) => ignore.patterns.push(p),
                Err(e) => log::warn!("invalid ignore pattern '{}': {}", line, e),
            }
        }

        ignore
    }

    /// Whether a directory with this name should not be descended into.
    pub fn is_ignored_dir(&self, name: &str) -> bool {
        self.dirs.iter().any(|p| p.matches(name))
    }

    /// Whether a file's path relative to the discovery root is ignored,
    /// including by any ignored ancestor directory.
    pub fn is_ignored(&self, path: &str) -> bool {
        if self.patterns.iter().any(|p| p.matches(path)) {
            return true;
        }

        let mut components: Vec<&str> = path.split('/').collect();
        components.pop();
        components.iter().any(|c| self.is_ignored_dir(c))
    }
}
