use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Matcher, Utf32String};

/// Orders candidates by how well they match a filter term, dropping the ones
/// that do not match at all.
pub trait Ranker {
    fn rank(&mut self, term: &str, candidates: &[String]) -> Vec<String>;
}

/// Subsequence matcher backed by nucleo-matcher.
///
/// Literal substring hits always rank ahead of scattered matches; within a
/// tier the nucleo score decides and ties keep candidate order.
pub struct FuzzyRanker {
    matcher: Matcher,
}

impl FuzzyRanker {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
        }
    }

    /// Returns `(candidate_index, score)` for every match, best first.
    pub fn scores(&mut self, term: &str, candidates: &[String]) -> Vec<(usize, u32)> {
        let pattern = Pattern::new(
            term,
            CaseMatching::Smart,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );
        let case_sensitive = term.chars().any(char::is_uppercase);
        let needle = if case_sensitive {
            term.to_string()
        } else {
            term.to_lowercase()
        };

        let mut scored: Vec<(usize, bool, u32)> = candidates
            .iter()
            .enumerate()
            .filter_map(|(idx, candidate)| {
                if !is_subsequence(term, candidate, case_sensitive) {
                    return None;
                }
                let haystack = Utf32String::from(candidate.as_str());
                let score = pattern.score(haystack.slice(..), &mut self.matcher)?;
                let literal = if case_sensitive {
                    candidate.contains(&needle)
                } else {
                    candidate.to_lowercase().contains(&needle)
                };
                Some((idx, literal, score))
            })
            .collect();

        // stable: equal keys keep pool order
        scored.sort_by(|a, b| b.1.cmp(&a.1).then(b.2.cmp(&a.2)));

        scored
            .into_iter()
            .map(|(idx, _, score)| (idx, score))
            .collect()
    }
}

/// Whether the non-whitespace characters of `term` occur in `candidate` in
/// order. Nucleo alone accepts space-separated atoms in any order.
fn is_subsequence(term: &str, candidate: &str, case_sensitive: bool) -> bool {
    let fold = |c: char| {
        if case_sensitive {
            c
        } else {
            c.to_lowercase().next().unwrap_or(c)
        }
    };
    let mut haystack = candidate.chars().map(fold);
    term.chars()
        .filter(|c| !c.is_whitespace())
        .map(fold)
        .all(|needle| haystack.any(|c| c == needle))
}

impl Default for FuzzyRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl Ranker for FuzzyRanker {
    fn rank(&mut self, term: &str, candidates: &[String]) -> Vec<String> {
        if term.trim().is_empty() {
            return candidates.to_vec();
        }

        self.scores(term.trim(), candidates)
            .into_iter()
            .map(|(idx, _)| candidates[idx].clone())
            .collect()
    }
}
