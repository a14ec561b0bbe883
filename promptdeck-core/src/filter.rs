use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

static REPEATED_COMMAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*,").expect("Invalid repeated-comma regex"));
static REPEATED_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*$").expect("Invalid trailing-comma regex"));
static LEADING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*,").expect("Invalid leading-comma regex"));

/// Normalizes separator noise left behind by assembly or term removal:
/// repeated commas collapse to one, whitespace runs collapse to a single
/// space, and leading/trailing commas are stripped. Idempotent.
pub fn clean_prompt(prompt: &str) -> String {
    let mut cleaned = prompt.to_string();
    loop {
        let next = REPEATED_COMMAS.replace_all(&cleaned, ",").into_owned();
        if next == cleaned {
            break;
        }
        cleaned = next;
    }
    let cleaned = REPEATED_WHITESPACE.replace_all(&cleaned, " ");
    let cleaned = TRAILING_COMMA.replace_all(&cleaned, "");
    let cleaned = LEADING_COMMA.replace_all(&cleaned, "");
    cleaned.trim().to_string()
}

/// Outcome of one filtering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub cleaned: String,
    /// Terms that actually matched, each named once.
    pub removed: Vec<String>,
}

/// Removes disallowed words and phrases from assembled text.
///
/// Terms are normalized to lowercase and matched as case-insensitive whole
/// words. Stateless between calls; the term list can be swapped at runtime.
#[derive(Debug)]
pub struct BannedTermFilter {
    terms: Vec<(String, Regex)>,
}

impl BannedTermFilter {
    pub fn new(terms: &[String]) -> BannedTermFilter {
        BannedTermFilter {
            terms: Self::compile(terms),
        }
    }

    pub fn set_terms(&mut self, terms: &[String]) {
        self.terms = Self::compile(terms);
    }

    pub fn terms(&self) -> Vec<&str> {
        self.terms.iter().map(|(term, _)| term.as_str()).collect()
    }

    fn compile(terms: &[String]) -> Vec<(String, Regex)> {
        terms
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .filter_map(|term| {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(&term));
                match Regex::new(&pattern) {
                    Ok(re) => Some((term, re)),
                    Err(e) => {
                        warn!(term = %term, error = %e, "skipping unusable banned term");
                        None
                    }
                }
            })
            .collect()
    }

    /// Removes every banned term from `prompt` and reports which terms
    /// matched. Cleanup runs again afterwards, since removing a word can
    /// leave a dangling comma or a double space.
    pub fn filter(&self, prompt: &str) -> FilterOutcome {
        let mut cleaned = prompt.to_string();
        let mut removed = Vec::new();

        for (term, re) in &self.terms {
            if re.is_match(&cleaned) {
                removed.push(term.clone());
                cleaned = re.replace_all(&cleaned, "").into_owned();
            }
        }

        FilterOutcome {
            cleaned: clean_prompt(&cleaned),
            removed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_prompt_collapses_commas_and_spaces() {
        assert_eq!(clean_prompt("red,  , car"), "red, car");
        assert_eq!(clean_prompt("a   b"), "a b");
    }

    #[test]
    fn test_clean_prompt_strips_boundary_commas() {
        assert_eq!(clean_prompt("red, "), "red");
        assert_eq!(clean_prompt(", red"), "red");
        assert_eq!(clean_prompt("  red  "), "red");
    }

    #[test]
    fn test_clean_prompt_idempotent() {
        let inputs = [
            "a,,,b",
            ",,a,, b ,,",
            "x ,  , y,,",
            "",
            "plain text",
            ", , , ,",
        ];
        for input in inputs {
            let once = clean_prompt(input);
            let twice = clean_prompt(&once);
            assert_eq!(once, twice, "cleanup not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_filter_removes_whole_word() {
        let filter = BannedTermFilter::new(&["ugly".to_string()]);
        let outcome = filter.filter("an ugly dog");
        assert_eq!(outcome.cleaned, "an dog");
        assert_eq!(outcome.removed, vec!["ugly".to_string()]);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let filter = BannedTermFilter::new(&["Ugly".to_string()]);
        let outcome = filter.filter("an UGLY dog");
        assert_eq!(outcome.cleaned, "an dog");
        assert_eq!(outcome.removed, vec!["ugly".to_string()]);
    }

    #[test]
    fn test_filter_does_not_match_substrings() {
        let filter = BannedTermFilter::new(&["ugly".to_string()]);
        let outcome = filter.filter("an uglyish dog");
        assert_eq!(outcome.cleaned, "an uglyish dog");
        assert!(outcome.removed.is_empty());
    }

    #[test]
    fn test_filter_names_each_term_once() {
        let filter = BannedTermFilter::new(&["ugly".to_string()]);
        let outcome = filter.filter("ugly house, ugly door");
        assert_eq!(outcome.removed, vec!["ugly".to_string()]);
        assert_eq!(outcome.cleaned, "house, door");
    }

    #[test]
    fn test_filter_multi_word_term() {
        let filter = BannedTermFilter::new(&["low quality".to_string()]);
        let outcome = filter.filter("a low quality render");
        assert_eq!(outcome.cleaned, "a render");
        assert_eq!(outcome.removed, vec!["low quality".to_string()]);
    }

    #[test]
    fn test_filter_cleans_dangling_separators() {
        let filter = BannedTermFilter::new(&["watermark".to_string()]);
        let outcome = filter.filter("red car, watermark, sunset");
        assert_eq!(outcome.cleaned, "red car, sunset");
    }

    #[test]
    fn test_filter_skips_empty_terms() {
        let filter = BannedTermFilter::new(&["".to_string(), "  ".to_string()]);
        let outcome = filter.filter("untouched text");
        assert_eq!(outcome.cleaned, "untouched text");
        assert!(outcome.removed.is_empty());
    }

    #[test]
    fn test_set_terms_replaces_list() {
        let mut filter = BannedTermFilter::new(&["ugly".to_string()]);
        filter.set_terms(&["blurry".to_string()]);
        assert_eq!(filter.terms(), vec!["blurry"]);
        let outcome = filter.filter("an ugly blurry dog");
        assert_eq!(outcome.cleaned, "an ugly dog");
    }
}
