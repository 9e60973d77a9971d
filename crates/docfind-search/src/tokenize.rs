//! Text tokenization and stemming shared by indexing and querying.

use rust_stemmers::{Algorithm, Stemmer};

/// Minimum length of a word term, in bytes.
pub(crate) const MIN_TERM_LENGTH: usize = 2;

/// Tokenizer that lowercases and stems words.
///
/// Supports both space-separated languages (English) and CJK text, which is
/// indexed as single characters plus bigrams.
pub struct Analyzer {
    stemmer: Stemmer,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl Analyzer {
    /// Create an analyzer for English text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract normalized, stemmed terms from text.
    pub fn terms(&self, text: &str) -> Vec<String> {
        self.tokens(text).into_iter().map(|(_, term)| term).collect()
    }

    /// Extract `(word, term)` pairs: each lowercased word as written and the
    /// stemmed term it is indexed under. CJK terms are their own word.
    pub fn tokens(&self, text: &str) -> Vec<(String, String)> {
        let mut tokens = Vec::new();

        for word in words(text) {
            if word.len() >= MIN_TERM_LENGTH {
                let term = self.stem(&word);
                tokens.push((word, term));
            }
        }

        tokens.extend(cjk_terms(text).into_iter().map(|t| (t.clone(), t)));
        tokens
    }

    /// Lowercase and stem a single word.
    pub fn stem(&self, word: &str) -> String {
        let lower = normalize_term(word);
        self.stemmer.stem(&lower).into_owned()
    }
}

/// Split text into raw words on anything that is not alphanumeric.
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(normalize_term)
}

/// CJK unigrams, bigrams and, for short runs, the whole run.
fn cjk_terms(text: &str) -> Vec<String> {
    let cjk_text: String = text.chars().filter(|c| is_cjk_char(*c)).collect();
    if cjk_text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = cjk_text.chars().collect();
    let mut terms: Vec<String> = chars.iter().map(|c| c.to_string()).collect();

    for pair in chars.windows(2) {
        terms.push(pair.iter().collect());
    }

    if cjk_text.len() <= 20 && chars.len() >= 2 {
        terms.push(cjk_text);
    }

    terms
}

/// Check if a character is a CJK (Chinese, Japanese, Korean) character.
pub(crate) fn is_cjk_char(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}' |      // CJK Unified Ideographs
        '\u{3400}'..='\u{4DBF}' |      // CJK Unified Ideographs Extension A
        '\u{20000}'..='\u{2A6DF}' |    // CJK Unified Ideographs Extension B
        '\u{F900}'..='\u{FAFF}' |      // CJK Compatibility Ideographs
        '\u{3040}'..='\u{309F}' |      // Hiragana
        '\u{30A0}'..='\u{30FF}' |      // Katakana
        '\u{AC00}'..='\u{D7AF}'        // Korean Hangul Syllables
    )
}

/// Normalize a term (lowercase, trim).
fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_are_lowercased_and_stemmed() {
        let analyzer = Analyzer::new();
        let terms = analyzer.terms("Slack Motivations, Running!");
        assert!(terms.contains(&"slack".to_string()));
        assert!(terms.contains(&"motiv".to_string()));
        assert!(terms.contains(&"run".to_string()));
    }

    #[test]
    fn test_short_words_are_dropped() {
        let analyzer = Analyzer::new();
        let terms = analyzer.terms("a b go");
        assert_eq!(terms, vec!["go".to_string()]);
    }

    #[test]
    fn test_stem_matches_index_terms() {
        let analyzer = Analyzer::new();
        assert_eq!(analyzer.stem("Motivations"), analyzer.terms("motivation")[0]);
    }

    #[test]
    fn test_tokens_keep_written_word() {
        let analyzer = Analyzer::new();
        let tokens = analyzer.tokens("Paginated results");
        assert_eq!(
            tokens[0],
            ("paginated".to_string(), analyzer.stem("paginated"))
        );
        assert_eq!(tokens[1].0, "results");
    }

    #[test]
    fn test_tokenize_chinese() {
        let terms = cjk_terms("你好世界");
        assert!(terms.contains(&"你".to_string()));
        assert!(terms.contains(&"界".to_string()));
        assert!(terms.contains(&"你好".to_string()));
        assert!(terms.contains(&"世界".to_string()));
    }

    #[test]
    fn test_is_cjk_char() {
        assert!(is_cjk_char('你'));
        assert!(is_cjk_char('あ'));
        assert!(is_cjk_char('한'));
        assert!(!is_cjk_char('a'));
        assert!(!is_cjk_char('1'));
    }

    #[test]
    fn test_words_split_on_punctuation() {
        let words: Vec<String> = words("slack-morphism/Akka HTTP").collect();
        assert_eq!(words, vec!["slack", "morphism", "akka", "http"]);
    }
}
