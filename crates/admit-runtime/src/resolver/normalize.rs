//! Name normalization

/// Lowercases, strips whitespace and punctuation, and collapses legal-form
/// variants so that "Hanguk University", "hanguk univ." and "HANGUK-UNIV"
/// share one key.
#[derive(Debug, Clone)]
pub struct Normalizer {
    /// Multi-word variants, longest first
    phrase_rules: Vec<(Vec<String>, String)>,
    /// Single-word variants, applied to the ending of every word
    ending_rules: Vec<(String, String)>,
}

impl Normalizer {
    pub fn new(legal_forms: &[(String, String)]) -> Self {
        let mut phrase_rules = Vec::new();
        let mut ending_rules = Vec::new();

        for (variant, canonical) in legal_forms {
            let words = split_words(variant);
            let canonical: String = split_words(canonical).concat();
            match words.len() {
                0 => {}
                1 => ending_rules.extend(words.into_iter().map(|w| (w, canonical.clone()))),
                _ => phrase_rules.push((words, canonical)),
            }
        }

        phrase_rules.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        // Longer endings first so "university" wins over a shorter variant it contains
        ending_rules.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));

        Self {
            phrase_rules,
            ending_rules,
        }
    }

    pub fn normalize(&self, name: &str) -> String {
        let words = split_words(name);

        let mut collapsed: Vec<String> = Vec::with_capacity(words.len());
        let mut i = 0;
        'words: while i < words.len() {
            for (phrase, canonical) in &self.phrase_rules {
                if words[i..].starts_with(phrase) {
                    collapsed.push(canonical.clone());
                    i += phrase.len();
                    continue 'words;
                }
            }
            collapsed.push(words[i].clone());
            i += 1;
        }

        for word in collapsed.iter_mut() {
            for (variant, canonical) in &self.ending_rules {
                if word.ends_with(variant.as_str()) {
                    let stem = word.len() - variant.len();
                    word.truncate(stem);
                    word.push_str(canonical);
                    break;
                }
            }
        }

        collapsed.concat()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&crate::config::ResolverConfig::default().legal_forms)
    }
}

/// Lowercased alphanumeric runs
fn split_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_case_space_and_punctuation() {
        let n = Normalizer::new(&[]);
        assert_eq!(n.normalize("  Hanguk  Univ. "), "hangukuniv");
        assert_eq!(n.normalize("HANGUK-UNIV"), "hangukuniv");
        assert_eq!(n.normalize("(Medicine)"), "medicine");
        assert_eq!(n.normalize(""), "");
    }

    #[test]
    fn test_collapses_legal_forms() {
        let n = Normalizer::default();
        assert_eq!(n.normalize("Hanguk University"), "hangukuniv");
        assert_eq!(n.normalize("Hanguk Univ"), "hangukuniv");
        assert_eq!(n.normalize("Daehan Institute of Technology"), "daehantech");
        assert_eq!(n.normalize("한국대학교"), "한국대");
        assert_eq!(n.normalize("한국대"), "한국대");
    }

    #[test]
    fn test_collapses_forms_inside_longer_names() {
        let n = Normalizer::default();
        assert_eq!(n.normalize("2025 Hanguk University Law"), "2025hangukunivlaw");
        assert_eq!(
            n.normalize("Hanguk University of Foreign Studies"),
            "hangukunivofforeignstudies"
        );
        assert_eq!(n.normalize("한국대학교 의예과"), "한국대의예과");
        assert_eq!(n.normalize("Daehan College"), "daehancollege");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let n = Normalizer::default();
        for name in ["Hanguk University", "Seoul Nat'l Univ.", "한국 대학교 의예과"] {
            let once = n.normalize(name);
            assert_eq!(n.normalize(&once), once);
        }
    }
}
