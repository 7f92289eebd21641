use serde_json::Value;

const WORDS_DE: &str = include_str!("../../assets/words-de.json");
const WORDS_EN: &str = include_str!("../../assets/words-en.json");
const SENTENCES_DE: &str = include_str!("../../assets/sentences-de.json");
const SENTENCES_EN: &str = include_str!("../../assets/sentences-en.json");

/// Word and sentence drill items for one UI language.
pub struct WordBank {
    words: Vec<String>,
    sentences: Vec<String>,
}

fn parse_list(json: &str) -> Vec<String> {
    let parsed: Vec<String> = serde_json::from_str::<Vec<Value>>(json)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| v.as_str().map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .collect();
    parsed
}

impl WordBank {
    /// Items for a language code; anything other than "de" gets English.
    pub fn load(lang: &str) -> Self {
        let (words, sentences) = if lang == "de" {
            (parse_list(WORDS_DE), parse_list(SENTENCES_DE))
        } else {
            (parse_list(WORDS_EN), parse_list(SENTENCES_EN))
        };
        Self { words, sentences }
    }

    pub fn words(&self) -> Vec<String> {
        self.words.clone()
    }

    pub fn sentences(&self) -> Vec<String> {
        self.sentences.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_languages_have_items() {
        for lang in ["de", "en"] {
            let bank = WordBank::load(lang);
            assert!(bank.words().len() >= 20, "{lang} words too small");
            assert!(bank.sentences().len() >= 8, "{lang} sentences too small");
        }
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        let en = WordBank::load("en");
        let other = WordBank::load("fr");
        assert_eq!(en.words(), other.words());
    }

    #[test]
    fn test_no_blank_items() {
        let bank = WordBank::load("de");
        assert!(bank.words().iter().all(|w| !w.trim().is_empty()));
        assert!(bank.sentences().iter().all(|s| !s.trim().is_empty()));
    }
}
