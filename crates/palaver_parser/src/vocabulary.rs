//! Vocabulary registry for sentence normalization.
//!
//! Stores the canonical form of words together with the inflections and
//! spelling variants that fold into them, plus filler words that carry no
//! meaning for trigger matching.

use std::collections::{HashMap, HashSet};

/// A registered word with its canonical spelling and alternative forms.
#[derive(Clone, Debug)]
pub struct Word {
    /// Canonical spelling (lowercase)
    pub canonical: String,
    /// Forms that normalize to the canonical spelling
    pub forms: HashSet<String>,
}

impl Word {
    /// Creates a word with the given canonical spelling and no forms.
    #[must_use]
    pub fn new(canonical: impl Into<String>) -> Self {
        Self {
            canonical: canonical.into().to_lowercase(),
            forms: HashSet::new(),
        }
    }

    /// Adds a form that folds into this word.
    #[must_use]
    pub fn with_form(mut self, form: impl Into<String>) -> Self {
        self.forms.insert(form.into().to_lowercase());
        self
    }

    /// Adds the regular `-s` plural of the canonical spelling.
    #[must_use]
    pub fn with_plural(self) -> Self {
        let plural = format!("{}s", self.canonical);
        self.with_form(plural)
    }
}

/// Static vocabulary consulted by the normalizer.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    /// Words by canonical spelling
    words: HashMap<String, Word>,
    /// Form -> canonical spelling mapping
    forms: HashMap<String, String>,
    /// Articles and politeness words dropped from sentences
    fillers: HashSet<String>,
}

impl Vocabulary {
    /// Creates a new empty vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a word with its forms.
    ///
    /// A form already claimed by another word is re-pointed at this one;
    /// the last registration wins.
    pub fn register_word(&mut self, word: Word) {
        for form in &word.forms {
            self.forms.insert(form.clone(), word.canonical.clone());
        }
        self.words.insert(word.canonical.clone(), word);
    }

    /// Looks up a word by any of its spellings.
    #[must_use]
    pub fn lookup_word(&self, spelling: &str) -> Option<&Word> {
        if let Some(word) = self.words.get(spelling) {
            return Some(word);
        }
        self.forms
            .get(spelling)
            .and_then(|canonical| self.words.get(canonical))
    }

    /// Returns the canonical spelling of a lowercase word.
    ///
    /// Unknown words are their own canonical form.
    #[must_use]
    pub fn canonical<'a>(&'a self, spelling: &'a str) -> &'a str {
        self.forms.get(spelling).map_or(spelling, String::as_str)
    }

    /// Registers a filler word.
    pub fn register_filler(&mut self, filler: impl Into<String>) {
        self.fillers.insert(filler.into().to_lowercase());
    }

    /// Checks if a word is a registered filler.
    #[must_use]
    pub fn is_filler(&self, spelling: &str) -> bool {
        self.fillers.contains(spelling)
    }

    /// Returns the number of registered words.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}
