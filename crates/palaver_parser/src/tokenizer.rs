//! Input tokenization.
//!
//! Converts raw player chat into a stream of tokens.

/// A token from player input.
#[derive(Clone, Debug, PartialEq)]
pub enum InputToken {
    /// A lowercase word
    Word(String),
    /// A quoted string (preserved as-is)
    QuotedString(String),
    /// A quoted string whose closing quote never arrived
    Unterminated(String),
    /// End of input
    End,
}

/// Tokenizes player input.
pub struct InputTokenizer;

impl InputTokenizer {
    /// Tokenizes a raw input string into tokens.
    ///
    /// - Converts words to lowercase
    /// - Strips punctuation (except within quotes)
    /// - Preserves quoted strings as atomic units
    /// - Reports a quote left open at end of input as [`InputToken::Unterminated`]
    #[must_use]
    pub fn tokenize(input: &str) -> Vec<InputToken> {
        let mut tokens = Vec::new();
        let mut chars = input.chars();
        let mut current_word = String::new();

        while let Some(ch) = chars.next() {
            match ch {
                // Start of quoted string
                '"' => {
                    Self::flush(&mut current_word, &mut tokens);
                    let mut quoted = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '"' {
                            closed = true;
                            break;
                        }
                        quoted.push(c);
                    }
                    if closed {
                        tokens.push(InputToken::QuotedString(quoted));
                    } else {
                        tokens.push(InputToken::Unterminated(quoted));
                    }
                }
                // Punctuation to strip
                '.' | ',' | '!' | '?' | ';' | ':' | '\'' | '#' | '(' | ')' => {}
                // Whitespace (and anything else Unicode considers one) ends a word
                c if c.is_whitespace() => {
                    Self::flush(&mut current_word, &mut tokens);
                }
                // Regular character
                _ => {
                    current_word.push(ch);
                }
            }
        }

        Self::flush(&mut current_word, &mut tokens);
        tokens.push(InputToken::End);
        tokens
    }

    fn flush(current_word: &mut String, tokens: &mut Vec<InputToken>) {
        if !current_word.is_empty() {
            tokens.push(InputToken::Word(current_word.to_lowercase()));
            current_word.clear();
        }
    }
}
