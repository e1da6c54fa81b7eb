use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Splits text into lowercase letter-only words.
///
/// Words are maximal runs of letters; everything else is a boundary. Diacritics are
/// removed by decomposing to NFD and dropping combining marks, so `"Café"` and
/// `"cafe"` produce the same word.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl WordTokenizer {
    pub fn tokenize<'a>(&self, text: &'a str) -> Words<'a> {
        Words { text, offset: 0 }
    }
}

/// Lazy word stream over borrowed text. Cloning restarts from the clone point.
#[derive(Debug, Clone)]
pub struct Words<'a> {
    text: &'a str,
    offset: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || is_combining_mark(c)
}

fn normalize(segment: &str) -> String {
    segment.nfd()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

impl<'a> Iterator for Words<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while self.offset < self.text.len() {
            let rest = &self.text[self.offset..];
            let start = match rest.find(is_word_char) {
                Some(start) => start,
                None => {
                    self.offset = self.text.len();
                    return None;
                }
            };
            let word = &rest[start..];
            let end = word.find(|c: char| !is_word_char(c)).unwrap_or(word.len());
            self.offset += start + end;

            let normalized = normalize(&word[..end]);
            if !normalized.is_empty() {
                return Some(normalized);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        WordTokenizer.tokenize(text).collect()
    }

    #[test]
    fn splits_on_non_letters() {
        assert_eq!(words("Hello, World! 42 times"), vec!["hello", "world", "times"]);
        assert_eq!(words("e-mail"), vec!["e", "mail"]);
        assert!(words("  123 ... ").is_empty());
    }

    #[test]
    fn strips_diacritics() {
        assert_eq!(words("Café NAÏVE"), vec!["cafe", "naive"]);
        assert_eq!(words("cafe\u{301}"), vec!["cafe"]);
    }

    #[test]
    fn clone_restarts_stream() {
        let mut stream = WordTokenizer.tokenize("one two three");
        stream.next();
        let rest = stream.clone();
        assert_eq!(stream.collect::<Vec<_>>(), rest.collect::<Vec<_>>());
    }
}
