//! Tab completion over registered command names.

use super::Trie;

/// Result of a completion query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completions {
    /// Matching names, lower-cased and sorted. A name registered twice
    /// appears twice.
    pub matches: Vec<String>,
    /// Length of the longest match.
    pub format_width: usize,
}

impl Completions {
    /// Check if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Prefix index of known words.
#[derive(Debug, Clone, Default)]
pub struct TerminalAutocomplete {
    known_words: Trie<usize>,
}

impl TerminalAutocomplete {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a word. Words are stored lower-cased; duplicates are counted.
    pub fn register(&mut self, word: &str) {
        let word = word.to_lowercase();
        match self.known_words.get_mut(&word) {
            Some(count) => *count += 1,
            None => {
                self.known_words.insert(&word, 1);
            }
        }
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.known_words.len()
    }

    /// Check if no word is registered.
    pub fn is_empty(&self) -> bool {
        self.known_words.is_empty()
    }

    /// Complete the last word of `text`.
    ///
    /// The last word is everything after the final space. On any match the
    /// word is replaced by the longest prefix shared by all matches; without
    /// matches `text` is left as it was.
    ///
    /// # Examples
    ///
    /// ```
    /// use bevy_command_terminal::core::TerminalAutocomplete;
    ///
    /// let mut index = TerminalAutocomplete::new();
    /// index.register("Schedule");
    /// index.register("ScheduleUnscaled");
    ///
    /// let mut text = String::from("Help sch");
    /// let completions = index.complete(&mut text);
    /// assert_eq!(text, "Help schedule");
    /// assert_eq!(completions.format_width, 16);
    /// ```
    pub fn complete(&self, text: &mut String) -> Completions {
        let word_start = text.rfind(' ').map_or(0, |i| i + 1);
        let partial = text[word_start..].to_lowercase();

        let mut matches: Vec<String> = self
            .known_words
            .prefix_iter(&partial)
            .flat_map(|(word, &count)| std::iter::repeat_n(word.to_string(), count))
            .collect();
        matches.sort();

        let format_width = matches
            .iter()
            .map(|word| word.chars().count())
            .max()
            .unwrap_or(0);
        if let Some(first) = matches.first() {
            let common = matches[1..]
                .iter()
                .fold(first.as_str(), |prefix, word| common_prefix(prefix, word));
            text.truncate(word_start);
            text.push_str(common);
        }

        Completions {
            matches,
            format_width,
        }
    }
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map_or_else(|| a.len().min(b.len()), |((i, _), _)| i);
    &a[..end]
}
