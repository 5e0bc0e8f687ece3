//! Completion corpus

use alloc::string::String;
use alloc::vec::Vec;

/// Python keywords, built-ins, and frequently imported modules, in the order
/// completion candidates are offered.
pub const PYTHON_WORDS: &[&str] = &[
    // keywords
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield", "match", "case",
    // built-ins
    "abs", "all", "any", "ascii", "bin", "bool", "breakpoint", "bytearray", "bytes",
    "callable", "chr", "classmethod", "compile", "complex", "delattr", "dict", "dir",
    "divmod", "enumerate", "eval", "exec", "filter", "float", "format", "frozenset",
    "getattr", "globals", "hasattr", "hash", "help", "hex", "id", "input", "int",
    "isinstance", "issubclass", "iter", "len", "list", "locals", "map", "max", "memoryview",
    "min", "next", "object", "oct", "open", "ord", "pow", "print", "property", "range",
    "repr", "reversed", "round", "set", "setattr", "slice", "sorted", "staticmethod", "str",
    "sum", "super", "tuple", "type", "vars", "zip", "self", "Exception", "ValueError",
    "TypeError", "KeyError", "IndexError", "AttributeError", "RuntimeError",
    "StopIteration", "NotImplementedError",
    // modules
    "os", "sys", "math", "re", "json", "time", "datetime", "random", "collections",
    "itertools", "functools", "pathlib", "subprocess", "typing", "dataclasses", "logging",
    "argparse", "string", "shutil", "unittest", "threading", "asyncio", "socket", "csv",
];

/// Immutable, de-duplicated word list.
///
/// Stored case-sensitively; [`KeywordSet::matching`] compares case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordSet {
    words: Vec<String>,
}

impl KeywordSet {
    /// Builds the set, keeping first occurrences in order
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for word in words {
            let word = word.into();
            if !word.is_empty() && !unique.contains(&word) {
                unique.push(word);
            }
        }
        Self { words: unique }
    }

    pub fn python() -> Self {
        Self::from_words(PYTHON_WORDS.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.iter().map(|w| w.as_str())
    }

    /// Words starting with `prefix`, ignoring case, in corpus order
    pub fn matching<'a>(&'a self, prefix: &str) -> impl Iterator<Item = &'a str> + 'a {
        let prefix: Vec<char> = prefix.chars().flat_map(char::to_lowercase).collect();
        self.iter()
            .filter(move |word| starts_with_ignore_case(word, &prefix))
    }
}

fn starts_with_ignore_case(word: &str, lowered_prefix: &[char]) -> bool {
    let mut word_chars = word.chars().flat_map(char::to_lowercase);
    lowered_prefix
        .iter()
        .all(|expected| word_chars.next() == Some(*expected))
}
