//! Name/symbol validation and the textual format mini-language.
//!
//! A format specifier has at most three characters, case-insensitive, each
//! picking one option from a distinct category:
//!
//! | category | characters |
//! |----------|------------|
//! | content  | `n` name, `s` symbol, `c` caption, `d` description, `r` reference |
//! | casing   | `u` upper, `l` lower, `t` title |
//! | brackets | `(` or `)`, `[` or `]`, `{` or `}`, `<` or `>` |
//!
//! `"st("` is the title-cased symbol in parentheses, `"T["` the title-cased
//! default text in square brackets. `"sc"` is rejected (two content
//! selectors) and so is any unrecognised character.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::MeasureError;

static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[\p{Lu}\p{Ll}\p{Lt}\p{Lm}\p{Lo}\p{Nl}_][\p{Lu}\p{Ll}\p{Lt}\p{Lm}\p{Lo}\p{Nl}\p{Nd}\p{Pc}\p{Mn}\p{Mc}\p{Cf}]*$",
    )
    .expect("Invalid identifier regex")
});

static SYMBOL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{M}\p{S}\p{N}]+$").expect("Invalid symbol regex"));

const MAX_SPEC_LEN: usize = 3;

/// True when `text` is shaped like a programming-language identifier.
pub fn is_valid_identifier(text: &str) -> bool {
    IDENTIFIER_REGEX.is_match(text)
}

/// True when `text` only contains letters, marks, symbols and numbers.
pub fn is_valid_symbol(text: &str) -> bool {
    SYMBOL_REGEX.is_match(text)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentFormat {
    /// Symbol, else caption, else name.
    #[default]
    Default,
    Name,
    Symbol,
    Caption,
    Description,
    Reference,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CasingFormat {
    #[default]
    Unchanged,
    Upper,
    Lower,
    Title,
}

impl CasingFormat {
    pub fn apply(self, text: &str) -> String {
        match self {
            CasingFormat::Unchanged => text.to_string(),
            CasingFormat::Upper => text.to_uppercase(),
            CasingFormat::Lower => text.to_lowercase(),
            CasingFormat::Title => title_case(text),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BracketFormat {
    #[default]
    None,
    Parentheses,
    Square,
    Curly,
    Angle,
}

impl BracketFormat {
    pub fn wrap(self, text: &str) -> String {
        let (open, close) = match self {
            BracketFormat::None => return text.to_string(),
            BracketFormat::Parentheses => ('(', ')'),
            BracketFormat::Square => ('[', ']'),
            BracketFormat::Curly => ('{', '}'),
            BracketFormat::Angle => ('<', '>'),
        };
        format!("{open}{text}{close}")
    }
}

/// Parsed form of a format specifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextFormat {
    pub content: ContentFormat,
    pub casing: CasingFormat,
    pub brackets: BracketFormat,
}

impl TextFormat {
    pub fn new(content: ContentFormat) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    pub fn with_casing(mut self, casing: CasingFormat) -> Self {
        self.casing = casing;
        self
    }

    pub fn with_brackets(mut self, brackets: BracketFormat) -> Self {
        self.brackets = brackets;
        self
    }

    /// Casing and brackets that actually apply to the selected content.
    ///
    /// Name and reference text ignore both; description ignores brackets.
    pub fn effective(self) -> Self {
        match self.content {
            ContentFormat::Name | ContentFormat::Reference => Self {
                casing: CasingFormat::Unchanged,
                brackets: BracketFormat::None,
                ..self
            },
            ContentFormat::Description => Self {
                brackets: BracketFormat::None,
                ..self
            },
            _ => self,
        }
    }

    /// Apply casing and brackets to already selected text.
    pub fn decorate(self, text: &str) -> String {
        let effective = self.effective();
        if text.is_empty() {
            return String::new();
        }
        effective.brackets.wrap(&effective.casing.apply(text))
    }
}

impl FromStr for TextFormat {
    type Err = MeasureError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let invalid = || MeasureError::InvalidFormatSpecifier {
            spec: spec.to_string(),
        };
        if spec.chars().count() > MAX_SPEC_LEN {
            return Err(invalid());
        }

        let mut content = None;
        let mut casing = None;
        let mut brackets = None;

        for ch in spec.chars().flat_map(char::to_lowercase) {
            let duplicate = match ch {
                'n' => content.replace(ContentFormat::Name).is_some(),
                's' => content.replace(ContentFormat::Symbol).is_some(),
                'c' => content.replace(ContentFormat::Caption).is_some(),
                'd' => content.replace(ContentFormat::Description).is_some(),
                'r' => content.replace(ContentFormat::Reference).is_some(),
                'u' => casing.replace(CasingFormat::Upper).is_some(),
                'l' => casing.replace(CasingFormat::Lower).is_some(),
                't' => casing.replace(CasingFormat::Title).is_some(),
                '(' | ')' => brackets.replace(BracketFormat::Parentheses).is_some(),
                '[' | ']' => brackets.replace(BracketFormat::Square).is_some(),
                '{' | '}' => brackets.replace(BracketFormat::Curly).is_some(),
                '<' | '>' => brackets.replace(BracketFormat::Angle).is_some(),
                _ => return Err(invalid()),
            };
            if duplicate {
                return Err(invalid());
            }
        }

        Ok(Self {
            content: content.unwrap_or_default(),
            casing: casing.unwrap_or_default(),
            brackets: brackets.unwrap_or_default(),
        })
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let content = match self.content {
            ContentFormat::Default => "",
            ContentFormat::Name => "n",
            ContentFormat::Symbol => "s",
            ContentFormat::Caption => "c",
            ContentFormat::Description => "d",
            ContentFormat::Reference => "r",
        };
        let casing = match self.casing {
            CasingFormat::Unchanged => "",
            CasingFormat::Upper => "u",
            CasingFormat::Lower => "l",
            CasingFormat::Title => "t",
        };
        let brackets = match self.brackets {
            BracketFormat::None => "",
            BracketFormat::Parentheses => "(",
            BracketFormat::Square => "[",
            BracketFormat::Curly => "{",
            BracketFormat::Angle => "<",
        };
        write!(f, "{content}{casing}{brackets}")
    }
}

/// Upper-case the first letter of every word and lower-case the rest.
/// Words written entirely in upper case are kept as acronyms.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, word) in text.split(' ').enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let is_acronym = word.chars().any(char::is_alphabetic)
            && word
                .chars()
                .filter(|c| c.is_alphabetic())
                .all(char::is_uppercase);
        if is_acronym {
            out.push_str(word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.extend(chars.flat_map(char::to_lowercase));
        }
    }
    out
}
