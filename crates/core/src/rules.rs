//! Token rules and the combined matcher
//!
//! Each rule recognizes one MQL token class and renders its C++-compatible
//! replacement. The rules are an ordered, open list: they are compiled into
//! a single alternation regex, and because the regex crate uses
//! leftmost-first semantics, the first rule in the list wins when several
//! could match at the same position.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

/// Identity of the token class a rule recognizes
///
/// An open set: downstream code matches on the name, and new rules bring
/// their own class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenClass(&'static str);

impl TokenClass {
    /// The `->` member-access operator
    pub const ARROW: TokenClass = TokenClass("arrow");
    /// A color/datetime literal marker separated from its quote by whitespace
    pub const LITERAL_QUOTE_SPACING: TokenClass = TokenClass("literal-quote-spacing");
    /// The `size_t` keyword
    pub const SIZE_T: TokenClass = TokenClass("size-t");

    /// Create a class with the given name
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The class name
    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for TokenClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Renders the replacement text for a rule's match
type RenderFn = fn(&Captures<'_>) -> String;

/// One token-class matcher: a regex fragment plus its replacement renderer
///
/// The fragment must define a named capture group (`group`) that is present
/// exactly when this rule's alternative matched; it is how the combined
/// matcher attributes a match back to its rule.
#[derive(Debug)]
pub struct TokenRule {
    class: TokenClass,
    group: &'static str,
    fragment: &'static str,
    render: RenderFn,
}

impl TokenRule {
    /// Create a new rule
    pub const fn new(
        class: TokenClass,
        group: &'static str,
        fragment: &'static str,
        render: RenderFn,
    ) -> Self {
        Self {
            class,
            group,
            fragment,
            render,
        }
    }

    /// The token class this rule recognizes
    pub fn class(&self) -> TokenClass {
        self.class
    }
}

/// Error building a rule set
#[derive(Debug, Error)]
pub enum RuleError {
    /// The combined alternation failed to compile
    #[error("invalid token pattern: {0}")]
    Pattern(#[from] regex::Error),
    /// A rule's marker group is missing from its fragment
    #[error("rule '{class}' does not define capture group '{group}'")]
    MissingGroup {
        /// Offending rule's class
        class: TokenClass,
        /// Expected group name
        group: &'static str,
    },
}

/// A match produced by the combined matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch {
    /// Class of the rule that matched
    pub class: TokenClass,
    /// Match start, byte offset into the scanned span
    pub start: usize,
    /// Match end, byte offset into the scanned span
    pub end: usize,
    /// Rendered replacement text
    pub replacement: String,
}

/// An ordered set of token rules compiled into one combined regex
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<TokenRule>,
    combined: Regex,
}

impl RuleSet {
    /// Compile a rule set from an ordered list of rules
    ///
    /// Rule order is priority order: earlier rules win at equal positions.
    pub fn new(rules: Vec<TokenRule>) -> Result<Self, RuleError> {
        let pattern = rules
            .iter()
            .map(|r| r.fragment)
            .collect::<Vec<_>>()
            .join("|");
        let combined = Regex::new(&pattern)?;
        for rule in &rules {
            if !combined
                .capture_names()
                .any(|name| name == Some(rule.group))
            {
                return Err(RuleError::MissingGroup {
                    class: rule.class,
                    group: rule.group,
                });
            }
        }
        Ok(Self { rules, combined })
    }

    /// The standard MQL→C++ rule set
    ///
    /// 1. `->` becomes `.`
    /// 2. `C   '` (color/datetime marker, spaces/tabs/NBSPs, quote) collapses
    ///    to `C'`, preserving the marker's case
    /// 3. whole-word `size_t` becomes `int`
    pub fn standard() -> &'static RuleSet {
        static STANDARD: Lazy<RuleSet> = Lazy::new(|| {
            RuleSet::new(vec![
                TokenRule::new(TokenClass::ARROW, "arrow", r"(?P<arrow>->)", |_| ".".to_string()),
                TokenRule::new(
                    TokenClass::LITERAL_QUOTE_SPACING,
                    "lit",
                    r"(?P<lit>[CcDd])[ \t\u{00A0}]+'",
                    |caps| format!("{}'", &caps["lit"]),
                ),
                TokenRule::new(
                    TokenClass::SIZE_T,
                    "sizet",
                    r"\b(?P<sizet>size_t)\b",
                    |_| "int".to_string(),
                ),
            ])
            .expect("standard rules always compile")
        });
        &STANDARD
    }

    /// The rules in priority order
    pub fn rules(&self) -> &[TokenRule] {
        &self.rules
    }

    /// Lazily yield non-overlapping matches over `text`, left to right
    pub fn matches<'s>(&'s self, text: &'s str) -> impl Iterator<Item = TokenMatch> + 's {
        self.combined.captures_iter(text).filter_map(move |caps| {
            let whole = caps.get(0)?;
            let rule = self
                .rules
                .iter()
                .find(|r| caps.name(r.group).is_some())?;
            Some(TokenMatch {
                class: rule.class,
                start: whole.start(),
                end: whole.end(),
                replacement: (rule.render)(&caps),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(text: &str) -> Vec<(TokenClass, String)> {
        RuleSet::standard()
            .matches(text)
            .map(|m| (m.class, m.replacement))
            .collect()
    }

    #[test]
    fn test_arrow_replaced_with_dot() {
        let ms: Vec<_> = RuleSet::standard().matches("obj->value").collect();
        assert_eq!(ms.len(), 1);
        assert_eq!(ms[0].class, TokenClass::ARROW);
        assert_eq!(ms[0].start, 3);
        assert_eq!(ms[0].end, 5);
        assert_eq!(ms[0].replacement, ".");
    }

    #[test]
    fn test_literal_spacing_collapses_and_preserves_case() {
        for (input, expected) in [
            ("C   'red'", "C'"),
            ("c\t'red'", "c'"),
            ("D  '2024.01.01'", "D'"),
            ("d '12:00'", "d'"),
        ] {
            let ms: Vec<_> = RuleSet::standard().matches(input).collect();
            assert_eq!(ms[0].class, TokenClass::LITERAL_QUOTE_SPACING, "{input}");
            assert_eq!(ms[0].replacement, expected, "{input}");
        }
    }

    #[test]
    fn test_literal_spacing_matches_nbsp() {
        let input = format!("C{}'red'", '\u{00A0}');
        let ms: Vec<_> = RuleSet::standard().matches(&input).collect();
        assert_eq!(ms.len(), 1);
        assert_eq!(ms[0].replacement, "C'");
    }

    #[test]
    fn test_literal_marker_without_whitespace_is_untouched() {
        // `C'red'` is already well-formed; nothing to collapse.
        assert!(classes("C'red'").is_empty());
    }

    #[test]
    fn test_size_t_is_whole_word_only() {
        let ms: Vec<_> = RuleSet::standard().matches("size_t n = 0;").collect();
        assert_eq!(ms.len(), 1);
        assert_eq!(ms[0].class, TokenClass::SIZE_T);
        assert_eq!(ms[0].replacement, "int");

        assert!(classes("my_size_tx").is_empty());
        assert!(classes("size_type").is_empty());
    }

    #[test]
    fn test_matches_are_non_overlapping_left_to_right() {
        let ms: Vec<_> = RuleSet::standard().matches("a->b->c").collect();
        assert_eq!(ms.len(), 2);
        assert!(ms[0].start < ms[1].start);
    }

    #[test]
    fn test_mixed_classes_in_one_span() {
        let got = classes("int x = obj->value; size_t n = C   'red';");
        assert_eq!(
            got,
            vec![
                (TokenClass::ARROW, ".".to_string()),
                (TokenClass::SIZE_T, "int".to_string()),
                (TokenClass::LITERAL_QUOTE_SPACING, "C'".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_group_is_rejected() {
        let err = RuleSet::new(vec![TokenRule::new(
            TokenClass::new("broken"),
            "nope",
            r"(?P<other>x)",
            |_| String::new(),
        )])
        .unwrap_err();
        assert!(matches!(err, RuleError::MissingGroup { .. }));
    }
}
