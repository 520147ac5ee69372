//! Compiled line patterns shared by the strict and heuristic phases.

use once_cell::sync::Lazy;
use regex::Regex;

/// A day marker: `DAY 1`, `Day 2:`, `### Day 3 - Old Town`, `**DAY 4**`.
/// Must open a line (after markdown decoration) and be followed by digits.
pub(crate) static RE_DAY_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^[ \t#*_>\-]*day[ \t]*\d+").unwrap());

/// A horizontal rule (`---`, `***`, `===`) on its own line
static RE_RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[-*_=][ \t]*){3,}$").unwrap());

/// Leading bullet, heading, quote, numbering or emphasis characters
static RE_DECORATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\s#>*_•+\-]*(?:\d+[.)]\s+)?[\s*_]*").unwrap());

/// A list item (`- x`, `* x`, `• x`, `1. x`), as opposed to bold text
static RE_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[-*•+]\s|\d+[.)]\s)").unwrap());

/// `Morning:`, `Afternoon (2-5 PM):`, `Evening**:` once decoration is stripped
static RE_SLOT_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(morning|afternoon|evening)\b[ \t]*(?:\([^)]*\))?[ \t*_]*:[\s*_]*(.*)$")
        .unwrap()
});

/// Section keywords, case-insensitive, at a word start so `seafood` or
/// `Costa` never read as a label
static RE_FOOD_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:foods?|recommendations?)\b").unwrap());
static RE_ACCOMMODATION_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\baccommodations?\b").unwrap());
static RE_TRANSPORT_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:transport\w*|tips?)\b").unwrap());
static RE_COST_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:estimated|costs?)\b").unwrap());

/// Currency-marked amount: `₹1500`, `$ 45.50`, `₹1,200.00`, `Rs. 800`
static RE_CURRENCY_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:₹|\$|€|£|\bRs\.?|\bINR)\s*((?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{2})?)").unwrap()
});

/// Line with leading decoration removed
pub(crate) fn strip_decoration(line: &str) -> &str {
    match RE_DECORATION.find(line) {
        Some(found) => &line[found.end()..],
        None => line,
    }
}

pub(crate) fn is_rule(line: &str) -> bool {
    RE_RULE.is_match(line)
}

pub(crate) fn is_bullet(line: &str) -> bool {
    RE_BULLET.is_match(line)
}

/// Section named by a label head, checked in precedence order
pub(crate) fn section_keyword(head: &str) -> Option<SectionKeyword> {
    if RE_FOOD_KEYWORD.is_match(head) {
        Some(SectionKeyword::Food)
    } else if RE_ACCOMMODATION_KEYWORD.is_match(head) {
        Some(SectionKeyword::Accommodation)
    } else if RE_TRANSPORT_KEYWORD.is_match(head) {
        Some(SectionKeyword::Transport)
    } else if RE_COST_KEYWORD.is_match(head) {
        Some(SectionKeyword::Cost)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SectionKeyword {
    Food,
    Accommodation,
    Transport,
    Cost,
}

/// Split a slot label line into its slot name (lowercase) and the text after the label
pub(crate) fn slot_label(body: &str) -> Option<(String, &str)> {
    let captures = RE_SLOT_LABEL.captures(body)?;
    let slot = captures.get(1)?.as_str().to_ascii_lowercase();
    let rest = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
    Some((slot, rest))
}

/// First currency-marked amount on the line, if any
pub fn extract_cost(line: &str) -> Option<f64> {
    let captures = RE_CURRENCY_AMOUNT.captures(line)?;
    let amount = captures.get(1)?.as_str().replace(',', "");
    amount.parse::<f64>().ok().filter(|value| value.is_finite())
}
