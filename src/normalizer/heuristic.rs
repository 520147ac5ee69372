//! Line-oriented fallback parser for itineraries written as loosely formatted prose.
//!
//! The text is split into day blocks on `DAY n` markers. Each block is scanned
//! line by line with a field cursor: a label line moves the cursor (and may seed
//! the field), an unlabeled line is appended to whatever field the cursor points
//! at. [`classify`] is the transition table, [`DayBuilder::apply`] the state update.

use super::patterns::{self, SectionKeyword, RE_DAY_MARKER};
use crate::types::DayRecord;
use tracing::debug;

/// Target of the field cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Morning,
    Afternoon,
    Evening,
    Food,
    Accommodation,
    Transport,
    Cost,
}

/// What a single non-empty line means to the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    /// `Morning:`/`Afternoon:`/`Evening:` with the text after the label
    Slot(Field, &'a str),
    /// Food header; its own text is not content
    FoodHeader,
    /// Accommodation or transport label with the text after the colon
    Section(Field, &'a str),
    /// Cost label with the first currency amount found on the line
    Cost(Option<f64>),
    /// Horizontal rule; closes the current section
    Rule,
    /// Anything else
    Text(&'a str),
}

/// Classify a trimmed, non-empty line. Checks run in a fixed precedence:
/// rules, slots, food, accommodation, transport, cost. Slot labels and
/// section keywords are both case-insensitive.
pub fn classify(line: &str) -> LineKind<'_> {
    if patterns::is_rule(line) {
        return LineKind::Rule;
    }

    let body = patterns::strip_decoration(line);

    if let Some((slot, rest)) = patterns::slot_label(body) {
        let field = match slot.as_str() {
            "morning" => Field::Morning,
            "afternoon" => Field::Afternoon,
            _ => Field::Evening,
        };
        return LineKind::Slot(field, rest.trim());
    }

    let Some(head) = label_head(line, body) else {
        return LineKind::Text(line);
    };

    match patterns::section_keyword(head) {
        Some(SectionKeyword::Food) => LineKind::FoodHeader,
        Some(SectionKeyword::Accommodation) => {
            LineKind::Section(Field::Accommodation, after_colon(body))
        }
        Some(SectionKeyword::Transport) => LineKind::Section(Field::Transport, after_colon(body)),
        Some(SectionKeyword::Cost) => LineKind::Cost(patterns::extract_cost(line)),
        None => LineKind::Text(line),
    }
}

/// The label part of a line: text before the first colon, or the whole line
/// when it has no colon. Keywords match anywhere in it, case-insensitively.
/// List items are content unless their head is a plain phrase, so
/// `- **Transport Tips:** bus` is a label but `- Cafe Mocha (Cost: ₹300)` is not.
fn label_head<'a>(line: &str, body: &'a str) -> Option<&'a str> {
    let bullet = patterns::is_bullet(line);
    let head = match body.find(':') {
        Some(idx) => &body[..idx],
        None if bullet => return None,
        None => body,
    };
    let head = head.trim_matches(|c: char| c == '*' || c == '_' || c.is_whitespace());
    if head.is_empty() {
        return None;
    }

    let plain = head
        .chars()
        .all(|c| c.is_alphabetic() || c.is_whitespace() || matches!(c, '&' | '/' | '\''));
    if bullet && !plain {
        return None;
    }
    Some(head)
}

fn after_colon(body: &str) -> &str {
    body.split_once(':')
        .map(|(_, rest)| rest.trim_start_matches(|c: char| c == '*' || c == '_'))
        .unwrap_or_default()
        .trim()
}

/// Accumulates one day block
#[derive(Debug)]
pub struct DayBuilder {
    record: DayRecord,
    cursor: Option<Field>,
    cost_found: bool,
}

impl DayBuilder {
    pub fn new(day: u32) -> Self {
        Self {
            record: DayRecord::new(day),
            cursor: None,
            cost_found: false,
        }
    }

    pub fn cursor(&self) -> Option<Field> {
        self.cursor
    }

    pub fn apply(&mut self, kind: LineKind<'_>) {
        match kind {
            LineKind::Slot(field, rest) | LineKind::Section(field, rest) => {
                self.cursor = Some(field);
                if let Some(text) = self.text_mut(field) {
                    *text = rest.to_string();
                }
            }
            LineKind::FoodHeader => self.cursor = Some(Field::Food),
            LineKind::Rule => self.cursor = None,
            LineKind::Cost(amount) => {
                self.cursor = Some(Field::Cost);
                self.record_cost(amount);
            }
            LineKind::Text(line) => match self.cursor {
                // an amount on the line after a bare cost label
                Some(Field::Cost) if !self.cost_found => {
                    self.record_cost(patterns::extract_cost(line));
                }
                Some(field) => {
                    if let Some(text) = self.text_mut(field) {
                        text.push(' ');
                        text.push_str(line);
                    }
                }
                None => {}
            },
        }
    }

    fn record_cost(&mut self, amount: Option<f64>) {
        if let Some(amount) = amount {
            self.record.estimated_cost = amount.max(0.0);
            self.cost_found = true;
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Morning => Some(&mut self.record.morning),
            Field::Afternoon => Some(&mut self.record.afternoon),
            Field::Evening => Some(&mut self.record.evening),
            Field::Food => Some(&mut self.record.food_recommendations),
            Field::Accommodation => Some(&mut self.record.accommodation_info),
            Field::Transport => Some(&mut self.record.transport_tips),
            Field::Cost => None,
        }
    }

    /// Trim every text field; `None` when the block has no morning, afternoon
    /// or evening content.
    pub fn finish(mut self) -> Option<DayRecord> {
        for field in [
            Field::Morning,
            Field::Afternoon,
            Field::Evening,
            Field::Food,
            Field::Accommodation,
            Field::Transport,
        ] {
            if let Some(text) = self.text_mut(field) {
                *text = text.trim().to_string();
            }
        }

        self.record.has_activity().then_some(self.record)
    }
}

/// Split `text` into day blocks, dropping everything before the first marker.
/// The rest of each marker line (a date or title) stays at the start of its block.
pub fn split_day_blocks(text: &str) -> Vec<&str> {
    let markers: Vec<_> = RE_DAY_MARKER.find_iter(text).collect();

    markers
        .iter()
        .enumerate()
        .map(|(idx, marker)| {
            let end = markers
                .get(idx + 1)
                .map(|next| next.start())
                .unwrap_or(text.len());
            text[marker.end()..end]
                .trim_start_matches(|c: char| matches!(c, '*' | '_' | ':' | '-' | '–' | '—' | '.' | ')' | ' ' | '\t'))
        })
        .collect()
}

/// Parse every day block, numbering kept days densely from 1
pub fn parse(text: &str) -> Vec<DayRecord> {
    let blocks = split_day_blocks(text);
    let mut days: Vec<DayRecord> = Vec::with_capacity(blocks.len());

    for (block_idx, block) in blocks.iter().enumerate() {
        let mut builder = DayBuilder::new(days.len() as u32 + 1);

        for line in block.lines().map(str::trim).filter(|line| !line.is_empty()) {
            builder.apply(classify(line));
        }

        match builder.finish() {
            Some(record) => days.push(record),
            None => debug!(
                target: "itinerary::normalizer",
                block = block_idx,
                "discarding day block without morning, afternoon or evening"
            ),
        }
    }

    days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_slots_and_sections() {
        assert_eq!(
            classify("Morning: Fort Aguada"),
            LineKind::Slot(Field::Morning, "Fort Aguada")
        );
        assert_eq!(
            classify("- **Evening:** Tito's Lane"),
            LineKind::Slot(Field::Evening, "Tito's Lane")
        );
        assert_eq!(
            classify("Accommodation Info: Stay near Calangute"),
            LineKind::Section(Field::Accommodation, "Stay near Calangute")
        );
        assert_eq!(
            classify("Transport Tips: Rent a scooter"),
            LineKind::Section(Field::Transport, "Rent a scooter")
        );
        assert_eq!(classify("Food Recommendations:"), LineKind::FoodHeader);
        assert_eq!(classify("FOOD RECOMMENDATIONS"), LineKind::FoodHeader);
        assert_eq!(
            classify("Estimated Daily Cost: ₹1500 (breakdown)"),
            LineKind::Cost(Some(1500.0))
        );
    }

    #[test]
    fn test_classify_keeps_bullet_content_as_text() {
        let line = "- Cafe Mocha - Goan fusion (Cost: ₹300)";
        assert_eq!(classify(line), LineKind::Text(line));

        let line = "- Fisherman's Wharf seafood tips";
        assert_eq!(classify(line), LineKind::Text(line));
    }

    #[test]
    fn test_classify_qualified_labels() {
        assert_eq!(
            classify("Transport Tips (local): take the bus"),
            LineKind::Section(Field::Transport, "take the bus")
        );
        assert_eq!(
            classify("Accommodation (3-star): Hotel Mandovi"),
            LineKind::Section(Field::Accommodation, "Hotel Mandovi")
        );
        assert_eq!(
            classify("transport tips: auto-rickshaw"),
            LineKind::Section(Field::Transport, "auto-rickshaw")
        );
        assert_eq!(
            classify("- **Transport Tips:** prepaid taxi"),
            LineKind::Section(Field::Transport, "prepaid taxi")
        );
        assert_eq!(
            classify("Estimated Cost for Day 1: ₹1500"),
            LineKind::Cost(Some(1500.0))
        );
        assert_eq!(
            classify("Estimated Daily Cost (INR): ₹1500"),
            LineKind::Cost(Some(1500.0))
        );
    }

    #[test]
    fn test_qualified_labels_do_not_leak_into_evening() {
        let days = parse(
            "DAY 1\nEvening: Night market\nTransport Tips (local): take the bus\nAccommodation (3-star): Hotel Mandovi",
        );
        assert_eq!(days[0].evening, "Night market");
        assert_eq!(days[0].transport_tips, "take the bus");
        assert_eq!(days[0].accommodation_info, "Hotel Mandovi");
    }

    #[test]
    fn test_food_header_does_not_seed_content() {
        let mut builder = DayBuilder::new(1);
        builder.apply(classify("Morning: Beach walk"));
        builder.apply(classify("Food Recommendations: Try Thalassa"));
        assert_eq!(builder.cursor(), Some(Field::Food));
        builder.apply(classify("- Gunpowder - South Indian"));

        let record = builder.finish().unwrap();
        assert_eq!(record.food_recommendations, "- Gunpowder - South Indian");
    }

    #[test]
    fn test_lines_before_any_label_are_dropped() {
        let mut builder = DayBuilder::new(1);
        builder.apply(classify("2024-03-01"));
        builder.apply(classify("A relaxed start"));
        builder.apply(classify("Afternoon: Spice plantation"));

        let record = builder.finish().unwrap();
        assert_eq!(record.afternoon, "Spice plantation");
        assert!(record.morning.is_empty());
    }

    #[test]
    fn test_cost_on_following_line() {
        let mut builder = DayBuilder::new(1);
        builder.apply(classify("Evening: Night market"));
        builder.apply(classify("Estimated Daily Cost:"));
        builder.apply(classify("₹2,400 for two"));
        builder.apply(classify("Includes ₹500 gratuity"));

        let record = builder.finish().unwrap();
        assert_eq!(record.estimated_cost, 2400.0);
        assert_eq!(record.evening, "Night market");
    }

    #[test]
    fn test_rule_closes_section() {
        let mut builder = DayBuilder::new(1);
        builder.apply(classify("Evening: Night market"));
        builder.apply(classify("---"));
        builder.apply(classify("Enjoy your trip!"));
        assert_eq!(builder.cursor(), None);

        assert_eq!(builder.finish().unwrap().evening, "Night market");
    }

    #[test]
    fn test_relabel_replaces_previous_text() {
        let mut builder = DayBuilder::new(1);
        builder.apply(classify("Morning: first draft"));
        builder.apply(classify("Morning: Old Goa churches"));

        assert_eq!(builder.finish().unwrap().morning, "Old Goa churches");
    }

    #[test]
    fn test_split_day_blocks_discards_preamble() {
        let text = "Here is your trip!\nDAY 1: Arrival\nMorning: A\nDAY 2\nEvening: B";
        let blocks = split_day_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("Arrival"));
        assert!(blocks[1].contains("Evening: B"));
    }

    #[test]
    fn test_marker_line_can_carry_a_label() {
        let days = parse("DAY 1: Morning: Basilica of Bom Jesus");
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].morning, "Basilica of Bom Jesus");
    }

    #[test]
    fn test_accommodation_only_block_is_discarded() {
        let text = "DAY 1\nAccommodation: Hostel\nDAY 2\nEvening: Casino cruise";
        let days = parse(text);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].day, 1);
        assert_eq!(days[0].evening, "Casino cruise");
    }
}
