//! Deck-list line parser
//!
//! One line of an exported deck list looks like
//!
//! ```text
//! 1x Example Card (set) 123 *F* [Example category] ^Buy,#0066ff^
//! ```
//!
//! Everything but the name is optional. The count must lead the line; the
//! other decorations may appear in any order.

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_till, take_till1},
    character::complete::{anychar, char, digit1, multispace0, multispace1, one_of, satisfy},
    combinator::{all_consuming, map, map_res, opt, recognize, value},
    multi::many0,
    sequence::{delimited, pair, terminated, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};

/// Where a deck-list entry goes when the deck is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckSection {
    Library,
    Commander,
    Attraction,
    Sticker,
}

/// One parsed deck-list line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collector_number: Option<String>,
    #[serde(default)]
    pub foil: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_tag: Option<String>,
}

impl CardLine {
    /// Number of copies; a line without a count means one copy
    pub fn copies(&self) -> u32 {
        self.count.unwrap_or(1)
    }

    pub fn section(&self) -> DeckSection {
        let has = |cat: &str| self.categories.iter().any(|c| c.eq_ignore_ascii_case(cat));
        if has("Commander{top}") {
            DeckSection::Commander
        } else if has("Attraction{noDeck}") {
            DeckSection::Attraction
        } else if has("Sticker{noDeck}") {
            DeckSection::Sticker
        } else {
            DeckSection::Library
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment<'a> {
    ColorTag(&'a str),
    Categories(&'a str),
    Set(&'a str),
    Foil,
    Text(&'a str),
}

/// "<n> ", "<n>x ", "<n> x "
fn count_prefix(input: &str) -> IResult<&str, u32> {
    delimited(
        multispace0,
        map_res(digit1, |s: &str| s.parse::<u32>()),
        alt((
            recognize(tuple((multispace0, one_of("xX"), multispace1))),
            multispace1,
        )),
    )(input)
}

fn segment(input: &str) -> IResult<&str, Segment<'_>> {
    alt((
        map(delimited(char('^'), take_till(|c| c == '^'), char('^')), Segment::ColorTag),
        map(delimited(char('['), take_till1(|c| c == ']'), char(']')), Segment::Categories),
        map(delimited(char('('), take_till1(|c| c == ')'), char(')')), Segment::Set),
        value(Segment::Foil, tag_no_case("*F*")),
        // At least one char so a stray '(' or '*' is kept as text
        map(
            recognize(pair(anychar, take_till(|c| matches!(c, '^' | '[' | '(' | '*')))),
            Segment::Text,
        ),
    ))(input)
}

fn is_collector_number(token: &str) -> bool {
    let parsed: IResult<&str, &str> = all_consuming(recognize(terminated(
        digit1,
        opt(satisfy(|c| c.is_ascii_alphabetic())),
    )))(token);
    parsed.is_ok()
}

/// Parse one deck-list line. Never fails; unparseable decorations stay in
/// the name.
pub fn parse_card_line(line: &str) -> CardLine {
    let line = line.trim();
    let (rest, count) = match count_prefix(line) {
        Ok((rest, count)) => (rest, Some(count)),
        Err(_) => (line, None),
    };

    let segments = match many0(segment)(rest) {
        Ok((_, segments)) => segments,
        Err(_) => vec![Segment::Text(rest)],
    };

    let mut result = CardLine {
        count,
        ..CardLine::default()
    };

    // Only the last (...) is the set; earlier ones belong to the name
    let last_set = segments.iter().rposition(|s| matches!(s, Segment::Set(_)));
    let mut text = String::new();
    for (idx, seg) in segments.iter().enumerate() {
        match seg {
            Segment::ColorTag(tag) => result.color_tag = Some(tag.trim().to_string()),
            Segment::Categories(inner) => result.categories.extend(
                inner
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string),
            ),
            Segment::Foil => result.foil = true,
            Segment::Set(set) if Some(idx) == last_set => result.set = Some(set.trim().to_string()),
            Segment::Set(set) => {
                text.push('(');
                text.push_str(set);
                text.push(')');
            }
            Segment::Text(t) => text.push_str(t),
        }
        text.push(' ');
    }

    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() > 1 && tokens.last().is_some_and(|t| is_collector_number(t)) {
        result.collector_number = tokens.pop().map(str::to_string);
    }
    result.name = tokens.join(" ");
    result
}

/// Parse a whole deck list, skipping blank lines and `#` / `//` comments
pub fn parse_deck_list(content: &str) -> Vec<CardLine> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("//"))
        .map(parse_card_line)
        .filter(|line| !line.name.is_empty())
        .collect()
}
