//! Heuristic complexity tiers for raw SQL text.
//!
//! The score is a weighted count of clause keywords, aggregate and window
//! functions, logical connectives and query length. It is a lexical
//! estimate only; nothing here parses the query.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Highest score still considered easy.
pub const EASY_MAX: u32 = 3;
/// Highest score still considered medium.
pub const MEDIUM_MAX: u32 = 7;
/// Every this many whitespace-separated words add one point.
pub const WORDS_PER_POINT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Hardness {
    Easy,
    Medium,
    Hard,
}

impl Hardness {
    /// Tiers in reporting order.
    pub const ALL: [Hardness; 3] = [Hardness::Easy, Hardness::Medium, Hardness::Hard];

    pub fn from_score(score: u32) -> Self {
        match score {
            0..=EASY_MAX => Hardness::Easy,
            s if s <= MEDIUM_MAX => Hardness::Medium,
            _ => Hardness::Hard,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Hardness::Easy => "Easy",
            Hardness::Medium => "Medium",
            Hardness::Hard => "Hard",
        }
    }

    /// Lower-case form used in file names.
    pub fn slug(&self) -> &'static str {
        match self {
            Hardness::Easy => "easy",
            Hardness::Medium => "medium",
            Hardness::Hard => "hard",
        }
    }
}

impl fmt::Display for Hardness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

struct Rule {
    name: &'static str,
    pattern: Regex,
    weight: u32,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, weight: u32) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("complexity pattern must compile"),
            weight,
        }
    }
}

// Patterns run against lower-cased text. `.` stops at line breaks, so the
// nested-select rule matches at most once per line.
static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new("join", r"\bjoin\b", 2),
        Rule::new("where", r"\bwhere\b", 1),
        Rule::new("group by", r"\bgroup by\b", 1),
        Rule::new("order by", r"\border by\b", 1),
        Rule::new("having", r"\bhaving\b", 1),
        Rule::new("union", r"\bunion\b", 2),
        Rule::new("intersect", r"\bintersect\b", 2),
        Rule::new("except", r"\bexcept\b", 2),
        Rule::new("distinct", r"\bdistinct\b", 1),
        Rule::new(
            "aggregate",
            r"\b(avg|count|min|max|sum|variance|stddev)\b",
            1,
        ),
        Rule::new(
            "nested select",
            r"\bselect\b.*\bfrom\b.*\bwhere\b.*\b(select\b.*\bfrom\b)",
            3,
        ),
        Rule::new(
            "advanced function",
            r"\b(case|cast|coalesce|decode|rank|dense_rank|row_number|ntile)\b",
            1,
        ),
        Rule::new("logical operator", r"\b(and|or)\b", 1),
    ]
});

/// Per-rule contributions to a complexity score.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub contributions: Vec<(&'static str, u32)>,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.contributions.iter().map(|(_, points)| points).sum()
    }
}

/// Scores `sql`, listing every rule that added points.
pub fn score_breakdown(sql: &str) -> ScoreBreakdown {
    let lowered = sql.to_lowercase();
    let mut contributions = Vec::new();
    for rule in RULES.iter() {
        let hits = rule.pattern.find_iter(&lowered).count() as u32;
        if hits > 0 {
            contributions.push((rule.name, hits * rule.weight));
        }
    }
    let length_points = (lowered.split_whitespace().count() / WORDS_PER_POINT) as u32;
    if length_points > 0 {
        contributions.push(("length", length_points));
    }
    ScoreBreakdown { contributions }
}

pub fn complexity_score(sql: &str) -> u32 {
    score_breakdown(sql).total()
}

/// Assigns the hardness tier of a raw SQL query.
pub fn classify(sql: &str) -> Hardness {
    let breakdown = score_breakdown(sql);
    let score = breakdown.total();
    let tier = Hardness::from_score(score);
    tracing::trace!(score, %tier, contributions = ?breakdown.contributions, "classified query");
    tier
}
