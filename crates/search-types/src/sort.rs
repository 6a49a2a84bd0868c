//! Sort specification parsing.
//!
//! A sort spec is a whitespace separated list of `field direction` pairs,
//! e.g. `"rank desc title asc"`. Parsing is purely textual; whether a field
//! can actually be sorted on is up to the index engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pseudo-field naming the engine's relevance score.
pub const RANK_FIELD: &str = "rank";

/// Sort direction for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Parse a direction keyword (case-insensitive), None if unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown sort direction: {}", s))
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (field, direction) entry of a resolved ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Whether this key orders by relevance score.
    pub fn is_rank(&self) -> bool {
        self.field == RANK_FIELD
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction)
    }
}

/// Parse a sort spec into ordered keys.
///
/// Tokens are consumed in pairs. The second token of a pair is the
/// direction; when it is missing or not `asc`/`desc` the key sorts
/// ascending. Repeated fields are kept as given.
pub fn parse_sort_spec(spec: &str) -> Vec<SortKey> {
    let mut tokens = spec.split_whitespace();
    let mut keys = Vec::new();

    while let Some(field) = tokens.next() {
        let direction = tokens
            .next()
            .and_then(SortDirection::parse)
            .unwrap_or_default();
        keys.push(SortKey::new(field, direction));
    }

    keys
}

/// Render keys back into the spec grammar.
pub fn format_sort_spec(keys: &[SortKey]) -> String {
    keys.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordering used when the caller gives none: `rank desc`.
pub fn default_order() -> Vec<SortKey> {
    vec![SortKey::desc(RANK_FIELD)]
}

/// Parse an optional spec, falling back to [`default_order`] when absent
/// or empty.
pub fn resolve_order(spec: Option<&str>) -> Vec<SortKey> {
    let keys = spec.map(parse_sort_spec).unwrap_or_default();
    if keys.is_empty() {
        default_order()
    } else {
        keys
    }
}
