//! Rank schemes and query term extraction.
//!
//! An index builder can ask, through the commit payload stored with the
//! index, for ranking that ignores how often and in how long a document
//! a term occurs. The scheme is read once when the index is opened.

use tantivy::query::{BooleanQuery, ConstScoreQuery, Occur, Query, TermQuery};
use tantivy::schema::IndexRecordOption;
use tantivy::Term;

/// Payload property selecting [`RankScheme::TermPresence`].
pub const IGNORE_WORD_COUNT_PROPERTY: &str = "ignore_total_word_count_when_ranking";

/// How hits are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankScheme {
    /// Tantivy's BM25
    #[default]
    Bm25,
    /// One point per distinct query term present in the document
    TermPresence,
}

impl RankScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankScheme::Bm25 => "bm25",
            RankScheme::TermPresence => "term_presence",
        }
    }

    /// Pick the scheme from an index's commit payload (a JSON object).
    ///
    /// Missing or malformed payloads leave the default.
    pub fn from_payload(payload: Option<&str>) -> Self {
        let Some(payload) = payload else {
            return RankScheme::Bm25;
        };
        let Ok(serde_json::Value::Object(properties)) = serde_json::from_str(payload) else {
            return RankScheme::Bm25;
        };
        match properties.get(IGNORE_WORD_COUNT_PROPERTY) {
            Some(value) if is_truthy(value) => RankScheme::TermPresence,
            _ => RankScheme::Bm25,
        }
    }

    /// Wrap a parsed query so it scores under this scheme.
    ///
    /// The parsed query still decides which documents match.
    pub fn scoring_query(&self, parsed: Box<dyn Query>, terms: &[Term]) -> Box<dyn Query> {
        match self {
            RankScheme::Bm25 => parsed,
            RankScheme::TermPresence => {
                let mut clauses: Vec<(Occur, Box<dyn Query>)> =
                    vec![(Occur::Must, Box::new(ConstScoreQuery::new(parsed, 0.0)))];

                for text in term_texts(terms) {
                    let per_field: Vec<(Occur, Box<dyn Query>)> = terms
                        .iter()
                        .filter(|t| t.value().as_str() == Some(text.as_str()))
                        .map(|t| {
                            (
                                Occur::Should,
                                Box::new(TermQuery::new(t.clone(), IndexRecordOption::Basic))
                                    as Box<dyn Query>,
                            )
                        })
                        .collect();
                    let any_field = BooleanQuery::new(per_field);
                    clauses.push((
                        Occur::Should,
                        Box::new(ConstScoreQuery::new(Box::new(any_field), 1.0)),
                    ));
                }

                Box::new(BooleanQuery::new(clauses))
            }
        }
    }
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::String(s) => {
            matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
        }
        _ => false,
    }
}

/// Distinct terms of a parsed query, in query order.
pub fn query_terms(query: &dyn Query) -> Vec<Term> {
    let mut terms: Vec<Term> = Vec::new();
    query.query_terms(&mut |term, _| {
        if !terms.contains(term) {
            terms.push(term.clone());
        }
    });
    terms
}

/// Distinct text values of `terms`, in order. Non-text terms are skipped.
pub fn term_texts(terms: &[Term]) -> Vec<String> {
    let mut texts: Vec<String> = Vec::new();
    for term in terms {
        if let Some(text) = term.value().as_str() {
            if !texts.iter().any(|t| t == text) {
                texts.push(text.to_string());
            }
        }
    }
    texts
}
