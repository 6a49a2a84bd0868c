//! Field catalog and typed range bounds.
//!
//! Indexes are built elsewhere, so nothing here assumes field names: the
//! catalog is derived from whatever schema an index carries.

use chrono::NaiveDate;
use tantivy::schema::{Field, FieldEntry, FieldType, Schema, Value};
use tantivy::{DateTime, TantivyDocument, Term};

/// Field handles for one index schema.
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    schema: Schema,
    /// Indexed text fields the query parser searches by default
    text_fields: Vec<Field>,
    /// Stored fields returned with every hit
    stored_fields: Vec<(Field, String)>,
}

impl FieldCatalog {
    /// Build the catalog, rejecting schemas with nothing to search.
    pub fn from_schema(schema: Schema) -> Result<Self, String> {
        let mut tokenized = Vec::new();
        let mut raw = Vec::new();
        let mut stored_fields = Vec::new();

        for (field, entry) in schema.fields() {
            if let FieldType::Str(options) = entry.field_type() {
                match options.get_indexing_options() {
                    Some(indexing) if indexing.tokenizer() == "raw" => raw.push(field),
                    Some(_) => tokenized.push(field),
                    None => {}
                }
            }
            if entry.is_stored() {
                stored_fields.push((field, entry.name().to_string()));
            }
        }

        // Untokenized strings are only searched by default when there is
        // nothing else; otherwise they stay reachable as `field:value`.
        let text_fields = if tokenized.is_empty() { raw } else { tokenized };
        if text_fields.is_empty() {
            return Err("schema has no indexed text fields".to_string());
        }

        Ok(Self {
            schema,
            text_fields,
            stored_fields,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn text_fields(&self) -> &[Field] {
        &self.text_fields
    }

    pub fn stored_fields(&self) -> &[(Field, String)] {
        &self.stored_fields
    }

    /// Look a field up by name.
    pub fn field(&self, name: &str) -> Option<(Field, &FieldEntry)> {
        let field = self.schema.get_field(name).ok()?;
        Some((field, self.schema.get_field_entry(field)))
    }

    /// Stored values of a document as display strings, keyed by field name.
    pub fn stored_values(&self, doc: &TantivyDocument) -> Vec<(String, String)> {
        self.stored_fields
            .iter()
            .filter_map(|(field, name)| {
                let text = doc
                    .get_all(*field)
                    .filter_map(display_value)
                    .collect::<Vec<_>>();
                if text.is_empty() {
                    None
                } else {
                    Some((name.clone(), text.join(" ")))
                }
            })
            .collect()
    }
}

/// Render a stored value for the hit record.
pub(crate) fn display_value<'a, V: Value<'a>>(value: V) -> Option<String> {
    if let Some(s) = value.as_str() {
        return Some(s.to_string());
    }
    if let Some(n) = value.as_u64() {
        return Some(n.to_string());
    }
    if let Some(n) = value.as_i64() {
        return Some(n.to_string());
    }
    if let Some(n) = value.as_f64() {
        return Some(n.to_string());
    }
    if let Some(b) = value.as_bool() {
        return Some(b.to_string());
    }
    if let Some(dt) = value.as_datetime() {
        let secs = dt.into_timestamp_secs();
        return chrono::DateTime::from_timestamp(secs, 0).map(|d| d.to_rfc3339());
    }
    None
}

/// A range bound parsed according to the field's type.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum BoundValue {
    Text(String),
    U64(u64),
    I64(i64),
    F64(f64),
    Bool(bool),
    Date(DateTime),
}

impl BoundValue {
    /// Parse `raw` for a field of the given type.
    ///
    /// Dates accept RFC 3339 timestamps or plain `YYYY-MM-DD` (midnight UTC).
    /// Bounds on tokenized text fields are lowercased to match indexed terms.
    pub fn parse(entry: &FieldEntry, raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        match entry.field_type() {
            FieldType::Str(options) => {
                let tokenized = options
                    .get_indexing_options()
                    .is_some_and(|indexing| indexing.tokenizer() != "raw");
                if tokenized {
                    Ok(BoundValue::Text(raw.to_lowercase()))
                } else {
                    Ok(BoundValue::Text(raw.to_string()))
                }
            }
            FieldType::U64(_) => raw
                .parse()
                .map(BoundValue::U64)
                .map_err(|e| format!("'{}' is not an unsigned integer: {}", raw, e)),
            FieldType::I64(_) => raw
                .parse()
                .map(BoundValue::I64)
                .map_err(|e| format!("'{}' is not an integer: {}", raw, e)),
            FieldType::F64(_) => raw
                .parse()
                .map(BoundValue::F64)
                .map_err(|e| format!("'{}' is not a number: {}", raw, e)),
            FieldType::Bool(_) => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(BoundValue::Bool(true)),
                "false" | "0" => Ok(BoundValue::Bool(false)),
                _ => Err(format!("'{}' is not a boolean", raw)),
            },
            FieldType::Date(_) => parse_date(raw).map(BoundValue::Date),
            other => Err(format!(
                "range limits are not supported on {:?} fields",
                other.value_type()
            )),
        }
    }

    pub fn to_term(&self, field: Field) -> Term {
        match self {
            BoundValue::Text(s) => Term::from_field_text(field, s),
            BoundValue::U64(n) => Term::from_field_u64(field, *n),
            BoundValue::I64(n) => Term::from_field_i64(field, *n),
            BoundValue::F64(n) => Term::from_field_f64(field, *n),
            BoundValue::Bool(b) => Term::from_field_bool(field, *b),
            BoundValue::Date(dt) => Term::from_field_date(field, *dt),
        }
    }
}

fn parse_date(raw: &str) -> Result<DateTime, String> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(DateTime::from_timestamp_secs(dt.timestamp()));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| DateTime::from_timestamp_secs(d.and_utc().timestamp()))
        .ok_or_else(|| format!("'{}' is not an RFC 3339 date", raw))
}
