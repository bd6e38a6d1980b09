use serde::Serialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::{ColumnRef, Direction, Embed, Predicate, Projection, SelectQuery, Table};
use crate::store::traits::{CatalogStore, StoreError};

type Row = Map<String, Value>;

/// In-process catalog used in place of PostgreSQL.
///
/// Evaluates `SelectQuery` with the same semantics as the SQL rendering:
/// many-to-one embeds, inner embeds dropping unmatched rows, equality on the
/// text form of a column, stable ordering with nulls last when ascending.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tables: HashMap<Table, Vec<Row>>,
    failure: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every query fails with `message`
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            tables: HashMap::new(),
            failure: Some(message.into()),
        }
    }

    /// Append rows to `table`; each row must serialize to a JSON object
    pub fn with_rows<T, I>(mut self, table: Table, rows: I) -> Result<Self, StoreError>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        let entries = self.tables.entry(table).or_default();
        for row in rows {
            match serde_json::to_value(row) {
                Ok(Value::Object(object)) => entries.push(object),
                Ok(other) => {
                    return Err(StoreError::Rejected(format!(
                        "Row for {} is not an object: {}",
                        table, other
                    )))
                }
                Err(e) => return Err(StoreError::Rejected(e.to_string())),
            }
        }
        Ok(self)
    }

    fn rows(&self, table: Table) -> &[Row] {
        self.tables.get(&table).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Related row of `embed` for `base`, looked up through the foreign key
    fn related<'a>(&'a self, query: &SelectQuery, embed: &Embed, base: &Row) -> Result<Option<&'a Row>, StoreError> {
        let foreign_key = query.table.foreign_key_to(embed.table).ok_or_else(|| {
            StoreError::Rejected(format!(
                "No relationship between {} and {}",
                query.table, embed.table
            ))
        })?;
        let Some(key) = base.get(foreign_key).filter(|v| !v.is_null()) else {
            return Ok(None);
        };
        let primary_key = embed.table.primary_key();
        Ok(self
            .rows(embed.table)
            .iter()
            .find(|row| row.get(primary_key) == Some(key)))
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemoryStore {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, StoreError> {
        if let Some(message) = &self.failure {
            return Err(StoreError::Rejected(message.clone()));
        }

        let mut matched: Vec<Joined> = Vec::new();
        'rows: for base in self.rows(query.table) {
            let mut joined = Joined {
                base,
                related: Vec::new(),
            };
            for embed in query.embeds() {
                let related = self.related(query, embed, base)?;
                if embed.inner && related.is_none() {
                    continue 'rows;
                }
                joined.related.push((embed.table, related));
            }

            for predicate in &query.predicates {
                let value = joined.value(predicate.column())?;
                if !evaluate(predicate, value) {
                    continue 'rows;
                }
            }
            matched.push(joined);
        }

        if let Some(order) = query.order {
            // Resolve keys up front so a bad column surfaces as an error
            let mut keyed = Vec::with_capacity(matched.len());
            for joined in matched {
                let key = joined.value(order.column)?.cloned();
                keyed.push((key, joined));
            }
            keyed.sort_by(|(a, _), (b, _)| {
                let ordering = compare(a.as_ref(), b.as_ref());
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
            matched = keyed.into_iter().map(|(_, joined)| joined).collect();
        }

        Ok(matched
            .iter()
            .map(|joined| joined.project(&query.projection))
            .collect())
    }
}

/// A base row together with its embedded rows, in projection order
struct Joined<'a> {
    base: &'a Row,
    related: Vec<(Table, Option<&'a Row>)>,
}

impl<'a> Joined<'a> {
    fn value(&self, column: ColumnRef) -> Result<Option<&'a Value>, StoreError> {
        match column.table {
            None => Ok(self.base.get(column.name)),
            Some(table) => {
                let (_, row) = self
                    .related
                    .iter()
                    .find(|(t, _)| *t == table)
                    .ok_or_else(|| StoreError::Rejected(format!("{} is not embedded in the query", table)))?;
                Ok(row.and_then(|row| row.get(column.name)))
            }
        }
    }

    fn project(&self, projection: &[Projection]) -> Value {
        if projection.is_empty() {
            return Value::Object(self.base.clone());
        }

        let mut out = Map::new();
        for item in projection {
            match item {
                Projection::Column(name) => {
                    let value = self.base.get(*name).cloned().unwrap_or(Value::Null);
                    out.insert(name.to_string(), value);
                }
                Projection::Embed(embed) => {
                    let related = self
                        .related
                        .iter()
                        .find(|(t, _)| *t == embed.table)
                        .and_then(|(_, row)| *row);
                    let value = match related {
                        Some(row) => Value::Object(select_columns(row, &embed.columns)),
                        None => Value::Null,
                    };
                    out.insert(embed.table.name().to_string(), value);
                }
            }
        }
        Value::Object(out)
    }
}

fn select_columns(row: &Row, columns: &[&'static str]) -> Row {
    if columns.is_empty() {
        return row.clone();
    }
    columns
        .iter()
        .map(|name| (name.to_string(), row.get(*name).cloned().unwrap_or(Value::Null)))
        .collect()
}

fn text_form(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn evaluate(predicate: &Predicate, value: Option<&Value>) -> bool {
    let Some(value) = value else {
        return false;
    };
    match predicate {
        Predicate::Eq { value: expected, .. } => text_form(value).as_deref() == Some(expected.as_str()),
        Predicate::ILike { pattern, .. } => text_form(value).is_some_and(|text| pattern.matches(&text)),
        Predicate::Gte { value: bound, .. } => value.as_f64().is_some_and(|v| v >= *bound as f64),
        Predicate::Lte { value: bound, .. } => value.as_f64().is_some_and(|v| v <= *bound as f64),
    }
}

/// Ascending order with nulls (and missing values) last
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => text_form(a).cmp(&text_form(b)),
        },
    }
}
