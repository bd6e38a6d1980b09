use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};

use crate::model::{ColumnRef, Direction, Embed, Predicate, Projection, SelectQuery, Table};
use crate::store::traits::{CatalogStore, StoreError};

const BASE_ALIAS: &str = "t0";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl CatalogStore for PostgresStore {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, StoreError> {
        let rendered = render(query)?;
        log::debug!("{}", rendered.sql);

        let mut statement = sqlx::query_scalar::<_, Json<Value>>(&rendered.sql);
        for bind in rendered.binds {
            statement = match bind {
                BindValue::Text(text) => statement.bind(text),
                BindValue::Int(int) => statement.bind(int),
            };
        }

        let rows = statement.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|Json(row)| row).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    Int(i64),
}

/// SQL text plus the values bound to its `$n` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedQuery {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

/// Render a select as one JSON value per row.
///
/// Embeds become joins on the foreign key (`INNER JOIN` for inner embeds,
/// `LEFT JOIN` otherwise) and are nested with `json_build_object`, so the
/// row shape matches what handlers send back to clients.
pub fn render(query: &SelectQuery) -> Result<RenderedQuery, StoreError> {
    let aliases: Vec<(Table, String)> = query
        .embeds()
        .enumerate()
        .map(|(i, embed)| (embed.table, format!("t{}", i + 1)))
        .collect();
    let alias_of = |table: Table| -> Result<String, StoreError> {
        aliases
            .iter()
            .find(|(t, _)| *t == table)
            .map(|(_, alias)| alias.clone())
            .ok_or_else(|| {
                StoreError::Rejected(format!(
                    "{} is not embedded in the query on {}",
                    table, query.table
                ))
            })
    };
    let column = |col: ColumnRef| -> Result<String, StoreError> {
        let alias = match col.table {
            Some(table) => alias_of(table)?,
            None => BASE_ALIAS.to_string(),
        };
        Ok(format!("{}.{}", alias, quote(col.name)))
    };

    let select = if query.projection.is_empty() {
        format!("row_to_json({})", BASE_ALIAS)
    } else {
        let mut fields = Vec::with_capacity(query.projection.len());
        for projection in &query.projection {
            match projection {
                Projection::Column(name) => fields.push(format!(
                    "{}, {}.{}",
                    literal(name),
                    BASE_ALIAS,
                    quote(name)
                )),
                Projection::Embed(embed) => fields.push(format!(
                    "{}, {}",
                    literal(embed.table.name()),
                    embed_object(embed, &alias_of(embed.table)?)
                )),
            }
        }
        format!("json_build_object({})", fields.join(", "))
    };

    let mut sql = format!(
        "SELECT {} FROM {} {}",
        select,
        quote(query.table.name()),
        BASE_ALIAS
    );

    for embed in query.embeds() {
        let foreign_key = query.table.foreign_key_to(embed.table).ok_or_else(|| {
            StoreError::Rejected(format!(
                "No relationship between {} and {}",
                query.table, embed.table
            ))
        })?;
        let alias = alias_of(embed.table)?;
        sql.push_str(&format!(
            " {} JOIN {} {} ON {}.{} = {}.{}",
            if embed.inner { "INNER" } else { "LEFT" },
            quote(embed.table.name()),
            alias,
            alias,
            quote(embed.table.primary_key()),
            BASE_ALIAS,
            quote(foreign_key)
        ));
    }

    let mut binds = Vec::with_capacity(query.predicates.len());
    let mut conditions = Vec::with_capacity(query.predicates.len());
    for predicate in &query.predicates {
        let target = column(predicate.column())?;
        let placeholder = binds.len() + 1;
        match predicate {
            Predicate::Eq { value, .. } => {
                conditions.push(format!("{}::text = ${}", target, placeholder));
                binds.push(BindValue::Text(value.clone()));
            }
            Predicate::ILike { pattern, .. } => {
                conditions.push(format!("{}::text ILIKE ${} ESCAPE '\\'", target, placeholder));
                binds.push(BindValue::Text(pattern.to_sql()));
            }
            Predicate::Gte { value, .. } => {
                conditions.push(format!("{} >= ${}", target, placeholder));
                binds.push(BindValue::Int(*value));
            }
            Predicate::Lte { value, .. } => {
                conditions.push(format!("{} <= ${}", target, placeholder));
                binds.push(BindValue::Int(*value));
            }
        }
    }
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    if let Some(order) = query.order {
        sql.push_str(&format!(
            " ORDER BY {} {}",
            column(order.column)?,
            match order.direction {
                Direction::Ascending => "ASC",
                Direction::Descending => "DESC",
            }
        ));
    }

    Ok(RenderedQuery { sql, binds })
}

fn embed_object(embed: &Embed, alias: &str) -> String {
    let object = if embed.columns.is_empty() {
        format!("row_to_json({})", alias)
    } else {
        let fields: Vec<String> = embed
            .columns
            .iter()
            .map(|name| format!("{}, {}.{}", literal(name), alias, quote(name)))
            .collect();
        format!("json_build_object({})", fields.join(", "))
    };

    // A LEFT JOIN miss yields NULL rather than an object of NULLs
    format!(
        "CASE WHEN {}.{} IS NULL THEN NULL ELSE {} END",
        alias,
        quote(embed.table.primary_key()),
        object
    )
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LikePattern, MatchKind};

    #[test]
    fn test_render_whole_table() {
        let rendered = render(&SelectQuery::from(Table::Eras)).unwrap();
        assert_eq!(rendered.sql, "SELECT row_to_json(t0) FROM \"eras\" t0");
        assert!(rendered.binds.is_empty());
    }

    #[test]
    fn test_render_binds_user_values() {
        let query = SelectQuery::from(Table::Artists)
            .ilike(ColumnRef::own("lastName"), LikePattern::prefix("O'Ke"))
            .order(ColumnRef::own("lastName"), Direction::Ascending);
        let rendered = render(&query).unwrap();

        assert_eq!(
            rendered.sql,
            "SELECT row_to_json(t0) FROM \"artists\" t0 \
             WHERE t0.\"lastName\"::text ILIKE $1 ESCAPE '\\' \
             ORDER BY t0.\"lastName\" ASC"
        );
        assert_eq!(rendered.binds, vec![BindValue::Text("O'Ke%".to_string())]);
    }

    #[test]
    fn test_render_identifier_compares_as_text() {
        let query = SelectQuery::from(Table::Galleries).eq(ColumnRef::own("galleryId"), "abc");
        let rendered = render(&query).unwrap();

        assert!(rendered.sql.ends_with("WHERE t0.\"galleryId\"::text = $1"));
        assert_eq!(rendered.binds, vec![BindValue::Text("abc".to_string())]);
    }

    #[test]
    fn test_render_embeds_and_range() {
        let query = SelectQuery::from(Table::Paintings)
            .select(vec![
                Projection::Column("paintingId"),
                Projection::Embed(Embed::all(Table::Artists)),
                Projection::Embed(Embed::columns(Table::Galleries, &["galleryName"]).inner()),
            ])
            .gte(ColumnRef::own("yearOfWork"), 1850)
            .lte(ColumnRef::own("yearOfWork"), 1900)
            .order(ColumnRef::own("yearOfWork"), Direction::Descending);
        let rendered = render(&query).unwrap();

        assert!(rendered.sql.starts_with(
            "SELECT json_build_object('paintingId', t0.\"paintingId\", \
             'artists', CASE WHEN t1.\"artistId\" IS NULL THEN NULL ELSE row_to_json(t1) END, \
             'galleries', CASE WHEN t2.\"galleryId\" IS NULL THEN NULL \
             ELSE json_build_object('galleryName', t2.\"galleryName\") END)"
        ));
        assert!(rendered
            .sql
            .contains("LEFT JOIN \"artists\" t1 ON t1.\"artistId\" = t0.\"artistId\""));
        assert!(rendered
            .sql
            .contains("INNER JOIN \"galleries\" t2 ON t2.\"galleryId\" = t0.\"galleryId\""));
        assert!(rendered
            .sql
            .ends_with("WHERE t0.\"yearOfWork\" >= $1 AND t0.\"yearOfWork\" <= $2 ORDER BY t0.\"yearOfWork\" DESC"));
        assert_eq!(rendered.binds, vec![BindValue::Int(1850), BindValue::Int(1900)]);
    }

    #[test]
    fn test_render_orders_by_embedded_column() {
        let query = SelectQuery::from(Table::PaintingGenres)
            .select(vec![Projection::Embed(Embed::columns(Table::Genres, &["genreName"]))])
            .eq(ColumnRef::own("paintingId"), "5")
            .order(ColumnRef::embedded(Table::Genres, "genreName"), Direction::Ascending);
        let rendered = render(&query).unwrap();

        assert!(rendered.sql.ends_with("ORDER BY t1.\"genreName\" ASC"));
    }

    #[test]
    fn test_render_rejects_unembedded_filter() {
        let query = SelectQuery::from(Table::Paintings).ilike(
            ColumnRef::embedded(Table::Artists, "nationality"),
            LikePattern {
                kind: MatchKind::Prefix,
                needle: "Fr".to_string(),
            },
        );
        assert!(matches!(render(&query), Err(StoreError::Rejected(_))));
    }

    #[test]
    fn test_render_rejects_unrelated_embed() {
        let query = SelectQuery::from(Table::Artists)
            .select(vec![Projection::Embed(Embed::all(Table::Paintings))]);
        assert!(matches!(render(&query), Err(StoreError::Rejected(_))));
    }
}
