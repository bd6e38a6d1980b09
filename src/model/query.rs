/// Tables exposed by the catalog database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Artists,
    Paintings,
    Galleries,
    Genres,
    Eras,
    PaintingGenres,
}

impl Table {
    /// Table name as known to the database
    pub fn name(&self) -> &'static str {
        match self {
            Table::Artists => "artists",
            Table::Paintings => "paintings",
            Table::Galleries => "galleries",
            Table::Genres => "genres",
            Table::Eras => "eras",
            Table::PaintingGenres => "paintinggenres",
        }
    }

    pub fn primary_key(&self) -> &'static str {
        match self {
            Table::Artists => "artistId",
            Table::Paintings => "paintingId",
            Table::Galleries => "galleryId",
            Table::Genres => "genreId",
            Table::Eras => "eraId",
            Table::PaintingGenres => "paintingGenreId",
        }
    }

    /// Column on `self` that references the primary key of `target`.
    ///
    /// Only many-to-one relations are embeddable, so the foreign key always
    /// lives on the table being queried.
    pub fn foreign_key_to(&self, target: Table) -> Option<&'static str> {
        match (self, target) {
            (Table::Paintings, Table::Artists) => Some("artistId"),
            (Table::Paintings, Table::Galleries) => Some("galleryId"),
            (Table::Genres, Table::Eras) => Some("eraId"),
            (Table::PaintingGenres, Table::Paintings) => Some("paintingId"),
            (Table::PaintingGenres, Table::Genres) => Some("genreId"),
            _ => None,
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A column of the queried table, or of one of its embedded relations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRef {
    pub table: Option<Table>,
    pub name: &'static str,
}

impl ColumnRef {
    pub const fn own(name: &'static str) -> Self {
        Self { table: None, name }
    }

    pub const fn embedded(table: Table, name: &'static str) -> Self {
        Self {
            table: Some(table),
            name,
        }
    }
}

/// Related row nested under the parent row, keyed by the related table's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub table: Table,
    /// Projected columns of the related row; empty means every column
    pub columns: Vec<&'static str>,
    /// Inner embeds drop the parent row when no related row matches
    pub inner: bool,
}

impl Embed {
    pub fn all(table: Table) -> Self {
        Self {
            table,
            columns: Vec::new(),
            inner: false,
        }
    }

    pub fn columns(table: Table, columns: &[&'static str]) -> Self {
        Self {
            table,
            columns: columns.to_vec(),
            inner: false,
        }
    }

    pub fn inner(mut self) -> Self {
        self.inner = true;
        self
    }
}

/// One entry of the select list, in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    Column(&'static str),
    Embed(Embed),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Prefix,
    Contains,
}

/// Case-insensitive substring match. The needle is always matched literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePattern {
    pub kind: MatchKind,
    pub needle: String,
}

impl LikePattern {
    pub fn prefix(needle: impl Into<String>) -> Self {
        Self {
            kind: MatchKind::Prefix,
            needle: needle.into(),
        }
    }

    pub fn contains(needle: impl Into<String>) -> Self {
        Self {
            kind: MatchKind::Contains,
            needle: needle.into(),
        }
    }

    /// Render as a SQL `LIKE` pattern using `\` as the escape character.
    pub fn to_sql(&self) -> String {
        let mut escaped = String::with_capacity(self.needle.len() + 2);
        for c in self.needle.chars() {
            if matches!(c, '\\' | '%' | '_') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        match self.kind {
            MatchKind::Prefix => format!("{}%", escaped),
            MatchKind::Contains => format!("%{}%", escaped),
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        let value = value.to_lowercase();
        let needle = self.needle.to_lowercase();
        match self.kind {
            MatchKind::Prefix => value.starts_with(&needle),
            MatchKind::Contains => value.contains(&needle),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Equality against the column's text form
    Eq { column: ColumnRef, value: String },
    ILike { column: ColumnRef, pattern: LikePattern },
    Gte { column: ColumnRef, value: i64 },
    Lte { column: ColumnRef, value: i64 },
}

impl Predicate {
    pub fn column(&self) -> ColumnRef {
        match self {
            Predicate::Eq { column, .. }
            | Predicate::ILike { column, .. }
            | Predicate::Gte { column, .. }
            | Predicate::Lte { column, .. } => *column,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: ColumnRef,
    pub direction: Direction,
}

/// Declarative single-table select, optionally embedding related rows.
///
/// Column names only ever come from the fixed catalog vocabulary; values
/// supplied by callers travel inside predicates and are bound, never
/// interpolated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub table: Table,
    /// Empty projection selects every column of `table`
    pub projection: Vec<Projection>,
    pub predicates: Vec<Predicate>,
    pub order: Option<OrderBy>,
}

impl SelectQuery {
    pub fn from(table: Table) -> Self {
        Self {
            table,
            projection: Vec::new(),
            predicates: Vec::new(),
            order: None,
        }
    }

    pub fn select(mut self, projection: Vec<Projection>) -> Self {
        self.projection = projection;
        self
    }

    pub fn eq(mut self, column: ColumnRef, value: impl Into<String>) -> Self {
        self.predicates.push(Predicate::Eq {
            column,
            value: value.into(),
        });
        self
    }

    pub fn ilike(mut self, column: ColumnRef, pattern: LikePattern) -> Self {
        self.predicates.push(Predicate::ILike { column, pattern });
        self
    }

    pub fn gte(mut self, column: ColumnRef, value: i64) -> Self {
        self.predicates.push(Predicate::Gte { column, value });
        self
    }

    pub fn lte(mut self, column: ColumnRef, value: i64) -> Self {
        self.predicates.push(Predicate::Lte { column, value });
        self
    }

    pub fn order(mut self, column: ColumnRef, direction: Direction) -> Self {
        self.order = Some(OrderBy { column, direction });
        self
    }

    pub fn embeds(&self) -> impl Iterator<Item = &Embed> {
        self.projection.iter().filter_map(|p| match p {
            Projection::Embed(embed) => Some(embed),
            Projection::Column(_) => None,
        })
    }

    pub fn embed(&self, table: Table) -> Option<&Embed> {
        self.embeds().find(|embed| embed.table == table)
    }
}
