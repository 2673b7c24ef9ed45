//! Parameterized `WHERE` clauses and paginated listing.
//!
//! Every value, search terms included, travels as a bind parameter. Search
//! terms are matched with `ILIKE` after escaping the pattern metacharacters,
//! so a client typing `50%` looks for a literal percent sign.

use model::{ListRequest, Page};
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, Row};

use crate::RepositoryError;

type Param = Box<dyn ToSql + Sync + Send>;

/// Accumulates `AND`-joined conditions together with their bind values.
#[derive(Default)]
pub struct ListFilter {
    conditions: Vec<String>,
    params: Vec<Param>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to rows that are not soft-deleted.
    pub fn live(mut self) -> Self {
        self.conditions.push("deleted_at IS NULL".to_string());
        self
    }

    /// Case-insensitive substring match of `term` against any of `columns`.
    /// A missing term or an empty column list adds nothing.
    pub fn search(mut self, columns: &[&str], term: Option<&str>) -> Self {
        let Some(term) = term else {
            return self;
        };
        if columns.is_empty() {
            return self;
        }
        let placeholder = self.bind(like_pattern(term));
        let matches: Vec<String> = columns
            .iter()
            .map(|column| format!(r"{column} ILIKE {placeholder} ESCAPE '\'"))
            .collect();
        self.conditions.push(format!("({})", matches.join(" OR ")));
        self
    }

    /// Exact match on `column` when `value` is present.
    pub fn eq<T>(mut self, column: &str, value: Option<T>) -> Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        if let Some(value) = value {
            let placeholder = self.bind(value);
            self.conditions.push(format!("{column} = {placeholder}"));
        }
        self
    }

    /// `WHERE ...` text, or an empty string when there is nothing to filter.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    fn bind<T>(&mut self, value: T) -> String
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.params.push(Box::new(value));
        format!("${}", self.params.len())
    }

    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }

    /// Page query: filtered rows plus `total_count` from a window function,
    /// limit and offset bound after the filter parameters.
    pub fn page_sql(&self, columns: &str, table: &str, order_by: &str) -> String {
        let n = self.params.len();
        format!(
            "SELECT {columns}, count(*) OVER () AS total_count FROM {table}{} ORDER BY {order_by} LIMIT ${} OFFSET ${}",
            self.where_clause(),
            n + 1,
            n + 2
        )
    }

    pub fn count_sql(&self, table: &str) -> String {
        format!("SELECT count(*) FROM {table}{}", self.where_clause())
    }
}

/// Escapes `\`, `%` and `_` so they match literally under `ESCAPE '\'`.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

pub fn like_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

/// Runs one listing window.
///
/// The total comes from the window count on the returned rows. A page past
/// the end returns no rows, so the total is then read with a plain count.
pub(crate) async fn fetch_page<T, F>(
    client: &Client,
    columns: &str,
    table: &str,
    order_by: &str,
    filter: &ListFilter,
    list: &ListRequest,
    map: F,
) -> Result<Page<T>, RepositoryError>
where
    F: Fn(&Row) -> Result<T, RepositoryError>,
{
    let limit = i64::try_from(list.limit).unwrap_or(i64::MAX);
    let offset = i64::try_from(list.offset()).unwrap_or(i64::MAX);

    let mut params = filter.params();
    params.push(&limit);
    params.push(&offset);

    let sql = filter.page_sql(columns, table, order_by);
    let rows = client.query(sql.as_str(), &params).await?;

    let count = match rows.first() {
        Some(row) => row.try_get::<_, i64>("total_count")?,
        None if offset > 0 => {
            let sql = filter.count_sql(table);
            let row = client.query_one(sql.as_str(), &filter.params()).await?;
            row.try_get::<_, i64>(0)?
        }
        None => 0,
    };

    let items = rows.iter().map(map).collect::<Result<Vec<_>, _>>()?;
    Ok(Page { items, count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(escape_like("50%_off\\"), r"50\%\_off\\");
        assert_eq!(escape_like("plov"), "plov");
    }

    #[test]
    fn pattern_wraps_escaped_term() {
        assert_eq!(like_pattern("a_b"), r"%a\_b%");
    }

    #[test]
    fn empty_filter_has_no_where_clause() {
        let filter = ListFilter::new();
        assert_eq!(filter.where_clause(), "");
        assert_eq!(
            filter.page_sql("id, name", "categories", "created_at DESC"),
            "SELECT id, name, count(*) OVER () AS total_count FROM categories ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn search_reuses_one_placeholder_across_columns() {
        let filter = ListFilter::new().search(&["email", "phone"], Some("998"));
        assert_eq!(filter.param_count(), 1);
        assert_eq!(
            filter.where_clause(),
            r" WHERE (email ILIKE $1 ESCAPE '\' OR phone ILIKE $1 ESCAPE '\')"
        );
    }

    #[test]
    fn absent_values_add_no_conditions() {
        let filter = ListFilter::new()
            .search(&["name"], None)
            .eq::<Uuid>("category_id", None);
        assert_eq!(filter.param_count(), 0);
        assert_eq!(filter.count_sql("products"), "SELECT count(*) FROM products");
    }

    #[test]
    fn conditions_are_numbered_in_order() {
        let filter = ListFilter::new()
            .live()
            .search(&["address_name", "status"], Some("chilonzor"))
            .eq("user_id", Some(Uuid::nil()));
        assert_eq!(filter.param_count(), 2);
        let sql = filter.page_sql("id", "orders", "created_at DESC");
        assert!(sql.contains("WHERE deleted_at IS NULL AND (address_name ILIKE $1"));
        assert!(sql.contains("AND user_id = $2"));
        assert!(sql.ends_with("LIMIT $3 OFFSET $4"));
    }
}
