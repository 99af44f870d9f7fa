//! Query-string building for the backend's row API.
//!
//! The row endpoints accept equality/null filters plus ordering and a row
//! cap as query parameters. Rendering is kept pure so the exact strings can
//! be unit tested without a browser.

#[cfg(test)]
#[path = "postgrest_test.rs"]
mod postgrest_test;

/// A column filter/order/limit set for one row query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableQuery {
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<usize>,
}

impl TableQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the returned columns (`*` by default on the server side).
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_owned());
        self
    }

    /// Keep rows where `column` equals `value`.
    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_owned(), format!("eq.{value}")));
        self
    }

    /// Keep rows where `column` is SQL NULL.
    pub fn is_null(mut self, column: &str) -> Self {
        self.filters.push((column.to_owned(), "is.null".to_owned()));
        self
    }

    /// Order results by `column`, newest/highest first.
    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(format!("{column}.desc"));
        self
    }

    /// Cap the number of returned rows.
    pub fn limit(mut self, rows: usize) -> Self {
        self.limit = Some(rows);
        self
    }

    /// Render the query string, without a leading `?`.
    pub fn query_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some(select) = &self.select {
            parts.push(format!("select={select}"));
        }
        for (column, predicate) in &self.filters {
            parts.push(format!("{column}={predicate}"));
        }
        if let Some(order) = &self.order {
            parts.push(format!("order={order}"));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("limit={limit}"));
        }
        parts.join("&")
    }
}

/// Full row-endpoint URL for `table` under `base`.
pub fn rest_url(base: &str, table: &str, query: &TableQuery) -> String {
    let base = base.trim_end_matches('/');
    let query_string = query.query_string();
    if query_string.is_empty() {
        format!("{base}/rest/v1/{table}")
    } else {
        format!("{base}/rest/v1/{table}?{query_string}")
    }
}
