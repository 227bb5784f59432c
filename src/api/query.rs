// src/api/query.rs
//! Query-string vocabulary of the CMS collection endpoints.

use crate::types::{ArticleId, TermId};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    Date,
    Relevance,
    Count,
    Registered,
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBy::Date => write!(f, "date"),
            OrderBy::Relevance => write!(f, "relevance"),
            OrderBy::Count => write!(f, "count"),
            OrderBy::Registered => write!(f, "registered_date"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Asc => write!(f, "asc"),
            Order::Desc => write!(f, "desc"),
        }
    }
}

/// Parameters of one collection request.
///
/// Parameters are emitted in a fixed order so equal queries produce equal
/// URLs, which the response cache relies on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    page: Option<u32>,
    per_page: Option<u32>,
    search: Option<String>,
    categories: Vec<TermId>,
    exclude: Vec<ArticleId>,
    order_by: Option<OrderBy>,
    order: Option<Order>,
    embed: bool,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1-indexed page and page size.
    pub fn page(mut self, page: u32, per_page: u32) -> Self {
        self.page = Some(page);
        self.per_page = Some(per_page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Full-text search; blank terms are ignored.
    pub fn search(mut self, term: &str) -> Self {
        let term = term.trim();
        self.search = (!term.is_empty()).then(|| term.to_string());
        self
    }

    pub fn categories(mut self, categories: impl IntoIterator<Item = TermId>) -> Self {
        self.categories.extend(categories);
        self
    }

    pub fn exclude(mut self, id: ArticleId) -> Self {
        self.exclude.push(id);
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    /// Ask the CMS to inline author, featured media and terms.
    pub fn embed(mut self) -> Self {
        self.embed = true;
        self
    }

    pub fn is_search(&self) -> bool {
        self.search.is_some()
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        if !self.categories.is_empty() {
            pairs.push(("categories".to_string(), join_ids(&self.categories)));
        }
        if !self.exclude.is_empty() {
            pairs.push(("exclude".to_string(), join_ids(&self.exclude)));
        }
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page".to_string(), per_page.to_string()));
        }
        if self.embed {
            pairs.push(("_embed".to_string(), "1".to_string()));
        }
        if let Some(order_by) = self.order_by {
            pairs.push(("orderby".to_string(), order_by.to_string()));
        }
        if let Some(order) = self.order {
            pairs.push(("order".to_string(), order.to_string()));
        }
        pairs
    }
}

fn join_ids<T: fmt::Display>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(query: &ListQuery) -> Vec<(String, String)> {
        query.to_pairs()
    }

    fn owned(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_latest_articles_query() {
        let query = ListQuery::new()
            .page(2, 10)
            .embed()
            .order_by(OrderBy::Date)
            .order(Order::Desc);

        assert_eq!(
            pairs(&query),
            owned(&[
                ("page", "2"),
                ("per_page", "10"),
                ("_embed", "1"),
                ("orderby", "date"),
                ("order", "desc"),
            ])
        );
    }

    #[test]
    fn test_related_query_joins_ids() {
        let query = ListQuery::new()
            .categories([TermId::new(3), TermId::new(8)])
            .exclude(ArticleId::new(42))
            .per_page(5);

        assert_eq!(
            pairs(&query),
            owned(&[("categories", "3,8"), ("exclude", "42"), ("per_page", "5")])
        );
    }

    #[test]
    fn test_blank_search_is_dropped() {
        let query = ListQuery::new().search("   ");
        assert!(!query.is_search());
        assert!(query.to_pairs().is_empty());

        let query = ListQuery::new().search("  rust ");
        assert_eq!(pairs(&query), owned(&[("search", "rust")]));
    }
}
