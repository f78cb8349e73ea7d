use serde::{Deserialize, Serialize};

use super::Locale;

/// Query for page-number paginated admin listings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PagingContext {
    pub page: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub search_language: Option<Locale>,
    /// Extra listing filters such as `position` or `type`.
    #[serde(skip, default)]
    pub filters: Vec<(String, String)>,
}

impl Default for PagingContext {
    fn default() -> Self {
        Self::new(1, 8)
    }
}

impl PagingContext {
    /// Creates a new PagingContext. Pages are 1-based; a zero page is clamped to 1.
    pub fn new(page: u32, page_size: u32) -> Self {
        PagingContext {
            page: page.max(1),
            page_size,
            search: None,
            search_language: None,
            filters: Vec::new(),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>, language: Option<Locale>) -> Self {
        self.search = Some(search.into());
        self.search_language = language;
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    /// The context for the following page, or None when `page` reported no next link.
    pub fn next<T>(&self, page: &Page<T>) -> Option<Self> {
        page.next.as_ref()?;

        Some(PagingContext { page: self.page + 1, ..self.clone() })
    }

    /// The context for the preceding page, or None when already on the first page.
    pub fn previous(&self) -> Option<Self> {
        if self.page <= 1 {
            return None;
        }

        Some(PagingContext { page: self.page - 1, ..self.clone() })
    }

    /// Flattens the context into query pairs in the order the backend's filters read them.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];

        if let Some(search) = self.search.as_ref().filter(|s| !s.is_empty()) {
            query.push(("search".to_string(), search.clone()));
        }

        if let Some(language) = self.search_language {
            query.push(("search_language".to_string(), language.to_string()));
        }

        query.extend(self.filters.iter().cloned());
        query
    }
}

/// One page of a page-number paginated listing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Page<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_contains_only_set_fields() {
        let context = PagingContext::new(2, 10);

        assert_eq!(
            context.to_query(),
            vec![("page".to_string(), "2".to_string()), ("page_size".to_string(), "10".to_string())]
        );
    }

    #[test]
    fn test_query_with_search_and_filters() {
        let context = PagingContext::new(1, 8)
            .with_search("persepolis", Some(Locale::En))
            .with_filter("position", "GK");

        let query = context.to_query();

        assert!(query.contains(&("search".to_string(), "persepolis".to_string())));
        assert!(query.contains(&("search_language".to_string(), "en".to_string())));
        assert_eq!(query.last(), Some(&("position".to_string(), "GK".to_string())));
    }

    #[test]
    fn test_next_and_previous() {
        let context = PagingContext::new(1, 8);
        let page: Page<u32> = Page {
            count: 20,
            next: Some("http://localhost:8000/api/admin/players/?page=2".to_string()),
            previous: None,
            results: vec![1, 2, 3],
        };

        let next = context.next(&page).unwrap();
        assert_eq!(next.page, 2);
        assert_eq!(next.previous().unwrap().page, 1);
        assert!(context.previous().is_none());

        let last_page: Page<u32> = Page { next: None, ..page };
        assert!(next.next(&last_page).is_none());
    }

    #[test]
    fn test_zero_page_is_clamped() {
        assert_eq!(PagingContext::new(0, 8).page, 1);
    }
}
