use std::collections::BTreeMap;

use crate::resource::{Resource, SortKey};

/// Search text, sort key, and filter values driving one page's view.
///
/// Filters with an empty value are treated as unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criteria<K> {
    pub search_text: String,
    pub sort_key: K,
    pub filters: BTreeMap<String, String>,
}

impl<K: SortKey> Default for Criteria<K> {
    fn default() -> Self {
        Criteria {
            search_text: String::new(),
            sort_key: K::default(),
            filters: BTreeMap::new(),
        }
    }
}

impl<K: SortKey> Criteria<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_sort(mut self, key: K) -> Self {
        self.sort_key = key;
        self
    }

    pub fn with_filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_filter(name, value);
        self
    }

    /// Sets or clears (empty value) a filter.
    pub fn set_filter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if value.trim().is_empty() {
            self.filters.remove(&name);
        } else {
            self.filters.insert(name, value);
        }
    }

    /// Query parameters for the filters the server supports, in the
    /// resource's declared order.
    pub fn server_query<R>(&self) -> Vec<(String, String)>
    where
        R: Resource<SortKey = K>,
    {
        R::SERVER_FILTERS
            .iter()
            .filter_map(|name| {
                self.filters
                    .get(*name)
                    .map(|value| (name.to_string(), value.trim().to_string()))
            })
            .collect()
    }

    /// Filters the server does not understand; applied during view derivation.
    pub fn local_filters<R>(&self) -> impl Iterator<Item = (&str, &str)>
    where
        R: Resource<SortKey = K>,
    {
        self.filters
            .iter()
            .filter(|(name, _)| !R::SERVER_FILTERS.contains(&name.as_str()))
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}
