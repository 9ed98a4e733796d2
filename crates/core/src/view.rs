//! Derived view: the filtered-and-sorted projection of loaded records.
//!
//! [`derive_view`] is a pure function of its inputs. Sorting is stable, so
//! records that compare equal keep server order.

use std::cmp::Ordering;

use crate::criteria::Criteria;
use crate::resource::Resource;

/// Filters `records` by `criteria` and sorts the survivors by its sort key.
pub fn derive_view<R: Resource>(records: &[R], criteria: &Criteria<R::SortKey>) -> Vec<R> {
    let needle = criteria.search_text.to_lowercase();
    let local: Vec<(&str, &str)> = criteria.local_filters::<R>().collect();

    let mut view: Vec<R> = records
        .iter()
        .filter(|r| matches_search(*r, &needle))
        .filter(|r| local.iter().all(|(name, value)| r.matches_filter(name, value)))
        .cloned()
        .collect();

    // `sort_by` is stable.
    view.sort_by(|a, b| R::compare(a, b, criteria.sort_key));
    view
}

/// Case-insensitive substring match against any searchable field.
/// An empty needle matches everything.
pub fn matches_search<R: Resource>(record: &R, lowered_needle: &str) -> bool {
    lowered_needle.is_empty()
        || record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(lowered_needle))
}

/// Locale-aware string ordering for display names.
///
/// Letters compare case- and accent-insensitively first; only when two
/// strings are otherwise equal does lowercase sort before uppercase and an
/// unaccented letter before its accented form.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .flat_map(fold_primary)
        .cmp(b.chars().flat_map(fold_primary));
    if primary != Ordering::Equal {
        return primary;
    }
    let tertiary = a.chars().map(tertiary_weight).cmp(b.chars().map(tertiary_weight));
    tertiary.then_with(|| a.cmp(b))
}

/// Descending order for numeric metrics where higher is better.
pub fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Descending order with absent values last.
pub fn descending_present_first(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => descending(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn fold_primary(c: char) -> std::char::ToLowercase {
    strip_accent(c).to_lowercase()
}

fn tertiary_weight(c: char) -> (bool, bool) {
    (strip_accent(c) != c, c.is_uppercase())
}

fn strip_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'ç' => 'c',
        'Ç' => 'C',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        other => other,
    }
}
