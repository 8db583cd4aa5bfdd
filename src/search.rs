//! Search and pagination over the collection
//!
//! Everything here is a pure function of `(records, query, page)`. Nothing is
//! cached: the view is rebuilt whenever the state is read.

use crate::state::DetailRecord;

/// Cards per page
pub const PAGE_SIZE: usize = 20;

/// Trimmed, case-folded form of a search query
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Substring match on the name or any category. `query` must be normalized.
pub fn matches(record: &DetailRecord, query: &str) -> bool {
    record.name.to_lowercase().contains(query)
        || record
            .categories
            .iter()
            .any(|category| category.to_lowercase().contains(query))
}

/// Records matching `query`, borrowed from `records` in their original order
pub fn filter_records<'a>(records: &'a [DetailRecord], query: &str) -> Vec<&'a DetailRecord> {
    let query = normalize_query(query);
    if query.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| matches(record, &query))
        .collect()
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Clamp a 1-based page into `[1, max(1, total_pages)]`
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// The `page`-th slice of `items`; empty when the page is out of range
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Filtered and paginated projection of the collection
#[derive(Clone, Debug)]
pub struct CatalogView<'a> {
    pub filtered: Vec<&'a DetailRecord>,
    pub page: usize,
    pub total_pages: usize,
    pub searching: bool,
}

impl<'a> CatalogView<'a> {
    pub fn derive(records: &'a [DetailRecord], query: &str, page: usize) -> Self {
        let filtered = filter_records(records, query);
        let total_pages = total_pages(filtered.len(), PAGE_SIZE);
        Self {
            page: clamp_page(page, total_pages),
            total_pages,
            searching: !normalize_query(query).is_empty(),
            filtered,
        }
    }

    pub fn visible(&self) -> &[&'a DetailRecord] {
        page_slice(&self.filtered, self.page, PAGE_SIZE)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// "Page 2 of 3 (45 total)", or `None` when everything fits on one page
    pub fn summary(&self) -> Option<String> {
        if self.filtered.is_empty() || self.total_pages <= 1 {
            return None;
        }
        let noun = if self.searching { "found" } else { "total" };
        Some(format!(
            "Page {} of {} ({} {noun})",
            self.page,
            self.total_pages,
            self.filtered.len()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(id: u32, name: &str, categories: &[&str]) -> DetailRecord {
        DetailRecord {
            id,
            name: name.to_string(),
            url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
            image_primary: None,
            image_fallback: None,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            height: 4,
            weight: 60,
        }
    }

    fn numbered(count: u32) -> Vec<DetailRecord> {
        (1..=count)
            .map(|id| record(id, &format!("mon-{id}"), &["normal"]))
            .collect()
    }

    fn starters() -> Vec<DetailRecord> {
        vec![
            record(1, "bulbasaur", &["grass", "poison"]),
            record(4, "charmander", &["fire"]),
            record(7, "squirtle", &["water"]),
            record(25, "Pikachu", &["electric"]),
        ]
    }

    #[test]
    fn test_empty_query_keeps_everything() {
        let records = starters();
        assert_eq!(filter_records(&records, "").len(), records.len());
        assert_eq!(filter_records(&records, "   ").len(), records.len());
    }

    #[test]
    fn test_filter_is_case_insensitive_on_categories() {
        let records = starters();
        let filtered = filter_records(&records, "ELEC");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Pikachu");
    }

    #[test]
    fn test_filter_matches_name_substring() {
        let records = starters();
        let names: Vec<_> = filter_records(&records, " char ")
            .into_iter()
            .map(|record| record.name.as_str())
            .collect();
        assert_eq!(names, vec!["charmander"]);
    }

    #[test]
    fn test_filter_matches_any_category() {
        let records = starters();
        let filtered = filter_records(&records, "poi");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);
    }

    #[test]
    fn test_filtered_view_borrows_from_collection() {
        let records = starters();
        let filtered = filter_records(&records, "a");
        for record in filtered {
            assert!(records.iter().any(|original| std::ptr::eq(original, record)));
        }
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, PAGE_SIZE), 0);
        assert_eq!(total_pages(1, PAGE_SIZE), 1);
        assert_eq!(total_pages(20, PAGE_SIZE), 1);
        assert_eq!(total_pages(21, PAGE_SIZE), 2);
        assert_eq!(total_pages(50, PAGE_SIZE), 3);
    }

    #[test]
    fn test_clamp_page_bounds() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(9, 3), 3);
        assert_eq!(clamp_page(5, 0), 1);
    }

    #[test]
    fn test_page_slice_out_of_range_is_empty() {
        let records = numbered(45);
        assert_eq!(page_slice(&records, 1, PAGE_SIZE).len(), 20);
        assert_eq!(page_slice(&records, 3, PAGE_SIZE).len(), 5);
        assert!(page_slice(&records, 4, PAGE_SIZE).is_empty());
        assert_eq!(page_slice(&records, 3, PAGE_SIZE)[0].id, 41);
    }

    #[test]
    fn test_view_clamps_stale_page() {
        let records = numbered(50);
        let view = CatalogView::derive(&records, "", 7);
        assert_eq!(view.page, 3);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.visible().len(), 10);
        assert!(view.has_previous());
        assert!(!view.has_next());
    }

    #[test]
    fn test_view_summary() {
        let records = numbered(45);
        let view = CatalogView::derive(&records, "", 2);
        assert_eq!(view.summary().as_deref(), Some("Page 2 of 3 (45 total)"));

        let view = CatalogView::derive(&records, "mon-1", 1);
        assert_eq!(view.filtered.len(), 11);
        assert_eq!(view.summary(), None);

        let view = CatalogView::derive(&records, "mon", 1);
        assert_eq!(view.summary().as_deref(), Some("Page 1 of 3 (45 found)"));
    }
}
