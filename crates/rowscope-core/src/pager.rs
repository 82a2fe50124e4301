//! Page slicing and display-column selection for tabular views.

use serde::Serialize;

use crate::record::Record;

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const DEFAULT_DISPLAY_COLUMNS: usize = 8;

/// Placeholder rendered for absent or empty cells.
pub const EMPTY_CELL: &str = "-";

/// Columns shown before any others, when the dataset has them.
pub const PRIORITY_COLUMNS: [&str; 11] = [
    "name",
    "name_2",
    "phone",
    "landline",
    "whatsappnumber",
    "email",
    "location",
    "location_2",
    "building",
    "building_2",
    "building_3",
];

/// One page of records. `start`/`end` are 1-based and inclusive; both are 0
/// when there are no records.
#[derive(Debug, Clone, Serialize)]
pub struct Page<'a> {
    pub page: usize,
    pub page_size: usize,
    pub total_records: usize,
    pub total_pages: usize,
    pub start: usize,
    pub end: usize,
    pub records: Vec<&'a Record>,
}

impl Page<'_> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Slice out page `page` (1-based). Out-of-range pages are clamped and a zero
/// page size falls back to [`DEFAULT_PAGE_SIZE`].
pub fn paginate<'a, I>(records: I, page: usize, page_size: usize) -> Page<'a>
where
    I: IntoIterator<Item = &'a Record>,
    I::IntoIter: ExactSizeIterator,
{
    let iter = records.into_iter();
    let total_records = iter.len();
    let page_size = if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size };
    let total_pages = total_records.div_ceil(page_size);
    let page = page.clamp(1, total_pages.max(1));

    let offset = (page - 1) * page_size;
    let records: Vec<&Record> = iter.skip(offset).take(page_size).collect();
    let (start, end) = if records.is_empty() {
        (0, 0)
    } else {
        (offset + 1, offset + records.len())
    };

    Page {
        page,
        page_size,
        total_records,
        total_pages,
        start,
        end,
        records,
    }
}

/// Prioritised columns (in header order) followed by the rest, capped at `max`.
pub fn display_columns(headers: &[String], max: usize) -> Vec<String> {
    let is_priority = |h: &String| PRIORITY_COLUMNS.contains(&h.to_lowercase().as_str());
    let (priority, rest): (Vec<&String>, Vec<&String>) = headers.iter().partition(|h| is_priority(h));
    priority.into_iter().chain(rest).take(max).cloned().collect()
}

/// Cell text for display.
pub fn cell<'a>(record: &'a Record, header: &str) -> &'a str {
    record
        .get(header)
        .filter(|v| !v.is_empty())
        .unwrap_or(EMPTY_CELL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<Record> {
        (0..n).map(|i| Record::new().with("name", i.to_string())).collect()
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_paginate_first_page() {
        let records = numbered(120);
        let page = paginate(&records, 1, 50);
        assert_eq!(page.total_pages, 3);
        assert_eq!((page.start, page.end), (1, 50));
        assert_eq!(page.records.len(), 50);
        assert!(!page.has_previous());
        assert!(page.has_next());
    }

    #[test]
    fn test_paginate_last_partial_page() {
        let records = numbered(120);
        let page = paginate(&records, 3, 50);
        assert_eq!((page.start, page.end), (101, 120));
        assert_eq!(page.records[0].get("name"), Some("100"));
        assert!(!page.has_next());
    }

    #[test]
    fn test_paginate_clamps_page() {
        let records = numbered(10);
        assert_eq!(paginate(&records, 0, 4).page, 1);
        let past_end = paginate(&records, 99, 4);
        assert_eq!(past_end.page, 3);
        assert_eq!(past_end.records.len(), 2);
    }

    #[test]
    fn test_paginate_zero_page_size_uses_default() {
        let records = numbered(60);
        let page = paginate(&records, 1, 0);
        assert_eq!(page.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_paginate_empty() {
        let records: Vec<Record> = Vec::new();
        let page = paginate(&records, 3, 50);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert_eq!((page.start, page.end), (0, 0));
        assert!(page.records.is_empty());
    }

    #[test]
    fn test_paginate_borrowed_results() {
        let records = numbered(5);
        let refs: Vec<&Record> = records.iter().rev().collect();
        let page = paginate(refs, 1, 2);
        assert_eq!(page.records[0].get("name"), Some("4"));
    }

    #[test]
    fn test_display_columns_priority_first() {
        let cols = display_columns(
            &headers(&["id", "Email", "notes", "name", "building_4", "building"]),
            DEFAULT_DISPLAY_COLUMNS,
        );
        assert_eq!(cols, headers(&["Email", "name", "building", "id", "notes", "building_4"]));
    }

    #[test]
    fn test_display_columns_capped() {
        let many: Vec<String> = (0..12).map(|i| format!("c{}", i)).collect();
        assert_eq!(display_columns(&many, 8).len(), 8);
        assert!(display_columns(&[], 8).is_empty());
    }

    #[test]
    fn test_cell_placeholder() {
        let r = Record::new().with("name", "Ali").with("phone", "");
        assert_eq!(cell(&r, "name"), "Ali");
        assert_eq!(cell(&r, "phone"), EMPTY_CELL);
        assert_eq!(cell(&r, "email"), EMPTY_CELL);
    }
}
