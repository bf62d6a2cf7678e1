//! Stateless slicing of a bounded result set into fixed-size pages.

/// One page of a row set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    /// Rows on the requested page; empty when the page is out of range.
    pub rows: &'a [T],
    /// Total pages over the capped working set.
    pub total_pages: usize,
    /// True when the display cap trimmed the working set.
    pub capped: bool,
}

/// Slice `rows` into pages of `page_size` and return 1-based page `page`.
///
/// The working set is capped to `max_rows` before pagination. An
/// out-of-range page (including page 0) yields an empty page rather than
/// an error; clamping to a valid page is the caller's concern.
pub fn paginate<T>(rows: &[T], page_size: usize, page: usize, max_rows: usize) -> Page<'_, T> {
    let capped = rows.len() > max_rows;
    let working = &rows[..rows.len().min(max_rows)];

    if page_size == 0 || working.is_empty() {
        return Page {
            rows: &[],
            total_pages: 0,
            capped,
        };
    }

    let total_pages = working.len().div_ceil(page_size);
    if page == 0 || page > total_pages {
        return Page {
            rows: &[],
            total_pages,
            capped,
        };
    }

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(working.len());
    Page {
        rows: &working[start..end],
        total_pages,
        capped,
    }
}
