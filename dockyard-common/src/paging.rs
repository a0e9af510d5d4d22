//! Data grid paging, sorting and filtering descriptors
//!
//! The grid reports its state as a row range (`from`..=`to`) plus a page
//! size; the backend wants a 1-based page number. Conversions between the
//! two live here so every list view pages the same way.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used until the grid reports one
pub const DEFAULT_PAGE_SIZE: u32 = 15;

/// Header carrying the total number of records behind a paged response
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PagingError {
    #[error("total count header is missing")]
    MissingTotalCount,

    #[error("invalid total count '{0}'")]
    InvalidTotalCount(String),
}

/// Row range of one grid page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDescriptor {
    pub from: i64,
    pub to: i64,
    pub size: u32,
}

impl PageDescriptor {
    /// Descriptor covering 1-based `page` with `size` rows.
    pub fn for_page(page: u32, size: u32) -> Self {
        let page = i64::from(page.max(1));
        let size_rows = i64::from(size);
        Self {
            from: (page - 1) * size_rows,
            to: page * size_rows - 1,
            size,
        }
    }

    pub fn first(size: u32) -> Self {
        Self::for_page(1, size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub by: String,
    #[serde(default)]
    pub reverse: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub property: String,
    pub value: String,
}

/// Paging, sorting and filtering state reported by a data grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridState {
    #[serde(default)]
    pub page: Option<PageDescriptor>,
    #[serde(default)]
    pub sort: Option<SortDescriptor>,
    #[serde(default)]
    pub filters: Vec<FilterDescriptor>,
}

impl GridState {
    pub fn with_page(page: PageDescriptor) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    /// Same sort and filters, different page.
    pub fn at_page(&self, page: PageDescriptor) -> Self {
        Self {
            page: Some(page),
            sort: self.sort.clone(),
            filters: self.filters.clone(),
        }
    }
}

/// 1-based page number of the grid state; never less than 1.
pub fn calculate_page(state: &GridState) -> u32 {
    let Some(page) = state.page else {
        return 1;
    };
    if page.size == 0 {
        return 1;
    }

    let size = i64::from(page.size);
    let rows = page.to.saturating_add(1);
    let mut number = rows.div_euclid(size);
    if rows.rem_euclid(size) != 0 {
        number += 1;
    }

    if number <= 0 {
        1
    } else {
        u32::try_from(number).unwrap_or(u32::MAX)
    }
}

/// Backend sort parameter: the column name, prefixed with `-` when descending.
pub fn sorting_string(state: &GridState) -> Option<String> {
    let sort = state.sort.as_ref()?;
    if sort.by.is_empty() {
        return None;
    }

    if sort.reverse {
        Some(format!("-{}", sort.by))
    } else {
        Some(sort.by.clone())
    }
}

/// Parses the decimal value of the total count header.
pub fn parse_total_count(raw: Option<&str>) -> Result<u64, PagingError> {
    let raw = raw.ok_or(PagingError::MissingTotalCount)?;
    raw.trim()
        .parse::<u64>()
        .map_err(|_| PagingError::InvalidTotalCount(raw.to_string()))
}

/// Grid state to show after `selected` of `total_count` records were deleted.
///
/// Returns `None` when nothing is left to page through; callers reset to the
/// first page with an empty search instead. When the deletion emptied the
/// trailing pages the target clamps to the new last page.
pub fn state_after_deletion(
    total_count: u64,
    selected: usize,
    page_size: u32,
    current_page: u32,
    current: Option<&GridState>,
) -> Option<GridState> {
    let remaining = i128::from(total_count) - selected as i128;
    if remaining <= 0 || page_size == 0 {
        return None;
    }

    let size = i128::from(page_size);
    let total_pages = u32::try_from((remaining + size - 1) / size).unwrap_or(u32::MAX);
    let target = if current_page > total_pages {
        total_pages
    } else {
        current_page.max(1)
    };

    let page = PageDescriptor::for_page(target, page_size);
    Some(match current {
        Some(state) => state.at_page(page),
        None => GridState::with_page(page),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(from: i64, to: i64, size: u32) -> GridState {
        GridState::with_page(PageDescriptor { from, to, size })
    }

    #[test]
    fn test_calculate_page() {
        assert_eq!(calculate_page(&state(0, 14, 15)), 1);
        assert_eq!(calculate_page(&state(15, 29, 15)), 2);
        assert_eq!(calculate_page(&state(30, 44, 15)), 3);
        // partial last page still counts
        assert_eq!(calculate_page(&state(30, 35, 15)), 3);
    }

    #[test]
    fn test_calculate_page_non_positive() {
        assert_eq!(calculate_page(&state(0, -1, 15)), 1);
        assert_eq!(calculate_page(&state(-30, -16, 15)), 1);
        assert_eq!(calculate_page(&state(0, 14, 0)), 1);
        assert_eq!(calculate_page(&GridState::default()), 1);
    }

    #[test]
    fn test_calculate_page_extreme_bounds() {
        assert_eq!(calculate_page(&state(0, i64::MAX, 1)), u32::MAX);
        assert_eq!(calculate_page(&state(0, i64::MIN, 15)), 1);
    }

    #[test]
    fn test_sorting_string() {
        let mut grid = state(0, 14, 15);
        assert_eq!(sorting_string(&grid), None);

        grid.sort = Some(SortDescriptor { by: "name".to_string(), reverse: false });
        assert_eq!(sorting_string(&grid).as_deref(), Some("name"));

        grid.sort = Some(SortDescriptor { by: "creation_time".to_string(), reverse: true });
        assert_eq!(sorting_string(&grid).as_deref(), Some("-creation_time"));
    }

    #[test]
    fn test_parse_total_count() {
        assert_eq!(parse_total_count(Some("31")), Ok(31));
        assert_eq!(parse_total_count(Some(" 42 ")), Ok(42));
        assert_eq!(parse_total_count(None), Err(PagingError::MissingTotalCount));
        assert!(parse_total_count(Some("abc")).is_err());
        assert!(parse_total_count(Some("-5")).is_err());
        // no radix guessing: hex-looking values are rejected
        assert!(parse_total_count(Some("0x1f")).is_err());
    }

    #[test]
    fn test_for_page_invariant() {
        for page in 1..5 {
            let descriptor = PageDescriptor::for_page(page, 15);
            assert_eq!(descriptor.to, descriptor.from + i64::from(descriptor.size) - 1);
        }
    }

    #[test]
    fn test_state_after_deletion_clamps_to_last_page() {
        let next = state_after_deletion(31, 2, 15, 3, None).unwrap();
        assert_eq!(next.page, Some(PageDescriptor { from: 15, to: 29, size: 15 }));
    }

    #[test]
    fn test_state_after_deletion_keeps_current_page() {
        let next = state_after_deletion(40, 1, 15, 2, None).unwrap();
        assert_eq!(next.page, Some(PageDescriptor { from: 15, to: 29, size: 15 }));
    }

    #[test]
    fn test_state_after_deletion_everything_deleted() {
        assert_eq!(state_after_deletion(5, 5, 15, 1, None), None);
        assert_eq!(state_after_deletion(0, 0, 15, 1, None), None);
        assert_eq!(state_after_deletion(3, 5, 15, 1, None), None);
    }

    #[test]
    fn test_state_after_deletion_keeps_sort_and_filters() {
        let mut current = state(30, 44, 15);
        current.sort = Some(SortDescriptor { by: "name".to_string(), reverse: true });
        current.filters.push(FilterDescriptor {
            property: "owner_name".to_string(),
            value: "alice".to_string(),
        });

        let next = state_after_deletion(31, 1, 15, 3, Some(&current)).unwrap();
        assert_eq!(next.sort, current.sort);
        assert_eq!(next.filters, current.filters);
        assert_eq!(next.page, Some(PageDescriptor { from: 15, to: 29, size: 15 }));
    }
}
