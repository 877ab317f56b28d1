//! Query-parameter arithmetic shared by the two list policies.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Serialize;

use crate::{
    config::ListingConfig,
    error::{AppError, INVALID_PAGING_STATE_MESSAGE},
};

/// Sentinel for "no such page" in `nextPage` / `prevPage`.
pub const NO_PAGE: i64 = -1;

/// Applies the configured default and rejects sizes outside `1..=max_page_size`.
pub fn resolve_limit(limit: Option<u64>, listing: &ListingConfig) -> Result<u64, AppError> {
    let limit = limit.unwrap_or(listing.default_page_size);
    if limit == 0 || limit > listing.max_page_size {
        return Err(AppError::bad_request(format!(
            "Invalid limit: {limit} (expected 1..={})",
            listing.max_page_size
        )));
    }
    Ok(limit)
}

/// Base64 form of a driver paging state; empty once the scan is exhausted.
pub fn encode_paging_state(state: Option<&[u8]>) -> String {
    state.map(|bytes| STANDARD.encode(bytes)).unwrap_or_default()
}

/// An absent or empty token starts from the first page.
pub fn decode_paging_state(token: Option<&str>) -> Result<Option<Vec<u8>>, AppError> {
    match token.map(str::trim) {
        None | Some("") => Ok(None),
        Some(token) => STANDARD
            .decode(token)
            .map(Some)
            .map_err(|_| AppError::bad_request(INVALID_PAGING_STATE_MESSAGE)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
}

impl PageWindow {
    pub fn new(page: Option<u64>, limit: u64) -> Result<Self, AppError> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::bad_request(format!(
                "Invalid pagination: page={page} limit={limit}"
            )));
        }
        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u64,
    pub limit: u64,
    pub total_count: u64,
    pub total_pages: u64,
    pub next_page: i64,
    pub prev_page: i64,
}

impl PageMeta {
    pub fn new(window: PageWindow, total_count: u64) -> Self {
        let total_pages = total_pages(total_count, window.limit);
        let next_page = if window.page < total_pages {
            page_number(window.page + 1)
        } else {
            NO_PAGE
        };
        // Past the end, "previous" points back at the last real page.
        let prev_page = if window.page > 1 && total_pages > 0 {
            page_number((window.page - 1).min(total_pages))
        } else {
            NO_PAGE
        };

        Self {
            page: window.page,
            limit: window.limit,
            total_count,
            total_pages,
            next_page,
            prev_page,
        }
    }
}

pub fn total_pages(total_count: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    total_count.div_ceil(limit)
}

fn page_number(page: u64) -> i64 {
    i64::try_from(page).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> ListingConfig {
        ListingConfig::default()
    }

    #[test]
    fn single_full_page_has_no_neighbours() {
        let meta = PageMeta::new(PageWindow::new(Some(1), 5).unwrap(), 5);

        assert_eq!(meta.total_pages, 1);
        assert_eq!(meta.next_page, NO_PAGE);
        assert_eq!(meta.prev_page, NO_PAGE);
    }

    #[test]
    fn middle_page_links_both_ways() {
        let meta = PageMeta::new(PageWindow::new(Some(2), 3).unwrap(), 7);

        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.next_page, 3);
        assert_eq!(meta.prev_page, 1);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let meta = PageMeta::new(PageWindow::new(None, 10).unwrap(), 0);

        assert_eq!(meta.page, 1);
        assert_eq!(meta.total_pages, 0);
        assert_eq!(meta.next_page, NO_PAGE);
        assert_eq!(meta.prev_page, NO_PAGE);
    }

    #[test]
    fn page_past_the_end_points_back_to_last_page() {
        let meta = PageMeta::new(PageWindow::new(Some(9), 10).unwrap(), 25);

        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.next_page, NO_PAGE);
        assert_eq!(meta.prev_page, 3);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(11, 5), 3);
        assert_eq!(total_pages(1, 100), 1);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(PageWindow::new(Some(1), 10).unwrap().offset(), 0);
        assert_eq!(PageWindow::new(Some(4), 10).unwrap().offset(), 30);
    }

    #[test]
    fn page_zero_is_rejected() {
        let err = PageWindow::new(Some(0), 10).expect_err("page 0 should fail");
        assert_eq!(err.message(), "Invalid pagination: page=0 limit=10");
    }

    #[test]
    fn limit_defaults_and_bounds() {
        assert_eq!(resolve_limit(None, &listing()).unwrap(), 10);
        assert_eq!(resolve_limit(Some(100), &listing()).unwrap(), 100);
        assert!(resolve_limit(Some(0), &listing()).is_err());
        assert!(resolve_limit(Some(101), &listing()).is_err());
    }

    #[test]
    fn paging_state_survives_the_wire_format() {
        let raw = vec![0u8, 1, 2, 250, 255];
        let token = encode_paging_state(Some(&raw));

        assert_eq!(decode_paging_state(Some(&token)).unwrap(), Some(raw));
        assert_eq!(encode_paging_state(None), "");
        assert_eq!(decode_paging_state(Some("")).unwrap(), None);
        assert_eq!(decode_paging_state(None).unwrap(), None);
    }

    #[test]
    fn malformed_paging_state_is_a_bad_request() {
        let err = decode_paging_state(Some("not base64!")).expect_err("token should fail");
        assert_eq!(err.message(), INVALID_PAGING_STATE_MESSAGE);
    }
}
