//! Core of the paginated fetch controller.
//!
//! Plain data, no signals: the dashboard wraps this in reactive state, and
//! everything that must hold (stale-response suppression, page-1 reset on
//! filter change, the advance/retreat rules) is testable right here.

use contracts::shared::pagination::PageInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub page: u32,
    pub has_next: bool,
    pub total_pages: u32,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            page: 1,
            has_next: true,
            total_pages: 1,
        }
    }
}

/// Generation-tagged pagination state. Every filter change bumps the
/// generation; a response is only adopted when its tag still matches, so a
/// request that was in flight when the filter changed resolves into nothing.
#[derive(Debug, Default)]
pub struct PagedFetch {
    generation: u64,
    cursor: PageCursor,
}

impl PagedFetch {
    pub fn new() -> Self {
        Self {
            generation: 0,
            cursor: PageCursor::default(),
        }
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The filter object changed identity: supersede any in-flight request
    /// and restart at page 1.
    pub fn filter_changed(&mut self) -> u64 {
        self.generation += 1;
        self.cursor = PageCursor::default();
        self.generation
    }

    /// Tag to attach to a request about to be issued.
    pub fn begin(&self) -> u64 {
        self.generation
    }

    /// Adopt a server envelope. Returns false (and changes nothing) when the
    /// tag belongs to a superseded filter.
    pub fn apply(&mut self, tag: u64, info: &PageInfo) -> bool {
        if tag != self.generation {
            return false;
        }
        self.cursor = PageCursor {
            page: info.current_page.max(1),
            has_next: info.has_next_page,
            total_pages: info.total_pages.max(1),
        };
        true
    }

    /// Roll an unadopted page move back to the last adopted position, e.g.
    /// when the request for the new page errors out.
    pub fn restore(&mut self, cursor: PageCursor) {
        self.cursor = cursor;
    }

    /// Advance only when the previous page reported a next one.
    pub fn next_page(&mut self) -> bool {
        if !self.cursor.has_next {
            return false;
        }
        self.cursor.page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if self.cursor.page <= 1 {
            return false;
        }
        self.cursor.page -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(page: u32, total: u32, has_next: bool) -> PageInfo {
        PageInfo {
            current_page: page,
            total_pages: total,
            has_next_page: has_next,
            total_records: total as u64 * 10,
        }
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut paged = PagedFetch::new();
        // request for filter F1 goes out
        let old_tag = paged.begin();
        // filter changes to F2 while F1 is pending; F2's request goes out
        paged.filter_changed();
        let new_tag = paged.begin();
        // F1's response arrives late and must be ignored
        assert!(!paged.apply(old_tag, &info(7, 9, true)));
        assert_eq!(paged.cursor(), PageCursor::default());
        // F2's response is adopted
        assert!(paged.apply(new_tag, &info(1, 3, true)));
        assert_eq!(paged.cursor().total_pages, 3);
    }

    #[test]
    fn filter_change_resets_to_first_page() {
        let mut paged = PagedFetch::new();
        let tag = paged.begin();
        paged.apply(tag, &info(1, 5, true));
        assert!(paged.next_page());
        assert_eq!(paged.cursor().page, 2);

        paged.filter_changed();
        assert_eq!(paged.cursor(), PageCursor::default());
    }

    #[test]
    fn cannot_advance_past_last_page() {
        let mut paged = PagedFetch::new();
        let tag = paged.begin();
        paged.apply(tag, &info(5, 5, false));
        assert!(!paged.next_page());
        assert_eq!(paged.cursor().page, 5);
    }

    #[test]
    fn cannot_retreat_before_first_page() {
        let mut paged = PagedFetch::new();
        assert!(!paged.prev_page());
        assert_eq!(paged.cursor().page, 1);

        let tag = paged.begin();
        paged.apply(tag, &info(2, 4, true));
        assert!(paged.prev_page());
        assert_eq!(paged.cursor().page, 1);
    }

    #[test]
    fn envelope_with_zero_pages_is_normalized() {
        let mut paged = PagedFetch::new();
        let tag = paged.begin();
        paged.apply(tag, &info(0, 0, false));
        assert_eq!(paged.cursor().page, 1);
        assert_eq!(paged.cursor().total_pages, 1);
    }

    #[test]
    fn failed_page_move_is_rolled_back() {
        let mut paged = PagedFetch::new();
        let tag = paged.begin();
        paged.apply(tag, &info(1, 3, true));
        let adopted = paged.cursor();

        // the request for page 2 errors out; position returns to page 1
        assert!(paged.next_page());
        paged.restore(adopted);
        assert_eq!(paged.cursor(), adopted);

        // a retry can still advance
        assert!(paged.next_page());
        assert_eq!(paged.cursor().page, 2);
    }

    #[test]
    fn page_navigation_keeps_generation() {
        let mut paged = PagedFetch::new();
        let tag = paged.begin();
        paged.apply(tag, &info(1, 2, true));
        paged.next_page();
        // same filter, so a late page-1 response is still the same generation
        assert_eq!(paged.begin(), tag);
    }
}
