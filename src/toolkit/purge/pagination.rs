use tracing::debug;


/// What happened to one page once all of its deletions settled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettledPage {
    /// Total the backend reported when the page was listed.
    pub reported_total: usize,
    pub page_len: usize,
    /// Records of this page that no longer exist.
    pub removed: usize,
}


/// Offset bookkeeping for paging through a listing that shrinks as it is deleted.
#[derive(Debug, Clone)]
pub struct PageCursor {
    batch_size: usize,
    offset: usize,
    pages: usize,
}

impl PageCursor {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            offset: 0,
            pages: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> usize {
        self.batch_size
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Moves past a settled page. Returns `false` once the listing is exhausted.
    ///
    /// Removed records shift their successors down, so the offset only advances by the
    /// records that survived. The reported total dropping to one batch means the page
    /// just handled was the last one.
    pub fn advance(&mut self, page: SettledPage) -> bool {
        self.pages += 1;

        if page.page_len == 0 {
            return false;
        }

        self.offset = (self.offset + page.page_len).saturating_sub(page.removed);

        if page.reported_total <= self.batch_size {
            return false;
        }

        let remaining = page.reported_total.saturating_sub(page.removed);
        debug!(
            "Page {} settled: offset={}, remaining={}",
            self.pages, self.offset, remaining
        );
        self.offset < remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Paged source whose total shrinks by whatever the caller deletes.
    struct ShrinkingSource {
        live: Vec<usize>,
    }

    impl ShrinkingSource {
        fn new(total: usize) -> Self {
            Self {
                live: (0..total).collect(),
            }
        }

        fn page(&self, offset: usize, limit: usize) -> (usize, Vec<usize>) {
            let items = self.live.iter().skip(offset).take(limit).copied().collect();
            (self.live.len(), items)
        }

        fn remove(&mut self, id: usize) {
            self.live.retain(|x| *x != id);
        }
    }

    /// Drives the cursor over the source, deleting records accepted by `delete`.
    fn drive(total: usize, batch: usize, delete: impl Fn(usize) -> bool) -> (Vec<usize>, usize) {
        let mut source = ShrinkingSource::new(total);
        let mut cursor = PageCursor::new(batch);
        let mut visited = Vec::new();

        loop {
            let (reported_total, items) = source.page(cursor.offset(), cursor.limit());
            let mut removed = 0;
            for id in &items {
                visited.push(*id);
                if delete(*id) {
                    source.remove(*id);
                    removed += 1;
                }
            }
            let more = cursor.advance(SettledPage {
                reported_total,
                page_len: items.len(),
                removed,
            });
            if !more {
                break;
            }
        }

        (visited, cursor.pages())
    }

    #[test]
    fn test_all_deleted_visits_every_record_once() {
        let (visited, pages) = drive(12, 5, |_| true);
        assert_eq!(visited, (0..12).collect::<Vec<_>>());
        assert_eq!(pages, 3);
    }

    #[test]
    fn test_seven_records_two_pages() {
        let (visited, pages) = drive(7, 5, |_| true);
        assert_eq!(visited.len(), 7);
        assert_eq!(pages, 2);
    }

    #[test]
    fn test_nothing_deleted_terminates() {
        let (visited, pages) = drive(12, 5, |_| false);
        assert_eq!(visited, (0..12).collect::<Vec<_>>());
        assert_eq!(pages, 3);
    }

    #[test]
    fn test_mixed_survivors() {
        let (mut visited, _) = drive(23, 5, |id| id % 3 != 0);
        visited.sort_unstable();
        assert_eq!(visited, (0..23).collect::<Vec<_>>());
    }

    #[test]
    fn test_exact_multiple_of_batch() {
        let (visited, pages) = drive(10, 5, |_| true);
        assert_eq!(visited.len(), 10);
        assert_eq!(pages, 2);
    }

    #[test]
    fn test_empty_listing() {
        let (visited, pages) = drive(0, 5, |_| true);
        assert!(visited.is_empty());
        assert_eq!(pages, 1);
    }

    #[test]
    fn test_short_page_with_total_above_batch_stops_at_end() {
        let mut cursor = PageCursor::new(5);
        assert!(cursor.advance(SettledPage {
            reported_total: 8,
            page_len: 5,
            removed: 1,
        }));
        assert_eq!(cursor.offset(), 4);
        assert!(!cursor.advance(SettledPage {
            reported_total: 7,
            page_len: 3,
            removed: 0,
        }));
        assert_eq!(cursor.offset(), 7);
    }
}
