use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u64 = 15;
pub const MAX_PAGE_SIZE: u64 = 100;

/// A 1-indexed page request. Out-of-range inputs are clamped, never rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    per_page: u64,
}

impl PageRequest {
    pub fn new(page: Option<u64>, per_page: u64) -> Self {
        Self {
            page: page.filter(|page| *page > 0).unwrap_or(1),
            per_page: per_page.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Page from a query-string value; anything that is not a positive
    /// integer means the first page.
    pub fn parse_page(raw: Option<&str>) -> Option<u64> {
        raw.and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|page| *page > 0)
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, DEFAULT_PAGE_SIZE)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: u64,
    pub per_page: u64,
    pub last_page: u64,
    pub total: u64,
    /// 1-based position of the first row on this page.
    pub from: Option<u64>,
    pub to: Option<u64>,
}

impl PageMeta {
    pub fn new(request: PageRequest, returned: u64, total: u64) -> Self {
        let per_page = request.per_page();
        let last_page = total.div_ceil(per_page).max(1);
        let (from, to) = if returned == 0 {
            (None, None)
        } else {
            let from = request.offset() + 1;
            (Some(from), Some(from + returned - 1))
        };
        Self {
            current_page: request.page(),
            per_page,
            last_page,
            total,
            from,
            to,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(request: PageRequest, data: Vec<T>, total: u64) -> Self {
        let meta = PageMeta::new(request, data.len() as u64, total);
        Self { data, meta }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_inputs_are_clamped() {
        assert_eq!(PageRequest::new(None, 15).page(), 1);
        assert_eq!(PageRequest::new(Some(0), 15).page(), 1);
        assert_eq!(PageRequest::new(Some(3), 0).per_page(), 1);
        assert_eq!(PageRequest::new(Some(3), 500).per_page(), MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(Some(3), 15).offset(), 30);
    }

    #[test]
    fn page_query_values_fall_back_to_none() {
        assert_eq!(PageRequest::parse_page(Some("2")), Some(2));
        assert_eq!(PageRequest::parse_page(Some(" 4 ")), Some(4));
        assert_eq!(PageRequest::parse_page(Some("0")), None);
        assert_eq!(PageRequest::parse_page(Some("-1")), None);
        assert_eq!(PageRequest::parse_page(Some("two")), None);
        assert_eq!(PageRequest::parse_page(None), None);
    }

    #[test]
    fn twenty_rows_span_two_pages_of_fifteen() {
        let first = PageMeta::new(PageRequest::new(Some(1), 15), 15, 20);
        assert_eq!(first.last_page, 2);
        assert_eq!((first.from, first.to), (Some(1), Some(15)));

        let second = PageMeta::new(PageRequest::new(Some(2), 15), 5, 20);
        assert_eq!((second.from, second.to), (Some(16), Some(20)));

        let third = PageMeta::new(PageRequest::new(Some(3), 15), 0, 20);
        assert_eq!(third.current_page, 3);
        assert_eq!(third.last_page, 2);
        assert_eq!((third.from, third.to), (None, None));
    }

    #[test]
    fn empty_table_still_has_one_page() {
        let meta = PageMeta::new(PageRequest::default(), 0, 0);
        assert_eq!(meta.last_page, 1);
        assert_eq!(meta.total, 0);
    }
}
