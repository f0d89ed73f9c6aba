use serde::Serialize;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 25;

/// Page/limit pair, both clamped to at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: Option<usize>, limit: Option<usize>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).max(1),
        }
    }

    /// Lenient parse of raw query values; anything that is not a positive
    /// integer falls back to the default.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(parse_positive(page), parse_positive(limit))
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total: usize,
    pub page_count: usize,
}

pub fn page_count(total: usize, limit: usize) -> usize {
    let limit = limit.max(1);
    (total / limit + usize::from(total % limit != 0)).max(1)
}

/// Slices `items` to the requested page. Out-of-range pages yield no items but
/// still report the full `total` and `page_count`.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len();
    let items = items
        .into_iter()
        .skip(request.offset())
        .take(request.limit)
        .collect();

    Page {
        items,
        page: request.page,
        total,
        page_count: page_count(total, request.limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_is_at_least_one() {
        assert_eq!(page_count(0, 25), 1);
        assert_eq!(page_count(1, 25), 1);
        assert_eq!(page_count(25, 25), 1);
        assert_eq!(page_count(26, 25), 2);
        assert_eq!(page_count(25, 10), 3);
    }

    #[test]
    fn page_count_handles_huge_limits() {
        assert_eq!(page_count(25, usize::MAX), 1);
        assert_eq!(page_count(usize::MAX, usize::MAX), 1);
        assert_eq!(page_count(usize::MAX, 1), usize::MAX);
    }

    #[test]
    fn huge_limit_returns_everything_on_one_page() {
        let request = PageRequest::parse(None, Some(&usize::MAX.to_string()));
        assert_eq!(request.limit, usize::MAX);
        let page = paginate((1..=25).collect::<Vec<_>>(), request);
        assert_eq!(page.items.len(), 25);
        assert_eq!(page.page_count, 1);

        let second = paginate((1..=25).collect::<Vec<_>>(), PageRequest::new(Some(2), Some(usize::MAX)));
        assert!(second.items.is_empty());
        assert_eq!(second.page_count, 1);
    }

    #[test]
    fn page_count_matches_ceiling_division() {
        for total in 0..200usize {
            for limit in 1..30usize {
                let expected = std::cmp::max(1, (total as f64 / limit as f64).ceil() as usize);
                assert_eq!(page_count(total, limit), expected, "total={total} limit={limit}");
            }
        }
    }

    #[test]
    fn second_page_of_twenty_five() {
        let page = paginate((1..=25).collect::<Vec<_>>(), PageRequest::new(Some(2), Some(10)));
        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.page, 2);
        assert_eq!(page.total, 25);
        assert_eq!(page.page_count, 3);
    }

    #[test]
    fn out_of_range_page_is_empty_with_metadata() {
        let page = paginate((1..=25).collect::<Vec<_>>(), PageRequest::new(Some(9), Some(10)));
        assert!(page.items.is_empty());
        assert_eq!(page.page, 9);
        assert_eq!(page.total, 25);
        assert_eq!(page.page_count, 3);
    }

    #[test]
    fn clamps_zero_values() {
        assert_eq!(PageRequest::new(Some(0), Some(0)), PageRequest { page: 1, limit: 1 });
    }

    #[test]
    fn lenient_parse_falls_back_to_defaults() {
        assert_eq!(PageRequest::parse(Some("abc"), Some("-5")), PageRequest::default());
        assert_eq!(PageRequest::parse(Some("0"), None), PageRequest::default());
        assert_eq!(
            PageRequest::parse(Some(" 3 "), Some("50")),
            PageRequest { page: 3, limit: 50 }
        );
    }

    #[test]
    fn serializes_page_count_in_camel_case() {
        let page = paginate(vec![1, 2, 3], PageRequest::default());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pageCount"], 1);
        assert_eq!(json["total"], 3);
    }
}
