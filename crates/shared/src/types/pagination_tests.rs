use super::*;
use proptest::prelude::*;

#[test]
fn test_page_request_default() {
    let request = PageRequest::default();
    assert_eq!(request.page, 1);
    assert_eq!(request.per_page, 10);
}

#[test]
fn test_page_request_offset() {
    assert_eq!(PageRequest::new(1, 10).offset(), 0);
    assert_eq!(PageRequest::new(2, 10).offset(), 10);
    assert_eq!(PageRequest::new(3, 10).offset(), 20);
}

#[test]
fn test_normalized_clamps_values() {
    assert_eq!(PageRequest::new(0, 0), PageRequest { page: 1, per_page: 10 });
    assert_eq!(PageRequest::new(2, 500).per_page, MAX_PER_PAGE);
    assert_eq!(PageRequest::new(4, 25), PageRequest { page: 4, per_page: 25 });
}

#[test]
fn test_query_string_defaults() {
    let request: PageRequest = serde_json::from_str("{}").unwrap();
    assert_eq!(request, PageRequest::default());
}

#[test]
fn test_twenty_five_rows_three_pages() {
    // 25 rows, 10 per page: page 3 holds the last 5, page 4 is past the end
    let meta = PageMeta::new(PageRequest::new(3, 10), 25);
    assert_eq!(meta.total_pages, 3);

    let page3 = PageRequest::new(3, 10);
    assert_eq!(page3.offset(), 20);
    assert_eq!(25 - page3.offset(), 5);

    let page4 = PageRequest::new(4, 10);
    assert!(page4.offset() >= 25);
}

#[test]
fn test_zero_total_has_zero_pages() {
    let response: PageResponse<i32> = PageResponse::new(vec![], PageRequest::default(), 0);
    assert_eq!(response.meta.total_pages, 0);
    assert_eq!(response.meta.total, 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_total_pages_is_ceiling(total in 0u64..100_000, per_page in 1u32..=100) {
        let meta = PageMeta::new(PageRequest::new(1, per_page), total);
        let per_page = u64::from(per_page);
        prop_assert!(meta.total_pages * per_page >= total);
        prop_assert!(meta.total_pages == 0 || (meta.total_pages - 1) * per_page < total);
    }

    #[test]
    fn prop_normalized_is_in_bounds(page in any::<u32>(), per_page in any::<u32>()) {
        let request = PageRequest::new(page, per_page);
        prop_assert!(request.page >= 1);
        prop_assert!((1..=MAX_PER_PAGE).contains(&request.per_page));
        prop_assert_eq!(request, request.normalized());
    }

    #[test]
    fn prop_pages_tile_without_overlap(page in 1u32..1000, per_page in 1u32..=100) {
        let current = PageRequest::new(page, per_page);
        let next = PageRequest::new(page + 1, per_page);
        prop_assert_eq!(current.offset() + current.limit(), next.offset());
    }
}
