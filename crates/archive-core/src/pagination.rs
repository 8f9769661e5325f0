use crate::error::Result;

/// Page size GitHub allows at most
pub const MAX_PER_PAGE: usize = 100;

/// Fetch every page of a resource
///
/// `fetch_page` receives a 1-based page number and the page size. Requests
/// stop at the first empty page or the first page shorter than `per_page`.
pub fn fetch_all_pages<T, F>(mut fetch_page: F, per_page: usize) -> Result<Vec<T>>
where
    F: FnMut(usize, usize) -> Result<Vec<T>>,
{
    let per_page = per_page.clamp(1, MAX_PER_PAGE);
    let mut all_results = Vec::new();
    let mut page = 1;

    loop {
        let page_results = fetch_page(page, per_page)?;
        let page_len = page_results.len();
        all_results.extend(page_results);

        if page_len < per_page {
            break;
        }
        page += 1;
    }

    Ok(all_results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(data: &[i32], page: usize, per_page: usize) -> Vec<i32> {
        data.iter()
            .copied()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect()
    }

    #[test]
    fn fetch_all_pages_single_page() {
        let data = [1, 2, 3];
        let result = fetch_all_pages(|page, per_page| Ok(page_of(&data, page, per_page)), 10).unwrap();
        assert_eq!(result, vec![1, 2, 3]);
    }

    #[test]
    fn fetch_all_pages_multiple_pages() {
        let data: Vec<i32> = (1..=25).collect();
        let result = fetch_all_pages(|page, per_page| Ok(page_of(&data, page, per_page)), 10).unwrap();
        assert_eq!(result, data);
    }

    #[test]
    fn fetch_all_pages_exact_multiple_requests_trailing_empty_page() {
        let data: Vec<i32> = (1..=20).collect();
        let mut requested = Vec::new();
        let result = fetch_all_pages(
            |page, per_page| {
                requested.push(page);
                Ok(page_of(&data, page, per_page))
            },
            10,
        )
        .unwrap();
        assert_eq!(result.len(), 20);
        assert_eq!(requested, vec![1, 2, 3]);
    }

    #[test]
    fn fetch_all_pages_empty_first_page() {
        let result: Result<Vec<i32>> = fetch_all_pages(|_, _| Ok(vec![]), 10);
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn fetch_all_pages_clamps_page_size() {
        let mut sizes = Vec::new();
        let _: Vec<i32> = fetch_all_pages(
            |_, per_page| {
                sizes.push(per_page);
                Ok(vec![])
            },
            500,
        )
        .unwrap();
        assert_eq!(sizes, vec![MAX_PER_PAGE]);
    }

    #[test]
    fn fetch_all_pages_propagates_error() {
        let mut call_count = 0;
        let result: Result<Vec<i32>> = fetch_all_pages(
            |_, _| {
                call_count += 1;
                if call_count == 1 {
                    Ok(vec![1, 2, 3, 4, 5])
                } else {
                    Err(crate::error::ArchiveError::Source("server error".to_string()))
                }
            },
            5,
        );
        assert!(result.is_err());
        assert_eq!(call_count, 2);
    }
}
