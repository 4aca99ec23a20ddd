//! Cursor pagination over page-at-a-time listings.

use std::future::Future;

use crate::error::CatalogError;
use crate::types::Page;
use crate::CatalogResult;

/// Requests pages until the continuation token is absent and returns every item.
///
/// The first request carries no token. An empty first page yields an empty
/// list. A token repeated back-to-back is treated as a broken response rather
/// than followed forever.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> CatalogResult<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = CatalogResult<Page<T>>>,
{
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = fetch(token.clone()).await?;
        pages += 1;
        items.extend(page.items);

        match page.next_token.filter(|t| !t.is_empty()) {
            Some(next) if token.as_deref() == Some(next.as_str()) => {
                return Err(CatalogError::invalid_response(
                    "pagination",
                    format!("continuation token {next} repeated"),
                ));
            }
            Some(next) => token = Some(next),
            None => break,
        }
    }

    tracing::trace!(pages, items = items.len(), "pagination complete");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn follows_tokens_until_absent() {
        let requested = Mutex::new(Vec::new());
        let items = collect_pages(|token: Option<String>| {
            requested.lock().unwrap().push(token.clone());
            async move {
                Ok(match token.as_deref() {
                    None => Page::with_next(vec![1, 2], "p2"),
                    Some("p2") => Page::with_next(vec![3], "p3"),
                    Some("p3") => Page::last(vec![4, 5]),
                    Some(other) => panic!("unexpected token {other}"),
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert_eq!(
            *requested.lock().unwrap(),
            vec![None, Some("p2".to_string()), Some("p3".to_string())]
        );
    }

    #[tokio::test]
    async fn empty_listing_is_empty_not_error() {
        let items: Vec<String> = collect_pages(|_| async { Ok(Page::last(Vec::new())) })
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn empty_token_ends_pagination() {
        let items = collect_pages(|_| async { Ok(Page::with_next(vec!["a"], "")) })
            .await
            .unwrap();
        assert_eq!(items, vec!["a"]);
    }

    #[tokio::test]
    async fn repeated_token_is_rejected() {
        let err = collect_pages(|_| async { Ok(Page::with_next(vec![0u8], "same")) })
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn errors_propagate() {
        let err = collect_pages::<u8, _, _>(|_| async {
            Err(CatalogError::remote("ListPortfolios", "Throttling"))
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Throttling"));
    }
}
