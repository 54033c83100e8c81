//! Pagination headers: `X-Total-Count` and an RFC 5988 `Link`

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Uri};

use crate::{
    error::{AppError, AppResult},
    models::Page,
};

pub static TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");

fn page_uri(uri: &Uri, page: u64, size: u64) -> String {
    let kept: Vec<&str> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty() && !pair.starts_with("page=") && !pair.starts_with("size="))
        .collect();

    let mut query = kept.join("&");
    if !query.is_empty() {
        query.push('&');
    }
    format!("{}?{}page={}&size={}", uri.path(), query, page, size)
}

/// `Link` header value: next, prev, last, first
pub fn link_header<T>(uri: &Uri, page: &Page<T>) -> String {
    let last = page.total_pages().saturating_sub(1);
    let mut links = Vec::with_capacity(4);

    if page.has_next() {
        links.push(format!("<{}>; rel=\"next\"", page_uri(uri, page.number.saturating_add(1), page.size)));
    }
    if page.has_previous() {
        links.push(format!("<{}>; rel=\"prev\"", page_uri(uri, page.number.saturating_sub(1), page.size)));
    }
    links.push(format!("<{}>; rel=\"last\"", page_uri(uri, last, page.size)));
    links.push(format!("<{}>; rel=\"first\"", page_uri(uri, 0, page.size)));

    links.join(",")
}

pub fn headers<T>(uri: &Uri, page: &Page<T>) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(TOTAL_COUNT.clone(), HeaderValue::from(page.total_elements));
    headers.insert(
        header::LINK,
        HeaderValue::from_str(&link_header(uri, page))
            .map_err(|e| AppError::Internal(format!("invalid link header: {e}")))?,
    );
    Ok(headers)
}
