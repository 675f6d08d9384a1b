//! Security headers middleware for XSS, clickjacking, and isolation protection.
//!
//! Adds restrictive security headers to all responses. Start locked down and
//! loosen only when specific functionality requires it.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use super::csp::CspNonce;

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY` - Prevent clickjacking
/// - `X-Content-Type-Options: nosniff` - Prevent MIME sniffing
/// - `Referrer-Policy: no-referrer` - Zero referrer leakage
/// - `Content-Security-Policy` - Strict CSP (see below)
/// - `Permissions-Policy` - Deny sensitive browser features
/// - `Cache-Control` - `no-store` for pages (they carry session-scoped
///   data), long-lived for static assets, immutable for content-hashed CSS
/// - `Cross-Origin-Opener-Policy: same-origin` - Process isolation
/// - `Cross-Origin-Resource-Policy: same-origin` - Resource isolation
/// - `Cross-Origin-Embedder-Policy: credentialless` - Isolation that still
///   admits cross-origin product images
/// - `X-DNS-Prefetch-Control: off` - Prevent DNS prefetch leakage
///
/// # CSP Policy
///
/// ```text
/// default-src 'none';
/// script-src 'self' https://unpkg.com 'nonce-<per-request>';
/// style-src 'self';
/// font-src 'self';
/// img-src 'self' https:;
/// connect-src 'self';
/// frame-src 'none';
/// object-src 'none';
/// base-uri 'self';
/// form-action 'self';
/// frame-ancestors 'none';
/// upgrade-insecure-requests
/// ```
///
/// `script-src` admits unpkg for the htmx bundle and the per-request nonce
/// for our own inline snippets. `img-src https:` is as narrow as we can get
/// while product and sticker images live on whatever media host the backend
/// hands out.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    // Nonce was placed in extensions by csp_nonce_middleware, which must
    // run before this layer
    let nonce = request.extensions().get::<CspNonce>().cloned();
    let cache_control = cache_control_for(request.uri().path());

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    // Prevent clickjacking
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    // Prevent MIME sniffing
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

    // Zero referrer leakage (stricter than same-origin)
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));

    headers.insert(CONTENT_SECURITY_POLICY, build_csp_header(nonce.as_ref()));

    // Permissions Policy - deny the features a shop page has no use for
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(
            "accelerometer=(), \
             autoplay=(), \
             battery=(), \
             camera=(), \
             display-capture=(), \
             geolocation=(), \
             gyroscope=(), \
             magnetometer=(), \
             microphone=(), \
             midi=(), \
             payment=(), \
             screen-wake-lock=(), \
             serial=(), \
             usb=(), \
             xr-spatial-tracking=()",
        ),
    );

    headers.insert(HeaderName::from_static("cache-control"), cache_control);

    // Cross-Origin policies for additional isolation
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    headers.insert(
        HeaderName::from_static("cross-origin-resource-policy"),
        HeaderValue::from_static("same-origin"),
    );

    // credentialless rather than require-corp: the backend's media host
    // does not set CORP headers on images
    headers.insert(
        HeaderName::from_static("cross-origin-embedder-policy"),
        HeaderValue::from_static("credentialless"),
    );

    // Prevent DNS prefetching to avoid leaking which links user hovers over
    headers.insert(
        HeaderName::from_static("x-dns-prefetch-control"),
        HeaderValue::from_static("off"),
    );

    response
}

/// Pick the cache policy for a request path.
///
/// Derived CSS filenames carry a content hash, so those responses never
/// change; everything that is not a static asset may hold session-scoped
/// data and must not be cached at all.
fn cache_control_for(path: &str) -> HeaderValue {
    if path.starts_with("/static/css/derived/") {
        HeaderValue::from_static("public, max-age=31536000, immutable")
    } else if path.starts_with("/static/") {
        HeaderValue::from_static("public, max-age=3600")
    } else {
        HeaderValue::from_static("no-store, max-age=0")
    }
}

/// Build the CSP header value, folding in the per-request script nonce.
fn build_csp_header(nonce: Option<&CspNonce>) -> HeaderValue {
    if let Some(nonce) = nonce {
        let policy = format!(
            "default-src 'none'; \
             script-src 'self' https://unpkg.com 'nonce-{}'; \
             style-src 'self'; \
             font-src 'self'; \
             img-src 'self' https:; \
             connect-src 'self'; \
             frame-src 'none'; \
             object-src 'none'; \
             base-uri 'self'; \
             form-action 'self'; \
             frame-ancestors 'none'; \
             upgrade-insecure-requests",
            nonce.value()
        );

        if let Ok(value) = HeaderValue::from_str(&policy) {
            return value;
        }
        tracing::warn!("CSP nonce produced an invalid header value, falling back");
    } else {
        tracing::warn!("CSP nonce missing from request extensions, inline scripts will be blocked");
    }

    // Without a usable nonce, serve the same policy minus inline scripts
    HeaderValue::from_static(
        "default-src 'none'; \
         script-src 'self' https://unpkg.com; \
         style-src 'self'; \
         font-src 'self'; \
         img-src 'self' https:; \
         connect-src 'self'; \
         frame-src 'none'; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self'; \
         frame-ancestors 'none'; \
         upgrade-insecure-requests",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csp_header_includes_nonce() {
        let nonce = CspNonce::generate();
        let header = build_csp_header(Some(&nonce));
        let value = header.to_str().unwrap();
        assert!(value.contains(&format!("'nonce-{}'", nonce.value())));
        assert!(value.contains("script-src 'self' https://unpkg.com"));
    }

    #[test]
    fn csp_header_without_nonce_omits_nonce_source() {
        let header = build_csp_header(None);
        let value = header.to_str().unwrap();
        assert!(!value.contains("nonce-"));
        assert!(value.contains("default-src 'none'"));
    }

    #[test]
    fn pages_are_never_cached_but_hashed_css_is_immutable() {
        assert_eq!(cache_control_for("/cart"), "no-store, max-age=0");
        assert_eq!(cache_control_for("/"), "no-store, max-age=0");
        assert_eq!(cache_control_for("/static/css/main.css"), "public, max-age=3600");
        assert_eq!(
            cache_control_for("/static/css/derived/main.df9f7a91.css"),
            "public, max-age=31536000, immutable"
        );
    }
}
