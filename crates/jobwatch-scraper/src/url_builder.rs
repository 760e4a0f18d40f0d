use jobwatch_core::{Country, PLACEHOLDER};
use url::Url;

/// Fill the `{country}` placeholder with the percent-encoded country name.
pub fn build_search_url(template: &str, country: &Country) -> String {
    template.replace("{country}", &urlencoding::encode(country.as_str()))
}

/// Rewrite a scraped job href onto the canonical site origin.
///
/// Links on any subdomain of `host` (`nl.linkedin.com`, ...) keep their path
/// and query but move to `base_url`. Relative links are joined onto
/// `base_url`. Links to other hosts are kept as they are.
pub fn normalize_job_link(href: &str, base_url: &str, host: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return PLACEHOLDER.to_string();
    }

    let Ok(base) = Url::parse(base_url) else {
        return href.to_string();
    };

    match Url::parse(href) {
        Ok(url) => {
            let on_site = url
                .host_str()
                .is_some_and(|h| h == host || h.ends_with(&format!(".{host}")));
            if !on_site {
                return url.to_string();
            }

            let mut canonical = base;
            canonical.set_path(url.path());
            canonical.set_query(url.query());
            canonical.set_fragment(None);
            canonical.to_string()
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => base
            .join(href)
            .map_or_else(|_| href.to_string(), |url| url.to_string()),
        Err(_) => href.to_string(),
    }
}
