use url::Url;

const DIRECT_DOWNLOAD: &str = "dl=1";
const PREVIEW_MARKERS: [&str; 2] = ["dl=0", "raw=1"];

/// Rewrite share-page markers (`dl=0`, `raw=1`) so the locator serves raw bytes.
///
/// Only the query component is touched. Locators that are not URLs, such as local
/// paths, come back unchanged.
#[must_use]
pub fn direct_download_locator(locator: &str) -> String {
    let trimmed = locator.trim();
    let Ok(mut url) = Url::parse(trimmed) else {
        return trimmed.to_string();
    };
    let Some(query) = url.query() else {
        return trimmed.to_string();
    };

    let mut has_direct = false;
    let mut rewritten = false;
    let mut pairs: Vec<&str> = Vec::new();
    for pair in query.split('&') {
        let pair = if PREVIEW_MARKERS.contains(&pair) {
            rewritten = true;
            DIRECT_DOWNLOAD
        } else {
            pair
        };
        if pair == DIRECT_DOWNLOAD {
            if has_direct {
                continue;
            }
            has_direct = true;
        }
        pairs.push(pair);
    }

    if !rewritten {
        return trimmed.to_string();
    }
    let query = pairs.join("&");
    url.set_query(Some(&query));
    url.to_string()
}
