//! URL slugs shared by every catalog entity.

use regex::Regex;
use std::future::Future;
use std::sync::LazyLock;

/// Runs of anything that is not a lowercase ASCII letter or digit
static NON_ALPHANUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Upper bound on `base-N` candidates tried before giving up.
pub const MAX_SLUG_ATTEMPTS: usize = 1000;

/// Lowercase, collapse non-alphanumeric runs into `-`, trim dashes.
///
/// `fallback` is returned when nothing slug-able is left, so each entity
/// kind names its own (`product`, `category`, ...).
///
/// ```
/// use domain_categories::slug::slugify;
///
/// assert_eq!(slugify("  Red Widget (XL)! ", "product"), "red-widget-xl");
/// assert_eq!(slugify("***", "category"), "category");
/// ```
pub fn slugify(name: &str, fallback: &str) -> String {
    let lowered = name.to_lowercase();
    let slug = NON_ALPHANUMERIC.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug.to_string()
    }
}

/// The n-th candidate for a base slug: `base`, `base-1`, `base-2`, ...
pub fn candidate(base: &str, n: usize) -> String {
    if n == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, n)
    }
}

/// First candidate for `name` that `is_taken` reports free.
///
/// Returns `Ok(None)` after [`MAX_SLUG_ATTEMPTS`] taken candidates.
pub async fn unique_slug<F, Fut, E>(
    name: &str,
    fallback: &str,
    mut is_taken: F,
) -> Result<Option<String>, E>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let base = slugify(name, fallback);

    for n in 0..MAX_SLUG_ATTEMPTS {
        let slug = candidate(&base, n);
        if !is_taken(slug.clone()).await? {
            return Ok(Some(slug));
        }
    }

    Ok(None)
}
