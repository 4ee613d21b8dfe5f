//! Slug substitution for URL templates.
//!
//! A slug is a `:name` token inside a URL template. Substitution only
//! happens at a word boundary, so `:id` never matches inside `:idx`.

use std::collections::BTreeMap;

use regex::Regex;

/// Replace every `:key` token in `url` with the corresponding slug value.
///
/// Keys without a matching token leave the template unchanged; tokens
/// without a matching key are left in place.
pub fn apply(url: &str, slugs: &BTreeMap<String, String>) -> String {
    let mut out = url.to_string();
    for (key, value) in slugs {
        let needle = Regex::new(&format!(r":{}\b", regex::escape(key)))
            .expect("escaped slug key is a valid regex");
        out = needle.replace_all(&out, value.as_str()).into_owned();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slugs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_apply_substitutes_token() {
        let out = apply("/a/:id/b", &slugs(&[("id", "42")]));
        assert_eq!(out, "/a/42/b");
    }

    #[test]
    fn test_apply_does_not_partial_match() {
        let out = apply("/a/:idx/b", &slugs(&[("id", "42")]));
        assert_eq!(out, "/a/:idx/b");
    }

    #[test]
    fn test_apply_token_at_end() {
        let out = apply("/orders/:orderId", &slugs(&[("orderId", "o-1")]));
        assert_eq!(out, "/orders/o-1");
    }

    #[test]
    fn test_apply_multiple_slugs() {
        let out = apply(
            "/:market/orders/:id",
            &slugs(&[("market", "spot"), ("id", "9")]),
        );
        assert_eq!(out, "/spot/orders/9");
    }
}
