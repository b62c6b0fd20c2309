//! URL validators, over URL strings.

use serde_json::Value;
use url::Url;

use crate::macros::declare_type;
use crate::tree::Kind;
use crate::types::leaf;

const KIND: Kind = Kind::new("a url");

declare_type! {
    /// Typed validator for absolute URL strings.
    pub struct UrlValidator / NegatedUrlValidator : KIND;
}

fn is_url(x: &Value) -> bool {
    x.as_str().is_some_and(|s| Url::parse(s).is_ok())
}

/// Succeeds when the input is a string parsing as an absolute URL.
#[must_use]
pub fn url() -> UrlValidator {
    UrlValidator::from_validator(leaf(is_url, "a url".into(), KIND))
}

/// Like [`url`], additionally accepting relative references and resolving
/// them against `base`. The yielded value is the resolved absolute URL
/// string, so this transforms its input.
#[must_use]
pub fn url_with_base(base: Url) -> UrlValidator {
    let resolved = crate::types::string::string()
        .into_validator()
        .map(move |x| {
            let joined = x.as_str().and_then(|s| base.join(s).ok());
            match joined {
                Some(u) => Value::String(u.to_string()),
                None => x,
            }
        })
        .and(crate::engine::Validator::check(is_url))
        .label_kind("a url", Some(KIND));
    UrlValidator::from_validator(resolved)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn absolute_urls_pass_untouched() {
        let input = json!("https://example.com/a?b=1");
        assert_eq!(url().run(input.clone()).unwrap(), input);
    }

    #[test]
    fn relative_references_fail_without_a_base() {
        let err = url().run(json!("/docs")).unwrap_err();
        assert_eq!(err.expected(), "a url");
    }

    #[test]
    fn a_base_resolves_relative_references() {
        let base = Url::parse("https://example.com/root/").unwrap();
        let validator = url_with_base(base);
        assert_eq!(
            validator.run(json!("docs")).unwrap(),
            json!("https://example.com/root/docs")
        );
        assert!(validator.run(json!(12)).is_err());
    }
}
