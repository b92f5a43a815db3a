//! Maps raw upstream payloads onto the canonical profile record.
//!
//! The upstream payload is treated as untyped JSON. Required fields are checked
//! explicitly and the mapping fails closed: a missing or mistyped field is a
//! [`ProfileError::Normalization`], never a silently defaulted value.

use serde_json::{Map, Value};

use crate::domain::entities::NewProfile;
use crate::domain::errors::{ProfileError, ProfileResult};

/// Schemes that are kept as-is when found at the start of a website.
const RECOGNIZED_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Scheme prefixed to websites that have none.
const DEFAULT_SCHEME: &str = "https://";

/// Normalizes an upstream payload into a [`NewProfile`].
///
/// # Rules
///
/// 1. `id` must be an integer and `name`, `username`, `email`, `website` strings
/// 2. `company.name` is flattened into `company_name`; other company fields are dropped
/// 3. A missing or null `company` yields an empty `company_name`
/// 4. `website` gets an `https://` prefix unless it already has a recognized scheme
/// 5. Every other upstream field is discarded
///
/// # Errors
///
/// Returns [`ProfileError::Normalization`] if the payload is not an object or any
/// rule above is violated.
///
/// # Examples
///
/// ```
/// use profile_cache::domain::normalizer::normalize;
/// use serde_json::json;
///
/// let profile = normalize(&json!({
///     "id": 1,
///     "name": "Leanne Graham",
///     "username": "Bret",
///     "email": "Sincere@april.biz",
///     "website": "hildegard.org",
///     "company": { "name": "Romaguera-Crona", "bs": "harness real-time e-markets" }
/// }))
/// .unwrap();
///
/// assert_eq!(profile.website, "https://hildegard.org");
/// assert_eq!(profile.company_name, "Romaguera-Crona");
/// ```
pub fn normalize(raw: &Value) -> ProfileResult<NewProfile> {
    let object = raw
        .as_object()
        .ok_or_else(|| ProfileError::normalization("payload is not a JSON object"))?;

    let id = object
        .get("id")
        .ok_or_else(|| ProfileError::normalization("missing field `id`"))?
        .as_i64()
        .ok_or_else(|| ProfileError::normalization("field `id` is not an integer"))?;

    let website = normalize_website(&required_str(object, "website")?)?;

    Ok(NewProfile {
        id,
        name: required_str(object, "name")?,
        username: required_str(object, "username")?,
        email: required_str(object, "email")?,
        website,
        company_name: company_name(object)?,
    })
}

/// Ensures a website carries an explicit scheme.
///
/// Surrounding whitespace is trimmed. `http://` and `https://` prefixes are
/// matched case-insensitively and left untouched.
///
/// # Errors
///
/// Returns [`ProfileError::Normalization`] for an empty website.
pub fn normalize_website(website: &str) -> ProfileResult<String> {
    let website = website.trim();

    if website.is_empty() {
        return Err(ProfileError::normalization("field `website` is empty"));
    }

    let has_scheme = RECOGNIZED_SCHEMES.iter().any(|scheme| {
        website
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    });

    if has_scheme {
        Ok(website.to_string())
    } else {
        Ok(format!("{DEFAULT_SCHEME}{website}"))
    }
}

fn required_str(object: &Map<String, Value>, field: &str) -> ProfileResult<String> {
    match object.get(field) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(ProfileError::normalization(format!(
            "field `{field}` is not a string"
        ))),
        None => Err(ProfileError::normalization(format!(
            "missing field `{field}`"
        ))),
    }
}

fn company_name(object: &Map<String, Value>) -> ProfileResult<String> {
    match object.get("company") {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::Object(company)) => match company.get("name") {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::String(name)) => Ok(name.clone()),
            Some(_) => Err(ProfileError::normalization(
                "field `company.name` is not a string",
            )),
        },
        Some(_) => Err(ProfileError::normalization(
            "field `company` is not an object",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn leanne() -> Value {
        json!({
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "x@y.com",
            "address": { "street": "Kulas Light", "city": "Gwenborough" },
            "phone": "1-770-736-8031 x56442",
            "website": "hildegard.org",
            "company": {
                "name": "Romaguera-Crona",
                "catchPhrase": "Multi-layered client-server neural-net",
                "bs": "harness real-time e-markets"
            }
        })
    }

    fn reason(err: ProfileError) -> String {
        match err {
            ProfileError::Normalization { reason } => reason,
            other => panic!("expected normalization error, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_full_payload() {
        let profile = normalize(&leanne()).unwrap();

        assert_eq!(
            profile,
            NewProfile {
                id: 1,
                name: "Leanne Graham".to_string(),
                username: "Bret".to_string(),
                email: "x@y.com".to_string(),
                website: "https://hildegard.org".to_string(),
                company_name: "Romaguera-Crona".to_string(),
            }
        );
    }

    #[test]
    fn test_website_with_https_untouched() {
        let mut raw = leanne();
        raw["website"] = json!("https://bar.com");

        assert_eq!(normalize(&raw).unwrap().website, "https://bar.com");
    }

    #[test]
    fn test_website_with_http_untouched() {
        assert_eq!(
            normalize_website("http://anastasia.net").unwrap(),
            "http://anastasia.net"
        );
    }

    #[test]
    fn test_website_scheme_case_insensitive() {
        assert_eq!(
            normalize_website("HTTPS://ramiro.info").unwrap(),
            "HTTPS://ramiro.info"
        );
    }

    #[test]
    fn test_website_trimmed() {
        assert_eq!(
            normalize_website("  kale.biz ").unwrap(),
            "https://kale.biz"
        );
    }

    #[test]
    fn test_website_other_scheme_gets_prefix() {
        assert_eq!(
            normalize_website("ftp.example.com").unwrap(),
            "https://ftp.example.com"
        );
    }

    #[test]
    fn test_website_short_value() {
        assert_eq!(normalize_website("a.io").unwrap(), "https://a.io");
    }

    #[test]
    fn test_website_empty_rejected() {
        assert!(normalize_website("   ").is_err());
    }

    #[test]
    fn test_missing_id() {
        let mut raw = leanne();
        raw.as_object_mut().unwrap().remove("id");

        assert_eq!(reason(normalize(&raw).unwrap_err()), "missing field `id`");
    }

    #[test]
    fn test_missing_name() {
        let mut raw = leanne();
        raw.as_object_mut().unwrap().remove("name");

        assert_eq!(reason(normalize(&raw).unwrap_err()), "missing field `name`");
    }

    #[test]
    fn test_string_id_rejected() {
        let mut raw = leanne();
        raw["id"] = json!("1");

        assert!(normalize(&raw).is_err());
    }

    #[test]
    fn test_null_name_rejected() {
        let mut raw = leanne();
        raw["name"] = Value::Null;

        assert_eq!(
            reason(normalize(&raw).unwrap_err()),
            "field `name` is not a string"
        );
    }

    #[test]
    fn test_missing_company_is_empty() {
        let mut raw = leanne();
        raw.as_object_mut().unwrap().remove("company");

        assert_eq!(normalize(&raw).unwrap().company_name, "");
    }

    #[test]
    fn test_company_without_name_is_empty() {
        let mut raw = leanne();
        raw["company"] = json!({ "bs": "synergize" });

        assert_eq!(normalize(&raw).unwrap().company_name, "");
    }

    #[test]
    fn test_flat_company_rejected() {
        let mut raw = leanne();
        raw["company"] = json!("Romaguera-Crona");

        assert!(normalize(&raw).is_err());
    }

    #[test]
    fn test_non_object_payload_rejected() {
        assert!(normalize(&json!([1, 2, 3])).is_err());
        assert!(normalize(&json!({})).is_err());
    }
}
