//! Request body validation, independent of the HTTP layer.
//!
//! Body types derive [`validator::Validate`]; [`parse`] decodes the JSON,
//! runs the rules and reduces the outcome to either the typed value or the
//! first failure as a [`ValidationError`] naming the offending field.
//!
//! ```rust
//! use postboard::validate::post_fields;
//!
//! let post = post_fields(br#"{"title":"A","contents":"B"}"#).unwrap();
//! assert_eq!(post.title, "A");
//!
//! let err = post_fields(br#"{"title":"A"}"#).unwrap_err();
//! assert_eq!(err.field, "contents");
//! assert_eq!(err.to_string(), r#""contents" is required"#);
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use validator::Validate;

use crate::model::{CommentFields, NewPost, PostFields};

/// Label used when the failure concerns the body as a whole.
const ROOT: &str = "value";

/// The first rule a request body broke.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self { field: field.to_owned(), message: message.into() }
    }
}

/// A request body with validation rules.
pub trait Body: DeserializeOwned + Validate {
    /// Validated fields in the order failures are reported.
    const FIELDS: &'static [&'static str];
}

impl Body for PostFields {
    const FIELDS: &'static [&'static str] = &["title", "contents"];
}

impl Body for CommentFields {
    const FIELDS: &'static [&'static str] = &["text"];
}

/// Decode `body` as a JSON object and check it against `T`'s rules.
///
/// An empty body reads as `{}`, so it reports the first missing field.
/// Keys `T` does not declare are ignored.
pub fn parse<T: Body>(body: &[u8]) -> Result<T, ValidationError> {
    let value: Value = if body.trim_ascii().is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_slice(body).map_err(|_| {
            ValidationError::new(ROOT, format!("\"{ROOT}\" must be a valid JSON object"))
        })?
    };
    if !value.is_object() {
        return Err(ValidationError::new(ROOT, format!("\"{ROOT}\" must be an object")));
    }

    let parsed: T = serde_json::from_value(value)
        .map_err(|e| ValidationError::new(ROOT, e.to_string()))?;

    if let Err(errors) = parsed.validate() {
        let fields = errors.field_errors();
        let first = T::FIELDS.iter().find_map(|&name| {
            let error = fields.get(name)?.first()?;
            let message = match &error.message {
                Some(message) => message.to_string(),
                None => format!("\"{name}\" failed `{}`", error.code),
            };
            Some(ValidationError::new(name, message))
        });
        return Err(first.unwrap_or_else(|| ValidationError::new(ROOT, errors.to_string())));
    }
    Ok(parsed)
}

/// `{title, contents}`, both required non-empty strings.
pub fn post_fields(body: &[u8]) -> Result<NewPost, ValidationError> {
    let fields: PostFields = parse(body)?;
    // Both are `Some` once validation passed.
    Ok(NewPost {
        title: fields.title.unwrap_or_default(),
        contents: fields.contents.unwrap_or_default(),
    })
}

/// `{text}`, a required non-empty string.
pub fn comment_text(body: &[u8]) -> Result<String, ValidationError> {
    let fields: CommentFields = parse(body)?;
    Ok(fields.text.unwrap_or_default())
}
