//! Record <-> JSON conversion and payload validation with field-level messages.

use crate::error::{AppError, FieldErrors};
use crate::extractors::Payload;
use crate::model::{Account, AccountId, Language, NewSnippet, Snippet, SnippetChanges, SnippetId, Style};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::str::FromStr;

pub const TITLE_MAX_CHARS: usize = 100;

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";
const NOT_BLANK: &str = "This field may not be blank.";
const NOT_STRING: &str = "Not a valid string.";
const NOT_BOOL: &str = "Must be a valid boolean.";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SnippetRepr {
    pub id: SnippetId,
    pub title: String,
    pub code: String,
    pub linenos: bool,
    pub language: Language,
    pub style: Style,
    /// Owner's username; never writable.
    pub owner: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserRepr {
    pub id: AccountId,
    pub username: String,
    pub snippets: Vec<SnippetId>,
}

/// Validated snippet fields, with absent fields already filled from the instance or defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnippetInput {
    pub title: String,
    pub code: String,
    pub linenos: bool,
    pub language: Language,
    pub style: Style,
}

impl SnippetInput {
    pub fn into_new(self, owner: AccountId, highlighted: String) -> NewSnippet {
        NewSnippet {
            title: self.title,
            code: self.code,
            linenos: self.linenos,
            language: self.language,
            style: self.style,
            owner,
            highlighted,
        }
    }

    pub fn into_changes(self, highlighted: String) -> SnippetChanges {
        SnippetChanges {
            title: self.title,
            code: self.code,
            linenos: self.linenos,
            language: self.language,
            style: self.style,
            highlighted,
        }
    }
}

pub struct SnippetSerializer;

impl SnippetSerializer {
    pub fn to_representation(snippet: &Snippet) -> SnippetRepr {
        SnippetRepr {
            id: snippet.id,
            title: snippet.title.clone(),
            code: snippet.code.clone(),
            linenos: snippet.linenos,
            language: snippet.language,
            style: snippet.style,
            owner: snippet.owner_username.clone(),
        }
    }

    pub fn many(snippets: &[Snippet]) -> Vec<SnippetRepr> {
        snippets.iter().map(Self::to_representation).collect()
    }

    /// Validate a create (no instance) or update payload. `partial` (PATCH) drops the required check.
    /// `id` and `owner` are read-only and ignored; `body` is accepted as an alias of `code`.
    pub fn validate(payload: &Payload, instance: Option<&Snippet>, partial: bool) -> Result<SnippetInput, AppError> {
        let data = &payload.0;
        let mut errors = FieldErrors::new();

        let title = match data.get("title") {
            None => Some(instance.map(|s| s.title.clone()).unwrap_or_default()),
            Some(v) => char_field(&mut errors, "title", v, true).and_then(|t| {
                if t.chars().count() > TITLE_MAX_CHARS {
                    errors.add(
                        "title",
                        format!("Ensure this field has no more than {} characters.", TITLE_MAX_CHARS),
                    );
                    None
                } else {
                    Some(t)
                }
            }),
        };

        let code = match data.get("code").or_else(|| data.get("body")) {
            None if !partial => {
                errors.add("code", REQUIRED);
                None
            }
            None => instance.map(|s| s.code.clone()),
            Some(v) => char_field(&mut errors, "code", v, false),
        };

        let linenos = match data.get("linenos") {
            None => Some(instance.map(|s| s.linenos).unwrap_or_default()),
            Some(v) => {
                let parsed = parse_bool(v);
                if parsed.is_none() {
                    errors.add("linenos", if v.is_null() { NOT_NULL } else { NOT_BOOL });
                }
                parsed
            }
        };

        let language = choice_field(&mut errors, data, "language", instance.map(|s| s.language));
        let style = choice_field(&mut errors, data, "style", instance.map(|s| s.style));

        errors.into_result()?;
        match (title, code, linenos, language, style) {
            (Some(title), Some(code), Some(linenos), Some(language), Some(style)) => Ok(SnippetInput {
                title,
                code,
                linenos,
                language,
                style,
            }),
            // Only reachable for a partial update without an instance.
            _ => Err(AppError::Validation(FieldErrors::single("code", REQUIRED))),
        }
    }
}

pub struct UserSerializer;

impl UserSerializer {
    pub fn to_representation(account: &Account, owned: &[SnippetId]) -> UserRepr {
        UserRepr {
            id: account.id,
            username: account.username.clone(),
            snippets: owned.to_vec(),
        }
    }

    pub fn many(accounts: &[Account], by_owner: &HashMap<AccountId, Vec<SnippetId>>) -> Vec<UserRepr> {
        accounts
            .iter()
            .map(|a| Self::to_representation(a, by_owner.get(&a.id).map(Vec::as_slice).unwrap_or(&[])))
            .collect()
    }
}

/// Strings pass through, numbers are coerced; anything else is recorded as an error.
fn char_field(errors: &mut FieldErrors, field: &str, v: &Value, allow_blank: bool) -> Option<String> {
    let s = match v {
        Value::Null => {
            errors.add(field, NOT_NULL);
            return None;
        }
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => {
            errors.add(field, NOT_STRING);
            return None;
        }
    };
    if !allow_blank && s.is_empty() {
        errors.add(field, NOT_BLANK);
        return None;
    }
    Some(s)
}

fn choice_field<T>(errors: &mut FieldErrors, data: &Map<String, Value>, field: &str, current: Option<T>) -> Option<T>
where
    T: FromStr + Default,
    T::Err: std::fmt::Display,
{
    match data.get(field) {
        None => Some(current.unwrap_or_default()),
        Some(Value::Null) => {
            errors.add(field, NOT_NULL);
            None
        }
        Some(Value::String(s)) => match s.parse::<T>() {
            Ok(choice) => Some(choice),
            Err(e) => {
                errors.add(field, e.to_string());
                None
            }
        },
        Some(other) => {
            errors.add(field, format!("\"{}\" is not a valid choice.", other));
            None
        }
    }
}

fn parse_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
            "false" | "f" | "no" | "n" | "off" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn payload(v: Value) -> Payload {
        Payload::from_value(v).unwrap()
    }

    fn errors_of(result: Result<SnippetInput, AppError>) -> FieldErrors {
        match result {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn stored() -> Snippet {
        Snippet {
            id: 7,
            created: Utc::now(),
            title: "old".into(),
            code: "x = 1".into(),
            linenos: true,
            language: Language::Rust,
            style: Style::Mocha,
            owner: 1,
            owner_username: "alice".into(),
            highlighted: String::new(),
        }
    }

    #[test]
    fn create_applies_defaults() {
        let input = SnippetSerializer::validate(&payload(json!({"code": "print('hi')"})), None, false).unwrap();
        assert_eq!(input.title, "");
        assert_eq!(input.language, Language::Python);
        assert_eq!(input.style, Style::Friendly);
        assert!(!input.linenos);
    }

    #[test]
    fn body_is_an_alias_for_code() {
        let input = SnippetSerializer::validate(&payload(json!({"body": "x", "language": "python"})), None, false).unwrap();
        assert_eq!(input.code, "x");
    }

    #[test]
    fn collects_every_field_error() {
        let errors = errors_of(SnippetSerializer::validate(
            &payload(json!({
                "title": "t".repeat(101),
                "language": "cobol",
                "style": 3,
                "linenos": "maybe"
            })),
            None,
            false,
        ));
        assert_eq!(errors.get("code").unwrap(), [REQUIRED]);
        assert_eq!(
            errors.get("title").unwrap(),
            ["Ensure this field has no more than 100 characters."]
        );
        assert_eq!(errors.get("language").unwrap(), ["\"cobol\" is not a valid choice."]);
        assert_eq!(errors.get("style").unwrap(), ["\"3\" is not a valid choice."]);
        assert_eq!(errors.get("linenos").unwrap(), [NOT_BOOL]);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let input = SnippetSerializer::validate(
            &payload(json!({"title": "   ", "code": "  x = 1\n"})),
            None,
            false,
        )
        .unwrap();
        assert_eq!(input.title, "");
        assert_eq!(input.code, "x = 1");

        let input = SnippetSerializer::validate(&payload(json!({"title": " t ", "code": "x"})), None, false).unwrap();
        assert_eq!(input.title, "t");
    }

    #[test]
    fn blank_and_null_code() {
        let errors = errors_of(SnippetSerializer::validate(&payload(json!({"code": "  "})), None, false));
        assert_eq!(errors.get("code").unwrap(), [NOT_BLANK]);
        let errors = errors_of(SnippetSerializer::validate(&payload(json!({"code": null})), None, false));
        assert_eq!(errors.get("code").unwrap(), [NOT_NULL]);
        let errors = errors_of(SnippetSerializer::validate(&payload(json!({"code": ["a"]})), None, false));
        assert_eq!(errors.get("code").unwrap(), [NOT_STRING]);
    }

    #[test]
    fn put_requires_code_but_keeps_other_fields() {
        let instance = stored();
        let errors = errors_of(SnippetSerializer::validate(&payload(json!({"title": "new"})), Some(&instance), false));
        assert!(errors.get("code").is_some());

        let input = SnippetSerializer::validate(&payload(json!({"code": "y"})), Some(&instance), false).unwrap();
        assert_eq!(input.title, "old");
        assert_eq!(input.language, Language::Rust);
        assert!(input.linenos);
    }

    #[test]
    fn patch_merges_onto_instance() {
        let instance = stored();
        let input = SnippetSerializer::validate(
            &payload(json!({"style": "eighties", "owner": "mallory", "id": 99})),
            Some(&instance),
            true,
        )
        .unwrap();
        assert_eq!(input.code, "x = 1");
        assert_eq!(input.style, Style::Eighties);
    }

    #[test]
    fn booleans_accept_common_spellings() {
        for (v, expected) in [
            (json!(true), Some(true)),
            (json!("Yes"), Some(true)),
            (json!(0), Some(false)),
            (json!("off"), Some(false)),
            (json!(2), None),
            (json!(null), None),
        ] {
            assert_eq!(parse_bool(&v), expected, "{v}");
        }
    }

    #[test]
    fn representations() {
        let snippet = stored();
        let repr = serde_json::to_value(SnippetSerializer::to_representation(&snippet)).unwrap();
        assert_eq!(
            repr,
            json!({
                "id": 7, "title": "old", "code": "x = 1", "linenos": true,
                "language": "rust", "style": "mocha", "owner": "alice"
            })
        );

        let account = Account {
            id: 1,
            username: "alice".into(),
            password_hash: "secret".into(),
            date_joined: Utc::now(),
        };
        let by_owner = HashMap::from([(1, vec![7, 8])]);
        let users = serde_json::to_value(UserSerializer::many(&[account], &by_owner)).unwrap();
        assert_eq!(users, json!([{"id": 1, "username": "alice", "snippets": [7, 8]}]));
    }
}
