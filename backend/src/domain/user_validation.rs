//! Field validation for user create and update payloads.
//!
//! Both validators are pure: they inspect the candidate payload and return
//! either a normalised domain value or every field-level problem found. No
//! store access happens here, so a rejected payload can never reach the store.
//!
//! Inputs are raw JSON members. `None` means the member was absent and
//! `Some(Value::Null)` means it was sent as `null`; the two are reported with
//! different messages. Numbers are accepted as text in their JSON spelling.
//!
//! ```
//! use serde_json::json;
//! use user_service::domain::user_validation::validate_create;
//!
//! let user = validate_create(Some(&json!("  Ann ")), Some(&json!("NYC"))).expect("valid payload");
//! assert_eq!(user.name(), "Ann");
//!
//! let errors = validate_create(Some(&json!("Ann")), None).expect_err("location missing");
//! assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["location"]);
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use super::user::{NewUser, UserChanges, UserField, UserId, UserUpdate};

/// Field name reported for problems with the update target.
pub const USER_ID_FIELD: &str = "user_id";
/// Field name reported for problems with the update mapping itself.
pub const UPDATE_DATA_FIELD: &str = "update_data";

const REQUIRED_MESSAGE: &str = "This field is required.";
const NULL_MESSAGE: &str = "This field may not be null.";
const BLANK_MESSAGE: &str = "This field may not be blank.";
const NOT_A_STRING_MESSAGE: &str = "Not a valid string.";

/// Category of a single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// A required field is absent, null, or blank.
    MissingField,
    /// The update mapping contains a key outside the allowed set.
    InvalidKey { key: String },
    /// A value has the wrong JSON type.
    InvalidValue,
}

/// One problem attached to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    field: String,
    kind: FieldErrorKind,
    message: String,
}

impl FieldError {
    fn missing(field: impl Into<String>, message: &str) -> Self {
        Self {
            field: field.into(),
            kind: FieldErrorKind::MissingField,
            message: message.to_owned(),
        }
    }

    fn invalid_key(key: &str) -> Self {
        let allowed = UserField::ALL.map(UserField::as_str).join(", ");
        Self {
            field: UPDATE_DATA_FIELD.to_owned(),
            kind: FieldErrorKind::InvalidKey {
                key: key.to_owned(),
            },
            message: format!("Invalid key: {key}. Allowed keys are: {allowed}"),
        }
    }

    fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: FieldErrorKind::InvalidValue,
            message: message.into(),
        }
    }

    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    pub fn kind(&self) -> &FieldErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Non-empty collection of field errors produced by a failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Distinct offending field names, ordered by name.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.by_field().into_keys()
    }

    pub fn has_kind(&self, predicate: impl Fn(&FieldErrorKind) -> bool) -> bool {
        self.0.iter().any(|error| predicate(&error.kind))
    }

    /// Messages grouped by field, ordered by field name.
    pub fn by_field(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for error in &self.0 {
            grouped
                .entry(error.field())
                .or_default()
                .push(error.message());
        }
        grouped
    }

    /// JSON rendering used as the envelope's `errors` member.
    pub fn to_json(&self) -> Value {
        let object: Map<String, Value> = self
            .by_field()
            .into_iter()
            .map(|(field, messages)| {
                let messages = messages
                    .into_iter()
                    .map(|message| Value::String(message.to_owned()))
                    .collect();
                (field.to_owned(), Value::Array(messages))
            })
            .collect();
        Value::Object(object)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .0
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect();
        f.write_str(&rendered.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Text carried by a string or number; `None` for every other JSON type.
fn as_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(text) => Some(Cow::Borrowed(text.as_str())),
        Value::Number(number) => Some(Cow::Owned(number.to_string())),
        _ => None,
    }
}

/// Accumulates errors while a validator walks its payload.
#[derive(Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Trim `value` and record a problem when it is absent, null, blank, or
    /// not text.
    fn required_text(&mut self, field: &str, value: Option<&Value>) -> Option<String> {
        let error = match value {
            None => FieldError::missing(field, REQUIRED_MESSAGE),
            Some(Value::Null) => FieldError::missing(field, NULL_MESSAGE),
            Some(value) => match as_text(value) {
                None => FieldError::invalid_value(field, NOT_A_STRING_MESSAGE),
                Some(text) if text.trim().is_empty() => FieldError::missing(field, BLANK_MESSAGE),
                Some(text) => return Some(text.trim().to_owned()),
            },
        };
        self.push(error);
        None
    }

    /// Every `None` handed in here has already recorded an error.
    fn finish<T>(self, value: Option<T>) -> Result<T, ValidationErrors> {
        match value {
            Some(value) if self.0.is_empty() => Ok(value),
            _ => Err(ValidationErrors(self.0)),
        }
    }
}

/// Validate a create-user payload.
///
/// Fails with `MissingField` for each of `name` and `location` that is
/// absent, null, or blank after trimming, and with `InvalidValue` for one that
/// is neither a string nor a number.
pub fn validate_create(
    name: Option<&Value>,
    location: Option<&Value>,
) -> Result<NewUser, ValidationErrors> {
    let mut collector = Collector::default();
    let name = collector.required_text(UserField::Name.as_str(), name);
    let location = collector.required_text(UserField::Location.as_str(), location);
    collector.finish(
        name.zip(location)
            .map(|(name, location)| NewUser::from_validated(name, location)),
    )
}

/// Validate an update-user payload.
///
/// Fails with `MissingField` when `user_id` is absent, null, or blank or when
/// `update_data` is absent or null, with `InvalidValue` when `update_data` is
/// not an object, and with `InvalidKey` for every key outside
/// `{name, location}`. Any single problem rejects the whole update.
pub fn validate_update(
    user_id: Option<&Value>,
    update_data: Option<&Value>,
) -> Result<UserUpdate, ValidationErrors> {
    let mut collector = Collector::default();
    let user_id = collector.required_text(USER_ID_FIELD, user_id);

    let changes = match update_data {
        None => {
            collector.push(FieldError::missing(UPDATE_DATA_FIELD, REQUIRED_MESSAGE));
            None
        }
        Some(Value::Null) => {
            collector.push(FieldError::missing(UPDATE_DATA_FIELD, NULL_MESSAGE));
            None
        }
        Some(Value::Object(data)) => Some(collect_changes(&mut collector, data)),
        Some(other) => {
            collector.push(FieldError::invalid_value(
                UPDATE_DATA_FIELD,
                format!(
                    "Expected a dictionary of items but got type \"{}\".",
                    json_type(other)
                ),
            ));
            None
        }
    };

    collector.finish(
        user_id
            .zip(changes)
            .map(|(user_id, changes)| UserUpdate::from_validated(UserId::new(user_id), changes)),
    )
}

fn collect_changes(collector: &mut Collector, data: &Map<String, Value>) -> UserChanges {
    let mut changes = UserChanges::default();
    for (key, value) in data {
        let Some(field) = UserField::from_key(key) else {
            collector.push(FieldError::invalid_key(key));
            continue;
        };
        let path = format!("{UPDATE_DATA_FIELD}.{field}");
        if let Some(text) = collector.required_text(&path, Some(value)) {
            changes.set(field, text);
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn create(name: Option<Value>, location: Option<Value>) -> Result<NewUser, ValidationErrors> {
        validate_create(name.as_ref(), location.as_ref())
    }

    fn update(user_id: Option<Value>, data: Option<Value>) -> Result<UserUpdate, ValidationErrors> {
        validate_update(user_id.as_ref(), data.as_ref())
    }

    #[rstest]
    fn create_accepts_and_trims_valid_payload() {
        let user = create(Some(json!(" Ann ")), Some(json!("NYC\n"))).expect("valid payload");
        assert_eq!(user.name(), "Ann");
        assert_eq!(user.location(), "NYC");
    }

    #[rstest]
    #[case(json!(42), "42")]
    #[case(json!(4.5), "4.5")]
    fn create_accepts_numbers_as_text(#[case] name: Value, #[case] expected: &str) {
        let user = create(Some(name), Some(json!("NYC"))).expect("numbers are text");
        assert_eq!(user.name(), expected);
    }

    #[rstest]
    #[case(None, Some(json!("NYC")), &["name"])]
    #[case(Some(json!("Ann")), None, &["location"])]
    #[case(Some(json!("")), Some(json!("NYC")), &["name"])]
    #[case(Some(json!("Ann")), Some(json!("   ")), &["location"])]
    #[case(Some(Value::Null), Some(json!("NYC")), &["name"])]
    #[case(None, None, &["location", "name"])]
    fn create_reports_every_missing_field(
        #[case] name: Option<Value>,
        #[case] location: Option<Value>,
        #[case] expected: &[&str],
    ) {
        let errors = create(name, location).expect_err("payload must be rejected");
        assert_eq!(errors.fields().collect::<Vec<_>>(), expected);
        assert!(
            errors
                .iter()
                .all(|error| *error.kind() == FieldErrorKind::MissingField)
        );
    }

    #[rstest]
    fn create_distinguishes_absent_null_and_blank() {
        let errors = validate_create(None, Some(&json!(" "))).expect_err("rejected");
        assert_eq!(
            errors.to_json(),
            json!({
                "name": ["This field is required."],
                "location": ["This field may not be blank."],
            })
        );

        let errors = validate_create(Some(&Value::Null), Some(&json!("NYC"))).expect_err("rejected");
        assert_eq!(errors.to_json(), json!({"name": ["This field may not be null."]}));
    }

    #[rstest]
    #[case(json!(true))]
    #[case(json!(["Ann"]))]
    #[case(json!({"first": "Ann"}))]
    fn create_rejects_non_text_values_under_the_field(#[case] name: Value) {
        let errors = create(Some(name), Some(json!("NYC"))).expect_err("rejected");
        assert!(errors.has_kind(|kind| *kind == FieldErrorKind::InvalidValue));
        assert_eq!(errors.to_json(), json!({"name": ["Not a valid string."]}));
    }

    #[rstest]
    fn update_accepts_allowed_keys() {
        let data = json!({"name": "Bea", "location": " Paris "});
        let update = update(Some(json!("abc")), Some(data)).expect("valid update");
        assert_eq!(update.user_id().as_str(), "abc");
        assert_eq!(update.changes().get(UserField::Name), Some("Bea"));
        assert_eq!(update.changes().get(UserField::Location), Some("Paris"));
    }

    #[rstest]
    fn update_accepts_numeric_user_id() {
        let update = update(Some(json!(7)), Some(json!({}))).expect("valid update");
        assert_eq!(update.user_id().as_str(), "7");
    }

    #[rstest]
    fn update_accepts_empty_mapping() {
        let update = update(Some(json!("abc")), Some(json!({}))).expect("empty mapping is valid");
        assert!(update.changes().is_empty());
    }

    #[rstest]
    fn update_rejects_unknown_key_and_names_it() {
        let errors = update(Some(json!("abc")), Some(json!({"email": "x@y.com"}))).expect_err("rejected");
        assert!(errors.has_kind(|kind| matches!(kind, FieldErrorKind::InvalidKey { key } if key == "email")));
        assert_eq!(
            errors.to_json(),
            json!({"update_data": ["Invalid key: email. Allowed keys are: name, location"]})
        );
    }

    #[rstest]
    fn update_rejects_whole_payload_when_any_key_is_invalid() {
        let data = json!({"name": "Bea", "age": 3, "email": "x@y.com"});
        let errors = update(Some(json!("abc")), Some(data)).expect_err("rejected");
        let invalid_keys: Vec<&str> = errors
            .iter()
            .filter_map(|error| match error.kind() {
                FieldErrorKind::InvalidKey { key } => Some(key.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(invalid_keys, vec!["age", "email"]);
    }

    #[rstest]
    #[case(None, Some(json!({"name": "Bea"})), "user_id", "This field is required.")]
    #[case(Some(json!("")), Some(json!({"name": "Bea"})), "user_id", "This field may not be blank.")]
    #[case(Some(Value::Null), Some(json!({"name": "Bea"})), "user_id", "This field may not be null.")]
    #[case(Some(json!("abc")), None, "update_data", "This field is required.")]
    #[case(Some(json!("abc")), Some(Value::Null), "update_data", "This field may not be null.")]
    fn update_requires_target_and_mapping(
        #[case] user_id: Option<Value>,
        #[case] data: Option<Value>,
        #[case] field: &str,
        #[case] message: &str,
    ) {
        let errors = update(user_id, data).expect_err("rejected");
        assert_eq!(errors.by_field().get(field), Some(&vec![message]));
        assert!(errors.has_kind(|kind| *kind == FieldErrorKind::MissingField));
    }

    #[rstest]
    #[case(json!("Paris"), "string")]
    #[case(json!(["Paris"]), "array")]
    fn update_data_must_be_an_object(#[case] data: Value, #[case] type_name: &str) {
        let errors = update(Some(json!("abc")), Some(data)).expect_err("rejected");
        assert!(errors.has_kind(|kind| *kind == FieldErrorKind::InvalidValue));
        assert_eq!(
            errors.to_json(),
            json!({"update_data": [format!("Expected a dictionary of items but got type \"{type_name}\".")]})
        );
    }

    #[rstest]
    #[case(json!({"name": ""}), "update_data.name", "This field may not be blank.")]
    #[case(json!({"location": null}), "update_data.location", "This field may not be null.")]
    #[case(json!({"name": true}), "update_data.name", "Not a valid string.")]
    fn update_values_must_be_non_blank_text(
        #[case] data: Value,
        #[case] field: &str,
        #[case] message: &str,
    ) {
        let errors = update(Some(json!("abc")), Some(data)).expect_err("rejected");
        let grouped = errors.by_field();
        assert_eq!(grouped.get(field), Some(&vec![message]));
    }
}
