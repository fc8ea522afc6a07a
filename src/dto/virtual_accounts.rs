use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::sync::LazyLock;
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Declaration order is the order fields are reported in when missing.
pub const REQUIRED_FIELDS: [&str; 4] = ["email", "firstname", "lastname", "phonenumber"];

// The ECMAScript `\s` set. The `regex` crate's `\s` is Unicode White_Space,
// which adds U+0085 and leaves out U+FEFF.
const JS_WHITESPACE: &str =
    r"\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";

pub static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let part = format!("[^{JS_WHITESPACE}@]+");
    Regex::new(&format!(r"^{part}@{part}\.{part}$")).expect("email pattern compiles")
});

// ASCII digits only, `\d` would also admit other Unicode decimal digits.
pub static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10,15}$").expect("phone pattern compiles"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid phone number format")]
    InvalidPhoneNumber,
}

/// Inbound body. Required fields keep whatever JSON the caller sent; format
/// checks and the narration work on their [`text_of`] rendering.
#[derive(Deserialize, Validate, Debug)]
pub struct CreateVirtualAccountBody {
    #[validate(custom = "email_format")]
    pub email: Value,

    pub firstname: Value,

    pub lastname: Value,

    #[validate(custom = "phone_format")]
    pub phonenumber: Value,

    // null and absent both fall back to `true` when the payload is built
    #[serde(default)]
    pub is_permanent: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    pub bvn: Option<Value>,
}

impl CreateVirtualAccountBody {
    /// Runs the format validators, reporting the email before the phone number.
    pub fn check_format(&self) -> Result<(), ValidationFailure> {
        let errors = match self.validate() {
            Ok(_) => return Ok(()),
            Err(errors) => errors,
        };

        if errors.field_errors().contains_key("email") {
            Err(ValidationFailure::InvalidEmail)
        } else {
            Err(ValidationFailure::InvalidPhoneNumber)
        }
    }
}

fn email_format(value: &Value) -> Result<(), ValidationError> {
    if EMAIL_REGEX.is_match(&text_of(value)) {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}

fn phone_format(value: &Value) -> Result<(), ValidationError> {
    if PHONE_REGEX.is_match(&text_of(value)) {
        Ok(())
    } else {
        Err(ValidationError::new("phonenumber"))
    }
}

/// Body sent to `POST /virtual-account-numbers`.
///
/// Caller-supplied fields are forwarded as the JSON values they arrived as.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VirtualAccountPayload {
    pub email: Value,
    pub is_permanent: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bvn: Option<Value>,
    pub tx_ref: String,
    pub phonenumber: Value,
    pub firstname: Value,
    pub lastname: Value,
    pub narration: String,
}

impl VirtualAccountPayload {
    pub fn new(body: CreateVirtualAccountBody, tx_ref: String) -> Self {
        let narration = format!("{} {} VA", text_of(&body.firstname), text_of(&body.lastname));

        VirtualAccountPayload {
            email: body.email,
            is_permanent: body.is_permanent.unwrap_or(Value::Bool(true)),
            bvn: body.bvn,
            tx_ref,
            phonenumber: body.phonenumber,
            firstname: body.firstname,
            lastname: body.lastname,
            narration,
        }
    }
}

/// Lists the required fields that are absent or falsy, in declaration order.
///
/// Anything other than a JSON object has no fields, so every one is missing.
pub fn missing_required_fields(body: &Value) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !body.get(*field).is_some_and(is_truthy))
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Renders a JSON value the way ECMAScript `ToString` does: arrays join their
/// elements with `,` (null elements become empty) and objects become
/// `[object Object]`.
pub fn text_of(value: &Value) -> String {
    match value {
        Value::Null => String::from("null"),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => text_of(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => String::from("[object Object]"),
    }
}

fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }

    let f = n.as_f64().unwrap_or_default();
    if f == 0.0 {
        String::from("0")
    } else if f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

// Keeps an explicit `null` as `Some(Value::Null)` so it is forwarded, while
// an absent key stays `None` and is left out of the payload.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> CreateVirtualAccountBody {
        serde_json::from_value(value).unwrap()
    }

    fn valid() -> Value {
        json!({
            "email": "a@b.com",
            "firstname": "Jane",
            "lastname": "Doe",
            "phonenumber": "2348012345678"
        })
    }

    #[test]
    fn missing_fields_follow_declaration_order() {
        let input = json!({ "lastname": "Doe", "firstname": "", "bvn": "123" });

        assert_eq!(
            missing_required_fields(&input),
            vec!["email", "firstname", "phonenumber"]
        );
        assert_eq!(
            ValidationFailure::MissingFields(missing_required_fields(&input)).to_string(),
            "Missing required fields: email, firstname, phonenumber"
        );
    }

    #[test]
    fn falsy_values_count_as_missing() {
        let input = json!({
            "email": null,
            "firstname": false,
            "lastname": 0,
            "phonenumber": ""
        });

        assert_eq!(missing_required_fields(&input), REQUIRED_FIELDS.to_vec());
        assert!(missing_required_fields(&valid()).is_empty());
    }

    #[test]
    fn non_object_bodies_miss_every_field() {
        for input in [json!([1, 2]), json!("email"), json!(42), json!(true)] {
            assert_eq!(missing_required_fields(&input), REQUIRED_FIELDS.to_vec());
        }
    }

    #[test]
    fn email_pattern_boundaries() {
        for email in ["a@b.com", "a@b.c.d", "a@b..com", "first.last+tag@mail.example.ng"] {
            assert!(EMAIL_REGEX.is_match(email), "{email} should pass");
        }

        for email in ["no-at-sign", "a@b", "a@.com", "a b@c.com", "a@b@c.com", "a@b.com ", "@b.com", "a@b."] {
            assert!(!EMAIL_REGEX.is_match(email), "{email} should fail");
        }
    }

    #[test]
    fn phone_pattern_boundaries() {
        for phone in ["0123456789", "123456789012345", "2348012345678"] {
            assert!(PHONE_REGEX.is_match(phone), "{phone} should pass");
        }

        for phone in [
            "12345",
            "123456789",
            "1234567890123456",
            "123456789012345678",
            "123-456-7890",
            "+2348012345678",
            "٠١٢٣٤٥٦٧٨٩",
        ] {
            assert!(!PHONE_REGEX.is_match(phone), "{phone} should fail");
        }
    }

    #[test]
    fn check_format_reports_email_before_phone() {
        let mut input = valid();
        input["email"] = json!("no-at-sign");
        input["phonenumber"] = json!("12345");
        assert_eq!(body(input).check_format(), Err(ValidationFailure::InvalidEmail));

        let mut input = valid();
        input["phonenumber"] = json!("123-456-7890");
        assert_eq!(
            body(input).check_format(),
            Err(ValidationFailure::InvalidPhoneNumber)
        );

        assert_eq!(body(valid()).check_format(), Ok(()));
    }

    #[test]
    fn email_whitespace_matches_ecmascript() {
        // U+0085 is not whitespace in ECMAScript, U+FEFF and U+00A0 are
        assert!(EMAIL_REGEX.is_match("a\u{85}b@c.com"));

        for email in [
            "a\u{feff}b@c.com",
            "a\u{a0}b@c.com",
            "a@b\u{2028}.com",
            "a@b.c\u{3000}",
            "a\tb@c.com",
            "a@b.\u{b}com",
        ] {
            assert!(!EMAIL_REGEX.is_match(email), "{email:?} should fail");
        }
    }

    #[test]
    fn text_of_follows_ecmascript_to_string() {
        assert_eq!(text_of(&json!("Jane")), "Jane");
        assert_eq!(text_of(&json!(2348012345678u64)), "2348012345678");
        assert_eq!(text_of(&json!(1.0)), "1");
        assert_eq!(text_of(&json!(1.5)), "1.5");
        assert_eq!(text_of(&json!(true)), "true");
        assert_eq!(text_of(&json!(["Jane"])), "Jane");
        assert_eq!(text_of(&json!(["a", null, 1, ["b", "c"]])), "a,,1,b,c");
        assert_eq!(text_of(&json!([])), "");
        assert_eq!(text_of(&json!({ "address": "a@b.com" })), "[object Object]");
    }

    #[test]
    fn numeric_phone_number_is_checked_as_digits_and_kept_as_number() {
        let mut input = valid();
        input["phonenumber"] = json!(2348012345678u64);

        let parsed = body(input);
        assert_eq!(parsed.check_format(), Ok(()));

        let payload = VirtualAccountPayload::new(parsed, String::from("VA_4"));
        assert_eq!(payload.phonenumber, json!(2348012345678u64));
    }

    #[test]
    fn structured_values_never_pass_format_checks() {
        let mut input = valid();
        input["email"] = json!({ "address": "a@b.com" });
        assert_eq!(body(input).check_format(), Err(ValidationFailure::InvalidEmail));

        let mut input = valid();
        input["phonenumber"] = json!({ "number": "2348012345678" });
        assert_eq!(
            body(input).check_format(),
            Err(ValidationFailure::InvalidPhoneNumber)
        );
    }

    #[test]
    fn single_element_arrays_read_as_their_element() {
        let mut input = valid();
        input["email"] = json!(["a@b.com"]);
        input["phonenumber"] = json!([2348012345678u64]);
        input["firstname"] = json!(["Jane"]);
        input["lastname"] = json!(["Doe"]);

        let parsed = body(input);
        assert_eq!(parsed.check_format(), Ok(()));

        let payload = VirtualAccountPayload::new(parsed, String::from("VA_5"));
        assert_eq!(payload.narration, "Jane Doe VA");
        assert_eq!(payload.phonenumber, json!([2348012345678u64]));
        assert_eq!(payload.firstname, json!(["Jane"]));
    }

    #[test]
    fn multi_element_arrays_fail_format_checks() {
        let mut input = valid();
        input["phonenumber"] = json!(["23480", "12345678"]);
        assert_eq!(
            body(input).check_format(),
            Err(ValidationFailure::InvalidPhoneNumber)
        );

        let mut input = valid();
        input["firstname"] = json!(["Jane", "Ada"]);
        let payload = VirtualAccountPayload::new(body(input), String::from("VA_6"));
        assert_eq!(payload.narration, "Jane,Ada Doe VA");
    }

    #[test]
    fn payload_applies_defaults_and_narration() {
        let payload = VirtualAccountPayload::new(body(valid()), String::from("VA_1"));
        let serialized = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            serialized,
            json!({
                "email": "a@b.com",
                "is_permanent": true,
                "tx_ref": "VA_1",
                "phonenumber": "2348012345678",
                "firstname": "Jane",
                "lastname": "Doe",
                "narration": "Jane Doe VA"
            })
        );
        assert!(serialized.get("bvn").is_none());
    }

    #[test]
    fn payload_forwards_optional_fields_as_given() {
        let mut input = valid();
        input["is_permanent"] = json!(false);
        input["bvn"] = json!(null);
        let payload = VirtualAccountPayload::new(body(input), String::from("VA_2"));
        let serialized = serde_json::to_value(&payload).unwrap();
        assert_eq!(serialized["is_permanent"], json!(false));
        assert_eq!(serialized.get("bvn"), Some(&Value::Null));

        let mut input = valid();
        input["is_permanent"] = json!(null);
        input["bvn"] = json!("22222222222");
        let payload = VirtualAccountPayload::new(body(input), String::from("VA_3"));
        assert_eq!(payload.is_permanent, json!(true));
        assert_eq!(payload.bvn, Some(json!("22222222222")));
    }
}
