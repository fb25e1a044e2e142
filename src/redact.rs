use crate::domain::mask;
use serde_json::Value;

/// Field names whose values never appear verbatim in diagnostics.
/// Reward totals count as sensitive when echoing payloads, even though
/// the outbound notification reports them in the clear.
const SENSITIVE_FIELDS: &[&str] = &[
    "accessToken",
    "customerCode",
    "email",
    "gainNum",
    "integralVoucher",
    "phone",
];

/// Walks a response tree and replaces every sensitive field's value
/// with the masked rendering of its display form.
pub fn scrub(value: Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(name, value)| {
                    if SENSITIVE_FIELDS.contains(&name.as_str()) {
                        let masked = mask(&display_form(&value));
                        (name, Value::String(masked))
                    } else {
                        (name, scrub(value))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(scrub).collect()),
        other => other,
    }
}

fn display_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scrubs_sensitive_fields_at_any_depth() {
        let scrubbed = scrub(json!({
            "code": 200,
            "data": {
                "customerCode": "CU123456",
                "integralVoucher": 12345,
                "note": "unchanged"
            }
        }));

        assert_eq!(scrubbed["code"], 200);
        assert_eq!(scrubbed["data"]["customerCode"], "CU****56");
        assert_eq!(scrubbed["data"]["integralVoucher"], "12****45");
        assert_eq!(scrubbed["data"]["note"], "unchanged");
    }

    #[test]
    fn scrubs_inside_arrays() {
        let scrubbed = scrub(json!([
            { "gainNum": 54321 },
            { "plain": true }
        ]));

        assert_eq!(scrubbed[0]["gainNum"], "54****21");
        assert_eq!(scrubbed[1]["plain"], true);
    }

    #[test]
    fn short_sensitive_values_collapse_entirely() {
        let scrubbed = scrub(json!({ "gainNum": 5 }));
        assert_eq!(scrubbed["gainNum"], "****");
    }

    #[test]
    fn non_object_values_pass_through() {
        assert_eq!(scrub(json!(42)), json!(42));
        assert_eq!(scrub(json!("plain")), json!("plain"));
        assert_eq!(scrub(json!(null)), json!(null));
    }
}
