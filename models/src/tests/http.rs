use crate::{HttpMethod, HttpRequestOptions, HttpRequestOptionsBuilder, LoaderEventType, ModelError};

use std::time::Duration;

#[test]
fn given_default_options_then_thirty_second_timeout_and_three_second_redirect() {
    let options = HttpRequestOptions::default();

    assert_eq!(options.timeout_ms, 30_000);
    assert_eq!(options.redirect_timeout_ms, 3_000);
}

/// **VALUE**: Verifies partial option objects fill in the defaults.
///
/// **WHY THIS MATTERS**: Callers usually override one of the two timings. A missing key
/// must not turn into zero, which would disable redirect settling or time out instantly.
#[test]
fn given_partial_json_when_deserialized_then_missing_keys_use_defaults() {
    let options: HttpRequestOptions = serde_json::from_str(r#"{"redirectTimeout": 0}"#).unwrap();

    assert_eq!(options.timeout_ms, 30_000);
    assert_eq!(options.redirect_timeout_ms, 0);
    assert_eq!(options.redirect_window(), None);
}

#[test]
fn given_negative_redirect_timeout_then_settling_disabled() {
    let options = HttpRequestOptionsBuilder::default()
        .with_redirect_timeout_ms(-5)
        .build()
        .unwrap();

    assert_eq!(options.redirect_window(), None);
}

#[test]
fn given_positive_redirect_timeout_then_window_matches() {
    let options = HttpRequestOptionsBuilder::default()
        .with_timeout_ms(8)
        .with_redirect_timeout_ms(3)
        .build()
        .unwrap();

    assert_eq!(options.timeout(), Duration::from_millis(8));
    assert_eq!(options.redirect_window(), Some(Duration::from_millis(3)));
}

/// **VALUE**: Verifies the builder rejects a zero overall timeout.
///
/// **BUG THIS CATCHES**: Would catch removal of the validation, letting every request
/// reject with TIMEOUT before its first load event could arrive.
#[test]
fn given_zero_timeout_when_building_then_returns_validation_error() {
    let result = HttpRequestOptionsBuilder::default().with_timeout_ms(0).build();

    match result {
        Err(err @ ModelError::RequestOptions { .. }) => {
            let ModelError::RequestOptions { field, message, .. } = &err;
            assert_eq!(*field, "timeout");
            assert_eq!(message, "must be non-zero");
            assert!(err.to_string().starts_with("Request Options Error: \"timeout\" must be non-zero ["));
        }
        Ok(options) => panic!("Expected validation error, got {options:?}"),
    }
}

#[test]
fn given_method_names_when_parsed_then_case_insensitive_get_and_post_only() {
    assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::Get));
    assert_eq!(HttpMethod::parse("Post"), Some(HttpMethod::Post));
    assert_eq!(HttpMethod::parse("PUT"), None);
    assert_eq!(HttpMethod::parse(""), None);
}

#[test]
fn given_event_types_when_displayed_then_camel_case_names() {
    let names: Vec<String> = LoaderEventType::ALL.iter().map(|t| t.to_string()).collect();

    assert_eq!(
        names,
        [
            "beforeCreate",
            "created",
            "beforeMount",
            "mounted",
            "beforeUpdate",
            "updated",
            "beforeDestroy",
            "destroyed"
        ]
    );
}
