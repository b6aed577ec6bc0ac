use crate::{
    domain::{EventId, FestivalDate, SignupToken},
    error::{ApiError, ErrorCode},
    protocol::{DkuVerificationRequest, DkuVerificationResponse, FestivalEvent},
};

#[test]
fn verification_request_uses_camel_case_field_names() {
    let request = DkuVerificationRequest {
        dku_student_id: "32201234".into(),
        dku_password: "hunter22".into(),
    };
    let json = serde_json::to_value(&request).expect("serialize");
    assert_eq!(json["dkuStudentId"], "32201234");
    assert_eq!(json["dkuPassword"], "hunter22");
}

#[test]
fn verification_request_debug_redacts_password() {
    let request = DkuVerificationRequest {
        dku_student_id: "32201234".into(),
        dku_password: "hunter22".into(),
    };
    let rendered = format!("{request:?}");
    assert!(rendered.contains("32201234"));
    assert!(!rendered.contains("hunter22"));
}

#[test]
fn verification_response_carries_opaque_token() {
    let body = r#"{
        "signupToken": "tok-abc",
        "student": {
            "studentName": "Kim",
            "studentId": "32201234",
            "age": "22",
            "gender": "F",
            "major": "CS"
        }
    }"#;
    let parsed: DkuVerificationResponse = serde_json::from_str(body).expect("parse");
    assert_eq!(parsed.signup_token, SignupToken::new("tok-abc"));
    assert_eq!(parsed.student.major, "CS");
    assert_eq!(format!("{:?}", parsed.signup_token), "SignupToken(..)");
}

#[test]
fn festival_event_tolerates_missing_optional_fields() {
    let parsed: FestivalEvent =
        serde_json::from_str(r#"{"id": 7, "name": "Day 1", "festivalDate": "FIRST_DAY"}"#)
            .expect("parse");
    assert_eq!(parsed.id, EventId(7));
    assert_eq!(parsed.festival_date, Some(FestivalDate::FirstDay));
    assert!(parsed.ticketing_opens_at.is_none());
}

#[test]
fn api_error_defaults_unknown_code() {
    let parsed: ApiError = serde_json::from_str(r#"{"message": "bad password"}"#).expect("parse");
    assert_eq!(parsed.code, ErrorCode::Unknown);
    assert_eq!(parsed.message, "bad password");
    assert_eq!(parsed.to_string(), "bad password");

    let parsed: ApiError =
        serde_json::from_str(r#"{"code": "teapot", "message": "x"}"#).expect("parse");
    assert_eq!(parsed.code, ErrorCode::Unknown);
}

#[test]
fn festival_date_strings_match_wire_format() {
    for date in FestivalDate::ALL {
        let json = serde_json::to_string(&date).expect("serialize");
        assert_eq!(json, format!("\"{}\"", date.as_str()));
    }
}
