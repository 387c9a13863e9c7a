//! The receiving side can recompute every signature it is sent.

use crate::test_utils::{init_tracing, scripted_bindings, scripted_login, ScriptedTransport};
use serde_json::json;
use skas_attendance::{
    AttendanceRunner, ARKNIGHTS_ATTENDANCE_URL, BINDING_URL, ENDFIELD_ATTENDANCE_URL,
};
use skas_core::{GameCode, HttpRequest};
use skas_crypto::{sign_request, SignatureContext};
use skas_identity::FINGERPRINT_URL;

const CRED_TOKEN: &str = "5c2fce5d0a1f9a3e";

fn recompute(request: &HttpRequest, path: &str) -> String {
    let timestamp: u64 = request.header_value("timestamp").unwrap().parse().unwrap();
    let device_id = request.header_value("dId").unwrap();
    let body = request.body.as_deref().unwrap_or("");
    let ctx = SignatureContext::at(path, body, device_id, timestamp);
    sign_request(CRED_TOKEN, &ctx).unwrap().sign
}

#[tokio::test]
async fn every_signed_call_verifies() {
    init_tracing();
    let transport = ScriptedTransport::new().on(
        FINGERPRINT_URL,
        json!({"code": 1100, "detail": {"deviceId": "abc"}}),
    );
    scripted_login(&transport, CRED_TOKEN);
    scripted_bindings(&transport);
    transport
        .on(ARKNIGHTS_ATTENDANCE_URL, json!({"code": 0}))
        .on(ENDFIELD_ATTENDANCE_URL, json!({"code": 0}));

    let runner = AttendanceRunner::new(transport.clone(), GameCode::ALL.to_vec());
    assert!(runner.run("token-1234-abcd").await.success);

    let checks = [
        (BINDING_URL, "/api/v1/game/player/binding"),
        (ARKNIGHTS_ATTENDANCE_URL, "/api/v1/game/attendance"),
        (ENDFIELD_ATTENDANCE_URL, "/web/v1/game/endfield/attendance"),
    ];
    for (url, path) in checks {
        let request = &transport.requests_to(url)[0];
        assert_eq!(
            request.header_value("sign"),
            Some(recompute(request, path).as_str()),
            "{}",
            url
        );
        assert_eq!(request.header_value("platform"), Some("3"));
        assert_eq!(request.header_value("vName"), Some("1.0.0"));
    }

    let arknights = &transport.requests_to(ARKNIGHTS_ATTENDANCE_URL)[0];
    assert_eq!(arknights.body.as_deref(), Some(r#"{"gameId":1,"uid":"10001"}"#));
}

#[tokio::test]
async fn signing_timestamp_lags_the_clock() {
    init_tracing();
    let transport = ScriptedTransport::new();
    scripted_login(&transport, CRED_TOKEN);
    scripted_bindings(&transport);

    let runner = AttendanceRunner::new(transport.clone(), Vec::new());
    let before = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();
    runner.run("token-1234-abcd").await;

    let binding = &transport.requests_to(BINDING_URL)[0];
    let timestamp: u64 = binding.header_value("timestamp").unwrap().parse().unwrap();
    assert!(timestamp + 2 >= before);
    assert!(timestamp + 2 <= before + 5);
}
