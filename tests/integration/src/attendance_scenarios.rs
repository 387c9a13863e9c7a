//! Full account runs against the scripted portal.

use crate::test_utils::{init_tracing, scripted_bindings, scripted_login, ScriptedTransport};
use serde_json::json;
use skas_attendance::{
    AttendanceRunner, ARKNIGHTS_ATTENDANCE_URL, BINDING_URL, CRED_URL, ENDFIELD_ATTENDANCE_URL,
    GRANT_URL, ROLE_HEADER,
};
use skas_core::GameCode;
use skas_identity::FINGERPRINT_URL;
use skas_notify::{Delivery, Notifier};

fn fingerprint_ok(transport: &std::sync::Arc<ScriptedTransport>) {
    transport.on(
        FINGERPRINT_URL,
        json!({"code": 1100, "detail": {"deviceId": "WHhQsRn2"}}),
    );
}

#[tokio::test]
async fn grant_rejection_aborts_without_attendance() {
    init_tracing();
    let transport = ScriptedTransport::new().on(
        GRANT_URL,
        json!({"status": 1, "msg": "登录已过期，请重新登录"}),
    );
    fingerprint_ok(&transport);

    let runner = AttendanceRunner::new(transport.clone(), GameCode::ALL.to_vec());
    let report = runner.run("expired-token").await;

    assert!(!report.success);
    assert_eq!(
        report.logs,
        vec!["Login/Init Error: OAuth grant failed: 登录已过期，请重新登录"]
    );
    assert!(transport.requests_to(CRED_URL).is_empty());
    assert!(transport.requests_to(BINDING_URL).is_empty());
    assert!(transport.requests_to(ARKNIGHTS_ATTENDANCE_URL).is_empty());
    assert!(transport.requests_to(ENDFIELD_ATTENDANCE_URL).is_empty());
}

#[tokio::test]
async fn only_enabled_games_are_attended() {
    init_tracing();
    let transport = ScriptedTransport::new();
    fingerprint_ok(&transport);
    scripted_login(&transport, "cred-token");
    scripted_bindings(&transport);
    transport
        .on(ARKNIGHTS_ATTENDANCE_URL, json!({"code": 0, "message": "OK"}))
        .on(ENDFIELD_ATTENDANCE_URL, json!({"code": 0, "message": "OK"}));

    let runner = AttendanceRunner::new(transport.clone(), vec![GameCode::Arknights]);
    let report = runner.run("token-1234-abcd").await;

    assert!(report.success);
    assert_eq!(transport.requests_to(ARKNIGHTS_ATTENDANCE_URL).len(), 1);
    assert!(transport.requests_to(ENDFIELD_ATTENDANCE_URL).is_empty());
    assert_eq!(report.logs, vec!["[ARKNIGHTS] Doctor: SUCCESS - OK"]);
}

#[tokio::test]
async fn awards_are_reported() {
    init_tracing();
    let transport = ScriptedTransport::new();
    fingerprint_ok(&transport);
    scripted_login(&transport, "cred-token");
    scripted_bindings(&transport);
    transport.on(
        ARKNIGHTS_ATTENDANCE_URL,
        json!({
            "code": 0,
            "message": "OK",
            "data": {"awards": [{"resource": {"id": "5", "name": "经验"}, "count": 100}]}
        }),
    );

    let runner = AttendanceRunner::new(transport.clone(), vec![GameCode::Arknights]);
    let report = runner.run("token-1234-abcd").await;

    assert!(report.success);
    let line = &report.logs[0];
    assert!(line.contains("SUCCESS"), "{}", line);
    assert!(line.contains("经验x100"), "{}", line);
}

#[tokio::test]
async fn repeat_attendance_is_informational() {
    init_tracing();
    let transport = ScriptedTransport::new();
    fingerprint_ok(&transport);
    scripted_login(&transport, "cred-token");
    scripted_bindings(&transport);
    transport
        .on(
            ARKNIGHTS_ATTENDANCE_URL,
            json!({"code": 10001, "message": "请勿重复签到！", "data": null}),
        )
        .on(
            ENDFIELD_ATTENDANCE_URL,
            json!({"code": 10001, "message": "今天已经签到过了，请勿重复签到"}),
        );

    let runner = AttendanceRunner::new(transport.clone(), GameCode::ALL.to_vec());
    let report = runner.run("token-1234-abcd").await;

    assert!(report.success);
    assert_eq!(report.logs.len(), 2);
    assert!(report.logs.iter().all(|line| line.contains(": INFO - ")));
}

#[tokio::test]
async fn degraded_identity_still_signs_calls() {
    init_tracing();
    let transport = ScriptedTransport::new().on(FINGERPRINT_URL, json!({"code": 1902}));
    scripted_login(&transport, "cred-token");
    scripted_bindings(&transport);
    transport
        .on(ARKNIGHTS_ATTENDANCE_URL, json!({"code": 0}))
        .on(ENDFIELD_ATTENDANCE_URL, json!({"code": 0}));

    let runner = AttendanceRunner::new(transport.clone(), GameCode::ALL.to_vec());
    let report = runner.run("token-1234-abcd").await;

    assert!(report.success);
    let portal_calls: Vec<_> = transport
        .requests()
        .into_iter()
        .filter(|r| r.url != FINGERPRINT_URL)
        .collect();
    assert_eq!(portal_calls.len(), 5);
    for request in &portal_calls {
        assert_eq!(request.header_value("dId"), Some(""), "{}", request.url);
    }
    let endfield = &transport.requests_to(ENDFIELD_ATTENDANCE_URL)[0];
    assert!(endfield.header_value("sign").is_some());
    assert_eq!(endfield.header_value(ROLE_HEADER), Some("3_20001_1"));
}

#[tokio::test]
async fn unreachable_fingerprint_service_is_not_fatal() {
    init_tracing();
    let transport = ScriptedTransport::new();
    scripted_login(&transport, "cred-token");
    scripted_bindings(&transport);
    transport.on(ARKNIGHTS_ATTENDANCE_URL, json!({"code": 0}));

    let runner = AttendanceRunner::new(transport.clone(), vec![GameCode::Arknights]);
    let report = runner.run("token-1234-abcd").await;

    assert!(report.success);
    assert_eq!(transport.requests_to(FINGERPRINT_URL).len(), 1);
    let grant = &transport.requests_to(GRANT_URL)[0];
    assert_eq!(grant.header_value("dId"), Some(""));
}

#[tokio::test]
async fn issued_device_id_is_prefixed() {
    init_tracing();
    let transport = ScriptedTransport::new();
    fingerprint_ok(&transport);
    scripted_login(&transport, "cred-token");
    scripted_bindings(&transport);
    transport.on(ARKNIGHTS_ATTENDANCE_URL, json!({"code": 0}));

    let runner = AttendanceRunner::new(transport.clone(), vec![GameCode::Arknights]);
    runner.run("token-1234-abcd").await;

    let binding = &transport.requests_to(BINDING_URL)[0];
    assert_eq!(binding.header_value("dId"), Some("BWHhQsRn2"));
    assert_eq!(binding.header_value("cred"), Some("cred-value"));
}

#[tokio::test]
async fn accounts_run_in_isolation() {
    init_tracing();
    let transport = ScriptedTransport::new();
    fingerprint_ok(&transport);
    transport
        .on(GRANT_URL, json!({"status": 1, "msg": "token invalid"}))
        .on(GRANT_URL, json!({"status": 0, "data": {"code": "grant-code"}}))
        .on(
            CRED_URL,
            json!({"code": 0, "data": {"cred": "cred-value", "token": "cred-token"}}),
        );
    scripted_bindings(&transport);
    transport.on(ARKNIGHTS_ATTENDANCE_URL, json!({"code": 0}));

    let runner = AttendanceRunner::new(transport.clone(), vec![GameCode::Arknights]);
    let first = runner.run("bad-token-0000").await;
    let second = runner.run("good-token-1111").await;

    assert!(!first.success);
    assert!(second.success);
    assert_eq!(transport.requests_to(FINGERPRINT_URL).len(), 2);
}

#[tokio::test]
async fn report_is_delivered_to_webhook() {
    init_tracing();
    let hook = "https://oapi.dingtalk.com/robot/send";
    let transport = ScriptedTransport::new().on(hook, json!({"errcode": 0}));

    let notifier = Notifier::new(transport.clone(), Some(hook.to_string()));
    let logs = vec![
        "[ARKNIGHTS] Doctor: SUCCESS - OK".to_string(),
        "[ENDFIELD] Endministrator: INFO - 请勿重复签到".to_string(),
    ];
    assert_eq!(notifier.send_report(&logs).await.unwrap(), Delivery::Sent);

    let sent = &transport.requests_to(hook)[0];
    let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["text"]["content"], logs.join("\n"));
}

#[tokio::test]
async fn webhook_failure_is_returned_not_raised() {
    init_tracing();
    let notifier = Notifier::new(
        ScriptedTransport::new(),
        Some("https://example.com/hook".to_string()),
    );
    let result = notifier.send_report(&["line".to_string()]).await;
    assert!(result.is_err());
}
