use api_contract::{ReportDto, ReportRequest, SensorDto};
use chrono::{TimeZone, Utc};
use domain::{Report, ReportDraft};
use serde_json::{Value, json};

fn draft() -> ReportDraft {
    ReportDraft {
        date: Utc.with_ymd_and_hms(2025, 9, 14, 8, 30, 0).unwrap(),
        user_id: 2,
        work_id: 3,
        operation_id: 13,
        kind_id: 5,
        feature_id: Some(1),
        value: Some(12.5),
        note: Some("after racking".to_string()),
    }
}

#[test]
fn report_request_encodes_iso_date_and_note() {
    let request = ReportRequest::from(&draft());
    let value = serde_json::to_value(&request).expect("serialize");
    assert_eq!(value["date"], "2025-09-14T08:30:00Z");
    assert_eq!(value["feature_id"], 1);
    assert_eq!(value["value"], 12.5);
    assert_eq!(value["note"], "after racking");
}

#[test]
fn report_without_feature_omits_feature_and_value() {
    let draft = ReportDraft {
        feature_id: None,
        value: None,
        note: None,
        ..draft()
    };
    let value = serde_json::to_value(ReportRequest::from(&draft)).expect("serialize");
    assert!(value.get("feature_id").is_none());
    assert!(value.get("value").is_none());
    assert_eq!(value["note"], "");
}

#[test]
fn server_report_preserves_submitted_fields() {
    let submitted = draft();
    let mut body = serde_json::to_value(ReportRequest::from(&submitted)).expect("serialize");
    // 服务端补上 id 与联表名称后原样返回。
    if let Value::Object(fields) = &mut body {
        fields.insert("id".to_string(), json!(41));
        fields.insert("username".to_string(), json!("maria"));
        fields.insert("date".to_string(), json!("2025-09-14T08:30:00.000Z"));
    }

    let dto: ReportDto = serde_json::from_value(body).expect("parse");
    let report = Report::from(dto);
    assert_eq!(report.id, 41);
    assert_eq!(report.names.username.as_deref(), Some("maria"));
    assert_eq!(ReportDraft::from(&report), submitted);
}

#[test]
fn empty_server_note_becomes_none() {
    let dto: ReportDto = serde_json::from_value(json!({
        "id": 1,
        "date": "2025-01-02 10:00:00",
        "user_id": 1,
        "work_id": 1,
        "operation_id": 1,
        "kind_id": 1,
        "feature_id": null,
        "value": null,
        "note": "",
    }))
    .expect("parse");
    let report = Report::from(dto);
    assert_eq!(report.note, None);
    assert_eq!(report.date, Utc.with_ymd_and_hms(2025, 1, 2, 10, 0, 0).unwrap());
}

#[test]
fn sensor_rejects_malformed_date() {
    let result = serde_json::from_value::<SensorDto>(json!({
        "id": 1,
        "name": "probe",
        "unit": "C",
        "position": "top",
        "date": "soon",
    }));
    assert!(result.is_err());
}
