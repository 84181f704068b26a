use api_contract::{
    CreateBackupRequest, CreateSystemRequest, LoginRequest, OperationDto, RoleDto, TankRequest,
    UpdatePasswordRequest, UpdateRoleRequest, UpdateSystemRequest,
};
use domain::{
    Feature, FeatureRequirement, KindCatalog, Operation, PermissionDiff, PermissionMap, Role,
    TargetType, Taxonomy, Work,
};
use serde_json::{Value, json};

#[test]
fn login_request_is_camel_case() {
    let request = LoginRequest {
        system_id: 3,
        user_id: 7,
        password: "secret".to_string(),
    };
    let value = serde_json::to_value(request).expect("serialize");
    assert_eq!(value, json!({"systemId": 3, "userId": 7, "password": "secret"}));
}

#[test]
fn write_requests_are_snake_case() {
    let system = CreateSystemRequest {
        name: "Bodega".to_string(),
        year: 2025,
        owner_name: "admin".to_string(),
        password: "1234".to_string(),
    };
    let value = serde_json::to_value(system).expect("serialize");
    assert_eq!(value["owner_name"], "admin");
    assert!(value.get("ownerName").is_none());

    let password = UpdatePasswordRequest {
        old_password: "old".to_string(),
        new_password: "newer".to_string(),
    };
    let value = serde_json::to_value(password).expect("serialize");
    assert_eq!(value, json!({"old_password": "old", "new_password": "newer"}));
}

#[test]
fn optional_fields_are_omitted() {
    let tank = TankRequest {
        name: "T1".to_string(),
        note: String::new(),
        material_id: None,
    };
    let value = serde_json::to_value(tank).expect("serialize");
    assert!(value.get("material_id").is_none());

    let patch = UpdateSystemRequest {
        name: None,
        year: Some(2026),
    };
    assert_eq!(serde_json::to_value(patch).expect("serialize"), json!({"year": 2026}));

    let backup = CreateBackupRequest::default();
    assert_eq!(serde_json::to_value(backup).expect("serialize"), json!({}));
}

#[test]
fn role_update_carries_permission_diff() {
    let old: PermissionMap = [(1, 1), (1, 2)].into_iter().collect();
    let new: PermissionMap = [(1, 2), (1, 3)].into_iter().collect();
    let diff = PermissionDiff::compute(&old, &new);

    let request = UpdateRoleRequest::from_diff("Cellar", &diff);
    let value = serde_json::to_value(request).expect("serialize");
    assert_eq!(
        value,
        json!({
            "name": "Cellar",
            "inserts": [{"resource_id": 1, "action_ids": [3]}],
            "deletes": [{"resource_id": 1, "action_ids": [1]}],
        })
    );
}

#[test]
fn role_without_permissions_decodes() {
    let role: RoleDto = serde_json::from_str(r#"{"id":2,"name":"Viewer"}"#).expect("parse");
    let role = Role::from(role);
    assert!(role.permissions.is_empty());
}

#[test]
fn operation_without_target_uses_legacy_rules() {
    let decode = |payload: Value| -> Operation {
        let dto: OperationDto = serde_json::from_value(payload).expect("parse");
        Operation::from(dto)
    };

    let pressing = decode(json!({"id": 1, "name": "Pressing", "work_id": 1}));
    assert_eq!(pressing.target, TargetType::Material);
    assert!(pressing.feature_ids.is_empty());

    let racking = decode(json!({"id": 9, "name": "Racking", "work_id": 2}));
    assert_eq!(racking.target, TargetType::Tank);

    let analysis = decode(json!({"id": 13, "name": "Analysis", "work_id": 2}));
    assert_eq!(analysis.target, TargetType::Tank);
    assert!(analysis.measures_features);

    let unknown = decode(json!({"id": 5, "name": "X", "work_id": 3, "target_type": "barrel"}));
    assert_eq!(unknown.target, TargetType::Tank);
}

#[test]
fn legacy_feature_operation_keeps_kind_of_its_work() {
    let dto: OperationDto =
        serde_json::from_value(json!({"id": 4, "name": "Brix", "work_id": 1})).expect("parse");
    let brix = Operation::from(dto);
    assert_eq!(brix.target, TargetType::Material);
    assert!(brix.measures_features);

    let taxonomy = Taxonomy::new(
        vec![Work {
            id: 1,
            name: "Harvest".to_string(),
        }],
        vec![brix.clone()],
        vec![
            Feature {
                id: 10,
                name: "Brix".to_string(),
                unit: "°Bx".to_string(),
            },
            Feature {
                id: 11,
                name: "Acidity".to_string(),
                unit: "g/L".to_string(),
            },
        ],
    );
    let requirements = taxonomy.requirements(4).expect("known operation");
    assert_eq!(requirements.kind, KindCatalog::Material);
    assert_eq!(
        requirements.feature,
        FeatureRequirement::Required {
            feature_ids: vec![10, 11]
        }
    );

    // 没有线上名称，编码时交回推断规则。
    let encoded = OperationDto::from(&brix);
    assert_eq!(encoded.target_type, None);
    assert_eq!(Operation::from(encoded), brix);
}

#[test]
fn operation_with_target_is_taken_as_is() {
    let dto: OperationDto = serde_json::from_value(json!({
        "id": 4,
        "name": "Density",
        "work_id": 2,
        "target_type": "Tank",
        "feature_ids": [1, 2],
    }))
    .expect("parse");
    let operation = Operation::from(dto);
    assert_eq!(operation.target, TargetType::Tank);
    assert_eq!(operation.feature_ids, vec![1, 2]);

    let encoded = serde_json::to_value(OperationDto::from(&operation)).expect("serialize");
    assert_eq!(encoded["target_type"], "tank");
}
