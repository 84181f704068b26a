use domain::permissions::describe;
use domain::{
    Action, ActionId, Permission, PermissionDiff, PermissionMap, PermissionMatrix, Resource,
    ResourceId, Role,
};

const PAIRS: [(ResourceId, ActionId); 4] = [(1, 1), (1, 2), (2, 1), (2, 2)];

fn all_maps() -> Vec<PermissionMap> {
    (0u8..16)
        .map(|mask| {
            PAIRS
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, pair)| *pair)
                .collect()
        })
        .collect()
}

fn role(permissions: Vec<Permission>) -> Role {
    Role {
        id: 1,
        name: "Cellar".to_string(),
        permissions,
    }
}

fn catalog() -> (Vec<Resource>, Vec<Action>) {
    let resources = vec![
        Resource {
            id: 1,
            name: "tanks".to_string(),
        },
        Resource {
            id: 2,
            name: "reports".to_string(),
        },
    ];
    let actions = vec![
        Action {
            id: 1,
            name: "read".to_string(),
        },
        Action {
            id: 2,
            name: "write".to_string(),
        },
        Action {
            id: 3,
            name: "delete".to_string(),
        },
    ];
    (resources, actions)
}

#[test]
fn diff_example_splits_inserts_and_deletes() {
    let old = PermissionMap::from_permissions(&[Permission::new(1, vec![1, 2])]);
    let new = PermissionMap::from_permissions(&[Permission::new(1, vec![2, 3])]);

    let diff = PermissionDiff::compute(&old, &new);

    assert_eq!(diff.inserts.to_permissions(), vec![Permission::new(1, vec![3])]);
    assert_eq!(diff.deletes.to_permissions(), vec![Permission::new(1, vec![1])]);
}

#[test]
fn applying_diff_reproduces_new_mapping() {
    let maps = all_maps();
    for old in &maps {
        for new in &maps {
            let diff = PermissionDiff::compute(old, new);
            assert_eq!(&diff.apply(old), new, "old={old:?} new={new:?}");
        }
    }
}

#[test]
fn untouched_resources_never_appear_in_diff() {
    let maps = all_maps();
    for old in &maps {
        for new in &maps {
            let diff = PermissionDiff::compute_for_catalog([1, 2, 3], old, new);
            for resource in diff.inserts.resources().chain(diff.deletes.resources()) {
                assert!(
                    old.actions(resource).is_some() || new.actions(resource).is_some(),
                    "resource {resource} leaked into diff"
                );
            }
            assert!(diff.inserts.actions(3).is_none());
            assert!(diff.deletes.actions(3).is_none());
        }
    }
}

#[test]
fn identical_mappings_produce_empty_diff() {
    let map = PermissionMap::from_permissions(&[Permission::new(4, vec![1, 2])]);
    assert!(PermissionDiff::compute(&map, &map).is_empty());
}

#[test]
fn matrix_reflects_role_and_tracks_toggles() {
    let (resources, actions) = catalog();
    let role = role(vec![Permission::new(1, vec![1, 2])]);
    let mut matrix = PermissionMatrix::from_role(&role, &resources, &actions);

    assert_eq!(matrix.rows().len(), 2);
    assert!(matrix.is_permitted(1, 1));
    assert!(!matrix.is_permitted(2, 1));

    assert!(matrix.set(1, 1, false));
    assert!(matrix.set(1, 3, true));
    assert!(matrix.set(2, 1, true));
    assert!(!matrix.set(9, 1, true));

    let diff = matrix.diff_against(&role);
    assert_eq!(
        diff.inserts.to_permissions(),
        vec![Permission::new(1, vec![3]), Permission::new(2, vec![1])]
    );
    assert_eq!(diff.deletes.to_permissions(), vec![Permission::new(1, vec![1])]);
}

#[test]
fn matrix_round_trips_untouched_role() {
    let (resources, actions) = catalog();
    let role = role(vec![Permission::new(2, vec![3])]);
    let matrix = PermissionMatrix::from_role(&role, &resources, &actions);

    assert_eq!(matrix.to_permission_map().to_permissions(), role.permissions);
    assert!(matrix.diff_against(&role).is_empty());
}

#[test]
fn describe_uses_names_and_marks_unknown_ids() {
    let (resources, actions) = catalog();
    let map = PermissionMap::from_permissions(&[
        Permission::new(1, vec![1, 7]),
        Permission::new(5, vec![2]),
    ]);

    let lines = describe(&map, &resources, &actions);

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].resource, "tanks");
    assert_eq!(lines[0].actions, vec!["read".to_string(), "#7".to_string()]);
    assert_eq!(lines[1].resource, "#5");
    assert_eq!(lines[1].actions, vec!["write".to_string()]);
}
