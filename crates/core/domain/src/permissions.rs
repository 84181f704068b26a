//! 角色权限映射与差分。
//!
//! 权限是 resource_id → action_id 集合的映射。编辑角色时界面给出完整的
//! 开关矩阵，提交前计算新旧映射的差分，只上送需要新增和删除的部分。

use crate::data::{Action, Resource, Role};
use std::collections::{BTreeMap, BTreeSet};

pub type ResourceId = i64;
pub type ActionId = i64;

/// 单个资源上允许的动作列表（线上格式）。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permission {
    pub resource_id: ResourceId,
    pub action_ids: Vec<ActionId>,
}

impl Permission {
    pub fn new(resource_id: ResourceId, action_ids: Vec<ActionId>) -> Self {
        Self {
            resource_id,
            action_ids,
        }
    }
}

/// 资源 → 动作集合。
///
/// 不变量：不保存空集合，空资源在写入时即被移除。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionMap {
    entries: BTreeMap<ResourceId, BTreeSet<ActionId>>,
}

impl PermissionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 合并线上权限列表；同一资源出现多次时取并集。
    pub fn from_permissions(permissions: &[Permission]) -> Self {
        let mut map = Self::new();
        for permission in permissions {
            for action_id in &permission.action_ids {
                map.grant(permission.resource_id, *action_id);
            }
        }
        map
    }

    /// 转回线上格式，按 resource_id 升序。
    pub fn to_permissions(&self) -> Vec<Permission> {
        self.entries
            .iter()
            .map(|(resource_id, actions)| {
                Permission::new(*resource_id, actions.iter().copied().collect())
            })
            .collect()
    }

    pub fn grant(&mut self, resource_id: ResourceId, action_id: ActionId) -> bool {
        self.entries.entry(resource_id).or_default().insert(action_id)
    }

    pub fn revoke(&mut self, resource_id: ResourceId, action_id: ActionId) -> bool {
        let Some(actions) = self.entries.get_mut(&resource_id) else {
            return false;
        };
        let removed = actions.remove(&action_id);
        if actions.is_empty() {
            self.entries.remove(&resource_id);
        }
        removed
    }

    pub fn contains(&self, resource_id: ResourceId, action_id: ActionId) -> bool {
        self.entries
            .get(&resource_id)
            .is_some_and(|actions| actions.contains(&action_id))
    }

    pub fn actions(&self, resource_id: ResourceId) -> Option<&BTreeSet<ActionId>> {
        self.entries.get(&resource_id)
    }

    pub fn resources(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, &BTreeSet<ActionId>)> + '_ {
        self.entries.iter().map(|(id, actions)| (*id, actions))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 资源数量（不是动作数量）。
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn set_actions(&mut self, resource_id: ResourceId, actions: BTreeSet<ActionId>) {
        if actions.is_empty() {
            self.entries.remove(&resource_id);
        } else {
            self.entries.insert(resource_id, actions);
        }
    }
}

impl FromIterator<(ResourceId, ActionId)> for PermissionMap {
    fn from_iter<I: IntoIterator<Item = (ResourceId, ActionId)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (resource_id, action_id) in iter {
            map.grant(resource_id, action_id);
        }
        map
    }
}

/// 新旧权限映射的差分结果。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionDiff {
    pub inserts: PermissionMap,
    pub deletes: PermissionMap,
}

impl PermissionDiff {
    /// 在新旧映射涉及的全部资源上计算差分。
    pub fn compute(old: &PermissionMap, new: &PermissionMap) -> Self {
        let resources: BTreeSet<ResourceId> = old.resources().chain(new.resources()).collect();
        Self::compute_for_catalog(resources, old, new)
    }

    /// 仅在给定资源目录上计算差分，目录外的资源被忽略。
    pub fn compute_for_catalog(
        resources: impl IntoIterator<Item = ResourceId>,
        old: &PermissionMap,
        new: &PermissionMap,
    ) -> Self {
        let empty = BTreeSet::new();
        let mut diff = Self::default();
        for resource_id in resources {
            let before = old.actions(resource_id).unwrap_or(&empty);
            let after = new.actions(resource_id).unwrap_or(&empty);
            diff.inserts
                .set_actions(resource_id, after.difference(before).copied().collect());
            diff.deletes
                .set_actions(resource_id, before.difference(after).copied().collect());
        }
        diff
    }

    /// 把差分应用到旧映射：先删后增。
    pub fn apply(&self, old: &PermissionMap) -> PermissionMap {
        let mut result = old.clone();
        for (resource_id, actions) in self.deletes.iter() {
            for action_id in actions {
                result.revoke(resource_id, *action_id);
            }
        }
        for (resource_id, actions) in self.inserts.iter() {
            for action_id in actions {
                result.grant(resource_id, *action_id);
            }
        }
        result
    }

    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.deletes.is_empty()
    }
}

/// 权限矩阵中的一个资源行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePermission {
    pub resource_id: ResourceId,
    pub actions: Vec<(ActionId, bool)>,
}

/// 角色编辑用的开关矩阵：资源目录 × 动作目录。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionMatrix {
    rows: Vec<ResourcePermission>,
}

impl PermissionMatrix {
    pub fn from_role(role: &Role, resources: &[Resource], actions: &[Action]) -> Self {
        let granted = PermissionMap::from_permissions(&role.permissions);
        let rows = resources
            .iter()
            .map(|resource| ResourcePermission {
                resource_id: resource.id,
                actions: actions
                    .iter()
                    .map(|action| (action.id, granted.contains(resource.id, action.id)))
                    .collect(),
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[ResourcePermission] {
        &self.rows
    }

    /// 设置单个开关；矩阵中不存在该格时返回 false。
    pub fn set(&mut self, resource_id: ResourceId, action_id: ActionId, permitted: bool) -> bool {
        let cell = self
            .rows
            .iter_mut()
            .find(|row| row.resource_id == resource_id)
            .and_then(|row| row.actions.iter_mut().find(|(id, _)| *id == action_id));
        match cell {
            Some((_, value)) => {
                *value = permitted;
                true
            }
            None => false,
        }
    }

    pub fn is_permitted(&self, resource_id: ResourceId, action_id: ActionId) -> bool {
        self.rows
            .iter()
            .find(|row| row.resource_id == resource_id)
            .and_then(|row| row.actions.iter().find(|(id, _)| *id == action_id))
            .is_some_and(|(_, permitted)| *permitted)
    }

    pub fn resource_ids(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.rows.iter().map(|row| row.resource_id)
    }

    pub fn to_permission_map(&self) -> PermissionMap {
        self.rows
            .iter()
            .flat_map(|row| {
                row.actions
                    .iter()
                    .filter(|(_, permitted)| *permitted)
                    .map(move |(action_id, _)| (row.resource_id, *action_id))
            })
            .collect()
    }

    /// 与角色当前权限比较，差分范围限定在矩阵的资源目录内。
    pub fn diff_against(&self, role: &Role) -> PermissionDiff {
        let old = PermissionMap::from_permissions(&role.permissions);
        PermissionDiff::compute_for_catalog(self.resource_ids(), &old, &self.to_permission_map())
    }
}

/// 权限的可读描述行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionLine {
    pub resource: String,
    pub actions: Vec<String>,
}

/// 把权限映射翻译成名称；目录中缺失的 id 显示为 `#id`。
pub fn describe(map: &PermissionMap, resources: &[Resource], actions: &[Action]) -> Vec<PermissionLine> {
    map.iter()
        .map(|(resource_id, action_ids)| PermissionLine {
            resource: resources
                .iter()
                .find(|resource| resource.id == resource_id)
                .map(|resource| resource.name.clone())
                .unwrap_or_else(|| format!("#{resource_id}")),
            actions: action_ids
                .iter()
                .map(|action_id| {
                    actions
                        .iter()
                        .find(|action| action.id == *action_id)
                        .map(|action| action.name.clone())
                        .unwrap_or_else(|| format!("#{action_id}"))
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(ResourceId, &[ActionId])]) -> PermissionMap {
        entries
            .iter()
            .flat_map(|(resource, actions)| actions.iter().map(move |action| (*resource, *action)))
            .collect()
    }

    #[test]
    fn revoke_last_action_drops_resource() {
        let mut permissions = map(&[(1, &[10])]);
        assert!(permissions.revoke(1, 10));
        assert!(permissions.is_empty());
        assert!(!permissions.revoke(1, 10));
    }

    #[test]
    fn from_permissions_merges_duplicates() {
        let permissions = PermissionMap::from_permissions(&[
            Permission::new(2, vec![1]),
            Permission::new(2, vec![3, 1]),
            Permission::new(5, vec![]),
        ]);
        assert_eq!(permissions.to_permissions(), vec![Permission::new(2, vec![1, 3])]);
    }

    #[test]
    fn catalog_diff_ignores_unknown_resources() {
        let old = map(&[(1, &[1])]);
        let new = map(&[(1, &[1]), (99, &[1])]);
        let diff = PermissionDiff::compute_for_catalog([1, 2], &old, &new);
        assert!(diff.is_empty());
    }
}
