//! # 角色注册表
//!
//! 独占持有全部角色，是角色集合的唯一修改者。所有校验都在同一把写锁内、
//! 修改之前完成，任何操作要么完全成功，要么不留下任何变化。

use admin_types::{NewRole, Role};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info, warn};

use crate::audit::{AuditEntry, AuditOperation, AuditOutcome, AuditTrail};
use crate::catalog::PageCatalog;
use crate::draft::RoleDraft;
use crate::error::{PermissionResult, RoleError};
use crate::factory::{conforms_to_catalog, create_permissions};
use crate::seed::default_roles;

/// 注册表配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionConfig {
    /// 是否启用审计日志
    pub enable_audit: bool,
    /// 最大审计日志数量
    pub max_audit_logs: usize,
    /// 启动时是否写入默认角色
    pub seed_default_roles: bool,
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self {
            enable_audit: true,
            max_audit_logs: 1000,
            seed_default_roles: true,
        }
    }
}

/// 角色注册表
///
/// 方法均接收 `&self`，可以放进 `Arc` 在多个调用方之间共享。
#[derive(Debug)]
pub struct RoleRegistry {
    catalog: Arc<PageCatalog>,
    roles: RwLock<Vec<Role>>,
    audit: AuditTrail,
    config: PermissionConfig,
}

/// 去掉首尾空白后的角色名称，为空时返回校验错误
fn validate_name(name: &str) -> PermissionResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RoleError::Validation("角色名称不能为空".to_string()));
    }
    Ok(trimmed.to_string())
}

impl RoleRegistry {
    /// 使用默认配置创建注册表
    pub fn new(catalog: Arc<PageCatalog>) -> PermissionResult<Self> {
        Self::with_config(catalog, PermissionConfig::default())
    }

    /// 使用配置创建注册表
    ///
    /// # 参数
    ///
    /// * `catalog` - 共享的页面目录
    /// * `config` - 注册表配置
    ///
    /// # 返回值
    ///
    /// 返回注册表实例；默认角色构造失败时返回错误
    pub fn with_config(catalog: Arc<PageCatalog>, config: PermissionConfig) -> PermissionResult<Self> {
        let roles = if config.seed_default_roles {
            default_roles(&catalog)?
        } else {
            Vec::new()
        };

        info!(
            "角色注册表初始化完成: {} 个页面, {} 个模块, {} 个默认角色",
            catalog.len(),
            catalog.list_modules().len(),
            roles.len()
        );

        Ok(Self {
            audit: AuditTrail::new(config.enable_audit, config.max_audit_logs),
            catalog,
            roles: RwLock::new(roles),
            config,
        })
    }

    /// 页面目录
    pub fn catalog(&self) -> &Arc<PageCatalog> {
        &self.catalog
    }

    /// 注册表配置
    pub fn config(&self) -> &PermissionConfig {
        &self.config
    }

    /// 角色数量
    pub fn len(&self) -> usize {
        self.roles.read().len()
    }

    /// 注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.roles.read().is_empty()
    }

    /// 列出角色
    ///
    /// `filter` 为 `Some` 时只返回名称或描述包含关键字（不区分大小写）的角色，按插入顺序。
    pub fn list_roles(&self, filter: Option<&str>) -> Vec<Role> {
        let roles = self.roles.read();
        match filter {
            Some(keyword) => roles.iter().filter(|r| r.matches(keyword)).cloned().collect(),
            None => roles.clone(),
        }
    }

    /// 按ID获取角色
    pub fn get_role(&self, role_id: &str) -> PermissionResult<Role> {
        self.roles
            .read()
            .iter()
            .find(|r| r.id == role_id)
            .cloned()
            .ok_or_else(|| RoleError::RoleNotFound(role_id.to_string()))
    }

    /// 创建角色
    ///
    /// 新角色的所有权限默认关闭。
    pub fn create_role(&self, new_role: NewRole) -> PermissionResult<Role> {
        let attempted = new_role.name.clone();
        let result = validate_name(&new_role.name).map(|name| {
            let role = Role::new(
                name,
                new_role.description,
                new_role.color,
                create_permissions(&self.catalog, false),
            );
            self.roles.write().push(role.clone());
            role
        });

        self.audit_outcome(AuditOperation::CreateRole, None, &attempted, &result);
        result
    }

    /// 复制角色
    ///
    /// 深拷贝源角色的权限，生成新ID和创建时间，复制品始终不是内置角色。
    pub fn duplicate_role(&self, source_id: &str) -> PermissionResult<Role> {
        let result = {
            let mut roles = self.roles.write();
            match roles.iter().find(|r| r.id == source_id) {
                Some(source) => {
                    let copy = Role::new(
                        format!("{} (Copy)", source.name),
                        source.description.clone(),
                        source.color.clone(),
                        source.permissions.clone(),
                    );
                    roles.push(copy.clone());
                    Ok(copy)
                }
                None => Err(RoleError::RoleNotFound(source_id.to_string())),
            }
        };

        self.audit_outcome(AuditOperation::DuplicateRole, Some(source_id), "", &result);
        result
    }

    /// 更新角色
    ///
    /// 保留已存储角色的 `id`、`created_at` 和 `is_system`，版本号加一。
    ///
    /// # 错误
    ///
    /// * `RoleNotFound` - 角色不存在
    /// * `Validation` - 名称为空，或权限列表与目录形状不一致
    /// * `ProtectedField` - 尝试重命名内置角色
    /// * `StaleVersion` - 角色在读取之后已被其他人保存
    pub fn update_role(&self, role: Role) -> PermissionResult<Role> {
        let role_id = role.id.clone();
        let attempted = role.name.clone();
        let result = self.apply_update(role);

        self.audit_outcome(AuditOperation::UpdateRole, Some(&role_id), &attempted, &result);
        result
    }

    fn apply_update(&self, role: Role) -> PermissionResult<Role> {
        let mut roles = self.roles.write();
        let stored = roles
            .iter_mut()
            .find(|r| r.id == role.id)
            .ok_or_else(|| RoleError::RoleNotFound(role.id.clone()))?;

        let name = validate_name(&role.name)?;
        if stored.is_system && name != stored.name {
            return Err(RoleError::ProtectedField {
                role: stored.name.clone(),
                field: "name",
            });
        }
        if !conforms_to_catalog(&self.catalog, &role.permissions) {
            return Err(RoleError::Validation("权限列表与页面目录不一致".to_string()));
        }
        if role.version != stored.version {
            return Err(RoleError::StaleVersion {
                role_id: role.id,
                expected: role.version,
                actual: stored.version,
            });
        }

        let updated = Role {
            id: stored.id.clone(),
            name,
            description: role.description,
            color: role.color,
            is_system: stored.is_system,
            created_at: stored.created_at,
            updated_at: SystemTime::now(),
            version: stored.version + 1,
            permissions: role.permissions,
        };
        *stored = updated.clone();
        Ok(updated)
    }

    /// 删除角色
    ///
    /// 内置角色不可删除。
    pub fn delete_role(&self, role_id: &str) -> PermissionResult<()> {
        let result = {
            let mut roles = self.roles.write();
            match roles.iter().position(|r| r.id == role_id) {
                None => Err(RoleError::RoleNotFound(role_id.to_string())),
                Some(index) if roles[index].is_system => {
                    Err(RoleError::ProtectedRole(roles[index].name.clone()))
                }
                Some(index) => Ok(roles.remove(index)),
            }
        };

        self.audit_outcome(AuditOperation::DeleteRole, Some(role_id), "", &result);
        result.map(|_| ())
    }

    /// 开始编辑角色，返回已提交角色的草稿
    pub fn begin_edit(&self, role_id: &str) -> PermissionResult<RoleDraft> {
        let role = self.get_role(role_id)?;
        debug!("开始编辑角色: {} ({})", role.name, role.id);
        Ok(RoleDraft::begin(&role))
    }

    /// 提交草稿
    ///
    /// 成功后草稿进入 `Saved`；失败时草稿保持 `Editing`，可以修正后再次提交。
    pub fn commit(&self, draft: &mut RoleDraft) -> PermissionResult<Role> {
        draft.ensure_editing()?;
        let saved = self.update_role(draft.role().clone())?;
        draft.mark_saved(saved.clone());
        Ok(saved)
    }

    /// 放弃草稿
    pub fn discard(&self, draft: &mut RoleDraft) -> PermissionResult<()> {
        draft.discard()?;
        debug!("放弃编辑角色: {}", draft.role().id);
        Ok(())
    }

    /// 最近的审计记录，最新的在前
    pub fn audit_log(&self, limit: usize) -> Vec<AuditEntry> {
        self.audit.recent(limit)
    }

    fn audit_outcome(
        &self,
        operation: AuditOperation,
        role_id: Option<&str>,
        role_name: &str,
        result: &PermissionResult<Role>,
    ) {
        match result {
            Ok(role) => {
                info!("{}成功: {} ({})", operation, role.name, role.id);
                self.audit.record(
                    operation,
                    &role.id,
                    &role.name,
                    AuditOutcome::Success,
                    format!("{}: {}", operation, role.name),
                );
            }
            Err(err) => {
                warn!("{}被拒绝: {}", operation, err);
                self.audit.record(
                    operation,
                    role_id.unwrap_or("-"),
                    role_name,
                    AuditOutcome::Rejected,
                    err.to_string(),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{count_enabled, set_module, toggle_action};
    use crate::seed::{OPERATIONS_MANAGER, SUPER_ADMIN};
    use admin_types::ActionKind;

    fn registry() -> RoleRegistry {
        RoleRegistry::new(Arc::new(PageCatalog::builtin())).unwrap()
    }

    fn find_by_name(registry: &RoleRegistry, name: &str) -> Role {
        registry
            .list_roles(None)
            .into_iter()
            .find(|r| r.name == name)
            .unwrap()
    }

    #[test]
    fn test_registry_seeds_default_roles() {
        let registry = registry();
        assert_eq!(registry.len(), 4);

        let empty = RoleRegistry::with_config(
            Arc::new(PageCatalog::builtin()),
            PermissionConfig {
                seed_default_roles: false,
                ..PermissionConfig::default()
            },
        )
        .unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_create_role() -> PermissionResult<()> {
        let registry = registry();
        let role = registry.create_role(NewRole::new("  Support Agent ", "Investor tickets").with_color("teal"))?;

        assert_eq!(role.name, "Support Agent");
        assert_eq!(role.color, "teal");
        assert!(!role.is_system);
        assert_eq!(role.version, 1);
        assert_eq!(count_enabled(&role).enabled, 0);
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.list_roles(None).last(), Some(&role));
        Ok(())
    }

    #[test]
    fn test_create_rejects_blank_names() {
        let registry = registry();
        for name in ["", "   ", "\t\n"] {
            let result = registry.create_role(NewRole::new(name, "x"));
            assert!(matches!(result, Err(RoleError::Validation(_))));
        }
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_created_ids_are_unique() {
        let registry = registry();
        let a = registry.create_role(NewRole::new("Desk", "")).unwrap();
        let b = registry.create_role(NewRole::new("Desk", "")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_list_roles_filter() {
        let registry = registry();
        registry.create_role(NewRole::new("Support Agent", "Handles NPS queries")).unwrap();

        let names = |filter| {
            registry
                .list_roles(Some(filter))
                .into_iter()
                .map(|r| r.name)
                .collect::<Vec<_>>()
        };
        assert_eq!(names("ADMIN"), vec![SUPER_ADMIN]);
        assert_eq!(names("nps"), vec![OPERATIONS_MANAGER, "Support Agent"]);
        assert!(names("mutual fund").is_empty());
        assert_eq!(names("").len(), 5);
    }

    #[test]
    fn test_duplicate_role() -> PermissionResult<()> {
        let registry = registry();
        let source = find_by_name(&registry, SUPER_ADMIN);

        let copy = registry.duplicate_role(&source.id)?;
        assert_eq!(copy.name, "Super Admin (Copy)");
        assert_ne!(copy.id, source.id);
        assert!(!copy.is_system);
        assert_eq!(copy.permissions, source.permissions);
        assert_eq!(copy.version, 1);
        assert_eq!(registry.len(), 5);

        // 复制品可以删除
        registry.delete_role(&copy.id)?;
        assert_eq!(registry.len(), 4);
        Ok(())
    }

    #[test]
    fn test_duplicate_missing_role() {
        let registry = registry();
        assert_eq!(
            registry.duplicate_role("missing"),
            Err(RoleError::RoleNotFound("missing".to_string()))
        );
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_update_role() -> PermissionResult<()> {
        let registry = registry();
        let role = registry.create_role(NewRole::new("Desk", ""))?;

        let mut edited = set_module(&role, "Bonds", true);
        edited.name = "Bond Desk".to_string();
        edited.description = "Bond operations".to_string();

        let saved = registry.update_role(edited)?;
        assert_eq!(saved.name, "Bond Desk");
        assert_eq!(saved.version, 2);
        assert_eq!(saved.created_at, role.created_at);
        assert_eq!(registry.get_role(&role.id)?, saved);
        Ok(())
    }

    #[test]
    fn test_update_keeps_identity_fields() -> PermissionResult<()> {
        let registry = registry();
        let role = registry.create_role(NewRole::new("Desk", ""))?;

        let mut edited = role.clone();
        edited.is_system = true;
        edited.created_at = SystemTime::UNIX_EPOCH;

        let saved = registry.update_role(edited)?;
        assert!(!saved.is_system);
        assert_eq!(saved.created_at, role.created_at);
        Ok(())
    }

    #[test]
    fn test_update_errors_leave_state_unchanged() {
        let registry = registry();
        let role = registry.create_role(NewRole::new("Desk", "")).unwrap();

        let mut ghost = role.clone();
        ghost.id = "missing".to_string();
        assert!(matches!(registry.update_role(ghost), Err(RoleError::RoleNotFound(_))));

        let mut blank = role.clone();
        blank.name = " ".to_string();
        assert!(matches!(registry.update_role(blank), Err(RoleError::Validation(_))));

        let mut malformed = role.clone();
        malformed.permissions.pop();
        assert!(matches!(registry.update_role(malformed), Err(RoleError::Validation(_))));

        assert_eq!(registry.get_role(&role.id).unwrap(), role);
    }

    #[test]
    fn test_system_role_rename_rejected() {
        let registry = registry();
        let admin = find_by_name(&registry, SUPER_ADMIN);

        let mut renamed = admin.clone();
        renamed.name = "Root".to_string();
        assert_eq!(
            registry.update_role(renamed),
            Err(RoleError::ProtectedField {
                role: SUPER_ADMIN.to_string(),
                field: "name",
            })
        );

        // 权限和描述仍然可以修改
        let mut edited = toggle_action(&admin, "system-settings", ActionKind::Edit).unwrap();
        edited.description = "Platform owners".to_string();
        let saved = registry.update_role(edited).unwrap();
        assert!(saved.is_system);
        assert_eq!(saved.name, SUPER_ADMIN);
    }

    #[test]
    fn test_stale_update_rejected() {
        let registry = registry();
        let role = registry.create_role(NewRole::new("Desk", "")).unwrap();

        let first = set_module(&role, "IPO", true);
        let second = set_module(&role, "NPS", true);

        registry.update_role(first).unwrap();
        let err = registry.update_role(second).unwrap_err();
        assert_eq!(
            err,
            RoleError::StaleVersion {
                role_id: role.id.clone(),
                expected: 1,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_delete_role() {
        let registry = registry();
        let role = registry.create_role(NewRole::new("Temp", "")).unwrap();

        registry.delete_role(&role.id).unwrap();
        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.delete_role(&role.id),
            Err(RoleError::RoleNotFound(role.id.clone()))
        );
    }

    #[test]
    fn test_delete_system_role_rejected() {
        let registry = registry();
        for role in registry.list_roles(None).into_iter().filter(|r| r.is_system) {
            assert_eq!(
                registry.delete_role(&role.id),
                Err(RoleError::ProtectedRole(role.name.clone()))
            );
        }
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_draft_commit_and_retry() -> PermissionResult<()> {
        let registry = registry();
        let role = find_by_name(&registry, OPERATIONS_MANAGER);

        let mut draft = registry.begin_edit(&role.id)?;
        draft.set_module("Content", true)?;
        draft.set_name("")?;

        assert!(matches!(registry.commit(&mut draft), Err(RoleError::Validation(_))));
        assert_eq!(draft.state(), crate::draft::DraftState::Editing);
        assert_eq!(registry.get_role(&role.id)?, role);

        draft.set_name("Ops Lead")?;
        let saved = registry.commit(&mut draft)?;
        assert_eq!(saved.name, "Ops Lead");
        assert_eq!(draft.state(), crate::draft::DraftState::Saved);
        assert!(!draft.is_dirty());
        assert!(matches!(registry.commit(&mut draft), Err(RoleError::DraftClosed(_))));
        Ok(())
    }

    #[test]
    fn test_draft_discard_leaves_registry() -> PermissionResult<()> {
        let registry = registry();
        let role = find_by_name(&registry, OPERATIONS_MANAGER);

        let mut draft = registry.begin_edit(&role.id)?;
        draft.set_all(false)?;
        registry.discard(&mut draft)?;

        assert_eq!(registry.get_role(&role.id)?, role);
        assert_eq!(draft.role(), &role);
        Ok(())
    }

    #[test]
    fn test_audit_records_success_and_rejection() {
        let registry = registry();
        let role = registry.create_role(NewRole::new("Desk", "")).unwrap();
        let admin = find_by_name(&registry, SUPER_ADMIN);
        let _ = registry.delete_role(&admin.id);

        let log = registry.audit_log(10);
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].operation, AuditOperation::DeleteRole);
        assert_eq!(log[0].outcome, AuditOutcome::Rejected);
        assert_eq!(log[0].role_id, admin.id);
        assert_eq!(log[1].operation, AuditOperation::CreateRole);
        assert_eq!(log[1].outcome, AuditOutcome::Success);
        assert_eq!(log[1].role_id, role.id);
    }

    #[test]
    fn test_concurrent_creates() {
        let registry = Arc::new(registry());
        std::thread::scope(|scope| {
            for worker in 0..4 {
                let registry = Arc::clone(&registry);
                scope.spawn(move || {
                    for i in 0..25 {
                        registry
                            .create_role(NewRole::new(format!("Desk {}-{}", worker, i), ""))
                            .unwrap();
                    }
                });
            }
        });

        let roles = registry.list_roles(None);
        assert_eq!(roles.len(), 104);
        let ids: std::collections::HashSet<&str> = roles.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 104);
    }
}
