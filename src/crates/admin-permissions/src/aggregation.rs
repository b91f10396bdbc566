//! # 权限汇总与批量切换
//!
//! 所有函数都是 `(角色) -> 角色` 的纯函数：只读取传入的角色，返回修改后的副本。
//! 它们从不增删权限记录，只改变 `enabled` 标志，因此任意顺序的切换都保持目录形状。

use admin_types::{ActionKind, EnabledCount, ModuleState, PermissionEntry, Role};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PermissionResult, RoleError};

/// 模块汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSummary {
    /// 模块名称
    pub module: String,
    /// 模块下的页面数
    pub pages: usize,
    /// 模块内已启用操作统计
    pub count: EnabledCount,
    /// 汇总状态
    pub state: ModuleState,
}

fn count_entries<'a>(entries: impl Iterator<Item = &'a PermissionEntry>) -> EnabledCount {
    entries.fold(EnabledCount::default(), |acc, entry| EnabledCount {
        enabled: acc.enabled + entry.enabled_count(),
        total: acc.total + entry.actions.len(),
    })
}

fn find_entry<'a>(role: &'a mut Role, page_id: &str) -> PermissionResult<&'a mut PermissionEntry> {
    role.permissions
        .iter_mut()
        .find(|e| e.page_id == page_id)
        .ok_or_else(|| RoleError::PageNotFound(page_id.to_string()))
}

/// 统计角色已启用的操作数和操作总数
pub fn count_enabled(role: &Role) -> EnabledCount {
    count_entries(role.permissions.iter())
}

/// 统计某个模块内已启用的操作数和操作总数
pub fn count_enabled_in_module(role: &Role, module: &str) -> EnabledCount {
    count_entries(role.permissions.iter().filter(|e| e.module == module))
}

/// 模块汇总状态
///
/// 模块内所有操作都启用时为 `AllOn`，全部未启用或模块没有页面时为 `AllOff`，否则为 `SomeOn`。
pub fn module_state(role: &Role, module: &str) -> ModuleState {
    ModuleState::from_count(count_enabled_in_module(role, module))
}

/// 页面汇总状态
pub fn page_state(role: &Role, page_id: &str) -> PermissionResult<ModuleState> {
    let entry = role
        .entry(page_id)
        .ok_or_else(|| RoleError::PageNotFound(page_id.to_string()))?;
    Ok(ModuleState::from_count(EnabledCount {
        enabled: entry.enabled_count(),
        total: entry.actions.len(),
    }))
}

/// 按模块首次出现顺序汇总
pub fn module_summaries(role: &Role) -> Vec<ModuleSummary> {
    let mut summaries: Vec<ModuleSummary> = Vec::new();
    for entry in &role.permissions {
        let index = match summaries.iter().position(|s| s.module == entry.module) {
            Some(index) => index,
            None => {
                summaries.push(ModuleSummary {
                    module: entry.module.clone(),
                    pages: 0,
                    count: EnabledCount::default(),
                    state: ModuleState::AllOff,
                });
                summaries.len() - 1
            }
        };
        let summary = &mut summaries[index];
        summary.pages += 1;
        summary.count.enabled += entry.enabled_count();
        summary.count.total += entry.actions.len();
    }

    for summary in &mut summaries {
        summary.state = ModuleState::from_count(summary.count);
    }
    summaries
}

/// 角色是否拥有某个页面的某个操作
pub fn is_allowed(role: &Role, page_id: &str, action: ActionKind) -> bool {
    role.entry(page_id)
        .and_then(|entry| entry.action(action))
        .is_some_and(|a| a.enabled)
}

/// 切换单个操作的启用状态
///
/// # 参数
///
/// * `role` - 当前角色
/// * `page_id` - 页面标识
/// * `action` - 操作类型
///
/// # 返回值
///
/// 返回切换后的角色；页面不存在返回 `PageNotFound`，页面不支持该操作返回 `ActionNotFound`
pub fn toggle_action(role: &Role, page_id: &str, action: ActionKind) -> PermissionResult<Role> {
    let mut updated = role.clone();
    let entry = find_entry(&mut updated, page_id)?;
    let permission = entry.action_mut(action).ok_or_else(|| RoleError::ActionNotFound {
        page_id: page_id.to_string(),
        action,
    })?;
    permission.enabled = !permission.enabled;

    debug!("角色 {} 切换权限 {}:{} -> {}", role.name, page_id, action, permission.enabled);
    Ok(updated)
}

/// 将单个操作设置为指定状态
///
/// 与 [`toggle_action`] 的错误条件相同，但结果与当前状态无关。
pub fn set_page_action(
    role: &Role,
    page_id: &str,
    action: ActionKind,
    enabled: bool,
) -> PermissionResult<Role> {
    let mut updated = role.clone();
    let entry = find_entry(&mut updated, page_id)?;
    entry
        .action_mut(action)
        .ok_or_else(|| RoleError::ActionNotFound {
            page_id: page_id.to_string(),
            action,
        })?
        .enabled = enabled;
    Ok(updated)
}

/// 将模块内所有操作设置为同一状态
///
/// 没有页面属于该模块时不做任何修改。
pub fn set_module(role: &Role, module: &str, enabled: bool) -> Role {
    let mut updated = role.clone();
    let mut touched = 0usize;
    for entry in updated.permissions.iter_mut().filter(|e| e.module == module) {
        entry.set_all(enabled);
        touched += 1;
    }

    debug!("角色 {} 批量设置模块 {} ({} 个页面) -> {}", role.name, module, touched, enabled);
    updated
}

/// 将页面下所有操作设置为同一状态
pub fn set_page(role: &Role, page_id: &str, enabled: bool) -> PermissionResult<Role> {
    let mut updated = role.clone();
    find_entry(&mut updated, page_id)?.set_all(enabled);

    debug!("角色 {} 批量设置页面 {} -> {}", role.name, page_id, enabled);
    Ok(updated)
}

/// 将所有支持该操作的页面上的该操作设置为同一状态
pub fn set_action(role: &Role, action: ActionKind, enabled: bool) -> Role {
    let mut updated = role.clone();
    for entry in &mut updated.permissions {
        if let Some(permission) = entry.action_mut(action) {
            permission.enabled = enabled;
        }
    }

    debug!("角色 {} 批量设置操作 {} -> {}", role.name, action, enabled);
    updated
}

/// 将角色的所有操作设置为同一状态
pub fn set_all(role: &Role, enabled: bool) -> Role {
    let mut updated = role.clone();
    for entry in &mut updated.permissions {
        entry.set_all(enabled);
    }
    updated
}
