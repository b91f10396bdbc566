//! # 角色编辑草稿
//!
//! 编辑在角色的深拷贝上进行，只有提交时才写回注册表：
//!
//! ```text
//! 查看 --begin_edit--> Editing --commit--> Saved
//!                         |
//!                         +----discard---> Cancelled
//! ```
//!
//! 提交失败时草稿保持 `Editing`，用户修正后可以再次提交。

use admin_types::{ActionKind, Role};
use serde::{Deserialize, Serialize};

use crate::aggregation;
use crate::error::{PermissionResult, RoleError};

/// 草稿状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftState {
    /// 编辑中
    Editing,
    /// 已保存
    Saved,
    /// 已取消
    Cancelled,
}

/// 角色编辑草稿
#[derive(Debug, Clone)]
pub struct RoleDraft {
    original: Role,
    working: Role,
    state: DraftState,
}

impl RoleDraft {
    /// 基于已提交的角色开始编辑
    pub fn begin(role: &Role) -> Self {
        Self {
            original: role.clone(),
            working: role.clone(),
            state: DraftState::Editing,
        }
    }

    /// 当前编辑中的角色
    pub fn role(&self) -> &Role {
        &self.working
    }

    /// 开始编辑时的角色
    pub fn original(&self) -> &Role {
        &self.original
    }

    pub fn state(&self) -> DraftState {
        self.state
    }

    /// 是否有未保存的修改
    pub fn is_dirty(&self) -> bool {
        self.working != self.original
    }

    pub(crate) fn ensure_editing(&self) -> PermissionResult<()> {
        match self.state {
            DraftState::Editing => Ok(()),
            state => Err(RoleError::DraftClosed(state)),
        }
    }

    fn apply(&mut self, edit: impl FnOnce(&Role) -> PermissionResult<Role>) -> PermissionResult<()> {
        self.ensure_editing()?;
        self.working = edit(&self.working)?;
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> PermissionResult<()> {
        self.ensure_editing()?;
        self.working.name = name.into();
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> PermissionResult<()> {
        self.ensure_editing()?;
        self.working.description = description.into();
        Ok(())
    }

    pub fn set_color(&mut self, color: impl Into<String>) -> PermissionResult<()> {
        self.ensure_editing()?;
        self.working.color = color.into();
        Ok(())
    }

    pub fn toggle_action(&mut self, page_id: &str, action: ActionKind) -> PermissionResult<()> {
        self.apply(|role| aggregation::toggle_action(role, page_id, action))
    }

    pub fn set_module(&mut self, module: &str, enabled: bool) -> PermissionResult<()> {
        self.apply(|role| Ok(aggregation::set_module(role, module, enabled)))
    }

    pub fn set_page(&mut self, page_id: &str, enabled: bool) -> PermissionResult<()> {
        self.apply(|role| aggregation::set_page(role, page_id, enabled))
    }

    pub fn set_action(&mut self, action: ActionKind, enabled: bool) -> PermissionResult<()> {
        self.apply(|role| Ok(aggregation::set_action(role, action, enabled)))
    }

    pub fn set_all(&mut self, enabled: bool) -> PermissionResult<()> {
        self.apply(|role| Ok(aggregation::set_all(role, enabled)))
    }

    /// 放弃修改，恢复为开始编辑时的角色
    pub fn discard(&mut self) -> PermissionResult<()> {
        self.ensure_editing()?;
        self.working = self.original.clone();
        self.state = DraftState::Cancelled;
        Ok(())
    }

    /// 标记为已保存，以注册表返回的角色为准
    pub(crate) fn mark_saved(&mut self, saved: Role) {
        self.original = saved.clone();
        self.working = saved;
        self.state = DraftState::Saved;
    }
}
