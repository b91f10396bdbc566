//! # 后台权限共享类型定义
//!
//! 定义角色、页面目录和权限矩阵在各模块间共享的数据类型，避免循环依赖。
//! 这里只描述数据形状，形状约束（每个角色对目录中每个页面恰好一条权限记录）
//! 由 `admin-permissions` 负责维护。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;
use uuid::Uuid;

/// 页面操作类型
///
/// 封闭的操作集合，新增操作类型时所有 `match` 都会在编译期提示补全。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// 查看
    View,
    /// 编辑
    Edit,
    /// 删除
    Delete,
    /// 新建
    Create,
    /// 审批
    Approve,
    /// 导出
    Export,
}

impl ActionKind {
    /// 全部操作类型，按规范顺序排列
    pub const ALL: [ActionKind; 6] = [
        ActionKind::View,
        ActionKind::Edit,
        ActionKind::Delete,
        ActionKind::Create,
        ActionKind::Approve,
        ActionKind::Export,
    ];

    /// 机器可读的标识
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::View => "view",
            ActionKind::Edit => "edit",
            ActionKind::Delete => "delete",
            ActionKind::Create => "create",
            ActionKind::Approve => "approve",
            ActionKind::Export => "export",
        }
    }

    /// 界面显示标签
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::View => "View",
            ActionKind::Edit => "Edit",
            ActionKind::Delete => "Delete",
            ActionKind::Create => "Create",
            ActionKind::Approve => "Approve",
            ActionKind::Export => "Export",
        }
    }

    /// 是否为只读操作
    pub fn is_read_only(&self) -> bool {
        matches!(self, ActionKind::View | ActionKind::Export)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 无法识别的操作名称
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownActionError(pub String);

impl fmt::Display for UnknownActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "未知的操作类型: {}", self.0)
    }
}

impl std::error::Error for UnknownActionError {}

impl FromStr for ActionKind {
    type Err = UnknownActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| UnknownActionError(s.to_string()))
    }
}

/// 页面描述（目录条目）
///
/// 进程启动时确定，全局共享，任何角色操作都不会修改它。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDescriptor {
    /// 稳定的页面标识
    pub page_id: String,
    /// 页面显示名称
    pub page_name: String,
    /// 所属模块
    pub module: String,
    /// 页面支持的操作（有序）
    pub supported_actions: Vec<ActionKind>,
}

impl PageDescriptor {
    /// 创建页面描述
    pub fn new(
        page_id: impl Into<String>,
        page_name: impl Into<String>,
        module: impl Into<String>,
        supported_actions: Vec<ActionKind>,
    ) -> Self {
        Self {
            page_id: page_id.into(),
            page_name: page_name.into(),
            module: module.into(),
            supported_actions,
        }
    }

    /// 页面是否支持某个操作
    pub fn supports(&self, action: ActionKind) -> bool {
        self.supported_actions.contains(&action)
    }
}

/// 单个操作的授权状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPermission {
    /// 操作类型
    pub action: ActionKind,
    /// 显示标签
    pub label: String,
    /// 是否启用
    pub enabled: bool,
}

impl ActionPermission {
    /// 根据操作类型创建授权状态
    pub fn new(action: ActionKind, enabled: bool) -> Self {
        Self {
            action,
            label: action.label().to_string(),
            enabled,
        }
    }
}

/// 角色在某个页面上的权限记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionEntry {
    /// 对应的页面标识
    pub page_id: String,
    /// 页面所属模块（冗余存储，便于分组）
    pub module: String,
    /// 页面显示名称（冗余存储）
    pub page_name: String,
    /// 与页面支持的操作一一对应
    pub actions: Vec<ActionPermission>,
}

impl PermissionEntry {
    /// 查找某个操作
    pub fn action(&self, action: ActionKind) -> Option<&ActionPermission> {
        self.actions.iter().find(|a| a.action == action)
    }

    /// 查找某个操作（可变）
    pub fn action_mut(&mut self, action: ActionKind) -> Option<&mut ActionPermission> {
        self.actions.iter_mut().find(|a| a.action == action)
    }

    /// 已启用的操作数量
    pub fn enabled_count(&self) -> usize {
        self.actions.iter().filter(|a| a.enabled).count()
    }

    /// 将页面下所有操作设置为同一状态
    pub fn set_all(&mut self, enabled: bool) {
        for action in &mut self.actions {
            action.enabled = enabled;
        }
    }

    /// 操作类型序列（忽略启用状态）
    pub fn action_kinds(&self) -> impl Iterator<Item = ActionKind> + '_ {
        self.actions.iter().map(|a| a.action)
    }
}

/// 新建角色的输入
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRole {
    /// 角色名称
    pub name: String,
    /// 角色描述
    pub description: String,
    /// 显示颜色标签
    pub color: String,
}

impl NewRole {
    /// 创建输入
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            color: String::new(),
        }
    }

    /// 设置颜色标签
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// 角色
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    /// 角色唯一标识，创建时生成，不复用
    pub id: String,
    /// 角色名称
    pub name: String,
    /// 角色描述
    pub description: String,
    /// 显示颜色标签，无业务含义
    pub color: String,
    /// 是否为内置角色
    pub is_system: bool,
    /// 创建时间，创建后不再变化
    pub created_at: SystemTime,
    /// 最后一次保存的时间
    pub updated_at: SystemTime,
    /// 乐观并发版本号，每次保存递增
    pub version: u64,
    /// 按目录顺序排列的权限记录
    pub permissions: Vec<PermissionEntry>,
}

impl Role {
    /// 创建新角色，分配新的标识和创建时间
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        color: impl Into<String>,
        permissions: Vec<PermissionEntry>,
    ) -> Self {
        let now = SystemTime::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            color: color.into(),
            is_system: false,
            created_at: now,
            updated_at: now,
            version: 1,
            permissions,
        }
    }

    /// 标记为内置角色
    pub fn into_system(mut self) -> Self {
        self.is_system = true;
        self
    }

    /// 查找页面权限记录
    pub fn entry(&self, page_id: &str) -> Option<&PermissionEntry> {
        self.permissions.iter().find(|e| e.page_id == page_id)
    }

    /// 名称或描述是否包含关键字（不区分大小写）
    pub fn matches(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.name.to_lowercase().contains(&keyword)
            || self.description.to_lowercase().contains(&keyword)
    }
}

/// 已启用操作统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledCount {
    /// 已启用的操作数
    pub enabled: usize,
    /// 操作总数
    pub total: usize,
}

impl EnabledCount {
    /// 完成百分比（0-100），总数为零时返回 0
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.enabled * 100) / self.total) as u8
    }
}

impl fmt::Display for EnabledCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.enabled, self.total)
    }
}

/// 模块汇总状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleState {
    /// 全部启用
    AllOn,
    /// 部分启用
    SomeOn,
    /// 全部禁用
    AllOff,
}

impl ModuleState {
    /// 根据统计结果计算汇总状态，没有任何操作时视为全部禁用
    pub fn from_count(count: EnabledCount) -> Self {
        if count.total == 0 || count.enabled == 0 {
            ModuleState::AllOff
        } else if count.enabled == count.total {
            ModuleState::AllOn
        } else {
            ModuleState::SomeOn
        }
    }
}
