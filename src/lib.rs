//! # 投资平台管理后台 - 角色权限
//!
//! 零售投资聚合平台（IPO、债券、定期存款、NPS 等）管理后台的角色权限矩阵。
//! 管理员在这里维护角色，并为每个角色逐页面、逐操作地打开或关闭权限。
//!
//! ## 模块架构
//!
//! ```text
//! invest-admin/
//! ├── src/
//! │   ├── main.rs         # 主程序入口
//! │   ├── lib.rs          # 库入口
//! │   ├── app.rs          # 应用配置与管理控制台
//! │   ├── bin/            # 演示程序
//! │   └── crates/
//! │       ├── error/              # 错误处理框架
//! │       ├── admin-types/        # 类型定义
//! │       └── admin-permissions/  # 页面目录、角色注册表、汇总引擎
//! ```
//!
//! ## 使用示例
//!
//! ```no_run
//! use invest_admin::app::{AdminConsole, AppConfig};
//! use invest_admin::NewRole;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let console = AdminConsole::new(AppConfig::default())?;
//!
//!     let role = console.create_role(NewRole::new("Support Agent", "Investor tickets"))?;
//!     let mut draft = console.begin_edit(&role.id)?;
//!     draft.set_page("nps-users", true)?;
//!     console.commit(&mut draft)?;
//!
//!     for overview in console.overview(None) {
//!         println!("{}: {}", overview.name, overview.count);
//!     }
//!     Ok(())
//! }
//! ```

// 导出应用程序模块
pub mod app;

use error::{ErrorCategory, ErrorInfo};
use serde::{Deserialize, Serialize};

pub use admin_permissions::{
    aggregation, ModuleSummary, PageCatalog, PermissionConfig, RoleDraft, RoleError, RoleRegistry,
};
pub use admin_types::{ActionKind, EnabledCount, ModuleState, NewRole, PageDescriptor, Role};

/// 应用程序结果类型
pub type AppResult<T> = std::result::Result<T, ErrorInfo>;

/// 角色概览
///
/// 角色列表中每一行需要展示的内容。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleOverview {
    pub id: String,
    pub name: String,
    pub description: String,
    pub color: String,
    pub is_system: bool,
    /// 已启用操作统计
    pub count: EnabledCount,
    /// 各模块汇总，按目录中模块首次出现的顺序
    pub modules: Vec<ModuleSummary>,
}

impl RoleOverview {
    /// 从角色生成概览
    pub fn from_role(role: &Role) -> Self {
        Self {
            id: role.id.clone(),
            name: role.name.clone(),
            description: role.description.clone(),
            color: role.color.clone(),
            is_system: role.is_system,
            count: aggregation::count_enabled(role),
            modules: aggregation::module_summaries(role),
        }
    }
}

/// 提示级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// 面向用户的提示消息
///
/// 界面层把它渲染成一条短暂显示的提示。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    /// 操作成功提示
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    /// 由错误生成提示
    ///
    /// 可恢复的错误（输入有误、目标不存在、受保护、修改冲突）显示为警告，其余显示为错误。
    pub fn from_error(error: &ErrorInfo) -> Self {
        let level = if error.is_recoverable() {
            NoticeLevel::Warning
        } else {
            NoticeLevel::Error
        };
        let title = match error.category() {
            ErrorCategory::Protected => "操作不允许".to_string(),
            ErrorCategory::Conflict => "角色已被他人修改".to_string(),
            category => category.to_string(),
        };

        Self {
            level,
            title,
            message: error.message().to_string(),
        }
    }
}

impl From<&ErrorInfo> for Notice {
    fn from(error: &ErrorInfo) -> Self {
        Notice::from_error(error)
    }
}
