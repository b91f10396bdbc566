//! # 角色权限错误定义
//!
//! 每个失败的操作都不会修改任何状态，错误只需要告诉调用方原因。

use admin_types::ActionKind;
use error::{ErrorCategory, ErrorInfo, ErrorKind, ErrorSeverity};
use std::fmt;

use crate::draft::DraftState;

/// 角色权限模块结果类型
pub type PermissionResult<T> = std::result::Result<T, RoleError>;

/// 角色权限专用错误类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleError {
    /// 输入不满足业务规则
    Validation(String),

    /// 角色不存在
    RoleNotFound(String),

    /// 权限记录中没有该页面
    PageNotFound(String),

    /// 页面不支持该操作
    ActionNotFound { page_id: String, action: ActionKind },

    /// 内置角色不可删除
    ProtectedRole(String),

    /// 内置角色的字段不可修改
    ProtectedField { role: String, field: &'static str },

    /// 提交时角色已被其他人修改
    StaleVersion { role_id: String, expected: u64, actual: u64 },

    /// 草稿已保存或已取消
    DraftClosed(DraftState),

    /// 页面目录定义无效
    InvalidCatalog(String),
}

impl fmt::Display for RoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleError::Validation(msg) => write!(f, "验证错误: {}", msg),
            RoleError::RoleNotFound(id) => write!(f, "角色不存在: {}", id),
            RoleError::PageNotFound(id) => write!(f, "页面不存在: {}", id),
            RoleError::ActionNotFound { page_id, action } => {
                write!(f, "页面 {} 不支持操作: {}", page_id, action)
            }
            RoleError::ProtectedRole(name) => write!(f, "内置角色不可删除: {}", name),
            RoleError::ProtectedField { role, field } => {
                write!(f, "内置角色 {} 的字段 {} 不可修改", role, field)
            }
            RoleError::StaleVersion { role_id, expected, actual } => write!(
                f,
                "角色 {} 已被修改（草稿版本 {}，当前版本 {}），请重新编辑",
                role_id, expected, actual
            ),
            RoleError::DraftClosed(state) => write!(f, "草稿已关闭: {:?}", state),
            RoleError::InvalidCatalog(msg) => write!(f, "页面目录无效: {}", msg),
        }
    }
}

impl std::error::Error for RoleError {}

impl RoleError {
    fn classify(&self) -> (u32, ErrorCategory, ErrorSeverity) {
        match self {
            RoleError::Validation(_) => (6101, ErrorCategory::Validation, ErrorSeverity::Warning),
            RoleError::RoleNotFound(_) => (6102, ErrorCategory::NotFound, ErrorSeverity::Error),
            RoleError::PageNotFound(_) => (6103, ErrorCategory::NotFound, ErrorSeverity::Error),
            RoleError::ActionNotFound { .. } => {
                (6104, ErrorCategory::NotFound, ErrorSeverity::Error)
            }
            RoleError::ProtectedRole(_) => (6105, ErrorCategory::Protected, ErrorSeverity::Warning),
            RoleError::ProtectedField { .. } => {
                (6106, ErrorCategory::Protected, ErrorSeverity::Warning)
            }
            RoleError::StaleVersion { .. } => (6107, ErrorCategory::Conflict, ErrorSeverity::Warning),
            RoleError::DraftClosed(_) => (6108, ErrorCategory::Validation, ErrorSeverity::Error),
            RoleError::InvalidCatalog(_) => {
                (6109, ErrorCategory::Configuration, ErrorSeverity::Critical)
            }
        }
    }
}

impl ErrorKind for RoleError {
    fn error_code(&self) -> u32 {
        self.classify().0
    }

    fn error_message(&self) -> String {
        self.to_string()
    }
}

impl From<RoleError> for ErrorInfo {
    fn from(err: RoleError) -> Self {
        let (code, category, severity) = err.classify();
        ErrorInfo::new(code, err.to_string())
            .with_category(category)
            .with_severity(severity)
    }
}
