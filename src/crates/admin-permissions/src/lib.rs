//! # 后台权限矩阵引擎
//!
//! 为投资聚合平台的管理后台提供基于角色（RBAC）的权限矩阵。
//! 每个角色对页面目录中的每个页面、每个支持的操作持有一个开关。
//!
//! ## 核心特性
//!
//! - **页面目录**: 启动时校验的页面与操作声明，决定权限矩阵的形状
//! - **权限工厂**: 按目录生成统一开关状态的权限列表
//! - **角色注册表**: 角色的新建、复制、更新和删除，内置角色受保护
//! - **汇总引擎**: 统计、模块三态和批量开关，全部是纯函数
//! - **编辑草稿**: 在副本上编辑，提交或放弃
//! - **审计日志**: 记录成功与被拒绝的角色操作
//!
//! ## 使用示例
//!
//! ```rust
//! use admin_permissions::{aggregation, PageCatalog, RoleRegistry};
//! use admin_types::{ModuleState, NewRole};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), admin_permissions::RoleError> {
//! let registry = RoleRegistry::new(Arc::new(PageCatalog::builtin()))?;
//!
//! // 新角色的权限全部关闭
//! let role = registry.create_role(NewRole::new("NPS Desk", "Handles NPS subscribers"))?;
//!
//! // 打开整个模块并保存
//! let mut draft = registry.begin_edit(&role.id)?;
//! draft.set_module("NPS", true)?;
//! let saved = registry.commit(&mut draft)?;
//!
//! assert_eq!(aggregation::module_state(&saved, "NPS"), ModuleState::AllOn);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod aggregation;
pub mod audit;
pub mod catalog;
pub mod draft;
pub mod error;
pub mod factory;
pub mod registry;
pub mod seed;

pub use aggregation::ModuleSummary;
pub use audit::{AuditEntry, AuditOperation, AuditOutcome, AuditTrail};
pub use catalog::{builtin_pages, PageCatalog};
pub use draft::{DraftState, RoleDraft};
pub use error::{PermissionResult, RoleError};
pub use factory::{conforms_to_catalog, create_permissions};
pub use registry::{PermissionConfig, RoleRegistry};
pub use seed::default_roles;
