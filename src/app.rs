//! # 管理控制台
//!
//! 把角色注册表包装成界面层使用的接口：领域错误统一转换为 [`ErrorInfo`]，
//! 并提供角色概览和 JSON 导出。

use crate::{AppResult, RoleOverview};
use admin_permissions::audit::AuditEntry;
use admin_permissions::{PageCatalog, PermissionConfig, RoleDraft, RoleRegistry};
use admin_types::{NewRole, Role};
use error::{ErrorCategory, ErrorInfo, ErrorSeverity};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, Level};

/// 配置文件路径环境变量
pub const CONFIG_ENV: &str = "INVEST_ADMIN_CONFIG";

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "invest-admin.toml";

/// 应用程序配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 应用程序名称
    pub app_name: String,
    /// 应用程序版本
    pub app_version: String,
    /// 日志级别: trace, debug, info, warn, error
    pub log_level: String,
    /// 角色注册表配置
    pub permissions: PermissionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "Invest Admin".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            permissions: PermissionConfig::default(),
        }
    }
}

impl AppConfig {
    /// 配置文件路径
    ///
    /// 优先使用环境变量 `INVEST_ADMIN_CONFIG`，否则为当前目录下的 `invest-admin.toml`。
    pub fn config_path() -> PathBuf {
        std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// 从 TOML 文本解析配置
    ///
    /// 缺失的字段使用默认值。
    #[cfg(feature = "config")]
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let config: AppConfig = toml::from_str(content).map_err(|e| {
            ErrorInfo::new(1001, format!("解析配置文件失败: {}", e))
                .with_category(ErrorCategory::Parse)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载配置
    ///
    /// 文件不存在时返回默认配置。
    pub fn load(path: &Path) -> AppResult<Self> {
        #[cfg(feature = "config")]
        {
            if path.exists() {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    ErrorInfo::from(e).with_context(format!("读取配置文件: {}", path.display()))
                })?;
                return Self::from_toml_str(&content);
            }
        }
        #[cfg(not(feature = "config"))]
        let _ = path;

        Ok(Self::default())
    }

    /// 校验配置
    pub fn validate(&self) -> AppResult<()> {
        self.max_log_level()?;
        Ok(())
    }

    /// 解析日志级别
    pub fn max_log_level(&self) -> AppResult<Level> {
        Level::from_str(self.log_level.trim()).map_err(|_| {
            ErrorInfo::new(1002, format!("无效的日志级别: {}", self.log_level))
                .with_category(ErrorCategory::Configuration)
                .with_severity(ErrorSeverity::Critical)
        })
    }
}

/// 管理控制台
///
/// 持有共享的角色注册表，可以被多个界面会话同时使用。
#[derive(Debug, Clone)]
pub struct AdminConsole {
    config: AppConfig,
    registry: Arc<RoleRegistry>,
}

impl AdminConsole {
    /// 使用内置页面目录创建控制台
    pub fn new(config: AppConfig) -> AppResult<Self> {
        Self::with_catalog(config, PageCatalog::builtin())
    }

    /// 使用指定页面目录创建控制台
    ///
    /// # 参数
    ///
    /// * `config` - 应用程序配置
    /// * `catalog` - 已校验的页面目录
    ///
    /// # 返回值
    ///
    /// 返回控制台实例，配置无效时返回错误
    pub fn with_catalog(config: AppConfig, catalog: PageCatalog) -> AppResult<Self> {
        config.validate()?;
        let registry = RoleRegistry::with_config(Arc::new(catalog), config.permissions.clone())?;

        info!("{} v{} 管理控制台已就绪", config.app_name, config.app_version);
        Ok(Self {
            config,
            registry: Arc::new(registry),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 共享的角色注册表
    pub fn registry(&self) -> &Arc<RoleRegistry> {
        &self.registry
    }

    /// 角色概览列表，按注册表顺序
    pub fn overview(&self, filter: Option<&str>) -> Vec<RoleOverview> {
        self.registry
            .list_roles(filter)
            .iter()
            .map(RoleOverview::from_role)
            .collect()
    }

    /// 单个角色的概览
    pub fn role_overview(&self, role_id: &str) -> AppResult<RoleOverview> {
        let role = self.registry.get_role(role_id)?;
        Ok(RoleOverview::from_role(&role))
    }

    pub fn get_role(&self, role_id: &str) -> AppResult<Role> {
        Ok(self.registry.get_role(role_id)?)
    }

    pub fn create_role(&self, new_role: NewRole) -> AppResult<Role> {
        Ok(self.registry.create_role(new_role)?)
    }

    pub fn duplicate_role(&self, source_id: &str) -> AppResult<Role> {
        Ok(self.registry.duplicate_role(source_id)?)
    }

    pub fn update_role(&self, role: Role) -> AppResult<Role> {
        Ok(self.registry.update_role(role)?)
    }

    pub fn delete_role(&self, role_id: &str) -> AppResult<()> {
        Ok(self.registry.delete_role(role_id)?)
    }

    /// 开始编辑角色
    pub fn begin_edit(&self, role_id: &str) -> AppResult<RoleDraft> {
        Ok(self.registry.begin_edit(role_id)?)
    }

    /// 提交草稿
    pub fn commit(&self, draft: &mut RoleDraft) -> AppResult<Role> {
        Ok(self.registry.commit(draft)?)
    }

    /// 放弃草稿
    pub fn discard(&self, draft: &mut RoleDraft) -> AppResult<()> {
        Ok(self.registry.discard(draft)?)
    }

    /// 最近的审计记录
    pub fn audit_log(&self, limit: usize) -> Vec<AuditEntry> {
        self.registry.audit_log(limit)
    }

    /// 把全部角色导出为 JSON
    pub fn export_roles_json(&self) -> AppResult<String> {
        let roles = self.registry.list_roles(None);
        serde_json::to_string_pretty(&roles).map_err(|e| {
            ErrorInfo::new(1101, format!("导出角色失败: {}", e)).with_category(ErrorCategory::Parse)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use admin_permissions::aggregation;
    use admin_permissions::seed::SUPER_ADMIN;
    use admin_types::ModuleState;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.max_log_level().unwrap(), Level::INFO);
        assert!(config.permissions.seed_default_roles);
    }

    #[test]
    fn test_invalid_log_level() {
        let config = AppConfig {
            log_level: "verbose".to_string(),
            ..AppConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), 1002);
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(AdminConsole::new(config).is_err());
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            log_level = "debug"

            [permissions]
            max_audit_logs = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.app_name, "Invest Admin");
        assert_eq!(config.max_log_level().unwrap(), Level::DEBUG);
        assert_eq!(config.permissions.max_audit_logs, 50);
        assert!(config.permissions.enable_audit);
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_malformed_toml() {
        let err = AppConfig::from_toml_str("log_level = [").unwrap_err();
        assert_eq!(err.code(), 1001);
        assert_eq!(err.category(), ErrorCategory::Parse);
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invest-admin.toml");
        std::fs::write(&path, "app_name = \"Staging Admin\"\n[permissions]\nseed_default_roles = false\n")
            .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.app_name, "Staging Admin");
        assert!(!config.permissions.seed_default_roles);

        let missing = AppConfig::load(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(missing, AppConfig::default());
    }

    #[test]
    fn test_console_overview() {
        let console = AdminConsole::new(AppConfig::default()).unwrap();
        let role = console
            .create_role(NewRole::new("Support Agent", "Investor tickets"))
            .unwrap();

        let mut draft = console.begin_edit(&role.id).unwrap();
        draft.set_module("NPS", true).unwrap();
        console.commit(&mut draft).unwrap();

        let overview = console.role_overview(&role.id).unwrap();
        let nps = overview.modules.iter().find(|m| m.module == "NPS").unwrap();
        assert_eq!(nps.state, ModuleState::AllOn);
        assert_eq!(overview.count.enabled, nps.count.enabled);
        assert_eq!(console.overview(Some("support")).len(), 1);
    }

    #[test]
    fn test_console_maps_domain_errors() {
        let console = AdminConsole::new(AppConfig::default()).unwrap();
        let admin = console
            .registry()
            .list_roles(Some(SUPER_ADMIN))
            .remove(0);

        let err = console.delete_role(&admin.id).unwrap_err();
        assert_eq!(err.code(), 6105);
        assert_eq!(err.category(), ErrorCategory::Protected);

        let err = console.get_role("missing").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn test_export_roles_json() {
        let console = AdminConsole::new(AppConfig::default()).unwrap();
        let json = console.export_roles_json().unwrap();

        let roles: Vec<Role> = serde_json::from_str(&json).unwrap();
        assert_eq!(roles, console.registry().list_roles(None));
        assert_eq!(
            aggregation::count_enabled(&roles[0]).enabled,
            console.registry().catalog().total_actions()
        );
    }
}
