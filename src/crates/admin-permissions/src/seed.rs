//! # 默认角色
//!
//! 注册表启动时写入的内置与示例角色，全部通过权限工厂和汇总引擎构造，
//! 因此对任意目录都满足形状约束。

use admin_types::{ActionKind, Role};

use crate::aggregation::{set_action, set_all, set_module, set_page_action};
use crate::catalog::PageCatalog;
use crate::error::PermissionResult;
use crate::factory::create_permissions;

/// 超级管理员名称
pub const SUPER_ADMIN: &str = "Super Admin";
/// 合规专员名称
pub const COMPLIANCE_OFFICER: &str = "Compliance Officer";
/// 运营经理名称
pub const OPERATIONS_MANAGER: &str = "Operations Manager";
/// 内容编辑名称
pub const CONTENT_EDITOR: &str = "Content Editor";

const PRODUCT_MODULES: &[&str] = &["IPO", "Bonds", "Fixed Deposits", "NPS", "Payments"];

fn blank(catalog: &PageCatalog, name: &str, description: &str, color: &str) -> Role {
    Role::new(name, description, color, create_permissions(catalog, false))
}

/// 构造默认角色，按显示顺序排列
pub fn default_roles(catalog: &PageCatalog) -> PermissionResult<Vec<Role>> {
    let super_admin = set_all(
        &blank(catalog, SUPER_ADMIN, "Full access to every admin page", "red"),
        true,
    )
    .into_system();

    let mut compliance = blank(
        catalog,
        COMPLIANCE_OFFICER,
        "Reviews KYC, applications and settlements; read and approve only",
        "purple",
    );
    for action in [ActionKind::View, ActionKind::Approve, ActionKind::Export] {
        compliance = set_action(&compliance, action, true);
    }
    let compliance = compliance.into_system();

    let mut operations = blank(
        catalog,
        OPERATIONS_MANAGER,
        "Runs IPO, bond, FD and NPS desks without delete rights",
        "blue",
    );
    for module in PRODUCT_MODULES {
        operations = set_module(&operations, module, true);
        for page in catalog.pages_in_module(module) {
            if page.supports(ActionKind::Delete) {
                operations = set_page_action(&operations, &page.page_id, ActionKind::Delete, false)?;
            }
        }
    }

    let mut content = blank(
        catalog,
        CONTENT_EDITOR,
        "Maintains blog posts and marketing banners",
        "green",
    );
    content = set_module(&content, "Content", true);
    for page in catalog.pages_in_module("Dashboard") {
        if page.supports(ActionKind::View) {
            content = set_page_action(&content, &page.page_id, ActionKind::View, true)?;
        }
    }

    Ok(vec![super_admin, compliance, operations, content])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{count_enabled, is_allowed, module_state};
    use crate::factory::conforms_to_catalog;
    use admin_types::{ModuleState, PageDescriptor};

    #[test]
    fn test_default_roles_shape() {
        let catalog = PageCatalog::builtin();
        let roles = default_roles(&catalog).unwrap();
        assert_eq!(roles.len(), 4);
        for role in &roles {
            assert!(conforms_to_catalog(&catalog, &role.permissions), "{}", role.name);
        }
    }

    #[test]
    fn test_system_flags() {
        let roles = default_roles(&PageCatalog::builtin()).unwrap();
        let system: Vec<&str> = roles.iter().filter(|r| r.is_system).map(|r| r.name.as_str()).collect();
        assert_eq!(system, vec![SUPER_ADMIN, COMPLIANCE_OFFICER]);
    }

    #[test]
    fn test_seed_grants() {
        let catalog = PageCatalog::builtin();
        let roles = default_roles(&catalog).unwrap();

        let count = count_enabled(&roles[0]);
        assert_eq!(count.enabled, count.total);
        assert_eq!(count.total, catalog.total_actions());

        assert!(is_allowed(&roles[1], "kyc-verification", ActionKind::Approve));
        assert!(!is_allowed(&roles[1], "user-list", ActionKind::Edit));

        assert!(is_allowed(&roles[2], "bond-orders", ActionKind::Edit));
        assert!(!is_allowed(&roles[2], "bond-orders", ActionKind::Delete));
        assert_eq!(module_state(&roles[2], "Payments"), ModuleState::AllOn);
        assert_eq!(module_state(&roles[2], "Bonds"), ModuleState::SomeOn);
        assert_eq!(module_state(&roles[2], "Content"), ModuleState::AllOff);

        assert_eq!(module_state(&roles[3], "Content"), ModuleState::AllOn);
        assert_eq!(module_state(&roles[3], "Dashboard"), ModuleState::SomeOn);
    }

    #[test]
    fn test_seeds_fit_small_catalog() {
        let catalog = PageCatalog::new(vec![PageDescriptor::new(
            "nps-users",
            "NPS Users",
            "NPS",
            vec![ActionKind::View, ActionKind::Edit, ActionKind::Approve],
        )])
        .unwrap();

        let roles = default_roles(&catalog).unwrap();
        assert!(roles.iter().all(|r| conforms_to_catalog(&catalog, &r.permissions)));
        assert_eq!(module_state(&roles[2], "NPS"), ModuleState::AllOn);
        assert_eq!(count_enabled(&roles[3]).enabled, 0);
    }
}
