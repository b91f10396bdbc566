//! # 权限列表工厂
//!
//! 新建和复制角色时唯一认可的权限列表构造方式，构造结果天然满足目录形状约束。

use admin_types::{ActionPermission, PermissionEntry};

use crate::catalog::PageCatalog;

/// 按目录生成权限列表
///
/// 每个页面一条记录，操作顺序与页面支持的操作一致，启用状态统一为 `default_enabled`。
pub fn create_permissions(catalog: &PageCatalog, default_enabled: bool) -> Vec<PermissionEntry> {
    catalog
        .list_pages()
        .iter()
        .map(|page| PermissionEntry {
            page_id: page.page_id.clone(),
            module: page.module.clone(),
            page_name: page.page_name.clone(),
            actions: page
                .supported_actions
                .iter()
                .map(|action| ActionPermission::new(*action, default_enabled))
                .collect(),
        })
        .collect()
}

/// 检查权限列表是否与目录形状一致
///
/// 页面数量、顺序、冗余字段以及每个页面的操作序列都必须与目录一致，启用状态不参与比较。
pub fn conforms_to_catalog(catalog: &PageCatalog, permissions: &[PermissionEntry]) -> bool {
    let pages = catalog.list_pages();
    if pages.len() != permissions.len() {
        return false;
    }

    pages.iter().zip(permissions).all(|(page, entry)| {
        page.page_id == entry.page_id
            && page.module == entry.module
            && page.page_name == entry.page_name
            && entry.action_kinds().eq(page.supported_actions.iter().copied())
            && entry.actions.iter().all(|a| a.label == a.action.label())
    })
}
