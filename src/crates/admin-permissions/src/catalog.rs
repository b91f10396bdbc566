//! # 页面目录
//!
//! 枚举所有可管理的页面、所属模块以及各页面支持的操作。目录在进程启动时
//! 构建，之后以 `Arc<PageCatalog>` 共享且不再修改；扩展目录只能通过发布新代码。

use admin_types::{ActionKind, PageDescriptor};
use std::collections::HashSet;

use crate::error::{PermissionResult, RoleError};

use admin_types::ActionKind::{Approve, Create, Delete, Edit, Export, View};

/// 内置页面：(页面标识, 页面名称, 模块, 支持的操作)
const BUILTIN_PAGES: &[(&str, &str, &str, &[ActionKind])] = &[
    ("dashboard-overview", "Overview", "Dashboard", &[View, Export]),
    ("user-list", "Investors", "Users", &[View, Edit, Delete, Create, Export]),
    ("kyc-verification", "KYC Verification", "Users", &[View, Approve, Export]),
    ("ipo-listings", "IPO Listings", "IPO", &[View, Edit, Delete, Create]),
    ("ipo-applications", "IPO Applications", "IPO", &[View, Approve, Export]),
    ("bond-listings", "Bond Listings", "Bonds", &[View, Edit, Delete, Create]),
    ("bond-orders", "Bond Orders", "Bonds", &[View, Edit, Delete, Export]),
    ("fd-schemes", "FD Schemes", "Fixed Deposits", &[View, Edit, Create, Delete]),
    ("fd-bookings", "FD Bookings", "Fixed Deposits", &[View, Approve, Export]),
    ("nps-users", "NPS Subscribers", "NPS", &[View, Edit, Approve]),
    ("nps-contributions", "NPS Contributions", "NPS", &[View, Export]),
    ("payment-transactions", "Transactions", "Payments", &[View, Approve, Export]),
    ("content-blog", "Blog Posts", "Content", &[View, Edit, Delete, Create]),
    ("content-banners", "Banners", "Content", &[View, Edit, Create, Delete]),
    ("roles-permissions", "Roles & Permissions", "Settings", &[View, Edit, Delete, Create]),
    ("system-settings", "System Settings", "Settings", &[View, Edit]),
];

/// 页面目录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCatalog {
    pages: Vec<PageDescriptor>,
    modules: Vec<String>,
}

impl PageCatalog {
    /// 使用自定义页面列表构建目录
    ///
    /// # 参数
    ///
    /// * `pages` - 按声明顺序排列的页面描述
    ///
    /// # 返回值
    ///
    /// 页面标识重复、字段为空、操作集合为空或含重复操作时返回 `InvalidCatalog`
    pub fn new(pages: Vec<PageDescriptor>) -> PermissionResult<Self> {
        if pages.is_empty() {
            return Err(RoleError::InvalidCatalog("目录中没有任何页面".to_string()));
        }

        let mut seen_ids = HashSet::with_capacity(pages.len());
        for page in &pages {
            if page.page_id.trim().is_empty()
                || page.page_name.trim().is_empty()
                || page.module.trim().is_empty()
            {
                return Err(RoleError::InvalidCatalog(format!(
                    "页面字段不能为空: {:?}",
                    page.page_id
                )));
            }
            if !seen_ids.insert(page.page_id.as_str()) {
                return Err(RoleError::InvalidCatalog(format!("页面标识重复: {}", page.page_id)));
            }
            if page.supported_actions.is_empty() {
                return Err(RoleError::InvalidCatalog(format!(
                    "页面没有可用操作: {}",
                    page.page_id
                )));
            }
            let mut seen_actions = HashSet::with_capacity(page.supported_actions.len());
            if !page.supported_actions.iter().all(|a| seen_actions.insert(*a)) {
                return Err(RoleError::InvalidCatalog(format!(
                    "页面操作重复: {}",
                    page.page_id
                )));
            }
        }

        Ok(Self::from_trusted(pages))
    }

    /// 部署的内置目录
    pub fn builtin() -> Self {
        Self::from_trusted(builtin_pages())
    }

    fn from_trusted(pages: Vec<PageDescriptor>) -> Self {
        let mut modules: Vec<String> = Vec::new();
        for page in &pages {
            if !modules.iter().any(|m| m == &page.module) {
                modules.push(page.module.clone());
            }
        }
        Self { pages, modules }
    }

    /// 全部页面，按声明顺序
    pub fn list_pages(&self) -> &[PageDescriptor] {
        &self.pages
    }

    /// 全部模块，每个模块只出现一次，按首次出现顺序
    pub fn list_modules(&self) -> &[String] {
        &self.modules
    }

    /// 按标识查找页面
    pub fn page(&self, page_id: &str) -> Option<&PageDescriptor> {
        self.pages.iter().find(|p| p.page_id == page_id)
    }

    /// 模块下的页面
    pub fn pages_in_module<'a>(&'a self, module: &'a str) -> impl Iterator<Item = &'a PageDescriptor> + 'a {
        self.pages.iter().filter(move |p| p.module == module)
    }

    /// 页面数量
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// 目录是否为空
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// 所有页面的操作总数
    pub fn total_actions(&self) -> usize {
        self.pages.iter().map(|p| p.supported_actions.len()).sum()
    }
}

/// 内置页面描述列表
pub fn builtin_pages() -> Vec<PageDescriptor> {
    BUILTIN_PAGES
        .iter()
        .map(|(id, name, module, actions)| PageDescriptor::new(*id, *name, *module, actions.to_vec()))
        .collect()
}
