//! # 权限矩阵演示程序
//!
//! 在一个只有两个页面的目录上演示角色的创建、批量切换和内置角色保护。

use error::ErrorInfo;
use invest_admin::app::{AdminConsole, AppConfig};
use invest_admin::{aggregation, ActionKind, Notice, PageCatalog, PageDescriptor, Role};
use tracing::{info, Level};

/// 演示结果类型
type DemoResult<T> = std::result::Result<T, ErrorInfo>;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志系统
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    println!("权限矩阵演示");
    println!();

    if let Err(e) = run_demo() {
        eprintln!("演示运行失败: {}", e);
        return Err(e.into());
    }

    println!("\n演示程序运行成功");
    Ok(())
}

fn demo_catalog() -> DemoResult<PageCatalog> {
    let catalog = PageCatalog::new(vec![
        PageDescriptor::new(
            "nps-users",
            "NPS Users",
            "NPS",
            vec![ActionKind::View, ActionKind::Edit, ActionKind::Approve],
        ),
        PageDescriptor::new(
            "bond-orders",
            "Bond Orders",
            "Bonds",
            vec![ActionKind::View, ActionKind::Edit, ActionKind::Delete, ActionKind::Export],
        ),
    ])?;
    Ok(catalog)
}

fn print_role(step: &str, role: &Role) {
    println!("{} -> {} 已启用 {}", step, role.name, aggregation::count_enabled(role));
    for summary in aggregation::module_summaries(role) {
        println!("    {:<6} {:?} ({})", summary.module, summary.state, summary.count);
    }
}

/// 运行主要演示
fn run_demo() -> DemoResult<()> {
    info!("启动权限矩阵演示");
    let console = AdminConsole::with_catalog(AppConfig::default(), demo_catalog()?)?;

    // 新角色的权限全部关闭
    let role = console.create_role(invest_admin::NewRole::new("Support Agent", "Investor tickets"))?;
    print_role("创建角色", &role);

    // 打开整个页面
    let mut draft = console.begin_edit(&role.id)?;
    draft.set_page("nps-users", true)?;
    print_role("打开 nps-users", draft.role());

    // 单独切换一个操作
    draft.toggle_action("bond-orders", ActionKind::Delete)?;
    print_role("切换 bond-orders 删除权限", draft.role());

    // 页面不支持的操作
    if let Err(e) = draft.toggle_action("nps-users", ActionKind::Delete) {
        let notice = Notice::from_error(&e.into());
        println!("{:?}: {} - {}", notice.level, notice.title, notice.message);
    }

    let saved = console.commit(&mut draft)?;
    println!("{}", Notice::success("角色已保存", format!("{} v{}", saved.name, saved.version)).message);

    // 内置角色不可删除
    let super_admin = console
        .overview(Some("Super Admin"))
        .into_iter()
        .find(|r| r.is_system)
        .ok_or_else(|| ErrorInfo::new(9001, "缺少内置角色".to_string()))?;
    if let Err(e) = console.delete_role(&super_admin.id) {
        let notice = Notice::from_error(&e);
        println!("{:?}: {} - {}", notice.level, notice.title, notice.message);
    }

    for entry in console.audit_log(10) {
        info!("审计: {:?} {} {}", entry.outcome, entry.operation, entry.description);
    }

    info!("权限矩阵演示完成");
    Ok(())
}
