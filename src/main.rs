//! # 管理后台主程序入口
//!
//! 加载配置，初始化角色注册表，并打印角色权限概览。

use invest_admin::app::{AdminConsole, AppConfig};
use invest_admin::ModuleState;
use time::OffsetDateTime;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载配置
    let config_path = AppConfig::config_path();
    let config = AppConfig::load(&config_path)?;

    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(config.max_log_level()?)
        .init();

    if config_path.exists() {
        tracing::info!("从配置文件加载: {}", config_path.display());
    } else {
        tracing::info!("使用默认配置");
    }

    let console = AdminConsole::new(config)?;
    let catalog = console.registry().catalog();
    tracing::info!(
        "页面目录: {} 个模块, {} 个页面, {} 个操作",
        catalog.list_modules().len(),
        catalog.len(),
        catalog.total_actions()
    );

    println!("\n=== {} 角色权限概览 ===", console.config().app_name);
    for role in console.registry().list_roles(None) {
        let overview = invest_admin::RoleOverview::from_role(&role);
        let created = OffsetDateTime::from(role.created_at).date();
        let badge = if overview.is_system { " [系统]" } else { "" };

        println!(
            "\n{}{} ({}%, {}) 创建于 {}",
            overview.name,
            badge,
            overview.count.percent(),
            overview.count,
            created
        );
        for module in &overview.modules {
            let mark = match module.state {
                ModuleState::AllOn => "■",
                ModuleState::SomeOn => "◧",
                ModuleState::AllOff => "□",
            };
            println!("  {} {:<16} {}", mark, module.module, module.count);
        }
    }
    println!("\n========================\n");

    tracing::info!("管理后台退出");
    Ok(())
}
