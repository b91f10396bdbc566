//! # 角色操作审计
//!
//! 记录角色的新建、复制、更新和删除尝试，包括被拒绝的操作。

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::time::SystemTime;

/// 审计操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditOperation {
    CreateRole,
    DuplicateRole,
    UpdateRole,
    DeleteRole,
}

impl fmt::Display for AuditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOperation::CreateRole => write!(f, "创建角色"),
            AuditOperation::DuplicateRole => write!(f, "复制角色"),
            AuditOperation::UpdateRole => write!(f, "更新角色"),
            AuditOperation::DeleteRole => write!(f, "删除角色"),
        }
    }
}

/// 审计结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditOutcome {
    Success,
    Rejected,
}

/// 审计记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// 记录ID
    pub entry_id: String,
    /// 操作类型
    pub operation: AuditOperation,
    /// 目标角色ID
    pub role_id: String,
    /// 目标角色名称（操作时的名称）
    pub role_name: String,
    /// 操作结果
    pub outcome: AuditOutcome,
    /// 操作描述
    pub description: String,
    /// 操作时间
    pub timestamp: SystemTime,
}

/// 有界审计日志
///
/// 超过容量时丢弃最旧的记录。
#[derive(Debug)]
pub struct AuditTrail {
    enabled: bool,
    capacity: usize,
    entries: Mutex<VecDeque<AuditEntry>>,
}

impl AuditTrail {
    /// 创建审计日志
    pub fn new(enabled: bool, capacity: usize) -> Self {
        Self {
            enabled,
            capacity,
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// 记录一次操作
    pub fn record(
        &self,
        operation: AuditOperation,
        role_id: &str,
        role_name: &str,
        outcome: AuditOutcome,
        description: String,
    ) {
        if !self.enabled || self.capacity == 0 {
            return;
        }

        let entry = AuditEntry {
            entry_id: uuid::Uuid::new_v4().to_string(),
            operation,
            role_id: role_id.to_string(),
            role_name: role_name.to_string(),
            outcome,
            description,
            timestamp: SystemTime::now(),
        };

        let mut entries = self.entries.lock();
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// 最近的记录，最新的在前
    pub fn recent(&self, limit: usize) -> Vec<AuditEntry> {
        let entries = self.entries.lock();
        entries.iter().rev().take(limit).cloned().collect()
    }

    /// 当前记录数
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// 是否没有任何记录
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
