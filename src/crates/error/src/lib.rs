//! # 错误处理框架
//!
//! 后台管理系统共用的零依赖错误类型。领域 crate 定义自己的错误枚举，
//! 在应用边界统一转换为 [`ErrorInfo`]，由界面层决定如何向管理员展示。
//!
//! ## 使用示例
//!
//! ```rust
//! use error::{ErrorInfo, ErrorCategory, ErrorSeverity};
//!
//! let error = ErrorInfo::new(6101, "角色名称不能为空".to_string())
//!     .with_category(ErrorCategory::Validation)
//!     .with_severity(ErrorSeverity::Warning)
//!     .with_context("保存角色".to_string());
//!
//! assert!(error.is_recoverable());
//! ```

use std::fmt;

/// 错误严重程度
///
/// 决定错误在界面上的呈现方式（提示、警告或阻断）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 调试级别
    Debug = 0,
    /// 信息级别
    Info = 1,
    /// 警告级别：用户输入问题，修正后可重试
    Warning = 2,
    /// 错误级别：调用方引用了过期或不存在的数据
    Error = 3,
    /// 严重级别：配置或部署问题
    Critical = 4,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Debug => write!(f, "调试"),
            ErrorSeverity::Info => write!(f, "信息"),
            ErrorSeverity::Warning => write!(f, "警告"),
            ErrorSeverity::Error => write!(f, "错误"),
            ErrorSeverity::Critical => write!(f, "严重"),
        }
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// 业务规则校验失败
    Validation,
    /// 引用的角色、页面或操作不存在
    NotFound,
    /// 违反内置角色保护规则
    Protected,
    /// 并发修改冲突
    Conflict,
    /// 配置错误
    Configuration,
    /// IO 错误
    Io,
    /// 解析错误
    Parse,
    /// 其他错误
    Other,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Validation => write!(f, "验证错误"),
            ErrorCategory::NotFound => write!(f, "未找到"),
            ErrorCategory::Protected => write!(f, "受保护"),
            ErrorCategory::Conflict => write!(f, "修改冲突"),
            ErrorCategory::Configuration => write!(f, "配置错误"),
            ErrorCategory::Io => write!(f, "IO错误"),
            ErrorCategory::Parse => write!(f, "解析错误"),
            ErrorCategory::Other => write!(f, "其他错误"),
        }
    }
}

/// 错误类型的核心trait
///
/// 领域错误实现此trait后即可作为 [`ErrorInfo`] 的源错误。
pub trait ErrorKind: fmt::Debug + fmt::Display + Send + Sync {
    /// 错误码
    fn error_code(&self) -> u32;

    /// 人类可读的错误描述
    fn error_message(&self) -> String;

    /// 源错误
    fn source(&self) -> Option<&(dyn ErrorKind + Send + Sync)> {
        None
    }
}

/// 错误信息结构体
///
/// 封装错误码、消息、源错误、上下文、严重程度和类别。
#[derive(Debug)]
pub struct ErrorInfo {
    code: u32,
    message: String,
    source: Option<Box<dyn ErrorKind + Send + Sync>>,
    context: Vec<String>,
    severity: ErrorSeverity,
    category: ErrorCategory,
}

impl Clone for ErrorInfo {
    fn clone(&self) -> Self {
        Self {
            code: self.code,
            message: self.message.clone(),
            // 源错误是 trait 对象，克隆时丢弃
            source: None,
            context: self.context.clone(),
            severity: self.severity,
            category: self.category,
        }
    }
}

impl PartialEq for ErrorInfo {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
            && self.message == other.message
            && self.context == other.context
            && self.severity == other.severity
            && self.category == other.category
    }
}

impl ErrorInfo {
    /// 创建一个新的错误信息
    ///
    /// 默认严重程度为 `Error`，类别为 `Other`。
    ///
    /// # 示例
    ///
    /// ```rust
    /// use error::ErrorInfo;
    ///
    /// let error = ErrorInfo::new(6102, "角色不存在".to_string());
    /// assert_eq!(error.code(), 6102);
    /// ```
    pub fn new(code: u32, message: String) -> Self {
        Self {
            code,
            message,
            source: None,
            context: Vec::new(),
            severity: ErrorSeverity::Error,
            category: ErrorCategory::Other,
        }
    }

    /// 创建一个带有源错误的错误信息
    ///
    /// 严重程度和类别仍使用默认值，由调用方链式设置。
    pub fn with_source<E: ErrorKind + 'static>(code: u32, message: String, source: E) -> Self {
        Self {
            code,
            message,
            source: Some(Box::new(source)),
            context: Vec::new(),
            severity: ErrorSeverity::Error,
            category: ErrorCategory::Other,
        }
    }

    /// 添加错误上下文
    pub fn add_context(&mut self, context: String) {
        self.context.push(context);
    }

    /// 链式添加错误上下文
    pub fn with_context(mut self, context: String) -> Self {
        self.context.push(context);
        self
    }

    /// 设置错误严重程度
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// 设置错误类别
    pub fn with_category(mut self, category: ErrorCategory) -> Self {
        self.category = category;
        self
    }

    /// 获取错误消息
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 获取错误码
    pub fn code(&self) -> u32 {
        self.code
    }

    /// 获取源错误
    pub fn source(&self) -> Option<&(dyn ErrorKind + Send + Sync)> {
        self.source.as_deref()
    }

    /// 获取错误上下文
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// 获取错误严重程度
    pub fn severity(&self) -> ErrorSeverity {
        self.severity
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    /// 判断是否为严重错误
    pub fn is_critical(&self) -> bool {
        self.severity == ErrorSeverity::Critical
    }

    /// 判断是否可由用户在本地修正后重试
    ///
    /// 校验、保护和冲突类错误不改变任何状态，界面提示后即可继续操作。
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.category,
            ErrorCategory::Validation
                | ErrorCategory::NotFound
                | ErrorCategory::Protected
                | ErrorCategory::Conflict
        )
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}][{}][错误码: {}] {}",
            self.severity, self.category, self.code, self.message
        )?;

        for ctx in &self.context {
            write!(f, "\n  上下文: {}", ctx)?;
        }

        if let Some(source) = &self.source {
            write!(f, "\n  由以下错误引起: {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorInfo {}

impl ErrorKind for ErrorInfo {
    fn error_code(&self) -> u32 {
        self.code
    }

    fn error_message(&self) -> String {
        self.message.clone()
    }

    fn source(&self) -> Option<&(dyn ErrorKind + Send + Sync)> {
        self.source.as_deref()
    }
}

/// 使用 `ErrorInfo` 作为错误类型的 Result 别名
pub type Result<T> = std::result::Result<T, ErrorInfo>;

impl From<std::io::Error> for ErrorInfo {
    fn from(err: std::io::Error) -> Self {
        let (code, category) = match err.kind() {
            std::io::ErrorKind::NotFound => (404, ErrorCategory::Io),
            std::io::ErrorKind::PermissionDenied => (403, ErrorCategory::Io),
            std::io::ErrorKind::InvalidInput | std::io::ErrorKind::InvalidData => {
                (400, ErrorCategory::Parse)
            }
            _ => (500, ErrorCategory::Io),
        };

        ErrorInfo::new(code, err.to_string())
            .with_category(category)
            .with_severity(ErrorSeverity::Error)
    }
}
