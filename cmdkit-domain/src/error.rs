//! 领域层统一错误定义
//!
//! 聚焦会话状态、计数器与会话存储的最小必要集合，
//! 便于在应用层统一转换为 `AppError`。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 会话存储 ---
    #[error("session store error: {reason}")]
    SessionStore { reason: String },
    #[error("version conflict: session={session}, expected={expected}, actual={actual}")]
    VersionConflict {
        session: String,
        expected: usize,
        actual: usize,
    },

    // --- 领域规则/状态 ---
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },
    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;
