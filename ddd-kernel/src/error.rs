//! 领域层统一错误定义
//!
//! 聚焦属性校验、事件注册/分发与解析等最小必要集合，
//! 工厂方法统一以 `DomainResult` 返回，而不是 panic。
//!
use thiserror::Error;

/// 统一错误类型（内核最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 属性/校验 ---
    #[error("invalid props: kind={kind}, reason={reason}")]
    InvalidProps { kind: &'static str, reason: String },
    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },
    #[error("setters disabled: kind={kind}")]
    SettersDisabled { kind: &'static str },

    // --- 事件 ---
    #[error("{call}: invalid event name")]
    InvalidEventName { call: &'static str },
    #[error("duplicate event: owner={owner}, event={event_name}")]
    DuplicateEvent { owner: String, event_name: String },
    #[error("unsupported duplicate policy: {0}")]
    UnsupportedPolicy(String),
    #[error("event handler error: handler={handler}, reason={reason}")]
    EventHandler { handler: String, reason: String },

    // --- 序列化/解析 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
    #[error("parse error: {reason}")]
    Parse { reason: String },
}

impl DomainError {
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }

    pub fn invalid_props(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidProps {
            kind,
            reason: reason.into(),
        }
    }
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

impl From<uuid::Error> for DomainError {
    fn from(err: uuid::Error) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}
