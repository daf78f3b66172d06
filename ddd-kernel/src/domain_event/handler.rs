use super::DomainEvent;
use crate::error::DomainError;
use crate::props::Props;
use async_trait::async_trait;
use std::{fmt, str::FromStr};

/// 聚合领域事件处理器（具备标识绑定生命周期的处理器）
///
/// `event_name` 为空时，以处理器具体类型名（最后一段路径）作为事件名。
#[async_trait]
pub trait EventHandler<P: Props>: Send + Sync + 'static {
    /// 事件名
    fn event_name(&self) -> Option<&str> {
        None
    }

    /// 处理事件
    async fn dispatch(&self, event: &DomainEvent<P>) -> anyhow::Result<()>;
}

/// 同名事件重复注册时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// 覆盖已有注册
    #[default]
    Replace,
    /// 拒绝并返回 `DuplicateEvent`
    Reject,
    /// 保留已有注册，忽略本次
    Ignore,
}

impl DuplicatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Replace => "REPLACE_DUPLICATED",
            Self::Reject => "REJECT_DUPLICATED",
            Self::Ignore => "IGNORE_DUPLICATED",
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuplicatePolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REPLACE_DUPLICATED" => Ok(Self::Replace),
            "REJECT_DUPLICATED" => Ok(Self::Reject),
            "IGNORE_DUPLICATED" => Ok(Self::Ignore),
            other => Err(DomainError::UnsupportedPolicy(other.to_string())),
        }
    }
}

/// 类型名的最后一段（去掉模块路径与泛型参数）
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
