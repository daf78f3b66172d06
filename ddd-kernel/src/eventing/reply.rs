use futures_core::future::BoxFuture;
use std::fmt;
use std::future::{Future, IntoFuture};

/// 事件处理器的返回值
///
/// 同步处理器直接返回值（转换为 `Done`），异步处理器返回 `Pending`。
/// 两者都可以直接 `.await` 得到处理器的结果。
#[must_use = "await the reply to wait for deferred handlers"]
pub enum Reply<R = ()> {
    Done(R),
    Pending(BoxFuture<'static, R>),
}

impl<R> Reply<R> {
    pub fn deferred(fut: impl Future<Output = R> + Send + 'static) -> Self {
        Self::Pending(Box::pin(fut))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// 已完成时取出结果；仍在等待时返回 `None`
    pub fn ready(self) -> Option<R> {
        match self {
            Self::Done(value) => Some(value),
            Self::Pending(_) => None,
        }
    }
}

impl<R> From<R> for Reply<R> {
    fn from(value: R) -> Self {
        Self::Done(value)
    }
}

impl<R: Send + 'static> IntoFuture for Reply<R> {
    type Output = R;
    type IntoFuture = BoxFuture<'static, R>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Self::Done(value) => Box::pin(std::future::ready(value)),
            Self::Pending(fut) => fut,
        }
    }
}

impl<R: fmt::Debug> fmt::Debug for Reply<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done(value) => f.debug_tuple("Done").field(value).finish(),
            Self::Pending(_) => f.write_str("Pending"),
        }
    }
}
