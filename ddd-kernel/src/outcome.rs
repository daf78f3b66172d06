//! 结果（Outcome）扩展
//!
//! 所有工厂方法都返回 `DomainResult<T>`。`Outcome` 为其补充领域语义的访问方式：
//! 失败时访问 `value()` 属于编程错误，会直接 panic 并携带失败原因。
//!
use crate::error::{DomainError, DomainResult};

pub trait Outcome<T> {
    /// 是否成功（与 `is_failure` 互斥）
    fn is_success(&self) -> bool;

    /// 是否失败
    fn is_failure(&self) -> bool;

    /// 取出成功值；失败时 panic
    fn value(self) -> T;

    /// 失败原因（成功时为 `None`）
    fn message(&self) -> Option<String>;
}

impl<T> Outcome<T> for DomainResult<T> {
    fn is_success(&self) -> bool {
        self.is_ok()
    }

    fn is_failure(&self) -> bool {
        self.is_err()
    }

    #[track_caller]
    fn value(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => panic!("value() called on a failed outcome: {err}"),
        }
    }

    fn message(&self) -> Option<String> {
        self.as_ref().err().map(DomainError::to_string)
    }
}
