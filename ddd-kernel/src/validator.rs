//! 校验能力（Validator）
//!
//! 由外部注入、供 `Props::validate` 调用的校验能力。内核只依赖这个 trait，
//! 实体/聚合的 builder 与 `ValueObject::create_with` 都可以替换具体实现；
//! 未注入时使用 `DefaultValidator`。
//!
use std::fmt;
use std::sync::{Arc, LazyLock};

/// 校验能力
pub trait Validator: fmt::Debug + Send + Sync {
    /// 数值是否位于区间 `(min, max)` 内
    fn is_between(&self, value: f64, min: f64, max: f64) -> bool;

    /// `validator.number(v).is_between(min, max)` 形式的链式校验
    fn number(&self, value: f64) -> NumberCheck<'_>
    where
        Self: Sized,
    {
        NumberCheck {
            validator: self,
            value,
        }
    }
}

impl dyn Validator + '_ {
    pub fn number(&self, value: f64) -> NumberCheck<'_> {
        NumberCheck {
            validator: self,
            value,
        }
    }
}

/// 数值校验
#[derive(Debug, Clone, Copy)]
pub struct NumberCheck<'a> {
    validator: &'a dyn Validator,
    value: f64,
}

impl NumberCheck<'_> {
    pub fn is_between(&self, min: f64, max: f64) -> bool {
        self.validator.is_between(self.value, min, max)
    }
}

/// 默认校验器：区间为开区间
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValidator;

impl Validator for DefaultValidator {
    fn is_between(&self, value: f64, min: f64, max: f64) -> bool {
        value > min && value < max
    }
}

static DEFAULT: LazyLock<Arc<dyn Validator>> = LazyLock::new(|| Arc::new(DefaultValidator));

/// 未注入校验器时使用的共享默认实例
pub(crate) fn default_validator() -> Arc<dyn Validator> {
    DEFAULT.clone()
}
