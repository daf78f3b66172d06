//! 属性袋（Props）与类型化属性键（Field）
//!
//! 值对象、实体与聚合都持有一个 `Props` 属性袋。属性袋负责：
//! - 以 `attributes` 描述自身（供 AutoMapper 使用）；
//! - 以 `validate` 在创建时进行业务校验；
//! - 通过 `#[derive(Props)]` 为每个字段生成 `Field` 常量，用于 `get/set/change`。
//!
//! ```
//! use ddd_kernel::{Aggregate, Props};
//!
//! #[derive(Debug, Clone, PartialEq, Props)]
//! pub struct UserProps {
//!     pub name: String,
//!     pub age: u32,
//! }
//!
//! let mut user = Aggregate::create(UserProps { name: "Jane".into(), age: 21 }).unwrap();
//! user.set(UserProps::AGE).to(18);
//! assert_eq!(*user.get(UserProps::AGE), 18);
//! assert_eq!(<UserProps as Props>::KIND, "User");
//! ```
use crate::auto_mapper::Bag;
use crate::error::DomainResult;
use crate::validator::Validator;
use std::fmt;

/// 属性袋抽象
pub trait Props: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// 具体类别名（用于 hash_code 等签名）
    const KIND: &'static str;

    /// 以有序的 (键, 形态) 描述全部属性
    fn attributes(&self) -> Bag<'_>;

    /// 创建时的业务校验
    fn validate(&self, _validator: &dyn Validator) -> DomainResult<()> {
        Ok(())
    }
}

/// 类型化属性键：名称 + 读写访问器
pub struct Field<P, T> {
    name: &'static str,
    get: fn(&P) -> &T,
    get_mut: fn(&mut P) -> &mut T,
}

impl<P, T> Field<P, T> {
    pub const fn new(name: &'static str, get: fn(&P) -> &T, get_mut: fn(&mut P) -> &mut T) -> Self {
        Self { name, get, get_mut }
    }

    /// 属性键名
    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub fn get<'a>(&self, props: &'a P) -> &'a T {
        (self.get)(props)
    }

    pub fn get_mut<'a>(&self, props: &'a mut P) -> &'a mut T {
        (self.get_mut)(props)
    }

    /// 写入新值，返回旧值
    pub(crate) fn replace(&self, props: &mut P, value: T) -> T {
        std::mem::replace(self.get_mut(props), value)
    }
}

impl<P, T> Clone for Field<P, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P, T> Copy for Field<P, T> {}

impl<P, T> fmt::Debug for Field<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}
