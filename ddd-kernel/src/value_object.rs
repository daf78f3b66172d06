//! 值对象（Value Object）
//!
//! 无标识、以值相等为准的不可变对象。只能通过校验工厂创建，创建后不再修改；
//! 所谓“变更”即基于旧值创建新的实例（`clone_with`）。
//!
use crate::auto_mapper::{AutoMapper, Describe, Plain, Shape};
use crate::error::DomainResult;
use crate::props::{Field, Props};
use crate::validator::{Validator, default_validator};
use std::fmt;
use std::sync::Arc;

/// 值对象：持有不可变属性袋 `P` 与创建时使用的校验器
#[derive(Clone)]
pub struct ValueObject<P: Props> {
    props: P,
    validator: Arc<dyn Validator>,
}

impl<P: Props> ValueObject<P> {
    /// 使用默认校验器创建
    pub fn create(props: P) -> DomainResult<Self> {
        Self::create_with(props, default_validator())
    }

    /// 使用注入的校验器创建；`clone_with` 沿用同一校验器
    pub fn create_with(props: P, validator: Arc<dyn Validator>) -> DomainResult<Self> {
        props.validate(&*validator)?;
        Ok(Self { props, validator })
    }

    /// 读取属性；嵌套值对象原样返回，由调用方继续 `get`
    pub fn get<T>(&self, field: Field<P, T>) -> &T {
        field.get(&self.props)
    }

    pub fn props(&self) -> &P {
        &self.props
    }

    pub fn into_props(self) -> P {
        self.props
    }

    /// 结构相等
    pub fn equals(&self, other: &Self) -> bool {
        self == other
    }

    /// 稳定签名：`[ValueObject@<Kind>]`
    pub fn hash_code(&self) -> String {
        format!("[ValueObject@{}]", P::KIND)
    }

    /// 基于当前属性的修改副本创建新实例（以原校验器重新校验，原实例不变）
    pub fn clone_with(&self, change: impl FnOnce(&mut P)) -> DomainResult<Self> {
        let mut props = self.props.clone();
        change(&mut props);
        Self::create_with(props, self.validator.clone())
    }

    /// 扁平化为纯数据（单属性时折叠为标量）
    pub fn to_object(&self) -> Plain {
        AutoMapper::new().value_object_to_obj(self)
    }

    /// 按属性键读取扁平化后的单个属性
    pub fn attribute(&self, key: &str) -> Option<Plain> {
        let mapper = AutoMapper::new();
        self.props
            .attributes()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, shape)| mapper.flatten(shape))
    }
}

// 相等只比较属性，校验器不参与
impl<P: Props> PartialEq for ValueObject<P> {
    fn eq(&self, other: &Self) -> bool {
        self.props == other.props
    }
}

impl<P: Props> fmt::Debug for ValueObject<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueObject")
            .field("props", &self.props)
            .finish_non_exhaustive()
    }
}

impl<P: Props> Describe for ValueObject<P> {
    fn describe(&self) -> Shape<'_> {
        Shape::ValueObject(self.props.attributes())
    }
}
