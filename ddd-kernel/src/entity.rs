//! 实体（Entity）
//!
//! 标识 + 可变属性袋 + 自动维护的 `created_at` / `updated_at`：
//! - `created_at` 在创建时确定（来自输入或当前时间），此后不再变化；
//! - 任意属性的成功修改都会把 `updated_at` 推进到一个严格更晚的时间；
//! - 标识由调用方提供或自动生成，自动生成时 `is_new()` 为真；
//! - `id`、`created_at`、`updated_at` 为实体占用的属性键，属性袋不能再使用。
//!
use crate::auto_mapper::{AutoMapper, Describe, Plain, Shape};
use crate::error::{DomainError, DomainResult};
use crate::id::Id;
use crate::props::{Field, Props};
use crate::validator::{Validator, default_validator};
use bon::{Builder, bon};
use chrono::{DateTime, TimeDelta, Utc};
use std::borrow::Cow;
use std::sync::Arc;

/// 实体自身占用的属性键
const RESERVED_KEYS: [&str; 3] = ["id", "created_at", "updated_at"];

/// 实体/聚合的行为配置
#[derive(Builder, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    /// 禁用 `set` / `change`（只读实体）
    #[builder(default)]
    pub disable_setters: bool,
}

/// 具备标识与时间戳的实体
#[derive(Debug, Clone, PartialEq)]
pub struct Entity<P: Props> {
    id: Id,
    props: P,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    is_new: bool,
    settings: Settings,
}

#[bon]
impl<P: Props> Entity<P> {
    /// 完整构造：可选标识、时间戳、配置与校验器（默认 `DefaultValidator`）
    #[builder]
    pub fn new(
        props: P,
        id: Option<Id>,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
        #[builder(default)] settings: Settings,
        validator: Option<Arc<dyn Validator>>,
    ) -> DomainResult<Self> {
        let validator = validator.unwrap_or_else(default_validator);
        props.validate(&*validator)?;

        let reserved = props
            .attributes()
            .into_iter()
            .map(|(key, _)| key)
            .find(|key| RESERVED_KEYS.contains(&key.as_ref()))
            .map(Cow::into_owned);
        if let Some(key) = reserved {
            return Err(DomainError::invalid_props(
                P::KIND,
                format!("attribute key `{key}` is reserved"),
            ));
        }

        let now = Utc::now();
        let created_at = created_at.unwrap_or(now);
        let is_new = id.is_none();

        Ok(Self {
            id: id.unwrap_or_else(Id::generate),
            props,
            created_at,
            updated_at: updated_at.unwrap_or(created_at),
            is_new,
            settings,
        })
    }
}

impl<P: Props> Entity<P> {
    /// 以自动生成的标识创建
    pub fn create(props: P) -> DomainResult<Self> {
        Self::builder().props(props).build()
    }

    /// 以调用方提供的标识创建
    pub fn create_with_id(props: P, id: impl Into<Id>) -> DomainResult<Self> {
        Self::builder().props(props).id(id.into()).build()
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    /// 标识是否为自动生成
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn props(&self) -> &P {
        &self.props
    }

    pub fn get<T>(&self, field: Field<P, T>) -> &T {
        field.get(&self.props)
    }

    /// `entity.set(Field).to(value)`，返回实体以便链式调用
    pub fn set<T>(&mut self, field: Field<P, T>) -> Setter<'_, Self, T> {
        Setter::new(self, field)
    }

    /// 直接修改属性
    pub fn change<T>(&mut self, field: Field<P, T>, value: T) -> &mut Self {
        self.set(field).to(value)
    }

    /// 签名：`[Entity@<Kind>]:<id>`
    pub fn hash_code(&self) -> String {
        format!("[Entity@{}]:{}", P::KIND, self.id)
    }

    /// 同一标识且属性相等（忽略时间戳）
    pub fn is_equal(&self, other: &Self) -> bool {
        self.id == other.id && self.props == other.props
    }

    pub fn to_object(&self) -> Plain {
        AutoMapper::new().entity_to_obj(self)
    }

    /// 按属性键读取扁平化后的单个属性（含 `id`、`created_at`、`updated_at`）
    pub fn attribute(&self, key: &str) -> Option<Plain> {
        let mapper = AutoMapper::new();
        self.bag()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, shape)| mapper.flatten(shape))
    }

    /// 写入属性并推进 `updated_at`；setters 被禁用时返回错误且不做修改
    pub(crate) fn write<T>(&mut self, field: Field<P, T>, value: T) -> DomainResult<()> {
        if self.settings.disable_setters {
            return Err(DomainError::SettersDisabled { kind: P::KIND });
        }
        field.replace(&mut self.props, value);
        self.touch();
        Ok(())
    }

    /// 以快照整体替换属性袋（历史回放）
    pub(crate) fn restore(&mut self, props: P, updated_at: DateTime<Utc>) {
        self.props = props;
        self.updated_at = updated_at;
    }

    fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + TimeDelta::nanoseconds(1)
        };
    }

    pub(crate) fn bag(&self) -> Vec<(Cow<'_, str>, Shape<'_>)> {
        let mut bag = Vec::with_capacity(3);
        bag.push((Cow::Borrowed("id"), self.id.describe()));
        bag.extend(self.props.attributes());
        bag.push((Cow::Borrowed("created_at"), self.created_at.describe()));
        bag.push((Cow::Borrowed("updated_at"), self.updated_at.describe()));
        bag
    }
}

impl<P: Props> Describe for Entity<P> {
    fn describe(&self) -> Shape<'_> {
        Shape::Entity(self.bag())
    }
}

/// 可被 `Setter` 写入的属性存储（实体与聚合）
pub trait Attributes {
    type Props: Props;

    /// 写入单个属性；失败时不产生任何修改
    fn write_attribute<T>(&mut self, field: Field<Self::Props, T>, value: T) -> DomainResult<()>;
}

impl<P: Props> Attributes for Entity<P> {
    type Props = P;

    fn write_attribute<T>(&mut self, field: Field<P, T>, value: T) -> DomainResult<()> {
        self.write(field, value)
    }
}

/// `set(field)` 返回的写入器
#[must_use = "call `.to(value)` to apply the change"]
pub struct Setter<'a, S: Attributes + ?Sized, T> {
    target: &'a mut S,
    field: Field<S::Props, T>,
}

impl<'a, S: Attributes + ?Sized, T> Setter<'a, S, T> {
    pub(crate) fn new(target: &'a mut S, field: Field<S::Props, T>) -> Self {
        Self { target, field }
    }

    /// 写入新值并返回目标，便于继续链式调用；setters 被禁用时为空操作
    pub fn to(self, value: T) -> &'a mut S {
        if let Err(err) = self.target.write_attribute(self.field, value) {
            tracing::warn!(attribute = self.field.name(), %err, "attribute change ignored");
        }
        self.target
    }

    /// 先用 `check` 校验新值，通过后再写入
    pub fn try_to(self, value: T, check: impl FnOnce(&T) -> bool) -> DomainResult<&'a mut S> {
        if !check(&value) {
            return Err(DomainError::invalid_value(format!(
                "rejected value for attribute `{}`",
                self.field.name()
            )));
        }
        self.target.write_attribute(self.field, value)?;
        Ok(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Outcome;
    use crate::value_object::ValueObject;
    use ddd_macros::Props;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Props)]
    struct NameProps {
        value: String,
    }

    #[derive(Debug, Clone, PartialEq, Props)]
    #[props(validate = Self::check)]
    struct UserProps {
        name: String,
        age: u32,
        nick: ValueObject<NameProps>,
        notes: Vec<i32>,
    }

    impl UserProps {
        fn check(&self, _validator: &dyn Validator) -> DomainResult<()> {
            if self.name.is_empty() {
                return Err(DomainError::invalid_props(<Self as Props>::KIND, "name is required"));
            }
            Ok(())
        }
    }

    fn props(name: &str) -> UserProps {
        UserProps {
            name: name.into(),
            age: 21,
            nick: ValueObject::create(NameProps {
                value: "jd".into(),
            })
            .unwrap(),
            notes: vec![1, 2, 3],
        }
    }

    #[test]
    fn create_generates_identity_and_timestamps() {
        let user = Entity::create(props("Jane")).unwrap();
        assert!(user.is_new());
        assert_eq!(user.created_at(), user.updated_at());
        assert_eq!(user.get(UserProps::NAME), "Jane");
    }

    #[test]
    fn create_with_id_is_not_new() {
        let user = Entity::create_with_id(props("Jane"), "1519cb69").unwrap();
        assert!(!user.is_new());
        assert_eq!(user.id().value(), "1519cb69");
        assert_eq!(user.hash_code(), "[Entity@User]:1519cb69");
    }

    #[test]
    fn create_fails_when_validation_fails() {
        let result = Entity::create(props(""));
        assert!(result.is_failure());
        assert!(matches!(
            result.unwrap_err(),
            DomainError::InvalidProps { kind: "User", .. }
        ));
    }

    #[test]
    fn mutation_surfaces_are_equivalent_and_chain() {
        let mut user = Entity::create(props("Jane")).unwrap();
        user.set(UserProps::AGE).to(18).set(UserProps::NAME).to("Anne".into());
        assert_eq!(*user.get(UserProps::AGE), 18);
        assert_eq!(user.get(UserProps::NAME), "Anne");

        user.change(UserProps::AGE, 21).change(UserProps::NAME, "Louse".into());
        assert_eq!(*user.get(UserProps::AGE), 21);
        assert_eq!(user.get(UserProps::NAME), "Louse");
    }

    #[test]
    fn updated_at_advances_and_created_at_is_fixed() {
        let at: DateTime<Utc> = "2022-01-01T03:00:00Z".parse().unwrap();
        let mut user = Entity::builder()
            .props(props("Leticia"))
            .created_at(at)
            .updated_at(at)
            .build()
            .unwrap();
        assert_eq!(user.updated_at(), at);

        user.set(UserProps::NAME).to("Lana".into());
        let first = user.updated_at();
        assert!(first > at);

        user.change(UserProps::AGE, 30);
        assert!(user.updated_at() > first);
        assert_eq!(user.created_at(), at);
    }

    #[test]
    fn try_to_rejects_without_touching_state() {
        let mut user = Entity::create(props("Jane")).unwrap();
        let before = user.updated_at();

        let err = user
            .set(UserProps::AGE)
            .try_to(200, |age| *age < 130)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidValue { .. }));
        assert_eq!(*user.get(UserProps::AGE), 21);
        assert_eq!(user.updated_at(), before);

        user.set(UserProps::AGE).try_to(40, |age| *age < 130).unwrap();
        assert_eq!(*user.get(UserProps::AGE), 40);
    }

    #[test]
    fn disabled_setters_make_mutation_a_no_op() {
        let mut user = Entity::builder()
            .props(props("Jane"))
            .settings(Settings::builder().disable_setters(true).build())
            .build()
            .unwrap();

        user.change(UserProps::NAME, "Anne".into());
        assert_eq!(user.get(UserProps::NAME), "Jane");
        assert!(matches!(
            user.set(UserProps::AGE).try_to(1, |_| true),
            Err(DomainError::SettersDisabled { kind: "User" })
        ));
    }

    #[derive(Debug, Clone, PartialEq, Props)]
    #[props(kind = "Member", validate = Self::check)]
    struct MemberProps {
        age: u32,
    }

    impl MemberProps {
        fn check(&self, validator: &dyn Validator) -> DomainResult<()> {
            if validator.number(f64::from(self.age)).is_between(18.0, 65.0) {
                Ok(())
            } else {
                Err(DomainError::invalid_value("age out of range"))
            }
        }
    }

    #[derive(Debug)]
    struct Inclusive;

    impl Validator for Inclusive {
        fn is_between(&self, value: f64, min: f64, max: f64) -> bool {
            value >= min && value <= max
        }
    }

    #[test]
    fn builder_uses_the_injected_validator() {
        assert!(Entity::create(MemberProps { age: 18 }).is_failure());

        let member = Entity::builder()
            .props(MemberProps { age: 18 })
            .validator(Arc::new(Inclusive))
            .build()
            .unwrap();
        assert_eq!(*member.get(MemberProps::AGE), 18);
    }

    #[derive(Debug, Clone, PartialEq, Props)]
    struct ShadowProps {
        name: String,
        #[props(rename = "created_at")]
        opened_at: String,
    }

    #[derive(Debug, Clone, PartialEq, Props)]
    struct IdProps {
        id: u32,
    }

    #[test]
    fn reserved_attribute_keys_are_rejected() {
        let err = Entity::create(ShadowProps {
            name: "Jane".into(),
            opened_at: "yesterday".into(),
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid props: kind=Shadow, reason=attribute key `created_at` is reserved"
        );
        assert!(Entity::create(IdProps { id: 7 }).is_failure());
        assert!(ValueObject::create(IdProps { id: 7 }).is_success());
    }

    #[test]
    fn is_equal_ignores_timestamps() {
        let a = Entity::create_with_id(props("Jane"), "same").unwrap();
        let mut b = Entity::create_with_id(props("Jane"), "same").unwrap();
        assert!(a.is_equal(&b));
        b.change(UserProps::AGE, 99);
        assert!(!a.is_equal(&b));
    }

    #[test]
    fn to_object_flattens_full_bag() {
        let user = Entity::create_with_id(props("Jane"), "u-1").unwrap();
        let obj = user.to_object();

        assert_eq!(obj["id"], Plain::from("u-1"));
        assert_eq!(obj["nick"], Plain::from("jd"));
        assert_eq!(obj["notes"].to_json(), json!([1, 2, 3]));
        assert!(obj["created_at"].as_date().is_some());
        assert!(obj["updated_at"].as_date().is_some());
        assert_eq!(user.attribute("age"), Some(Plain::from(21)));
        assert_eq!(user.attribute("id"), Some(Plain::from("u-1")));
    }
}
