//! DDD 领域建模内核（ddd-kernel）
//!
//! 为业务逻辑层提供通用的领域建模构件：
//! - 标识（`id`）与结果（`outcome`）
//! - 值对象（`value_object`）、实体（`entity`）与带属性历史的聚合（`aggregate`）
//! - 无反射的对象图扁平化（`auto_mapper`）
//! - 与聚合标识绑定的领域事件登记表（`domain_event`）
//! - 按优先级分发的本地事件发射器（`eventing`）
//!
//! 属性袋通过 `#[derive(Props)]` 描述自身并生成类型化属性键：
//!
//! 1. 为属性袋派生 `Props`，必要时提供 `validate` 校验；
//! 2. 以 `ValueObject::create` / `Entity::create` / `Aggregate::create` 创建领域对象；
//! 3. 通过 `get/set/change` 读写属性，聚合自动记录历史；
//! 4. 使用 `AutoMapper`（或 `to_object`）输出与领域类型无关的纯数据。
//!
pub mod aggregate;
pub mod auto_mapper;
pub mod domain_event;
pub mod entity;
pub mod error;
pub mod eventing;
pub mod id;
pub mod outcome;
pub mod props;
pub mod validator;
pub mod value_object;

// 允许在本 crate 内部通过 ::ddd_kernel 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::ddd_kernel 路径。
extern crate self as ddd_kernel;

pub use aggregate::{Aggregate, History, HistoryCursor, Snapshot, SnapshotAction};
pub use auto_mapper::{AutoMapper, Bag, Describe, Plain, Shape};
pub use ddd_macros::Props;
pub use domain_event::{DomainEvent, DomainEventRegistry, DuplicatePolicy, EventHandler};
pub use entity::{Entity, Settings};
pub use error::{DomainError, DomainResult};
pub use eventing::{DispatchArgs, EventOptions, PriorityEventEmitter, Reply};
pub use id::Id;
pub use outcome::Outcome;
pub use props::{Field, Props};
pub use validator::{DefaultValidator, NumberCheck, Validator};
pub use value_object::ValueObject;
