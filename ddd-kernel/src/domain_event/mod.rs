//! 领域事件（Domain Event）
//!
//! 与聚合标识绑定的事件：聚合通过 `add_event` 注册处理器，
//! 事件以 (聚合标识, 事件名) 为键保存在共享的 `DomainEventRegistry` 中，
//! 分发时取出并交给 `EventHandler` 处理（至多一次）。

mod event;
mod handler;
mod registry;

pub use event::DomainEvent;
pub use handler::{DuplicatePolicy, EventHandler};
pub(crate) use handler::short_type_name;
pub use registry::DomainEventRegistry;
