use crate::entity::Entity;
use crate::props::Props;
use chrono::{DateTime, Utc};

/// 投递给 `EventHandler` 的事件载荷
///
/// `aggregate` 是聚合内部实体的副本（标识、属性、时间戳），不含属性历史与
/// 已登记事件，因此其 `hash_code()` 为 `[Entity@..]`；需要聚合签名时使用
/// `aggregate_hash_code()`。聚合每次修改后都会刷新仍在等待中的载荷，
/// 处理器看到的是分发前的最新状态。
#[derive(Debug, Clone)]
pub struct DomainEvent<P: Props> {
    pub aggregate: Entity<P>,
    pub event_name: String,
    /// 事件发生（载荷捕获）时间
    pub occurred_at: DateTime<Utc>,
}

impl<P: Props> DomainEvent<P> {
    pub fn new(event_name: impl Into<String>, aggregate: Entity<P>) -> Self {
        Self {
            aggregate,
            event_name: event_name.into(),
            occurred_at: Utc::now(),
        }
    }

    /// 所属聚合的签名：`[Aggregate@<Kind>]:<id>`
    pub fn aggregate_hash_code(&self) -> String {
        format!("[Aggregate@{}]:{}", P::KIND, self.aggregate.id())
    }
}
