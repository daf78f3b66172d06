use super::{DomainEvent, EventHandler};
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::Id;
use crate::props::Props;
use dashmap::DashMap;
use futures_core::future::BoxFuture;
use std::future::Future;
use std::sync::{Arc, LazyLock};

/// 类型擦除后的待分发事件
trait PendingEvent: Send + Sync {
    /// 登记该事件的处理器地址
    fn handler_ptr(&self) -> *const ();

    fn fire(self: Box<Self>) -> BoxFuture<'static, anyhow::Result<()>>;
}

struct Pending<P: Props> {
    handler: Arc<dyn EventHandler<P>>,
    event: DomainEvent<P>,
}

impl<P: Props> PendingEvent for Pending<P> {
    fn handler_ptr(&self) -> *const () {
        handler_ptr(&self.handler)
    }

    fn fire(self: Box<Self>) -> BoxFuture<'static, anyhow::Result<()>> {
        Box::pin(async move { self.handler.dispatch(&self.event).await })
    }
}

type Key = (Id, String);

static GLOBAL: LazyLock<Arc<DomainEventRegistry>> =
    LazyLock::new(|| Arc::new(DomainEventRegistry::new()));

/// 领域事件登记表
///
/// 以 (所属聚合标识, 事件名) 为键保存待分发事件；分发即移除（至多一次消费）。
/// 单个操作原子（`DashMap`），不同聚合之间不保证顺序。
/// 聚合通过构造注入共享实例，`global()` 提供进程级默认实例。
#[derive(Default)]
pub struct DomainEventRegistry {
    entries: DashMap<Key, Box<dyn PendingEvent>>,
}

impl DomainEventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 进程级默认实例（首次访问时创建）
    pub fn global() -> Arc<Self> {
        GLOBAL.clone()
    }

    /// 注册（或覆盖）事件
    pub fn register<P: Props>(
        &self,
        owner: &Id,
        event_name: &str,
        handler: Arc<dyn EventHandler<P>>,
        aggregate: Entity<P>,
    ) {
        let pending = Pending {
            handler,
            event: DomainEvent::new(event_name, aggregate),
        };
        let replaced = self
            .entries
            .insert(key(owner, event_name), Box::new(pending))
            .is_some();
        tracing::debug!(owner = %owner, event = event_name, replaced, "domain event registered");
    }

    /// 仅当事件仍待分发且仍由 `handler` 持有时刷新其载荷，返回是否刷新
    pub(crate) fn refresh<P: Props>(
        &self,
        owner: &Id,
        event_name: &str,
        handler: Arc<dyn EventHandler<P>>,
        aggregate: Entity<P>,
    ) -> bool {
        match self.entries.get_mut(&key(owner, event_name)) {
            Some(mut slot) if slot.handler_ptr() == handler_ptr(&handler) => {
                *slot = Box::new(Pending {
                    handler,
                    event: DomainEvent::new(event_name, aggregate),
                });
                true
            }
            _ => false,
        }
    }

    /// 事件是否仍待分发且由 `handler` 登记
    pub(crate) fn holds<P: Props>(
        &self,
        owner: &Id,
        event_name: &str,
        handler: &Arc<dyn EventHandler<P>>,
    ) -> bool {
        self.entries
            .get(&key(owner, event_name))
            .is_some_and(|slot| slot.handler_ptr() == handler_ptr(handler))
    }

    /// 移除事件（不分发）
    pub fn remove(&self, owner: &Id, event_name: &str) -> bool {
        let removed = self.entries.remove(&key(owner, event_name)).is_some();
        if removed {
            tracing::debug!(owner = %owner, event = event_name, "domain event removed");
        }
        removed
    }

    /// 分发事件
    ///
    /// 匹配项在调用时即被移除；返回的 future 在处理器完成后给出 `Ok(true)`，
    /// 无匹配时为 `Ok(false)`（空操作），处理器失败时为 `EventHandler` 错误。
    pub fn dispatch(
        &self,
        owner: &Id,
        event_name: &str,
    ) -> impl Future<Output = DomainResult<bool>> + Send + use<> {
        let taken = self.entries.remove(&key(owner, event_name));
        let event_name = event_name.to_string();

        if taken.is_some() {
            tracing::debug!(owner = %owner, event = %event_name, "dispatching domain event");
        } else {
            tracing::trace!(owner = %owner, event = %event_name, "no pending domain event");
        }

        async move {
            let Some((_, pending)) = taken else {
                return Ok(false);
            };
            if let Err(err) = pending.fire().await {
                tracing::warn!(event = %event_name, error = %err, "domain event handler failed");
                return Err(DomainError::EventHandler {
                    handler: event_name,
                    reason: err.to_string(),
                });
            }
            Ok(true)
        }
    }

    pub fn contains(&self, owner: &Id, event_name: &str) -> bool {
        self.entries.contains_key(&key(owner, event_name))
    }

    /// 全部待分发事件数
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// 某个聚合的待分发事件数
    pub fn total_for(&self, owner: &Id) -> usize {
        self.entries.iter().filter(|e| &e.key().0 == owner).count()
    }

    /// 清空（测试隔离）
    pub fn clear(&self) {
        self.entries.clear();
    }
}

fn key(owner: &Id, event_name: &str) -> Key {
    (owner.clone(), event_name.to_string())
}

fn handler_ptr<P: Props>(handler: &Arc<dyn EventHandler<P>>) -> *const () {
    Arc::as_ptr(handler) as *const ()
}
