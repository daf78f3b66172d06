//! 聚合（Aggregate）
//!
//! 在实体之上增加两项能力：
//! - 属性历史：每次成功修改都会追加完整快照，`history()` 只读查看，
//!   `history_mut()` 后退/前进；
//! - 领域事件：`add_event` 将处理器登记到共享的 `DomainEventRegistry`，
//!   仍待分发的事件载荷会随聚合的每次修改或历史移动刷新为最新状态。
//!
mod history;

pub use history::{History, Snapshot, SnapshotAction};

use crate::auto_mapper::{AutoMapper, Describe, Plain, Shape};
use crate::domain_event::{DomainEventRegistry, DuplicatePolicy, EventHandler, short_type_name};
use crate::entity::{Attributes, Entity, Setter, Settings};
use crate::error::{DomainError, DomainResult};
use crate::id::Id;
use crate::props::{Field, Props};
use crate::validator::Validator;
use bon::bon;
use chrono::{DateTime, Utc};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// 聚合本地登记的事件
#[derive(Clone)]
struct LocalEvent<P: Props> {
    event_name: String,
    handler: Arc<dyn EventHandler<P>>,
    policy: DuplicatePolicy,
}

/// 聚合根
#[derive(Clone)]
pub struct Aggregate<P: Props> {
    entity: Entity<P>,
    history: History<P>,
    events: Vec<LocalEvent<P>>,
    registry: Arc<DomainEventRegistry>,
}

#[bon]
impl<P: Props> Aggregate<P> {
    /// 完整构造：可选标识、时间戳、配置、校验器与事件登记表（默认进程级实例）
    #[builder]
    pub fn new(
        props: P,
        id: Option<Id>,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
        #[builder(default)] settings: Settings,
        validator: Option<Arc<dyn Validator>>,
        registry: Option<Arc<DomainEventRegistry>>,
    ) -> DomainResult<Self> {
        let entity = Entity::builder()
            .props(props)
            .maybe_id(id)
            .maybe_created_at(created_at)
            .maybe_updated_at(updated_at)
            .settings(settings)
            .maybe_validator(validator)
            .build()?;

        let initial = Snapshot::new(
            entity.props().clone(),
            entity.updated_at(),
            SnapshotAction::Create,
        );

        Ok(Self {
            entity,
            history: History::new(initial),
            events: Vec::new(),
            registry: registry.unwrap_or_else(DomainEventRegistry::global),
        })
    }
}

impl<P: Props> Aggregate<P> {
    pub fn create(props: P) -> DomainResult<Self> {
        Self::builder().props(props).build()
    }

    pub fn create_with_id(props: P, id: impl Into<Id>) -> DomainResult<Self> {
        Self::builder().props(props).id(id.into()).build()
    }

    pub fn id(&self) -> &Id {
        self.entity.id()
    }

    pub fn is_new(&self) -> bool {
        self.entity.is_new()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.entity.created_at()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.entity.updated_at()
    }

    pub fn props(&self) -> &P {
        self.entity.props()
    }

    pub fn as_entity(&self) -> &Entity<P> {
        &self.entity
    }

    pub fn registry(&self) -> &Arc<DomainEventRegistry> {
        &self.registry
    }

    pub fn get<T>(&self, field: Field<P, T>) -> &T {
        self.entity.get(field)
    }

    /// `aggregate.set(Field).to(value)`，每次成功写入追加一个历史快照
    pub fn set<T>(&mut self, field: Field<P, T>) -> Setter<'_, Self, T> {
        Setter::new(self, field)
    }

    pub fn change<T>(&mut self, field: Field<P, T>, value: T) -> &mut Self {
        self.set(field).to(value)
    }

    /// 属性历史（只读）
    pub fn history(&self) -> &History<P> {
        &self.history
    }

    /// 可后退/前进的属性历史游标
    pub fn history_mut(&mut self) -> HistoryCursor<'_, P> {
        HistoryCursor { aggregate: self }
    }

    /// 签名：`[Aggregate@<Kind>]:<id>`
    pub fn hash_code(&self) -> String {
        format!("[Aggregate@{}]:{}", P::KIND, self.id())
    }

    pub fn to_object(&self) -> Plain {
        AutoMapper::new().aggregate_to_obj(self)
    }

    pub fn attribute(&self, key: &str) -> Option<Plain> {
        self.entity.attribute(key)
    }

    /// 登记领域事件
    ///
    /// 事件名取 `handler.event_name()`，为空时取处理器类型名。
    /// 登记表中同一标识下已有同名待分发事件时按 `policy` 处理，
    /// 包括同一标识的其他聚合实例登记的事件。
    pub fn add_event<H: EventHandler<P>>(
        &mut self,
        handler: H,
        policy: DuplicatePolicy,
    ) -> DomainResult<()> {
        let event_name = match handler.event_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => short_type_name::<H>().to_string(),
        };
        self.prune_events();

        if self.registry.contains(self.entity.id(), &event_name) {
            match policy {
                DuplicatePolicy::Reject => {
                    return Err(DomainError::DuplicateEvent {
                        owner: self.id().to_string(),
                        event_name,
                    });
                }
                DuplicatePolicy::Ignore => {
                    tracing::debug!(owner = %self.id(), event = %event_name, "duplicate domain event ignored");
                    return Ok(());
                }
                DuplicatePolicy::Replace => {
                    self.events.retain(|e| e.event_name != event_name);
                }
            }
        }

        let handler: Arc<dyn EventHandler<P>> = Arc::new(handler);
        self.registry
            .register(self.entity.id(), &event_name, handler.clone(), self.entity.clone());
        tracing::debug!(owner = %self.id(), event = %event_name, %policy, "aggregate event added");
        self.events.push(LocalEvent {
            event_name,
            handler,
            policy,
        });
        Ok(())
    }

    /// 删除已登记事件（不分发）
    pub fn delete_event(&mut self, event_name: &str) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.event_name != event_name);
        let removed = self.registry.remove(self.entity.id(), event_name);
        removed || self.events.len() != before
    }

    /// 分发本聚合的单个事件，详见 `DomainEventRegistry::dispatch`
    pub fn dispatch_event(
        &mut self,
        event_name: &str,
    ) -> impl Future<Output = DomainResult<bool>> + Send + use<P> {
        self.events.retain(|e| e.event_name != event_name);
        self.registry.dispatch(self.entity.id(), event_name)
    }

    /// 按登记顺序分发本聚合全部待分发事件
    ///
    /// 全部事件在调用时即被取出；返回的 future 依次等待处理器完成，
    /// 成功时给出分发数量，任一处理器失败时给出第一个错误。
    pub fn dispatch_all(&mut self) -> impl Future<Output = DomainResult<usize>> + Send + use<P> {
        let pending: Vec<_> = self
            .events
            .drain(..)
            .map(|e| self.registry.dispatch(self.entity.id(), &e.event_name))
            .collect();

        async move {
            let mut dispatched = 0;
            let mut first_error = None;
            for fut in pending {
                match fut.await {
                    Ok(true) => dispatched += 1,
                    Ok(false) => {}
                    Err(err) => {
                        first_error.get_or_insert(err);
                    }
                }
            }
            match first_error {
                Some(err) => Err(err),
                None => Ok(dispatched),
            }
        }
    }

    /// 移除本聚合全部事件（不分发）
    pub fn clear_events(&mut self) {
        for e in self.events.drain(..) {
            self.registry.remove(self.entity.id(), &e.event_name);
        }
    }

    /// 仍待分发的本地事件数
    pub fn event_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| self.registry.holds(self.entity.id(), &e.event_name, &e.handler))
            .count()
    }

    /// 丢弃已被分发、移除或被其他实例覆盖的本地记录
    fn prune_events(&mut self) {
        let (registry, id) = (&self.registry, self.entity.id());
        self.events.retain(|e| registry.holds(id, &e.event_name, &e.handler));
    }

    /// 以当前状态刷新仍待分发的事件载荷
    fn refresh_pending(&mut self) {
        let (registry, entity) = (&self.registry, &self.entity);
        self.events.retain(|e| {
            registry.refresh(entity.id(), &e.event_name, e.handler.clone(), entity.clone())
        });
    }

    fn restore(&mut self, snapshot: (P, DateTime<Utc>)) {
        let (props, updated_at) = snapshot;
        self.entity.restore(props, updated_at);
        self.refresh_pending();
    }
}

impl<P: Props> Attributes for Aggregate<P> {
    type Props = P;

    fn write_attribute<T>(&mut self, field: Field<P, T>, value: T) -> DomainResult<()> {
        self.entity.write(field, value)?;
        self.history.push(Snapshot::new(
            self.entity.props().clone(),
            self.entity.updated_at(),
            SnapshotAction::Update {
                attribute: field.name(),
            },
        ));
        self.refresh_pending();
        Ok(())
    }
}

impl<P: Props> Describe for Aggregate<P> {
    fn describe(&self) -> Shape<'_> {
        Shape::Entity(self.entity.bag())
    }
}

impl<P: Props> fmt::Debug for Aggregate<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let events: Vec<(&str, DuplicatePolicy)> = self
            .events
            .iter()
            .map(|e| (e.event_name.as_str(), e.policy))
            .collect();
        f.debug_struct("Aggregate")
            .field("entity", &self.entity)
            .field("history", &(self.history.index(), self.history.count()))
            .field("events", &events)
            .finish()
    }
}

/// 属性历史游标：后退/前进时把对应快照恢复到聚合
pub struct HistoryCursor<'a, P: Props> {
    aggregate: &'a mut Aggregate<P>,
}

impl<P: Props> HistoryCursor<'_, P> {
    /// 快照数量（含创建时的快照）
    pub fn count(&self) -> usize {
        self.aggregate.history.count()
    }

    /// 当前游标位置
    pub fn index(&self) -> usize {
        self.aggregate.history.index()
    }

    pub fn snapshots(&self) -> &[Snapshot<P>] {
        self.aggregate.history.snapshots()
    }

    /// 后退一步；已在起点时为空操作并返回 `false`
    pub fn back(&mut self) -> bool {
        let Some(snapshot) = self.aggregate.history.back() else {
            return false;
        };
        let state = (snapshot.props().clone(), snapshot.updated_at());
        self.aggregate.restore(state);
        tracing::trace!(owner = %self.aggregate.id(), index = self.index(), "history back");
        true
    }

    /// 前进一步；已在末尾时为空操作并返回 `false`
    pub fn forward(&mut self) -> bool {
        let Some(snapshot) = self.aggregate.history.forward() else {
            return false;
        };
        let state = (snapshot.props().clone(), snapshot.updated_at());
        self.aggregate.restore(state);
        tracing::trace!(owner = %self.aggregate.id(), index = self.index(), "history forward");
        true
    }
}
