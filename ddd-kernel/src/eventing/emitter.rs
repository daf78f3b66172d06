use super::{EventOptions, Reply};
use crate::error::{DomainError, DomainResult};
use futures_util::future::join_all;
use serde_json::Value;
use std::fmt;
use std::future::IntoFuture;
use std::sync::Arc;

/// 事件回调（类型擦除后的处理器）
pub type Callback<T, R = ()> = Arc<dyn Fn(&T, &DispatchArgs<T, R>) -> Reply<R> + Send + Sync>;

/// 已登记事件的描述
pub struct EventDescriptor<T, R = ()> {
    pub event_name: String,
    pub handler: Callback<T, R>,
    pub options: EventOptions,
}

impl<T, R> Clone for EventDescriptor<T, R> {
    fn clone(&self) -> Self {
        Self {
            event_name: self.event_name.clone(),
            handler: self.handler.clone(),
            options: self.options,
        }
    }
}

impl<T, R> fmt::Debug for EventDescriptor<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDescriptor")
            .field("event_name", &self.event_name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// 分发时传给处理器的第二个参数：事件描述与调用方附带的额外参数
#[derive(Debug, Clone)]
pub struct DispatchArgs<T, R = ()> {
    pub descriptor: EventDescriptor<T, R>,
    pub extra: Vec<Value>,
}

/// 计数快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmitterMetrics {
    total_events: usize,
    total_dispatched: u64,
}

impl EmitterMetrics {
    /// 待分发事件数
    pub fn total_events(&self) -> usize {
        self.total_events
    }

    /// 累计分发次数
    pub fn total_dispatched(&self) -> u64 {
        self.total_dispatched
    }
}

/// 按优先级分发的本地事件发射器
///
/// `T` 为载荷类型，`R` 为处理器的返回值类型（默认 `()`）。
pub struct PriorityEventEmitter<T, R = ()> {
    payload: T,
    // 按登记顺序排列
    events: Vec<EventDescriptor<T, R>>,
    total_dispatched: u64,
}

impl<T, R> PriorityEventEmitter<T, R>
where
    T: 'static,
    R: Send + 'static,
{
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            events: Vec::new(),
            total_dispatched: 0,
        }
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// 以默认选项登记事件
    pub fn add_event<F, O>(&mut self, event_name: &str, handler: F) -> DomainResult<()>
    where
        F: Fn(&T, &DispatchArgs<T, R>) -> O + Send + Sync + 'static,
        O: Into<Reply<R>>,
    {
        self.add_event_with(event_name, handler, EventOptions::default())
    }

    /// 登记事件；同名事件被替换，替换后的事件排在最新的登记位置
    pub fn add_event_with<F, O>(
        &mut self,
        event_name: &str,
        handler: F,
        options: EventOptions,
    ) -> DomainResult<()>
    where
        F: Fn(&T, &DispatchArgs<T, R>) -> O + Send + Sync + 'static,
        O: Into<Reply<R>>,
    {
        if event_name.is_empty() {
            return Err(DomainError::InvalidEventName { call: "add_event" });
        }

        let replaced = self.take(event_name).is_some();
        self.events.push(EventDescriptor {
            event_name: event_name.to_string(),
            handler: Arc::new(move |payload: &T, args: &DispatchArgs<T, R>| -> Reply<R> {
                handler(payload, args).into()
            }),
            options,
        });
        tracing::trace!(event = event_name, priority = options.priority, replaced, "event added");
        Ok(())
    }

    pub fn remove_event(&mut self, event_name: &str) -> bool {
        self.take(event_name).is_some()
    }

    /// 清空待分发事件（不影响累计分发次数）
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// 分发单个事件，返回处理器的结果；未登记时为空操作并返回 `None`
    pub fn dispatch_event(&mut self, event_name: &str, extra: Vec<Value>) -> Option<Reply<R>> {
        match self.take(event_name) {
            Some(descriptor) => Some(self.fire(descriptor, extra)),
            None => {
                tracing::trace!(event = event_name, "no such event");
                None
            }
        }
    }

    /// 按优先级升序（同优先级按登记顺序）分发全部事件
    ///
    /// 全部事件在调用时即被移除并计数。结果按分发顺序收集：
    /// 全部为同步结果时直接完成，否则在所有异步处理器完成后完成。
    pub fn dispatch_events(&mut self) -> Reply<Vec<R>> {
        let mut batch = std::mem::take(&mut self.events);
        batch.sort_by_key(|e| e.options.priority);

        let replies: Vec<Reply<R>> = batch
            .into_iter()
            .map(|descriptor| self.fire(descriptor, Vec::new()))
            .collect();

        if !replies.iter().any(Reply::is_pending) {
            return Reply::Done(replies.into_iter().filter_map(Reply::ready).collect());
        }
        Reply::deferred(join_all(replies.into_iter().map(IntoFuture::into_future)))
    }

    pub fn metrics(&self) -> EmitterMetrics {
        EmitterMetrics {
            total_events: self.events.len(),
            total_dispatched: self.total_dispatched,
        }
    }

    fn take(&mut self, event_name: &str) -> Option<EventDescriptor<T, R>> {
        let pos = self.events.iter().position(|e| e.event_name == event_name)?;
        Some(self.events.remove(pos))
    }

    fn fire(&mut self, descriptor: EventDescriptor<T, R>, extra: Vec<Value>) -> Reply<R> {
        self.total_dispatched += 1;
        tracing::trace!(
            event = %descriptor.event_name,
            priority = descriptor.options.priority,
            "dispatching event"
        );
        let handler = descriptor.handler.clone();
        let args = DispatchArgs { descriptor, extra };
        handler(&self.payload, &args)
    }
}

impl<T: fmt::Debug, R> fmt::Debug for PriorityEventEmitter<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityEventEmitter")
            .field("payload", &self.payload)
            .field("events", &self.events)
            .field("total_dispatched", &self.total_dispatched)
            .finish()
    }
}
