//! 本地事件发射器（eventing）
//!
//! `PriorityEventEmitter` 持有一个不可变载荷与一组具名事件：
//! - 同名事件后注册者覆盖先注册者；
//! - `dispatch_event` 分发单个事件，`dispatch_events` 按优先级（升序）分发全部事件；
//! - 分发即移除，并累计分发次数（清空/移除不会回退计数）。
//!
//! 处理器为普通闭包：同步处理器直接返回结果，异步处理器返回
//! `Reply::deferred(future)`。`dispatch_event` 给出单个处理器的 `Reply`，
//! `dispatch_events` 按分发顺序收集全部结果，调用方可 `.await` 等待。
//!
mod emitter;
mod options;
mod reply;

pub use emitter::{Callback, DispatchArgs, EmitterMetrics, EventDescriptor, PriorityEventEmitter};
pub use options::EventOptions;
pub use reply::Reply;
