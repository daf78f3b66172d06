//! 属性历史（撤销/重做）
//!
//! 以快照数组 + 游标表示：前进/后退 O(1)，在后退后发生新的修改时直接截断游标之后的快照。
//! 不变式：至少包含一个快照（创建时的状态），游标始终位于 `0..len`。
//!
use chrono::{DateTime, Utc};

/// 快照产生的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotAction {
    Create,
    Update { attribute: &'static str },
}

/// 某一时刻属性袋的完整不可变副本
#[derive(Debug, Clone)]
pub struct Snapshot<P> {
    props: P,
    updated_at: DateTime<Utc>,
    action: SnapshotAction,
}

impl<P> Snapshot<P> {
    pub(crate) fn new(props: P, updated_at: DateTime<Utc>, action: SnapshotAction) -> Self {
        Self {
            props,
            updated_at,
            action,
        }
    }

    pub fn props(&self) -> &P {
        &self.props
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn action(&self) -> SnapshotAction {
        self.action
    }
}

#[derive(Debug, Clone)]
pub struct History<P> {
    snapshots: Vec<Snapshot<P>>,
    cursor: usize,
}

impl<P> History<P> {
    pub(crate) fn new(initial: Snapshot<P>) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    pub fn count(&self) -> usize {
        self.snapshots.len()
    }

    pub fn index(&self) -> usize {
        self.cursor
    }

    pub fn snapshots(&self) -> &[Snapshot<P>] {
        &self.snapshots
    }

    pub fn current(&self) -> &Snapshot<P> {
        &self.snapshots[self.cursor]
    }

    /// 追加快照并移动游标到末尾，丢弃原游标之后的快照
    pub(crate) fn push(&mut self, snapshot: Snapshot<P>) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len() - 1;
    }

    /// 游标后退一步；已在起点时返回 `None`
    pub(crate) fn back(&mut self) -> Option<&Snapshot<P>> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.snapshots[self.cursor])
    }

    /// 游标前进一步；已在末尾时返回 `None`
    pub(crate) fn forward(&mut self) -> Option<&Snapshot<P>> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.snapshots[self.cursor])
    }
}
