use bon::Builder;

/// 事件选项
#[derive(Builder, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventOptions {
    /// 优先级，数值越小越先分发
    #[builder(default = EventOptions::DEFAULT_PRIORITY)]
    pub priority: u8,
}

impl EventOptions {
    pub const DEFAULT_PRIORITY: u8 = 2;
}

impl Default for EventOptions {
    fn default() -> Self {
        Self {
            priority: Self::DEFAULT_PRIORITY,
        }
    }
}
