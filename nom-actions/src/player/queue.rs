//! 播放队列中的单个条目

use std::fmt;

use tracing::debug;

use super::PlayerState;
use crate::action::{ActionObject, FrameState};

/// 完成回调
pub(crate) type CompletionCallback = Box<dyn FnOnce()>;

/// 队列条目
///
/// 记录最后一次同步到动作上的播放器状态，状态没变时不重复转发。
pub(crate) struct QueueEntry {
    pub name: String,
    pub action: Box<dyn ActionObject>,
    on_complete: Option<CompletionCallback>,
    last_state: PlayerState,
}

impl QueueEntry {
    /// 创建条目并同步到当前播放器状态
    pub fn new(
        name: String,
        action: Box<dyn ActionObject>,
        on_complete: Option<CompletionCallback>,
        state: PlayerState,
    ) -> Self {
        let mut entry = Self {
            name,
            action,
            on_complete,
            last_state: PlayerState::Running,
        };
        entry.sync(state);
        entry
    }

    /// 把播放器状态转发给动作
    pub fn sync(&mut self, state: PlayerState) {
        if self.last_state == state {
            return;
        }
        match state {
            PlayerState::Running => self.action.resume(),
            PlayerState::Paused => self.action.pause(),
            PlayerState::Stopped => self.action.rewind(),
        }
        debug!(name = %self.name, from = ?self.last_state, to = ?state, "同步播放状态");
        self.last_state = state;
    }

    /// 推进一帧
    pub fn step(&mut self, delta_ms: f32) -> FrameState {
        self.action.next_frame(delta_ms)
    }

    /// 调用完成回调（最多一次）
    pub fn complete(&mut self) {
        if let Some(callback) = self.on_complete.take() {
            callback();
        }
    }
}

impl fmt::Debug for QueueEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueEntry")
            .field("name", &self.name)
            .field("action", &self.action)
            .field("has_callback", &self.on_complete.is_some())
            .field("last_state", &self.last_state)
            .finish()
    }
}
