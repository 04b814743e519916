//! # Player 模块
//!
//! 动作播放器：持有正在播放的顶层动作，每个 tick 推进一次。
//!
//! ```rust,ignore
//! let mut player = ActionPlayer::new();
//! player.run_action_with(&action, || println!("done"))?;
//! while player.update(16.0) {}
//! ```

mod queue;

use std::fmt;

use tracing::{debug, warn};

use crate::action::{ActionObject, FrameState, checked_speed};
use crate::config::PlayerConfig;
use crate::error::{ActionError, ActionResult};
use queue::{CompletionCallback, QueueEntry};

/// 播放器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    /// 正常推进
    #[default]
    Running,
    /// 暂停，动作保持当前进度
    Paused,
    /// 停止，动作回到起点
    Stopped,
}

/// 动作播放器
///
/// ## 名字规则
///
/// - 名字可以重复，每次 `run_action` 都会追加一个新条目
/// - `action_running` / `remove_action` 作用于所有同名条目
/// - `action` 返回最后加入的同名条目
///
/// ## 停止与恢复
///
/// `stop()` 倒带所有动作（目标恢复到起始值），之后 `update` 不再推进；
/// `resume()` 让它们从头开始播放。
pub struct ActionPlayer {
    queue: Vec<QueueEntry>,
    state: PlayerState,
    config: PlayerConfig,
    /// 下一个自动生成的名字序号
    next_id: u64,
}

impl Default for ActionPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ActionPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionPlayer")
            .field("actions", &self.queue.len())
            .field("state", &self.state)
            .field("config", &self.config)
            .finish()
    }
}

impl ActionPlayer {
    /// 创建使用默认配置的播放器
    pub fn new() -> Self {
        Self::with_config(PlayerConfig::default())
    }

    /// 使用指定配置创建播放器
    ///
    /// 配置无效时打印警告并回退到默认配置。
    pub fn with_config(config: PlayerConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!(error = %e, "播放器配置无效，使用默认配置");
                PlayerConfig::default()
            }
        };
        Self {
            queue: Vec::new(),
            state: PlayerState::Running,
            config,
            next_id: 0,
        }
    }

    /// 当前配置
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    // ========== 加入动作 ==========

    /// 播放动作
    ///
    /// 播放的是动作的副本，调用方之后对原动作的修改不影响队列。
    ///
    /// # 返回
    /// 分配给该条目的名字
    pub fn run_action(&mut self, action: &dyn ActionObject) -> ActionResult<String> {
        self.enqueue(action, None, None)
    }

    /// 播放动作，完成后调用 `on_complete`
    pub fn run_action_with(
        &mut self,
        action: &dyn ActionObject,
        on_complete: impl FnOnce() + 'static,
    ) -> ActionResult<String> {
        self.enqueue(action, None, Some(Box::new(on_complete)))
    }

    /// 以指定名字播放动作
    ///
    /// # 参数
    /// - `action`: 要播放的动作（会被克隆）
    /// - `name`: 条目名字，为空时退回动作自身的名字或自动生成
    /// - `on_complete`: 可选的完成回调
    pub fn run_action_named(
        &mut self,
        action: &dyn ActionObject,
        name: &str,
        on_complete: Option<Box<dyn FnOnce()>>,
    ) -> ActionResult<String> {
        self.enqueue(action, Some(name), on_complete)
    }

    fn enqueue(
        &mut self,
        action: &dyn ActionObject,
        name: Option<&str>,
        on_complete: Option<CompletionCallback>,
    ) -> ActionResult<String> {
        let duration = action.duration();
        if duration.is_nan() || duration < 0.0 {
            return Err(ActionError::InvalidDuration {
                seconds: duration / 1000.0,
            });
        }
        checked_speed(action.speed())?;

        let name = match name.filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None if !action.name().is_empty() => action.name().to_string(),
            None => self.next_name(),
        };
        if self.config.warn_on_name_collision && self.action_running(&name) {
            warn!(name = %name, "已有同名动作在播放");
        }

        let mut copy = action.clone_action();
        copy.set_name(&name);
        debug!(name = %name, duration = duration, "加入动作");

        self.queue
            .push(QueueEntry::new(name.clone(), copy, on_complete, self.state));
        Ok(name)
    }

    fn next_name(&mut self) -> String {
        let name = format!("{}{}", self.config.auto_name_prefix, self.next_id);
        self.next_id += 1;
        name
    }

    // ========== 推进 ==========

    /// 推进所有动作
    ///
    /// 按加入顺序推进每个条目；完成的条目先调用回调，再释放目标引用并移出队列。
    /// 非 `Running` 状态下不推进。
    ///
    /// # 返回
    /// 队列中是否还有动作
    pub fn update(&mut self, delta_ms: f32) -> bool {
        if self.state != PlayerState::Running {
            return !self.queue.is_empty();
        }

        let delta = delta_ms * self.config.time_scale;
        self.queue.retain_mut(|entry| {
            if entry.step(delta) != FrameState::Completed {
                return true;
            }
            entry.complete();
            entry.action.release();
            debug!(name = %entry.name, "动作完成，移出队列");
            false
        });

        !self.queue.is_empty()
    }

    // ========== 播放控制 ==========

    /// 暂停所有动作
    pub fn pause(&mut self) {
        self.set_state(PlayerState::Paused);
    }

    /// 恢复播放
    pub fn resume(&mut self) {
        self.set_state(PlayerState::Running);
    }

    /// 停止：所有动作倒带，目标回到起始值
    pub fn stop(&mut self) {
        self.set_state(PlayerState::Stopped);
    }

    fn set_state(&mut self, state: PlayerState) {
        if self.state == state {
            return;
        }
        debug!(from = ?self.state, to = ?state, actions = self.queue.len(), "播放器状态变化");
        self.state = state;
        for entry in &mut self.queue {
            entry.sync(state);
        }
    }

    /// 当前状态
    pub fn player_state(&self) -> PlayerState {
        self.state
    }

    /// 队列是否为空
    pub fn idle(&self) -> bool {
        self.queue.is_empty()
    }

    // ========== 移除与查询 ==========

    /// 移除所有同名动作（释放目标引用，不调用完成回调）
    ///
    /// # 返回
    /// 是否有动作被移除
    pub fn remove_action(&mut self, name: &str) -> bool {
        let before = self.queue.len();
        self.queue.retain_mut(|entry| {
            if entry.name != name {
                return true;
            }
            entry.action.release();
            false
        });
        let removed = before - self.queue.len();
        if removed > 0 {
            debug!(name = %name, removed = removed, "移除动作");
        }
        removed > 0
    }

    /// 清空队列（不调用完成回调）
    ///
    /// # 返回
    /// 是否有动作被移除
    pub fn remove_actions(&mut self) -> bool {
        if self.queue.is_empty() {
            return false;
        }
        debug!(removed = self.queue.len(), "清空动作队列");
        for mut entry in self.queue.drain(..) {
            entry.action.release();
        }
        true
    }

    /// 是否有该名字的动作在队列中
    pub fn action_running(&self, name: &str) -> bool {
        self.queue.iter().any(|entry| entry.name == name)
    }

    /// 队列中的动作数量
    pub fn num_actions(&self) -> usize {
        self.queue.len()
    }

    /// 查找最后加入的同名动作
    pub fn action(&self, name: &str) -> Option<&dyn ActionObject> {
        self.queue
            .iter()
            .rev()
            .find(|entry| entry.name == name)
            .map(|entry| entry.action.as_ref())
    }

    /// 队列中所有条目的名字（按加入顺序）
    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(|entry| entry.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionPhase, ActionSettings, MoveByAction, WaitForDurationAction};
    use crate::math::{Point2i, Size2i};
    use crate::target::{Animatable, Sprite};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn sprite() -> Rc<Sprite> {
        Rc::new(Sprite::new(Point2i::zero(), Size2i::new(16, 16)))
    }

    fn wait(seconds: f32) -> WaitForDurationAction {
        WaitForDurationAction::new(seconds).unwrap()
    }

    #[test]
    fn test_auto_names() {
        let mut player = ActionPlayer::new();
        assert_eq!(player.run_action(&wait(1.0)).unwrap(), "0");
        assert_eq!(player.run_action(&wait(1.0)).unwrap(), "1");
        // 动作自身的名字优先于自动名字
        assert_eq!(
            player.run_action(&wait(1.0).with_name("pause")).unwrap(),
            "pause"
        );
        // 调用方给的名字优先级最高
        assert_eq!(
            player
                .run_action_named(&wait(1.0).with_name("pause"), "explicit", None)
                .unwrap(),
            "explicit"
        );
        assert_eq!(player.run_action(&wait(1.0)).unwrap(), "2");
        assert_eq!(
            player.action_names().collect::<Vec<_>>(),
            vec!["0", "1", "pause", "explicit", "2"]
        );
    }

    #[test]
    fn test_auto_name_prefix() {
        let config = PlayerConfig::default().with_auto_name_prefix("fx-");
        let mut player = ActionPlayer::with_config(config);
        assert_eq!(player.run_action(&wait(1.0)).unwrap(), "fx-0");
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let mut player = ActionPlayer::new();
        let mut action = wait(1.0);
        action.settings_mut().duration = f32::NAN;
        assert!(player.run_action(&action).is_err());

        let mut action = wait(1.0);
        action.settings_mut().speed = -1.0;
        assert!(player.run_action(&action).is_err());
        assert!(player.idle());
    }

    #[test]
    fn test_update_removes_completed_and_runs_callbacks() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut player = ActionPlayer::new();

        for (name, seconds) in [("short", 0.1), ("long", 0.3)] {
            let order = Rc::clone(&order);
            player
                .run_action_named(
                    &wait(seconds),
                    name,
                    Some(Box::new(move || order.borrow_mut().push(name))),
                )
                .unwrap();
        }

        assert!(player.update(100.0));
        assert_eq!(*order.borrow(), vec!["short"]);
        assert!(!player.action_running("short"));
        assert!(player.action_running("long"));

        assert!(!player.update(200.0));
        assert_eq!(*order.borrow(), vec!["short", "long"]);
        assert!(player.idle());
    }

    #[test]
    fn test_same_tick_completions_in_queue_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut player = ActionPlayer::new();

        for (name, seconds) in [("first", 0.1), ("long", 1.0), ("third", 0.05)] {
            let order = Rc::clone(&order);
            player
                .run_action_named(
                    &wait(seconds),
                    name,
                    Some(Box::new(move || order.borrow_mut().push(name))),
                )
                .unwrap();
        }

        assert!(player.update(100.0));
        assert_eq!(*order.borrow(), vec!["first", "third"]);
        assert_eq!(player.action_names().collect::<Vec<_>>(), vec!["long"]);

        // 剩下的条目照常推进
        assert!(!player.update(900.0));
        assert_eq!(*order.borrow(), vec!["first", "third", "long"]);
    }

    /// 记录 `release` 调用次数的动作
    #[derive(Debug, Clone)]
    struct CountingAction {
        inner: WaitForDurationAction,
        releases: Rc<Cell<u32>>,
    }

    impl ActionObject for CountingAction {
        fn settings(&self) -> &ActionSettings {
            self.inner.settings()
        }

        fn settings_mut(&mut self) -> &mut ActionSettings {
            self.inner.settings_mut()
        }

        fn phase(&self) -> ActionPhase {
            self.inner.phase()
        }

        fn is_paused(&self) -> bool {
            self.inner.is_paused()
        }

        fn next_frame(&mut self, delta_ms: f32) -> FrameState {
            self.inner.next_frame(delta_ms)
        }

        fn prev_frame(&mut self, delta_ms: f32) -> FrameState {
            self.inner.prev_frame(delta_ms)
        }

        fn pause(&mut self) {
            self.inner.pause();
        }

        fn resume(&mut self) {
            self.inner.resume();
        }

        fn rewind(&mut self) {
            self.inner.rewind();
        }

        fn release(&mut self) {
            self.releases.set(self.releases.get() + 1);
        }

        fn clone_action(&self) -> Box<dyn ActionObject> {
            Box::new(self.clone())
        }
    }

    #[test]
    fn test_leaving_queue_releases_action() {
        let releases = Rc::new(Cell::new(0));
        let counting = |seconds: f32| CountingAction {
            inner: wait(seconds),
            releases: Rc::clone(&releases),
        };

        let mut player = ActionPlayer::new();
        player.run_action_named(&counting(0.1), "done", None).unwrap();
        player.run_action_named(&counting(1.0), "removed", None).unwrap();
        player.run_action_named(&counting(1.0), "cleared", None).unwrap();

        player.update(100.0);
        assert_eq!(releases.get(), 1);

        assert!(player.remove_action("removed"));
        assert_eq!(releases.get(), 2);

        assert!(player.remove_actions());
        assert_eq!(releases.get(), 3);
    }

    #[test]
    fn test_run_action_clones_input() {
        let sprite = sprite();
        let mut original = MoveByAction::new(&sprite, Point2i::new(100, 0), 1.0).unwrap();

        let mut player = ActionPlayer::new();
        player.run_action(&original).unwrap();
        player.update(500.0);

        // 原动作没有被推进
        assert_eq!(original.phase(), ActionPhase::NotStarted);
        original.set_speed(10.0);
        assert_eq!(player.action("0").map(|a| a.speed()), Some(1.0));

        player.update(500.0);
        assert_eq!(sprite.position(), Some(Point2i::new(100, 0)));
    }

    #[test]
    fn test_pause_and_resume() {
        let sprite = sprite();
        let action = MoveByAction::new(&sprite, Point2i::new(100, 0), 1.0).unwrap();
        let mut player = ActionPlayer::new();
        player.run_action(&action).unwrap();

        player.update(250.0);
        player.pause();
        assert_eq!(player.player_state(), PlayerState::Paused);
        assert!(player.action("0").is_some_and(|a| a.is_paused()));

        assert!(player.update(500.0));
        assert_eq!(sprite.position(), Some(Point2i::new(25, 0)));

        player.resume();
        player.update(250.0);
        assert_eq!(sprite.position(), Some(Point2i::new(50, 0)));
    }

    #[test]
    fn test_queued_while_paused_starts_paused() {
        let mut player = ActionPlayer::new();
        player.pause();
        player.run_action(&wait(0.1)).unwrap();
        assert!(player.action("0").is_some_and(|a| a.is_paused()));

        player.resume();
        assert!(!player.update(100.0));
    }

    #[test]
    fn test_stop_rewinds_and_resume_restarts() {
        let sprite = sprite();
        let action = MoveByAction::new(&sprite, Point2i::new(100, 0), 1.0).unwrap();
        let mut player = ActionPlayer::new();
        player.run_action(&action).unwrap();

        player.update(500.0);
        assert_eq!(sprite.position(), Some(Point2i::new(50, 0)));

        player.stop();
        assert_eq!(sprite.position(), Some(Point2i::zero()));
        assert!(player.update(1000.0));
        assert_eq!(sprite.position(), Some(Point2i::zero()));
        assert_eq!(player.num_actions(), 1);

        player.resume();
        player.update(500.0);
        assert_eq!(sprite.position(), Some(Point2i::new(50, 0)));
    }

    #[test]
    fn test_duplicate_names() {
        let mut player = ActionPlayer::new();
        player.run_action_named(&wait(1.0), "fx", None).unwrap();
        player.run_action_named(&wait(2.0), "fx", None).unwrap();
        player.run_action_named(&wait(1.0), "other", None).unwrap();

        assert!(player.action_running("fx"));
        // 最后加入的同名条目
        assert_eq!(player.action("fx").map(|a| a.duration()), Some(2000.0));

        assert!(player.remove_action("fx"));
        assert!(!player.action_running("fx"));
        assert!(!player.remove_action("fx"));
        assert_eq!(player.num_actions(), 1);
    }

    #[test]
    fn test_remove_actions() {
        let fired = Rc::new(Cell::new(false));
        let inner = Rc::clone(&fired);
        let mut player = ActionPlayer::new();
        assert!(!player.remove_actions());

        player
            .run_action_with(&wait(0.1), move || inner.set(true))
            .unwrap();
        assert!(player.remove_actions());
        assert!(player.idle());
        assert!(!player.update(100.0));
        // 被移除的条目不调用回调
        assert!(!fired.get());
    }

    #[test]
    fn test_time_scale() {
        let sprite = sprite();
        let action = MoveByAction::new(&sprite, Point2i::new(100, 0), 1.0).unwrap();
        let config = PlayerConfig::default().with_time_scale(0.5);
        let mut player = ActionPlayer::with_config(config);
        player.run_action(&action).unwrap();

        player.update(1000.0);
        assert_eq!(sprite.position(), Some(Point2i::new(50, 0)));
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let config = PlayerConfig::default().with_time_scale(-3.0);
        let player = ActionPlayer::with_config(config);
        assert_eq!(player.config(), &PlayerConfig::default());
    }

    #[test]
    fn test_frame_trace() {
        let sprite = sprite();
        let action = MoveByAction::new(&sprite, Point2i::new(100, 0), 1.0).unwrap();
        let mut player = ActionPlayer::new();
        player.run_action(&action).unwrap();

        let mut trace = Vec::new();
        for frame in 1..=5 {
            let remaining = player.update(250.0);
            let position = sprite.position().unwrap_or_default();
            trace.push(format!(
                "frame {frame}: x={} remaining={remaining} actions={}",
                position.x,
                player.num_actions()
            ));
        }

        insta::assert_snapshot!(trace.join("\n"), @r"
        frame 1: x=25 remaining=true actions=1
        frame 2: x=50 remaining=true actions=1
        frame 3: x=75 remaining=true actions=1
        frame 4: x=100 remaining=false actions=0
        frame 5: x=100 remaining=false actions=0
        ");
    }
}
