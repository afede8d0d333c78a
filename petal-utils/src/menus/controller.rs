//! The menu controller: lifecycle, authorization, locking and cleanup.

use std::{
    panic::AssertUnwindSafe,
    sync::{
        Arc, OnceLock,
        atomic::{AtomicBool, AtomicU8, Ordering},
    },
};

use async_trait::async_trait;
use futures::{FutureExt, StreamExt, stream::FuturesUnordered};
use parking_lot::Mutex;
use tokio::{
    sync::{MutexGuard, Notify, mpsc},
    time::{Instant, sleep_until},
};
use tracing::{debug, error, trace};

use super::MenuConfig;
use super::action::{Action, ActionSpec, lookup};
use super::error::{MenuError, panic_message};
use super::platform::{Interaction, MenuOrigin, MenuPlatform, MessageHandle};
use super::render::MenuPayload;

const INITIALIZING: u8 = 0;
const RUNNING: u8 = 1;
const STOPPED: u8 = 2;
const TIMED_OUT: u8 = 3;

/// How a menu ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Termination {
    Stopped,
    TimedOut,
}

impl Termination {
    pub fn timed_out(self) -> bool {
        matches!(self, Termination::TimedOut)
    }

    fn state(self) -> u8 {
        match self {
            Termination::Stopped => STOPPED,
            Termination::TimedOut => TIMED_OUT,
        }
    }
}

/// What happens to the message once a menu has finalized.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cleanup {
    Delete,
    StripControls,
}

/// The parts of a menu that differ between menu kinds.
#[async_trait]
pub trait MenuBehavior: Send + Sync {
    /// Body of the first message.
    async fn initial_payload(&self) -> anyhow::Result<MenuPayload>;

    /// Buttons to attach. Read once, after `initial_payload`.
    fn actions(&self) -> Vec<ActionSpec>;

    /// Run an accepted action.
    async fn on_action(&self, menu: &MenuCore, action: Action) -> anyhow::Result<()>;

    /// Called exactly once after termination. Errors are discarded.
    async fn finalize(&self, _timed_out: bool) -> anyhow::Result<()> {
        Ok(())
    }

    fn cleanup(&self, _timed_out: bool, config: &MenuConfig) -> Cleanup {
        if config.delete_message_after {
            Cleanup::Delete
        } else {
            Cleanup::StripControls
        }
    }

    /// Receives failures from action bodies. The menu keeps running.
    fn on_error(&self, error: MenuError) {
        error!(kind = error.kind(), %error, "menu action failed");
    }
}

/// State shared between the controller and the action bodies it runs.
pub struct MenuCore {
    platform: Arc<dyn MenuPlatform>,
    config: MenuConfig,
    started: AtomicBool,
    state: AtomicU8,
    author_id: OnceLock<u64>,
    actions: OnceLock<Vec<ActionSpec>>,
    message: Mutex<Option<MessageHandle>>,
    lock: tokio::sync::Mutex<()>,
    terminated: Notify,
}

impl MenuCore {
    fn new(platform: Arc<dyn MenuPlatform>, config: MenuConfig) -> Self {
        Self {
            platform,
            config,
            started: AtomicBool::new(false),
            state: AtomicU8::new(INITIALIZING),
            author_id: OnceLock::new(),
            actions: OnceLock::new(),
            message: Mutex::new(None),
            lock: tokio::sync::Mutex::new(()),
            terminated: Notify::new(),
        }
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.state.load(Ordering::Acquire) == RUNNING
    }

    /// Terminal state, once reached.
    pub fn termination(&self) -> Option<Termination> {
        match self.state.load(Ordering::Acquire) {
            STOPPED => Some(Termination::Stopped),
            TIMED_OUT => Some(Termination::TimedOut),
            _ => None,
        }
    }

    /// Stop the menu. Never waits on the action lock.
    pub fn stop(&self) {
        self.terminate(Termination::Stopped);
    }

    /// Record the terminal transition. The first caller wins.
    fn terminate(&self, termination: Termination) -> bool {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            if current >= STOPPED {
                return false;
            }

            match self.state.compare_exchange(
                current,
                termination.state(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    self.terminated.notify_one();
                    return true;
                }
                Err(actual) => current = actual,
            }
        }
    }

    pub fn author_id(&self) -> Option<u64> {
        self.author_id.get().copied()
    }

    /// The bound message, until it is deleted.
    pub fn message(&self) -> Option<MessageHandle> {
        *self.message.lock()
    }

    fn take_message(&self) -> Option<MessageHandle> {
        self.message.lock().take()
    }

    fn actions(&self) -> &[ActionSpec] {
        self.actions.get().map(Vec::as_slice).unwrap_or_default()
    }

    fn authorize(&self, actor_id: u64) -> Result<(), MenuError> {
        match self.author_id() {
            Some(author_id) if author_id == actor_id => Ok(()),
            author_id => Err(MenuError::AuthorizationMismatch {
                actor_id,
                author_id: author_id.unwrap_or_default(),
            }),
        }
    }

    /// Replace the body of the bound message, keeping its buttons.
    pub async fn edit(&self, payload: &MenuPayload) -> anyhow::Result<()> {
        let Some(handle) = self.message() else {
            return Ok(());
        };

        self.platform
            .edit_message(&handle, Some(payload), self.actions())
            .await
    }
}

/// A menu bound to one message for its whole lifetime.
pub struct Menu<B> {
    core: MenuCore,
    behavior: B,
}

impl<B> Menu<B>
where
    B: MenuBehavior,
{
    pub fn new(behavior: B, platform: Arc<dyn MenuPlatform>, config: MenuConfig) -> Self {
        Self {
            core: MenuCore::new(platform, config),
            behavior,
        }
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    pub fn core(&self) -> &MenuCore {
        &self.core
    }

    pub fn is_running(&self) -> bool {
        self.core.is_running()
    }

    pub fn stop(&self) {
        self.core.stop();
    }

    /// Send the menu and drive it until it stops or times out.
    ///
    /// Resolves after finalize and message cleanup have completed.
    pub async fn start(&self, origin: MenuOrigin) -> Result<Termination, MenuError> {
        if self.core.started.swap(true, Ordering::AcqRel) {
            return Err(MenuError::AlreadyStarted);
        }

        let _ = self.core.author_id.set(origin.author_id);

        let payload = self
            .behavior
            .initial_payload()
            .await
            .map_err(MenuError::Render)?;
        let actions = self.behavior.actions();

        let handle = self
            .core
            .platform
            .send_message(&origin, &payload, &actions)
            .await
            .map_err(MenuError::Platform)?;

        *self.core.message.lock() = Some(handle);
        let has_controls = !actions.is_empty();
        let _ = self.core.actions.set(actions);

        let events = self.core.platform.subscribe(&handle);
        let _ = self.core.state.compare_exchange(
            INITIALIZING,
            RUNNING,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        debug!(message_id = handle.message_id, "menu started");

        if !has_controls {
            self.core.terminate(Termination::Stopped);
        }

        let termination = self.run(&handle, events).await;
        self.core.platform.unsubscribe(&handle);
        debug!(message_id = handle.message_id, ?termination, "menu terminated");

        self.finish(termination, has_controls).await;
        Ok(termination)
    }

    async fn run(
        &self,
        handle: &MessageHandle,
        mut events: mpsc::UnboundedReceiver<Interaction>,
    ) -> Termination {
        let timeout = self.core.config.timeout;
        let mut deadline = Instant::now() + timeout;
        let mut inflight = FuturesUnordered::new();

        while self.core.termination().is_none() {
            tokio::select! {
                biased;
                () = self.core.terminated.notified() => {}
                Some(()) = inflight.next(), if !inflight.is_empty() => {}
                event = events.recv() => match event {
                    Some(interaction) => {
                        if let Some(spec) = self.accept(handle, &interaction) {
                            deadline = Instant::now() + timeout;
                            inflight.push(self.dispatch(spec, interaction));
                        }
                    }
                    None => {
                        debug!(message_id = handle.message_id, "interaction feed closed");
                        self.core.terminate(Termination::Stopped);
                    }
                },
                () = sleep_until(deadline) => {
                    self.core.terminate(Termination::TimedOut);
                }
            }
        }

        // Handlers already running are allowed to finish. Exclusive ones
        // that were still waiting for the lock find the menu stopped.
        while inflight.next().await.is_some() {}

        self.core.termination().unwrap_or(Termination::Stopped)
    }

    /// Filter an incoming interaction down to a registered action.
    fn accept(&self, handle: &MessageHandle, interaction: &Interaction) -> Option<ActionSpec> {
        if interaction.message_id != handle.message_id {
            return None;
        }

        if let Err(error) = self.core.authorize(interaction.actor_id) {
            trace!(%error, "dropping menu interaction");
            return None;
        }

        let spec = lookup(self.core.actions(), &interaction.action_id);
        if spec.is_none() {
            debug!(action_id = %interaction.action_id, "unknown menu action");
        }

        spec.filter(|_| self.core.is_running())
    }

    async fn dispatch(&self, spec: ActionSpec, interaction: Interaction) {
        // Both are polled on the first poll, so exclusive actions queue for
        // the lock in acceptance order however long the acknowledgement takes.
        let (acknowledged, _guard) = tokio::join!(
            self.core.platform.acknowledge(&interaction),
            self.exclusive_guard(spec),
        );

        if let Err(source) = acknowledged {
            self.behavior.on_error(MenuError::HandlerFailure {
                action: spec.action,
                source: source.context("failed to acknowledge interaction"),
            });
        }

        match AssertUnwindSafe(self.execute(spec)).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(source)) => self.behavior.on_error(MenuError::HandlerFailure {
                action: spec.action,
                source,
            }),
            Err(payload) => self.behavior.on_error(MenuError::HandlerPanic {
                action: spec.action,
                message: panic_message(&*payload),
            }),
        }
    }

    async fn exclusive_guard(&self, spec: ActionSpec) -> Option<MutexGuard<'_, ()>> {
        if spec.exclusive {
            Some(self.core.lock.lock().await)
        } else {
            None
        }
    }

    /// Runs with the action lock already held for exclusive actions.
    async fn execute(&self, spec: ActionSpec) -> anyhow::Result<()> {
        if spec.exclusive && !self.core.is_running() {
            trace!(action = %spec.action, "skipping action on stopped menu");
            return Ok(());
        }

        self.behavior.on_action(&self.core, spec.action).await
    }

    async fn finish(&self, termination: Termination, has_controls: bool) {
        let timed_out = termination.timed_out();

        match AssertUnwindSafe(self.behavior.finalize(timed_out))
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => {}
            Ok(Err(source)) => {
                let error = MenuError::FinalizeFailure(source);
                debug!(%error, "ignoring menu finalize failure");
            }
            Err(payload) => {
                debug!(
                    panic = %panic_message(&*payload),
                    "ignoring menu finalize panic"
                );
            }
        }

        // A menu sent without controls never ran, so its message stays as sent.
        if !has_controls {
            return;
        }

        let result = match self.behavior.cleanup(timed_out, &self.core.config) {
            Cleanup::Delete => match self.core.take_message() {
                Some(handle) => self.core.platform.delete_message(&handle).await,
                None => Ok(()),
            },
            Cleanup::StripControls => match self.core.message() {
                Some(handle) => self.core.platform.edit_message(&handle, None, &[]).await,
                None => Ok(()),
            },
        };

        // The viewer may already have removed the message.
        if let Err(source) = result {
            debug!(?source, "ignoring menu cleanup failure");
        }
    }
}
