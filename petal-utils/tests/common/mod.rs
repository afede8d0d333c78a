#![allow(dead_code)]

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};

use anyhow::bail;
use async_trait::async_trait;
use parking_lot::Mutex;
use petal_utils::menus::{
    Action, ActionSpec, Interaction, InteractionRouter, MenuBehavior, MenuCore, MenuError,
    MenuOrigin, MenuPayload, MenuPlatform, MessageHandle, action::PAGINATOR_ACTIONS,
};
use tokio::{sync::mpsc, time::Instant};

pub const CHANNEL: u64 = 1;
pub const AUTHOR: u64 = 10;
pub const STRANGER: u64 = 20;
pub const FIRST_MESSAGE_ID: u64 = 1000;

pub fn origin() -> MenuOrigin {
    MenuOrigin {
        channel_id: CHANNEL,
        author_id: AUTHOR,
        reply_to: None,
    }
}

/// Let spawned menu tasks run. Paused clocks auto-advance.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Send {
        message_id: u64,
        payload: MenuPayload,
        actions: Vec<Action>,
    },
    Edit {
        message_id: u64,
        payload: Option<MenuPayload>,
        actions: Vec<Action>,
    },
    Delete {
        message_id: u64,
    },
    Ack {
        action_id: String,
        actor_id: u64,
    },
}

/// In-memory platform recording every request it serves.
pub struct MockPlatform {
    router: InteractionRouter,
    calls: Mutex<Vec<Call>>,
    next_message_id: AtomicU64,
    fail_sends: AtomicBool,
    fail_deletes: AtomicBool,
    slow_acks: Mutex<Option<(String, Duration)>>,
}

impl MockPlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            router: InteractionRouter::new(),
            calls: Mutex::new(Vec::new()),
            next_message_id: AtomicU64::new(FIRST_MESSAGE_ID),
            fail_sends: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            slow_acks: Mutex::new(None),
        })
    }

    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    /// Delay acknowledgements of `action_id` by `delay`.
    pub fn slow_acks(&self, action_id: &str, delay: Duration) {
        *self.slow_acks.lock() = Some((action_id.to_owned(), delay));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn acks(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Ack { action_id, .. } => Some(action_id),
                _ => None,
            })
            .collect()
    }

    /// Bodies of every edit that replaced the message content.
    pub fn edited_contents(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Edit {
                    payload: Some(payload),
                    ..
                } => payload.content,
                _ => None,
            })
            .collect()
    }

    pub fn live_menus(&self) -> usize {
        self.router.live_menus()
    }

    pub async fn wait_until_live(&self) {
        while self.router.live_menus() == 0 {
            tokio::task::yield_now().await;
        }
    }

    /// Press a button on the most recently sent message.
    pub fn press(&self, action_id: &str, actor_id: u64) -> bool {
        let message_id = self.next_message_id.load(Ordering::SeqCst) - 1;
        self.router
            .deliver(Interaction::new(action_id, actor_id, message_id))
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

fn action_list(actions: &[ActionSpec]) -> Vec<Action> {
    actions.iter().map(|spec| spec.action).collect()
}

#[async_trait]
impl MenuPlatform for MockPlatform {
    async fn send_message(
        &self,
        origin: &MenuOrigin,
        payload: &MenuPayload,
        actions: &[ActionSpec],
    ) -> anyhow::Result<MessageHandle> {
        if self.fail_sends.load(Ordering::SeqCst) {
            bail!("missing access");
        }

        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        self.record(Call::Send {
            message_id,
            payload: payload.clone(),
            actions: action_list(actions),
        });

        Ok(MessageHandle {
            channel_id: origin.channel_id,
            message_id,
        })
    }

    async fn edit_message(
        &self,
        handle: &MessageHandle,
        payload: Option<&MenuPayload>,
        actions: &[ActionSpec],
    ) -> anyhow::Result<()> {
        self.record(Call::Edit {
            message_id: handle.message_id,
            payload: payload.cloned(),
            actions: action_list(actions),
        });
        Ok(())
    }

    async fn delete_message(&self, handle: &MessageHandle) -> anyhow::Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            bail!("unknown message");
        }

        self.record(Call::Delete {
            message_id: handle.message_id,
        });
        Ok(())
    }

    async fn acknowledge(&self, interaction: &Interaction) -> anyhow::Result<()> {
        let delay = match &*self.slow_acks.lock() {
            Some((action_id, delay)) if *action_id == interaction.action_id => Some(*delay),
            _ => None,
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.record(Call::Ack {
            action_id: interaction.action_id.clone(),
            actor_id: interaction.actor_id,
        });
        Ok(())
    }

    fn subscribe(&self, handle: &MessageHandle) -> mpsc::UnboundedReceiver<Interaction> {
        self.router.subscribe(handle.message_id)
    }

    fn unsubscribe(&self, handle: &MessageHandle) {
        self.router.unsubscribe(handle.message_id);
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Run {
    pub action: Action,
    pub started: Instant,
    pub finished: Instant,
}

/// Behavior that records what the controller asks of it.
///
/// `Stop` stops the menu, `First` fails, `Last` panics and the remaining
/// actions sleep for `work`.
pub struct Recorder {
    work: Duration,
    fail_finalize: bool,
    runs: Mutex<Vec<Run>>,
    finalized: Mutex<Vec<bool>>,
    errors: Mutex<Vec<&'static str>>,
}

impl Recorder {
    pub fn new(work: Duration) -> Self {
        Self {
            work,
            fail_finalize: false,
            runs: Mutex::new(Vec::new()),
            finalized: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_finalize(mut self) -> Self {
        self.fail_finalize = true;
        self
    }

    pub fn runs(&self) -> Vec<Run> {
        self.runs.lock().clone()
    }

    pub fn run_of(&self, action: Action) -> Option<Run> {
        self.runs().into_iter().find(|run| run.action == action)
    }

    pub fn finalized(&self) -> Vec<bool> {
        self.finalized.lock().clone()
    }

    pub fn errors(&self) -> Vec<&'static str> {
        self.errors.lock().clone()
    }
}

#[async_trait]
impl MenuBehavior for Recorder {
    async fn initial_payload(&self) -> anyhow::Result<MenuPayload> {
        Ok(MenuPayload::content("recorder"))
    }

    fn actions(&self) -> Vec<ActionSpec> {
        PAGINATOR_ACTIONS.to_vec()
    }

    async fn on_action(&self, menu: &MenuCore, action: Action) -> anyhow::Result<()> {
        let started = Instant::now();

        match action {
            Action::Stop => menu.stop(),
            Action::First => bail!("first page is unavailable"),
            Action::Last => panic!("last page exploded"),
            _ => tokio::time::sleep(self.work).await,
        }

        self.runs.lock().push(Run {
            action,
            started,
            finished: Instant::now(),
        });
        Ok(())
    }

    async fn finalize(&self, timed_out: bool) -> anyhow::Result<()> {
        self.finalized.lock().push(timed_out);
        if self.fail_finalize {
            bail!("finalize failed");
        }
        Ok(())
    }

    fn on_error(&self, error: MenuError) {
        self.errors.lock().push(error.kind());
    }
}
