mod common;

use std::{sync::Arc, time::Duration};

use common::{AUTHOR, Call, MockPlatform, STRANGER, origin};
use petal_utils::menus::{
    Action, ConfirmPrompt, Confirmation, MenuConfig, MenuError, MenuPayload,
};
use tokio::{task::JoinHandle, time::Instant};

fn ask(
    platform: &Arc<MockPlatform>,
    config: MenuConfig,
) -> JoinHandle<Result<Option<bool>, MenuError>> {
    let prompt = ConfirmPrompt::new(MenuPayload::content("Change the prefix to `!`?"));
    let dialog = Confirmation::new(prompt, platform.clone(), config);
    tokio::spawn(async move { dialog.ask(origin()).await })
}

fn deleted(platform: &MockPlatform) -> bool {
    platform
        .calls()
        .iter()
        .any(|call| matches!(call, Call::Delete { .. }))
}

#[tokio::test(start_paused = true)]
async fn confirm_resolves_true_and_deletes_prompt() {
    let platform = MockPlatform::new();
    let task = ask(&platform, MenuConfig::confirmation());
    platform.wait_until_live().await;

    platform.press("confirm", AUTHOR);
    assert_eq!(task.await.unwrap().unwrap(), Some(true));

    let Call::Send { actions, .. } = &platform.calls()[0] else {
        panic!("prompt must send first");
    };
    assert_eq!(actions, &[Action::Confirm, Action::Cancel]);
    assert!(deleted(&platform));
}

#[tokio::test(start_paused = true)]
async fn first_accepted_answer_wins() {
    let platform = MockPlatform::new();
    let task = ask(&platform, MenuConfig::confirmation());
    platform.wait_until_live().await;

    platform.press("confirm", AUTHOR);
    platform.press("cancel", AUTHOR);
    assert_eq!(task.await.unwrap().unwrap(), Some(true));
}

#[tokio::test(start_paused = true)]
async fn slow_acknowledgement_keeps_answer_order() {
    let platform = MockPlatform::new();
    platform.slow_acks("confirm", Duration::from_millis(200));
    let task = ask(&platform, MenuConfig::confirmation());
    platform.wait_until_live().await;

    platform.press("confirm", AUTHOR);
    platform.press("cancel", AUTHOR);
    assert_eq!(task.await.unwrap().unwrap(), Some(true));
    assert_eq!(platform.acks(), vec!["cancel", "confirm"]);
}

#[tokio::test(start_paused = true)]
async fn strangers_cannot_answer() {
    let platform = MockPlatform::new();
    let task = ask(&platform, MenuConfig::confirmation());
    platform.wait_until_live().await;

    platform.press("confirm", STRANGER);
    platform.press("cancel", AUTHOR);
    assert_eq!(task.await.unwrap().unwrap(), Some(false));
}

#[tokio::test(start_paused = true)]
async fn cancel_can_keep_the_prompt() {
    let platform = MockPlatform::new();
    let task = ask(
        &platform,
        MenuConfig::confirmation().delete_message_after(false),
    );
    platform.wait_until_live().await;

    platform.press("cancel", AUTHOR);
    assert_eq!(task.await.unwrap().unwrap(), Some(false));

    assert!(!deleted(&platform));
    assert!(matches!(
        platform.calls().last(),
        Some(Call::Edit { payload: None, actions, .. }) if actions.is_empty()
    ));
}

#[tokio::test(start_paused = true)]
async fn unanswered_prompt_times_out_and_is_deleted() {
    let platform = MockPlatform::new();
    let started = Instant::now();
    let task = ask(
        &platform,
        MenuConfig::confirmation().delete_message_after(false),
    );

    assert_eq!(task.await.unwrap().unwrap(), None);
    assert!(started.elapsed() >= Duration::from_secs(40));
    assert!(deleted(&platform));
}
