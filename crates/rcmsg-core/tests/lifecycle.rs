use std::sync::Arc;

use rcmsg_core::Message;
use rcmsg_core::app::Enricher;
use rcmsg_core::domain::{FetchError, MessageState, Properties};
use rcmsg_core::impls::{LineParser, StaticClient};
use rcmsg_core::kinds::EditDetails;
use rcmsg_core::ports::{Client, Parser};
use serde_json::json;

fn client(name: &str) -> Arc<dyn Client> {
    Arc::new(StaticClient::new(
        name,
        Properties::new().with("diffSize", json!(27)),
    ))
}

#[tokio::test]
async fn failed_fetch_is_cleaned_up_and_retried_with_original_intent() {
    let parser = LineParser::new("irc", "edit");
    let mut msg: Message<EditDetails> = Message::new(&parser, "[[Page]] edited by X", "edit");

    let handle = msg.fetch(client("client1"), ["diffSize"], ["moduleA"]);
    msg.mark_error("timeout", "fetch timed out", json!({}));

    assert_eq!(
        handle.await,
        Err(FetchError::Failed {
            code: "timeout".to_string(),
            message: "fetch timed out".to_string(),
        })
    );
    let serialized = msg.to_json();
    assert_eq!(serialized["error"], "timeout");
    assert_eq!(serialized["errmsg"], "fetch timed out");

    msg.cleanup();
    assert_eq!(msg.retries(), 1);
    assert!(msg.error().is_none());
    assert_eq!(msg.to_json()["error"], false);

    let handle = msg.fetch(client("client2"), ["diffSize"], ["moduleB"]);
    assert_eq!(msg.interested(), Some(&["moduleA".to_string()][..]));
    assert_eq!(msg.client().map(|c| c.name()), Some("client2"));

    msg.apply(Properties::new().with("diffSize", json!(27)))
        .unwrap();
    assert!(msg.resolve());
    assert_eq!(handle.await, Ok(()));
    assert_eq!(msg.state(), MessageState::Succeeded);
    assert_eq!(
        msg.to_json(),
        json!({
            "raw": "[[Page]] edited by X",
            "type": "edit",
            "error": false,
            "retries": 1,
            "diffSize": 27,
        })
    );
}

#[tokio::test]
async fn enricher_drives_the_same_cycle() {
    let parser = LineParser::new("irc", "edit");
    let mut msg: Message<EditDetails> = parser.parse("[[Page]] edited by X").unwrap();

    let failing = StaticClient::new("flaky", Properties::new())
        .failing_first(1, rcmsg_core::domain::FetchFailure::new("timeout", "fetch timed out"));
    let err = Enricher::new(Arc::new(failing))
        .enrich(&mut msg, ["diffSize"], ["moduleA"])
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Failed { .. }));

    // A different driver takes over the retry.
    Enricher::new(client("steady")).retry(&mut msg).await.unwrap();

    assert_eq!(msg.retries(), 1);
    assert_eq!(msg.details().diff_size, Some(27));
    assert_eq!(msg.interested(), Some(&["moduleA".to_string()][..]));
    assert_eq!(msg.client().map(|c| c.name()), Some("steady"));
}

#[test]
fn late_resolution_of_a_cleaned_up_fetch_changes_nothing() {
    let parser = LineParser::new("irc", "edit");
    let mut msg: Message<EditDetails> = Message::new(&parser, "[[Page]] edited by X", "edit");

    let handle = msg.fetch(client("client1"), ["diffSize"], ["moduleA"]);
    let stale = handle.generation();
    msg.mark_error("timeout", "fetch timed out", json!({}));
    msg.cleanup();

    assert!(!msg.resolve_generation(stale));
    assert!(!msg.resolve());
    assert!(msg.error().is_none());
    assert!(msg.client().is_none());
    assert_eq!(msg.state(), MessageState::Created);
}
