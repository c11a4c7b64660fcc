//! Merge and deduplication properties checked through the public API

mod support;

use std::sync::Arc;
use support::{tool, ScriptedGateway};
use toolharvest::llm::{FailureReason, ProviderGateway};
use toolharvest::{dedupe, parse_tools, AiMerger, MergePath, ToolRecord};

fn catalog() -> Vec<ToolRecord> {
    vec![
        tool("ChatGPT", "https://chat.openai.com", "Conversational assistant", &["chat"]),
        tool("chatgpt", "https://chat.openai.com", "Conversational assistant by OpenAI with plugins", &["openai"]),
        tool("Midjourney", "", "Image generation", &["image"]),
        tool("MIDJOURNEY ", "", "", &["art"]),
        tool("", "", "orphan with no identity", &["lost"]),
        tool("Runway", "https://runwayml.com", "Video editing", &["video"]),
    ]
}

#[test]
fn test_dedupe_is_idempotent() {
    let once = dedupe(&catalog());
    assert_eq!(dedupe(&once), once);
}

#[test]
fn test_dedupe_drops_records_without_identity() {
    let result = dedupe(&catalog());
    assert_eq!(result.len(), 3);
    assert!(result.iter().all(|r| !r.identity_key().is_empty()));
}

#[test]
fn test_dedupe_keeps_longer_description_and_unions_tags() {
    let records = vec![
        tool("A", "http://a", "abcde", &["x"]),
        tool("A", "http://a", &"z".repeat(50), &["y"]),
    ];

    let result = dedupe(&records);

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].description_len(), 50);
    assert_eq!(
        result[0].tags.iter().cloned().collect::<Vec<_>>(),
        vec!["x", "y"]
    );
}

#[test]
fn test_parse_fenced_reply() {
    let tools = parse_tools("```json\n[{\"name\": \" A \", \"url\": \"http://x\"}, {\"name\": \"B\"}]\n```");
    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0].name, "A");
    assert_eq!(tools[0].url, "http://x");
    assert_eq!(tools[1].name, "B");
}

#[test]
fn test_parse_not_json() {
    assert!(parse_tools("not json").is_empty());
}

#[tokio::test]
async fn test_merge_into_empty_does_not_call_gateway() {
    let gateway = Arc::new(ScriptedGateway::new(&["deepseek"]));
    let merger = AiMerger::new(gateway.clone(), 15_000);
    let incoming = vec![tool("A", "http://a", "", &[])];

    let outcome = merger.merge(&[], &incoming, None).await;

    assert_eq!(outcome.records, incoming);
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_merge_nothing_new_returns_existing() {
    let gateway = Arc::new(ScriptedGateway::new(&["deepseek"]));
    let merger = AiMerger::new(gateway.clone(), 15_000);
    let existing = catalog();

    let outcome = merger.merge(&existing, &[], None).await;

    assert_eq!(outcome.records, existing);
    assert_eq!(outcome.path, MergePath::Unchanged);
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_sole_backend_failure_equals_dedupe() {
    let gateway = Arc::new(
        ScriptedGateway::new(&["deepseek"]).fail(
            "deepseek",
            FailureReason::Transport("connection reset".to_string()),
        ),
    );
    let merger = AiMerger::new(gateway.clone(), 15_000);
    let existing = catalog();
    let incoming = vec![
        tool("Runway", "https://runwayml.com", "Video editing and generation suite", &["ai"]),
        tool("Suno", "https://suno.com", "Music generation", &["music"]),
    ];

    let outcome = merger.merge(&existing, &incoming, None).await;

    let combined: Vec<ToolRecord> = existing.iter().chain(&incoming).cloned().collect();
    assert_eq!(outcome.records, dedupe(&combined));
    assert_eq!(gateway.calls().len(), 1);
}

#[tokio::test]
async fn test_merge_without_backend_end_to_end() {
    let merger = AiMerger::new(Arc::new(ProviderGateway::new()), 15_000);
    let existing = vec![tool("A", "http://a", "short", &["x"])];
    let incoming = vec![tool("A", "http://a", "much longer description", &["y"])];

    let outcome = merger.merge(&existing, &incoming, None).await;

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].description, "much longer description");
    assert_eq!(
        outcome.records[0].tags.iter().cloned().collect::<Vec<_>>(),
        vec!["x", "y"]
    );
}

#[tokio::test]
async fn test_merge_prompt_is_truncated_per_side() {
    let gateway = Arc::new(ScriptedGateway::new(&["deepseek"]).reply("deepseek", "[]"));
    let merger = AiMerger::new(gateway.clone(), 300);
    let existing: Vec<ToolRecord> = (0..20)
        .map(|i| tool(&format!("tool-{}", i), &format!("https://t{}.example", i), "desc", &[]))
        .collect();
    let incoming: Vec<ToolRecord> = (0..20)
        .map(|i| tool(&format!("new-{}", i), &format!("https://n{}.example", i), "desc", &[]))
        .collect();

    let outcome = merger.merge(&existing, &incoming, None).await;

    let (_, prompt) = &gateway.calls()[0];
    assert_eq!(prompt.matches("...[content truncated]").count(), 2);
    // "[]" parses to nothing, so the merge degrades to local dedupe
    assert_eq!(outcome.records.len(), 40);
}
