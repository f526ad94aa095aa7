//! Tests for line splitting, payload extraction and event decoding.

use super::*;
use std::convert::Infallible;

const BODY: &str = concat!(
    "data: {\"type\":\"RUN_STARTED\",\"threadId\":\"t1\",\"runId\":\"r1\"}\n",
    "\n",
    "data: {\"type\":\"TEXT_MESSAGE_START\",\"messageId\":\"m1\",\"role\":\"assistant\"}\n",
    "data: {\"type\":\"TEXT_MESSAGE_CONTENT\",\"messageId\":\"m1\",\"delta\":\"Grüße \"}\n",
    "data: {\"type\":\"TEXT_MESSAGE_CONTENT\",\"messageId\":\"m1\",\"delta\":\"aus 東京 🌸\"}\n",
    ": keep-alive comment\n",
    "event: ignored\n",
    "data: [DONE]\n",
);

fn chunk_stream(parts: Vec<Vec<u8>>) -> impl Stream<Item = Result<Vec<u8>, Infallible>> {
    futures::stream::iter(parts.into_iter().map(Ok))
}

async fn collect_payloads(parts: Vec<Vec<u8>>) -> Vec<String> {
    payloads(chunk_stream(parts))
        .map(|item| item.unwrap())
        .collect()
        .await
}

async fn collect_events(body: &str, policy: DecodeErrorPolicy) -> Vec<ChatResult<StreamEvent>> {
    events(chunk_stream(vec![body.as_bytes().to_vec()]), policy)
        .collect()
        .await
}

// ===== classify_line =====

#[test]
fn test_classify_data_line() {
    assert_eq!(classify_line("data: {\"a\":1}"), Line::Data("{\"a\":1}"));
}

#[test]
fn test_classify_done_sentinel() {
    assert_eq!(classify_line("data: [DONE]"), Line::Done);
}

#[test]
fn test_classify_requires_space_after_colon() {
    assert_eq!(classify_line("data:{\"a\":1}"), Line::Other);
}

#[test]
fn test_classify_other_lines() {
    for line in ["", ": comment", "event: message", "id: 7", " data: x"] {
        assert_eq!(classify_line(line), Line::Other, "line {:?}", line);
    }
}

#[test]
fn test_classify_done_with_trailing_text_is_payload() {
    assert_eq!(classify_line("data: [DONE] "), Line::Data("[DONE] "));
}

// ===== LineDecoder =====

#[test]
fn test_line_decoder_carries_partial_line() {
    let mut decoder = LineDecoder::new();

    assert!(decoder.push(b"data: hel").is_empty());
    assert_eq!(decoder.pending(), 9);

    let lines = decoder.push(b"lo\ndata: wor");
    assert_eq!(lines, vec!["data: hello".to_string()]);

    let lines = decoder.push(b"ld\n");
    assert_eq!(lines, vec!["data: world".to_string()]);
    assert_eq!(decoder.pending(), 0);
    assert!(decoder.finish().is_none());
}

#[test]
fn test_line_decoder_strips_carriage_return() {
    let mut decoder = LineDecoder::new();
    let lines = decoder.push(b"data: a\r\ndata: b\r\n");
    assert_eq!(lines, vec!["data: a".to_string(), "data: b".to_string()]);
}

#[test]
fn test_line_decoder_reassembles_split_multibyte_character() {
    let text = "data: 🌍\n";
    let bytes = text.as_bytes();
    // The globe emoji is four bytes; split it down the middle
    let split = "data: ".len() + 2;

    let mut decoder = LineDecoder::new();
    assert!(decoder.push(&bytes[..split]).is_empty());
    let lines = decoder.push(&bytes[split..]);

    assert_eq!(lines, vec!["data: 🌍".to_string()]);
}

#[test]
fn test_line_decoder_finish_flushes_remainder() {
    let mut decoder = LineDecoder::new();
    decoder.push(b"data: tail");
    assert_eq!(decoder.finish(), Some("data: tail".to_string()));
    assert!(decoder.finish().is_none());
}

#[test]
fn test_line_decoder_invalid_utf8_is_replaced() {
    let mut decoder = LineDecoder::new();
    let lines = decoder.push(b"data: \xff\n");
    assert_eq!(lines, vec!["data: \u{fffd}".to_string()]);
}

#[test]
fn test_line_decoder_keeps_empty_lines() {
    let mut decoder = LineDecoder::new();
    let lines = decoder.push(b"\n\n");
    assert_eq!(lines, vec![String::new(), String::new()]);
}

// ===== payloads =====

#[tokio::test]
async fn test_payloads_skip_sentinel_and_other_lines() {
    let payloads = collect_payloads(vec![BODY.as_bytes().to_vec()]).await;

    assert_eq!(payloads.len(), 4);
    assert!(payloads[0].contains("RUN_STARTED"));
    assert!(payloads[3].contains("東京"));
    assert!(payloads.iter().all(|p| p != DONE_SENTINEL));
}

#[tokio::test]
async fn test_payloads_independent_of_chunk_boundaries() {
    let bytes = BODY.as_bytes();
    let expected = collect_payloads(vec![bytes.to_vec()]).await;

    for split in 0..=bytes.len() {
        let parts = vec![bytes[..split].to_vec(), bytes[split..].to_vec()];
        let actual = collect_payloads(parts).await;
        assert_eq!(actual, expected, "split at byte {}", split);
    }
}

#[tokio::test]
async fn test_payloads_survive_single_byte_chunks() {
    let bytes = BODY.as_bytes();
    let expected = collect_payloads(vec![bytes.to_vec()]).await;

    let parts: Vec<Vec<u8>> = bytes.iter().map(|b| vec![*b]).collect();
    assert_eq!(collect_payloads(parts).await, expected);
}

#[tokio::test]
async fn test_payloads_continue_after_done() {
    let body = "data: [DONE]\ndata: {\"type\":\"RUN_FINISHED\"}\n";
    let payloads = collect_payloads(vec![body.as_bytes().to_vec()]).await;
    assert_eq!(payloads, vec!["{\"type\":\"RUN_FINISHED\"}".to_string()]);
}

#[tokio::test]
async fn test_payloads_flush_unterminated_last_line() {
    let body = "data: {\"type\":\"RUN_FINISHED\"}";
    let payloads = collect_payloads(vec![body.as_bytes().to_vec()]).await;
    assert_eq!(payloads.len(), 1);
}

#[test]
fn test_payloads_empty_body() {
    assert!(tokio_test::block_on(collect_payloads(vec![])).is_empty());
    assert!(tokio_test::block_on(collect_payloads(vec![Vec::new()])).is_empty());
}

#[tokio::test]
async fn test_payloads_transport_error_ends_stream() {
    let parts: Vec<Result<&[u8], &str>> = vec![
        Ok(&b"data: {\"type\":\"RUN_STARTED\"}\n"[..]),
        Err("connection reset"),
        Ok(&b"data: {\"type\":\"RUN_FINISHED\"}\n"[..]),
    ];

    let items: Vec<ChatResult<String>> = payloads(futures::stream::iter(parts)).collect().await;

    assert_eq!(items.len(), 2);
    assert!(items[0].is_ok());
    assert!(matches!(&items[1], Err(ChatError::Stream(msg)) if msg == "connection reset"));
}

// ===== events =====

#[tokio::test]
async fn test_events_decode_in_arrival_order() {
    let events = collect_events(BODY, DecodeErrorPolicy::Skip).await;
    let names: Vec<&str> = events
        .iter()
        .map(|e| e.as_ref().unwrap().type_name())
        .collect();

    assert_eq!(
        names,
        vec![
            "RUN_STARTED",
            "TEXT_MESSAGE_START",
            "TEXT_MESSAGE_CONTENT",
            "TEXT_MESSAGE_CONTENT"
        ]
    );
}

#[tokio::test]
async fn test_events_skip_policy_drops_bad_json() {
    let body = concat!(
        "data: {\"type\":\"TEXT_MESSAGE_CONTENT\",\"delta\":\"a\"}\n",
        "data: {not json\n",
        "data: {\"delta\":\"no type\"}\n",
        "data: {\"type\":\"TEXT_MESSAGE_CONTENT\",\"delta\":\"b\"}\n",
    );

    let events = collect_events(body, DecodeErrorPolicy::Skip).await;
    let deltas: Vec<String> = events
        .into_iter()
        .map(|e| match e.unwrap() {
            StreamEvent::TextMessageContent { delta, .. } => delta,
            other => panic!("unexpected event {:?}", other),
        })
        .collect();

    assert_eq!(deltas, vec!["a".to_string(), "b".to_string()]);
}

#[tokio::test]
async fn test_events_fail_policy_stops_at_bad_json() {
    let body = concat!(
        "data: {\"type\":\"RUN_STARTED\"}\n",
        "data: {not json\n",
        "data: {\"type\":\"RUN_FINISHED\"}\n",
    );

    let events = collect_events(body, DecodeErrorPolicy::Fail).await;

    assert_eq!(events.len(), 2);
    assert!(events[0].is_ok());
    assert!(matches!(&events[1], Err(ChatError::Decode { payload, .. }) if payload == "{not json"));
}

#[tokio::test]
async fn test_events_unknown_types_pass_through() {
    let body = "data: {\"type\":\"STEP_STARTED\",\"stepName\":\"plan\"}\n";
    let events = collect_events(body, DecodeErrorPolicy::Fail).await;
    assert!(matches!(events.as_slice(), [Ok(StreamEvent::Unknown)]));
}

#[test]
fn test_default_policy_is_skip() {
    assert_eq!(DecodeErrorPolicy::default(), DecodeErrorPolicy::Skip);
}
