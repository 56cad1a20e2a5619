//! End-to-end worker loop scenarios with mocked collaborators: envelope
//! settlement, gating, and the dispatch/tactical handler paths.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use dispatch_worker::domain::{AllowListGate, DispatchService, TacticalService, ThreadRegistry};
use dispatch_worker::worker::WorkerLoop;
use tokio_util::sync::CancellationToken;
use trailwatch_asr::MockTranscriber;
use trailwatch_chat::{ChatPoster, MockChatPoster};
use trailwatch_domain::{DispatchMessage, DispatchMessages, TranscriptionResponse};
use trailwatch_kv::{KvStore, MockKvStore};
use trailwatch_ml::MockDispatchParser;
use trailwatch_nats::{MockEventQueue, MockQueueMessage};
use trailwatch_s3::MockObjectStore;

const ACTIVATION: Duration = Duration::from_secs(1800);
const DISPATCH_KEY: &str = "1399-1750542445_854412500.1-call_1871.wav";
const TACTICAL_KEY: &str = "1385-1750542500_854412500.2-call_1880.wav";

fn envelope_json(event_name: &str, key: &str) -> String {
    format!(
        r#"{{"Records":[{{"eventName":"{event_name}","s3":{{"object":{{"key":"{key}"}}}}}}]}}"#
    )
}

fn acked_message(payload: &str) -> MockQueueMessage {
    let mut message = MockQueueMessage::new();
    message
        .expect_payload()
        .return_const(Bytes::copy_from_slice(payload.as_bytes()));
    message.expect_ack().times(1).returning(|| Ok(()));
    message.expect_nack().never();
    message
}

fn build_worker(
    store: MockObjectStore,
    transcriber: MockTranscriber,
    parser: MockDispatchParser,
    chat: MockChatPoster,
    kv: MockKvStore,
) -> WorkerLoop {
    let kv: Arc<dyn KvStore> = Arc::new(kv);
    let chat: Arc<dyn ChatPoster> = Arc::new(chat);

    let gate = Arc::new(AllowListGate::new(Arc::clone(&kv), "1399".to_string()));
    let threads = Arc::new(ThreadRegistry::new(kv));
    let dispatch = Arc::new(DispatchService::new(
        Arc::new(parser),
        Arc::clone(&chat),
        Arc::clone(&gate),
        Arc::clone(&threads),
        "1399".to_string(),
        ACTIVATION,
    ));
    let tactical = Arc::new(TacticalService::new(chat, threads));

    WorkerLoop::new(
        Arc::new(MockEventQueue::new()),
        Arc::new(store),
        Arc::new(transcriber),
        gate,
        dispatch,
        tactical,
        "1399".to_string(),
        Duration::from_secs(30),
    )
}

fn rescue_parser(times: usize) -> MockDispatchParser {
    let mut parser = MockDispatchParser::new();
    parser
        .expect_parse_dispatches()
        .times(times)
        .returning(|transcription| {
            Ok(DispatchMessages {
                messages: vec![DispatchMessage {
                    call_type: "Rescue - Trail".to_string(),
                    tac_channel: "TAC3".to_string(),
                    cleaned_transcription: "Trail rescue on Tiger Mountain, respond TAC3"
                        .to_string(),
                    transcription: transcription.to_string(),
                }],
                transcription: transcription.to_string(),
            })
        });
    parser
}

fn transcriber_returning(text: &'static str, times: usize) -> MockTranscriber {
    let mut transcriber = MockTranscriber::new();
    transcriber
        .expect_transcribe()
        .times(times)
        .returning(move |file_name, _| {
            Ok(TranscriptionResponse {
                filename: file_name.to_string(),
                transcription: text.to_string(),
            })
        });
    transcriber
}

fn store_returning(times: usize) -> MockObjectStore {
    let mut store = MockObjectStore::new();
    store
        .expect_get()
        .times(times)
        .returning(|_| Ok(vec![0u8; 16]));
    store
}

#[tokio::test]
async fn dispatch_call_activates_tactical_channel_and_posts_header() {
    let mut kv = MockKvStore::new();
    // The dispatch talkgroup is admitted without a membership query, so the
    // only set mutation is the activation and the only write the thread root.
    kv.expect_sadd_ex()
        .withf(|key, ttl, members| {
            key == "allowed_talkgroups" && *ttl == ACTIVATION && members == ["1385"]
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    kv.expect_set_ex()
        .withf(|key, ttl, value| key == "tg:1385" && *ttl == ACTIVATION && value == "111.222")
        .times(1)
        .returning(|_, _, _| Ok(()));

    let mut chat = MockChatPoster::new();
    chat.expect_post_message()
        .withf(|message| {
            message.thread_root.is_none()
                && serde_json::to_string(&message.blocks).unwrap().contains("TAC3")
        })
        .times(1)
        .returning(|_| Ok("111.222".to_string()));

    let worker = build_worker(
        store_returning(1),
        transcriber_returning("Rescue Trail TAC 3 Tiger Mountain", 1),
        rescue_parser(1),
        chat,
        kv,
    );

    let message = acked_message(&envelope_json("ObjectCreated:Put", DISPATCH_KEY));
    worker
        .handle_message(&CancellationToken::new(), &message)
        .await;
}

#[tokio::test]
async fn tactical_call_inside_window_replies_into_thread() {
    let mut kv = MockKvStore::new();
    kv.expect_smismember()
        .withf(|key, members| key == "allowed_talkgroups" && members == ["1385"])
        .times(1)
        .returning(|_, _| Ok(vec![true]));
    kv.expect_get()
        .withf(|key| key == "tg:1385")
        .times(1)
        .returning(|_| Ok(Some("111.222".to_string())));

    let mut chat = MockChatPoster::new();
    chat.expect_post_message()
        .withf(|message| {
            message.thread_root.as_deref() == Some("111.222")
                && serde_json::to_string(&message.blocks)
                    .unwrap()
                    .contains("Medic 72 on scene")
        })
        .times(1)
        .returning(|_| Ok("111.555".to_string()));

    let worker = build_worker(
        store_returning(1),
        transcriber_returning("Medic 72 on scene", 1),
        MockDispatchParser::new(),
        chat,
        kv,
    );

    let message = acked_message(&envelope_json("ObjectCreated:Post", TACTICAL_KEY));
    worker
        .handle_message(&CancellationToken::new(), &message)
        .await;
}

#[tokio::test]
async fn tactical_call_outside_window_is_dropped_before_fetch() {
    let mut kv = MockKvStore::new();
    kv.expect_smismember()
        .times(1)
        .returning(|_, _| Ok(vec![false]));
    kv.expect_get().never();

    // Not allowed: no fetch, no ASR call, no chat post.
    let mut store = MockObjectStore::new();
    store.expect_get().never();
    let mut transcriber = MockTranscriber::new();
    transcriber.expect_transcribe().never();

    let worker = build_worker(
        store,
        transcriber,
        MockDispatchParser::new(),
        MockChatPoster::new(),
        kv,
    );

    let message = acked_message(&envelope_json("ObjectCreated:Put", TACTICAL_KEY));
    worker
        .handle_message(&CancellationToken::new(), &message)
        .await;
}

#[tokio::test]
async fn non_rescue_dispatch_leaves_no_trace() {
    let mut parser = MockDispatchParser::new();
    parser.expect_parse_dispatches().times(1).returning(|t| {
        Ok(DispatchMessages {
            messages: vec![DispatchMessage {
                call_type: "Aid Emergency".to_string(),
                tac_channel: "TAC5".to_string(),
                cleaned_transcription: "Aid emergency at 120 Main St".to_string(),
                transcription: t.to_string(),
            }],
            transcription: t.to_string(),
        })
    });

    let mut kv = MockKvStore::new();
    kv.expect_sadd_ex().never();
    kv.expect_set_ex().never();

    let mut chat = MockChatPoster::new();
    chat.expect_post_message().never();

    let worker = build_worker(
        store_returning(1),
        transcriber_returning("Aid Emergency at 120 Main St", 1),
        parser,
        chat,
        kv,
    );

    let message = acked_message(&envelope_json("ObjectCreated:Put", DISPATCH_KEY));
    worker
        .handle_message(&CancellationToken::new(), &message)
        .await;
}

#[tokio::test]
async fn duplicate_dispatch_records_activate_once_per_envelope() {
    // Two records carrying the same transmission: the fingerprint set spans
    // the envelope, so only the first activates and posts.
    let payload = format!(
        r#"{{"Records":[
            {{"eventName":"ObjectCreated:Put","s3":{{"object":{{"key":"{DISPATCH_KEY}"}}}}}},
            {{"eventName":"ObjectCreated:Put","s3":{{"object":{{"key":"{DISPATCH_KEY}"}}}}}}
        ]}}"#
    );

    let mut kv = MockKvStore::new();
    kv.expect_sadd_ex().times(1).returning(|_, _, _| Ok(()));
    kv.expect_set_ex().times(1).returning(|_, _, _| Ok(()));

    let mut chat = MockChatPoster::new();
    chat.expect_post_message()
        .times(1)
        .returning(|_| Ok("111.222".to_string()));

    let worker = build_worker(
        store_returning(2),
        transcriber_returning("Rescue Trail TAC 3 Tiger Mountain", 2),
        rescue_parser(2),
        chat,
        kv,
    );

    let message = acked_message(&payload);
    worker
        .handle_message(&CancellationToken::new(), &message)
        .await;
}

#[tokio::test]
async fn undecodable_envelope_is_nacked_not_acked() {
    let mut message = MockQueueMessage::new();
    message
        .expect_payload()
        .return_const(Bytes::from_static(b"not an event"));
    message.expect_ack().never();
    message.expect_nack().times(1).returning(|| Ok(()));

    let worker = build_worker(
        MockObjectStore::new(),
        MockTranscriber::new(),
        MockDispatchParser::new(),
        MockChatPoster::new(),
        MockKvStore::new(),
    );

    worker
        .handle_message(&CancellationToken::new(), &message)
        .await;
}

#[tokio::test]
async fn empty_envelope_is_acked_and_no_handler_runs() {
    let worker = build_worker(
        MockObjectStore::new(),
        MockTranscriber::new(),
        MockDispatchParser::new(),
        MockChatPoster::new(),
        MockKvStore::new(),
    );

    let message = acked_message(r#"{"Records":[]}"#);
    worker
        .handle_message(&CancellationToken::new(), &message)
        .await;
}

#[tokio::test]
async fn non_wav_record_never_reaches_the_store() {
    let mut store = MockObjectStore::new();
    store.expect_get().never();

    let worker = build_worker(
        store,
        MockTranscriber::new(),
        MockDispatchParser::new(),
        MockChatPoster::new(),
        MockKvStore::new(),
    );

    let message = acked_message(&envelope_json(
        "ObjectCreated:Put",
        "1385-1750542500_854412500.2-call_1880.mp3",
    ));
    worker
        .handle_message(&CancellationToken::new(), &message)
        .await;
}

#[tokio::test]
async fn non_object_created_events_are_skipped() {
    let worker = build_worker(
        MockObjectStore::new(),
        MockTranscriber::new(),
        MockDispatchParser::new(),
        MockChatPoster::new(),
        MockKvStore::new(),
    );

    let message = acked_message(&envelope_json("ObjectRemoved:Delete", TACTICAL_KEY));
    worker
        .handle_message(&CancellationToken::new(), &message)
        .await;
}

#[tokio::test]
async fn worker_loop_exits_on_cancellation() {
    let mut queue = MockEventQueue::new();
    queue.expect_receive().returning(|| Ok(None));

    let kv: Arc<dyn KvStore> = Arc::new(MockKvStore::new());
    let chat: Arc<dyn ChatPoster> = Arc::new(MockChatPoster::new());
    let gate = Arc::new(AllowListGate::new(Arc::clone(&kv), "1399".to_string()));
    let threads = Arc::new(ThreadRegistry::new(kv));
    let dispatch = Arc::new(DispatchService::new(
        Arc::new(MockDispatchParser::new()),
        Arc::clone(&chat),
        Arc::clone(&gate),
        Arc::clone(&threads),
        "1399".to_string(),
        ACTIVATION,
    ));
    let tactical = Arc::new(TacticalService::new(chat, threads));
    let worker = WorkerLoop::new(
        Arc::new(queue),
        Arc::new(MockObjectStore::new()),
        Arc::new(MockTranscriber::new()),
        gate,
        dispatch,
        tactical,
        "1399".to_string(),
        Duration::from_secs(30),
    );

    let cancel = CancellationToken::new();
    cancel.cancel();
    worker.run(cancel).await.unwrap();
}
