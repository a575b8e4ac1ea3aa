use std::time::Duration;

use super::*;
use crate::assets::decode::PreparedImage;
use crate::assets::palette::SpriteId;
use crate::render::scheduler::ImmediateScheduler;
use crate::render::sink::InMemorySink;

struct SolidLoader;

impl SpriteLoader for SolidLoader {
    fn load(&self, _id: &SpriteId, size_px: u32) -> EmojiPadResult<PreparedImage> {
        PreparedImage::from_premul(
            size_px,
            size_px,
            [255u8, 255, 255, 255].repeat((size_px * size_px) as usize),
        )
    }
}

fn config() -> EmojiPadConfig {
    EmojiPadConfig {
        layer_count: Some(4),
        sprite_size_px: Some(8),
        seed: Some(21),
        load_threads: Some(1),
        resize_debounce_ms: 0,
        ..EmojiPadConfig::default()
    }
}

fn spawn() -> WorkerHandle<InMemorySink> {
    WorkerHandle::spawn(
        config(),
        Arc::new(SolidLoader),
        InMemorySink::keep_last(1),
        ImmediateScheduler,
    )
    .unwrap()
}

#[test]
fn decodes_init_and_resize_envelopes() {
    let msg = WorkerMessage::from_json(r#"{"name":"init","width":800,"height":600,"ratio":2}"#)
        .unwrap()
        .unwrap();
    match msg {
        WorkerMessage::Init {
            surface,
            width,
            height,
            ratio,
        } => {
            assert!(surface.is_none());
            assert_eq!((width, height, ratio), (800.0, 600.0, 2.0));
        }
        other => panic!("unexpected {other:?}"),
    }

    let msg = WorkerMessage::from_json(r#"{"name":"resize","width":10,"height":20}"#)
        .unwrap()
        .unwrap();
    assert_eq!(msg.name(), "resize");
}

#[test]
fn init_without_ratio_defaults_to_one() {
    let msg = WorkerMessage::from_json(r#"{"name":"init","width":5,"height":5}"#)
        .unwrap()
        .unwrap();
    assert!(matches!(msg, WorkerMessage::Init { ratio, .. } if ratio == 1.0));
}

#[test]
fn unknown_names_are_ignored() {
    assert!(WorkerMessage::from_json(r#"{"name":"pause"}"#).unwrap().is_none());
    assert!(WorkerMessage::from_json(r#"{"width":1}"#).unwrap().is_none());
}

#[test]
fn malformed_known_messages_are_errors() {
    assert!(WorkerMessage::from_json(r#"{"name":"resize","width":"wide"}"#).is_err());
    assert!(WorkerMessage::from_json("not json").is_err());
}

#[test]
fn worker_renders_after_init_and_applies_resizes() {
    let worker = spawn();
    worker
        .post(WorkerMessage::Resize {
            width: 1.0,
            height: 1.0,
        })
        .unwrap();
    assert!(worker
        .post_json(r#"{"name":"init","width":40,"height":30,"ratio":2}"#)
        .unwrap());
    std::thread::sleep(Duration::from_millis(300));

    worker.post_json(r#"{"name":"resize","width":25,"height":10}"#).unwrap();
    std::thread::sleep(Duration::from_millis(300));

    worker.stop();
    let sink = worker.join().unwrap();
    assert_eq!(sink.config().unwrap().width, 80);
    let last = sink.last_frame().unwrap();
    assert_eq!((last.width, last.height), (50, 20));
    assert!(sink.is_ended());
}

#[test]
fn transferred_surface_is_adopted() {
    let worker = spawn();
    let surface = Surface::from_init(SurfaceInit::new(1.0, 1.0, 1.0)).unwrap();
    worker
        .post(WorkerMessage::init(surface, SurfaceInit::new(16.0, 12.0, 1.5)))
        .unwrap();
    std::thread::sleep(Duration::from_millis(300));
    let sink = worker.join().unwrap();
    let last = sink.last_frame().unwrap();
    assert_eq!((last.width, last.height), (24, 18));
}

#[test]
fn stopping_before_init_returns_untouched_sink() {
    let worker = spawn();
    worker.stop();
    let sink = worker.join().unwrap();
    assert!(sink.config().is_none());
    assert_eq!(sink.pushed(), 0);
}

#[test]
fn unusable_resize_keeps_the_worker_rendering() {
    let worker = spawn();
    worker
        .post_json(r#"{"name":"init","width":20,"height":10,"ratio":1}"#)
        .unwrap();
    std::thread::sleep(Duration::from_millis(300));
    worker
        .post_json(r#"{"name":"resize","width":-10,"height":80}"#)
        .unwrap();
    std::thread::sleep(Duration::from_millis(300));
    assert!(!worker.is_finished());

    worker.stop();
    let sink = worker.join().unwrap();
    let last = sink.last_frame().unwrap();
    assert_eq!((last.width, last.height), (20, 10));
    assert!(sink.pushed() > 1);
}
