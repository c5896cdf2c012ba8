use pilcrow_engine::{Block, Document, EditResult, Editor, EditorOptions};
use pretty_assertions::assert_eq;

fn editor_with_buffer(change_buffer: usize) -> (Editor, Block) {
    let block = Block::paragraph("start");
    let editor = Editor::with_options(
        Document::new(vec![block.clone()]).unwrap(),
        EditorOptions {
            change_buffer,
            ..EditorOptions::default()
        },
    );
    (editor, block)
}

#[test]
fn edits_without_subscribers_succeed() {
    let (mut editor, block) = editor_with_buffer(4);

    for i in 0..10 {
        editor.update_content(block.id(), format!("v{i}")).unwrap();
    }

    assert_eq!(editor.version(), 10);
}

#[test]
fn subscriber_only_sees_later_events() {
    let (mut editor, block) = editor_with_buffer(16);
    editor.update_content(block.id(), "before").unwrap();

    let mut changes = editor.subscribe();
    editor.update_content(block.id(), "after").unwrap();

    assert_eq!(
        changes.drain(),
        vec![EditResult::ContentUpdated(block.id().clone())]
    );
}

#[test]
fn slow_subscriber_drops_oldest_and_never_blocks() {
    let (mut editor, block) = editor_with_buffer(2);
    let mut changes = editor.subscribe();

    editor.insert_newline(block.id()).unwrap();
    editor.update_content(block.id(), "one").unwrap();
    editor.update_content(block.id(), "two").unwrap();
    editor.delete(block.id()).unwrap();

    let received = changes.drain();
    assert_eq!(received.len(), 2);
    assert_eq!(changes.skipped(), 2);
    assert_eq!(received[0], EditResult::ContentUpdated(block.id().clone()));
    assert!(matches!(received[1], EditResult::Deleted { index: 0, .. }));
}

#[test]
fn zero_buffer_is_raised_to_one() {
    let (mut editor, block) = editor_with_buffer(0);
    let mut changes = editor.subscribe();

    editor.update_content(block.id(), "x").unwrap();

    assert_eq!(
        changes.try_next(),
        Some(EditResult::ContentUpdated(block.id().clone()))
    );
}

#[tokio::test]
async fn async_subscriber_receives_in_order_then_closes() {
    let (mut editor, block) = editor_with_buffer(8);
    let mut changes = editor.subscribe();

    editor.update_content(block.id(), "first").unwrap();
    editor.append_new().unwrap();
    let appended = editor.document().last().unwrap().id().clone();
    drop(editor);

    assert_eq!(
        changes.recv().await,
        Some(EditResult::ContentUpdated(block.id().clone()))
    );
    assert_eq!(changes.recv().await, Some(EditResult::Inserted(appended)));
    assert_eq!(changes.recv().await, None);
}

#[test]
fn editor_behind_a_mutex_serializes_writers() {
    use std::sync::{Arc, Mutex};

    let (editor, block) = editor_with_buffer(64);
    let mut changes = editor.subscribe();
    let editor = Arc::new(Mutex::new(editor));

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let editor = Arc::clone(&editor);
            let id = block.id().clone();
            std::thread::spawn(move || {
                for step in 0..5 {
                    let mut editor = editor.lock().unwrap();
                    editor.update_content(&id, format!("{worker}-{step}")).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = editor.lock().unwrap().snapshot();
    assert_eq!(snapshot.version, 20);
    assert_eq!(changes.drain().len(), 20);
}
