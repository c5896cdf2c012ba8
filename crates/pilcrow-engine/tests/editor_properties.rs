//! Behavioural guarantees of the editor that hold across intents.

use pilcrow_engine::{
    Block, BlockId, Cmd, Document, EditResult, Editor, EditorError, EditorOptions, Kind,
    KindRegistry, KindSpec,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn abc() -> (Document, [BlockId; 3]) {
    let a = Block::paragraph("A");
    let b = Block::with_content(Kind::HEADING, "B");
    let c = Block::with_content(Kind::TODO, "C");
    let ids = [a.id().clone(), b.id().clone(), c.id().clone()];
    (Document::new(vec![a, b, c]).unwrap(), ids)
}

fn ids(document: &Document) -> Vec<BlockId> {
    document.ids().cloned().collect()
}

fn color_options() -> EditorOptions {
    let mut registry = KindRegistry::default();
    registry.register(
        Kind::new("color").unwrap(),
        KindSpec::decorative("Color").owning(["color"]),
    );
    EditorOptions {
        registry,
        ..EditorOptions::default()
    }
}

#[rstest]
#[case(0, [0, 1, 2])]
#[case(1, [1, 0, 2])]
#[case(2, [1, 2, 0])]
#[case(3, [1, 2, 0])]
#[case(100, [1, 2, 0])]
#[case(usize::MAX, [1, 2, 0])]
fn move_first_block_clamps_to_last_position(#[case] to: usize, #[case] expected: [usize; 3]) {
    let (document, block_ids) = abc();
    let mut editor = Editor::new(document);

    let result = editor.move_block(&block_ids[0], to).unwrap();

    let expected: Vec<_> = expected.iter().map(|&i| block_ids[i].clone()).collect();
    assert_eq!(ids(editor.document()), expected);
    assert_eq!(
        result,
        Some(EditResult::Moved {
            id: block_ids[0].clone(),
            from: 0,
            to: to.min(2)
        })
    );
}

type Keystroke = fn(&mut Editor, &BlockId) -> Result<Option<EditResult>, EditorError>;

#[rstest]
#[case::divider(Block::new(Kind::DIVIDER))]
#[case::divider_with_stray_text(Block::with_content(Kind::DIVIDER, "ignored"))]
#[case::color(Block::new(Kind::new("color").unwrap()).with_property("color", "red"))]
#[case::empty_heading(Block::new(Kind::HEADING))]
#[case::empty_todo(Block::new(Kind::TODO).with_property("completed", "true"))]
#[case::empty_list_item(Block::new(Kind::LIST_ITEM).with_property("type", "bullet"))]
fn empty_non_paragraph_reverts_in_place(
    #[case] block: Block,
    #[values(Editor::insert_newline, Editor::delete_at_beginning)] keystroke: Keystroke,
) {
    let id = block.id().clone();
    let content = block.content.clone();
    let mut editor = Editor::with_options(Document::new(vec![block]).unwrap(), color_options());

    let result = keystroke(&mut editor, &id).unwrap();

    assert_eq!(result, Some(EditResult::RetypedKind(id.clone())));
    assert_eq!(editor.document().len(), 1);
    let reverted = editor.document().block_at(0).unwrap();
    assert_eq!(reverted.id(), &id);
    assert_eq!(reverted.kind, Kind::PARAGRAPH);
    assert_eq!(reverted.content, content);
    assert!(reverted.properties.is_empty());
}

#[rstest]
#[case(Block::paragraph("hello"))]
#[case(Block::with_content(Kind::QUOTE, "to be"))]
#[case(Block::with_content(Kind::LIST_ITEM, "one").with_property("type", "numbered").with_property("index", "1"))]
#[case(Block::with_content(Kind::TODO, "done").with_property("completed", "true"))]
fn newline_on_text_splits(#[case] block: Block) {
    let mut editor = Editor::new(Document::new(vec![block.clone()]).unwrap());

    editor.insert_newline(block.id()).unwrap();

    let document = editor.document();
    assert_eq!(document.len(), 2);
    assert_eq!(document.block_at(0), Some(&block));
    let successor = document.block_at(1).unwrap();
    assert_ne!(successor.id(), block.id());
    assert_eq!(successor.kind, block.kind);
    assert_eq!(successor.properties, block.properties);
    assert_eq!(successor.content, "");
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
fn delete_removes_exactly_one_block(#[case] position: usize) {
    let (document, block_ids) = abc();
    let mut expected = document.blocks().to_vec();
    let removed = expected.remove(position);
    let mut editor = Editor::new(document);

    let result = editor.delete(removed.id()).unwrap();

    assert_eq!(editor.document().blocks(), expected.as_slice());
    assert_eq!(
        result,
        Some(EditResult::Deleted {
            id: block_ids[position].clone(),
            index: position
        })
    );
}

#[rstest]
#[case::unset(None)]
#[case::completed(Some("true"))]
#[case::uncompleted(Some("false"))]
fn double_toggle_restores_completion(#[case] completed: Option<&str>) {
    let mut todo = Block::with_content(Kind::TODO, "laundry");
    match completed {
        Some(value) => todo.set("completed", value),
        None => {
            todo.remove("completed");
        }
    }
    let mut editor = Editor::new(Document::new(vec![todo.clone()]).unwrap());
    let todo = editor.document().block_at(0).unwrap().clone();
    assert_eq!(todo.get("completed"), Some(completed.unwrap_or("false")));

    editor.toggle_completion(todo.id()).unwrap();
    editor.toggle_completion(todo.id()).unwrap();

    let toggled = editor.document().block_at(0).unwrap();
    assert_eq!(toggled, &todo);
}

#[rstest]
#[case::from_paragraph(Block::paragraph("water plants"))]
#[case::from_quote_carrying_completed(
    Block::with_content(Kind::QUOTE, "water plants").with_property("completed", "true")
)]
fn todo_made_by_retype_toggles_back_to_itself(#[case] block: Block) {
    let id = block.id().clone();
    let mut editor = Editor::new(Document::new(vec![block]).unwrap());

    editor.retype(&id, Kind::TODO).unwrap();
    let todo = editor.document().block_at(0).unwrap().clone();
    editor.toggle_completion(&id).unwrap();
    editor.toggle_completion(&id).unwrap();

    assert_eq!(editor.document().block_at(0), Some(&todo));
}

#[rstest]
#[case(Kind::PARAGRAPH)]
#[case(Kind::HEADING)]
#[case(Kind::DIVIDER)]
#[case(Kind::LIST_ITEM)]
fn toggle_on_non_todo_changes_nothing(#[case] kind: Kind) {
    let block = Block::with_content(kind, "text").with_property("completed", "false");
    let mut editor = Editor::new(Document::new(vec![block.clone()]).unwrap());
    let mut changes = editor.subscribe();

    assert_eq!(editor.toggle_completion(block.id()).unwrap(), None);

    assert_eq!(editor.document().block_at(0), Some(&block));
    assert!(changes.drain().is_empty());
}

#[test]
fn ids_are_stable_across_non_deleting_edits() {
    let (document, block_ids) = abc();
    let mut editor = Editor::new(document);
    let [a, b, c] = &block_ids;

    editor.update_content(a, "A2").unwrap();
    editor.retype(b, Kind::QUOTE).unwrap();
    editor.toggle_completion(c).unwrap();
    editor.insert_newline(a).unwrap();
    editor.move_block(c, 0).unwrap();
    editor.append_new().unwrap();
    editor.set_property(b, "color", Some("blue".into())).unwrap();
    editor.insert_after(Block::paragraph("late"), b).unwrap();

    for id in &block_ids {
        let block = editor.document().block_with(id).unwrap();
        assert_eq!(block.id(), id);
    }
    assert_eq!(editor.document().len(), 6);
}

#[test]
fn one_notification_per_successful_mutation() {
    let (document, [a, b, c]) = abc();
    let mut editor = Editor::new(document);
    let mut changes = editor.subscribe();

    let commands = vec![
        Cmd::UpdateContent {
            block: a.clone(),
            text: "A!".into(),
        },
        Cmd::ToggleCompletion { block: a.clone() }, // no-op on a paragraph
        Cmd::ToggleCompletion { block: c.clone() },
        Cmd::Retype {
            block: b.clone(),
            kind: Kind::QUOTE,
        },
        Cmd::InsertNewline { block: a.clone() },
        Cmd::Move {
            block: c.clone(),
            to: 0,
        },
        Cmd::Delete { block: b.clone() },
        Cmd::Delete { block: b.clone() }, // already gone
        Cmd::AppendNew,
    ];

    let mut returned = Vec::new();
    let mut failures = 0;
    for cmd in commands {
        match editor.apply(cmd) {
            Ok(Some(result)) => returned.push(result),
            Ok(None) => {}
            Err(_) => failures += 1,
        }
    }

    let received = changes.drain();
    assert_eq!(received, returned);
    assert_eq!(received.len(), 7);
    assert_eq!(failures, 1);
    assert_eq!(editor.version(), 7);
    assert_eq!(received[0], EditResult::ContentUpdated(a.clone()));
    assert_eq!(received[1], EditResult::ContentUpdated(c.clone()));
    assert_eq!(received[2], EditResult::RetypedKind(b.clone()));
    assert!(matches!(&received[3], EditResult::Inserted(id) if id != &a));
    assert_eq!(
        received[4],
        EditResult::Moved {
            id: c.clone(),
            from: 3,
            to: 0
        }
    );
    assert_eq!(received[5], EditResult::Deleted { id: b, index: 3 });
    assert_eq!(received[6].id(), editor.document().last().unwrap().id());
}
