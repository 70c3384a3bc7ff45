//! Editor Session Integration Tests
//!
//! Exercises a whole editor session through the public API:
//! - Panel actions and uploads
//! - Gestures and control visibility
//! - Teardown while reads are in flight

use editor_core::{
    encode_data_url, DragStop, Editor, EditorConfig, ElementKind, ElementPatch, FileSelection,
    FocusTarget, HideReason, PanelAction, PanelEffect, ResizeReport, UiEvent, UploadOutcome,
    Visibility, PANEL_BUTTONS,
};

const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Upload an image through the panel and return the new element id.
fn add_image(editor: &mut Editor, name: &str) -> editor_core::ElementId {
    let effect = editor.dispatch(PanelAction::AddImage {
        file: Some(FileSelection::new(name)),
    });
    let PanelEffect::Upload(ticket) = effect else {
        panic!("expected upload, got {effect:?}");
    };
    let encoded = encode_data_url(ticket.file(), &PNG_HEADER);
    match editor.complete_upload(ticket, encoded) {
        UploadOutcome::ElementAdded { id } => id,
        other => panic!("expected element, got {other:?}"),
    }
}

// ============================================================================
// Store Properties
// ============================================================================

#[test]
fn test_end_to_end_text_lifecycle() {
    let mut editor = Editor::default();
    assert!(editor.store().is_empty());

    let id = editor.add_text();
    let created = editor.store().element(id).expect("element").clone();
    assert_eq!(editor.store().len(), 1);
    assert_eq!(created.color(), Some("#353535"));
    assert!((created.scale - 1.0).abs() < f32::EPSILON);

    assert!(editor.update_element(id, &ElementPatch::color("#cf0000")));
    let updated = editor.store().element(id).expect("element");
    assert_eq!(updated.color(), Some("#cf0000"));
    assert_eq!(updated.geometry, created.geometry);
    assert_eq!(updated.font_size(), created.font_size());

    let mut event = UiEvent::new();
    assert!(editor.remove_element(id, &mut event));
    assert!(event.is_propagation_stopped());
    assert!(editor.store().is_empty());
}

#[test]
fn test_ids_unique_across_mixed_additions() {
    let mut editor = Editor::default();
    let mut ids = Vec::new();
    for i in 0..20 {
        if i % 3 == 0 {
            ids.push(add_image(&mut editor, &format!("photo{i}.png")));
        } else {
            ids.push(editor.add_text());
        }
    }
    assert_eq!(editor.store().len(), 20);
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), ids.len());
}

#[test]
fn test_double_remove_is_noop() {
    let mut editor = Editor::default();
    let keep = editor.add_text();
    let gone = editor.add_text();
    assert!(editor.remove_element(gone, &mut UiEvent::new()));
    assert!(!editor.remove_element(gone, &mut UiEvent::new()));
    assert_eq!(editor.store().len(), 1);
    assert!(editor.store().element(keep).is_some());
}

#[test]
fn test_position_update_does_not_touch_neighbours() {
    let mut editor = Editor::default();
    let a = editor.add_text();
    let b = add_image(&mut editor, "b.png");
    let before_b = editor.store().element(b).expect("b").clone();
    let before_a = editor.store().element(a).expect("a").clone();

    editor.update_element(a, &ElementPatch::position(300.0, 400.0));

    let after_a = editor.store().element(a).expect("a");
    assert_eq!(after_a.geometry.x, Some(300.0));
    assert_eq!(after_a.geometry.y, Some(400.0));
    assert_eq!(after_a.kind, before_a.kind);
    assert_eq!(editor.store().element(b), Some(&before_b));
}

#[test]
fn test_reset_from_any_state() {
    let mut editor = Editor::default();
    editor.add_text();
    add_image(&mut editor, "a.png");
    editor.set_background_color("#000000");
    let ticket = editor
        .set_background(Some(FileSelection::new("bg.png")))
        .expect("ticket");
    let encoded = encode_data_url(ticket.file(), &PNG_HEADER);
    editor.complete_upload(ticket, encoded);

    editor.dispatch(PanelAction::Reset);
    assert!(editor.store().is_empty());
    assert_eq!(editor.store().background().color, "#e9d5ff");
    assert!(editor.store().background().image.is_none());
}

// ============================================================================
// Gesture Tests
// ============================================================================

#[test]
fn test_resize_scales_text_font_only() {
    let mut editor = Editor::default();
    let text = editor.add_text();
    let image = add_image(&mut editor, "a.png");
    for id in [text, image] {
        editor.update_element(
            id,
            &ElementPatch {
                width: Some(200.0),
                ..ElementPatch::default()
            },
        );
        let report = ResizeReport {
            width: 400.0,
            height: 120.0,
            x: 10.0,
            y: 10.0,
        };
        assert!(editor.resize(id, report));
    }

    let text = editor.store().element(text).expect("text");
    assert_eq!(text.font_size(), Some(32.0));
    assert_eq!(text.geometry.width, Some(400.0));

    let image = editor.store().element(image).expect("image");
    assert!(matches!(image.kind, ElementKind::Image { .. }));
    assert_eq!(image.font_size(), None);
    assert_eq!(image.geometry.width, Some(400.0));
}

#[test]
fn test_drag_hides_image_controls_only() {
    let mut editor = Editor::default();
    let text = editor.add_text();
    let image = add_image(&mut editor, "a.png");

    for id in [text, image] {
        assert!(editor.drag_stop(id, DragStop { x: 120.0, y: 80.0 }));
    }

    assert_eq!(editor.visibility(text), Some(Visibility::Visible));
    assert_eq!(
        editor.visibility(image),
        Some(Visibility::Hidden(HideReason::DragEnd))
    );

    // The move handle stays so the image can be dragged again.
    let view = editor.view().expect("mounted");
    let chrome = &view.element(image).expect("image").chrome;
    assert!(chrome.move_handle);
    assert!(!chrome.delete_button);
}

#[test]
fn test_blur_requires_post_mount_focus() {
    let mut editor = Editor::default();
    let id = editor.add_text();
    assert_eq!(editor.pending_focus(), vec![id]);

    editor.blur(id, FocusTarget::Outside);
    assert_eq!(editor.visibility(id), Some(Visibility::Visible));

    editor.acknowledge_focus(id);
    editor.blur(id, FocusTarget::Inside);
    assert_eq!(editor.visibility(id), Some(Visibility::Visible));
    editor.blur(id, FocusTarget::Outside);
    assert_eq!(
        editor.visibility(id),
        Some(Visibility::Hidden(HideReason::Blur))
    );

    editor.focus(id);
    assert_eq!(editor.visibility(id), Some(Visibility::Visible));
}

// ============================================================================
// Upload Lifecycle Tests
// ============================================================================

#[test]
fn test_uploads_apply_in_completion_order() {
    let mut editor = Editor::default();
    let first = editor
        .add_image(Some(FileSelection::new("first.png")))
        .expect("ticket");
    let second = editor
        .add_image(Some(FileSelection::new("second.png")))
        .expect("ticket");

    let second_data = encode_data_url(second.file(), b"\x89PNG second");
    let first_data = encode_data_url(first.file(), b"\x89PNG first");
    let UploadOutcome::ElementAdded { id: late } = editor.complete_upload(second, second_data)
    else {
        panic!("second upload should land");
    };
    let UploadOutcome::ElementAdded { id: early } = editor.complete_upload(first, first_data)
    else {
        panic!("first upload should land");
    };

    let order: Vec<_> = editor.store().elements().iter().map(|el| el.id).collect();
    assert_eq!(order, vec![late, early]);
}

#[test]
fn test_non_image_upload_fails_quietly() {
    let mut editor = Editor::default();
    let ticket = editor
        .add_image(Some(FileSelection::new("notes.txt").with_mime("text/plain")))
        .expect("ticket");
    let encoded = encode_data_url(ticket.file(), b"hello");
    assert_eq!(editor.complete_upload(ticket, encoded), UploadOutcome::Failed);
    assert!(editor.store().is_empty());
    assert_eq!(editor.pending_uploads(), 0);
}

#[test]
fn test_read_finishing_after_teardown_is_dropped() {
    let mut editor = Editor::new(EditorConfig::default());
    let ticket = editor
        .add_image(Some(FileSelection::new("slow.png")))
        .expect("ticket");
    editor.unmount();
    assert!(editor.view().is_none());

    editor.mount();
    let encoded = encode_data_url(ticket.file(), &PNG_HEADER);
    assert_eq!(editor.complete_upload(ticket, encoded), UploadOutcome::Stale);
    assert!(editor.store().is_empty());
}

// ============================================================================
// Control Panel Tests
// ============================================================================

#[test]
fn test_every_panel_button_dispatches() {
    let mut editor = Editor::default();
    for button in &PANEL_BUTTONS {
        let action = button.action.into_action(None);
        let effect = editor.dispatch(action);
        match button.label {
            "Text" => assert!(matches!(effect, PanelEffect::TextAdded(_))),
            "Export to PNG" => assert_eq!(effect, PanelEffect::Export),
            _ => assert_eq!(effect, PanelEffect::Done),
        }
    }
    assert_eq!(editor.store().len(), 1);
}
