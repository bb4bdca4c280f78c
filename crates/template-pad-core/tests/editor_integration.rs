use std::time::{Duration, Instant};

use template_pad_core::highlight::render;
use template_pad_core::markup::text_content;
use template_pad_core::trigger::detect;
use template_pad_core::{
    AutocompleteSession, Candidate, EditableSurface, EditorEvent, EditorKey, EditorOptions,
    KeyOutcome, MarkupSurface, NoMatchPolicy, Node, TemplateEditor, VariableCatalog,
};

fn catalog() -> VariableCatalog {
    VariableCatalog::new(vec![
        Candidate::new("clientName", "Client full name"),
        Candidate::new("clientBonus", "Bonus points balance"),
        Candidate::new("name", "Short name"),
        Candidate::new("invitationLink", "Signup link"),
    ])
}

/// Simulates a keystroke the way a host does: interception first, then the
/// surface applies the character and reports the input.
fn type_text(editor: &mut TemplateEditor, surface: &mut MarkupSurface, text: &str, now: Instant) {
    for ch in text.chars() {
        if editor.handle_key(EditorKey::Char(ch), surface) == KeyOutcome::Ignored {
            surface.insert_text(&ch.to_string());
            editor.on_input(surface, now);
        }
    }
}

fn mounted(seed: &str, options: EditorOptions) -> (TemplateEditor, MarkupSurface) {
    let mut editor = TemplateEditor::new(catalog(), options).with_seed(seed);
    let mut surface = MarkupSurface::new();
    editor.mount(&mut surface);
    editor.on_frame();
    editor.drain_events();
    (editor, surface)
}

#[test]
fn test_render_round_trips_arbitrary_text() {
    let samples = [
        "",
        "plain",
        "Hi {{clientName}}!",
        "{{",
        "}}",
        "{{{{x}}}}",
        "a{{clientNameb",
        "{{ spaced }}",
        "{{9bad}}",
        "<script>alert('x')</script>",
        "Olá {{clientName}}, 🎉 {{clientBonus}} pts\n\tnext line",
        "&amp; &lt; \" '",
    ];
    for s in samples {
        let markup = render(s);
        assert_eq!(markup.plain_text(), s, "round trip of {s:?}");
        assert_eq!(text_content(&markup.to_html()), s, "html round trip of {s:?}");
    }
}

#[test]
fn test_render_is_idempotent() {
    for s in ["x {{a}} y {{b", "{{a}}{{b}}", "<b>{{c}}</b>", ""] {
        let once = render(s);
        let twice = render(&once.plain_text());
        assert_eq!(once, twice);
    }
}

#[test]
fn test_single_token_with_literal_neighbours() {
    let markup = render("a{{clientName}}b");
    assert_eq!(
        markup.nodes(),
        &[
            Node::Text("a".into()),
            Node::Variable {
                name: "clientName".into()
            },
            Node::Text("b".into()),
        ]
    );

    let unclosed = render("a{{clientNameb");
    assert_eq!(unclosed.variables().count(), 0);
    assert_eq!(unclosed.nodes(), &[Node::Text("a{{clientNameb".into())]);
}

#[test]
fn test_rendered_html_escapes_tags() {
    let html = render("<b>").to_html();
    assert!(!html.contains("<b>"));
    assert_eq!(text_content(&html), "<b>");
}

#[test]
fn test_caret_preserved_across_render() {
    let start = Instant::now();
    let (mut editor, mut surface) = mounted("", EditorOptions::default());
    type_text(&mut editor, &mut surface, "Hello {{cli", start);
    assert_eq!(surface.caret_offset(), 11);

    assert!(editor.tick(&mut surface, start + Duration::from_millis(500)));
    assert_eq!(surface.caret_offset(), 11);
    assert_eq!(editor.caret(), 11);
}

#[test]
fn test_trigger_uses_last_open_braces() {
    let content = "{{a}}{{b";
    let trigger = detect(content, content.chars().count()).unwrap();
    assert_eq!(trigger.offset, 5);
    assert_eq!(trigger.query, "b");
}

#[test]
fn test_no_match_falls_back_to_full_catalog() {
    let catalog = VariableCatalog::new(vec![Candidate::new("x", ""), Candidate::new("y", "")]);
    let mut session = AutocompleteSession::new(NoMatchPolicy::FallbackToAll);
    session.open(0, &catalog);
    session.update_query("zzz", &catalog);
    assert_eq!(session.filtered(), catalog.candidates());
}

#[test]
fn test_no_match_can_show_nothing() {
    let start = Instant::now();
    let options = EditorOptions {
        no_match_policy: NoMatchPolicy::ShowNone,
        ..EditorOptions::default()
    };
    let (mut editor, mut surface) = mounted("", options);
    type_text(&mut editor, &mut surface, "{{zzz", start);
    assert!(editor.session().is_active());
    assert!(editor.session().filtered().is_empty());

    // Enter with nothing to commit is swallowed and changes nothing
    assert_eq!(
        editor.handle_key(EditorKey::Enter, &mut surface),
        KeyOutcome::Consumed
    );
    assert_eq!(editor.value(), "{{zzz");
}

#[test]
fn test_commit_splice_places_caret_after_braces() {
    let start = Instant::now();
    let (mut editor, mut surface) = mounted("Hi ", EditorOptions::default());
    type_text(&mut editor, &mut surface, "{{na", start);
    assert_eq!(editor.caret(), 7);

    let index = editor
        .session()
        .filtered()
        .iter()
        .position(|c| c.name == "name")
        .unwrap();
    assert_eq!(editor.commit(index, &mut surface).as_deref(), Some("name"));
    assert_eq!(editor.value(), "Hi {{name}}");
    assert_eq!(editor.caret(), 11);
    assert_eq!(surface.plain_text(), "Hi {{name}}");
    assert_eq!(surface.caret_offset(), 11);
}

#[test]
fn test_typing_after_commit_continues_in_plain_text() {
    let start = Instant::now();
    let (mut editor, mut surface) = mounted("", EditorOptions::default());
    type_text(&mut editor, &mut surface, "Hi {{clientN", start);
    editor.handle_key(EditorKey::Enter, &mut surface);
    editor.on_frame();

    type_text(&mut editor, &mut surface, ", welcome", start);
    assert_eq!(editor.value(), "Hi {{clientName}}, welcome");
    assert!(!editor.session().is_active());

    assert!(editor.tick(&mut surface, start + Duration::from_secs(1)));
    let variables: Vec<&str> = surface
        .nodes()
        .iter()
        .filter(|n| n.kind == template_pad_core::surface::SurfaceNodeKind::Variable)
        .map(|n| n.text.as_str())
        .collect();
    assert_eq!(variables, vec!["{{clientName}}"]);
    assert_eq!(surface.caret_offset(), 26);
}

#[test]
fn test_change_events_carry_full_text() {
    let start = Instant::now();
    let (mut editor, mut surface) = mounted("", EditorOptions::default());
    type_text(&mut editor, &mut surface, "{{cl", start);
    editor.handle_key(EditorKey::ArrowDown, &mut surface);
    editor.handle_key(EditorKey::Enter, &mut surface);

    let events = editor.drain_events();
    assert_eq!(
        events,
        vec![
            EditorEvent::Changed("{".into()),
            EditorEvent::Changed("{{".into()),
            EditorEvent::Changed("{{c".into()),
            EditorEvent::Changed("{{cl".into()),
            EditorEvent::Changed("{{clientBonus}}".into()),
            EditorEvent::VariableCommitted("clientBonus".into()),
        ]
    );
    assert_eq!(editor.content_version(), 5);
}

#[test]
fn test_burst_of_keystrokes_renders_once() {
    let start = Instant::now();
    let (mut editor, mut surface) = mounted("", EditorOptions::default());
    let renders = surface.render_count();

    for (i, ch) in "Dear {{clientName}}".chars().enumerate() {
        let now = start + Duration::from_millis(20 * i as u64);
        type_text(&mut editor, &mut surface, &ch.to_string(), now);
        editor.tick(&mut surface, now);
    }
    assert_eq!(surface.render_count(), renders);

    let last = start + Duration::from_millis(20 * 18);
    assert!(editor.render_due_in(last).is_some());
    assert!(editor.tick(&mut surface, last + Duration::from_millis(150)));
    assert_eq!(surface.render_count(), renders + 1);
    assert_eq!(surface.plain_text(), "Dear {{clientName}}");
}

#[test]
fn test_set_value_replaces_content_and_renders() {
    let (mut editor, mut surface) = mounted("old", EditorOptions::default());
    editor.set_value("Use {{invitationLink}} to sign up", &mut surface);
    assert_eq!(editor.value(), "Use {{invitationLink}} to sign up");
    assert_eq!(surface.plain_text(), editor.value());
    assert_eq!(surface.caret_offset(), editor.len_chars());
    assert!(editor.drain_events().is_empty());
}
