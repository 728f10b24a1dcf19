use gapfill::blanks::{render, scan, AnswerStore, MarkerKind, RenderOptions};
use gapfill::{parse_passage, serialize_passage, EngineConfig, Passage, Session, Status};

fn numbers(session: &mut Session) -> Vec<u32> {
    session.markers().iter().map(|m| m.question_number).collect()
}

#[test]
fn numbered_markers_come_back_in_text_order() {
    let markers = scan("Fill in: (1) and later (2).", 1);
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].question_number, 1);
    assert_eq!(markers[1].question_number, 2);
    assert!(markers.iter().all(|m| m.kind == MarkerKind::Numbered));
}

#[test]
fn bare_runs_are_numbered_from_starting_number() {
    let markers = scan("She ___ to work, he ____ at home and they _____.", 5);
    let numbers: Vec<u32> = markers.iter().map(|m| m.question_number).collect();
    assert_eq!(numbers, vec![5, 6, 7]);
    assert!(markers.iter().all(|m| m.kind == MarkerKind::Positional));
    assert!(markers.windows(2).all(|w| w[0].source_offset < w[1].source_offset));
}

#[test]
fn render_is_repeatable() {
    let text = "<p>I (1) it, she ___ it.</p>";
    let markers = scan("I (1) it, she ___ it.", 1);
    let answers: AnswerStore = [(1, "liked")].into_iter().collect();
    let options = RenderOptions::default();
    assert_eq!(
        render(text, &markers, &answers, &options),
        render(text, &markers, &answers, &options)
    );
}

#[test]
fn editing_surrounding_text_keeps_answers() {
    let mut session = Session::from_text("The (5) sat on the mat.", &EngineConfig::default());
    session.set_answer(5, "cat");
    assert_eq!(numbers(&mut session), vec![5]);

    session.set_text("Yesterday, the fat (5) sat quietly on the old mat.");
    assert_eq!(numbers(&mut session), vec![5]);
    assert_eq!(session.answer(5), "cat");
}

#[test]
fn answers_survive_their_blank_disappearing() {
    let mut session = Session::from_text("The (5) sat on the mat.", &EngineConfig::default());
    session.set_answer(5, "cat");

    session.set_text("The animal sat on the mat.");
    assert!(numbers(&mut session).is_empty());
    assert_eq!(session.status(), Status::NoBlanks);
    assert_eq!(session.stale_answers(), vec![5]);

    session.set_text("The (5) sat on the mat again.");
    assert_eq!(numbers(&mut session), vec![5]);
    assert_eq!(session.answer(5), "cat");
    assert!(session.stale_answers().is_empty());
}

#[test]
fn multi_variant_answers() {
    let mut session = Session::from_text("Small (3) quick.", &EngineConfig::default());
    session.set_answer(3, "but | though | however");
    assert_eq!(session.variant_count(3), 3);
    assert_eq!(
        session.passage().answers.accepted_variants(3),
        vec!["but", "though", "however"]
    );

    session.set_answer(3, "  single  ");
    assert_eq!(session.passage().answers.accepted_variants(3), vec!["single"]);
}

#[test]
fn preview_shows_numbers_and_answers() {
    let text = "Last summer, I (1) to Italy. We (2) there.";
    let mut session = Session::from_text(text, &EngineConfig::default());
    session.set_answer(1, "went");
    session.set_answer(2, "stayed");

    let html = session.preview();
    assert!(html.contains(">1. went</span>"));
    assert!(html.contains(">2. stayed</span>"));

    // everything outside the two fragments is unchanged
    let outside: String = html
        .split("<span")
        .enumerate()
        .map(|(i, part)| match (i, part.split_once("</span>")) {
            (0, _) | (_, None) => part,
            (_, Some((_, rest))) => rest,
        })
        .collect();
    assert_eq!(outside, "Last summer, I  to Italy. We  there.");
}

#[test]
fn preview_substitutes_inside_markup() {
    let raw = "<p>Complete the form:</p><p>Name: 31 ___</p><p>Phone: 32 ___</p>";
    let mut session = Session::from_text(raw, &EngineConfig::default());
    session.set_answer(31, "Jones");

    assert_eq!(numbers(&mut session), vec![31, 32]);
    let html = session.preview();
    assert!(html.contains("<p>Name: <span class=\"blank\" data-question=\"31\">31. Jones</span></p>"));
    assert!(html.contains("<p>Phone: <span class=\"blank blank--empty\" data-question=\"32\">32. ______</span></p>"));
}

#[test]
fn passage_document_round_trip_through_session() {
    let document = "---\ntitle: Travel\nstarting_number: 1\nanswers:\n  1: went\n  9: forgotten\n---\n\nI (1) home.";
    let passage = parse_passage(document).unwrap();
    let mut session = Session::new(passage, &EngineConfig::default());

    assert_eq!(session.status(), Status::Blanks { total: 1, answered: 1 });
    assert_eq!(session.stale_answers(), vec![9]);

    session.set_answer(1, "walked | went");
    let saved = serialize_passage(&session.into_passage()).unwrap();
    let reloaded: Passage = parse_passage(&saved).unwrap();

    assert_eq!(reloaded.title.as_deref(), Some("Travel"));
    assert_eq!(reloaded.answers.get_answer(1), "walked | went");
    assert_eq!(reloaded.answers.get_answer(9), "forgotten");
    assert_eq!(reloaded.raw_text, "I (1) home.");
}

#[test]
fn restricted_notations_change_detection() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = EngineConfig {
        notations: vec![gapfill::blanks::Notation::BareUnderscore],
        starting_number: 11,
        ..EngineConfig::default()
    };
    let mut session = Session::from_text("Q (1): the ___ is ___.", &config);
    assert_eq!(numbers(&mut session), vec![11, 12]);
}

#[test]
fn rich_text_no_break_spaces_render_in_preview() {
    let raw = "<p>Name: 31&nbsp;___</p><p>Phone: 32&nbsp;___</p>";
    let mut session = Session::from_text(raw, &EngineConfig::default());
    session.set_answer(31, "Jones");

    assert_eq!(numbers(&mut session), vec![31, 32]);
    let html = session.preview();
    assert!(html.contains(">31. Jones</span></p>"));
    assert!(html.contains(">32. ______</span></p>"));
    assert!(!html.contains("&nbsp;___"));
}

#[test]
fn comparison_signs_in_prose_keep_blanks() {
    let text = "If x < 3 then (1) is true and y > 2.";
    let mut session = Session::from_text(text, &EngineConfig::default());
    session.set_answer(1, "x");

    assert_eq!(numbers(&mut session), vec![1]);
    assert_eq!(
        session.preview(),
        "If x < 3 then <span class=\"blank\" data-question=\"1\">1. x</span> is true and y > 2."
    );
}

#[test]
fn image_alt_text_is_not_substituted() {
    let mut session = Session::from_text("<img alt=\"(1)\"> I (1) home", &EngineConfig::default());
    let html = session.preview();
    assert!(html.starts_with("<img alt=\"(1)\"> I <span"));
    assert_eq!(html.matches("<span").count(), 1);
}
