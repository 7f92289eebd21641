use qwertype::course::engine::CourseEngine;
use qwertype::course::ghost::{DemoEvent, DemoPlayer, DemoPhase};
use qwertype::course::progress::{Badge, badge_for_ratio};
use qwertype::course::spec::{CourseDoc, StepKind, flatten_course_steps};
use qwertype::course::validate::validate_step;

const COURSE_JSON: &str = r#"{
  "course": {
    "title": "Integration Course",
    "chapters": [
      {
        "title": "Basics",
        "steps": [
          {"type": "intro", "title": "Welcome", "content": ["hello"]},
          {
            "type": "ghost_demo",
            "title": "Demo",
            "ghost": {
              "segments": [
                {"code": "<p>", "explain": "open tag"},
                {"code": "</p>", "explain": "close tag"}
              ]
            }
          },
          {
            "type": "now_you",
            "title": "Write a paragraph",
            "starter_code": "",
            "validation_checks": [
              {"type": "element_exists", "target": "p"},
              {"type": "contains", "value": "Hello"}
            ],
            "success_msg": "Well done."
          }
        ]
      },
      {
        "title": "Extras",
        "steps": [
          {"type": "reflection", "title": "Think", "requires_completion": false}
        ]
      }
    ]
  }
}"#;

fn load_engine() -> CourseEngine {
    let doc = CourseDoc::from_json(COURSE_JSON).unwrap();
    CourseEngine::new(flatten_course_steps(&doc)).unwrap()
}

#[test]
fn full_course_walkthrough() {
    let mut engine = load_engine();
    assert_eq!(engine.len(), 4);
    assert_eq!(engine.current().kind, StepKind::Intro);

    // Intro never gates
    assert!(engine.next());

    // Ghost demo: play both segments through a demo player
    let step = engine.current().clone();
    assert_eq!(step.kind, StepKind::GhostDemo);
    let ghost = step.ghost.as_ref().unwrap();
    let mut demo = DemoPlayer::from_spec(ghost, 120);

    assert_eq!(demo.phase(), DemoPhase::Ready);
    assert_eq!(demo.current_explanation().unwrap().joined(), "open tag");

    demo.run();
    let mut saw_segment_complete = false;
    loop {
        match demo.tick() {
            Some(DemoEvent::Progress) => {}
            Some(DemoEvent::SegmentComplete) => {
                saw_segment_complete = true;
                assert_eq!(demo.visible_text(), "<p>");
                assert_eq!(demo.current_explanation().unwrap().joined(), "close tag");
                demo.run();
            }
            Some(DemoEvent::DemoComplete) => break,
            None => panic!("demo stalled before completing"),
        }
    }
    assert!(saw_segment_complete);
    assert_eq!(demo.visible_text(), "<p></p>");

    // Demos never gate navigation
    assert!(engine.next());

    // Interactive step: blocked until validation passes
    let step = engine.current().clone();
    assert_eq!(step.kind, StepKind::NowYou);
    assert!(!engine.next());
    assert_eq!(engine.index(), 2);

    let (ok, _msg) = validate_step(&step, "<p>hi</p>");
    assert!(!ok); // missing "Hello"
    engine.mark_attempt(ok, None);
    assert!(!engine.next());

    let (ok, msg) = validate_step(&step, "<p>Hello</p>");
    assert!(ok);
    assert_eq!(msg, "Well done.");
    engine.mark_attempt(ok, Some(100.0));

    let state = engine.state();
    assert_eq!(state.attempts, 2);
    assert!(state.completed);

    assert!(engine.next());

    // Reflection with requires_completion=false never gates; last step,
    // so next() reports course end.
    assert_eq!(engine.current().kind, StepKind::Reflection);
    assert!((engine.progress_ratio() - 1.0).abs() < f64::EPSILON);
    assert_eq!(badge_for_ratio(engine.progress_ratio()), Some(Badge::Gold));
    assert!(!engine.next());

    // Back navigation is never gated
    assert!(engine.back());
    assert_eq!(engine.index(), 2);
}

#[test]
fn progress_and_badges_track_completion() {
    let mut engine = load_engine();

    // Only the now_you step gates: 3 of 4 steps count immediately.
    assert!((engine.progress_ratio() - 0.75).abs() < f64::EPSILON);
    assert_eq!(badge_for_ratio(engine.progress_ratio()), Some(Badge::Silver));

    engine.next();
    engine.next();
    engine.mark_attempt(true, None);
    assert!((engine.progress_ratio() - 1.0).abs() < f64::EPSILON);
    assert_eq!(badge_for_ratio(engine.progress_ratio()), Some(Badge::Gold));
}

#[test]
fn flattening_is_deterministic() {
    let doc = CourseDoc::from_json(COURSE_JSON).unwrap();
    let a = flatten_course_steps(&doc);
    let b = flatten_course_steps(&doc);
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.id, y.id);
        assert_eq!(x.chapter_index, y.chapter_index);
        assert_eq!(x.step_index, y.step_index);
    }
    assert_eq!(a[3].chapter_title, "Extras");
    assert_eq!(a[3].id, "c1_s0_reflection");
}
