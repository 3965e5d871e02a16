//! Property-based tests for the interview state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::transition::*;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_non_blank_text() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z ,.]{0,40}"
}

fn arb_blank_text() -> impl Strategy<Value = String> {
    "[ \t\n]{0,6}"
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        (0u32..20, arb_non_blank_text()).prop_map(|(n, s)| Event::start(n, s)),
        arb_non_blank_text().prop_map(|text| Event::Answer { text }),
        arb_blank_text().prop_map(|text| Event::Answer { text }),
        Just(Event::Restart),
        Just(Event::Render),
    ]
}

/// Drive a session through a full interview, returning every intermediate session
fn run_interview(count: u32, symptoms: String, answers: &[String]) -> Vec<Session> {
    let mut sessions = vec![Session::new()];
    let mut session = transition(&Session::new(), Event::start(count, symptoms))
        .expect("start accepted")
        .new_session;
    sessions.push(session.clone());
    for answer in answers {
        session = transition(&session, Event::answer(answer.clone()))
            .expect("answer accepted")
            .new_session;
        sessions.push(session.clone());
    }
    sessions
}

proptest! {
    #[test]
    fn prop_full_interview_reaches_classify(
        count in MIN_QUESTIONS..=MAX_QUESTIONS,
        symptoms in arb_non_blank_text(),
        answers in proptest::collection::vec(arb_non_blank_text(), 10),
    ) {
        let answers = &answers[..count as usize];
        let sessions = run_interview(count, symptoms, answers);

        // One intake, `count` collecting steps, then classify
        let collecting = sessions.iter().filter(|s| s.phase() == Phase::Collecting).count();
        prop_assert_eq!(sessions[0].phase(), Phase::Intake);
        prop_assert_eq!(collecting, count as usize);
        prop_assert_eq!(sessions.last().map(Session::phase), Some(Phase::Classify));

        // Step strictly increases by one per accepted answer
        for pair in sessions.windows(2) {
            prop_assert_eq!(pair[1].current_step(), pair[0].current_step() + 1);
        }
    }

    #[test]
    fn prop_classify_emitted_exactly_once(
        count in MIN_QUESTIONS..=MAX_QUESTIONS,
        answers in proptest::collection::vec(arb_non_blank_text(), 10),
    ) {
        let mut session = transition(&Session::new(), Event::start(count, "fever"))
            .unwrap()
            .new_session;
        let mut classify_effects = 0;
        for answer in &answers[..count as usize] {
            let result = transition(&session, Event::answer(answer.clone())).unwrap();
            classify_effects += result
                .effects
                .iter()
                .filter(|e| matches!(e, Effect::Classify { .. }))
                .count();
            session = result.new_session;
        }
        prop_assert_eq!(classify_effects, 1);
    }

    #[test]
    fn prop_restart_resets_every_field(
        count in MIN_QUESTIONS..=MAX_QUESTIONS,
        symptoms in arb_non_blank_text(),
        answers in proptest::collection::vec(arb_non_blank_text(), 10),
    ) {
        let sessions = run_interview(count, symptoms, &answers[..count as usize]);
        let done = sessions.last().unwrap();
        let reset = transition(done, Event::Restart).unwrap().new_session;
        prop_assert_eq!(reset.current_step(), 0);
        prop_assert!(reset.transcript().is_empty());
        prop_assert_eq!(reset, Session::new());
    }

    #[test]
    fn prop_blank_input_never_advances(
        count in MIN_QUESTIONS..=MAX_QUESTIONS,
        blank in arb_blank_text(),
    ) {
        prop_assert_eq!(
            transition(&Session::new(), Event::start(count, blank.clone())).unwrap_err(),
            TransitionError::EmptyInput
        );

        let session = transition(&Session::new(), Event::start(count, "rash"))
            .unwrap()
            .new_session;
        prop_assert_eq!(
            transition(&session, Event::answer(blank)).unwrap_err(),
            TransitionError::EmptyInput
        );
    }

    #[test]
    fn prop_step_stays_within_bounds(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut session = Session::new();
        for event in events {
            if let Ok(result) = transition(&session, event) {
                session = result.new_session;
            }
            prop_assert!(session.current_step() <= session.target_question_count() + 1);
            prop_assert_eq!(session.transcript().len(), session.current_step() as usize);
        }
    }

    #[test]
    fn prop_rejected_events_are_pure(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut session = Session::new();
        for event in events {
            let before = session.clone();
            match transition(&session, event) {
                Ok(result) => session = result.new_session,
                Err(_) => {
                    prop_assert_eq!(&session, &before);
                }
            }
        }
    }
}
