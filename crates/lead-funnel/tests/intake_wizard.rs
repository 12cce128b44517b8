use lead_funnel::assessment::{
    score, AnswerField, AnswerSet, ContactDetails, IntakeWizard, Lead, Segment, SegmentNarrative,
    StepKind, Transition, TOTAL_STEPS,
};

fn drive_through(wizard: &mut IntakeWizard, answers: &[(&str, &str)]) {
    // Welcome
    wizard.next().expect("welcome advances");
    for (expected_key, value) in answers {
        let step = wizard.current_step();
        let field = step.field.expect("question step has a field");
        assert_eq!(field.key(), *expected_key);
        if !value.is_empty() {
            wizard.select(value).expect("selection accepted");
        }
        match wizard.next().expect("advance accepted") {
            Transition::Advanced(_) => {}
            Transition::Completed => return,
        }
    }
}

#[test]
fn full_walkthrough_produces_a_scoreable_lead() {
    let answers = [
        ("q1", "no"),
        ("q2", "yes"),
        ("q3", "no"),
        ("q4", "yes"),
        ("q5", "yes"),
        ("q6", "yes"),
        ("q7", "yes"),
        ("q8", "yes"),
        ("q9", "yes"),
        ("q10", "yes"),
        ("current_stage", "established"),
        ("next_90_day_goal", "scale"),
        ("biggest_obstacle", "product-not-converting"),
        ("preferred_path", "software"),
        ("notes", ""),
    ];

    let mut wizard = IntakeWizard::new();
    drive_through(&mut wizard, &answers);
    assert!(wizard.is_completed());

    let answer_set = wizard.into_answers();
    assert!(answer_set.is_complete());
    assert_eq!(score(&answer_set), 100);

    let lead = Lead::finalize(
        ContactDetails {
            name: "Katherine Johnson".to_string(),
            email: "katherine@example.com".to_string(),
        },
        answer_set,
    )
    .expect("lead finalizes");
    assert_eq!(lead.segment, Segment::SovereignFounder);

    let narrative = SegmentNarrative::for_score(lead.score);
    assert_eq!(narrative.call_to_action.href, "/demo?segment=sovereign-founder");
}

#[test]
fn gate_back_action_returns_to_a_prefilled_wizard() {
    let mut answers = AnswerSet::default();
    for field in AnswerField::ALL {
        if field.is_binary() {
            answers.set(field, "yes").expect("binary answer accepted");
        }
    }
    answers
        .set(AnswerField::CurrentStage, "scaling")
        .expect("stage accepted");

    // the handoff between pages is a flat parameter list
    let params = answers.to_params();
    let carried = AnswerSet::from_params(
        params.iter().map(|(key, value)| (*key, value.as_str())),
    );

    let mut wizard = IntakeWizard::with_answers(carried);
    wizard.next().expect("welcome advances");

    // a carried value must not behave like a fresh selection
    let effect = wizard.select("yes").expect("selection accepted");
    assert!(effect.auto_advance.is_none());
    assert_eq!(wizard.answers().current_stage.map(|s| s.key()), Some("scaling"));
}

#[test]
fn step_sequence_is_welcome_then_binary_categorical_freetext() {
    let kinds: Vec<StepKind> = (0..TOTAL_STEPS)
        .map(|idx| IntakeWizard::step_at(idx).expect("step exists").kind)
        .collect();

    assert_eq!(kinds[0], StepKind::Welcome);
    assert!(kinds[1..=10].iter().all(|kind| *kind == StepKind::Binary));
    assert!(kinds[11..=14]
        .iter()
        .all(|kind| *kind == StepKind::Categorical));
    assert_eq!(kinds[15], StepKind::FreeText);
}
