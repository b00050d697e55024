use std::sync::Once;

use finder_core::{
    update, AppState, DisplayState, Effect, Msg, NoticeSeverity, RemoteFailure,
    RemoteFailureKind, SearchGeneration, SearchItem, SearchResultItem, StageName,
    StageOutcome, StageReport, PLACEHOLDER, SIMULATED_STAGE_PERIOD,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(finder_logging::initialize_for_tests);
}

fn submit(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::PartsInputChanged(input.to_string()));
    update(state, Msg::SearchSubmitted)
}

fn started_generation(effects: &[Effect]) -> SearchGeneration {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::StartTicker { generation, .. } => Some(*generation),
            _ => None,
        })
        .expect("start ticker effect")
}

fn stage_states(state: &AppState) -> Vec<DisplayState> {
    state.board().entries().iter().map(|entry| entry.state).collect()
}

fn result_with_history(history: Vec<StageReport>, manufacturer: Option<&str>) -> SearchResultItem {
    SearchResultItem {
        part_number: "ABC-123".to_string(),
        manufacturer_name: manufacturer.map(str::to_string),
        alias_used: None,
        confidence: None,
        source_url: None,
        search_stage: None,
        stage_history: history,
        submitted_manufacturer: None,
        match_status: None,
        match_confidence: None,
        what_produces: None,
        website: None,
        manufacturer_aliases: None,
        country: None,
    }
}

#[test]
fn submit_starts_simulator_and_search() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "ABC-123\n");

    assert_eq!(
        effects,
        vec![
            Effect::StopTicker,
            Effect::StartTicker {
                generation: 1,
                period: SIMULATED_STAGE_PERIOD,
                max_ticks: 2,
            },
            Effect::RunSearch {
                generation: 1,
                items: vec![SearchItem::new("ABC-123")],
                stages: None,
            },
        ]
    );
    assert_eq!(
        stage_states(&state),
        vec![DisplayState::Active, DisplayState::Pending, DisplayState::Pending]
    );
    let view = state.view();
    assert!(view.searching);
    assert_eq!(view.current_service, StageName::Internet.label());
}

#[test]
fn every_simulated_frame_keeps_the_ordering_invariant() {
    init_logging();
    let (mut state, effects) = submit(AppState::new(), "ABC-123");
    let generation = started_generation(&effects);
    assert!(state.board().invariant_holds());

    for _ in 0..5 {
        let (next, effects) = update(state, Msg::SimulatorTick { generation });
        assert!(effects.is_empty());
        assert!(next.board().invariant_holds());
        let active = next
            .board()
            .entries()
            .iter()
            .filter(|entry| entry.state == DisplayState::Active)
            .count();
        assert!(active <= 1);
        state = next;
    }

    assert_eq!(state.simulator().cursor(), state.simulator().last_cursor());
    assert_eq!(
        stage_states(&state),
        vec![DisplayState::Done, DisplayState::Done, DisplayState::Active]
    );
}

#[test]
fn restarting_supersedes_the_previous_run() {
    init_logging();
    let (state, first) = submit(AppState::new(), "ABC-123");
    let first_generation = started_generation(&first);
    let (state, _) = update(state, Msg::SimulatorTick { generation: first_generation });
    let (state, second) = update(state, Msg::SearchSubmitted);
    let second_generation = started_generation(&second);

    assert!(second_generation > first_generation);
    assert_eq!(second[0], Effect::StopTicker);
    assert_eq!(
        second.iter().filter(|e| matches!(e, Effect::StartTicker { .. })).count(),
        1
    );
    assert_eq!(state.simulator().running_generation(), Some(second_generation));

    // A late tick from the first run must not move the new cursor.
    let (state, _) = update(state, Msg::SimulatorTick { generation: first_generation });
    assert_eq!(state.simulator().cursor(), 0);
    assert_eq!(stage_states(&state)[0], DisplayState::Active);
}

#[test]
fn stale_response_does_not_overwrite_newer_search() {
    init_logging();
    let (state, first) = submit(AppState::new(), "ABC-123");
    let first_generation = started_generation(&first);
    let (state, second) = update(state, Msg::SearchSubmitted);
    let second_generation = started_generation(&second);

    let stale = vec![result_with_history(
        vec![StageReport::new(StageName::Internet, StageOutcome::Success)],
        Some("Bosch"),
    )];
    let (state, effects) = update(
        state,
        Msg::SearchSettled {
            generation: first_generation,
            result: Ok(stale),
        },
    );

    assert_eq!(effects, vec![Effect::FetchRecords]);
    assert!(state.view().searching);
    assert_eq!(state.simulator().running_generation(), Some(second_generation));
    assert_eq!(stage_states(&state)[0], DisplayState::Active);
}

#[test]
fn late_settle_of_superseded_search_still_refreshes_records() {
    init_logging();
    let (state, first) = submit(AppState::new(), "ABC-123");
    let first_generation = started_generation(&first);
    let (state, second) = update(state, Msg::SearchSubmitted);
    let second_generation = started_generation(&second);

    let (state, effects) = update(
        state,
        Msg::SearchSettled {
            generation: second_generation,
            result: Ok(vec![result_with_history(
                vec![StageReport::new(StageName::Internet, StageOutcome::Success)],
                Some("Bosch"),
            )]),
        },
    );
    assert_eq!(effects, vec![Effect::StopTicker, Effect::FetchRecords]);
    let settled_board = state.board().clone();
    let settled_notice = state.notice().cloned();

    let (state, effects) = update(
        state,
        Msg::SearchSettled {
            generation: first_generation,
            result: Ok(vec![result_with_history(
                vec![StageReport::new(StageName::Internet, StageOutcome::NoResults)],
                None,
            )]),
        },
    );

    assert_eq!(effects, vec![Effect::FetchRecords]);
    assert_eq!(state.board(), &settled_board);
    assert_eq!(state.notice().cloned(), settled_notice);
    assert!(!state.view().searching);
}

#[test]
fn end_to_end_simulation_then_reconciliation() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "ABC-123");
    let generation = started_generation(&effects);
    assert_eq!(stage_states(&state)[0], DisplayState::Active);

    // One simulator period passes without a response.
    let (state, _) = update(state, Msg::SimulatorTick { generation });
    assert_eq!(
        stage_states(&state),
        vec![DisplayState::Done, DisplayState::Active, DisplayState::Pending]
    );

    let history = vec![
        StageReport::new(StageName::Internet, StageOutcome::NoResults),
        StageReport::new(StageName::GoogleSearch, StageOutcome::Success)
            .with_message("matched via CSE"),
    ];
    let (state, effects) = update(
        state,
        Msg::SearchSettled {
            generation,
            result: Ok(vec![result_with_history(history, Some("Bosch"))]),
        },
    );

    assert_eq!(effects, vec![Effect::StopTicker, Effect::FetchRecords]);
    assert_eq!(
        stage_states(&state),
        vec![DisplayState::Error, DisplayState::Done, DisplayState::Pending]
    );
    assert_eq!(
        state.board().entry(StageName::GoogleSearch).message.as_deref(),
        Some("matched via CSE")
    );
    let view = state.view();
    assert_eq!(view.current_service, StageName::GoogleSearch.label());
    assert!(!view.searching);

    // A tick that was already queued when the response landed changes nothing.
    let before = state.board().clone();
    let (state, _) = update(state, Msg::SimulatorTick { generation });
    assert_eq!(state.board(), &before);
}

#[test]
fn zero_results_reconcile_and_show_notice() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "NOPE-1");
    let generation = started_generation(&effects);
    let history = vec![
        StageReport::new(StageName::Internet, StageOutcome::NoResults),
        StageReport::new(StageName::GoogleSearch, StageOutcome::NoResults),
        StageReport::new(StageName::OpenAi, StageOutcome::Skipped),
    ];
    let (state, _) = update(
        state,
        Msg::SearchSettled {
            generation,
            result: Ok(vec![result_with_history(history, None)]),
        },
    );

    assert_eq!(
        stage_states(&state),
        vec![DisplayState::Error, DisplayState::Error, DisplayState::Skipped]
    );
    let view = state.view();
    assert_eq!(view.current_service, PLACEHOLDER);
    let notice = view.notice.expect("no results notice");
    assert_eq!(notice.severity, NoticeSeverity::Warning);
    assert_eq!(notice.text, "No results");
}

#[test]
fn batch_search_reconciles_from_last_item_with_history() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "A-1\nB-2; Festo\n");
    let generation = started_generation(&effects);
    match &effects[2] {
        Effect::RunSearch { items, .. } => {
            assert_eq!(items[1], SearchItem::new("B-2").with_hint("Festo"));
        }
        other => panic!("unexpected effect {other:?}"),
    }

    let results = vec![
        result_with_history(
            vec![StageReport::new(StageName::Internet, StageOutcome::Success)],
            Some("Bosch"),
        ),
        result_with_history(
            vec![StageReport::new(StageName::Internet, StageOutcome::LowConfidence)],
            None,
        ),
        result_with_history(Vec::new(), None),
    ];
    let (state, _) = update(
        state,
        Msg::SearchSettled {
            generation,
            result: Ok(results),
        },
    );
    assert_eq!(stage_states(&state)[0], DisplayState::Warning);
    assert_eq!(state.view().notice.unwrap().text, "Found 1 of 3");
}

#[test]
fn remote_failure_resets_to_idle() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "ABC-123");
    let generation = started_generation(&effects);
    let (state, _) = update(state, Msg::SimulatorTick { generation });

    let (state, effects) = update(
        state,
        Msg::SearchSettled {
            generation,
            result: Err(RemoteFailure::new(RemoteFailureKind::Network, "connection refused")),
        },
    );

    assert_eq!(effects, vec![Effect::StopTicker, Effect::FetchRecords]);
    assert!(state.board().is_idle());
    assert!(!state.simulator().is_running());
    let view = state.view();
    assert_eq!(view.current_service, PLACEHOLDER);
    assert_eq!(view.notice.unwrap().severity, NoticeSeverity::Error);
}

#[test]
fn empty_input_is_rejected_before_any_request() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "  \n\n ; hint-only\n");

    assert!(effects.is_empty());
    assert!(state.board().is_idle());
    assert!(!state.simulator().is_running());
    assert_eq!(state.search_generation(), 0);
    assert_eq!(state.view().notice.unwrap().severity, NoticeSeverity::Warning);
}

#[test]
fn empty_input_during_search_leaves_progress_alone() {
    init_logging();
    let (state, _) = submit(AppState::new(), "ABC-123");
    let (state, _) = update(state, Msg::PartsInputChanged(String::new()));
    let (state, effects) = update(state, Msg::SearchSubmitted);

    assert!(effects.is_empty());
    assert!(state.simulator().is_running());
    assert_eq!(stage_states(&state)[0], DisplayState::Active);
}

#[test]
fn stage_subset_is_sent_with_the_search() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::StageToggled(StageName::OpenAi));
    let view = state.view();
    assert!(!view.stages[2].included);
    assert!(view.stages[0].included);

    let (state, effects) = submit(state, "ABC-123");
    match &effects[2] {
        Effect::RunSearch { stages, .. } => assert_eq!(
            stages.as_deref(),
            Some(&[StageName::Internet, StageName::GoogleSearch][..])
        ),
        other => panic!("unexpected effect {other:?}"),
    }

    let (state, _) = update(state, Msg::StageToggled(StageName::OpenAi));
    let (_, effects) = update(state, Msg::SearchSubmitted);
    assert!(matches!(&effects[2], Effect::RunSearch { stages: None, .. }));
}

#[test]
fn excluded_stages_are_not_simulated() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::StageToggled(StageName::Internet));
    let (state, _) = update(state, Msg::StageToggled(StageName::GoogleSearch));
    let (state, effects) = submit(state, "ABC-123");

    assert!(matches!(
        &effects[1],
        Effect::StartTicker { max_ticks: 0, .. }
    ));
    assert_eq!(
        stage_states(&state),
        vec![DisplayState::Skipped, DisplayState::Skipped, DisplayState::Active]
    );
    assert_eq!(state.board().current_service(), Some(StageName::OpenAi));
    assert!(state.board().invariant_holds());
}

#[test]
fn closing_the_view_stops_the_timer() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "ABC-123");
    let generation = started_generation(&effects);
    let (state, effects) = update(state, Msg::ViewClosed);

    assert_eq!(effects, vec![Effect::StopTicker]);
    assert!(state.board().is_idle());

    let (state, effects) = update(
        state,
        Msg::SearchSettled {
            generation,
            result: Ok(Vec::new()),
        },
    );
    assert!(effects.is_empty());
    assert!(state.board().is_idle());
}

#[test]
fn unauthorized_settle_resets_session_but_keeps_counting() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "ABC-123");
    let generation = started_generation(&effects);
    let (state, effects) = update(
        state,
        Msg::SearchSettled {
            generation,
            result: Err(RemoteFailure::new(RemoteFailureKind::Unauthorized, "401")),
        },
    );

    assert_eq!(effects, vec![Effect::StopTicker, Effect::SessionReset]);
    assert!(state.board().is_idle());
    assert_eq!(state.search_generation(), generation);

    let (_, effects) = submit(state, "ABC-123");
    assert_eq!(started_generation(&effects), generation + 1);
}
