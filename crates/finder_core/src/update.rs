use finder_logging::{finder_debug, finder_info, finder_warn};

use crate::reconcile::reconcile;
use crate::record::{parse_search_items, SearchItem, SearchResultItem};
use crate::simulator::{SearchGeneration, SIMULATED_STAGE_PERIOD};
use crate::state::Notice;
use crate::{AppState, Effect, Msg, RemoteFailure};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PartsInputChanged(raw) => {
            state.set_parts_input(raw);
            Vec::new()
        }
        Msg::SearchSubmitted => {
            let items = parse_search_items(state.parts_input());
            if items.is_empty() {
                reject_empty_search(&mut state, "Enter at least one part number");
                return (state, Vec::new());
            }
            start_search(&mut state, items)
        }
        Msg::SearchSelectedClicked => {
            let items = state.selected_search_items();
            if items.is_empty() {
                reject_empty_search(&mut state, "Select at least one row to search");
                return (state, Vec::new());
            }
            start_search(&mut state, items)
        }
        Msg::StageToggled(stage) => {
            state.toggle_stage(stage);
            Vec::new()
        }
        Msg::SimulatorTick { generation } => {
            // The timer task ends itself after the last stage; nothing to emit here.
            state.apply_tick(generation);
            Vec::new()
        }
        Msg::SearchSettled { generation, result } => settle_search(&mut state, generation, result),
        Msg::RefreshRequested => vec![Effect::FetchRecords],
        Msg::RecordsLoaded(Ok(records)) => {
            finder_debug!("Loaded {} record(s)", records.len());
            state.replace_records(records);
            Vec::new()
        }
        Msg::RecordsLoaded(Err(failure)) => {
            if failure.is_unauthorized() {
                return unauthorized(state);
            }
            finder_warn!("Record listing failed: {}", failure.message);
            state.set_notice(Notice::error("Could not load records"));
            Vec::new()
        }
        Msg::CreateSubmitted(item) => {
            let part_number = item.part_number.trim();
            if part_number.is_empty() {
                state.set_notice(Notice::warning("Part number is required"));
                return (state, Vec::new());
            }
            let item = SearchItem {
                part_number: part_number.to_string(),
                manufacturer_hint: item
                    .manufacturer_hint
                    .map(|hint| hint.trim().to_string())
                    .filter(|hint| !hint.is_empty()),
            };
            vec![Effect::CreateRecord(item)]
        }
        Msg::RecordCreated(Ok(record)) => {
            state.set_notice(Notice::info(format!("Added {}", record.part_number)));
            vec![Effect::FetchRecords]
        }
        Msg::RecordCreated(Err(failure)) => {
            if failure.is_unauthorized() {
                return unauthorized(state);
            }
            finder_warn!("Record creation failed: {}", failure.message);
            state.set_notice(Notice::error("Could not add the part"));
            Vec::new()
        }
        Msg::DeleteSelectedClicked => {
            let ids = state.selection().snapshot();
            if ids.is_empty() {
                state.set_notice(Notice::warning("Select at least one row to delete"));
                return (state, Vec::new());
            }
            finder_info!("Deleting {} record(s)", ids.len());
            vec![Effect::DeleteRecords { ids }]
        }
        Msg::RecordsDeleted { requested, result } => match result {
            Ok(()) => {
                state.set_notice(Notice::info(format!("Deleted {requested} record(s)")));
                vec![Effect::FetchRecords]
            }
            Err(failure) if failure.is_unauthorized() => return unauthorized(state),
            Err(failure) => {
                finder_warn!("Batch delete of {} failed: {}", requested, failure.message);
                state.set_notice(Notice::error("Some records could not be deleted"));
                vec![Effect::FetchRecords]
            }
        },
        Msg::ImportCompleted(summary) => {
            let mut text = format!(
                "Imported {}, skipped {}",
                summary.imported, summary.skipped
            );
            let notice = match summary.errors.first() {
                Some(first) => {
                    text.push_str(&format!(" ({} error(s), first: {first})", summary.errors.len()));
                    Notice::warning(text)
                }
                None => Notice::info(text),
            };
            state.set_notice(notice);
            vec![Effect::FetchRecords]
        }
        Msg::TextFilterChanged { column, text } => {
            state.filters_mut().set_text(column, &text);
            state.refilter();
            Vec::new()
        }
        Msg::MatchStatusFilterChanged(filter) => {
            state.filters_mut().match_status = filter;
            state.refilter();
            Vec::new()
        }
        Msg::FoundFilterChanged(filter) => {
            state.filters_mut().found = filter;
            state.refilter();
            Vec::new()
        }
        Msg::FiltersCleared => {
            *state.filters_mut() = Default::default();
            state.refilter();
            Vec::new()
        }
        Msg::RowToggled(id) => {
            let (selection, visible) = state.selection_mut();
            if !selection.toggle(id, visible) {
                finder_debug!("Ignoring toggle of hidden row {}", id);
            }
            Vec::new()
        }
        Msg::SelectAllVisible => {
            let (selection, visible) = state.selection_mut();
            selection.select_all(visible);
            Vec::new()
        }
        Msg::SelectionCleared => {
            state.selection_mut().0.clear();
            Vec::new()
        }
        Msg::ColumnResizeStarted(column) => {
            state.start_column_drag(column);
            Vec::new()
        }
        Msg::ColumnResizeMoved { offset } => {
            if state.move_column_drag(offset) {
                persist(&state)
            } else {
                Vec::new()
            }
        }
        Msg::ColumnResizeEnded => {
            state.end_column_drag();
            Vec::new()
        }
        Msg::RowHeightChanged(height) => {
            state.settings_mut().set_row_height(height);
            persist(&state)
        }
        Msg::FontSizeChanged(font_size) => {
            state.settings_mut().font_size = font_size;
            persist(&state)
        }
        Msg::DensityChanged(density) => {
            state.settings_mut().density = density;
            persist(&state)
        }
        Msg::FullscreenToggled => {
            let settings = state.settings_mut();
            settings.fullscreen = !settings.fullscreen;
            persist(&state)
        }
        Msg::FitToScreenToggled => {
            let settings = state.settings_mut();
            settings.fit_to_screen = !settings.fit_to_screen;
            persist(&state)
        }
        Msg::SettingsRestored(settings) => {
            state.replace_settings(settings);
            Vec::new()
        }
        Msg::NoticeDismissed => {
            state.dismiss_notice();
            Vec::new()
        }
        Msg::ViewClosed => {
            state.end_search();
            reconcile(state.board_mut(), None);
            vec![Effect::StopTicker]
        }
        Msg::Unauthorized => return unauthorized(state),
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start_search(state: &mut AppState, items: Vec<SearchItem>) -> Vec<Effect> {
    let generation = state.begin_search();
    finder_info!(
        "Search #{} started for {} item(s)",
        generation,
        items.len()
    );
    vec![
        Effect::StopTicker,
        Effect::StartTicker {
            generation,
            period: SIMULATED_STAGE_PERIOD,
            max_ticks: state.simulator().max_ticks(),
        },
        Effect::RunSearch {
            generation,
            items,
            stages: state.requested_stages(),
        },
    ]
}

/// Validation failure: no request, no simulator. An idle board gets the no-op reset.
fn reject_empty_search(state: &mut AppState, text: &str) {
    state.set_notice(Notice::warning(text));
    if !state.has_search_in_flight() {
        reconcile(state.board_mut(), None);
    }
}

fn settle_search(
    state: &mut AppState,
    generation: SearchGeneration,
    result: Result<Vec<SearchResultItem>, RemoteFailure>,
) -> Vec<Effect> {
    if !state.is_current_search(generation) {
        // The superseded search still ran on the backend; only its progress is dropped.
        finder_debug!("Discarding progress of stale search #{}", generation);
        return vec![Effect::FetchRecords];
    }
    // Stop first: no tick may land on top of the reconciled board.
    state.end_search();
    let mut effects = vec![Effect::StopTicker];

    match result {
        Ok(results) => {
            let history = results
                .iter()
                .rev()
                .find(|item| !item.stage_history.is_empty())
                .map(|item| item.stage_history.as_slice());
            reconcile(state.board_mut(), history);

            let found = results.iter().filter(|item| item.found_manufacturer()).count();
            finder_info!(
                "Search #{} settled: {} of {} found",
                generation,
                found,
                results.len()
            );
            let notice = if found == 0 {
                Notice::warning("No results")
            } else {
                Notice::info(format!("Found {found} of {}", results.len()))
            };
            state.set_notice(notice);
        }
        Err(failure) if failure.is_unauthorized() => {
            finder_warn!("Search #{} rejected the credential; resetting session", generation);
            state.reset_session();
            effects.push(Effect::SessionReset);
            return effects;
        }
        Err(failure) => {
            finder_warn!("Search #{} failed: {}", generation, failure.message);
            reconcile(state.board_mut(), None);
            state.set_notice(Notice::error("Search failed"));
        }
    }
    effects.push(Effect::FetchRecords);
    effects
}

fn unauthorized(mut state: AppState) -> (AppState, Vec<Effect>) {
    finder_warn!("Credential rejected; resetting session");
    state.reset_session();
    (state, vec![Effect::StopTicker, Effect::SessionReset])
}

fn persist(state: &AppState) -> Vec<Effect> {
    vec![Effect::PersistSettings(state.settings().clone())]
}
