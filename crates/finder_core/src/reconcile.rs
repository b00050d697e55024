use finder_logging::finder_warn;

use crate::progress::ProgressBoard;
use crate::stage::{DisplayState, StageName, StageOutcome, StageReport};

/// Replaces whatever the board shows with the authoritative stage history.
///
/// `None`, or a history naming none of the known stages, is a full reset to
/// idle. Known stages missing from the history were never reached and show as
/// pending. If a stage is reported more than once the later entry wins.
pub fn reconcile(board: &mut ProgressBoard, history: Option<&[StageReport]>) {
    let Some(reports) = history else {
        board.reset_idle();
        return;
    };

    let latest = latest_reports(reports);
    if latest.iter().all(Option::is_none) {
        board.reset_idle();
        return;
    }

    for stage in StageName::ALL {
        match latest[stage.index()] {
            Some(report) => {
                board.set_stage(stage, report.status.display_state(), report.message.clone())
            }
            None => board.set_stage(stage, DisplayState::Pending, None),
        }
    }
    board.set_current_service(current_service_of(&latest));
}

/// The last stage that succeeded; failing that the first low-confidence stage.
///
/// Only the latest report of each stage counts, so a stage that succeeded and
/// was then reported as failing is not the current service.
pub fn resolve_current_service(reports: &[StageReport]) -> Option<StageName> {
    current_service_of(&latest_reports(reports))
}

type LatestReports<'a> = [Option<&'a StageReport>; StageName::ALL.len()];

fn latest_reports(reports: &[StageReport]) -> LatestReports<'_> {
    let mut latest: LatestReports<'_> = [None; StageName::ALL.len()];
    for report in reports {
        match report.stage() {
            Some(stage) => latest[stage.index()] = Some(report),
            None => finder_warn!("Ignoring unknown stage {:?} in history", report.name),
        }
    }
    latest
}

fn current_service_of(latest: &LatestReports<'_>) -> Option<StageName> {
    let settled = || {
        StageName::ALL
            .into_iter()
            .filter_map(|stage| latest[stage.index()].map(|report| (stage, report.status)))
    };
    settled()
        .filter(|(_, status)| *status == StageOutcome::Success)
        .last()
        .or_else(|| settled().find(|(_, status)| *status == StageOutcome::LowConfidence))
        .map(|(stage, _)| stage)
}
