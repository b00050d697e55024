use std::fmt::Write;

use finder_core::{
    AppViewModel, Column, DisplayRow, DisplayState, NoticeSeverity, PresentationSettings,
};

/// Pixel width of one console character cell.
const PX_PER_CHAR: u32 = 10;

/// Columns shown in the console table, in display order.
const TABLE_COLUMNS: [Column; 7] = [
    Column::Article,
    Column::Manufacturer,
    Column::SubmittedManufacturer,
    Column::Status,
    Column::Confidence,
    Column::Service,
    Column::Created,
];

pub(crate) fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    render_progress(&mut out, view);
    render_notice(&mut out, view);
    render_table(&mut out, view);
    out
}

fn render_progress(out: &mut String, view: &AppViewModel) {
    let header = if view.searching {
        format!("Search #{} running", view.search_generation)
    } else {
        "Search idle".to_string()
    };
    let _ = writeln!(out, "{} | current service: {}", header, view.current_service);
    for stage in &view.stages {
        let marker = match stage.state {
            DisplayState::Idle | DisplayState::Pending => "[ ]",
            DisplayState::Active => "[>]",
            DisplayState::Done => "[x]",
            DisplayState::Warning => "[~]",
            DisplayState::Error => "[!]",
            DisplayState::Skipped => "[-]",
        };
        let excluded = if stage.included { "" } else { " (excluded)" };
        let _ = write!(
            out,
            "  {} {:<16} {}{}",
            marker,
            stage.label,
            stage.state.label(),
            excluded
        );
        if let Some(message) = &stage.message {
            let _ = write!(out, " - {message}");
        }
        out.push('\n');
    }
}

fn render_notice(out: &mut String, view: &AppViewModel) {
    if let Some(notice) = &view.notice {
        let prefix = match notice.severity {
            NoticeSeverity::Info => "info",
            NoticeSeverity::Warning => "warning",
            NoticeSeverity::Error => "error",
        };
        let _ = writeln!(out, "{}: {}", prefix, notice.text);
    }
}

fn render_table(out: &mut String, view: &AppViewModel) {
    let settings = &view.settings;
    let _ = writeln!(
        out,
        "Records: {} shown of {} | selected: {}{}",
        view.rows.len(),
        view.total_records,
        view.selected_count,
        if view.filters_active { " | filtered" } else { "" }
    );
    if view.rows.is_empty() {
        return;
    }

    let mut header = String::from("   id   ");
    for column in TABLE_COLUMNS {
        push_cell(&mut header, column.key(), char_width(settings, column));
    }
    let _ = writeln!(out, "{}", header.trim_end());

    let spacer = "\n".repeat(row_spacing(settings));
    for table_row in &view.rows {
        let mark = if table_row.selected { '*' } else { ' ' };
        let mut line = format!("{} {:>5}  ", mark, table_row.row.id);
        for column in TABLE_COLUMNS {
            push_cell(
                &mut line,
                cell(&table_row.row, column),
                char_width(settings, column),
            );
        }
        let _ = writeln!(out, "{}", line.trim_end());
        out.push_str(&spacer);
    }
}

fn cell(row: &DisplayRow, column: Column) -> &str {
    match column {
        Column::Article => &row.part_number,
        Column::Manufacturer => &row.manufacturer,
        Column::Alias => &row.alias,
        Column::SubmittedManufacturer => &row.submitted_manufacturer,
        Column::Status => &row.status,
        Column::Confidence => &row.confidence,
        Column::Service => &row.service,
        Column::Source => &row.source,
        Column::Created => &row.created,
        Column::Produces => &row.produces,
        Column::Website => &row.website,
        Column::Aliases => &row.aliases,
        Column::Country => &row.country,
    }
}

/// Fit-to-screen ignores stored widths and uses the floor for every column.
fn char_width(settings: &PresentationSettings, column: Column) -> usize {
    let px = if settings.fit_to_screen {
        finder_core::MIN_COLUMN_WIDTH
    } else {
        settings.column_width(column)
    };
    (px / PX_PER_CHAR).max(4) as usize
}

fn row_spacing(settings: &PresentationSettings) -> usize {
    ((settings.row_height() / finder_core::MIN_ROW_HEIGHT).saturating_sub(1)) as usize
}

fn push_cell(line: &mut String, text: &str, width: usize) {
    let count = text.chars().count();
    if count > width {
        let truncated: String = text.chars().take(width.saturating_sub(1)).collect();
        line.push_str(&truncated);
        line.push('…');
    } else {
        line.push_str(text);
        line.extend(std::iter::repeat(' ').take(width - count));
    }
    line.push(' ');
}
