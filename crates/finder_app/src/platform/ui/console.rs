use finder_core::{
    parse_search_items, Column, Density, FontSize, FoundFilter, MatchStatusFilter, Msg, PartId,
    StageName, TextColumn,
};
use thiserror::Error;

pub(crate) const HELP: &str = "\
commands:
  search [PART[;HINT], ...]    set the parts input (optional) and run the lookup
  search-selected              re-run the lookup for the selected records
  stage <internet|googlesearch|openai>   include/exclude a stage
  add PART[;HINT]              create one record
  refresh                      reload records
  filter <column> [text]       article|manufacturer|alias|submitted|service|source
  status <all|matched|mismatch|pending|none>
  found <all|found|missing>
  clear-filters
  select <id>                  toggle a visible row
  select-all | clear-selection | delete
  width <column> <offset>      drag a column edge by offset px
  rows <px> | font <small|medium|large> | density <compact|comfortable|spacious>
  fullscreen | fit | dismiss | logout | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ConsoleCommand {
    Dispatch(Vec<Msg>),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ParseError {
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
    #[error("'{command}' needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("'{value}' is not a valid {expected}")]
    InvalidArgument {
        value: String,
        expected: &'static str,
    },
}

/// Turns one stdin line into the messages it stands for.
pub(crate) fn parse_command(line: &str) -> Result<ConsoleCommand, ParseError> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let msgs = match command.to_ascii_lowercase().as_str() {
        "" => vec![],
        "help" | "?" => return Ok(ConsoleCommand::Help),
        "quit" | "exit" => return Ok(ConsoleCommand::Quit),
        "search" if rest.is_empty() => vec![Msg::SearchSubmitted],
        "search" => vec![
            Msg::PartsInputChanged(rest.split(',').collect::<Vec<_>>().join("\n")),
            Msg::SearchSubmitted,
        ],
        "search-selected" => vec![Msg::SearchSelectedClicked],
        "stage" => {
            let name = required(rest, "stage", "a stage name")?;
            let stage = StageName::from_wire(name).ok_or_else(|| invalid(name, "stage"))?;
            vec![Msg::StageToggled(stage)]
        }
        "add" => {
            let raw = required(rest, "add", "a part number")?;
            let item = parse_search_items(raw)
                .into_iter()
                .next()
                .ok_or_else(|| invalid(raw, "part"))?;
            vec![Msg::CreateSubmitted(item)]
        }
        "refresh" => vec![Msg::RefreshRequested],
        "filter" => {
            let (key, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let key = required(key, "filter", "a column")?;
            let column = TextColumn::from_key(key).ok_or_else(|| invalid(key, "filter column"))?;
            vec![Msg::TextFilterChanged {
                column,
                text: text.trim().to_string(),
            }]
        }
        "status" => {
            let key = required(rest, "status", "a match status")?;
            let filter =
                MatchStatusFilter::from_key(key).ok_or_else(|| invalid(key, "match status"))?;
            vec![Msg::MatchStatusFilterChanged(filter)]
        }
        "found" => {
            let key = required(rest, "found", "all, found or missing")?;
            let filter = FoundFilter::from_key(key).ok_or_else(|| invalid(key, "found filter"))?;
            vec![Msg::FoundFilterChanged(filter)]
        }
        "clear-filters" => vec![Msg::FiltersCleared],
        "select" => {
            let raw = required(rest, "select", "a record id")?;
            let id: PartId = raw.parse().map_err(|_| invalid(raw, "record id"))?;
            vec![Msg::RowToggled(id)]
        }
        "select-all" => vec![Msg::SelectAllVisible],
        "clear-selection" => vec![Msg::SelectionCleared],
        "delete" => vec![Msg::DeleteSelectedClicked],
        "width" => {
            let mut parts = rest.split_whitespace();
            let key = parts.next().ok_or(ParseError::MissingArgument {
                command: "width",
                expected: "a column and an offset",
            })?;
            let column = Column::from_key(key).ok_or_else(|| invalid(key, "column"))?;
            let raw = parts.next().ok_or(ParseError::MissingArgument {
                command: "width",
                expected: "an offset",
            })?;
            let offset: i64 = raw.parse().map_err(|_| invalid(raw, "offset"))?;
            vec![
                Msg::ColumnResizeStarted(column),
                Msg::ColumnResizeMoved { offset },
                Msg::ColumnResizeEnded,
            ]
        }
        "rows" => {
            let raw = required(rest, "rows", "a height in px")?;
            let height: u32 = raw.parse().map_err(|_| invalid(raw, "row height"))?;
            vec![Msg::RowHeightChanged(height)]
        }
        "font" => {
            let key = required(rest, "font", "a font size")?;
            let size = FontSize::from_key(key).ok_or_else(|| invalid(key, "font size"))?;
            vec![Msg::FontSizeChanged(size)]
        }
        "density" => {
            let key = required(rest, "density", "a density")?;
            let density = Density::from_key(key).ok_or_else(|| invalid(key, "density"))?;
            vec![Msg::DensityChanged(density)]
        }
        "fullscreen" => vec![Msg::FullscreenToggled],
        "fit" => vec![Msg::FitToScreenToggled],
        "dismiss" => vec![Msg::NoticeDismissed],
        "logout" => vec![Msg::Unauthorized],
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(ConsoleCommand::Dispatch(msgs))
}

fn required<'a>(
    value: &'a str,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, ParseError> {
    if value.is_empty() {
        Err(ParseError::MissingArgument { command, expected })
    } else {
        Ok(value)
    }
}

fn invalid(value: &str, expected: &'static str) -> ParseError {
    ParseError::InvalidArgument {
        value: value.to_string(),
        expected,
    }
}
