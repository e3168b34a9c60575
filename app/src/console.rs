//! FILENAME: app/src/console.rs
//! PURPOSE: Line commands for the REPL and a plain-text table renderer.
//! CONTEXT: `main` reads stdin line by line, parses each line into a
//! `ConsoleCommand`, runs it through the command layer and prints
//! `render_view` of the result.

use std::path::PathBuf;
use table_engine::{ColumnAlign, PageNav, SortIndicator, TableView, ALL_ROWS_OPTION};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::commands;
use crate::AppState;

/// Widest a rendered column may get before cells are truncated.
const MAX_COLUMN_WIDTH: usize = 30;

pub const HELP_TEXT: &str = "\
Commands:
  show                       redraw the table
  search <text>              global filter (empty clears)
  filter <column> <value>    toggle a value in a column filter
  suggest <column> <text>    type into a column search box
  pick <column> <value>      toggle a suggested value
  dropdown <column>          show/hide a column's suggestion list
  sort <column>              sort by column, again to reverse
  unsort                     drop the sort
  page <n|first|prev|next|last>
  size <n|all>               rows per page
  clear [column]             clear one column filter, or all filters
  export [path]              write all rows to an xlsx workbook
  help
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTarget {
    Number(usize),
    Nav(PageNav),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Show,
    Search(String),
    Filter { column: String, value: String },
    Suggest { column: String, text: String },
    Pick { column: String, value: String },
    Dropdown(String),
    Sort(String),
    Unsort,
    Page(PageTarget),
    /// Selector value; -1 is all rows
    Size(i64),
    Clear(Option<String>),
    Export(Option<PathBuf>),
    Help,
    Quit,
}

/// What the REPL should do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Render(TableView),
    Message(String),
    Quit,
}

impl ConsoleCommand {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let args = shell_words::split(line).map_err(|e| format!("Invalid input: {}", e))?;
        let Some((name, rest)) = args.split_first() else {
            return Ok(None);
        };

        let command = match name.to_lowercase().as_str() {
            "show" | "ls" => ConsoleCommand::Show,
            "search" => ConsoleCommand::Search(rest.join(" ")),
            "filter" => {
                let (column, value) = column_and_rest(rest, "filter <column> <value>")?;
                ConsoleCommand::Filter { column, value }
            }
            "suggest" => {
                let column = first_arg(rest, "suggest <column> <text>")?;
                ConsoleCommand::Suggest {
                    column,
                    text: rest[1..].join(" "),
                }
            }
            "pick" => {
                let (column, value) = column_and_rest(rest, "pick <column> <value>")?;
                ConsoleCommand::Pick { column, value }
            }
            "dropdown" => ConsoleCommand::Dropdown(first_arg(rest, "dropdown <column>")?),
            "sort" => ConsoleCommand::Sort(first_arg(rest, "sort <column>")?),
            "unsort" => ConsoleCommand::Unsort,
            "page" => {
                let arg = first_arg(rest, "page <n|first|prev|next|last>")?;
                ConsoleCommand::Page(parse_page_target(&arg)?)
            }
            "size" => {
                let arg = first_arg(rest, "size <n|all>")?;
                ConsoleCommand::Size(parse_size(&arg)?)
            }
            "clear" => ConsoleCommand::Clear(rest.first().cloned()),
            "export" => ConsoleCommand::Export(rest.first().map(PathBuf::from)),
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" | "q" => ConsoleCommand::Quit,
            other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
        };
        Ok(Some(command))
    }

    /// Run against the shared state.
    pub fn execute(self, state: &AppState) -> Result<Outcome, String> {
        let view = match self {
            ConsoleCommand::Show => commands::get_table_view(state)?,
            ConsoleCommand::Search(text) => commands::set_global_filter(state, &text)?,
            ConsoleCommand::Filter { column, value } => {
                commands::toggle_column_filter(state, &column, &value)?
            }
            ConsoleCommand::Suggest { column, text } => {
                commands::search_column(state, &column, &text)?
            }
            ConsoleCommand::Pick { column, value } => {
                commands::select_suggestion(state, &column, &value)?
            }
            ConsoleCommand::Dropdown(column) => commands::toggle_column_dropdown(state, &column)?,
            ConsoleCommand::Sort(column) => commands::toggle_sort(state, &column)?,
            ConsoleCommand::Unsort => commands::clear_sort(state)?,
            ConsoleCommand::Page(PageTarget::Number(n)) => commands::set_page(state, n)?,
            ConsoleCommand::Page(PageTarget::Nav(nav)) => commands::navigate_page(state, nav)?,
            ConsoleCommand::Size(value) => commands::select_page_size(state, value)?,
            ConsoleCommand::Clear(Some(column)) => commands::clear_column_filter(state, &column)?,
            ConsoleCommand::Clear(None) => commands::clear_all_filters(state)?,
            ConsoleCommand::Export(path) => {
                let result = commands::export_to_excel(state, path);
                return match result.error {
                    None => Ok(Outcome::Message(format!(
                        "Exported {} rows to {}",
                        result.row_count,
                        result.path.display()
                    ))),
                    Some(e) => Err(e),
                };
            }
            ConsoleCommand::Help => return Ok(Outcome::Message(HELP_TEXT.to_string())),
            ConsoleCommand::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Render(view))
    }
}

fn first_arg(rest: &[String], usage: &str) -> Result<String, String> {
    rest.first()
        .cloned()
        .ok_or_else(|| format!("Usage: {}", usage))
}

fn column_and_rest(rest: &[String], usage: &str) -> Result<(String, String), String> {
    if rest.len() < 2 {
        return Err(format!("Usage: {}", usage));
    }
    Ok((rest[0].clone(), rest[1..].join(" ")))
}

fn parse_page_target(arg: &str) -> Result<PageTarget, String> {
    let target = match arg.to_lowercase().as_str() {
        "first" => PageTarget::Nav(PageNav::First),
        "prev" | "previous" => PageTarget::Nav(PageNav::Previous),
        "next" => PageTarget::Nav(PageNav::Next),
        "last" => PageTarget::Nav(PageNav::Last),
        n => PageTarget::Number(
            n.parse()
                .map_err(|_| format!("Invalid page '{}'", arg))?,
        ),
    };
    Ok(target)
}

fn parse_size(arg: &str) -> Result<i64, String> {
    if arg.eq_ignore_ascii_case("all") {
        return Ok(ALL_ROWS_OPTION);
    }
    arg.parse().map_err(|_| format!("Invalid page size '{}'", arg))
}

// ============================================================================
// RENDERING
// ============================================================================

fn header_label(header: &str, sort: SortIndicator) -> String {
    match sort {
        SortIndicator::Unsorted => header.to_string(),
        SortIndicator::Ascending => format!("{} ^", header),
        SortIndicator::Descending => format!("{} v", header),
    }
}

/// Pad or truncate `text` to exactly `width` terminal columns.
fn fit(text: &str, width: usize, align: ColumnAlign) -> String {
    let len = text.width();
    if len > width {
        let limit = width.saturating_sub(1);
        let mut cut = String::new();
        let mut used = 0;
        for c in text.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > limit {
                break;
            }
            cut.push(c);
            used += w;
        }
        cut.push('~');
        // A wide char that did not fit leaves a gap
        cut.push_str(&" ".repeat(width.saturating_sub(used + 1)));
        return cut;
    }
    let pad = width - len;
    match align {
        ColumnAlign::Left => format!("{}{}", text, " ".repeat(pad)),
        ColumnAlign::Right => format!("{}{}", " ".repeat(pad), text),
        ColumnAlign::Center => {
            let left = pad / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(pad - left))
        }
    }
}

fn render_line(cells: &[String], widths: &[usize], aligns: &[ColumnAlign]) -> String {
    let parts: Vec<String> = cells
        .iter()
        .zip(widths)
        .zip(aligns)
        .map(|((c, w), a)| fit(c, *w, *a))
        .collect();
    format!("| {} |", parts.join(" | "))
}

/// Draw the view as a text table with header, filter line, rows and footer.
pub fn render_view(view: &TableView) -> String {
    let labels: Vec<String> = view
        .columns
        .iter()
        .map(|c| header_label(&c.header, c.sort))
        .collect();
    let filters: Vec<String> = view
        .columns
        .iter()
        .map(|c| {
            if c.filter_text.is_empty() {
                String::new()
            } else {
                format!("[{}]", c.filter_text)
            }
        })
        .collect();
    let rows = view.display_rows();
    let aligns: Vec<ColumnAlign> = view.columns.iter().map(|c| c.align).collect();

    let widths: Vec<usize> = (0..view.columns.len())
        .map(|i| {
            let cells = rows.iter().map(|r| r[i].width());
            std::iter::once(labels[i].width())
                .chain(std::iter::once(filters[i].width()))
                .chain(cells)
                .max()
                .unwrap_or(0)
                .clamp(1, MAX_COLUMN_WIDTH)
        })
        .collect();

    let rule = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let mut out = Vec::new();
    out.push(format!("Search: {}", view.global_filter));
    out.push(rule.clone());
    out.push(render_line(&labels, &widths, &aligns));
    if filters.iter().any(|f| !f.is_empty()) {
        out.push(render_line(&filters, &widths, &aligns));
    }
    out.push(rule.clone());
    if rows.is_empty() {
        out.push("(no rows)".to_string());
    }
    for row in &rows {
        out.push(render_line(row, &widths, &aligns));
    }
    out.push(rule);

    for column in view.columns.iter().filter(|c| !c.suggestions.is_empty()) {
        out.push(format!(
            "Suggestions for {}: {}",
            column.header,
            column.suggestions.join(", ")
        ));
    }

    let sizes: Vec<String> = view
        .page_size_options
        .iter()
        .map(|o| {
            if o.selected {
                format!("[{}]", o.label)
            } else {
                o.label.clone()
            }
        })
        .collect();
    out.push(format!(
        "Page {} of {} ({} rows)  Rows per page: {}",
        view.page.current_page,
        view.page.total_pages,
        view.page.filtered_count,
        sizes.join(" ")
    ));

    out.join("\n")
}
