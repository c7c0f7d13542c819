use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Gauge, List, ListItem, ListState, Paragraph, Row as TableRow, Table, TableState, Tabs, Wrap},
    symbols,
};
use crate::app::App;
use crate::models::{Row, StatusKind, Tab};
use crate::store::{document_percent, percent};
use crate::theme::Theme;
use crate::utils::{centered_rect, format_hours, progress_bar};

const BAR_WIDTH: usize = 20;

/// Draws the whole screen: tabs, active view, status line and footer.
pub fn render(f: &mut Frame, app: &App, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // tabs
            Constraint::Min(1),    // body
            Constraint::Length(1), // status
            Constraint::Length(3), // footer
        ])
        .split(f.area());

    let tabs = Tabs::new(["📂 ToDos [1]", "📜 Git Log [2]"])
        .block(Block::default().borders(Borders::ALL).title("todotab"))
        .style(Style::default().fg(theme.text))
        .highlight_style(theme.tab_highlight)
        .select(app.ui.active_tab.as_index())
        .divider(symbols::DOT)
        .padding(" ", " ");
    f.render_widget(tabs, chunks[0]);

    match app.ui.active_tab {
        Tab::Todos => render_todos(f, app, theme, chunks[1]),
        Tab::Git => render_git_log(f, app, theme, chunks[1]),
    }

    if let Some(status) = &app.status {
        let style = match status.kind {
            StatusKind::Info => theme.status_info,
            StatusKind::Error => theme.status_error,
        };
        f.render_widget(Paragraph::new(status.text.clone()).style(style), chunks[2]);
    }

    let keys = match app.ui.active_tab {
        Tab::Todos => "↑/↓ j/k Move | <Space> Toggle | <Enter> Fold | ←/→ Fold/Unfold | o Open | r Reload | e Export | Tab Switch | q Quit",
        Tab::Git => "↑/↓ j/k Move | r Refresh | c Copy hash | Tab Switch | q Quit",
    };
    let footer = Paragraph::new(keys)
        .block(Block::default().borders(Borders::ALL))
        .style(theme.footer);
    f.render_widget(footer, chunks[3]);

    if let Some(input) = &app.prompt {
        render_prompt(f, input, theme);
    }
}

fn render_todos(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let Some(doc) = &app.document else {
        let placeholder = Paragraph::new("No to-do list loaded. Press 'o' to open a JSON file.")
            .block(Block::default().title("ToDos").borders(Borders::ALL))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(placeholder, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let total = document_percent(doc);
    let title = match &app.source {
        Some(path) => format!("Overall – {}", path.display()),
        None => "Overall".to_string(),
    };
    let gauge = Gauge::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .gauge_style(theme.phase_progress)
        .percent(u16::from(total))
        .label(format!("{}/{} tasks · {}%", doc.done_count(), doc.task_count(), total));
    f.render_widget(gauge, chunks[0]);

    let rows = app.visible_rows();
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| match *row {
            Row::Phase(pi) => {
                let phase = &doc.phases[pi];
                let pct = percent(&phase.tasks);
                let fold = if app.ui.is_collapsed(pi, &phase.phase) { "▸" } else { "▾" };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::raw(format!("{} ", fold)),
                        Span::styled(format!("📌 {}", phase.phase), theme.phase_title),
                        Span::styled(
                            format!("  {}/{} · {}", phase.done_count(), phase.tasks.len(), format_hours(phase.total_hours())),
                            Style::default().fg(theme.text_secondary),
                        ),
                    ]),
                    Line::from(vec![
                        Span::raw("  "),
                        Span::styled(progress_bar(pct, BAR_WIDTH), theme.phase_progress),
                        Span::raw(format!(" {:>3}%", pct)),
                    ]),
                ])
            }
            Row::Task(pi, ti) => {
                let task = &doc.phases[pi].tasks[ti];
                let (check, style) = if task.done { ("[x]", theme.task_done) } else { ("[ ]", theme.task_open) };
                let mut lines = vec![Line::from(vec![
                    Span::raw(format!("    {} ", check)),
                    Span::styled(task.title.clone(), style),
                    Span::styled(format!("  ⏱ {}", format_hours(task.hours())), theme.task_hours),
                ])];
                if !task.description.is_empty() {
                    lines.push(Line::from(Span::styled(format!("        {}", task.description), theme.task_description)));
                }
                ListItem::new(lines)
            }
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title("Phases").borders(Borders::ALL).border_style(Style::default().fg(theme.focus_border)))
        .highlight_style(Style::default().fg(theme.selection_fg).add_modifier(Modifier::BOLD))
        .highlight_symbol("→");
    let mut state = ListState::default();
    if !rows.is_empty() {
        state.select(Some(app.cursor));
    }
    f.render_stateful_widget(list, chunks[1], &mut state);
}

fn render_git_log(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let mut table_area = area;
    if let Some(err) = &app.git_error {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);
        let para = Paragraph::new(format!("⚠️ {}", err))
            .block(Block::default().borders(Borders::ALL).title("Git"))
            .wrap(Wrap { trim: true })
            .style(theme.status_error);
        f.render_widget(para, chunks[0]);
        table_area = chunks[1];
    }

    if app.commits.is_empty() {
        let placeholder = Paragraph::new("No commits loaded. Press 'r' to read the git log.")
            .block(Block::default().title("Git Log").borders(Borders::ALL))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(placeholder, table_area);
        return;
    }

    let rows = app.commits.iter().map(|c| {
        TableRow::new(vec![
            Cell::from(c.hash.clone()).style(theme.commit_hash),
            Cell::from(c.message.clone()),
            Cell::from(c.date.clone()).style(theme.commit_date),
        ])
    });
    let table = Table::new(rows, [Constraint::Length(10), Constraint::Min(10), Constraint::Length(10)])
        .header(TableRow::new(vec!["Commit", "Message", "Date"]).style(theme.table_header))
        .block(
            Block::default()
                .title(format!("Git Log – {} commits", app.commits.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.focus_border)),
        )
        .highlight_style(Style::default().fg(theme.selection_fg).add_modifier(Modifier::BOLD))
        .highlight_symbol("→");
    let mut state = TableState::default();
    state.select(Some(app.commit_cursor));
    f.render_stateful_widget(table, table_area, &mut state);
}

fn render_prompt(f: &mut Frame, input: &str, theme: &Theme) {
    let area = centered_rect(70, 20, f.area());
    let popup_area = Rect { height: area.height.max(3), ..area };
    f.render_widget(Clear, popup_area);
    let block = Block::default()
        .title(Span::styled("Open JSON file (Enter to load, Esc to cancel)", theme.popup_title))
        .borders(Borders::ALL)
        .style(theme.popup_border);
    let para = Paragraph::new(format!("{}▏", input))
        .block(block)
        .style(Style::default().fg(theme.text));
    f.render_widget(para, popup_area);
}
