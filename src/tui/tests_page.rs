//! The test dashboard: selectors, status line with progress, summary, the
//! result list, an output tail and recent executions.

use crate::app::AppState;
use crate::model::{ResultStatus, Summary, TestExecution, TestResult};
use crate::runner::{Focus, Phase, TestsPanel, EMPTY_OUTPUT, EMPTY_RECENT, EMPTY_RESULTS};
use crate::tui::{border_style, scroll_offset, selected_style, spinner, truncate};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Rows per recent entry: title, counts, start time.
const RECENT_ENTRY_HEIGHT: usize = 3;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let panel = &state.tests;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // selectors
            Constraint::Length(2), // status + progress
            Constraint::Length(1), // summary
            Constraint::Min(3),    // lists
        ])
        .split(area);

    render_selectors(f, rows[0], panel);
    render_status(f, rows[1], panel, state.spinner_frame);
    render_summary(f, rows[2], panel.summary);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[3]);
    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    render_results(f, columns[0], panel);
    render_output(f, side[0], &panel.output);
    render_recent(f, side[1], panel);
}

fn render_selectors(f: &mut Frame, area: Rect, panel: &TestsPanel) {
    let value_style = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let none_style = Style::default().fg(Color::DarkGray);

    let class = panel.selected_class_name();
    let method = panel.selected_method_name();
    let selector = Line::from(vec![
        Span::styled(" Class ", Style::default().fg(Color::Cyan)),
        match class {
            Some(name) => Span::styled(name.to_string(), value_style),
            None => Span::styled("(select)", none_style),
        },
        Span::styled("   Method ", Style::default().fg(Color::Cyan)),
        match method {
            Some(name) => Span::styled(name.to_string(), value_style),
            None => Span::styled("(select)", none_style),
        },
    ]);

    let run_style = if panel.run_enabled {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    };
    let controls = Line::from(vec![
        Span::raw(" "),
        Span::styled("[a] Run all", run_style),
        Span::raw("  "),
        Span::styled("[s] Run selected", run_style),
        Span::styled(
            format!("   {} classes", panel.available.test_classes.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    f.render_widget(Paragraph::new(vec![selector, controls]), area);
}

pub fn phase_style(phase: Phase) -> (&'static str, Color) {
    match phase {
        Phase::Idle => ("○", Color::DarkGray),
        Phase::Running => ("●", Color::Yellow),
        Phase::Completed => ("●", Color::Green),
        Phase::Failed => ("●", Color::Red),
    }
}

fn render_status(f: &mut Frame, area: Rect, panel: &TestsPanel, frame: usize) {
    let (icon, color) = phase_style(panel.phase);
    let status = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(panel.status_text.clone(), Style::default().fg(color)),
    ]);

    let progress = if panel.is_progress_visible() {
        let id = panel.session.execution_id().map(crate::model::short_id).unwrap_or_default();
        let bar_width = (area.width as usize).saturating_sub(id.len() + 6).min(40);
        Line::from(vec![
            Span::styled(
                format!(" {} ", spinner::frame(frame)),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                spinner::progress_bar(frame, bar_width),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(format!(" {id}"), Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::raw("")
    };

    f.render_widget(Paragraph::new(vec![status, progress]), area);
}

fn render_summary(f: &mut Frame, area: Rect, summary: Option<Summary>) {
    let Some(summary) = summary else {
        return;
    };
    let line = Line::from(vec![
        Span::styled(format!(" Total: {}", summary.total), Style::default().fg(Color::White)),
        Span::styled(format!("  Passed: {}", summary.passed), Style::default().fg(Color::Green)),
        Span::styled(format!("  Failed: {}", summary.failed), Style::default().fg(Color::Red)),
        Span::styled(
            format!("  Skipped: {}", summary.skipped),
            Style::default().fg(Color::Yellow),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

pub fn result_icon(status: ResultStatus) -> (&'static str, Color) {
    match status {
        ResultStatus::Passed => ("✓", Color::Green),
        ResultStatus::Failed => ("✗", Color::Red),
        ResultStatus::Skipped => ("⊘", Color::Yellow),
        ResultStatus::Unknown => ("·", Color::DarkGray),
    }
}

fn render_results(f: &mut Frame, area: Rect, panel: &TestsPanel) {
    let focused = panel.focus == Focus::Results;
    let block = Block::default()
        .title(" Results ")
        .borders(Borders::ALL)
        .border_style(border_style(focused));

    if panel.results.is_empty() {
        let para = Paragraph::new(EMPTY_RESULTS)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(para, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let visible = area.height.saturating_sub(2) as usize;
    let offset = scroll_offset(panel.results_cursor, visible);

    let lines: Vec<Line> = panel
        .results
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, result)| result_line(result, focused && i == panel.results_cursor, inner_width))
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn result_line(result: &TestResult, is_selected: bool, max_width: usize) -> Line<'static> {
    let (icon, color) = result_icon(result.status);
    let duration = format!("{}ms", result.duration);
    let name = format!("{}.{}", result.test_class, result.test_method);
    let name_max = max_width.saturating_sub(2 + duration.len() + 1);

    let mut spans = vec![
        Span::styled(format!("{icon} "), Style::default().fg(color)),
        Span::styled(truncate(&name, name_max), selected_style(is_selected)),
        Span::styled(format!(" {duration}"), Style::default().fg(Color::DarkGray)),
    ];
    if let Some(message) = result.message.as_deref().filter(|m| !m.is_empty()) {
        let used = 2 + name.len().min(name_max) + duration.len() + 1;
        let room = max_width.saturating_sub(used + 1);
        if room > 3 {
            spans.push(Span::styled(
                format!(" {}", truncate(message, room)),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
    Line::from(spans)
}

fn render_output(f: &mut Frame, area: Rect, output: &str) {
    let block = Block::default()
        .title(" Output ")
        .borders(Borders::ALL)
        .border_style(border_style(false));

    if output.is_empty() {
        let para = Paragraph::new(EMPTY_OUTPUT)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(para, area);
        return;
    }

    // Tail: always show the last lines
    let inner_width = area.width.saturating_sub(2) as usize;
    let visible = area.height.saturating_sub(2) as usize;
    let all: Vec<&str> = output.lines().collect();
    let lines: Vec<Line> = all
        .iter()
        .skip(all.len().saturating_sub(visible))
        .map(|l| Line::raw(truncate(l, inner_width)))
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_recent(f: &mut Frame, area: Rect, panel: &TestsPanel) {
    let focused = panel.focus == Focus::Recent;
    let block = Block::default()
        .title(" Recent executions ")
        .borders(Borders::ALL)
        .border_style(border_style(focused));

    if panel.recent.is_empty() {
        let para = Paragraph::new(EMPTY_RECENT)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(para, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let visible = (area.height.saturating_sub(2) as usize / RECENT_ENTRY_HEIGHT).max(1);
    let offset = scroll_offset(panel.recent_cursor, visible);

    let mut lines: Vec<Line> = Vec::new();
    for (i, execution) in panel.recent.iter().enumerate().skip(offset).take(visible) {
        lines.extend(recent_lines(execution, focused && i == panel.recent_cursor, inner_width));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn recent_lines(
    execution: &TestExecution,
    is_selected: bool,
    max_width: usize,
) -> Vec<Line<'static>> {
    let summary = execution.summary();
    let started = execution.start_time.map_or_else(
        || "-".to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
    );
    let status_color = match execution.status {
        crate::model::ExecutionStatus::Completed => Color::Green,
        crate::model::ExecutionStatus::Failed => Color::Red,
        crate::model::ExecutionStatus::Running => Color::Yellow,
        _ => Color::DarkGray,
    };

    vec![
        Line::from(Span::styled(
            format!("Execution {}", execution.short_id()),
            selected_style(is_selected).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate(
                &format!(
                    "Status: {} | Tests: {} | Passed: {} | Failed: {}",
                    execution.status.label(),
                    summary.total,
                    summary.passed,
                    summary.failed
                ),
                max_width,
            ),
            Style::default().fg(status_color),
        )),
        Line::from(Span::styled(
            format!("Started: {started}"),
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExecutionStatus;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn recent_entry_lines() {
        let execution = TestExecution {
            id: "abcdef0123456789".to_string(),
            status: ExecutionStatus::Completed,
            results: Vec::new(),
            output: String::new(),
            start_time: chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
                .and_then(|d| d.and_hms_opt(14, 7, 9)),
            end_time: None,
        };
        let lines = recent_lines(&execution, false, 80);
        assert_eq!(line_text(&lines[0]), "Execution abcdef01");
        assert_eq!(
            line_text(&lines[1]),
            "Status: COMPLETED | Tests: 0 | Passed: 0 | Failed: 0"
        );
        assert_eq!(line_text(&lines[2]), "Started: 2024-03-05 14:07:09");
    }

    #[test]
    fn phase_colors() {
        assert_eq!(phase_style(Phase::Running).1, Color::Yellow);
        assert_eq!(phase_style(Phase::Completed).1, Color::Green);
        assert_eq!(phase_style(Phase::Failed).1, Color::Red);
        assert_eq!(phase_style(Phase::Idle).1, Color::DarkGray);
    }

    #[test]
    fn result_icons() {
        assert_eq!(result_icon(ResultStatus::Passed).0, "✓");
        assert_eq!(result_icon(ResultStatus::Failed).0, "✗");
        assert_eq!(result_icon(ResultStatus::Skipped).0, "⊘");
    }
}
