//! UI rendering module.
//!
//! This module handles all the TUI rendering using ratatui: header and
//! legend, the view selector, the timeline grid (or its loading / error
//! states), the activity log, and the overlays.

use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, LogLevel};
use crate::models::Granularity;
use crate::theme::{colors, styles};
use crate::timeline::TimelineWidget;

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Fill background with theme color
    let bg_block = Block::default().style(Style::default().bg(colors::BG_DARK));
    frame.render_widget(bg_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Project header + legend
            Constraint::Length(1), // View selector
            Constraint::Min(8),    // Grid / error / detail
            Constraint::Length(5), // Activity log
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_view_selector(frame, app, chunks[1]);
    render_content(frame, app, chunks[2]);
    render_logs(frame, app, chunks[3]);

    if app.milestone_popup.is_some() {
        render_milestone_popup(frame, app, area);
    }

    if app.show_help {
        render_help_overlay(frame, area);
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

/// Project name, date range and the grid legend.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" PlanLine ")
        .title_style(styles::title_accent())
        .borders(Borders::ALL)
        .border_style(styles::border());

    let lines = match &app.timeline {
        Some(data) => {
            let project = &data.project;
            let mut title_spans = vec![Span::styled(project.name.clone(), styles::title())];
            if project.progress > 0 {
                title_spans.push(Span::styled(
                    format!("  ({}%)", project.progress),
                    styles::text_dim(),
                ));
            }
            vec![
                Line::from(title_spans),
                Line::from(vec![
                    Span::styled(
                        format!(
                            "{} - {}",
                            format_date(project.start_date),
                            format_date(project.end_date)
                        ),
                        styles::text_dim(),
                    ),
                    Span::raw("   "),
                    Span::styled("█ Tasks", Style::default().fg(colors::BLUE)),
                    Span::raw("  "),
                    Span::styled("⚑ Milestones", Style::default().fg(colors::YELLOW)),
                ]),
            ]
        }
        None => vec![
            Line::from(Span::styled("Project timeline", styles::title())),
            Line::from(Span::styled(
                format!("project {}", app.project_id),
                styles::text_hint(),
            )),
        ],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// The three mutually exclusive granularity controls.
fn render_view_selector(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(" View: ", styles::text_dim())];
    for (index, granularity) in Granularity::all().iter().enumerate() {
        let style = if *granularity == app.granularity {
            styles::view_active()
        } else {
            styles::view_inactive()
        };
        spans.push(Span::styled(
            format!("[{}] {}", index + 1, granularity.name()),
            style,
        ));
        spans.push(Span::raw("  "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Grid area: task detail view, error panel, loading state, or the grid.
fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    if app.task_detail.is_some() {
        render_task_detail(frame, app, area);
        return;
    }

    if let Some(error) = &app.error {
        render_error_panel(frame, error, area);
        return;
    }

    match &app.timeline {
        Some(data) => {
            if let Some(layout) = app.build_layout() {
                frame.render_widget(
                    TimelineWidget::new(data, &layout, &app.timeline_state),
                    area,
                );
            }
        }
        None => {
            let message = if app.is_loading {
                "Loading timeline..."
            } else {
                "No timeline data"
            };
            render_empty_state(frame, area, message);
        }
    }
}

/// Fixed error panel shown in place of the grid. A failed fetch drops the
/// previous payload, so nothing stale can show behind this.
fn render_error_panel(frame: &mut Frame, error: &str, area: Rect) {
    let block = Block::default()
        .title(" Timeline ")
        .title_style(styles::error())
        .borders(Borders::ALL)
        .border_style(styles::error());

    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "⚠ Could not load the timeline",
            styles::error().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(error.to_string(), styles::text_dim())),
        Line::default(),
        Line::from(Span::styled("Press r to retry", styles::text_hint())),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_empty_state(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .title(" Timeline ")
        .title_style(styles::title_accent())
        .borders(Borders::ALL)
        .border_style(styles::border());

    let lines = vec![
        Line::default(),
        Line::from(Span::styled(message.to_string(), styles::text_dim())),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center),
        area,
    );
}

/// Detail view for the activated task, replacing the grid.
fn render_task_detail(frame: &mut Frame, app: &App, area: Rect) {
    let Some(task) = &app.task_detail else {
        return;
    };

    let block = Block::default()
        .title(format!(" Task {} ", task.id))
        .title_style(styles::title_accent())
        .borders(Borders::ALL)
        .border_style(styles::border());

    let progress = task.progress_clamped();
    let bar_width = 30usize;
    let filled = bar_width * progress as usize / 100;
    let progress_bar: String = "█".repeat(filled) + &"░".repeat(bar_width - filled);

    let status = if task.completed {
        Span::styled("Completed", styles::success())
    } else {
        Span::styled("In progress", styles::info())
    };

    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(task.name.clone(), styles::title())),
        Line::default(),
        Line::from(vec![Span::styled("Status    ", styles::text_dim()), status]),
        Line::from(vec![
            Span::styled("Dates     ", styles::text_dim()),
            Span::styled(
                format!(
                    "{} - {}",
                    format_date(task.start_date),
                    format_date(task.end_date)
                ),
                styles::text(),
            ),
        ]),
        Line::from(vec![
            Span::styled("Progress  ", styles::text_dim()),
            Span::styled(progress_bar, styles::info()),
            Span::styled(format!(" {progress}%"), styles::text()),
        ]),
    ];

    if let Some(assignee) = &task.assignee_name {
        lines.push(Line::from(vec![
            Span::styled("Assignee  ", styles::text_dim()),
            Span::styled(assignee.clone(), styles::text()),
        ]));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Esc to go back",
        styles::text_hint(),
    )));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Render the activity log pane
fn render_logs(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Activity ")
        .title_style(styles::title())
        .borders(Borders::ALL)
        .border_style(styles::border_dim());

    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = app
        .logs
        .iter()
        .rev()
        .take(visible)
        .rev()
        .map(|entry| {
            let (symbol, style) = match entry.level {
                LogLevel::Info => ("·", styles::text_dim()),
                LogLevel::Success => ("✓", styles::success()),
                LogLevel::Warning => ("!", styles::warning()),
                LogLevel::Error => ("✗", styles::error()),
            };
            Line::from(vec![
                Span::styled(format!("{symbol} "), style),
                Span::styled(entry.message.clone(), styles::text_dim()),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Popup stub for an activated milestone marker.
fn render_milestone_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(milestone) = &app.milestone_popup else {
        return;
    };

    let popup_area = centered_rect(46, 10, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" Milestone {} ", milestone.id))
        .title_style(styles::title_accent())
        .borders(Borders::ALL)
        .border_style(styles::border())
        .style(styles::modal_content_bg());

    let status = if milestone.completed {
        Span::styled("Completed", styles::success())
    } else {
        Span::styled("Pending", styles::warning())
    };

    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(milestone.name.clone(), styles::title())),
        Line::from(vec![
            Span::styled(format_date(milestone.date), styles::text_dim()),
            Span::raw("  "),
            status,
        ]),
    ];
    if let Some(description) = &milestone.description {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            description.clone(),
            styles::text(),
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Esc to close",
        styles::text_hint(),
    )));

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        popup_area,
    );
}

/// Render the help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(44, 14, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Help ")
        .title_style(styles::title_accent())
        .borders(Borders::ALL)
        .border_style(styles::border())
        .style(styles::modal_content_bg());

    let keys = [
        ("1 / 2 / 3", "Quarterly / Biannual / Annual view"),
        ("Tab", "Cycle view"),
        ("j / k, ↓ / ↑", "Select task or milestone row"),
        ("h / l, ← / →", "Step between milestone markers"),
        ("Enter", "Open task / show milestone"),
        ("r", "Reload timeline"),
        ("?", "Toggle this help"),
        ("q", "Quit"),
    ];

    let mut lines = vec![Line::default()];
    for (key, description) in keys {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<14}"), styles::info()),
            Span::styled(description, styles::text()),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}

/// Helper to create a centered rect of fixed size
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
