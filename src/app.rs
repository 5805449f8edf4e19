//! Application state and event handling.
//!
//! This module implements the Elm Architecture pattern for state management,
//! with a centralized App struct holding all application state. Key events
//! map to declarative [`Action`]s first; applying an action may hand an
//! [`ApiCommand`] back to the caller for the worker task.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::{ApiCommand, ApiMessage};
use crate::layout::TimelineLayout;
use crate::models::{Granularity, MilestoneDto, TaskDto, TimelineData};
use crate::timeline::{Selection, TimelineState};

/// User intent, decoupled from the key that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Refresh,
    SetView(Granularity),
    SelectPrevious,
    SelectNext,
    MarkerLeft,
    MarkerRight,
    /// Open the selected task or milestone
    Activate,
    /// Leave the task detail view
    Back,
    DismissPopup,
    ToggleHelp,
}

/// Log entry for the activity pane
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: Instant,
    pub message: String,
    pub level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            timestamp: Instant::now(),
            message: message.into(),
            level: LogLevel::Info,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            timestamp: Instant::now(),
            message: message.into(),
            level: LogLevel::Success,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            timestamp: Instant::now(),
            message: message.into(),
            level: LogLevel::Warning,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            timestamp: Instant::now(),
            message: message.into(),
            level: LogLevel::Error,
        }
    }
}

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Project whose timeline is displayed
    pub project_id: i64,

    /// User-selected view granularity
    pub granularity: Granularity,

    /// Last successfully fetched payload; dropped on fetch failure so a
    /// stale grid can never sit behind the error panel
    pub timeline: Option<TimelineData>,

    /// Fetch failure shown in place of the grid
    pub error: Option<String>,

    /// Whether a fetch is in flight
    pub is_loading: bool,

    /// Timeline widget state (cursor)
    pub timeline_state: TimelineState,

    /// Task detail view, replacing the grid when set
    pub task_detail: Option<TaskDto>,

    /// Milestone popup (stub detail view)
    pub milestone_popup: Option<MilestoneDto>,

    /// Show help overlay
    pub show_help: bool,

    /// Log messages
    pub logs: Vec<LogEntry>,
    /// Maximum number of log entries to keep
    max_logs: usize,

    /// Last data refresh time
    pub last_refresh: Option<Instant>,
}

impl App {
    /// Create a new application instance for one project.
    pub fn new(project_id: i64) -> Self {
        let mut app = Self {
            should_quit: false,
            project_id,
            granularity: Granularity::default(),
            timeline: None,
            error: None,
            is_loading: true,
            timeline_state: TimelineState::default(),
            task_detail: None,
            milestone_popup: None,
            show_help: false,
            logs: Vec::new(),
            max_logs: 100,
            last_refresh: None,
        };

        app.log(LogEntry::info(format!(
            "PlanLine TUI initialized (project {project_id})"
        )));
        app.log(LogEntry::info("Loading timeline..."));
        app
    }

    /// Command that kicks off the first fetch.
    pub fn initial_command(&self) -> ApiCommand {
        ApiCommand::LoadTimeline {
            project_id: self.project_id,
            view: self.granularity,
        }
    }

    /// Granularity used for the current render pass: the server-echoed
    /// view wins when present.
    pub fn render_granularity(&self) -> Granularity {
        self.timeline
            .as_ref()
            .and_then(|data| data.view)
            .unwrap_or(self.granularity)
    }

    /// Layout of the current payload, rebuilt per call.
    pub fn build_layout(&self) -> Option<TimelineLayout> {
        self.timeline.as_ref().map(|data| {
            TimelineLayout::build(
                &data.project,
                &data.tasks,
                &data.milestones,
                self.render_granularity(),
            )
        })
    }

    /// Selectable item counts: task rows and bucketed milestone markers.
    fn counts(&self) -> (usize, usize) {
        match self.build_layout() {
            Some(layout) => {
                let tasks = self.timeline.as_ref().map_or(0, |d| d.tasks.len());
                (tasks, layout.markers().len())
            }
            None => (0, 0),
        }
    }

    /// Add a log entry
    pub fn log(&mut self, entry: LogEntry) {
        self.logs.push(entry);
        if self.logs.len() > self.max_logs {
            self.logs.remove(0);
        }
    }

    /// Handle API messages
    pub fn handle_api_message(&mut self, message: ApiMessage) {
        match message {
            ApiMessage::TimelineLoaded(data) => {
                self.is_loading = false;
                self.error = None;
                self.last_refresh = Some(Instant::now());
                self.log(LogEntry::success(format!(
                    "Loaded timeline: {} tasks, {} milestones",
                    data.tasks.len(),
                    data.milestones.len()
                )));
                let milestone_count = data.milestones.len();
                if data.tasks.is_empty() {
                    self.log(LogEntry::warning("Project has no tasks"));
                }
                self.timeline = Some(data);

                let (tasks, markers) = self.counts();
                let dropped = milestone_count - markers;
                if dropped > 0 {
                    self.log(LogEntry::warning(format!(
                        "{dropped} milestone(s) fall outside the timeline range"
                    )));
                }
                self.timeline_state.clamp(tasks, markers);
                if self.timeline_state.selection.is_none() && tasks + markers > 0 {
                    self.timeline_state.select_next(tasks, markers);
                }
            }
            ApiMessage::Error(error) => {
                self.is_loading = false;
                self.timeline = None;
                self.timeline_state = TimelineState::default();
                self.log(LogEntry::error(format!("Timeline fetch failed: {error}")));
                self.error = Some(error);
            }
        }
    }

    /// Map a key event to an action. Overlays capture input first.
    pub fn action_for_key(&self, key: KeyEvent) -> Option<Action> {
        if self.milestone_popup.is_some() {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => Some(Action::DismissPopup),
                _ => None,
            };
        }

        if self.show_help {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter => Some(Action::ToggleHelp),
                _ => None,
            };
        }

        if self.task_detail.is_some() {
            return match key.code {
                KeyCode::Esc | KeyCode::Backspace => Some(Action::Back),
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Quit)
            }
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('?') => Some(Action::ToggleHelp),
            KeyCode::Char('1') => Some(Action::SetView(Granularity::Quarterly)),
            KeyCode::Char('2') => Some(Action::SetView(Granularity::Biannual)),
            KeyCode::Char('3') => Some(Action::SetView(Granularity::Annual)),
            KeyCode::Tab => Some(Action::SetView(self.granularity.next())),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectPrevious),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectNext),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::MarkerLeft),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::MarkerRight),
            KeyCode::Enter => Some(Action::Activate),
            _ => None,
        }
    }

    /// Apply an action, returning a command for the API worker if one is
    /// needed.
    pub fn apply(&mut self, action: Action) -> Option<ApiCommand> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                Some(ApiCommand::Shutdown)
            }
            Action::Refresh => {
                self.is_loading = true;
                self.log(LogEntry::info("Reloading timeline..."));
                Some(ApiCommand::LoadTimeline {
                    project_id: self.project_id,
                    view: self.granularity,
                })
            }
            Action::SetView(granularity) => {
                if granularity == self.granularity {
                    return None;
                }
                self.granularity = granularity;
                self.is_loading = true;
                self.log(LogEntry::info(format!("View: {granularity}")));
                Some(ApiCommand::LoadTimeline {
                    project_id: self.project_id,
                    view: granularity,
                })
            }
            Action::SelectPrevious => {
                let (tasks, markers) = self.counts();
                self.timeline_state.select_previous(tasks, markers);
                None
            }
            Action::SelectNext => {
                let (tasks, markers) = self.counts();
                self.timeline_state.select_next(tasks, markers);
                None
            }
            Action::MarkerLeft => {
                self.timeline_state.marker_left();
                None
            }
            Action::MarkerRight => {
                let (_, markers) = self.counts();
                self.timeline_state.marker_right(markers);
                None
            }
            Action::Activate => {
                self.activate_selection();
                None
            }
            Action::Back => {
                self.task_detail = None;
                None
            }
            Action::DismissPopup => {
                self.milestone_popup = None;
                None
            }
            Action::ToggleHelp => {
                self.show_help = !self.show_help;
                None
            }
        }
    }

    /// Handle a key event and return an optional API command.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ApiCommand> {
        self.action_for_key(key).and_then(|action| self.apply(action))
    }

    /// Open the detail view for the selected task, or the popup stub for
    /// the selected milestone marker.
    fn activate_selection(&mut self) {
        let Some(data) = &self.timeline else {
            return;
        };

        match self.timeline_state.selection {
            Some(Selection::Task(index)) => {
                if let Some(task) = data.tasks.get(index).cloned() {
                    self.log(LogEntry::info(format!("Opening task {}", task.id)));
                    self.task_detail = Some(task);
                }
            }
            Some(Selection::Marker(index)) => {
                let milestone = self
                    .build_layout()
                    .and_then(|layout| layout.markers().get(index).map(|&(_, m)| m))
                    .and_then(|m| data.milestones.get(m).cloned());
                if let Some(milestone) = milestone {
                    self.log(LogEntry::info(format!("Milestone {}", milestone.id)));
                    self.milestone_popup = Some(milestone);
                }
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::models::ProjectDto;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn sample_payload() -> TimelineData {
        TimelineData {
            project: ProjectDto {
                id: 7,
                name: "Sample".to_string(),
                description: None,
                start_date: d(2024, 1, 15),
                end_date: d(2024, 8, 10),
                progress: 0,
            },
            tasks: vec![TaskDto {
                id: 21,
                name: "Site survey".to_string(),
                start_date: d(2024, 2, 1),
                end_date: d(2024, 5, 1),
                progress: 75,
                completed: false,
                assignee_name: None,
            }],
            milestones: vec![MilestoneDto {
                id: 5,
                name: "Permits granted".to_string(),
                description: None,
                date: d(2024, 4, 15),
                completed: false,
            }],
            view: Some(Granularity::Quarterly),
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_error_discards_previous_payload() {
        let mut app = App::new(7);
        app.handle_api_message(ApiMessage::TimelineLoaded(sample_payload()));
        assert!(app.timeline.is_some());

        app.handle_api_message(ApiMessage::Error("API error: 500".to_string()));
        assert!(app.timeline.is_none());
        assert_eq!(app.error.as_deref(), Some("API error: 500"));
        assert!(!app.is_loading);
    }

    #[test]
    fn test_successful_load_clears_error_panel() {
        let mut app = App::new(7);
        app.handle_api_message(ApiMessage::Error("boom".to_string()));
        app.handle_api_message(ApiMessage::TimelineLoaded(sample_payload()));
        assert!(app.error.is_none());
        assert!(app.timeline.is_some());
    }

    #[test]
    fn test_set_view_reloads_only_on_change() {
        let mut app = App::new(7);
        assert!(app.apply(Action::SetView(Granularity::Quarterly)).is_none());

        let command = app.apply(Action::SetView(Granularity::Annual));
        match command {
            Some(ApiCommand::LoadTimeline { project_id, view }) => {
                assert_eq!(project_id, 7);
                assert_eq!(view, Granularity::Annual);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(app.granularity, Granularity::Annual);
    }

    #[test]
    fn test_view_keys_map_to_the_three_granularities() {
        let app = App::new(7);
        assert_eq!(
            app.action_for_key(key(KeyCode::Char('1'))),
            Some(Action::SetView(Granularity::Quarterly))
        );
        assert_eq!(
            app.action_for_key(key(KeyCode::Char('2'))),
            Some(Action::SetView(Granularity::Biannual))
        );
        assert_eq!(
            app.action_for_key(key(KeyCode::Char('3'))),
            Some(Action::SetView(Granularity::Annual))
        );
    }

    #[test]
    fn test_activate_task_opens_detail_view() {
        let mut app = App::new(7);
        app.handle_api_message(ApiMessage::TimelineLoaded(sample_payload()));
        assert_eq!(
            app.timeline_state.selection,
            Some(crate::timeline::Selection::Task(0))
        );

        app.apply(Action::Activate);
        assert_eq!(app.task_detail.as_ref().map(|t| t.id), Some(21));

        app.apply(Action::Back);
        assert!(app.task_detail.is_none());
    }

    #[test]
    fn test_activate_marker_opens_popup_stub() {
        let mut app = App::new(7);
        app.handle_api_message(ApiMessage::TimelineLoaded(sample_payload()));
        app.apply(Action::SelectNext);
        assert_eq!(
            app.timeline_state.selection,
            Some(crate::timeline::Selection::Marker(0))
        );

        app.apply(Action::Activate);
        assert_eq!(app.milestone_popup.as_ref().map(|m| m.id), Some(5));

        app.apply(Action::DismissPopup);
        assert!(app.milestone_popup.is_none());
    }

    #[test]
    fn test_render_granularity_prefers_server_echo() {
        let mut app = App::new(7);
        app.granularity = Granularity::Annual;
        let mut payload = sample_payload();
        payload.view = Some(Granularity::Quarterly);
        app.handle_api_message(ApiMessage::TimelineLoaded(payload));
        assert_eq!(app.render_granularity(), Granularity::Quarterly);

        let mut payload = sample_payload();
        payload.view = None;
        app.handle_api_message(ApiMessage::TimelineLoaded(payload));
        assert_eq!(app.render_granularity(), Granularity::Annual);
    }
}
