//! Timeline widget for project visualization.
//!
//! A Gantt-style grid widget: one header row of period labels, one row per
//! task with a progress-filled bar spanning the periods it covers, and a
//! single aggregated milestones row. All positioning comes from a
//! prebuilt [`TimelineLayout`]; this module only paints it.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use crate::layout::TimelineLayout;
use crate::models::TimelineData;
use crate::theme::{colors, get_task_color, styles};

/// Unicode block characters for bar rendering
const BLOCK_FULL: char = '█';
const BLOCK_MEDIUM: char = '▒';
/// Milestone marker glyph
const MILESTONE_MARKER: char = '⚑';

/// Width of the left-hand label column
const LABEL_COL_WIDTH: u16 = 24;

/// Placeholder row shown when the project has no tasks
pub const NO_TASKS_LABEL: &str = "No tasks in this project";
/// Placeholder row shown when the project has no milestones
pub const NO_MILESTONES_LABEL: &str = "No milestones in this project";

/// Grid row or marker currently selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Task row, by payload index
    Task(usize),
    /// Milestone marker, by flattened marker index
    Marker(usize),
}

/// Timeline widget state: which row or marker the cursor is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelineState {
    pub selection: Option<Selection>,
}

impl TimelineState {
    /// Linear position of the selection in the tasks-then-markers order.
    fn position(&self, task_count: usize) -> Option<usize> {
        match self.selection {
            Some(Selection::Task(i)) => Some(i),
            Some(Selection::Marker(i)) => Some(task_count + i),
            None => None,
        }
    }

    fn from_position(position: usize, task_count: usize) -> Selection {
        if position < task_count {
            Selection::Task(position)
        } else {
            Selection::Marker(position - task_count)
        }
    }

    /// Move the cursor down, wrapping from the last marker to the first task.
    pub fn select_next(&mut self, task_count: usize, marker_count: usize) {
        let total = task_count + marker_count;
        if total == 0 {
            self.selection = None;
            return;
        }
        let next = match self.position(task_count) {
            Some(i) if i + 1 < total => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.selection = Some(Self::from_position(next, task_count));
    }

    /// Move the cursor up, wrapping from the first task to the last marker.
    pub fn select_previous(&mut self, task_count: usize, marker_count: usize) {
        let total = task_count + marker_count;
        if total == 0 {
            self.selection = None;
            return;
        }
        let previous = match self.position(task_count) {
            Some(0) | None => total - 1,
            Some(i) => i - 1,
        };
        self.selection = Some(Self::from_position(previous, task_count));
    }

    /// Step to the previous marker when the cursor is on the milestone row.
    pub fn marker_left(&mut self) {
        if let Some(Selection::Marker(i)) = self.selection {
            self.selection = Some(Selection::Marker(i.saturating_sub(1)));
        }
    }

    /// Step to the next marker when the cursor is on the milestone row.
    pub fn marker_right(&mut self, marker_count: usize) {
        if let Some(Selection::Marker(i)) = self.selection {
            if i + 1 < marker_count {
                self.selection = Some(Selection::Marker(i + 1));
            }
        }
    }

    /// Drop a selection that no longer exists after a reload.
    pub fn clamp(&mut self, task_count: usize, marker_count: usize) {
        match self.selection {
            Some(Selection::Task(i)) if i >= task_count => {
                self.selection = if task_count > 0 {
                    Some(Selection::Task(task_count - 1))
                } else {
                    None
                };
            }
            Some(Selection::Marker(i)) if i >= marker_count => {
                self.selection = if marker_count > 0 {
                    Some(Selection::Marker(marker_count - 1))
                } else {
                    None
                };
            }
            _ => {}
        }
    }
}

/// Gantt grid widget, built fresh each frame from the current payload.
pub struct TimelineWidget<'a> {
    data: &'a TimelineData,
    layout: &'a TimelineLayout,
    state: &'a TimelineState,
}

impl<'a> TimelineWidget<'a> {
    pub fn new(data: &'a TimelineData, layout: &'a TimelineLayout, state: &'a TimelineState) -> Self {
        Self {
            data,
            layout,
            state,
        }
    }

    /// Paint the period labels and the separator line. The period
    /// containing today gets the today-marker color.
    fn render_header(&self, inner: Rect, buf: &mut Buffer, grid_x: u16, cell_width: u16) {
        buf.set_stringn(
            inner.x + 1,
            inner.y,
            "Item",
            (LABEL_COL_WIDTH - 2) as usize,
            styles::text_dim(),
        );

        let today = chrono::Local::now().date_naive();
        for (i, period) in self.layout.periods.iter().enumerate() {
            let x = grid_x + i as u16 * cell_width;
            if x >= inner.right() {
                break;
            }
            let style = if period.start <= today && today <= period.end {
                Style::default()
                    .fg(colors::YELLOW)
                    .add_modifier(Modifier::BOLD)
            } else {
                styles::title()
            };
            let available = (inner.right() - x).min(cell_width) as usize;
            buf.set_stringn(x, inner.y, &period.label, available, style);
        }

        for x in inner.x..inner.right() {
            buf[(x, inner.y + 1)].set_char('─');
            buf[(x, inner.y + 1)].set_style(styles::border_dim());
        }
    }

    /// Paint one task row: name column plus the positioned bar.
    fn render_task_row(
        &self,
        inner: Rect,
        buf: &mut Buffer,
        y: u16,
        task_index: usize,
        grid_x: u16,
        cell_width: u16,
    ) {
        let task = &self.data.tasks[task_index];
        let is_selected = self.state.selection == Some(Selection::Task(task_index));

        let name_style = if is_selected {
            styles::selected()
        } else {
            styles::text()
        };
        let prefix = if is_selected { '▸' } else { ' ' };
        buf.set_stringn(
            inner.x,
            y,
            prefix.to_string(),
            1,
            Style::default().fg(colors::YELLOW),
        );
        buf.set_stringn(
            inner.x + 1,
            y,
            &task.name,
            (LABEL_COL_WIDTH - 2) as usize,
            name_style,
        );

        let Some(bar) = self.layout.bars.get(task_index) else {
            return;
        };

        let bar_color = if task.completed {
            colors::TASK_COMPLETED
        } else {
            get_task_color(task_index)
        };

        // Bar geometry in cells; the progress fill is a rounded proportion
        // of the bar's total width.
        let bar_x = grid_x + bar.start_col as u16 * cell_width;
        let bar_width = bar.width() as u16 * cell_width;
        let fill = ((u32::from(bar_width) * u32::from(task.progress_clamped()) + 50) / 100) as u16;

        for offset in 0..bar_width {
            let x = bar_x + offset;
            if x >= inner.right() {
                break;
            }
            let (ch, color) = if offset < fill {
                (BLOCK_FULL, bar_color)
            } else {
                (BLOCK_MEDIUM, colors::TASK_BAR_REST)
            };
            let style = if is_selected {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(color)
            };
            buf[(x, y)].set_char(ch);
            buf[(x, y)].set_style(style);
        }
    }

    /// Paint the aggregated milestones row: one flag per bucketed milestone.
    fn render_milestone_row(
        &self,
        inner: Rect,
        buf: &mut Buffer,
        y: u16,
        grid_x: u16,
        cell_width: u16,
    ) {
        buf.set_stringn(
            inner.x + 1,
            y,
            "Milestones",
            (LABEL_COL_WIDTH - 2) as usize,
            styles::text_dim(),
        );

        let mut marker_index = 0;
        for (col, bucket) in self.layout.milestone_buckets.iter().enumerate() {
            let cell_x = grid_x + col as u16 * cell_width;
            for (slot, &m) in bucket.iter().enumerate() {
                let x = cell_x + slot as u16;
                let current = marker_index;
                marker_index += 1;
                if slot as u16 >= cell_width || x >= inner.right() {
                    continue;
                }

                let milestone = &self.data.milestones[m];
                let color = if milestone.completed {
                    colors::MILESTONE_DONE
                } else {
                    colors::MILESTONE_PENDING
                };
                let mut style = Style::default().fg(color).add_modifier(Modifier::BOLD);
                if self.state.selection == Some(Selection::Marker(current)) {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                buf[(x, y)].set_char(MILESTONE_MARKER);
                buf[(x, y)].set_style(style);
            }
        }
    }
}

impl Widget for TimelineWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Timeline ")
            .title_style(styles::title_accent())
            .borders(Borders::ALL)
            .border_style(styles::border());
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < LABEL_COL_WIDTH + 8 || inner.height < 4 {
            return;
        }

        let columns = self.layout.periods.len() as u16;
        let grid_x = inner.x + LABEL_COL_WIDTH;
        let grid_width = inner.width - LABEL_COL_WIDTH;
        let cell_width = if columns == 0 {
            grid_width
        } else {
            (grid_width / columns).max(1)
        };

        self.render_header(inner, buf, grid_x, cell_width);

        // Task rows below the header, then one aggregated milestone row.
        let mut y = inner.y + 2;
        let bottom = inner.bottom();

        if self.data.tasks.is_empty() {
            if y < bottom {
                buf.set_string(inner.x + 1, y, NO_TASKS_LABEL, styles::text_hint());
                y += 1;
            }
        } else {
            for task_index in 0..self.data.tasks.len() {
                if y >= bottom {
                    break;
                }
                self.render_task_row(inner, buf, y, task_index, grid_x, cell_width);
                y += 1;
            }
        }

        if y >= bottom {
            return;
        }

        if self.data.milestones.is_empty() {
            buf.set_string(inner.x + 1, y, NO_MILESTONES_LABEL, styles::text_hint());
        } else {
            self.render_milestone_row(inner, buf, y, grid_x, cell_width);
        }
    }
}
