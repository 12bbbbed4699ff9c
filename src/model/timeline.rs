use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::task::Task;

/// Average month length used by the month scale.
pub const DAYS_PER_MONTH: f32 = 30.44;

/// Controls what scale the timeline displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeScale {
    #[default]
    Day,
    Week,
    Month,
}

impl TimeScale {
    pub const ALL: [TimeScale; 3] = [TimeScale::Day, TimeScale::Week, TimeScale::Month];

    /// Width of one grid column in pixels.
    pub fn column_width(self) -> f32 {
        match self {
            TimeScale::Day => 40.0,
            TimeScale::Week => 100.0,
            TimeScale::Month => 200.0,
        }
    }

    /// How many days one column stands for when converting pixels.
    pub fn days_per_unit(self) -> f32 {
        match self {
            TimeScale::Day => 1.0,
            TimeScale::Week => 7.0,
            TimeScale::Month => DAYS_PER_MONTH,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeScale::Day => "Day",
            TimeScale::Week => "Week",
            TimeScale::Month => "Month",
        }
    }

    /// Advance a column boundary by one unit of this scale.
    fn step(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            TimeScale::Day => date.checked_add_signed(Duration::days(1)),
            TimeScale::Week => date.checked_add_signed(Duration::weeks(1)),
            TimeScale::Month => date.checked_add_months(Months::new(1)),
        }
    }
}

/// First day (Sunday) of the calendar week containing `date`.
///
/// Saturates at the earliest representable date.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = Duration::days(date.weekday().num_days_from_sunday() as i64);
    date.checked_sub_signed(back).unwrap_or(NaiveDate::MIN)
}

/// Last day (Saturday) of the calendar week containing `date`.
///
/// Saturates at the latest representable date.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date)
        .checked_add_signed(Duration::days(6))
        .unwrap_or(NaiveDate::MAX)
}

/// Week of the year for Sunday-based weeks.
///
/// Week 1 is the week containing 1 January, so the last days of December can
/// already belong to week 1 of the next year.
pub fn week_of_year(date: NaiveDate) -> u32 {
    let start = week_start(date);
    let end = week_end(date);
    if end.year() > start.year() {
        return 1;
    }
    NaiveDate::from_ymd_opt(date.year(), 1, 1)
        .map(|jan1| ((start - week_start(jan1)).num_days() / 7) as u32 + 1)
        .unwrap_or(1)
}

/// Visible date range and column boundaries for one scale.
///
/// Rebuilt whenever the task list or the scale changes; never during a drag.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    pub scale: TimeScale,
    pub overall_start: NaiveDate,
    pub overall_end: NaiveDate,
    pub columns: Vec<NaiveDate>,
}

impl TimeGrid {
    /// Build the grid from the tasks being displayed.
    ///
    /// The range is widened to whole weeks so grid lines stay put as tasks are
    /// added. An empty list shows the current week plus four.
    pub fn from_tasks(tasks: &[Task], scale: TimeScale, today: NaiveDate) -> Self {
        let earliest = tasks.iter().map(|t| t.start).min();
        let latest = tasks.iter().map(|t| t.end).max();

        let (overall_start, overall_end) = match (earliest, latest) {
            (Some(min), Some(max)) => (week_start(min), week_end(max)),
            _ => {
                let horizon = today.checked_add_signed(Duration::weeks(4)).unwrap_or(today);
                (week_start(today), week_end(horizon))
            }
        };

        Self::from_range(overall_start, overall_end, scale)
    }

    pub fn from_range(overall_start: NaiveDate, overall_end: NaiveDate, scale: TimeScale) -> Self {
        let mut columns = Vec::new();
        let mut date = Some(overall_start);
        while let Some(current) = date.filter(|d| *d <= overall_end) {
            columns.push(current);
            date = scale.step(current);
        }

        Self {
            scale,
            overall_start,
            overall_end,
            columns,
        }
    }

    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(self.overall_start, self.scale)
    }

    /// Total width in pixels for the visible range.
    pub fn total_width(&self) -> f32 {
        self.columns.len() as f32 * self.scale.column_width()
    }

    /// Whether the today marker falls strictly inside the range.
    pub fn shows_today(&self, today: NaiveDate) -> bool {
        today > self.overall_start && today < self.overall_end
    }

    pub fn header_label(&self, column: NaiveDate) -> String {
        match self.scale {
            TimeScale::Day => column.format("%-d %b").to_string(),
            TimeScale::Week => format!("Week {}", week_of_year(column)),
            TimeScale::Month => column.format("%B %Y").to_string(),
        }
    }
}

/// Pure date ↔ pixel projection for one grid origin and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    origin: NaiveDate,
    scale: TimeScale,
    column_width: f32,
}

impl CoordinateMapper {
    pub fn new(origin: NaiveDate, scale: TimeScale) -> Self {
        Self::with_column_width(origin, scale, scale.column_width())
    }

    pub fn with_column_width(origin: NaiveDate, scale: TimeScale, column_width: f32) -> Self {
        Self {
            origin,
            scale,
            column_width,
        }
    }

    pub fn origin(&self) -> NaiveDate {
        self.origin
    }

    pub fn scale(&self) -> TimeScale {
        self.scale
    }

    pub fn column_width(&self) -> f32 {
        self.column_width
    }

    /// Convert a date to an x-pixel offset from the grid origin.
    ///
    /// Week and month scales produce fractional offsets for dates inside a
    /// column.
    pub fn date_to_pixel(&self, date: NaiveDate) -> f32 {
        let days = (date - self.origin).num_days() as f32;
        days / self.scale.days_per_unit() * self.column_width
    }

    /// Convert a pixel delta into a fractional day count.
    pub fn pixel_to_days(&self, delta_x: f32) -> f32 {
        delta_x / self.column_width * self.scale.days_per_unit()
    }

    /// Convert a pixel delta into whole days, rounding to the nearest day.
    pub fn pixel_to_day_delta(&self, delta_x: f32) -> i64 {
        self.pixel_to_days(delta_x).round() as i64
    }

    /// Left offset and width of a bar spanning `start..=end`.
    ///
    /// At day scale the end day is inclusive, so one column is added.
    pub fn bar_span(&self, start: NaiveDate, end: NaiveDate) -> (f32, f32) {
        let left = self.date_to_pixel(start);
        let mut width = self.date_to_pixel(end) - left;
        if self.scale == TimeScale::Day {
            width += self.column_width;
        }
        (left, width.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_is_widened_to_sunday_weeks() {
        // 2024-08-01 is a Thursday, 2024-08-10 a Saturday.
        let tasks = vec![
            Task::new("t1", "A", date(2024, 8, 1), date(2024, 8, 5)),
            Task::new("t2", "B", date(2024, 8, 6), date(2024, 8, 12)),
        ];
        let grid = TimeGrid::from_tasks(&tasks, TimeScale::Day, date(2024, 1, 1));
        assert_eq!(grid.overall_start, date(2024, 7, 28));
        assert_eq!(grid.overall_end, date(2024, 8, 17));
        assert_eq!(grid.columns.len(), 21);
        assert_eq!(grid.columns.first(), Some(&date(2024, 7, 28)));
        assert_eq!(grid.columns.last(), Some(&date(2024, 8, 17)));
    }

    #[test]
    fn empty_grid_spans_current_week_plus_four() {
        // Wednesday
        let today = date(2024, 8, 7);
        let grid = TimeGrid::from_tasks(&[], TimeScale::Week, today);
        assert_eq!(grid.overall_start, date(2024, 8, 4));
        assert_eq!(grid.overall_end, date(2024, 9, 7));
        assert_eq!(grid.columns.len(), 5);
    }

    #[test]
    fn month_columns_step_by_calendar_month() {
        let grid = TimeGrid::from_range(date(2024, 1, 28), date(2024, 4, 30), TimeScale::Month);
        assert_eq!(
            grid.columns,
            vec![date(2024, 1, 28), date(2024, 2, 28), date(2024, 3, 28), date(2024, 4, 28)]
        );
    }

    #[test]
    fn week_scale_yields_fractional_offsets() {
        let mapper = CoordinateMapper::new(date(2024, 7, 28), TimeScale::Week);
        assert_eq!(mapper.date_to_pixel(date(2024, 8, 4)), 100.0);
        let mid = mapper.date_to_pixel(date(2024, 7, 31));
        assert!((mid - 300.0 / 7.0).abs() < 1e-4);
    }

    #[test]
    fn month_scale_uses_average_month() {
        let mapper = CoordinateMapper::new(date(2024, 1, 1), TimeScale::Month);
        let x = mapper.date_to_pixel(date(2024, 1, 31));
        assert!((x - 30.0 / 30.44 * 200.0).abs() < 1e-3);
        assert_eq!(mapper.pixel_to_day_delta(200.0), 30);
    }

    #[test]
    fn pixel_delta_rounds_to_nearest_day() {
        let mapper = CoordinateMapper::new(date(2024, 8, 1), TimeScale::Day);
        assert_eq!(mapper.pixel_to_day_delta(59.0), 1);
        assert_eq!(mapper.pixel_to_day_delta(61.0), 2);
        assert_eq!(mapper.pixel_to_day_delta(-61.0), -2);

        let weekly = CoordinateMapper::new(date(2024, 8, 1), TimeScale::Week);
        assert_eq!(weekly.pixel_to_day_delta(100.0), 7);
        assert_eq!(weekly.pixel_to_day_delta(50.0), 4);
    }

    #[test]
    fn day_bars_include_the_end_day() {
        let mapper = CoordinateMapper::new(date(2024, 8, 1), TimeScale::Day);
        assert_eq!(mapper.bar_span(date(2024, 8, 2), date(2024, 8, 2)), (40.0, 40.0));
        assert_eq!(mapper.bar_span(date(2024, 8, 2), date(2024, 8, 4)), (40.0, 120.0));

        let weekly = CoordinateMapper::new(date(2024, 8, 1), TimeScale::Week);
        assert_eq!(weekly.bar_span(date(2024, 8, 1), date(2024, 8, 8)), (0.0, 100.0));
    }

    #[test]
    fn header_labels_follow_scale() {
        let grid = TimeGrid::from_range(date(2024, 8, 4), date(2024, 8, 10), TimeScale::Day);
        assert_eq!(grid.header_label(date(2024, 8, 5)), "5 Aug");
        let grid = TimeGrid::from_range(date(2024, 8, 4), date(2024, 8, 10), TimeScale::Week);
        assert_eq!(grid.header_label(date(2024, 8, 5)), "Week 32");
        let grid = TimeGrid::from_range(date(2024, 8, 4), date(2024, 8, 10), TimeScale::Month);
        assert_eq!(grid.header_label(date(2024, 8, 5)), "August 2024");
    }

    #[test]
    fn today_marker_only_strictly_inside() {
        let grid = TimeGrid::from_range(date(2024, 8, 4), date(2024, 8, 10), TimeScale::Day);
        assert!(grid.shows_today(date(2024, 8, 6)));
        assert!(!grid.shows_today(date(2024, 8, 4)));
        assert!(!grid.shows_today(date(2024, 8, 10)));
    }

    #[test]
    fn week_numbers_count_from_sunday() {
        let grid = TimeGrid::from_range(date(2024, 8, 4), date(2024, 8, 10), TimeScale::Week);
        // Sunday 4 Aug 2024 is still ISO week 31.
        assert_eq!(grid.header_label(date(2024, 8, 4)), "Week 32");
        assert_eq!(week_of_year(date(2024, 8, 10)), 32);
        assert_eq!(week_of_year(date(2024, 8, 11)), 33);
        assert_eq!(week_of_year(date(2024, 1, 1)), 1);
        assert_eq!(week_of_year(date(2024, 1, 7)), 2);
        // The week of 29 Dec 2024 contains 1 Jan 2025.
        assert_eq!(week_of_year(date(2024, 12, 29)), 1);
        assert_eq!(week_of_year(date(2024, 12, 28)), 52);
    }

    #[test]
    fn week_bounds_saturate_at_calendar_limits() {
        assert_eq!(week_end(NaiveDate::MAX), NaiveDate::MAX);
        assert_eq!(week_start(NaiveDate::MIN), NaiveDate::MIN);
    }
}
