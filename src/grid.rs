use chrono::NaiveDate;
use itertools::Itertools;

use crate::calendar::{self, MonthView, WeekStart};
use crate::index::EventDayAggregate;

pub const DAYS_PER_WEEK: usize = 7;

#[derive(Clone, Debug, PartialEq)]
pub struct DayCell {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: u32,
    pub is_today: bool,
    pub event: Option<EventDayAggregate>,
}

impl DayCell {
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Empty,
    Day(DayCell),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn day(&self) -> Option<&DayCell> {
        match self {
            Cell::Day(day) => Some(day),
            Cell::Empty => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeekPosition {
    First,
    Middle,
    Last,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Week {
    pub position: WeekPosition,
    pub cells: Vec<Cell>,
}

/// Number of rows needed to show `view` when weeks begin on `week_start`.
pub fn week_count(view: &MonthView, week_start: WeekStart) -> u32 {
    let days = view.days() as i64;
    let first = week_start.normalize(view.first_day_of_week()) as i64;
    let last = week_start.normalize(view.last_day_of_week()) as i64;

    // ceil((days + first - last) / 7); the numerator is always positive
    let total = days + (first - last);
    ((total + DAYS_PER_WEEK as i64 - 1) / DAYS_PER_WEEK as i64) as u32
}

#[derive(Clone, Debug)]
pub struct MonthGrid {
    view: MonthView,
    week_start: WeekStart,
    weeks: Vec<Week>,
}

impl MonthGrid {
    pub fn layout(view: MonthView, week_start: WeekStart, today: &NaiveDate) -> Self {
        let week_total = week_count(&view, week_start);
        let days = view.days();
        let first = week_start.normalize(view.first_day_of_week());

        let mut day = 1;
        let weeks = (1..=week_total)
            .map(|wk| {
                let cells = week_start
                    .columns()
                    .iter()
                    .map(|&dow| {
                        if (wk == 1 && dow < first) || day > days {
                            Cell::Empty
                        } else {
                            let cell = Cell::Day(DayCell {
                                year: view.year(),
                                month: view.month(),
                                day,
                                day_of_week: dow % 7,
                                is_today: calendar::is_same_day(
                                    view.year(),
                                    view.month(),
                                    day,
                                    today,
                                ),
                                event: None,
                            });
                            day += 1;
                            cell
                        }
                    })
                    .collect_vec();

                let position = if wk == 1 {
                    WeekPosition::First
                } else if wk == week_total {
                    WeekPosition::Last
                } else {
                    WeekPosition::Middle
                };

                Week { position, cells }
            })
            .collect_vec();

        MonthGrid {
            view,
            week_start,
            weeks,
        }
    }

    pub fn view(&self) -> &MonthView {
        &self.view
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.weeks
            .iter()
            .flat_map(|week| week.cells.iter())
            .filter_map(Cell::day)
    }

    pub fn days_mut(&mut self) -> impl Iterator<Item = &mut DayCell> {
        self.weeks
            .iter_mut()
            .flat_map(|week| week.cells.iter_mut())
            .filter_map(|cell| match cell {
                Cell::Day(day) => Some(day),
                Cell::Empty => None,
            })
    }
}
