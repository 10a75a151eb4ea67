use maud::{html, Markup, PreEscaped};

use crate::calendar::{MonthView, WeekStart};
use crate::config::Config;
use crate::events::Direction;
use crate::grid::{Cell, DayCell, MonthGrid, Week, WeekPosition};
use crate::locale::Translation;

pub const CLASS: &str = "gridcal";

fn class(element: &str) -> String {
    format!("{}__{}", CLASS, element)
}

/// Formats a date with `y`, `m` and `d` tokens; only the first occurrence of
/// each token is replaced. Month and day are zero padded.
pub fn format_date(format: &str, year: i32, month: u32, day: u32) -> String {
    format
        .replacen('y', &year.to_string(), 1)
        .replacen('m', &format!("{:02}", month), 1)
        .replacen('d', &format!("{:02}", day), 1)
}

/// Views reachable from the navigation row, `None` where disabled.
pub fn navigation_targets(
    config: &Config,
    view: &MonthView,
) -> (Option<MonthView>, Option<MonthView>) {
    let prev = if config.navigation_prev {
        view.previous()
    } else {
        None
    };
    let next = if config.navigation_next {
        view.next()
    } else {
        None
    };
    (prev, next)
}

pub struct HtmlRenderer<'a> {
    config: &'a Config,
    translation: Option<&'a Translation>,
}

impl<'a> HtmlRenderer<'a> {
    pub fn new(config: &'a Config, translation: Option<&'a Translation>) -> Self {
        HtmlRenderer {
            config,
            translation,
        }
    }

    pub fn header_label(&self, view: &MonthView) -> String {
        let month = self
            .translation
            .and_then(|t| t.month_label(view.month()))
            .map(str::to_owned)
            .unwrap_or_else(|| view.month().to_string());

        self.config
            .header_format
            .replacen("[year]", &view.year().to_string(), 1)
            .replacen("[month]", &month, 1)
    }

    pub fn render(&self, grid: &MonthGrid) -> Markup {
        let table_class = match &self.config.classname {
            Some(extra) => format!("{} {}", CLASS, extra),
            None => CLASS.to_owned(),
        };

        html! {
            table class=(table_class) {
                thead {
                    (self.navigation(grid.view()))
                    @if self.config.show_days {
                        (self.days_of_week(grid.week_start()))
                    }
                }
                tbody {
                    @for week in grid.weeks() {
                        (self.week(week))
                    }
                }
            }
        }
    }

    fn navigation(&self, view: &MonthView) -> Markup {
        let (prev, next) = navigation_targets(self.config, view);
        let enabled = prev.is_some() || next.is_some();
        let (home_year, home_month) = self.config.initial_view();

        let title = html! {
            span class=(class("navigation__item--header__title"))
                data-to-year=[enabled.then(|| home_year)]
                data-to-month=[enabled.then(|| home_month)] {
                (self.header_label(view))
            }
        };

        html! {
            tr class=(class("navigation")) role="navigation" {
                @if enabled {
                    (self.navigation_item(Direction::Previous, prev))
                    td class=(class("navigation__item--header")) colspan="5" { (title) }
                    (self.navigation_item(Direction::Next, next))
                } @else {
                    td class=(class("navigation__item--header")) colspan="7" { (title) }
                }
            }
        }
    }

    fn navigation_item(&self, direction: Direction, to: Option<MonthView>) -> Markup {
        let (name, markup) = match direction {
            Direction::Next => ("next", &self.config.navigation_markup.next),
            _ => ("prev", &self.config.navigation_markup.prev),
        };
        let content = markup.as_deref().unwrap_or(name);

        html! {
            td class=(class(&format!("navigation__item--{}", name)))
                data-nav=(name)
                data-to-year=[to.map(|v| v.year())]
                data-to-month=[to.map(|v| v.month())] {
                @if to.is_some() {
                    (PreEscaped(content))
                }
            }
        }
    }

    fn days_of_week(&self, week_start: WeekStart) -> Markup {
        html! {
            tr class=(class("days-of-week")) {
                @for dow in week_start.days_of_week().iter() {
                    th class=(class("days-of-week__item")) data-dow=(dow) {
                        (self.translation
                            .and_then(|t| t.day_label(*dow))
                            .map(str::to_owned)
                            .unwrap_or_else(|| dow.to_string()))
                    }
                }
            }
        }
    }

    fn week(&self, week: &Week) -> Markup {
        let row_class = match week.position {
            WeekPosition::First => class("week--first"),
            WeekPosition::Last => class("week--last"),
            WeekPosition::Middle => class("week"),
        };

        html! {
            tr class=(row_class) {
                @for cell in week.cells.iter() {
                    @match cell {
                        Cell::Empty => {
                            td class=(class("day--empty")) {}
                        }
                        Cell::Day(day) => {
                            (self.day(day))
                        }
                    }
                }
            }
        }
    }

    fn day(&self, day: &DayCell) -> Markup {
        let value = format_date(&self.config.date_format, day.year, day.month, day.day);
        let day_number = day.day.to_string();

        let mut classes = vec![if day.is_today {
            class("day--today")
        } else {
            class("day")
        }];
        if let Some(event) = &day.event {
            classes.push(class("event"));
            classes.extend(event.classnames.iter().cloned());
        }

        let markup = day
            .event
            .as_ref()
            .and_then(|event| event.markup.as_ref())
            .or_else(|| {
                if day.is_today {
                    self.config.today_markup.as_ref()
                } else {
                    None
                }
            })
            .map(|markup| markup.replacen("[day]", &day_number, 1));

        html! {
            td class=(classes.join(" "))
                data-date=(value)
                data-year=(day.year)
                data-month=(day.month)
                data-day=(day.day)
                data-dow=(day.day_of_week)
                data-today=(day.is_today as u8)
                data-has-event=(day.event.is_some() as u8) {
                @match markup {
                    Some(markup) => {
                        (PreEscaped(markup))
                    }
                    None => {
                        (day_number)
                    }
                }
            }
        }
    }
}
