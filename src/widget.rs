use chrono::{Datelike, NaiveDate};
use std::sync::mpsc;

use crate::calendar::{self, MonthView};
use crate::config::Config;
use crate::error::Result;
use crate::events::{DataKind, Direction, Notification, Notifier};
use crate::grid::{DayCell, MonthGrid};
use crate::index::{EventDayAggregate, EventIndex, EventInput};
use crate::locale::Locales;
use crate::render::{self, HtmlRenderer};
use crate::source::{EventSource, FetchTicket};

/// Outcome of an operation that may (re)load data.
#[derive(Debug, PartialEq)]
pub enum Load {
    /// Data was available synchronously and the calendar has been rendered.
    Rendered,
    /// A remote load was started; hand the ticket's result to
    /// [`Calendar::complete`].
    Pending(FetchTicket),
    /// Invalid target or destroyed calendar, nothing changed.
    Ignored,
    /// The answer belongs to a superseded load and was dropped.
    Stale,
}

#[derive(Debug, Default)]
struct ViewState {
    view: Option<MonthView>,
    index: EventIndex,
    html: Option<String>,
    generation: u64,
}

/// A month calendar bound to a configuration, a locale table and an event
/// source.
pub struct Calendar {
    config: Config,
    locales: Locales,
    source: EventSource,
    notifier: Notifier,
    state: Option<ViewState>,
}

impl Calendar {
    pub fn new(
        config: Config,
        locales: Locales,
        sink: Option<mpsc::Sender<Notification>>,
    ) -> Self {
        let source = EventSource::from_config(&config);
        let notifier = sink.map(Notifier::new).unwrap_or_else(Notifier::silent);

        Calendar {
            config,
            locales,
            source,
            notifier,
            state: Some(ViewState::default()),
        }
    }

    pub fn with_source(mut self, source: EventSource) -> Self {
        self.source = source;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn view(&self) -> Option<MonthView> {
        self.state.as_ref().and_then(|s| s.view)
    }

    pub fn index(&self) -> Option<&EventIndex> {
        self.state.as_ref().map(|s| &s.index)
    }

    /// Markup of the last render, `None` before the first valid render.
    pub fn html(&self) -> Option<&str> {
        self.state.as_ref().and_then(|s| s.html.as_deref())
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.is_none()
    }

    pub fn init(&mut self) -> Load {
        let (year, month) = self.config.initial_view();
        self.notifier.emit(Notification::Init {
            view: MonthView::new(year, month),
        });
        self.goto(year, month)
    }

    pub fn goto(&mut self, year: i32, month: i32) -> Load {
        let view = match MonthView::new(year, month) {
            Some(view) => view,
            None => {
                log::debug!("Ignoring navigation to invalid month {}-{}", year, month);
                return Load::Ignored;
            }
        };

        match self.state.as_mut() {
            Some(state) => state.view = Some(view),
            None => return Load::Ignored,
        }

        self.notifier.emit(Notification::Goto { view });
        self.load()
    }

    pub fn reload(&mut self) -> Load {
        match self.view() {
            Some(view) => {
                self.notifier.emit(Notification::Reload { view });
                self.load()
            }
            None => Load::Ignored,
        }
    }

    pub fn navigate(&mut self, direction: Direction) -> Load {
        let current = match self.view() {
            Some(view) => view,
            None => return Load::Ignored,
        };

        let (prev, next) = render::navigation_targets(&self.config, &current);
        let target = match direction {
            Direction::Previous => prev,
            Direction::Next => next,
            Direction::Initial if self.config.navigation_enabled() => {
                let (year, month) = self.config.initial_view();
                MonthView::new(year, month)
            }
            Direction::Initial => None,
        };

        match target {
            Some(view) => {
                self.notifier.emit(Notification::Navigate { direction, view });
                self.goto(view.year(), view.month() as i32)
            }
            None => Load::Ignored,
        }
    }

    /// Reports a click on `date`. Returns the clicked cell when the date is
    /// part of the displayed month.
    pub fn click(&self, date: NaiveDate) -> Option<DayCell> {
        let view = self.view().filter(|view| view.contains(&date))?;
        let value = self.date_key(date.year(), date.month(), date.day());
        let event = self.lookup(&value).cloned();
        let today = calendar::is_today(date.year(), date.month(), date.day());

        self.notifier.emit(Notification::DayClicked {
            date,
            value,
            today,
            event: event.clone(),
        });

        Some(DayCell {
            year: view.year(),
            month: view.month(),
            day: date.day(),
            day_of_week: date.weekday().num_days_from_sunday(),
            is_today: today,
            event,
        })
    }

    /// Feeds the result of a remote load back. Answers for anything but the
    /// latest load of the current view are dropped.
    pub fn complete(&mut self, ticket: FetchTicket, result: Result<Vec<EventInput>>) -> Load {
        let state = match self.state.as_mut() {
            Some(state) => state,
            None => return Load::Stale,
        };

        if state.generation != ticket.generation || state.view != Some(ticket.view) {
            log::debug!(
                "Dropping stale event data for {} (load #{})",
                ticket.view,
                ticket.generation
            );
            return Load::Stale;
        }

        match result {
            Ok(events) => {
                state.index = EventIndex::build(events.iter().cloned());
                let days = state.index.len();
                self.notifier.emit(Notification::DataLoaded {
                    kind: DataKind::Remote,
                    view: ticket.view,
                    events,
                    days,
                });
            }
            Err(err) => {
                log::warn!("Could not load events for {}: {}", ticket.view, err);
                state.index = EventIndex::default();
                self.notifier.emit(Notification::DataLoadFailed {
                    view: ticket.view,
                    error: err.to_string(),
                });
            }
        }

        self.render();
        Load::Rendered
    }

    pub fn destroy(&mut self) {
        if self.state.take().is_some() {
            self.notifier.emit(Notification::Destroy);
        }
    }

    fn load(&mut self) -> Load {
        let state = match self.state.as_mut() {
            Some(state) => state,
            None => return Load::Ignored,
        };
        let view = match state.view {
            Some(view) => view,
            None => return Load::Ignored,
        };

        // any load supersedes a remote load still in flight
        state.generation += 1;

        match &self.source {
            EventSource::Empty => {
                state.index = EventIndex::default();
            }
            EventSource::Fixed(events) => {
                state.index = EventIndex::build(events.iter().cloned());
                self.notifier.emit(Notification::DataLoaded {
                    kind: DataKind::Fixed,
                    view,
                    events: events.clone(),
                    days: state.index.len(),
                });
            }
            EventSource::Remote(source) => {
                return Load::Pending(FetchTicket {
                    view,
                    generation: state.generation,
                    source: source.clone(),
                });
            }
        }

        self.render();
        Load::Rendered
    }

    fn render(&mut self) {
        let view = match self.view() {
            Some(view) => view,
            None => return,
        };

        self.notifier.emit(Notification::PreRender { view });

        let mut grid = MonthGrid::layout(view, self.config.week_starts, &calendar::today());
        for day in grid.days_mut() {
            let key = render::format_date(&self.config.date_format, day.year, day.month, day.day);
            if let Some(event) = self.lookup(&key) {
                self.notifier.emit(Notification::DayEvent {
                    value: key,
                    event: event.clone(),
                });
                day.event = Some(event.clone());
            }
        }

        let translation = self
            .locales
            .resolve(&self.config.language, self.config.translation.as_ref());
        let html = HtmlRenderer::new(&self.config, translation)
            .render(&grid)
            .into_string();

        if let Some(state) = self.state.as_mut() {
            state.html = Some(html);
        }

        self.notifier.emit(Notification::Rendered { view });
    }

    fn date_key(&self, year: i32, month: u32, day: u32) -> String {
        render::format_date(&self.config.date_format, year, month, day)
    }

    fn lookup(&self, key: &str) -> Option<&EventDayAggregate> {
        self.state.as_ref().and_then(|s| s.index.lookup(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};
    use crate::events::Dispatcher;
    use crate::source::RemoteSource;
    use serde_json::json;

    fn config(year: i32, month: i32) -> Config {
        Config {
            year: Some(year),
            month: Some(month),
            ..Config::default()
        }
    }

    fn calendar(config: Config, dispatcher: &Dispatcher) -> Calendar {
        Calendar::new(
            config,
            Locales::builtin(),
            Some(dispatcher.event_sink().clone()),
        )
    }

    fn remote() -> EventSource {
        EventSource::Remote(RemoteSource::new("http://localhost/events"))
    }

    fn pending(load: Load) -> FetchTicket {
        match load {
            Load::Pending(ticket) => ticket,
            other => panic!("expected a pending load, got {:?}", other),
        }
    }

    #[test]
    fn init_renders_configured_month() {
        let dispatcher = Dispatcher::new();
        let mut cal = calendar(config(2017, 2), &dispatcher);

        assert_eq!(cal.init(), Load::Rendered);
        assert_eq!(cal.view(), MonthView::new(2017, 2));
        let html = cal.html().unwrap();
        assert!(html.contains(">February 2017</span>"));

        let view = MonthView::new(2017, 2).unwrap();
        let received: Vec<_> = dispatcher.pending().collect();
        assert_eq!(
            received,
            vec![
                Notification::Init { view: Some(view) },
                Notification::Goto { view },
                Notification::PreRender { view },
                Notification::Rendered { view },
            ]
        );
    }

    #[test]
    fn invalid_month_is_not_rendered() {
        let dispatcher = Dispatcher::new();
        let mut cal = calendar(config(9999, 99), &dispatcher);

        assert_eq!(cal.init(), Load::Ignored);
        assert!(cal.view().is_none());
        assert!(cal.html().is_none());
        assert_eq!(cal.reload(), Load::Ignored);
    }

    #[test]
    fn goto_ignores_invalid_targets() {
        let dispatcher = Dispatcher::new();
        let mut cal = calendar(config(2017, 2), &dispatcher);
        cal.init();

        assert_eq!(cal.goto(2018, 10), Load::Rendered);
        assert_eq!(cal.view(), MonthView::new(2018, 10));

        assert_eq!(cal.goto(2018, 13), Load::Ignored);
        assert_eq!(cal.goto(2018, 0), Load::Ignored);
        assert_eq!(cal.goto(2018, -3), Load::Ignored);
        assert_eq!(cal.view(), MonthView::new(2018, 10));
    }

    #[test]
    fn navigation() {
        let dispatcher = Dispatcher::new();
        let mut cal = calendar(config(2020, 1), &dispatcher);
        cal.init();

        cal.navigate(Direction::Previous);
        assert_eq!(cal.view(), MonthView::new(2019, 12));
        cal.navigate(Direction::Next);
        cal.navigate(Direction::Next);
        assert_eq!(cal.view(), MonthView::new(2020, 2));
        cal.navigate(Direction::Initial);
        assert_eq!(cal.view(), MonthView::new(2020, 1));

        let navigations = dispatcher
            .pending()
            .filter(|n| matches!(n, Notification::Navigate { .. }))
            .count();
        assert_eq!(navigations, 4);
    }

    #[test]
    fn disabled_navigation() {
        let dispatcher = Dispatcher::new();
        let mut cal = calendar(
            Config {
                navigation_prev: false,
                navigation_next: false,
                ..config(2020, 5)
            },
            &dispatcher,
        );
        cal.init();
        cal.goto(2020, 7);

        assert_eq!(cal.navigate(Direction::Previous), Load::Ignored);
        assert_eq!(cal.navigate(Direction::Next), Load::Ignored);
        assert_eq!(cal.navigate(Direction::Initial), Load::Ignored);
        assert_eq!(cal.view(), MonthView::new(2020, 7));
    }

    #[test]
    fn fixed_events_decorate_days() {
        let dispatcher = Dispatcher::new();
        let mut cal = calendar(
            Config {
                events: Some(vec![
                    json!({"date": "2024-03-05", "classname": "a"}),
                    json!({"date": "2024-03-05", "classname": "b", "markup": "<x>"}),
                    json!({"title": "undated"}),
                ]),
                ..config(2024, 3)
            },
            &dispatcher,
        );
        cal.init();

        let day = cal.index().unwrap().lookup("2024-03-05").unwrap();
        assert_eq!(day.count, 2);
        assert_eq!(day.classnames, vec!["a", "b"]);
        assert!(cal.html().unwrap().contains("<x>"));

        let received: Vec<_> = dispatcher.pending().collect();
        assert!(received.iter().any(|n| matches!(
            n,
            Notification::DataLoaded {
                kind: DataKind::Fixed,
                days: 1,
                ..
            }
        )));
        assert_eq!(
            received
                .iter()
                .filter(|n| matches!(n, Notification::DayEvent { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn remote_load_completes() {
        let dispatcher = Dispatcher::new();
        let mut cal = calendar(config(2024, 3), &dispatcher).with_source(remote());

        let ticket = pending(cal.init());
        assert_eq!(ticket.view(), &MonthView::new(2024, 3).unwrap());
        assert!(cal.html().is_none());

        let events = vec![EventInput::new("2024-03-10").with_classname("grade-2")];
        assert_eq!(cal.complete(ticket, Ok(events)), Load::Rendered);
        assert!(cal.html().unwrap().contains("grade-2"));
        assert!(dispatcher.pending().any(|n| matches!(
            n,
            Notification::DataLoaded {
                kind: DataKind::Remote,
                ..
            }
        )));
    }

    #[test]
    fn failed_remote_load_renders_without_events() {
        let dispatcher = Dispatcher::new();
        let mut cal = calendar(config(2024, 3), &dispatcher).with_source(remote());

        let ticket = pending(cal.init());
        let err = Error::new(ErrorKind::Fetch, "connection refused");
        assert_eq!(cal.complete(ticket, Err(err)), Load::Rendered);

        assert!(cal.index().unwrap().is_empty());
        assert!(cal.html().unwrap().contains("data-date=\"2024-03-31\""));
        assert!(dispatcher
            .pending()
            .any(|n| matches!(n, Notification::DataLoadFailed { .. })));
    }

    #[test]
    fn stale_answers_are_dropped() {
        let dispatcher = Dispatcher::new();
        let mut cal = calendar(config(2024, 3), &dispatcher).with_source(remote());

        let march = pending(cal.init());
        let april = pending(cal.navigate(Direction::Next));

        let late = vec![EventInput::new("2024-03-10").with_classname("old")];
        assert_eq!(cal.complete(march, Ok(late)), Load::Stale);
        assert!(cal.html().is_none());

        let fresh = vec![EventInput::new("2024-04-10").with_classname("new")];
        assert_eq!(cal.complete(april.clone(), Ok(fresh)), Load::Rendered);
        let html = cal.html().unwrap();
        assert!(html.contains("new"));
        assert!(!html.contains("old"));

        // a reload of the same month also supersedes earlier tickets
        let first = pending(cal.reload());
        let second = pending(cal.reload());
        assert_eq!(cal.complete(first, Ok(vec![])), Load::Stale);
        assert_eq!(cal.complete(second, Ok(vec![])), Load::Rendered);
        assert_eq!(cal.complete(april, Ok(vec![])), Load::Stale);
    }

    #[test]
    fn click_reports_day() {
        let dispatcher = Dispatcher::new();
        let mut cal = calendar(
            Config {
                events: Some(vec![json!({"date": "2024-03-05", "classname": "a"})]),
                ..config(2024, 3)
            },
            &dispatcher,
        );
        cal.init();
        dispatcher.pending().for_each(drop);

        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let cell = cal.click(date).unwrap();
        assert_eq!(cell.day_of_week, 2);
        assert_eq!(cell.event.as_ref().map(|e| e.count), Some(1));

        match dispatcher.next().unwrap() {
            Notification::DayClicked { value, today, event, .. } => {
                assert_eq!(value, "2024-03-05");
                assert!(!today);
                assert!(event.is_some());
            }
            other => panic!("unexpected notification {:?}", other),
        }

        let outside = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert!(cal.click(outside).is_none());
    }

    #[test]
    fn destroy_releases_state() {
        let dispatcher = Dispatcher::new();
        let mut cal = calendar(config(2024, 3), &dispatcher).with_source(remote());
        let ticket = pending(cal.init());

        cal.destroy();
        assert!(cal.is_destroyed());
        assert!(cal.html().is_none());
        assert_eq!(cal.complete(ticket, Ok(vec![])), Load::Stale);
        assert_eq!(cal.goto(2024, 4), Load::Ignored);
        assert_eq!(cal.reload(), Load::Ignored);
        assert!(dispatcher.pending().any(|n| n == Notification::Destroy));
    }

    #[test]
    fn translation_override() {
        let dispatcher = Dispatcher::new();
        let translation: crate::locale::Translation = toml::from_str(
            r#"
            [months]
            1 = "M1"
            [days]
            0 = "D0"
            1 = "D1"
            "#,
        )
        .unwrap();
        let mut cal = calendar(
            Config {
                language: "de".to_owned(),
                translation: Some(translation),
                ..config(2017, 1)
            },
            &dispatcher,
        );
        cal.init();

        let html = cal.html().unwrap();
        assert!(html.contains(">M1 2017</span>"));
        assert!(html.contains(">D1</th>"));
        assert!(html.contains(">2</th>"));
    }
}
