use chrono::NaiveDate;
use std::sync::mpsc;

use crate::calendar::MonthView;
use crate::index::{EventDayAggregate, EventInput};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataKind {
    Fixed,
    Remote,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
    /// Back to the view the calendar was configured with
    Initial,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    Init { view: Option<MonthView> },
    Goto { view: MonthView },
    Reload { view: MonthView },
    Navigate { direction: Direction, view: MonthView },
    Destroy,
    PreRender { view: MonthView },
    Rendered { view: MonthView },
    DataLoaded {
        kind: DataKind,
        view: MonthView,
        events: Vec<EventInput>,
        days: usize,
    },
    DataLoadFailed { view: MonthView, error: String },
    DayEvent { value: String, event: EventDayAggregate },
    DayClicked {
        date: NaiveDate,
        value: String,
        today: bool,
        event: Option<EventDayAggregate>,
    },
}

/// Owns the notification channel; calendars get a sender via `event_sink`.
pub struct Dispatcher {
    rx: mpsc::Receiver<Notification>,
    tx: mpsc::Sender<Notification>,
}

impl Default for Dispatcher {
    fn default() -> Dispatcher {
        Dispatcher::new()
    }
}

impl Dispatcher {
    pub fn new() -> Dispatcher {
        let (tx, rx) = mpsc::channel();
        Dispatcher { rx, tx }
    }

    pub fn next(&self) -> Result<Notification, mpsc::RecvError> {
        self.rx.recv()
    }

    pub fn pending(&self) -> impl Iterator<Item = Notification> + '_ {
        self.rx.try_iter()
    }

    pub fn event_sink(&self) -> &mpsc::Sender<Notification> {
        &self.tx
    }
}

/// Sending half held by a calendar. Delivery is best effort.
#[derive(Clone, Debug, Default)]
pub struct Notifier(Option<mpsc::Sender<Notification>>);

impl Notifier {
    pub fn new(sink: mpsc::Sender<Notification>) -> Self {
        Notifier(Some(sink))
    }

    pub fn silent() -> Self {
        Notifier(None)
    }

    pub fn emit(&self, notification: Notification) {
        if let Some(tx) = &self.0 {
            if tx.send(notification).is_err() {
                log::debug!("Notification dropped, receiver is gone");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_in_order() {
        let dispatcher = Dispatcher::new();
        let notifier = Notifier::new(dispatcher.event_sink().clone());
        let view = MonthView::new(2024, 2).unwrap();

        notifier.emit(Notification::PreRender { view });
        notifier.emit(Notification::Rendered { view });

        let received: Vec<_> = dispatcher.pending().collect();
        assert_eq!(
            received,
            vec![
                Notification::PreRender { view },
                Notification::Rendered { view }
            ]
        );
    }

    #[test]
    fn dropped_receiver_is_harmless() {
        let dispatcher = Dispatcher::new();
        let notifier = Notifier::new(dispatcher.event_sink().clone());
        drop(dispatcher);
        notifier.emit(Notification::Destroy);
        Notifier::silent().emit(Notification::Destroy);
    }
}
