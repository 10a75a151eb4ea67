pub mod calendar;
pub mod config;
pub mod error;
pub mod events;
pub mod grid;
pub mod index;
pub mod locale;
pub mod render;
pub mod source;
pub mod widget;

pub use calendar::{MonthView, WeekStart};
pub use config::Config;
pub use events::{Dispatcher, Notification};
pub use index::{EventDayAggregate, EventIndex, EventInput};
pub use locale::{Locales, Translation};
pub use widget::{Calendar, Load};
