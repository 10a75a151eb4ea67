use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::{serde_as, skip_serializing_none, DefaultOnError};
use std::collections::HashMap;

/// A single dated event as supplied inline or by a remote source.
/// Decorations of the wrong type are dropped, the event itself is kept.
#[serde_as]
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventInput {
    pub date: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub classname: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub markup: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventInput {
    pub fn new(date: &str) -> Self {
        EventInput {
            date: Some(date.to_owned()),
            ..Default::default()
        }
    }

    pub fn with_classname(mut self, classname: &str) -> Self {
        self.classname = Some(classname.to_owned());
        self
    }

    pub fn with_markup(mut self, markup: &str) -> Self {
        self.markup = Some(markup.to_owned());
        self
    }

    /// Converts raw JSON values, skipping everything that is not an event
    /// object.
    pub fn from_values<I>(values: I) -> Vec<EventInput>
    where
        I: IntoIterator<Item = Value>,
    {
        values
            .into_iter()
            .filter_map(|value| {
                if !value.is_object() {
                    log::warn!("Skipping event entry that is not an object: {}", value);
                    return None;
                }
                serde_json::from_value::<EventInput>(value)
                    .map_err(|e| log::warn!("Skipping malformed event entry: {}", e))
                    .ok()
            })
            .collect()
    }

    fn date_key(&self) -> Option<&str> {
        self.date.as_deref().filter(|date| !date.is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EventDayAggregate {
    pub count: usize,
    pub classnames: Vec<String>,
    pub markup: Option<String>,
    pub events: Vec<EventInput>,
}

impl EventDayAggregate {
    fn push(&mut self, event: EventInput) {
        self.count += 1;
        if let Some(classname) = &event.classname {
            self.classnames.push(classname.clone());
        }
        // later events override the markup of earlier ones
        if let Some(markup) = &event.markup {
            self.markup = Some(markup.clone());
        }
        self.events.push(event);
    }
}

/// Per-day event aggregates keyed by formatted date string.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventIndex(HashMap<String, EventDayAggregate>);

impl EventIndex {
    pub fn build<I>(events: I) -> Self
    where
        I: IntoIterator<Item = EventInput>,
    {
        let mut days: HashMap<String, EventDayAggregate> = HashMap::new();

        for event in events {
            let key = match event.date_key() {
                Some(date) => date.to_owned(),
                None => continue,
            };
            days.entry(key).or_default().push(event);
        }

        EventIndex(days)
    }

    pub fn lookup(&self, date: &str) -> Option<&EventDayAggregate> {
        self.0.get(date)
    }

    /// Number of distinct dates with events.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn aggregates_same_day() {
        let index = EventIndex::build(vec![
            EventInput::new("2024-03-05").with_classname("a"),
            EventInput::new("2024-03-05")
                .with_classname("b")
                .with_markup("<x>"),
        ]);

        let day = index.lookup("2024-03-05").unwrap();
        assert_eq!(day.count, 2);
        assert_eq!(day.classnames, vec!["a", "b"]);
        assert_eq!(day.markup.as_deref(), Some("<x>"));
        assert_eq!(day.events.len(), 2);
        assert_eq!(day.events[0].classname.as_deref(), Some("a"));
        assert!(index.lookup("2024-03-06").is_none());
    }

    #[test]
    fn last_markup_wins() {
        let index = EventIndex::build(vec![
            EventInput::new("2024-03-05").with_markup("<first>"),
            EventInput::new("2024-03-05"),
            EventInput::new("2024-03-05").with_markup("<last>"),
        ]);

        let day = index.lookup("2024-03-05").unwrap();
        assert_eq!(day.markup.as_deref(), Some("<last>"));
        assert!(day.classnames.is_empty());
    }

    #[test]
    fn skips_undated_entries() {
        let events = EventInput::from_values(vec![
            json!({"classname": "orphan"}),
            json!({"date": "", "classname": "blank"}),
            json!("not an event"),
            json!({"date": 20240305}),
            json!({"date": "2024-03-01", "classname": null, "markup": null}),
        ]);
        assert_eq!(events.len(), 3);

        let index = EventIndex::build(events);
        assert_eq!(index.len(), 1);
        let day = index.lookup("2024-03-01").unwrap();
        assert_eq!(day.count, 1);
        assert!(day.classnames.is_empty());
        assert!(day.markup.is_none());
    }

    #[test]
    fn wrongly_typed_decorations_keep_the_event() {
        let events = EventInput::from_values(vec![
            json!({"date": "2024-03-05", "classname": "a"}),
            json!({"date": "2024-03-05", "classname": 7}),
            json!({"date": "2024-03-05", "markup": {"html": "<b>"}}),
        ]);
        assert_eq!(events.len(), 3);

        let index = EventIndex::build(events);
        let day = index.lookup("2024-03-05").unwrap();
        assert_eq!(day.count, 3);
        assert_eq!(day.events.len(), 3);
        assert_eq!(day.classnames, vec!["a"]);
        assert!(day.markup.is_none());
    }

    #[test]
    fn keeps_extra_fields() {
        let events = EventInput::from_values(vec![json!({
            "id": "01abc",
            "date": "2024-03-05",
            "title": "Dentist",
            "badge": true
        })]);

        let index = EventIndex::build(events);
        let event = &index.lookup("2024-03-05").unwrap().events[0];
        assert_eq!(event.extra.get("title"), Some(&json!("Dentist")));
        assert_eq!(event.extra.get("badge"), Some(&json!(true)));

        let back = serde_json::to_value(event).unwrap();
        assert_eq!(back["id"], json!("01abc"));
        assert!(back.get("markup").is_none());
    }
}
