use serde::Deserialize;
use std::collections::BTreeMap;

use crate::calendar::MonthView;
use crate::config::Config;
use crate::error::{Error, ErrorKind, Result};
use crate::index::EventInput;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

impl Default for Method {
    fn default() -> Self {
        Method::Get
    }
}

/// Remote endpoint answering with a JSON array of events for a
/// `year`/`month` pair.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "RemoteSpec")]
pub struct RemoteSource {
    pub url: String,
    pub method: Method,
    pub headers: BTreeMap<String, String>,
    pub cache: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RemoteSpec {
    Url(String),
    Settings {
        url: String,
        #[serde(default, alias = "type")]
        method: Method,
        #[serde(default)]
        headers: BTreeMap<String, String>,
        #[serde(default = "cache_by_default")]
        cache: bool,
    },
}

fn cache_by_default() -> bool {
    true
}

impl From<RemoteSpec> for RemoteSource {
    fn from(spec: RemoteSpec) -> Self {
        match spec {
            RemoteSpec::Url(url) => RemoteSource::new(&url),
            RemoteSpec::Settings {
                url,
                method,
                headers,
                cache,
            } => RemoteSource {
                url,
                method,
                headers,
                cache,
            },
        }
    }
}

impl RemoteSource {
    pub fn new(url: &str) -> Self {
        RemoteSource {
            url: url.to_owned(),
            method: Method::Get,
            headers: BTreeMap::new(),
            cache: false,
        }
    }

    fn request(
        &self,
        client: &reqwest::Client,
        view: &MonthView,
    ) -> Result<reqwest::RequestBuilder> {
        let url = reqwest::Url::parse(&self.url).map_err(|e| {
            Error::new(
                ErrorKind::InvalidOption,
                &format!("invalid event source url '{}': {}", self.url, e),
            )
        })?;
        let params = [
            ("year", view.year().to_string()),
            ("month", view.month().to_string()),
        ];

        let mut builder = match self.method {
            Method::Get => client.get(url).query(&params),
            Method::Post => client.post(url).form(&params),
        };

        builder = builder.header(reqwest::header::ACCEPT, "application/json");
        if !self.cache {
            builder = builder.header(reqwest::header::CACHE_CONTROL, "no-cache");
        }
        for (name, value) in self.headers.iter() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        Ok(builder)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EventSource {
    Empty,
    Fixed(Vec<EventInput>),
    Remote(RemoteSource),
}

impl Default for EventSource {
    fn default() -> Self {
        EventSource::Empty
    }
}

impl EventSource {
    /// Inline events win over a remote source.
    pub fn from_config(config: &Config) -> Self {
        if let Some(events) = &config.events {
            EventSource::Fixed(EventInput::from_values(events.iter().cloned()))
        } else if let Some(remote) = &config.ajax {
            EventSource::Remote(remote.clone())
        } else {
            EventSource::Empty
        }
    }
}

/// An outstanding remote load. Tagged with the view and generation it was
/// issued for so that late answers can be told apart from current ones.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchTicket {
    pub(crate) view: MonthView,
    pub(crate) generation: u64,
    pub(crate) source: RemoteSource,
}

impl FetchTicket {
    pub fn view(&self) -> &MonthView {
        &self.view
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn fetch(&self, client: &reqwest::Client) -> Result<Vec<EventInput>> {
        log::debug!("Fetching events for {} from {}", self.view, self.source.url);

        let response = self
            .source
            .request(client, &self.view)?
            .send()
            .await?
            .error_for_status()?;

        let values: Vec<serde_json::Value> = response.json().await?;
        Ok(EventInput::from_values(values))
    }
}
