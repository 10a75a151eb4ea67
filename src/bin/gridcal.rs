extern crate gridcal as lib;

use flexi_logger::{FileSpec, Logger};
use lib::calendar::WeekStart;
use lib::events::Dispatcher;
use lib::index::EventInput;
use lib::source::{EventSource, RemoteSource};
use lib::{Calendar, Load, Locales};
use std::fs;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "gridcal",
    author = "Julian Bigge <j.reedts@gmail.com>",
    about = "gridcal - Render a month calendar as an HTML table."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(short = "y", long = "year", help = "year to show")]
    pub year: Option<i32>,

    #[structopt(short = "m", long = "month", help = "month to show (1-12)")]
    pub month: Option<i32>,

    #[structopt(long = "week-starts", help = "first day of the week (sunday/0, monday/1)")]
    pub week_starts: Option<WeekStart>,

    #[structopt(short = "l", long = "language", help = "locale for month and day names")]
    pub language: Option<String>,

    #[structopt(
        short = "e",
        long = "events",
        help = "JSON file with an array of events",
        parse(from_os_str)
    )]
    pub events: Option<PathBuf>,

    #[structopt(long = "ajax", help = "URL answering with events for a year and month")]
    pub ajax: Option<String>,

    #[structopt(
        short = "o",
        long = "output",
        help = "write HTML to this file instead of stdout",
        parse(from_os_str)
    )]
    pub output: Option<PathBuf>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    std::panic::set_hook(Box::new(|info| {
        eprintln!("gridcal ran into a fatal error!");
        eprintln!("Consider filing an issue with a log file and the backtrace below.");

        eprintln!("{}", info);
        eprintln!("{:?}", backtrace::Backtrace::new());
    }));

    let mut config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    if args.year.is_some() {
        config.year = args.year;
    }
    if args.month.is_some() {
        config.month = args.month;
    }
    if let Some(week_starts) = args.week_starts {
        config.week_starts = week_starts;
    }
    if let Some(language) = args.language {
        config.language = language;
    }

    let dispatcher = Dispatcher::new();
    let mut calendar = Calendar::new(
        config,
        Locales::builtin(),
        Some(dispatcher.event_sink().clone()),
    );

    if let Some(path) = args.events {
        let values: Vec<serde_json::Value> = serde_json::from_str(&fs::read_to_string(&path)?)?;
        calendar = calendar.with_source(EventSource::Fixed(EventInput::from_values(values)));
    } else if let Some(url) = args.ajax {
        calendar = calendar.with_source(EventSource::Remote(RemoteSource::new(&url)));
    }

    let client = reqwest::Client::new();
    let mut load = calendar.init();
    while let Load::Pending(ticket) = load {
        let result = ticket.fetch(&client).await;
        load = calendar.complete(ticket, result);
    }

    for notification in dispatcher.pending() {
        log::debug!("{:?}", notification);
    }

    let html = match calendar.html() {
        Some(html) => html,
        None => {
            log::error!("Nothing to render, the configured month is invalid");
            std::process::exit(1);
        }
    };

    match args.output {
        Some(path) => fs::write(path, html)?,
        None => println!("{}", html),
    }

    Ok(())
}
