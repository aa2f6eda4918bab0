//! Initialization of the global logger of the demo.

use std::error::Error;

use chrono::{Local, SecondsFormat};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Handle;

/// Initializes the global logger writing to stdout and to a timestamped file in `logs/`.
///
/// Registry internals are logged with `level`, everything else with `Info`.
///
/// # Errors
/// An error is returned if log file cannot be created
/// or logger has already been initialized.
///
pub fn init(level: LevelFilter) -> Result<Handle, Box<dyn Error + Send + Sync>> {
    let pattern = "{d:<35} {l:<5} {t} >> {m}{n}";
    let encoder = Box::new(PatternEncoder::new(pattern));

    let stdout = ConsoleAppender::builder().encoder(encoder.clone()).build();
    let file_name = format!(
        "logs/signet_{}.log",
        Local::now()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace(':', "-"),
    );
    let file = FileAppender::builder().encoder(encoder).build(file_name)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .appender(Appender::builder().build("file", Box::new(file)))
        .logger(Logger::builder().build("signet_ecs", level))
        .build(
            Root::builder()
                .appenders(["stdout", "file"])
                .build(LevelFilter::Info),
        )?;
    Ok(log4rs::init_config(config)?)
}
