// #![forbid(unsafe_code)]
// #![deny(missing_docs)]
// #![deny(warnings)]

#[macro_use]
extern crate log;

#[macro_use]
extern crate derive_builder;

mod app;
mod configuration;
mod connection;
mod reporter;

use log::LevelFilter;
use std::{path::PathBuf, process::exit};
use structopt::StructOpt;

use self::app::{
    error::Error,
    notification::Delivery,
    App,
};
use self::connection::SmtpMailer;
use self::{
    configuration::command_line::{LogLevel, Opt},
    configuration::settings::Settings,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let mut options = Opt::from_args();
    let level = options.logging.take().unwrap_or(LogLevel::Info);

    if let Err(e) = init_logging(level.into(), &options.log_output_file) {
        eprintln!("Failed to initialize logging {}", e);
        exit(1);
    }

    let code = match run(options).await {
        Ok(_) => {
            info!("Email notification sent successfully");
            0
        }
        Err(Error::Delivery(_)) => {
            error!("Failed to send email notification");
            1
        }
        Err(e) => {
            error!("{}", e);
            1
        }
    };
    exit(code);
}

async fn run(options: Opt) -> Result<Delivery, Error> {
    let settings = Settings::load(options.config.as_deref())?;
    deliver(settings, options).await
}

/// Configuration problems end the run before any result file is read
async fn deliver(settings: Settings, options: Opt) -> Result<Delivery, Error> {
    let configuration = settings.validate()?;
    debug!("Initiated configuration {:#?}", configuration);

    let mailer = SmtpMailer::new(&configuration.relay).map_err(|e| {
        error!("Cannot set up relay {}: {}", configuration.relay.host, e);
        e
    })?;
    let app = App::new(configuration, options.results_dir, options.html_output);
    app.run(&mailer).await
}

fn init_logging(level: LevelFilter, output: &Option<PathBuf>) -> Result<(), fern::InitError> {
    let mut dispatcher = fern::Dispatch::new()
        // Perform allocation-free log formatting
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}:{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record
                    .line()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "".to_owned()),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout());

    if let Some(log_file) = output {
        dispatcher = dispatcher.chain(fern::log_file(log_file)?)
    }
    dispatcher.apply()?;
    debug!("Logging level {} enabled", level);
    Ok(())
}
