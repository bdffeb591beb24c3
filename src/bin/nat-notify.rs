extern crate natalis as lib;

use chrono::{Duration, Local, NaiveTime};
use flexi_logger::{Duplicate, FileSpec, Logger};
use structopt::StructOpt;

use lib::agenda::Agenda;
use lib::store::ContactStore;

use std::path::PathBuf;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "nat-notify",
    about = "Notification daemon of the natalis birthday suite."
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

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn notify(summary: &str, body: &str) {
    let result = notify_rust::Notification::new()
        .summary(summary)
        .body(body)
        .show();

    if let Err(err) = result {
        log::warn!("failed to show notification: {}", err);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    let mut logger = Logger::try_with_env_or_str("info")?.duplicate_to_stderr(Duplicate::Warn);

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    loop {
        let store = ContactStore::open(&config.store_path())?;
        let today = Local::now().date_naive();
        let agenda = Agenda::new(store.all(), config.horizon());

        for entry in agenda.upcoming(today) {
            if entry.contact.dob.is_none() {
                continue;
            }

            if entry.days_left == 0 {
                notify(
                    &format!("{} turns {} today", entry.contact.name, entry.age),
                    "Do not forget to send your wishes.",
                );
            } else if entry.days_left <= config.headsup_days {
                notify(
                    &format!(
                        "{} turns {} in {} days",
                        entry.contact.name, entry.turning, entry.days_left
                    ),
                    &format!("{}", entry.next.format("%a, %d %b %Y")),
                );
            }
        }

        // Next check at the coming local midnight.
        let now = Local::now().naive_local();
        let next_midnight = (today + Duration::days(1)).and_time(NaiveTime::MIN);
        let to_sleep = next_midnight.signed_duration_since(now);
        log::info!("sleeping {} until the next check", to_sleep);
        std::thread::sleep(to_sleep.to_std().unwrap_or(std::time::Duration::ZERO));
    }
}
