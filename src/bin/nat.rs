extern crate natalis as lib;

use chrono::{Local, NaiveDate};
use flexi_logger::{FileSpec, Logger};
use structopt::StructOpt;

use lib::agenda::Agenda;
use lib::calendar::midnight;
use lib::contact::Contact;
use lib::countdown;
use lib::format::{self, Format};
use lib::store::ContactStore;
use lib::{Error, ErrorKind};

use std::fs;
use std::path::PathBuf;

#[derive(Debug, StructOpt)]
#[structopt(name = "nat", about = "Natalis - a birthday agenda for the command line.")]
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

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    #[structopt(about = "list upcoming birthdays grouped by month")]
    List {
        #[structopt(short = "s", long = "search", help = "only show matching entries")]
        search: Option<String>,
    },

    #[structopt(about = "show one contact in detail")]
    Show {
        #[structopt(help = "contact name or id")]
        query: String,
    },

    #[structopt(about = "add a contact")]
    Add {
        name: String,
        #[structopt(long = "dob", help = "date of birth as YYYY-MM-DD")]
        dob: Option<String>,
        #[structopt(long = "phone")]
        phone: Option<String>,
    },

    #[structopt(about = "remove a contact")]
    Remove {
        #[structopt(help = "contact name or id")]
        query: String,
    },

    #[structopt(about = "import contacts from a .csv or .json file")]
    Import {
        #[structopt(parse(from_os_str))]
        file: PathBuf,
    },

    #[structopt(about = "export contacts as csv, json or ics")]
    Export {
        format: Format,
        #[structopt(
            short = "o",
            long = "output",
            help = "write to a file instead of stdout",
            parse(from_os_str)
        )]
        output: Option<PathBuf>,
    },
}

fn resolve<'a>(store: &'a ContactStore, query: &str) -> Result<&'a Contact, Error> {
    if let Ok(id) = query.parse::<uuid::Uuid>() {
        if let Some(contact) = store.get(id) {
            return Ok(contact);
        }
    }

    store
        .all()
        .iter()
        .find(|contact| contact.name.eq_ignore_ascii_case(query))
        .ok_or_else(|| {
            Error::new(
                ErrorKind::UnknownContact,
                &format!("no contact matching '{}'", query),
            )
        })
}

fn print_entry(entry: &lib::agenda::Upcoming<'_>) {
    let when = entry.next.format("%a, %d %b %Y");
    let days = if entry.days_left == 0 {
        "today!".to_owned()
    } else if entry.days_left == i64::MAX {
        "no date of birth".to_owned()
    } else {
        format!("in {} days", entry.days_left)
    };
    println!(
        "  {:<24} {}  turns {:<4} {}",
        entry.contact.name, when, entry.turning, days
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    let mut store = ContactStore::open(&config.store_path())?;
    let today = Local::now().date_naive();

    match args.command {
        Command::List { search } => {
            let agenda = Agenda::new(store.all(), config.horizon());

            if let Some(term) = search {
                let found = agenda.search(today, &term);
                if found.is_empty() {
                    println!("No matching birthdays.");
                }
                for entry in found {
                    print_entry(&entry);
                }
            } else {
                if store.is_empty() {
                    println!("No birthdays added yet.");
                }
                for (month, entries) in agenda.by_month(today) {
                    println!("{}", month.name());
                    for entry in entries {
                        print_entry(&entry);
                    }
                }
            }
        }
        Command::Show { query } => {
            let contact = resolve(&store, &query)?;
            let next = contact.next_occurrence(today, config.horizon());

            println!("{}", contact.name);
            if let Some(dob) = contact.dob {
                println!("  born:     {}", dob.format("%a, %d %b %Y"));
                println!("  age:      {}", contact.age_on(today));
            }
            if let Some(sign) = contact.zodiac() {
                println!("  zodiac:   {}", sign);
            }
            if let Some(phone) = &contact.phone {
                println!("  phone:    {}", phone);
            }
            println!("  next:     {}", next.format("%a, %d %b %Y"));

            let result = countdown::breakdown(midnight(next), Local::now().naive_local());
            if result.is_past {
                println!("  countdown: today!");
            } else {
                println!(
                    "  countdown: {} months {} days {:02}:{:02}:{:02}",
                    result.months, result.days, result.hours, result.minutes, result.seconds
                );
            }
        }
        Command::Add { name, dob, phone } => {
            let dob = match dob {
                Some(raw) => Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d")?),
                None => None,
            };
            let contact = store.add(name, dob, phone)?;
            println!("Added {} ({})", contact.name, contact.id);
        }
        Command::Remove { query } => {
            let id = resolve(&store, &query)?.id;
            let removed = store.remove(id)?;
            println!("Removed {} ({})", removed.name, removed.id);
        }
        Command::Import { file } => {
            let content = fs::read_to_string(&file)?;
            let imported = match Format::from_path(&file) {
                Some(Format::Csv) => format::csv::parse(&content)?,
                Some(Format::Json) => format::json::parse(&content)?,
                _ => {
                    return Err(Error::new(
                        ErrorKind::UnknownFormat,
                        "only .csv and .json files can be imported",
                    )
                    .into())
                }
            };

            if imported.is_empty() {
                println!("Nothing to import.");
                return Ok(());
            }

            let outcome = format::merge_imported(&mut store, imported)?;
            println!("Imported {} new, updated {}.", outcome.added, outcome.updated);
        }
        Command::Export { format, output } => {
            if store.is_empty() {
                println!("Nothing to export.");
                return Ok(());
            }

            let content = match format {
                Format::Csv => format::csv::generate(store.all()),
                Format::Json => format::json::generate(store.all())?,
                Format::Ics => format::ics::generate(store.all(), today, config.horizon()),
            };

            match output {
                Some(path) => {
                    fs::write(&path, content)?;
                    println!("Wrote {}.", path.display());
                }
                None => println!("{}", content),
            }
        }
    }

    Ok(())
}
