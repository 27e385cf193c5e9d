//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::commands::{self, ListFilter};
use super::output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "datefile")]
#[command(author, version, about = "Name, match, and enumerate date-named files")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the filename for a template and a date
    Name {
        /// Template, e.g. 'daily_update_%Y-%m-%d.txt'
        template: String,

        /// Any date-ish value: '20230615', '2023-06-15 10:30', a unix timestamp
        date: String,
    },

    /// Recover the date embedded in a filename
    Extract {
        template: String,

        /// Filename to decode
        filename: String,
    },

    /// Check whether a filename matches a template (exit 1 when it doesn't)
    Match {
        template: String,

        filename: String,
    },

    /// List the template-matching files in a directory, oldest first
    List {
        template: String,

        /// Directory to scan
        dir: String,

        /// Keep files dated on or after this date
        #[arg(long)]
        since: Option<String>,

        /// Keep files dated strictly after this date
        #[arg(long)]
        after: Option<String>,

        /// Keep files dated strictly before this date
        #[arg(long)]
        before: Option<String>,

        /// Keep files dated on or before this date
        #[arg(long)]
        on_or_before: Option<String>,

        /// Print only the earliest file
        #[arg(long)]
        first: bool,

        /// Print only the latest file
        #[arg(long, conflicts_with = "first")]
        last: bool,
    },

    /// Check whether the file for a given date exists in a directory
    Has {
        template: String,

        dir: String,

        date: String,
    },

    /// Print one filename per calendar day from a start date through today
    DailySince {
        template: String,

        /// First day of the range
        date: String,

        /// Stop at yesterday instead of today
        #[arg(long)]
        through_yesterday: bool,

        /// Drop the start day itself
        #[arg(long)]
        skip_start: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    match cli.command {
        Commands::Name { template, date } => commands::name(&output, &template, &date),
        Commands::Extract { template, filename } => {
            commands::extract(&output, &template, &filename)
        }
        Commands::Match { template, filename } => {
            commands::match_filename(&output, &template, &filename)
        }
        Commands::List {
            template,
            dir,
            since,
            after,
            before,
            on_or_before,
            first,
            last,
        } => {
            let filter = ListFilter {
                since,
                after,
                before,
                on_or_before,
                first,
                last,
            };
            commands::list(&output, &template, &dir, &filter)
        }
        Commands::Has { template, dir, date } => commands::has(&output, &template, &dir, &date),
        Commands::DailySince {
            template,
            date,
            through_yesterday,
            skip_start,
        } => commands::daily_since(&output, &template, &date, through_yesterday, skip_start),
    }
}
