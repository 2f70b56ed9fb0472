use std::{fs::read, path::PathBuf};

use anyhow::{bail, Context, Result};
use bcc_core::{BinCollection, DateKey};
use clap::{ArgGroup, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about = "Look up bin collections in a calendar feed")]
#[command(group(ArgGroup::new("source").required(true).multiple(true).args(["url", "file"])))]
pub struct Arguments {
    /// the URL of the calendar feed
    #[arg(long, env = "BCC_FEED_URL")]
    pub url: Option<String>,
    /// read the calendar feed from a file, this takes precedence over the URL
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// the dates to look up as YYYY-MM-DD, defaults to today
    pub dates: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Arguments::parse();
    let mut collection = BinCollection::new();
    match (&args.url, &args.file) {
        (_, Some(path)) => {
            let bytes = read(path).with_context(|| format!("reading {}", path.display()))?;
            collection.load_bytes(&bytes)?;
        }
        (Some(url), None) => collection
            .download(url)
            .with_context(|| format!("downloading {url}"))?,
        (None, None) => bail!("either a feed URL or a feed file is required"),
    }
    debug!(dates = collection.len(), "loaded collection calendar");
    let dates = if args.dates.is_empty() {
        vec![DateKey::from(chrono::Local::now().date_naive()).to_string()]
    } else {
        args.dates
    };
    for date in dates {
        println!("{date}: {}", collection.summary(&date));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::{CommandFactory, Parser};

    use crate::Arguments;

    #[test]
    fn test_arguments_definition() {
        Arguments::command().debug_assert();
    }

    #[test]
    fn test_arguments_need_a_source() {
        assert!(Arguments::try_parse_from(["bcc_cli", "2018-02-06"]).is_err());
        let args = Arguments::try_parse_from([
            "bcc_cli",
            "--file",
            "binfeed.ics",
            "2018-02-06",
            "20180320",
        ])
        .unwrap();
        assert_eq!(args.dates, vec!["2018-02-06", "20180320"]);
    }

    #[test]
    fn test_arguments_accept_file_and_url() {
        let args = Arguments::try_parse_from([
            "bcc_cli",
            "--url",
            "https://example.org/binfeed.ical",
            "--file",
            "binfeed.ics",
        ])
        .unwrap();
        assert_eq!(args.url.as_deref(), Some("https://example.org/binfeed.ical"));
        assert_eq!(args.file, Some(PathBuf::from("binfeed.ics")));
        assert!(args.dates.is_empty());
    }
}
