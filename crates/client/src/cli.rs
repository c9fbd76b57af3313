//! Command-line parsing for the `catalog` binary.

use std::path::PathBuf;
use std::str::FromStr;

use catalog_core::bulk_import::FileRejection;
use catalog_core::error::{CoreError, RemoteFailure};
use catalog_core::filter::FilterCriteria;
use catalog_core::query::{SortField, SortSpec};
use catalog_core::types::DbId;
use rust_decimal::Decimal;

use crate::error::{ApiError, ConfigError};

pub const USAGE: &str = "\
Usage: catalog <command> [options]

Commands:
  list        List products
                --search <text>  --category <id>  --min <price>  --max <price>
                --active <true|false>  --sort <name|price>  --desc
                --page <n>  --page-size <10|20|50|100>
  categories  List active categories
  template <path>  Write the bulk import template CSV
  check <path>     Check a CSV file against the import schema
  import <path>    Upload a spreadsheet for bulk import
  delete <id>      Delete a product and show the refreshed list";

/// Options of `catalog list`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListArgs {
    pub criteria: FilterCriteria,
    pub sort: Option<SortSpec>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List(ListArgs),
    Categories,
    Template(PathBuf),
    Check(PathBuf),
    Import(PathBuf),
    Delete(DbId),
    Help,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}\n\n{usage}", usage = USAGE)]
    Usage(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{0}")]
    Remote(#[from] RemoteFailure),

    #[error("File rejected ({code}): {0}", code = .0.reason_code())]
    Rejected(#[from] FileRejection),

    #[error("Import not submitted: {0}")]
    NotSubmitted(&'static str),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Parse the arguments following the program name.
pub fn parse<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(command) = args.next() else {
        return Ok(Command::Help);
    };

    match command.as_str() {
        "list" => parse_list(args).map(Command::List),
        "categories" => no_more(args, Command::Categories),
        "template" => single_path(args, "template").map(Command::Template),
        "check" => single_path(args, "check").map(Command::Check),
        "import" => single_path(args, "import").map(Command::Import),
        "delete" => {
            let raw = required(args.next(), "delete", "<id>")?;
            let id = parse_value::<DbId>(&raw, "<id>")?;
            no_more(args, Command::Delete(id))
        }
        "help" | "-h" | "--help" => Ok(Command::Help),
        other => Err(CliError::Usage(format!("Unknown command '{other}'"))),
    }
}

fn parse_list(mut args: impl Iterator<Item = String>) -> Result<ListArgs, CliError> {
    let mut list = ListArgs::default();
    let mut sort_field = None;
    let mut descending = false;

    while let Some(flag) = args.next() {
        if flag == "--desc" {
            descending = true;
            continue;
        }
        let value = required(args.next(), "list", &flag)?;
        match flag.as_str() {
            "--search" => list.criteria.search = value,
            "--category" => list.criteria.category_id = Some(parse_value(&value, &flag)?),
            "--min" => list.criteria.price_min = Some(parse_value::<Decimal>(&value, &flag)?),
            "--max" => list.criteria.price_max = Some(parse_value::<Decimal>(&value, &flag)?),
            "--active" => list.criteria.active = Some(parse_value(&value, &flag)?),
            "--page" => list.page = Some(parse_value(&value, &flag)?),
            "--page-size" => list.page_size = Some(parse_value(&value, &flag)?),
            "--sort" => {
                sort_field = Some(SortField::parse(&value).ok_or_else(|| {
                    CliError::Usage(format!("--sort must be 'name' or 'price', got '{value}'"))
                })?);
            }
            other => return Err(CliError::Usage(format!("Unknown option '{other}' for list"))),
        }
    }

    list.sort = match (sort_field, descending) {
        (Some(field), false) => Some(SortSpec::ascending(field)),
        (Some(field), true) => Some(SortSpec::descending(field)),
        (None, false) => None,
        (None, true) => return Err(CliError::Usage("--desc requires --sort".to_string())),
    };
    Ok(list)
}

fn single_path(mut args: impl Iterator<Item = String>, command: &str) -> Result<PathBuf, CliError> {
    let path = PathBuf::from(required(args.next(), command, "<path>")?);
    no_more(args, path)
}

fn required(value: Option<String>, command: &str, what: &str) -> Result<String, CliError> {
    value.ok_or_else(|| CliError::Usage(format!("{command}: missing value for {what}")))
}

fn no_more<T>(mut args: impl Iterator<Item = String>, value: T) -> Result<T, CliError> {
    match args.next() {
        Some(extra) => Err(CliError::Usage(format!("Unexpected argument '{extra}'"))),
        None => Ok(value),
    }
}

fn parse_value<T: FromStr>(raw: &str, what: &str) -> Result<T, CliError> {
    raw.trim()
        .parse()
        .map_err(|_| CliError::Usage(format!("Invalid value '{raw}' for {what}")))
}
