use chrono::{DateTime, Utc};
use itinera_shared::{FilterType, PointType, SortType, UnknownKey};
use std::str::FromStr;

/// Form a command addresses: a list row (1-based) or the creation form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Row(usize),
    Creation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Price(i64),
    Destination(String),
    Type(PointType),
    /// 1-based position among the offers available for the form's type
    Offer(usize),
    Dates {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
    Picker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Open(usize),
    Close(Target),
    Save(Target),
    Delete(usize),
    Favorite(usize),
    Edit(Target, FieldEdit),
    Sort(SortType),
    Filter(FilterType),
    New,
    Escape,
    Dump,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Nothing to do")]
    Empty,

    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("Missing {0}")]
    MissingArgument(&'static str),

    #[error("Not a number: {0}")]
    InvalidNumber(String),

    #[error("Not an RFC 3339 timestamp: {0}")]
    InvalidDate(String),

    #[error(transparent)]
    UnknownKey(#[from] UnknownKey),
}

pub const HELP: &str = "\
Commands:
  show                      render the screen
  open <n> | close <n|new>  expand or collapse a row (close new cancels creation)
  save <n|new>              submit a form
  delete <n>                delete the point in row n (form must be open)
  fav <n>                   toggle favorite
  price <n|new> <amount>    set the base price
  dest <n|new> <city>       set the destination
  type <n|new> <type>       set the point type
  offer <n|new> <k>         toggle the k-th available offer
  dates <n|new> <from> <to> set dates (RFC 3339)
  picker <n|new>            open the date picker
  sort <day|time|price>     change sort
  filter <everything|future|present|past>
  new                       open the creation form
  esc                       press Escape
  dump                      print the stored points as JSON
  quit";

/// Parses one input line
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Err(CommandError::Empty);
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "show" | "list" | "ls" => Command::Show,
        "open" => Command::Open(row(words.next())?),
        "close" => Command::Close(target(words.next())?),
        "save" => Command::Save(target(words.next())?),
        "delete" | "rm" => Command::Delete(row(words.next())?),
        "fav" => Command::Favorite(row(words.next())?),
        "price" => {
            let target = target(words.next())?;
            let amount = number(words.next(), "amount")?;
            Command::Edit(target, FieldEdit::Price(amount))
        }
        "dest" => {
            let target = target(words.next())?;
            let city = words.collect::<Vec<_>>().join(" ");
            if city.is_empty() {
                return Err(CommandError::MissingArgument("city"));
            }
            Command::Edit(target, FieldEdit::Destination(city))
        }
        "type" => {
            let target = target(words.next())?;
            let point_type = key(words.next(), "point type")?;
            Command::Edit(target, FieldEdit::Type(point_type))
        }
        "offer" => {
            let target = target(words.next())?;
            let index = number(words.next(), "offer number")?;
            Command::Edit(target, FieldEdit::Offer(index))
        }
        "dates" => {
            let target = target(words.next())?;
            let from = date(words.next())?;
            let to = date(words.next())?;
            Command::Edit(target, FieldEdit::Dates { from, to })
        }
        "picker" => Command::Edit(target(words.next())?, FieldEdit::Picker),
        "sort" => Command::Sort(key(words.next(), "sort")?),
        "filter" => Command::Filter(key(words.next(), "filter")?),
        "new" => Command::New,
        "esc" | "escape" => Command::Escape,
        "dump" => Command::Dump,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn number<T: FromStr>(word: Option<&str>, what: &'static str) -> Result<T, CommandError> {
    let word = word.ok_or(CommandError::MissingArgument(what))?;
    word.parse()
        .map_err(|_| CommandError::InvalidNumber(word.to_string()))
}

fn row(word: Option<&str>) -> Result<usize, CommandError> {
    number(word, "row number")
}

fn target(word: Option<&str>) -> Result<Target, CommandError> {
    match word {
        Some("new") => Ok(Target::Creation),
        other => row(other).map(Target::Row),
    }
}

fn key<T>(word: Option<&str>, what: &'static str) -> Result<T, CommandError>
where
    T: FromStr<Err = UnknownKey>,
{
    Ok(word.ok_or(CommandError::MissingArgument(what))?.parse()?)
}

fn date(word: Option<&str>) -> Result<DateTime<Utc>, CommandError> {
    let word = word.ok_or(CommandError::MissingArgument("date"))?;
    DateTime::parse_from_rfc3339(word)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| CommandError::InvalidDate(word.to_string()))
}
