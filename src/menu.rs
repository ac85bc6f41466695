//! Interactive command loop.
//!
//! A small state machine: the menu reads one letter and dispatches to a
//! handler, and each handler runs its own input-retry loop before
//! returning to the menu. The reader and writer are injected so tests
//! can drive the loop with canned input. EOF anywhere acts as quit.

use crate::backup;
use crate::error::Result;
use crate::normalize::{format_price, parse_price, parse_quantity};
use crate::reconcile;
use crate::store;
use chrono::{Local, NaiveDateTime, Timelike};
use rusqlite::Connection;
use std::io::{BufRead, Write};
use std::path::Path;

/// Display pattern for `updated_at` on the view screen.
const VIEW_TIMESTAMP_PATTERN: &str = "%H%M on %A, %b %d, %Y";

/// The closed set of menu commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ViewById,
    Add,
    Backup,
    Quit,
}

impl Command {
    pub const ALL: [Command; 4] = [
        Command::ViewById,
        Command::Add,
        Command::Backup,
        Command::Quit,
    ];

    pub fn key(self) -> char {
        match self {
            Command::ViewById => 'v',
            Command::Add => 'a',
            Command::Backup => 'b',
            Command::Quit => 'q',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Command::ViewById => "View a product by id",
            Command::Add => "Add or update a product",
            Command::Backup => "Back up the inventory to CSV",
            Command::Quit => "Quit",
        }
    }

    /// Matches a trimmed, case-insensitive command letter.
    pub fn from_key(input: &str) -> Option<Command> {
        let key = input.trim().to_lowercase();
        Command::ALL
            .into_iter()
            .find(|command| key == command.key().to_string())
    }
}

/// Runs the menu loop until the operator quits (or input ends).
pub fn run<R, W, P>(conn: &Connection, input: &mut R, output: &mut W, backup_path: P) -> Result<()>
where
    R: BufRead,
    W: Write,
    P: AsRef<Path>,
{
    loop {
        render_menu(output)?;
        let line = match read_line(input)? {
            Some(line) => line,
            None => return Ok(()),
        };
        match Command::from_key(&line) {
            Some(Command::Quit) => return Ok(()),
            Some(Command::ViewById) => view_by_id(conn, input, output)?,
            Some(Command::Add) => add(conn, input, output)?,
            Some(Command::Backup) => {
                let written = backup::write_backup(conn, backup_path.as_ref())?;
                writeln!(
                    output,
                    "Backed up {} products to {}.",
                    written,
                    backup_path.as_ref().display()
                )?;
            }
            None => writeln!(
                output,
                "Unknown choice '{}', please pick one of the listed letters.",
                line
            )?,
        }
    }
}

fn render_menu<W: Write>(output: &mut W) -> Result<()> {
    writeln!(output)?;
    for command in Command::ALL {
        writeln!(output, "{}) {}", command.key(), command.label())?;
    }
    write!(output, "\nAction: ")?;
    output.flush()?;
    Ok(())
}

/// Reads one trimmed line; `None` means end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// View-by-id handler. Accepts a positive integer no larger than the
/// number of existing ids; stays in the prompt loop until `r` or EOF.
fn view_by_id<R: BufRead, W: Write>(conn: &Connection, input: &mut R, output: &mut W) -> Result<()> {
    loop {
        writeln!(output, "[r] returns to the main menu.")?;
        write!(output, "Product id to view: ")?;
        output.flush()?;

        let line = match read_line(input)? {
            Some(line) => line,
            None => return Ok(()),
        };
        if line.eq_ignore_ascii_case("r") {
            return Ok(());
        }

        let id: i64 = match line.parse() {
            Ok(id) => id,
            Err(_) => {
                writeln!(output, "Try again with a whole number.")?;
                continue;
            }
        };

        let ids = store::list_ids_ordered(conn)?;
        if id < 1 || id > ids.len() as i64 {
            writeln!(output, "That id is not in the inventory. Try again.")?;
            continue;
        }

        match store::get_by_id(conn, id)? {
            Some(product) => {
                writeln!(output, "Product id: {}", product.id)?;
                writeln!(output, "Name: {}", product.name)?;
                writeln!(output, "Unit price: {}", format_price(product.price_cents))?;
                writeln!(output, "Units in stock: {}", product.quantity)?;
                writeln!(
                    output,
                    "Last updated: {}",
                    product.updated_at.format(VIEW_TIMESTAMP_PATTERN)
                )?;
            }
            None => writeln!(output, "That id is not in the inventory. Try again.")?,
        }
    }
}

/// Add handler. A bad quantity or price restarts the whole prompt
/// sequence; an existing name asks for overwrite confirmation, where
/// anything but `n` confirms.
fn add<R: BufRead, W: Write>(conn: &Connection, input: &mut R, output: &mut W) -> Result<()> {
    let (name, quantity, price_cents) = loop {
        write!(output, "Product name: ")?;
        output.flush()?;
        let name = match read_line(input)? {
            Some(line) => line,
            None => return Ok(()),
        };

        write!(output, "Units in stock: ")?;
        output.flush()?;
        let quantity_text = match read_line(input)? {
            Some(line) => line,
            None => return Ok(()),
        };

        write!(output, "Unit price: $")?;
        output.flush()?;
        let price_text = match read_line(input)? {
            Some(line) => line,
            None => return Ok(()),
        };

        let quantity = match parse_quantity(&quantity_text) {
            Ok(quantity) => quantity,
            Err(_) => {
                writeln!(output, "Hmm, something's not right, let's try that again.")?;
                continue;
            }
        };
        let price_cents = match parse_price(&price_text) {
            Ok(price_cents) => price_cents,
            Err(_) => {
                writeln!(output, "Hmm, something's not right, let's try that again.")?;
                continue;
            }
        };
        break (name, quantity, price_cents);
    };

    match store::get_by_name(conn, &name)? {
        None => {
            store::create(conn, &name, quantity, price_cents, now())?;
            writeln!(output, "{} added to the inventory.", name)?;
        }
        Some(existing) => {
            writeln!(output, "{} is already in the inventory.", name)?;
            write!(output, "[y] overwrites the existing record, [n] keeps it: ")?;
            output.flush()?;
            let answer = match read_line(input)? {
                Some(line) => line,
                None => return Ok(()),
            };
            if answer.eq_ignore_ascii_case("n") {
                writeln!(output, "Ok, keeping the existing record.")?;
            } else {
                reconcile::overwrite(conn, &existing, quantity, price_cents, now())?;
                writeln!(output, "{} saved.", name)?;
            }
        }
    }
    Ok(())
}

/// Current local time, truncated to whole seconds to match the stored
/// timestamp resolution.
fn now() -> NaiveDateTime {
    let stamp = Local::now().naive_local();
    stamp.with_nanosecond(0).unwrap_or(stamp)
}
