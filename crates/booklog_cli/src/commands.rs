//! Command dispatch: config, logging, store bootstrap and intent handling.

use crate::cli::{AddArgs, Cli, Command, EditArgs};
use crate::config::AppConfig;
use crate::render::{self, Notice};
use booklog_core::db::open_db;
use booklog_core::{
    current_year, init_logging, Book, BookId, BookInput, BookStore, Catalogue, GroupCriterion,
    SqliteBookStore,
};
use clap::Parser;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use uuid::Uuid;

/// Runs one CLI invocation and returns a printable error on failure.
pub fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli);

    if let Some(log_dir) = config.log_dir.to_str() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }
    info!(
        "event=cli_start module=cli status=ok command={}",
        command_name(&cli.command)
    );

    let conn = open_db(&config.db_path)
        .map_err(|err| format!("failed to open `{}`: {err}", config.db_path.display()))?;
    let store = SqliteBookStore::new(&conn);
    let mut catalogue =
        Catalogue::open(&store).map_err(|err| format!("failed to load books: {err}"))?;

    let outcome = dispatch(&mut catalogue, cli.command);
    catalogue.close();
    outcome
}

fn dispatch<S: BookStore>(catalogue: &mut Catalogue<S>, command: Command) -> Result<(), String> {
    if let Some(feed_error) = catalogue.feed_error() {
        eprintln!("warning: book list may be out of date: {feed_error}");
    }

    match command {
        Command::Add(args) => add(catalogue, args),
        Command::Edit(args) => edit(catalogue, args),
        Command::Delete { id, yes } => delete(catalogue, &id, yes),
        Command::List { group_by, json } => {
            list(catalogue, group_by, json);
            Ok(())
        }
        Command::Recommend { seed, year, json } => {
            recommend(catalogue, seed, year, json);
            Ok(())
        }
        Command::Show { id, json } => {
            let book = find(catalogue, &id)?;
            if json {
                println!("{}", to_json(book));
            } else {
                println!("{}", render::book_card(book));
            }
            Ok(())
        }
    }
}

fn add<S: BookStore>(catalogue: &mut Catalogue<S>, args: AddArgs) -> Result<(), String> {
    let input = BookInput {
        name: args.name,
        authors: args.authors,
        year: args.year,
        rating: args.rating,
        isbn: args.isbn,
    };
    match catalogue.add_book(&input) {
        Ok(id) => {
            emit(&Notice::new(
                "Book Added",
                format!("The book has been added successfully. id={id}"),
            ));
            Ok(())
        }
        Err(err) => fail(Notice::from_catalogue_error("add", &err)),
    }
}

fn edit<S: BookStore>(catalogue: &mut Catalogue<S>, args: EditArgs) -> Result<(), String> {
    let book = find(catalogue, &args.id)?;
    let id = book.id;
    let mut input = BookInput::from_book(book);
    if let Some(name) = args.name {
        input.name = name;
    }
    if let Some(authors) = args.authors {
        input.authors = authors;
    }
    overwrite(&mut input.year, args.year);
    overwrite(&mut input.rating, args.rating);
    overwrite(&mut input.isbn, args.isbn);

    match catalogue.edit_book(id, &input) {
        Ok(()) => {
            emit(&Notice::new(
                "Book Updated",
                "The book has been updated successfully.",
            ));
            Ok(())
        }
        Err(err) => fail(Notice::from_catalogue_error("update", &err)),
    }
}

fn delete<S: BookStore>(
    catalogue: &mut Catalogue<S>,
    raw_id: &str,
    yes: bool,
) -> Result<(), String> {
    let book = find(catalogue, raw_id)?;
    if !yes {
        println!("{}", render::delete_confirmation(book));
        return Ok(());
    }

    let id = book.id;
    match catalogue.delete_book(id) {
        Ok(()) => {
            emit(&Notice::new(
                "Book Deleted",
                "The book has been deleted successfully.",
            ));
            Ok(())
        }
        Err(err) => fail(Notice::from_catalogue_error("delete", &err)),
    }
}

fn list<S: BookStore>(catalogue: &mut Catalogue<S>, group_by: GroupCriterion, json: bool) {
    catalogue.set_group_by(group_by);
    let groups = catalogue.groups();
    if json {
        println!("{}", to_json(&groups));
    } else {
        println!("{}", render::grouped_list(group_by, &groups));
    }
}

fn recommend<S: BookStore>(
    catalogue: &Catalogue<S>,
    seed: Option<u64>,
    year: Option<i32>,
    json: bool,
) {
    let mut rng: Box<dyn RngCore> = match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    };
    let picked = catalogue.recommendation(year.unwrap_or_else(current_year), &mut *rng);
    if json {
        println!("{}", to_json(&picked));
    } else {
        println!("{}", render::recommendation(picked));
    }
}

fn find<'c, S: BookStore>(catalogue: &'c Catalogue<S>, raw_id: &str) -> Result<&'c Book, String> {
    let id: BookId =
        Uuid::parse_str(raw_id.trim()).map_err(|_| format!("invalid book id `{raw_id}`"))?;
    catalogue.book(id).ok_or_else(|| {
        warn!("event=book_lookup module=cli status=error book_id={id} error_code=not_found");
        format!("book not found: {id}")
    })
}

/// Applies an optional flag to an optional form field; `Some("")` clears it.
fn overwrite(field: &mut Option<String>, flag: Option<String>) {
    if let Some(value) = flag {
        *field = Some(value);
    }
}

fn emit(notice: &Notice) {
    println!("{notice}");
}

fn fail(notice: Notice) -> Result<(), String> {
    Err(notice.to_string())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"))
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Add(_) => "add",
        Command::Edit(_) => "edit",
        Command::Delete { .. } => "delete",
        Command::List { .. } => "list",
        Command::Recommend { .. } => "recommend",
        Command::Show { .. } => "show",
    }
}
