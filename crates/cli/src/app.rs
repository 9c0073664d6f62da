use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use bookshelf_core::{Catalog, CatalogStore};
use tracing::{debug, info, warn};

const MENU: &str = "\nWelcome to Library Management System
1. Add Book
2. Search Book by ID
3. Search Book by Title
4. Issue Book
5. Return Book
6. List All Books
7. Remove Book
8. Exit LMS
Enter your choice: ";

const INVALID_CHOICE: &str = "Invalid choice. Please try again!!";
const INVALID_ID: &str = "Invalid book ID. Please enter a number.";
const EMPTY_STUDENT: &str = "Student name cannot be empty.";

/// Menu entries, numbered as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AddBook,
    SearchById,
    SearchByTitle,
    IssueBook,
    ReturnBook,
    ListAll,
    RemoveBook,
    Exit,
}

impl Command {
    /// Parse a menu choice such as `"4"`. Surrounding whitespace is ignored.
    pub fn from_choice(input: &str) -> Option<Self> {
        let command = match input.trim().parse::<u8>().ok()? {
            1 => Command::AddBook,
            2 => Command::SearchById,
            3 => Command::SearchByTitle,
            4 => Command::IssueBook,
            5 => Command::ReturnBook,
            6 => Command::ListAll,
            7 => Command::RemoveBook,
            8 => Command::Exit,
            _ => return None,
        };
        Some(command)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Interactive menu loop over a catalog.
///
/// End of input is treated like choosing Exit. The catalog is handed back
/// through [`App::into_catalog`] so the caller can persist it.
pub struct App<R, W> {
    catalog: Catalog,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(catalog: Catalog, input: R, output: W) -> Self {
        Self {
            catalog,
            input,
            output,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        info!("menu loop started with {} books", self.catalog.len());
        loop {
            self.write(MENU)?;
            let Some(choice) = self.read_line()? else {
                debug!("input closed at menu");
                break;
            };
            let Some(command) = Command::from_choice(&choice) else {
                self.say(INVALID_CHOICE)?;
                continue;
            };
            debug!(?command, "dispatching");
            if self.dispatch(command)? == Flow::Exit {
                break;
            }
        }
        self.say("Exiting the system.")?;
        Ok(())
    }

    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    fn dispatch(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::AddBook => {
                let Some(id) = self.prompt_id()? else {
                    return Ok(Flow::Exit);
                };
                let Some(title) = self.prompt_line("Enter book title: ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(author) = self.prompt_line("Enter book author: ")? else {
                    return Ok(Flow::Exit);
                };
                let outcome = self.catalog.add_book(id, title, author);
                info!(id, "book added");
                self.say(outcome)?;
            }
            Command::SearchById => {
                let Some(id) = self.prompt_id()? else {
                    return Ok(Flow::Exit);
                };
                let message = self.catalog.search_by_id(id).to_string();
                self.say(message)?;
            }
            Command::SearchByTitle => {
                let Some(title) = self.prompt_line("Enter book title: ")? else {
                    return Ok(Flow::Exit);
                };
                let message = self.catalog.search_by_title(&title).to_string();
                self.say(message)?;
            }
            Command::IssueBook => {
                let Some(id) = self.prompt_id()? else {
                    return Ok(Flow::Exit);
                };
                let Some(student) = self.prompt_student()? else {
                    return Ok(Flow::Exit);
                };
                let outcome = self.catalog.issue_book(id, &student);
                info!(id, outcome = %outcome, "issue requested");
                self.say(outcome)?;
            }
            Command::ReturnBook => {
                let Some(id) = self.prompt_id()? else {
                    return Ok(Flow::Exit);
                };
                let outcome = self.catalog.return_book(id);
                info!(id, outcome = %outcome, "return requested");
                self.say(outcome)?;
            }
            Command::ListAll => {
                let listing = self
                    .catalog
                    .list_all()
                    .into_iter()
                    .map(|book| format!("{book}\n"))
                    .collect::<String>();
                self.write(&listing)?;
            }
            Command::RemoveBook => {
                let Some(id) = self.prompt_id()? else {
                    return Ok(Flow::Exit);
                };
                let outcome = self.catalog.remove_book(id);
                info!(id, outcome = %outcome, "remove requested");
                self.say(outcome)?;
            }
            Command::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    /// Ask for a book id until the answer parses. `None` on end of input.
    fn prompt_id(&mut self) -> Result<Option<i64>> {
        loop {
            let Some(answer) = self.prompt_line("Enter book ID: ")? else {
                return Ok(None);
            };
            match answer.trim().parse::<i64>() {
                Ok(id) => return Ok(Some(id)),
                Err(_) => {
                    debug!(answer = %answer, "rejected book id");
                    self.say(INVALID_ID)?;
                }
            }
        }
    }

    /// Ask for a borrower until a non-blank name is given.
    fn prompt_student(&mut self) -> Result<Option<String>> {
        loop {
            let Some(name) = self.prompt_line("Enter student name: ")? else {
                return Ok(None);
            };
            if !name.trim().is_empty() {
                return Ok(Some(name));
            }
            self.say(EMPTY_STUDENT)?;
        }
    }

    fn prompt_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.write(prompt)?;
        self.read_line()
    }

    /// Read one line without its terminator. `None` on end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read from input")?;
        if read == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    fn say(&mut self, message: impl std::fmt::Display) -> Result<()> {
        writeln!(self.output, "{message}").context("failed to write to output")
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.output
            .write_all(text.as_bytes())
            .and_then(|_| self.output.flush())
            .context("failed to write to output")
    }
}

/// Load the catalog, run the menu until Exit or end of input, then save.
///
/// The save happens even when the menu loop fails; a failed save is logged
/// and does not change the returned result.
pub fn run_session<R: BufRead, W: Write>(
    store: &CatalogStore,
    input: R,
    output: W,
) -> Result<()> {
    let catalog = store.load_or_empty();
    let mut app = App::new(catalog, input, output);
    let outcome = app.run();

    let catalog = app.into_catalog();
    match store.save(&catalog) {
        Ok(()) => info!("catalog persisted"),
        Err(err) => warn!("catalog not persisted this run: {err:#}"),
    }

    outcome
}
