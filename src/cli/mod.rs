//! Command-line interface for shelfkeeper.
//!
//! One-shot commands load the data file, run a single operation as the
//! `--user` given (if any), and save back when something changed. `shell`
//! starts the interactive menu instead.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use crate::config;
use crate::core::{Library, ReturnOutcome, Session};
use crate::domain::{Book, User};

pub mod shell;
pub mod table;

/// shelfkeeper - Catalog and lending manager for a small library
#[derive(Parser, Debug)]
#[command(name = "shelfkeeper")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Library data file (defaults to the configured one)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Act as this user
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Password for an admin --user
    #[arg(long, global = true, env = "SHELFKEEPER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a data file with the bootstrap users
    Init {
        /// Overwrite an existing data file
        #[arg(long)]
        force: bool,
    },

    /// List all books
    Books,

    /// Search books by title or author
    Search {
        /// Case-insensitive keyword
        keyword: String,
    },

    /// Show one book
    Show {
        isbn: String,
    },

    /// Add a book (admin only)
    Add {
        #[command(subcommand)]
        kind: AddKind,
    },

    /// Remove a book (admin only)
    Remove {
        isbn: String,
    },

    /// Borrow a book as --user
    Borrow {
        isbn: String,
    },

    /// Return a book
    Return {
        isbn: String,
    },

    /// List users
    Users,

    /// Register a user
    AddUser {
        user_id: String,
        name: String,

        /// Give the user the admin role
        #[arg(long, requires = "user_password")]
        admin: bool,

        /// Login password for an admin
        #[arg(long)]
        user_password: Option<String>,
    },

    /// Interactive menu
    Shell,

    /// Show resolved configuration (debug)
    Config,
}

/// Book variant to add
#[derive(Subcommand, Debug)]
pub enum AddKind {
    /// Printed book with a page count
    Printed {
        isbn: String,
        title: String,
        author: String,
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },

    /// Electronic book with a file size in MB
    Ebook {
        isbn: String,
        title: String,
        author: String,
        file_size: f64,
    },

    /// Book without variant details
    Base {
        isbn: String,
        title: String,
        author: String,
    },
}

impl From<AddKind> for Book {
    fn from(kind: AddKind) -> Self {
        match kind {
            AddKind::Printed {
                isbn,
                title,
                author,
                pages,
            } => Book::printed(isbn, title, author, pages),
            AddKind::Ebook {
                isbn,
                title,
                author,
                file_size,
            } => Book::digital(isbn, title, author, file_size),
            AddKind::Base {
                isbn,
                title,
                author,
            } => Book::new(isbn, title, author),
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let data_file = match self.data {
            Some(path) => path,
            None => config::data_file()?,
        };

        match self.command {
            Commands::Init { force } => init(data_file, force),
            Commands::Config => show_config(&data_file),
            Commands::Shell => run_shell(data_file),
            command => {
                let mut library = Library::open(&data_file)
                    .with_context(|| format!("Failed to open library: {}", data_file.display()))?;
                let session = match self.user.as_deref() {
                    Some(user_id) => library.login(user_id, self.password.as_deref())?,
                    None => Session::anonymous(),
                };

                debug!(?command, data = %data_file.display(), "Running command");
                let changed = run_command(&mut library, &session, command)?;
                if changed {
                    library.save_data(None)?;
                } else {
                    debug!("Nothing changed, data file left as is");
                }
                Ok(())
            }
        }
    }
}

/// Run a one-shot command. Returns whether library state changed.
fn run_command(library: &mut Library, session: &Session, command: Commands) -> Result<bool> {
    match command {
        Commands::Books => {
            let books = library.fetch_all_books();
            if books.is_empty() {
                println!("No books available.");
            } else {
                print!("{}", table::books(&books));
                println!("\nTotal: {} books", books.len());
            }
            Ok(false)
        }
        Commands::Search { keyword } => {
            let results = library.search_books(&keyword);
            if results.is_empty() {
                println!("No books found for: {}", keyword);
            } else {
                println!("Found {} result(s) for \"{}\":\n", results.len(), keyword);
                print!("{}", table::books(&results));
            }
            Ok(false)
        }
        Commands::Show { isbn } => {
            let book = library
                .get_book(&isbn)
                .ok_or_else(|| anyhow::anyhow!("Book not found: {}", isbn))?;
            println!("{}", book);
            println!("  Kind:   {} ({})", book.kind.label(), book.kind.detail());
            println!("  Status: {}", book.loan_state());
            Ok(false)
        }
        Commands::Add { kind } => {
            let book = Book::from(kind);
            let shown = book.to_string();
            library.add_book(session, book)?;
            println!("Book added: {}", shown);
            Ok(true)
        }
        Commands::Remove { isbn } => {
            let book = library.remove_book(session, &isbn)?;
            println!("Book removed: {}", book);
            Ok(true)
        }
        Commands::Borrow { isbn } => {
            let user = session
                .actor()
                .context("Borrowing needs --user <id>")?;
            let receipt = library.borrow_book(&isbn, &user.user_id)?;
            println!("{}", receipt);
            Ok(true)
        }
        Commands::Return { isbn } => {
            let outcome = library.return_book(&isbn)?;
            let title = library
                .get_book(&isbn)
                .map(|b| b.title.as_str())
                .unwrap_or(&isbn);
            match outcome {
                ReturnOutcome::Returned => {
                    println!("{} returned successfully.", title);
                    Ok(true)
                }
                ReturnOutcome::WasAvailable => {
                    println!("{} was not on loan.", title);
                    Ok(false)
                }
            }
        }
        Commands::Users => {
            print!("{}", table::users(library.directory().list_all()));
            Ok(false)
        }
        Commands::AddUser {
            user_id,
            name,
            admin,
            user_password,
        } => {
            let user = match (admin, user_password) {
                (true, Some(password)) => User::admin(user_id, name, password),
                (true, None) => anyhow::bail!("An admin needs --user-password"),
                (false, _) => User::member(user_id, name),
            };
            let shown = user.to_string();
            library.add_user(user)?;
            println!("User added: {}", shown);
            Ok(true)
        }
        other @ (Commands::Init { .. } | Commands::Shell | Commands::Config) => {
            anyhow::bail!("{:?} does not operate on an open library", other)
        }
    }
}

/// Create a fresh data file seeded with the bootstrap users
fn init(data_file: PathBuf, force: bool) -> Result<()> {
    if data_file.exists() && !force {
        anyhow::bail!(
            "Data file already exists: {} (use --force to overwrite)",
            data_file.display()
        );
    }

    let mut library = Library::new(data_file);
    let added = library.bootstrap_users(config::config()?.bootstrap_users.clone());
    let path = library.save_data(None)?;
    info!(path = %path.display(), users = added, force, "Initialized data file");

    println!("Initialized {} with {} user(s)", path.display(), added);
    Ok(())
}

/// Interactive menu on stdin/stdout
fn run_shell(data_file: PathBuf) -> Result<()> {
    let mut library = Library::open(&data_file)
        .with_context(|| format!("Failed to open library: {}", data_file.display()))?;
    if library.directory().is_empty() {
        let added = library.bootstrap_users(config::config()?.bootstrap_users.clone());
        info!(added, "Seeded an empty directory with bootstrap users");
    }
    debug!(data = %data_file.display(), "Starting interactive shell");

    let stdin = io::stdin();
    shell::Shell::new(&mut library, stdin.lock(), io::stdout()).run()?;
    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config(data_file: &std::path::Path) -> Result<()> {
    let cfg = config::config()?;

    println!("Config file: {}", cfg.config_file.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "(none - using defaults)".to_string()));
    println!();
    println!("Paths:");
    println!("  Home:      {}", cfg.home.display());
    println!("  Data file: {}", data_file.display());
    println!();
    println!("Bootstrap users:");
    for user in &cfg.bootstrap_users {
        println!("  {} ({})", user.user_id, user);
    }

    Ok(())
}
