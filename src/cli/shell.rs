//! Interactive menu over a library.
//!
//! Reads answers line by line from any `BufRead` and writes prompts and
//! results to any `Write`, so the whole loop can be driven from a test.

use std::io::{BufRead, Write};

use anyhow::Result;

use super::table;
use crate::core::{Library, LoadMode, ReturnOutcome, Session};
use crate::domain::{Book, BookKind};

const MENU: &str = "
============== Library Menu ==============
1. Login as User
2. Add Book (Admin only)
3. Remove Book (Admin only)
4. Issue Book
5. Return Book
6. Show All Books
7. Search Books
8. Save Data
9. Load Data
10. Logout
11. Exit";

/// Menu loop state
pub struct Shell<'a, R, W> {
    library: &'a mut Library,
    session: Session,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(library: &'a mut Library, input: R, output: W) -> Self {
        Self {
            library,
            session: Session::anonymous(),
            input,
            output,
        }
    }

    /// Run until the user picks Exit or input ends
    pub fn run(mut self) -> Result<Session> {
        loop {
            writeln!(self.output, "{}", MENU)?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                break;
            };

            let outcome = match choice.as_str() {
                "1" => self.login(),
                "2" => self.add_book(),
                "3" => self.remove_book(),
                "4" => self.borrow_book(),
                "5" => self.return_book(),
                "6" => self.show_books(),
                "7" => self.search_books(),
                "8" => self.save(),
                "9" => self.load(),
                "10" => self.logout(),
                "11" => {
                    writeln!(self.output, "Exiting the system. Goodbye!")?;
                    break;
                }
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    Ok(Flow::Continue)
                }
            };

            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::EndOfInput) => break,
                Err(e) => writeln!(self.output, "Error: {}", e)?,
            }
        }

        self.output.flush()?;
        Ok(self.session)
    }

    /// Print a prompt and read one trimmed line; `None` at end of input
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn login(&mut self) -> Result<Flow> {
        let Some(user_id) = self.prompt("Enter User ID: ")? else {
            return Ok(Flow::EndOfInput);
        };

        let is_admin = match self.library.directory().get(&user_id) {
            Some(user) => user.is_admin(),
            None => {
                writeln!(self.output, "User not found.")?;
                return Ok(Flow::Continue);
            }
        };

        let password = if is_admin {
            match self.prompt("Enter Admin password: ")? {
                Some(p) => Some(p),
                None => return Ok(Flow::EndOfInput),
            }
        } else {
            None
        };

        self.session = self.library.login(&user_id, password.as_deref())?;
        if let Some(user) = self.session.actor() {
            writeln!(self.output, "Logged in as {}", user)?;
        }
        Ok(Flow::Continue)
    }

    fn logout(&mut self) -> Result<Flow> {
        self.session.logout();
        writeln!(self.output, "You have been logged out.")?;
        Ok(Flow::Continue)
    }

    fn add_book(&mut self) -> Result<Flow> {
        let mut fields = Vec::with_capacity(4);
        for label in [
            "Enter ISBN: ",
            "Enter Title: ",
            "Enter Author: ",
            "Enter Book Kind (printed/ebook/base): ",
        ] {
            match self.prompt(label)? {
                Some(value) => fields.push(value),
                None => return Ok(Flow::EndOfInput),
            }
        }
        let [isbn, title, author, kind]: [String; 4] = match fields.try_into() {
            Ok(fields) => fields,
            Err(_) => anyhow::bail!("Incomplete book details"),
        };

        let kind = match kind.to_lowercase().as_str() {
            "printed" => {
                let Some(pages) = self.prompt("Enter Number of Pages: ")? else {
                    return Ok(Flow::EndOfInput);
                };
                let pages = pages
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Pages must be a valid integer."))?;
                BookKind::Printed { pages }
            }
            "ebook" | "digital" => {
                let Some(size) = self.prompt("Enter File Size (MB): ")? else {
                    return Ok(Flow::EndOfInput);
                };
                let file_size = size
                    .parse()
                    .map_err(|_| anyhow::anyhow!("File size must be a valid number."))?;
                BookKind::Digital { file_size }
            }
            "base" => BookKind::Base,
            _ => anyhow::bail!("Kind must be 'printed', 'ebook' or 'base'."),
        };

        self.library
            .add_book(&self.session, Book::with_kind(isbn, title, author, kind))?;
        writeln!(self.output, "Book added successfully.")?;
        Ok(Flow::Continue)
    }

    fn remove_book(&mut self) -> Result<Flow> {
        let Some(isbn) = self.prompt("Enter ISBN to remove: ")? else {
            return Ok(Flow::EndOfInput);
        };
        self.library.remove_book(&self.session, &isbn)?;
        writeln!(self.output, "Book removed successfully.")?;
        Ok(Flow::Continue)
    }

    fn borrow_book(&mut self) -> Result<Flow> {
        let Some(isbn) = self.prompt("Enter ISBN to borrow: ")? else {
            return Ok(Flow::EndOfInput);
        };

        // A logged-in actor borrows for themselves
        let user_id = match self.session.actor() {
            Some(user) => user.user_id.clone(),
            None => match self.prompt("Enter your User ID: ")? {
                Some(id) => id,
                None => return Ok(Flow::EndOfInput),
            },
        };

        let receipt = self.library.borrow_book(&isbn, &user_id)?;
        writeln!(self.output, "{}", receipt)?;
        Ok(Flow::Continue)
    }

    fn return_book(&mut self) -> Result<Flow> {
        let Some(isbn) = self.prompt("Enter ISBN to return: ")? else {
            return Ok(Flow::EndOfInput);
        };

        let outcome = self.library.return_book(&isbn)?;
        let title = self
            .library
            .get_book(&isbn)
            .map(|b| b.title.clone())
            .unwrap_or(isbn);
        match outcome {
            ReturnOutcome::Returned => writeln!(self.output, "{} returned successfully.", title)?,
            ReturnOutcome::WasAvailable => {
                writeln!(self.output, "{} was not on loan.", title)?
            }
        }
        Ok(Flow::Continue)
    }

    fn show_books(&mut self) -> Result<Flow> {
        let books = self.library.fetch_all_books();
        if books.is_empty() {
            writeln!(self.output, "No books available.")?;
        } else {
            write!(self.output, "{}", table::books(&books))?;
        }
        Ok(Flow::Continue)
    }

    fn search_books(&mut self) -> Result<Flow> {
        let Some(keyword) = self.prompt("Enter keyword to search: ")? else {
            return Ok(Flow::EndOfInput);
        };

        let results = self.library.search_books(&keyword);
        if results.is_empty() {
            writeln!(self.output, "No books found.")?;
        } else {
            for book in results {
                writeln!(self.output, "{}", book)?;
            }
        }
        Ok(Flow::Continue)
    }

    fn save(&mut self) -> Result<Flow> {
        let path = self.library.save_data(None)?;
        writeln!(self.output, "Data saved to {}.", path.display())?;
        Ok(Flow::Continue)
    }

    fn load(&mut self) -> Result<Flow> {
        let path = self.library.load_data(None, LoadMode::Replace)?;
        writeln!(self.output, "Data loaded from {}.", path.display())?;
        Ok(Flow::Continue)
    }
}

/// Whether the loop should keep going after a menu action
enum Flow {
    Continue,
    EndOfInput,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run(library: &mut Library, script: &str) -> (String, Session) {
        let mut output = Vec::new();
        let session = Shell::new(library, Cursor::new(script.to_string()), &mut output)
            .run()
            .unwrap();
        (String::from_utf8(output).unwrap(), session)
    }

    fn library() -> Library {
        let mut library = Library::new("unused.json");
        library.bootstrap_users(Library::default_users());
        library
    }

    #[test]
    fn test_add_requires_admin_login() {
        let mut library = library();

        let script = "2\n111\nA\nX\nprinted\n100\n1\nU1\nadmin123\n2\n111\nA\nX\nprinted\n100\n11\n";
        let (output, session) = run(&mut library, script);

        assert!(output.contains("Error: Access denied: only Admin can perform this action"));
        assert!(output.contains("Logged in as Ravindra, role : Admin"));
        assert!(output.contains("Book added successfully."));
        assert!(output.contains("Goodbye!"));
        assert_eq!(
            library.get_book("111").map(|b| b.kind),
            Some(BookKind::Printed { pages: 100 })
        );
        assert!(session.actor().is_some());
    }

    #[test]
    fn test_wrong_admin_password() {
        let mut library = library();
        let (output, session) = run(&mut library, "1\nU1\nguess\n");

        assert!(output.contains("Error: Authentication failed for user: U1"));
        assert!(session.actor().is_none());
    }

    #[test]
    fn test_member_borrow_and_return() {
        let mut library = library();
        let admin = library.login("U1", Some("admin123")).unwrap();
        library
            .add_book(&admin, Book::new("7", "Dune", "Herbert"))
            .unwrap();

        let script = "1\nU2\n4\n7\n4\n7\n5\n7\n5\n7\n10\n11\n";
        let (output, session) = run(&mut library, script);

        assert!(output.contains("Book Dune borrowed by Vinod"));
        assert!(output.contains("Error: Book is already borrowed: 7"));
        assert!(output.contains("Dune returned successfully."));
        assert!(output.contains("Dune was not on loan."));
        assert!(output.contains("You have been logged out."));
        assert!(session.actor().is_none());
    }

    #[test]
    fn test_invalid_input_keeps_running() {
        let mut library = library();
        let script = "42\n1\nU1\nadmin123\n2\n1\nT\nA\nprinted\nmany\n6\n";
        let (output, _) = run(&mut library, script);

        assert!(output.contains("Invalid choice. Please try again."));
        assert!(output.contains("Error: Pages must be a valid integer."));
        assert!(output.contains("No books available."));
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("library_data.json");
        let mut library = Library::new(&path);
        library.bootstrap_users(Library::default_users());

        let script = "1\nU1\nadmin123\n2\n9\nE\nB\nebook\n1.5\n8\n3\n9\n9\n7\ne\n";
        let (output, _) = run(&mut library, script);

        assert!(output.contains("Data saved to"));
        assert!(output.contains("Book removed successfully."));
        assert!(output.contains("Data loaded from"));
        assert!(output.contains("E by B (ISBN : 9)"));
        assert!(library.get_book("9").is_some());
    }
}
