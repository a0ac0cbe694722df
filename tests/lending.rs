//! Lending Integration Tests
//!
//! Borrow/return scenarios and role gating through the public facade.

use shelfkeeper::{Book, Library, LibraryError, LoanState, ReturnOutcome, Role, Session, User};

fn library() -> (Library, Session, Session) {
    let mut library = Library::new("unused.json");
    library.add_user(User::admin("U1", "Ravindra", "admin123")).unwrap();
    library.add_user(User::member("U2", "Vinod")).unwrap();

    let admin = library.login("U1", Some("admin123")).unwrap();
    let member = library.login("U2", None).unwrap();
    (library, admin, member)
}

#[test]
fn test_borrow_return_scenario() {
    let (mut library, admin, _) = library();
    assert!(library.fetch_all_books().is_empty());

    library
        .add_book(&admin, Book::printed("111", "A", "X", 100))
        .unwrap();

    library.borrow_book("111", "U2").unwrap();
    assert_eq!(library.catalog().state("111"), Some(LoanState::OnLoan));
    assert!(library.get_book("111").unwrap().borrowed);

    match library.borrow_book("111", "U2") {
        Err(LibraryError::AlreadyBorrowed { isbn }) => assert_eq!(isbn, "111"),
        other => panic!("Expected AlreadyBorrowed, got {:?}", other),
    }

    assert_eq!(library.return_book("111").unwrap(), ReturnOutcome::Returned);
    assert_eq!(library.catalog().state("111"), Some(LoanState::Available));
}

#[test]
fn test_return_of_available_book_succeeds_silently() {
    let (mut library, admin, _) = library();
    library.add_book(&admin, Book::new("5", "T", "A")).unwrap();

    assert_eq!(
        library.return_book("5").unwrap(),
        ReturnOutcome::WasAvailable
    );
    assert_eq!(
        library.return_book("5").unwrap(),
        ReturnOutcome::WasAvailable
    );
    assert!(!library.get_book("5").unwrap().borrowed);
}

#[test]
fn test_operations_on_missing_isbn() {
    let (mut library, admin, _) = library();

    assert!(library.get_book("404").is_none());
    assert!(matches!(
        library.remove_book(&admin, "404"),
        Err(LibraryError::NotFound { .. })
    ));
    assert!(matches!(
        library.borrow_book("404", "U2"),
        Err(LibraryError::NotFound { .. })
    ));
    assert!(matches!(
        library.return_book("404"),
        Err(LibraryError::NotFound { .. })
    ));
}

#[test]
fn test_role_gating() {
    let (mut library, admin, member) = library();
    let book = Book::digital("222", "Dune", "Herbert", 4.5);

    match library.add_book(&member, book.clone()) {
        Err(LibraryError::PermissionDenied { required, actor }) => {
            assert_eq!(required, Role::Admin);
            assert_eq!(actor.as_deref(), Some("U2"));
        }
        other => panic!("Expected PermissionDenied, got {:?}", other),
    }
    assert!(matches!(
        library.add_book(&Session::anonymous(), book.clone()),
        Err(LibraryError::PermissionDenied { actor: None, .. })
    ));

    library.add_book(&admin, book.clone()).unwrap();
    assert_eq!(library.get_book("222"), Some(&book));

    assert!(matches!(
        library.add_book(&admin, book),
        Err(LibraryError::DuplicateKey { .. })
    ));
}

#[test]
fn test_lending_is_open_to_any_caller() {
    let (mut library, admin, _) = library();
    library.add_book(&admin, Book::new("1", "T", "A")).unwrap();

    // Borrow and return take no session at all
    library.borrow_book("1", "U1").unwrap();
    library.return_book("1").unwrap();
}

#[test]
fn test_remove_borrowed_book() {
    let (mut library, admin, _) = library();
    library.add_book(&admin, Book::new("1", "T", "A")).unwrap();
    library.borrow_book("1", "U2").unwrap();

    let removed = library.remove_book(&admin, "1").unwrap();
    assert!(removed.borrowed);
    assert!(library.get_book("1").is_none());
}

#[test]
fn test_search_scenario() {
    let (mut library, admin, _) = library();
    let lion = Book::printed("1", "The Lion King", "J. King", 96);
    library.add_book(&admin, lion.clone()).unwrap();
    library
        .add_book(&admin, Book::printed("2", "Silmarillion", "Tolkien", 365))
        .unwrap();

    let results = library.search_books("king");
    assert_eq!(results, vec![&lion]);
}

#[test]
fn test_logout_drops_privileges() {
    let (mut library, mut admin, _) = library();
    admin.logout();

    assert!(matches!(
        library.add_book(&admin, Book::new("1", "T", "A")),
        Err(LibraryError::PermissionDenied { .. })
    ));
}
