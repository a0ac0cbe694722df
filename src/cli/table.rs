//! Plain-text tables for listings.

use crate::domain::{Book, User};

/// Render rows under a header, padding each column to its widest cell
fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(headers.to_vec()));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

/// Books as ISBN | Title | Author | Kind | Pages/Size | Borrowed
pub fn books(books: &[&Book]) -> String {
    let rows: Vec<Vec<String>> = books
        .iter()
        .map(|b| {
            vec![
                b.isbn.clone(),
                b.title.clone(),
                b.author.clone(),
                b.kind.label().to_string(),
                b.kind.detail(),
                if b.borrowed { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();

    render(
        &["ISBN", "Title", "Author", "Kind", "Pages/Size", "Borrowed"],
        &rows,
    )
}

/// Users as ID | Name | Role
pub fn users<'a>(users: impl IntoIterator<Item = &'a User>) -> String {
    let rows: Vec<Vec<String>> = users
        .into_iter()
        .map(|u| vec![u.user_id.clone(), u.name.clone(), u.role.to_string()])
        .collect();

    render(&["ID", "Name", "Role"], &rows)
}
