//! Human-readable outline of an item and, for books, its entries.

use std::fmt;

use super::item::{BlueprintBook, BlueprintItem};

const INDENT: &str = "  ";

/// Display adapter returned by [`describe`].
pub struct Description<'a> {
    item: &'a BlueprintItem,
    max_depth: usize,
}

/// Outline an item: a header line, then for books one line per entry.
///
/// Nested books are expanded while the remaining depth is above zero; the
/// depth decreases by one per level, so `max_depth = 0` lists only the
/// top-level entries no matter how deep the book is.
///
/// ```text
/// Blueprint Book: My Book (version 1.1.110)
///   [0] Blueprint: Smelting
///   [5] Blueprint Book: Nested
///     [0] Upgrade Planner: Belts
/// ```
pub fn describe(item: &BlueprintItem, max_depth: usize) -> Description<'_> {
    Description { item, max_depth }
}

impl fmt::Display for Description<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} (version {})",
            self.item.kind(),
            self.item.name(),
            self.item.version_string()
        )?;
        if let Some(book) = self.item.as_book() {
            write_entries(f, book, 1, self.max_depth)?;
        }
        Ok(())
    }
}

fn write_entries(
    f: &mut fmt::Formatter<'_>,
    book: &BlueprintBook,
    level: usize,
    remaining: usize,
) -> fmt::Result {
    let indent = INDENT.repeat(level);
    for entry in book.entries() {
        match entry.index {
            Some(index) => write!(f, "{indent}[{index}] ")?,
            None => write!(f, "{indent}[-] ")?,
        }
        writeln!(f, "{}: {}", entry.item.kind(), entry.item.name())?;

        if let Some(nested) = entry.item.as_book() {
            if remaining > 0 {
                write_entries(f, nested, level + 1, remaining - 1)?;
            }
        }
    }
    Ok(())
}
