//! Plain-text tables for per-class summaries

use std::fmt;

/// Write a right-aligned table with a header row and a rule under it
pub(crate) fn write_table(
    f: &mut fmt::Formatter<'_>,
    headers: &[&str],
    rows: &[Vec<String>],
) -> fmt::Result {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    write_row(f, headers.iter().copied(), &widths)?;
    let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    writeln!(f, "{}", "-".repeat(total))?;
    for row in rows {
        write_row(f, row.iter().map(String::as_str), &widths)?;
    }
    Ok(())
}

fn write_row<'a>(
    f: &mut fmt::Formatter<'_>,
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
) -> fmt::Result {
    for (i, (cell, &w)) in cells.zip(widths).enumerate() {
        if i > 0 {
            write!(f, "  ")?;
        }
        write!(f, "{:>w$}", cell, w = w)?;
    }
    writeln!(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Table;

    impl fmt::Display for Table {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write_table(
                f,
                &["Class", "Score"],
                &[vec!["1".into(), "0.5000".into()], vec!["12".into(), "1.0000".into()]],
            )
        }
    }

    #[test]
    fn test_table_alignment() {
        let text = Table.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Class   Score");
        assert_eq!(lines[1], "-------------");
        assert_eq!(lines[2], "    1  0.5000");
        assert_eq!(lines[3], "   12  1.0000");
    }
}
