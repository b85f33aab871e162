use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// Column widths for `headers` and `rows`, measured in characters so emoji
/// and accented names do not skew alignment.
fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    widths
}

fn format_row<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let w = widths.get(i).copied().unwrap_or(0);
            format!("{:w$}", cell.as_ref())
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let widths = column_widths(headers, &rows);
    println!("{}", format_row(headers, &widths));
    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));
    for row in &rows {
        println!("{}", format_row(row.as_slice(), &widths));
    }
}

/// `label: value` pairs with the labels padded to a common width.
pub fn print_summary(pairs: &[(&str, String)]) {
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (label, value) in pairs {
        println!("{label:width$}  {value}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_cover_header_and_cells() {
        let rows = vec![
            vec!["Maya Stern".to_string(), "92".to_string()],
            vec!["Luna".to_string(), "100.0".to_string()],
        ];
        assert_eq!(column_widths(&["NAME", "SCORE"], &rows), vec![10, 5]);
    }

    #[test]
    fn rows_are_padded_and_trimmed() {
        let widths = vec![6, 3];
        assert_eq!(format_row(&["a", "b"][..], &widths), "a       b");
    }
}
