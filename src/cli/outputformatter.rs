//! ASCII table rendering for tabular backend results (commodity summaries,
//! earnings routes, the admin user table). The client only shapes requests;
//! whatever rows come back are printed as-is.

use serde_json::Value;
use terminal_size::{terminal_size, Width};

/// Render a JSON value as a table when it has a tabular shape (an array of
/// objects, or an object wrapping one under `content`/`results`). Returns
/// true if a table was printed; callers fall back to raw JSON otherwise.
pub fn print_value(val: &Value) -> bool {
    let rows_v = match val {
        Value::Array(_) => val,
        Value::Object(map) => match map.get("content").or_else(|| map.get("results")) {
            Some(inner @ Value::Array(_)) => inner,
            _ => return false,
        },
        _ => return false,
    };
    let Value::Array(arr) = rows_v else { return false };
    if arr.is_empty() {
        println!("(no rows)");
        return true;
    }

    // Columns: union of keys across all rows, in first-seen order
    let mut cols: Vec<String> = Vec::new();
    for el in arr {
        let Value::Object(map) = el else { return false };
        for k in map.keys() {
            if !cols.iter().any(|c| c == k) {
                cols.push(k.clone());
            }
        }
    }

    let rows: Vec<Vec<String>> = arr
        .iter()
        .map(|el| {
            cols.iter()
                .map(|c| el.get(c).map(render_cell).unwrap_or_default())
                .collect()
        })
        .collect();

    print_table(&cols, &rows);
    println!("rows: {}, cols: {}", rows.len(), cols.len());
    true
}

fn render_cell(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn get_terminal_width() -> usize {
    match terminal_size() {
        Some((Width(w), _)) => w as usize,
        None => 120,
    }
}

/// Print a plain separator/header/rows table, fitting each line to the
/// detected terminal width.
pub fn print_table(cols: &[String], rows: &[Vec<String>]) {
    let termw = get_terminal_width();
    crate::tprintln!("[cli.outputformatter] terminal width={} columns", termw);

    let mut widths: Vec<usize> = cols.iter().map(|c| c.len().min(termw)).collect();
    for r in rows {
        for (i, cell) in r.iter().enumerate().take(cols.len()) {
            if cell.len() > widths[i] {
                widths[i] = cell.len().min(termw);
            }
        }
    }

    let sep = build_separator(&widths);
    println!("{}", fit(&sep, termw));
    println!("{}", fit(&build_row(cols, &widths), termw));
    println!("{}", fit(&sep, termw));
    for r in rows {
        println!("{}", fit(&build_row(r, &widths), termw));
    }
    println!("{}", fit(&sep, termw));
}

fn build_separator(widths: &[usize]) -> String {
    let mut s = String::from("+");
    for w in widths {
        s.push_str(&"-".repeat(w + 2));
        s.push('+');
    }
    s
}

fn build_row(cells: &[String], widths: &[usize]) -> String {
    let mut s = String::from("|");
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        let mut c: String = cell.chars().take(*w).collect();
        while c.len() < *w {
            c.push(' ');
        }
        s.push(' ');
        s.push_str(&c);
        s.push_str(" |");
    }
    s
}

fn fit(line: &str, width: usize) -> String {
    if line.len() <= width {
        line.to_string()
    } else {
        line.chars().take(width).collect()
    }
}
