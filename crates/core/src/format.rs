// Render SPARQL results as a plain-text table

use crate::types::SparqlResults;

/// Maximum number of data rows rendered into the table.
pub const MAX_DISPLAY_ROWS: usize = 100;

pub const NO_RESULTS: &str = "No results found.";

const COLUMN_SEPARATOR: &str = " | ";
const SEPARATOR_CELL: &str = "---";

/// Format query results as a table with a header row, a separator row and at
/// most [`MAX_DISPLAY_ROWS`] data rows.
pub fn format_results(results: Option<&SparqlResults>) -> String {
    let results = match results {
        Some(r) if !r.bindings().is_empty() => r,
        _ => return NO_RESULTS.to_string(),
    };

    let vars = results.vars();
    let bindings = results.bindings();

    let mut lines = Vec::with_capacity(bindings.len().min(MAX_DISPLAY_ROWS) + 3);
    lines.push(vars.join(COLUMN_SEPARATOR));
    lines.push(vec![SEPARATOR_CELL; vars.len()].join(COLUMN_SEPARATOR));

    for binding in bindings.iter().take(MAX_DISPLAY_ROWS) {
        let row: Vec<&str> = vars
            .iter()
            .map(|var| binding.get(var).map(|term| term.value.as_str()).unwrap_or(""))
            .collect();
        lines.push(row.join(COLUMN_SEPARATOR));
    }

    let mut output = lines.join("\n");
    if bindings.len() > MAX_DISPLAY_ROWS {
        output.push_str(&format!(
            "\n\nShowing {} of {} results.",
            MAX_DISPLAY_ROWS,
            bindings.len()
        ));
    }
    output
}
