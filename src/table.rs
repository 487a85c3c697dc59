use crate::report::Report;
use comfy_table::presets::{NOTHING, UTF8_FULL};
use comfy_table::Table;

/// Renders the report as a text table: a `File` column, one column per
/// path expression, and a trailing `Total` row. Totals only appear for
/// columns where every cell is numeric.
pub fn render_table(report: &Report, compact: bool) -> String {
    let mut table = Table::new();
    table.load_preset(if compact { NOTHING } else { UTF8_FULL });

    let mut header = vec!["File".to_string()];
    header.extend(report.columns.iter().map(|column| column.alias.clone()));
    table.set_header(header);

    for row in &report.rows {
        let mut cells = Vec::with_capacity(row.cells.len() + 1);
        cells.push(row.label.clone());
        cells.extend(row.cells.iter().cloned());
        table.add_row(cells);
    }

    let mut total_row = vec!["Total".to_string()];
    for total in report.column_totals() {
        total_row.push(match total {
            Some(value) => format!("{:.2}", value),
            None => String::new(),
        });
    }
    table.add_row(total_row);

    table.to_string()
}
