use crate::evaluator::{self, EvalFailure, NOT_AVAILABLE};
use crate::value::Value;

/// One report column: a display label and the expression evaluated per row.
#[derive(Debug, Clone, PartialEq)]
pub struct PathExpression {
    pub alias: String,
    pub expression: String,
}

/// Parses the raw column text: one expression per line, optionally
/// `alias=expression`. Without an `=` the alias is the expression itself.
/// Both sides are trimmed; blank lines and lines with an empty expression
/// are skipped.
pub fn parse_path_expressions(text: &str) -> Vec<PathExpression> {
    let mut parsed = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (alias, expression) = match line.split_once('=') {
            Some((alias, expression)) => (alias.trim(), expression.trim()),
            None => (line, line),
        };
        if expression.is_empty() {
            continue;
        }
        let alias = if alias.is_empty() { expression } else { alias };
        parsed.push(PathExpression {
            alias: alias.to_string(),
            expression: expression.to_string(),
        });
    }
    parsed
}

/// One input document: its source label and the parse outcome. A document
/// that failed to parse still occupies a row in the report.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub content: Result<Value, String>,
}

impl Document {
    pub fn parsed(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            content: Ok(value),
        }
    }

    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Err(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub label: String,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum IssueKind {
    Document {
        message: String,
    },
    Cell {
        alias: String,
        expression: String,
        failure: EvalFailure,
    },
}

/// A per-document or per-cell failure, recorded for diagnostics while the
/// affected cell falls back to the N/A sentinel.
#[derive(Debug, Clone)]
pub struct ReportIssue {
    pub source: String,
    pub kind: IssueKind,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub columns: Vec<PathExpression>,
    pub rows: Vec<Row>,
    pub issues: Vec<ReportIssue>,
}

impl Report {
    /// Per-column totals. A column totals only if every cell in it parses
    /// fully as a finite number; one non-numeric cell disqualifies the
    /// whole column.
    pub fn column_totals(&self) -> Vec<Option<f64>> {
        (0..self.columns.len())
            .map(|col_index| {
                let mut total = 0.0;
                for row in &self.rows {
                    let parsed: f64 = row.cells.get(col_index)?.trim().parse().ok()?;
                    if !parsed.is_finite() {
                        return None;
                    }
                    total += parsed;
                }
                Some(total)
            })
            .collect()
    }
}

/// Builds the report: one row per document, or one row per element for a
/// document whose top level is an array. Failures stay scoped to their own
/// (document, expression) pair.
pub fn build_report(documents: &[Document], columns: &[PathExpression]) -> Report {
    let mut rows = Vec::new();
    let mut issues = Vec::new();

    for document in documents {
        match &document.content {
            Err(parse_error) => {
                issues.push(ReportIssue {
                    source: document.name.clone(),
                    kind: IssueKind::Document {
                        message: parse_error.clone(),
                    },
                });
                rows.push(Row {
                    label: document.name.clone(),
                    cells: vec![NOT_AVAILABLE.to_string(); columns.len()],
                });
            }
            Ok(Value::Array(items)) => {
                for (index, item) in items.iter().enumerate() {
                    let label = format!("{} [Item {}]", document.name, index + 1);
                    rows.push(evaluate_row(label, item, columns, &mut issues));
                }
            }
            Ok(value) => {
                rows.push(evaluate_row(document.name.clone(), value, columns, &mut issues));
            }
        }
    }

    Report {
        columns: columns.to_vec(),
        rows,
        issues,
    }
}

fn evaluate_row(
    label: String,
    value: &Value,
    columns: &[PathExpression],
    issues: &mut Vec<ReportIssue>,
) -> Row {
    let cells = columns
        .iter()
        .map(|column| match evaluator::try_evaluate(value, &column.expression) {
            Ok(cell) => cell,
            Err(failure) => {
                issues.push(ReportIssue {
                    source: label.clone(),
                    kind: IssueKind::Cell {
                        alias: column.alias.clone(),
                        expression: column.expression.clone(),
                        failure,
                    },
                });
                NOT_AVAILABLE.to_string()
            }
        })
        .collect();

    Row { label, cells }
}
