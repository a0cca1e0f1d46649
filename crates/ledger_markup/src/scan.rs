//! Table region scanning over logical lines.
//!
//! A single forward pass with one bit of state. Table boundary lines are
//! consumed, import-log rows are dropped, and everything else inside a
//! table is yielded together with its logical line number. A table left
//! open at end of input simply ends the scan.

use crate::normalize::LineKind;
use crate::schema::Schema;
use std::iter::Enumerate;
use std::slice::Iter;

/// Iterator over `(line_number, line)` for every countable table row.
pub struct TableRows<'a> {
    lines: Enumerate<Iter<'a, String>>,
    schema: &'a Schema,
    in_table: bool,
}

/// Scan `lines` for rows inside table regions.
pub fn table_rows<'a>(lines: &'a [String], schema: &'a Schema) -> TableRows<'a> {
    TableRows {
        lines: lines.iter().enumerate(),
        schema,
        in_table: false,
    }
}

impl<'a> Iterator for TableRows<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        for (number, line) in self.lines.by_ref() {
            match LineKind::of(line, self.schema) {
                LineKind::TableOpen => self.in_table = true,
                LineKind::TableClose => self.in_table = false,
                _ if self.in_table && !is_import_log_row(line, self.schema) => {
                    return Some((number, line.as_str()));
                }
                _ => {}
            }
        }
        None
    }
}

/// Rows left behind by automated import actions.
///
/// Both a log-namespace reference and the import type marker must appear.
pub fn is_import_log_row(line: &str, schema: &Schema) -> bool {
    line.contains(&schema.import_marker)
        && schema
            .log_namespaces
            .iter()
            .any(|namespace| line.contains(namespace.as_str()))
}
