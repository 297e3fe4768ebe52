use tracing::debug;

use crate::repair::utils::{clean_fragment, contains_digit};
use crate::repair::RepairSummary;

/// Fields per record in the export.
pub const FIELD_COUNT: usize = 9;

/// A record whose address field opened a double quote that never closed,
/// waiting for its continuation lines.
struct PendingRecord {
    /// The 9 split fields of the header line, verbatim.
    fields: Vec<String>,

    /// Address text gathered so far, quotes stripped.
    address: String,

    /// Whether any continuation line has been folded in.
    extended: bool,
}

/// Single-pass processor that glues records spilled across physical lines
/// back into one row each. Feed raw lines in file order, then call
/// [`finish`](Self::finish) to flush the last pending record and take the
/// output.
pub struct LineReassembler {
    /// Completed output rows, in input order.
    rows: Vec<String>,

    /// At most one record under construction at any time.
    pending: Option<PendingRecord>,

    /// Rows that were reassembled from more than one physical line.
    merged: u64,

    /// Continuation lines folded into an address.
    continuations: u64,

    /// Lines that contributed nothing to the output.
    dropped: u64,
}

impl LineReassembler {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            pending: None,
            merged: 0,
            continuations: 0,
            dropped: 0,
        }
    }

    /// Process a single raw line from the input.
    pub fn process_line(&mut self, line: &str) {
        let trimmed = line.trim();
        let columns: Vec<&str> = trimmed.split(';').collect();

        if columns.len() == FIELD_COUNT && !columns[0].is_empty() {
            // New header line - flush whatever was still accumulating
            self.flush_pending();

            let last = columns[FIELD_COUNT - 1];
            if last.starts_with('"') && !last.ends_with('"') {
                // Unterminated quoted address, hold the record back until
                // its continuation lines (or the next header) arrive.
                // Note a lone `"` both starts and ends with a quote, so it
                // counts as terminated.
                self.pending = Some(PendingRecord {
                    fields: columns.iter().map(|c| c.to_string()).collect(),
                    address: last.trim_matches('"').to_string(),
                    extended: false,
                });
            } else {
                // Already complete, emit as-is
                self.rows.push(columns.join(";"));
            }
        } else if let Some(pending) = self.pending.as_mut() {
            // Continuation of the pending record's address
            let fragment = clean_fragment(trimmed);
            if fragment.is_empty() {
                self.dropped += 1;
                return;
            }

            // House/unit numbers read better behind a dash, name fragments
            // behind a comma.
            let joiner = if contains_digit(fragment) { " - " } else { ", " };
            pending.address.push_str(joiner);
            pending.address.push_str(fragment);
            pending.extended = true;
            self.continuations += 1;
        } else {
            debug!(line = %trimmed, "dropping line with no record to attach to");
            self.dropped += 1;
        }
    }

    /// Flush the pending record: close the quote around the accumulated
    /// address, overwrite field 9 and emit the row.
    fn flush_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            let mut fields = pending.fields;
            fields[FIELD_COUNT - 1] = format!("\"{}\"", pending.address);
            self.rows.push(fields.join(";"));
            if pending.extended {
                self.merged += 1;
            }
        }
    }

    /// Flush the last pending record and hand back the rows plus counters.
    pub fn finish(mut self) -> (Vec<String>, RepairSummary) {
        self.flush_pending();
        let summary = RepairSummary {
            rows: self.rows.len() as u64,
            merged: self.merged,
            continuations: self.continuations,
            dropped: self.dropped,
        };
        (self.rows, summary)
    }
}

impl Default for LineReassembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the full pass over `text`, one logical row per output entry.
pub fn reassemble_lines(text: &str) -> (Vec<String>, RepairSummary) {
    let mut reassembler = LineReassembler::new();
    for line in text.lines() {
        reassembler.process_line(line);
    }
    reassembler.finish()
}
