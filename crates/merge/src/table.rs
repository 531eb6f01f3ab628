use core::fmt::{self, Formatter};

use disview_primitives::line::Line;
use tracing::debug;

use crate::binding::ViewBinding;

struct Row<V: ViewBinding> {
    line: Line,
    handle: V::RowHandle,
}

/// The flat, address-ordered mirror of disassembled lines.
///
/// Rows are keyed by `range.min` and kept strictly ascending. Every mirror
/// mutation is echoed through the binding, so the rendered table and this
/// table change in lockstep.
pub struct RowTable<V: ViewBinding> {
    rows: Vec<Row<V>>,
}

impl<V: ViewBinding> RowTable<V> {
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The mirrored lines, in rendered order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.rows.iter().map(|row| &row.line)
    }

    /// Patches the table from one `lines` changeset section.
    ///
    /// One left-to-right sweep over both sequences, each ascending by
    /// `range.min`: rows wholly before an update are untouched, a row
    /// sharing its start address is replaced in place (handle identity
    /// preserved), and every other row the update's range overlaps is
    /// evicted, whichever side it straddles. The cursor never moves
    /// backwards, so cost is linear in rows plus updates.
    ///
    /// `updates` must be ascending and internally non-overlapping; the
    /// decode layer guarantees this and the sweep does not re-check it.
    pub fn apply(&mut self, binding: &mut V, updates: Vec<Line>) {
        debug!(
            updates = updates.len(),
            rows = self.rows.len(),
            "merging line updates"
        );

        let mut i = 0;

        for update in updates {
            let min = update.range.min;
            let max = update.range.max;

            // Skip rows ending before the update starts; a row straddling
            // the update's start is superseded by it, so evict in place.
            while i < self.rows.len() && self.rows[i].line.range.min < min {
                if self.rows[i].line.range.max < min {
                    i += 1;
                } else {
                    let row = self.rows.remove(i);
                    binding.remove_row(row.handle);
                }
            }

            if i < self.rows.len() && self.rows[i].line.range.min == min {
                let row = &mut self.rows[i];
                binding.replace_row(&mut row.handle, &update);
                row.line = update;
            } else {
                let handle = binding.render_row(i, &update);
                self.rows.insert(
                    i,
                    Row {
                        line: update,
                        handle,
                    },
                );
            }

            i += 1;

            // Evict rows swallowed by the update's range. Removal shifts the
            // next candidate into place, so the cursor stays put.
            while i < self.rows.len() && self.rows[i].line.range.min <= max {
                let row = self.rows.remove(i);
                binding.remove_row(row.handle);
            }
        }
    }

    /// Removes every row, mirror and rendered, ahead of a full-reload
    /// snapshot.
    pub fn clear(&mut self, binding: &mut V) {
        debug!(rows = self.rows.len(), "clearing row table");

        for row in self.rows.drain(..) {
            binding.remove_row(row.handle);
        }
    }
}

impl<V: ViewBinding> Default for RowTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ViewBinding> fmt::Debug for RowTable<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowTable")
            .field("rows", &self.rows.len())
            .finish_non_exhaustive()
    }
}
