//! Test double for [`ViewBinding`]: hands out numbered handles and records
//! every rendering call, so tests can assert both the final mirror state and
//! the exact call sequence that produced it.

use disview_primitives::area::AreaId;
use disview_primitives::line::Line;

use crate::binding::ViewBinding;

/// One recorded rendering call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BindingEvent {
    RenderRow {
        position: usize,
        row: u64,
        line: Line,
    },
    ReplaceRow {
        row: u64,
        line: Line,
    },
    RemoveRow {
        row: u64,
    },
    RenderNode {
        list: u64,
        position: usize,
        node: u64,
        label: String,
        is_internal: bool,
    },
    RelabelNode {
        node: u64,
        label: String,
    },
    AttachChildList {
        node: u64,
        list: u64,
    },
    DetachChildList {
        node: u64,
        list: u64,
    },
    RemoveNode {
        node: u64,
    },
}

/// Recording [`ViewBinding`] whose handles are plain counters.
#[derive(Debug, Default)]
pub struct RecordingBinding {
    next_handle: u64,
    pub events: Vec<BindingEvent>,
}

impl RecordingBinding {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains the recorded events, so tests can assert per-step deltas.
    pub fn take_events(&mut self) -> Vec<BindingEvent> {
        std::mem::take(&mut self.events)
    }

    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl ViewBinding for RecordingBinding {
    type RowHandle = u64;
    type NodeHandle = u64;
    type ListHandle = u64;

    fn root_list(&mut self) -> u64 {
        self.next()
    }

    fn render_row(&mut self, position: usize, line: &Line) -> u64 {
        let row = self.next();
        self.events.push(BindingEvent::RenderRow {
            position,
            row,
            line: line.clone(),
        });
        row
    }

    fn replace_row(&mut self, handle: &mut u64, line: &Line) {
        self.events.push(BindingEvent::ReplaceRow {
            row: *handle,
            line: line.clone(),
        });
    }

    fn remove_row(&mut self, handle: u64) {
        self.events.push(BindingEvent::RemoveRow { row: handle });
    }

    fn render_node(
        &mut self,
        parent: &u64,
        position: usize,
        _id: &AreaId,
        label: &str,
        is_internal: bool,
    ) -> u64 {
        let node = self.next();
        self.events.push(BindingEvent::RenderNode {
            list: *parent,
            position,
            node,
            label: label.to_owned(),
            is_internal,
        });
        node
    }

    fn relabel_node(&mut self, handle: &mut u64, label: &str) {
        self.events.push(BindingEvent::RelabelNode {
            node: *handle,
            label: label.to_owned(),
        });
    }

    fn attach_child_list(&mut self, handle: &mut u64) -> u64 {
        let list = self.next();
        self.events.push(BindingEvent::AttachChildList {
            node: *handle,
            list,
        });
        list
    }

    fn detach_child_list(&mut self, handle: &mut u64, list: u64) {
        self.events.push(BindingEvent::DetachChildList {
            node: *handle,
            list,
        });
    }

    fn remove_node(&mut self, handle: u64) {
        self.events.push(BindingEvent::RemoveNode { node: handle });
    }
}
