use disview_primitives::area::AreaId;
use disview_primitives::line::Line;

/// Rendering seam between the mirrors and whatever displays them.
///
/// The mergers call these hooks row-for-row and node-for-node as they patch
/// the mirrors, so the rendered structure always tracks the mirror exactly.
/// Handles are opaque attachment points the binding hands out: the mirrors
/// store them alongside their own state and give them back on every later
/// call about the same row or node. All calls happen synchronously from the
/// merge, on one task; a binding never needs interior locking for them.
pub trait ViewBinding {
    /// Attachment point for one rendered line row.
    type RowHandle;
    /// Attachment point for one rendered area node.
    type NodeHandle;
    /// Attachment point for one rendered list of sibling nodes.
    type ListHandle;

    /// The fixed top-level list root areas render into. Called once, when
    /// the area mirror is first attached to this binding.
    fn root_list(&mut self) -> Self::ListHandle;

    /// A new row enters the table at `position` (an index into the current
    /// rendered order).
    fn render_row(&mut self, position: usize, line: &Line) -> Self::RowHandle;

    /// An existing row's content changed in place. The handle is `&mut` so a
    /// binding that re-creates its rendered row may re-point it; position and
    /// identity are preserved either way.
    fn replace_row(&mut self, handle: &mut Self::RowHandle, line: &Line);

    /// A row leaves the table. Consumes the handle.
    fn remove_row(&mut self, handle: Self::RowHandle);

    /// A new node enters the sibling list `parent` at `position`.
    /// `is_internal` says whether the node will carry a child list.
    fn render_node(
        &mut self,
        parent: &Self::ListHandle,
        position: usize,
        id: &AreaId,
        label: &str,
        is_internal: bool,
    ) -> Self::NodeHandle;

    /// An existing node's label changed. Only called when it actually
    /// differs from what was last rendered.
    fn relabel_node(&mut self, handle: &mut Self::NodeHandle, label: &str);

    /// A leaf node becomes internal: create and return its (empty) child
    /// list. Called at most once per attached period of a node.
    fn attach_child_list(&mut self, handle: &mut Self::NodeHandle) -> Self::ListHandle;

    /// An internal node becomes a leaf again: its child list, and everything
    /// rendered under it, goes away. Consumes the list handle.
    fn detach_child_list(&mut self, handle: &mut Self::NodeHandle, list: Self::ListHandle);

    /// A node leaves the tree together with its whole rendered subtree.
    /// Consumes the handle; handles of descendants are simply dropped.
    fn remove_node(&mut self, handle: Self::NodeHandle);
}
