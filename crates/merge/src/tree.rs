use core::fmt::{self, Formatter};

use disview_primitives::area::{AreaId, AreaUpdate};
use tracing::debug;

use crate::binding::ViewBinding;

struct AreaNode<V: ViewBinding> {
    id: AreaId,
    label: String,
    handle: V::NodeHandle,
    children: Option<ChildList<V>>,
}

struct ChildList<V: ViewBinding> {
    handle: V::ListHandle,
    nodes: Vec<AreaNode<V>>,
}

/// One entry of a preorder dump of the tree, for display and assertions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AreaEntry {
    pub depth: usize,
    pub id: AreaId,
    pub label: String,
    pub is_internal: bool,
}

/// The id-ordered mirror of the area hierarchy.
///
/// Every node owns its children outright; deleting a node drops its whole
/// subtree, both here and (through one `remove_node` call on the subtree
/// root) in the rendered view. Sibling lists stay sorted by id, so each
/// level merges with a single cursor just like the row table.
pub struct AreaTree<V: ViewBinding> {
    root: ChildList<V>,
}

impl<V: ViewBinding> AreaTree<V> {
    /// Creates an empty tree rendering into the given root sibling list.
    pub const fn new(root: V::ListHandle) -> Self {
        Self {
            root: ChildList {
                handle: root,
                nodes: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.root.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.nodes.is_empty()
    }

    /// Patches the tree from one `areas` changeset section.
    ///
    /// Each level is a single cursor sweep over the id-sorted sibling list;
    /// present child lists recurse. A `null` label deletes the matching
    /// node and everything under it (absent ids are a no-op); any other
    /// update creates or relabels the node, then reconciles its shape:
    /// a present child list promotes a leaf, an absent one demotes an
    /// internal node and discards its sub-list.
    ///
    /// Sibling updates must be ascending by id; the decode layer guarantees
    /// this and the sweep does not re-check it.
    pub fn apply(&mut self, binding: &mut V, updates: Vec<AreaUpdate>) {
        debug!(
            updates = updates.len(),
            roots = self.root.nodes.len(),
            "merging area updates"
        );

        merge_level(binding, &mut self.root, updates);
    }

    /// Removes every root node, mirror and rendered, ahead of a full-reload
    /// snapshot. Subtrees cascade.
    pub fn clear(&mut self, binding: &mut V) {
        debug!(roots = self.root.nodes.len(), "clearing area tree");

        for node in self.root.nodes.drain(..) {
            binding.remove_node(node.handle);
        }
    }

    /// Preorder dump of the current tree.
    #[must_use]
    pub fn snapshot(&self) -> Vec<AreaEntry> {
        let mut entries = Vec::new();
        collect(&self.root.nodes, 0, &mut entries);
        entries
    }
}

impl<V: ViewBinding> fmt::Debug for AreaTree<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("AreaTree")
            .field("roots", &self.root.nodes.len())
            .finish_non_exhaustive()
    }
}

fn merge_level<V: ViewBinding>(
    binding: &mut V,
    list: &mut ChildList<V>,
    updates: Vec<AreaUpdate>,
) {
    let mut i = 0;

    for update in updates {
        let AreaUpdate {
            id,
            label,
            children,
        } = update;

        while i < list.nodes.len() && list.nodes[i].id < id {
            i += 1;
        }

        let Some(label) = label else {
            // Delete. Removal shifts the next sibling into place, so the
            // cursor stays put; a miss is an idempotent no-op.
            if i < list.nodes.len() && list.nodes[i].id == id {
                let node = list.nodes.remove(i);
                binding.remove_node(node.handle);
            }

            continue;
        };

        if i < list.nodes.len() && list.nodes[i].id == id {
            let node = &mut list.nodes[i];
            if node.label != label {
                binding.relabel_node(&mut node.handle, &label);
                node.label = label;
            }
        } else {
            let handle = binding.render_node(&list.handle, i, &id, &label, children.is_some());
            list.nodes.insert(
                i,
                AreaNode {
                    id,
                    label,
                    handle,
                    children: None,
                },
            );
        }

        let node = &mut list.nodes[i];

        match children {
            Some(child_updates) => {
                if node.children.is_none() {
                    let handle = binding.attach_child_list(&mut node.handle);
                    node.children = Some(ChildList {
                        handle,
                        nodes: Vec::new(),
                    });
                }

                if let Some(child_list) = &mut node.children {
                    merge_level(binding, child_list, child_updates);
                }
            }
            None => {
                if let Some(detached) = node.children.take() {
                    binding.detach_child_list(&mut node.handle, detached.handle);
                }
            }
        }

        i += 1;
    }
}

fn collect<V: ViewBinding>(nodes: &[AreaNode<V>], depth: usize, out: &mut Vec<AreaEntry>) {
    for node in nodes {
        out.push(AreaEntry {
            depth,
            id: node.id.clone(),
            label: node.label.clone(),
            is_internal: node.children.is_some(),
        });

        if let Some(children) = &node.children {
            collect(&children.nodes, depth + 1, out);
        }
    }
}
