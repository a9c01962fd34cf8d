//! Drop-target resolution for drag gestures. Hovering never mutates the
//! tree; the pending target is recomputed on every hover change and only a
//! release commits it (via `edit::reparent`).

use super::edit::{find_node, find_parent};
use super::{NodeId, TreeNode};

/// Pending insertion point: append into `parent_id`, or insert immediately
/// before `before_id` when present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DropTarget {
    pub parent_id: NodeId,
    pub before_id: Option<NodeId>,
}

/// Where a drop over `hovered` would land.
///
/// Containers take the drop as their last child; primitives redirect it to
/// their own parent, inserting right before themselves. A hovered primitive
/// root has no parent to redirect to, so there is no target.
pub(crate) fn resolve_drop_target(root: &TreeNode, hovered: NodeId) -> Option<DropTarget> {
    let node = find_node(root, hovered)?;

    if node.can_accept_children() {
        return Some(DropTarget {
            parent_id: hovered,
            before_id: None,
        });
    }

    let (parent, _) = find_parent(root, hovered)?;
    Some(DropTarget {
        parent_id: parent.id,
        before_id: Some(hovered),
    })
}

/// Drag gesture state. The dragged subtree stays in place for the whole
/// gesture; the single mutation happens at commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum DragState {
    #[default]
    Idle,
    Dragging {
        source: NodeId,
        target: Option<DropTarget>,
    },
}

impl DragState {
    /// Idle -> Dragging. Picking up while already dragging restarts the
    /// gesture with the new source.
    pub fn pick_up(&mut self, source: NodeId) {
        *self = DragState::Dragging {
            source,
            target: None,
        };
    }

    /// Recompute the pending target for the currently hovered node.
    /// Ignored while idle.
    pub fn hover(&mut self, root: &TreeNode, hovered: NodeId) {
        if let DragState::Dragging { target, .. } = self {
            *target = resolve_drop_target(root, hovered);
        }
    }

    pub fn source(&self) -> Option<NodeId> {
        match self {
            DragState::Dragging { source, .. } => Some(*source),
            DragState::Idle => None,
        }
    }

    pub fn pending_target(&self) -> Option<DropTarget> {
        match self {
            DragState::Dragging { target, .. } => *target,
            DragState::Idle => None,
        }
    }

    /// Dragging -> Idle. Returns the commit pair when a target is pending;
    /// `None` means the tree stays as it is.
    pub fn release(&mut self) -> Option<(NodeId, DropTarget)> {
        let committed = match *self {
            DragState::Dragging {
                source,
                target: Some(target),
            } => Some((source, target)),
            _ => None,
        };
        *self = DragState::Idle;
        committed
    }

    /// Dragging -> Idle with nothing committed.
    pub fn cancel(&mut self) {
        *self = DragState::Idle;
    }
}
