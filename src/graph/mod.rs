use std::collections::BTreeMap;

use tracing::debug;

use crate::action::{ActionAlias, ActionAliasError};
use crate::plan::ChangeRecord;

pub const ROOT_ID: &str = "root";
pub const ADDRESS_SEPARATOR: char = '.';

/// One address segment of the change tree.
///
/// `id` is the parent's id joined with `label` by `.`; the synthetic root uses
/// `root` for both. Children are keyed by segment, so sibling iteration follows
/// segment order rather than input order.
#[derive(Debug, Clone, PartialEq)]
pub struct IntermediateNode {
    pub id: String,
    pub label: String,
    pub children: BTreeMap<String, IntermediateNode>,
    pub resource: Option<ChangeRecord>,
}

impl IntermediateNode {
    pub fn root() -> Self {
        Self::new(ROOT_ID.to_owned(), ROOT_ID.to_owned())
    }

    fn new(id: String, label: String) -> Self {
        Self {
            id,
            label,
            children: BTreeMap::new(),
            resource: None,
        }
    }

    fn child_entry(&mut self, segment: &str) -> &mut IntermediateNode {
        let parent_id = &self.id;
        self.children
            .entry(segment.to_owned())
            .or_insert_with(|| {
                IntermediateNode::new(
                    format!("{parent_id}{ADDRESS_SEPARATOR}{segment}"),
                    segment.to_owned(),
                )
            })
    }

    /// Looks up a descendant by its dotted resource address (without the
    /// `root.` prefix).
    pub fn find(&self, address: &str) -> Option<&IntermediateNode> {
        address
            .split(ADDRESS_SEPARATOR)
            .try_fold(self, |node, segment| node.children.get(segment))
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .values()
            .map(IntermediateNode::node_count)
            .sum::<usize>()
    }

    pub fn resource_count(&self) -> usize {
        usize::from(self.resource.is_some())
            + self
                .children
                .values()
                .map(IntermediateNode::resource_count)
                .sum::<usize>()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

pub fn build_intermediate_tree(
    changes: &[ChangeRecord],
) -> Result<IntermediateNode, ActionAliasError> {
    let mut root = IntermediateNode::root();

    for record in changes {
        if record.action_alias()? == ActionAlias::NoOp {
            debug!(address = %record.address, "skipping no-op change");
            continue;
        }

        let node = record
            .address
            .split(ADDRESS_SEPARATOR)
            .fold(&mut root, |node, segment| node.child_entry(segment));

        if let Some(previous) = node.resource.replace(record.clone()) {
            debug!(
                address = %record.address,
                previous_actions = ?previous.change.actions,
                actions = ?record.change.actions,
                "later change replaces earlier change at the same address"
            );
        }
    }

    Ok(root)
}
