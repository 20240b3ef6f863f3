//! Above/Below canonicalization
//!
//! `Below` is authoritative: whenever the mirrored payloads of a block
//! disagree, `Above` takes `Below`'s payload (and any call children that
//! came with it). The directive word of `Above` is left alone unless either
//! section is a command call.

use crate::parser::{Node, NodeKind, NodeValue};

/// Reconcile one `Block` in place. Total; malformed blocks are left untouched.
pub fn correct(block: &mut Node) -> &mut Node {
    if block.kind != NodeKind::Block {
        return block;
    }

    let Some(below) = block.child(NodeKind::Below) else {
        return block;
    };
    let Some(below_value) = below.value.clone() else {
        return block;
    };
    let payload = below_value.second().to_string();
    let below_children = below.children.clone();
    let below_is_call = below_children.iter().any(Node::is_call);

    if let Some(above) = block
        .children
        .iter_mut()
        .find(|c| c.kind == NodeKind::Above)
    {
        let current = above.value.as_ref().map(|v| v.second());
        if current != Some(payload.as_str()) {
            tracing::debug!(
                "canonicalizing Above payload {:?} -> {:?}",
                current.unwrap_or_default(),
                payload
            );
            // A call keyword is not a directive; swap the whole section then
            let above_is_call = above.children.iter().any(Node::is_call);
            above.value = if below_is_call || above_is_call {
                Some(below_value)
            } else {
                let directive = above
                    .value
                    .as_ref()
                    .map(|v| v.first().to_string())
                    .unwrap_or_default();
                Some(NodeValue::Pair(directive, payload))
            };
            above.children = below_children;
        }
    }

    block
}

/// Apply [`correct`] to every `Block` of a program; returns how many changed
pub fn correct_program(program: &mut Node) -> usize {
    let mut changed = 0;
    for block in program
        .children
        .iter_mut()
        .filter(|c| c.kind == NodeKind::Block)
    {
        let before = block.clone();
        if *correct(block) != before {
            changed += 1;
        }
    }
    changed
}
