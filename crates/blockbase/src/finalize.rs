//! Slot substitution at the end of a render.
//!
//! Starting from the root stream, every slot is replaced by its block's final
//! content, and slots exposed by that content are replaced in turn until only
//! literal text remains. Expansion is depth-first with the chain of blocks
//! being expanded kept on a stack, so a block that reaches itself is reported
//! as soon as the loop closes instead of growing the output pass after pass.
//! Legitimate nesting deeper than the configured bound is reported the same
//! way.

use crate::block::BlockRegistry;
use crate::content::{Content, Segment};
use crate::error::BlockError;

/// Resolves `root` against `blocks` into the final literal output.
pub(crate) fn finalize(
    root: &Content,
    blocks: &BlockRegistry,
    max_passes: usize,
) -> Result<String, BlockError> {
    let mut output = String::new();
    let mut expanding = Vec::new();
    expand(root, blocks, max_passes, &mut expanding, &mut output)?;
    Ok(output)
}

fn expand<'a>(
    content: &'a Content,
    blocks: &'a BlockRegistry,
    max_passes: usize,
    expanding: &mut Vec<&'a str>,
    output: &mut String,
) -> Result<(), BlockError> {
    for segment in content.segments() {
        match segment {
            Segment::Text(text) => output.push_str(text),
            Segment::Slot(name) => {
                if expanding.len() >= max_passes || expanding.contains(&name.as_str()) {
                    return Err(BlockError::UnresolvableSlotCycle {
                        block: name.clone(),
                        passes: expanding.len(),
                    });
                }
                let resolved = blocks.final_content(name).ok_or_else(|| {
                    BlockError::UnresolvedSlot {
                        block: name.clone(),
                    }
                })?;
                expanding.push(name);
                expand(resolved, blocks, max_passes, expanding, output)?;
                expanding.pop();
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::SlotAnchor;

    fn define(blocks: &mut BlockRegistry, name: &str, content: Content) {
        blocks.open_generation(
            name,
            SlotAnchor {
                frame: 0,
                parent: None,
            },
            Vec::new(),
        );
        blocks.close(name, content).unwrap();
    }

    fn with_slot(before: &str, slot: &str, after: &str) -> Content {
        let mut content = Content::from(before);
        content.push_slot(slot);
        content.push_str(after);
        content
    }

    #[test]
    fn test_literal_root_is_unchanged() {
        let blocks = BlockRegistry::new();
        let out = finalize(&Content::from("plain"), &blocks, 8).unwrap();
        assert_eq!(out, "plain");
    }

    #[test]
    fn test_nested_slots_resolve() {
        let mut blocks = BlockRegistry::new();
        define(&mut blocks, "content", with_slot("<div>", "left", "</div>"));
        define(&mut blocks, "left", Content::from("L"));

        let root = with_slot("<body>", "content", "</body>");
        let out = finalize(&root, &blocks, 8).unwrap();
        assert_eq!(out, "<body><div>L</div></body>");
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let mut blocks = BlockRegistry::new();
        define(&mut blocks, "a", with_slot("x", "b", ""));
        define(&mut blocks, "b", with_slot("y", "a", ""));

        let err = finalize(&with_slot("", "a", ""), &blocks, 64).unwrap_err();
        assert!(matches!(
            err,
            BlockError::UnresolvableSlotCycle { ref block, passes: 2 } if block == "a"
        ));
    }

    #[test]
    fn test_depth_bound() {
        let mut blocks = BlockRegistry::new();
        define(&mut blocks, "a", with_slot("", "b", ""));
        define(&mut blocks, "b", with_slot("", "c", ""));
        define(&mut blocks, "c", Content::from("deep"));
        let root = with_slot("", "a", "");

        assert_eq!(finalize(&root, &blocks, 3).unwrap(), "deep");
        assert!(matches!(
            finalize(&root, &blocks, 2),
            Err(BlockError::UnresolvableSlotCycle { block, .. }) if block == "c"
        ));
    }

    #[test]
    fn test_slot_without_block_is_an_error() {
        let blocks = BlockRegistry::new();
        let err = finalize(&with_slot("[", "ghost", "]"), &blocks, 8).unwrap_err();
        assert!(matches!(err, BlockError::UnresolvedSlot { ref block } if block == "ghost"));
        assert_eq!(err.block(), Some("ghost"));
    }

    #[test]
    fn test_slot_of_open_generation_is_an_error() {
        let mut blocks = BlockRegistry::new();
        blocks.open_generation(
            "open",
            SlotAnchor {
                frame: 0,
                parent: None,
            },
            Vec::new(),
        );
        assert!(matches!(
            finalize(&with_slot("", "open", ""), &blocks, 8),
            Err(BlockError::UnresolvedSlot { block }) if block == "open"
        ));
    }
}
