//! Property-based tests for block resolution using proptest.

use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use blockbase::{render, Chain, Content, FilterRef, FilterSpec, RenderContext, Renderer};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn text() -> impl Strategy<Value = String> {
    "[a-z <>/]{0,12}"
}

/// A base frame defining `n` blocks with default text, plus a list of
/// overrides `(frame, block, text)` spread over later frames.
fn override_plan() -> impl Strategy<Value = (Vec<String>, Vec<(usize, usize, String)>)> {
    (1usize..6).prop_flat_map(|n| {
        (
            prop::collection::vec(text(), n),
            prop::collection::vec((0usize..4, 0..n, text()), 0..12),
        )
    })
}

fn build_chain<'a>(defaults: &'a [String], overrides: &'a [(usize, usize, String)]) -> Chain<'a> {
    let mut chain = Chain::new().frame_fn("base", move |ctx| {
        for (i, default) in defaults.iter().enumerate() {
            ctx.write("|")?;
            ctx.start_block(&format!("b{i}"))?;
            ctx.write(default)?;
            ctx.end_block()?;
        }
        ctx.write("|")
    });
    for frame in 0..4 {
        chain = chain.frame_fn(format!("child{frame}"), move |ctx| {
            for (_, block, text) in overrides.iter().filter(|(f, _, _)| *f == frame) {
                ctx.start_block(&format!("b{block}"))?;
                ctx.write(text)?;
                ctx.end_block()?;
            }
            Ok(())
        });
    }
    chain
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// The last generation of each block wins, in the position fixed by the base.
    #[test]
    fn last_generation_wins((defaults, overrides) in override_plan()) {
        let mut expected_blocks = defaults.clone();
        let mut ordered = overrides.clone();
        // Frames run in order; within a frame, overrides run in list order.
        ordered.sort_by_key(|(frame, _, _)| *frame);
        for (_, block, text) in &ordered {
            expected_blocks[*block] = text.clone();
        }
        let expected = format!("|{}|", expected_blocks.join("|"));

        let out = render(&build_chain(&defaults, &overrides)).unwrap();
        prop_assert_eq!(out, expected);
    }

    /// Each block has exactly one slot no matter how often it is redefined.
    #[test]
    fn one_slot_per_block((defaults, overrides) in override_plan()) {
        let slots = RefCell::new(Vec::new());
        let chain = build_chain(&defaults, &overrides).frame_fn("probe", |ctx| {
            for name in ctx.blocks().names() {
                let entry = ctx.blocks().get(name).unwrap();
                slots.borrow_mut().push((entry.anchor().frame, entry.generations().len()));
            }
            Ok(())
        });
        render(&chain).unwrap();
        drop(chain);

        let slots = slots.into_inner();
        prop_assert_eq!(slots.len(), defaults.len());
        for (i, (anchor_frame, generations)) in slots.iter().enumerate() {
            prop_assert_eq!(*anchor_frame, 0);
            let overridden = overrides.iter().filter(|(_, b, _)| *b == i).count();
            prop_assert_eq!(*generations, overridden + 1);
        }
    }

    /// get_super_block returns the previous generation, unaffected by the
    /// current generation's filters.
    #[test]
    fn super_ignores_current_filters(first in text(), second in text()) {
        let seen = RefCell::new(None::<Content>);
        let chain = Chain::new()
            .frame_fn("base", |ctx| {
                ctx.start_block("b")?;
                ctx.write(&first)?;
                ctx.end_block()
            })
            .frame_fn("child", |ctx: &mut RenderContext<'_>| {
                ctx.start_block_with("b", "upper")?;
                *seen.borrow_mut() = Some(ctx.get_super_block()?);
                ctx.write(&second)?;
                ctx.end_block()
            });

        let out = render(&chain).unwrap();
        drop(chain);
        let seen = seen.into_inner().unwrap();
        prop_assert_eq!(seen.as_literal(), Some(first.as_str()));
        prop_assert_eq!(out, second.to_uppercase());
    }

    /// Filters run left to right, once per generation.
    #[test]
    fn filters_run_once_in_order(body in text(), suffixes in prop::collection::vec("[a-z]{1,3}", 0..5)) {
        let calls = Arc::new(AtomicUsize::new(0));
        let spec: FilterSpec = suffixes
            .iter()
            .map(|suffix| {
                let calls = Arc::clone(&calls);
                let suffix = suffix.clone();
                FilterRef::inline(move |s| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    format!("{s}{suffix}")
                })
            })
            .collect();

        let chain = Chain::new().frame_fn("page", |ctx| {
            ctx.start_block_with("b", spec.clone())?;
            ctx.write(&body)?;
            ctx.end_block()
        });

        let out = Renderer::new().render(&chain).unwrap();
        prop_assert_eq!(out, format!("{}{}", body, suffixes.concat()));
        prop_assert_eq!(calls.load(Ordering::SeqCst), suffixes.len());
    }
}
