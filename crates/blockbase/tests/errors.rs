//! Every failure aborts the render with the offending block named.

use std::cell::Cell;

use blockbase::{render, BlockError, Chain, FilterRegistry, RenderConfig, Renderer};

fn single(body: impl Fn(&mut blockbase::RenderContext<'_>) -> Result<(), BlockError>) -> BlockError {
    render(&Chain::new().frame_fn("page", body)).unwrap_err()
}

#[test]
fn test_end_without_open_block() {
    let err = single(|ctx| ctx.end_block());
    assert!(matches!(
        err,
        BlockError::UnmatchedEndBlock {
            expected: None,
            found: None
        }
    ));
}

#[test]
fn test_end_with_wrong_name() {
    let err = single(|ctx| {
        ctx.start_block("a")?;
        ctx.end_block_named("b")
    });
    match err {
        BlockError::UnmatchedEndBlock { expected, found } => {
            assert_eq!(expected.as_deref(), Some("a"));
            assert_eq!(found.as_deref(), Some("b"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_frame_ends_with_open_block() {
    let err = single(|ctx| {
        ctx.start_block("outer")?;
        ctx.start_block("inner")
    });
    assert!(matches!(err, BlockError::UnterminatedBlock { block } if block == "inner"));
}

#[test]
fn test_blocks_cannot_span_frames() {
    let chain = Chain::new()
        .frame_fn("base", |ctx| ctx.start_block("a"))
        .frame_fn("child", |ctx| ctx.end_block());
    let err = render(&chain).unwrap_err();
    assert!(matches!(err, BlockError::UnterminatedBlock { block } if block == "a"));
}

#[test]
fn test_super_in_first_generation() {
    let err = single(|ctx| {
        ctx.start_block("top")?;
        ctx.super_block()
    });
    assert!(matches!(err, BlockError::NoSuperGeneration { block } if block == "top"));
}

#[test]
fn test_super_outside_block() {
    let err = single(|ctx| {
        ctx.empty_block("top")?;
        ctx.get_super_block().map(|_| ())
    });
    assert!(matches!(err, BlockError::SuperBlockOutsideBlock));
}

#[test]
fn test_super_block_outside_block() {
    let chain = Chain::new()
        .frame_fn("base", |ctx| {
            ctx.start_block("top")?;
            ctx.write("x")?;
            ctx.end_block()
        })
        .frame_fn("child", |ctx| ctx.super_block());
    let err = render(&chain).unwrap_err();
    assert!(matches!(err, BlockError::SuperBlockOutsideBlock));
    assert_eq!(err.block(), None);
}

#[test]
fn test_double_flush() {
    let err = single(|ctx| {
        ctx.flush()?;
        ctx.flush()
    });
    assert!(matches!(err, BlockError::DoubleFlush));
}

#[test]
fn test_self_referential_blocks() {
    let chain = Chain::new()
        .frame_fn("base", |ctx| {
            ctx.start_block("b")?;
            ctx.empty_block("c")?;
            ctx.end_block()
        })
        .frame_fn("child", |ctx| {
            ctx.start_block("c")?;
            ctx.start_block("b")?;
            ctx.super_block()?;
            let b_before = ctx.get_super_block()?;
            ctx.end_block()?;
            // c now contains its own slot
            ctx.write_content(&b_before)?;
            ctx.end_block()
        });

    let err = render(&chain).unwrap_err();
    assert!(matches!(err, BlockError::UnresolvableSlotCycle { ref block, .. } if block == "c"));
    assert_eq!(err.block(), Some("c"));
}

#[test]
fn test_nesting_deeper_than_configured_bound() {
    let chain = Chain::new().frame_fn("page", |ctx| {
        ctx.start_block("a")?;
        ctx.start_block("b")?;
        ctx.empty_block("c")?;
        ctx.end_block()?;
        ctx.end_block()
    });

    let shallow = Renderer::new().with_config(RenderConfig::default().with_max_substitution_passes(2));
    assert!(matches!(
        shallow.render(&chain),
        Err(BlockError::UnresolvableSlotCycle { block, passes: 2 }) if block == "c"
    ));
    assert!(Renderer::new().render(&chain).is_ok());
}

#[test]
fn test_unknown_filter() {
    let renderer = Renderer::new().with_filters(FilterRegistry::new());
    let chain = Chain::new().frame_fn("page", |ctx| ctx.start_block_with("a", "trim"));
    let err = renderer.render(&chain).unwrap_err();
    assert!(matches!(
        err,
        BlockError::UnknownFilter { ref filter, ref block } if filter == "trim" && block == "a"
    ));
}

#[test]
fn test_block_nested_in_itself() {
    let err = single(|ctx| {
        ctx.start_block("a")?;
        ctx.start_block("b")?;
        ctx.start_block("a")
    });
    assert!(matches!(err, BlockError::BlockAlreadyOpen { block } if block == "a"));
}

#[test]
fn test_two_roots() {
    let chain = Chain::new()
        .frame_fn("base", |ctx| {
            // Same frame twice is fine
            ctx.mark_root()?;
            ctx.mark_root()
        })
        .frame_fn("child", |ctx| ctx.mark_root());
    let err = render(&chain).unwrap_err();
    assert!(matches!(
        err,
        BlockError::RootAlreadyMarked {
            frame: 1,
            previous: 0
        }
    ));
}

#[test]
fn test_block_markers_after_flush() {
    let err = single(|ctx| {
        ctx.flush()?;
        ctx.end_block()
    });
    assert!(matches!(err, BlockError::AfterFlush { operation: "end_block" }));

    let err = single(|ctx| {
        ctx.flush()?;
        ctx.mark_root()
    });
    assert!(matches!(err, BlockError::AfterFlush { operation: "mark_root" }));
}

#[test]
fn test_filter_that_drops_nested_slot() {
    let renderer = Renderer::new().with_filters(FilterRegistry::new().with("blank", |_| String::new()));
    let chain = Chain::new().frame_fn("page", |ctx| {
        ctx.start_block_with("outer", "blank")?;
        ctx.empty_block("inner")?;
        ctx.end_block()
    });
    let err = renderer.render(&chain).unwrap_err();
    assert!(matches!(
        err,
        BlockError::CorruptedSlot { ref block, ref filter } if block == "outer" && filter == "blank"
    ));
}

#[test]
fn test_frame_failure_stops_the_chain() {
    let later_ran = Cell::new(false);
    let chain = Chain::new()
        .frame_fn("base", |ctx| {
            ctx.write("x")?;
            Err(BlockError::frame("base", "data source unavailable"))
        })
        .frame_fn("child", |_ctx| {
            later_ran.set(true);
            Ok(())
        });

    let err = render(&chain).unwrap_err();
    assert_eq!(
        err.to_string(),
        "frame 'base' failed: data source unavailable"
    );
    assert!(!later_ran.get());
}
