//! Fuzz target for `${...}` expression resolution.
//!
//! Goal: resolution **never panics** and is deterministic for a fixed snapshot.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_expression
//! ```

#![no_main]

use arbitrary::Arbitrary;
use enforcer_expr::{ExpressionResolver, PropertySnapshot};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct ExpressionInput {
    expression: String,
    user: Vec<(String, String)>,
    project: Vec<(String, String)>,
}

fuzz_target!(|input: ExpressionInput| {
    if input.user.len() > 16 || input.project.len() > 16 {
        return;
    }

    let snapshot = PropertySnapshot::builder()
        .user_properties(input.user)
        .project_properties(input.project)
        .build();
    let resolver = ExpressionResolver::new(snapshot);

    let first = resolver.resolve(&input.expression);
    assert_eq!(first, resolver.resolve(&input.expression));
});
