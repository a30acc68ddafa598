//! Test support: a [`TestContext`] wired over an in-memory store with fault injection.

pub(crate) mod helpers;

pub(crate) use context::TestContext;
