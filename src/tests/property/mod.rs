//! Property-based tests for the resource layer
//!
//! This module contains property-based tests using the proptest framework.
//! Property tests verify invariants that should hold for all inputs, rather
//! than testing specific cases.
//!
//! ## Running Property Tests
//!
//! Run all property tests:
//! ```sh
//! cargo test property --release
//! ```
//!
//! Run a specific property test module:
//! ```sh
//! cargo test property::tag_policy_props --release
//! ```
//!
//! ## Test Modules
//!
//! - `tag_policy_props`: Tests for the static tag policy table
//!   - Every provided tag is reachable from some mutation's invalidations
//!   - Mutations only ever invalidate tags of their own kind
//!   - Every invalidated tag is provided by some entry shape
//!   - The list tag is invalidated by every mutation
//!
//! - `picker_props`: Tests for the derived embedding picker view
//!   - Output length is bounded by input length
//!   - Compatible rows are enabled and tooltip-free
//!   - Compatible rows form a prefix, order is stable within halves
//!   - Recomputation with identical inputs is idempotent
//!   - Filtering yields an order-preserving subsequence
//!
//! ## Configuration
//!
//! By default, proptest runs 256 cases per property. This can be configured
//! via the `PROPTEST_CASES` environment variable:
//!
//! ```sh
//! PROPTEST_CASES=1000 cargo test property --release
//! ```

mod picker_props;
