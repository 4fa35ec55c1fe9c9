//! Translation between explorer grid state, URL query parameters and
//! contracts database requests.
//!
//! Decoding is total: anything malformed in the URL degrades to the absent
//! value for that field and never to an error. Encoding only renders
//! validated models, so it cannot produce input the decoder would reject.

mod fetch;
mod filter;
mod grid;
mod params;
mod sort;

use std::num::NonZeroU32;

pub use fetch::*;
pub use filter::*;
pub use grid::GridState;
pub use params::*;
pub use sort::*;

/// Separator between the parts of the `sort` and `filter` parameters.
pub const SEPARATOR: char = ':';

/// First page, 1-indexed.
pub const DEFAULT_PAGE: NonZeroU32 = NonZeroU32::MIN;

/// Page size used when the URL does not carry one.
pub const DEFAULT_LIMIT: NonZeroU32 = NonZeroU32::new(25).unwrap();

/// Field names are dotted identifiers (`redeemLogicState.typeId`), which keeps
/// [`SEPARATOR`] unambiguous.
pub(crate) fn is_valid_field(field: &str) -> bool {
    !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}
