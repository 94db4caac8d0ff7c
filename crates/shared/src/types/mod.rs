//! Common types used across the workspace.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::{
    AmountParseError, DISPLAY_DECIMAL_PLACES, format_amount, format_amount_dp, parse_amount,
};
pub use pagination::{PageMeta, PageRequest, PageResponse};
