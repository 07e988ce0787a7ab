//! Hypermedia envelopes for API responses
//!
//! Every payload leaves the API wrapped either in a [`Resource`] (one item)
//! or a [`PagedResult`] (one page of a collection). Both carry a list of
//! [`Link`]s whose `href`s are absolute URLs built by a [`LinkBuilder`] from
//! the origin of the request being answered.

mod link;
mod paged;
mod pagination;
mod resource;

pub use link::{Link, LinkBuilder, RequestOrigin};
pub use paged::PagedResult;
pub use pagination::{PageQuery, PageWindow};
pub use resource::Resource;
