//! Paging vocabulary shared by query layers: the [`Pager`] result envelope,
//! the [`PageRequest`] parameter object and the [`SortDir`] direction.
//!
//! This crate is database-agnostic on purpose; the DAO layer consumes these
//! types when composing queries and wrapping results.

mod page;
mod request;

pub use page::Pager;
pub use request::{PageRequest, SortDir, DEFAULT_PAGE_SIZE};
