//! Generic data-access layer over SeaORM.
//!
//! The central type is [`Dao<E>`], parameterized by a `sea_orm::EntityTrait`
//! and a connection (pooled `DatabaseConnection` or a transactional one).
//! It provides CRUD by primary key, raw-SQL list/paged queries with
//! positional (`?`) and named (`:name`) parameter binding, dynamic sorting
//! and offset pagination via [`PageRequest`], and a [`Pager`] result
//! envelope carrying the total match count.
//!
//! # Example
//! ```rust,no_run
//! use dao::{connect, ConnectOpts, Dao, PageRequest, RawQuery, SortDir};
//! # use sea_orm::entity::prelude::*;
//! # #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
//! # #[sea_orm(table_name = "users")]
//! # pub struct Model {
//! #     #[sea_orm(primary_key)]
//! #     pub id: i32,
//! #     pub name: String,
//! # }
//! # #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
//! # pub enum Relation {}
//! # impl ActiveModelBehavior for ActiveModel {}
//!
//! # #[tokio::main]
//! # async fn main() -> dao::Result<()> {
//! let db = connect("sqlite::memory:", ConnectOpts::default()).await?;
//! let users: Dao<Entity> = Dao::new(db);
//!
//! let query = RawQuery::new("select * from users where id in (:ids) and name like ?")
//!     .bind("a%")
//!     .bind_named_list("ids", [1, 2, 3]);
//! let page = PageRequest::new().sort("id").dir(SortDir::Desc).offset(0).size(20);
//!
//! let pager = users.find(&query, &page).await?;
//! println!("{} of {} users", pager.items.len(), pager.total);
//! # Ok(())
//! # }
//! ```

mod dao;
mod handle;
mod query;

pub use dao::Dao;
pub use handle::{connect, detect, ConnectOpts, DbEngine};
pub use query::RawQuery;

// Paging vocabulary lives in its own crate; re-exported for convenience.
pub use pager_core::{PageRequest, Pager, SortDir, DEFAULT_PAGE_SIZE};

use thiserror::Error;

/// Library-local result type.
pub type Result<T> = std::result::Result<T, DaoError>;

/// Typed error for the DAO and its helpers.
#[derive(Debug, Error)]
pub enum DaoError {
    #[error("Unknown DSN: {0}")]
    UnknownDsn(String),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: String, id: String },

    #[error("query has no 'from' clause: {0}")]
    NoFromClause(String),

    #[error("no value bound for positional parameter {index}")]
    MissingPositional { index: usize },

    #[error("no value bound for named parameter :{0}")]
    MissingNamed(String),

    #[error("named parameter :{0} is bound to an empty list")]
    EmptyParamList(String),

    // execution failures propagate unchanged
    #[error(transparent)]
    Sea(#[from] sea_orm::DbErr),
}
