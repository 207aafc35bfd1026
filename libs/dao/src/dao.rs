//! Generic DAO over a SeaORM connection.
//!
//! `Dao` is generic over `C: ConnectionTrait`, so you can construct it with
//! a pooled `DatabaseConnection` **or** a transactional connection and pass
//! it down to short-lived call sites.

use std::marker::PhantomData;

use pager_core::{PageRequest, Pager};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbBackend,
    EntityName, EntityTrait, FromQueryResult, IntoActiveModel, PrimaryKeyTrait, TryGetable,
};
use tracing::debug;

use crate::{DaoError, RawQuery, Result};

type PkOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Data-access object for one entity type.
///
/// Holds a connection object; its lifetime/ownership is up to the caller.
/// All sort/paging state comes in through the [`PageRequest`] argument —
/// there is no ambient context to set beforehand.
pub struct Dao<E, C = DatabaseConnection>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    conn: C,
    _entity: PhantomData<E>,
}

impl<E, C> Dao<E, C>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    /// Borrow the underlying connection for operations outside this DAO.
    pub fn conn(&self) -> &C {
        &self.conn
    }

    fn entity_name() -> String {
        E::default().table_name().to_owned()
    }

    /* ---------- CRUD by primary key ---------- */

    /// Insert and return the stored model.
    pub async fn add<A>(&self, model: A) -> Result<E::Model>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        Ok(model.insert(&self.conn).await?)
    }

    /// Full replace by primary key; returns the updated model.
    pub async fn update<A>(&self, model: A) -> Result<E::Model>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        Ok(model.update(&self.conn).await?)
    }

    /// Fetch by primary key; absence is `None`, not an error.
    pub async fn load(&self, id: PkOf<E>) -> Result<Option<E::Model>> {
        Ok(E::find_by_id(id).one(&self.conn).await?)
    }

    /// Fetch by primary key, failing with [`DaoError::NotFound`] when the
    /// row does not exist.
    pub async fn get(&self, id: PkOf<E>) -> Result<E::Model> {
        let printable = format!("{id:?}");
        E::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| DaoError::NotFound {
                entity: Self::entity_name(),
                id: printable,
            })
    }

    /// Delete by primary key. A missing id is [`DaoError::NotFound`].
    pub async fn delete(&self, id: PkOf<E>) -> Result<()> {
        let printable = format!("{id:?}");
        let res = E::delete_by_id(id).exec(&self.conn).await?;
        if res.rows_affected == 0 {
            return Err(DaoError::NotFound {
                entity: Self::entity_name(),
                id: printable,
            });
        }
        Ok(())
    }

    /* ---------- entity-mapped raw queries ---------- */

    /// Execute the query with the request's sort applied (no limit) and map
    /// rows onto the entity model.
    pub async fn list(&self, query: &RawQuery, page: &PageRequest) -> Result<Vec<E::Model>> {
        let stmt = query.data_statement(self.backend(), page, false)?;
        debug!(sql = %stmt.sql, "list");
        Ok(E::find().from_raw_sql(stmt).all(&self.conn).await?)
    }

    /// Execute the query paged: the page window and sort apply to the data
    /// query, a derived count query (same bindings) supplies the total.
    pub async fn find(&self, query: &RawQuery, page: &PageRequest) -> Result<Pager<E::Model>> {
        let backend = self.backend();
        let total = self.count(query, backend).await?;
        let stmt = query.data_statement(backend, page, true)?;
        debug!(sql = %stmt.sql, total, "find");
        let items = E::find().from_raw_sql(stmt).all(&self.conn).await?;
        Ok(Pager::new(
            page.offset_or_default(),
            page.size_or_default(),
            total,
            items,
        ))
    }

    /* ---------- projection raw queries ---------- */

    /// Like [`Dao::list`], but map rows onto a plain projection type
    /// instead of the mapped entity.
    pub async fn list_as<M>(&self, query: &RawQuery, page: &PageRequest) -> Result<Vec<M>>
    where
        M: FromQueryResult,
    {
        let stmt = query.data_statement(self.backend(), page, false)?;
        debug!(sql = %stmt.sql, "list_as");
        Ok(M::find_by_statement(stmt).all(&self.conn).await?)
    }

    /// Like [`Dao::find`], but map rows onto a plain projection type.
    pub async fn find_as<M>(&self, query: &RawQuery, page: &PageRequest) -> Result<Pager<M>>
    where
        M: FromQueryResult,
    {
        let backend = self.backend();
        let total = self.count(query, backend).await?;
        let stmt = query.data_statement(backend, page, true)?;
        debug!(sql = %stmt.sql, total, "find_as");
        let items = M::find_by_statement(stmt).all(&self.conn).await?;
        Ok(Pager::new(
            page.offset_or_default(),
            page.size_or_default(),
            total,
            items,
        ))
    }

    /* ---------- scalar queries and DML ---------- */

    /// Single-value result (first column of the first row), `None` when the
    /// query returns no rows.
    pub async fn query_scalar<V>(&self, query: &RawQuery) -> Result<Option<V>>
    where
        V: TryGetable,
    {
        let stmt = query.statement(self.backend())?;
        let row = self.conn.query_one(stmt).await?;
        Ok(match row {
            Some(row) => Some(row.try_get_by_index(0)?),
            None => None,
        })
    }

    /// Execute DML (update/delete/insert text), returning the affected row
    /// count.
    pub async fn execute(&self, query: &RawQuery) -> Result<u64> {
        let stmt = query.statement(self.backend())?;
        debug!(sql = %stmt.sql, "execute");
        let res = self.conn.execute(stmt).await?;
        Ok(res.rows_affected())
    }

    /* ---------- internals ---------- */

    fn backend(&self) -> DbBackend {
        self.conn.get_database_backend()
    }

    async fn count(&self, query: &RawQuery, backend: DbBackend) -> Result<u64> {
        let stmt = query.count_statement(backend)?;
        let total: i64 = match self.conn.query_one(stmt).await? {
            Some(row) => row.try_get_by_index(0)?,
            None => 0,
        };
        Ok(u64::try_from(total).unwrap_or(0))
    }
}
