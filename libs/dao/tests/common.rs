#![allow(dead_code)]
use anyhow::Result;
use dao::{connect, ConnectOpts};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

pub mod users {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub score: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Fresh in-memory database. A single pooled connection keeps every
/// statement on the same sqlite memory instance.
pub async fn bring_up() -> Result<DatabaseConnection> {
    let opts = ConnectOpts {
        max_conns: Some(1),
        ..ConnectOpts::default()
    };
    let db = connect("sqlite::memory:", opts).await?;
    let backend = db.get_database_backend();
    db.execute(Statement::from_string(
        backend,
        "create table users (id integer primary key autoincrement, \
         name text not null, score integer not null)",
    ))
    .await?;
    Ok(db)
}

/// Seed users with ids 1..=10.
pub async fn seed_ten(db: &DatabaseConnection) -> Result<()> {
    let backend = db.get_database_backend();
    for i in 1..=10 {
        db.execute(Statement::from_sql_and_values(
            backend,
            "insert into users (id, name, score) values (?, ?, ?)",
            [i.into(), format!("user{i}").into(), (i * 10).into()],
        ))
        .await?;
    }
    Ok(())
}
