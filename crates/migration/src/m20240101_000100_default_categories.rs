//! Seeds the built-in spending categories.

use sea_orm::{ConnectionTrait, Statement};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const DEFAULT_CATEGORIES: [(&str, &str); 4] = [
    ("food", "#ef5350"),
    ("groceries", "#66bb6a"),
    ("transport", "#42a5f5"),
    ("misc", "#ffa726"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = manager.get_database_backend();

        for (name, color) in DEFAULT_CATEGORIES {
            db.execute(Statement::from_sql_and_values(
                backend,
                "INSERT OR IGNORE INTO categories (name, color) VALUES (?, ?);",
                vec![name.into(), color.into()],
            ))
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = manager.get_database_backend();

        for (name, _) in DEFAULT_CATEGORIES {
            db.execute(Statement::from_sql_and_values(
                backend,
                "DELETE FROM categories WHERE name = ?;",
                vec![name.into()],
            ))
            .await?;
        }

        Ok(())
    }
}
