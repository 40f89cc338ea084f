//! Ledger store: durable expenses and categories plus the raw aggregate
//! queries reports are built from.
//!
//! A [`Ledger`] borrows a connection, so the same queries run either on the
//! pool or inside a transaction.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, QueryFilter, QueryOrder, Statement,
    prelude::*,
};

use crate::{
    Category, EngineError, Expense, ExpenseFields, Period, ResultEngine, categories, expenses,
};

/// Sum of one category over a period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategorySum {
    pub name: String,
    pub color: String,
    pub sum_minor: i64,
}

/// Sum of one active day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DailyTotal {
    pub day: NaiveDate,
    pub sum_minor: i64,
}

pub struct Ledger<'c, C: ConnectionTrait> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> Ledger<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    /// Inserts a new expense attributed to `category_id` and returns its id.
    pub async fn insert_expense(&self, fields: &ExpenseFields, category_id: i64) -> ResultEngine<i64> {
        let active = expenses::ActiveModel::from_fields(fields, category_id);
        let result = expenses::Entity::insert(active)
            .exec(self.conn)
            .await
            .map_err(|err| EngineError::from_insert(err, "expense"))?;
        Ok(result.last_insert_id)
    }

    /// Replaces description, amount, date and category of expense `id`.
    pub async fn update_expense(
        &self,
        id: i64,
        fields: &ExpenseFields,
        category_id: i64,
    ) -> ResultEngine<()> {
        let mut active = expenses::ActiveModel::from_fields(fields, category_id);
        active.id = ActiveValue::Unchanged(id);
        match active.update(self.conn).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated | DbErr::RecordNotFound(_)) => {
                Err(EngineError::KeyNotFound(format!("expense {id}")))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Lists the expenses of `period`, newest first, with the sum of their
    /// amounts. `category` restricts the list to one category name.
    pub async fn list_expenses(
        &self,
        category: Option<&str>,
        period: &Period,
    ) -> ResultEngine<(Vec<Expense>, i64)> {
        let mut query = expenses::Entity::find()
            .find_also_related(categories::Entity)
            .filter(expenses::Column::Date.gte(period.from))
            .filter(expenses::Column::Date.lt(period.to))
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::Id);
        if let Some(name) = category {
            query = query.filter(categories::Column::Name.eq(name));
        }

        let rows: Vec<(expenses::Model, Option<categories::Model>)> = query.all(self.conn).await?;

        let mut total = 0i64;
        let mut out = Vec::with_capacity(rows.len());
        for (expense, category) in rows {
            total = total
                .checked_add(expense.amount)
                .ok_or_else(|| EngineError::InvalidInput("expense total overflows".to_string()))?;
            out.push(Expense::from_models(expense, category));
        }
        Ok((out, total))
    }

    /// One row per category with at least one expense in `period`.
    pub async fn category_sums(&self, period: &Period) -> ResultEngine<Vec<CategorySum>> {
        let stmt = Statement::from_sql_and_values(
            self.conn.get_database_backend(),
            "SELECT c.name AS name, c.color AS color, SUM(e.amount) AS sum \
             FROM expenses e \
             JOIN categories c ON c.id = e.category_id \
             WHERE e.date >= ? AND e.date < ? \
             GROUP BY c.id, c.name, c.color",
            [period.from.into(), period.to.into()],
        );

        let rows = self.conn.query_all(stmt).await?;
        rows.into_iter()
            .map(|row| -> ResultEngine<CategorySum> {
                Ok(CategorySum {
                    name: row.try_get("", "name")?,
                    color: row.try_get("", "color")?,
                    sum_minor: row.try_get("", "sum")?,
                })
            })
            .collect()
    }

    /// Sum of every expense in `period`, `0` when there is none.
    pub async fn period_total(&self, period: &Period) -> ResultEngine<i64> {
        let stmt = Statement::from_sql_and_values(
            self.conn.get_database_backend(),
            "SELECT COALESCE(SUM(amount), 0) AS sum \
             FROM expenses \
             WHERE date >= ? AND date < ?",
            [period.from.into(), period.to.into()],
        );
        match self.conn.query_one(stmt).await? {
            Some(row) => Ok(row.try_get("", "sum")?),
            None => Ok(0),
        }
    }

    /// One row per day of `period` with at least one expense, oldest first.
    pub async fn daily_totals(&self, period: &Period) -> ResultEngine<Vec<DailyTotal>> {
        let stmt = Statement::from_sql_and_values(
            self.conn.get_database_backend(),
            "SELECT date AS day, SUM(amount) AS sum \
             FROM expenses \
             WHERE date >= ? AND date < ? \
             GROUP BY date \
             ORDER BY date",
            [period.from.into(), period.to.into()],
        );

        let rows = self.conn.query_all(stmt).await?;
        rows.into_iter()
            .map(|row| -> ResultEngine<DailyTotal> {
                Ok(DailyTotal {
                    day: row.try_get("", "day")?,
                    sum_minor: row.try_get("", "sum")?,
                })
            })
            .collect()
    }

    pub async fn list_categories(&self) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(self.conn)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    pub async fn category_by_id(&self, id: i64) -> ResultEngine<Option<Category>> {
        let model = categories::Entity::find_by_id(id).one(self.conn).await?;
        Ok(model.map(Category::from))
    }

    pub async fn category_by_name(&self, name: &str) -> ResultEngine<Option<Category>> {
        let model = categories::Entity::find()
            .filter(categories::Column::Name.eq(name))
            .one(self.conn)
            .await?;
        Ok(model.map(Category::from))
    }
}
