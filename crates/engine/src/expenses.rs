//! Expense primitives.
//!
//! An `Expense` is a dated amount in integer minor units attributed to one
//! category. Amounts are never range-checked: they are only summed.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

/// An expense as listed back to clients, with its category resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub description: String,
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub category: String,
    pub color: String,
}

/// The user-editable part of an expense.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseFields {
    pub description: String,
    pub amount_minor: i64,
    pub date: NaiveDate,
    /// Category name, resolved when the write is applied.
    pub category: String,
}

/// A write request: either a new expense or a full replace of an existing
/// one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpenseWrite {
    Insert(ExpenseFields),
    Update { id: i64, fields: ExpenseFields },
}

impl ExpenseWrite {
    /// Builds a write from the wire convention where id `0` means "not yet
    /// persisted".
    pub fn from_wire_id(id: i64, fields: ExpenseFields) -> Self {
        if id == 0 {
            Self::Insert(fields)
        } else {
            Self::Update { id, fields }
        }
    }

    pub fn fields(&self) -> &ExpenseFields {
        match self {
            Self::Insert(fields) | Self::Update { fields, .. } => fields,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: Date,
    pub description: String,
    pub amount: i64,
    pub category_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Category,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_fields(fields: &ExpenseFields, category_id: i64) -> Self {
        Self {
            id: ActiveValue::NotSet,
            date: ActiveValue::Set(fields.date),
            description: ActiveValue::Set(fields.description.clone()),
            amount: ActiveValue::Set(fields.amount_minor),
            category_id: ActiveValue::Set(category_id),
        }
    }
}

impl Expense {
    pub(crate) fn from_models(model: Model, category: Option<super::categories::Model>) -> Self {
        let (category, color) = category
            .map(|c| (c.name, c.color))
            .unwrap_or_default();
        Self {
            id: model.id,
            description: model.description,
            amount_minor: model.amount,
            date: model.date,
            category,
            color,
        }
    }
}
