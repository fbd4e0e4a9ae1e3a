//! `SeaORM` Entity for fixed_expense_templates table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fixed_expense_templates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub frequency: String,
    pub day_one: i32,
    pub day_two: Option<i32>,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fixed_expense_executions::Entity")]
    FixedExpenseExecutions,
}

impl Related<super::fixed_expense_executions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FixedExpenseExecutions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
