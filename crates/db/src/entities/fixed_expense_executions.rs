//! `SeaORM` Entity for fixed_expense_executions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fixed_expense_executions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub template_id: Uuid,
    pub period_id: Uuid,
    pub amount_paid: Decimal,
    pub executed_at: DateTimeWithTimeZone,
    pub ledger_entry_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fixed_expense_templates::Entity",
        from = "Column::TemplateId",
        to = "super::fixed_expense_templates::Column::Id"
    )]
    FixedExpenseTemplates,
    #[sea_orm(
        belongs_to = "super::consolidation_periods::Entity",
        from = "Column::PeriodId",
        to = "super::consolidation_periods::Column::Id"
    )]
    ConsolidationPeriods,
}

impl Related<super::fixed_expense_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FixedExpenseTemplates.def()
    }
}

impl Related<super::consolidation_periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ConsolidationPeriods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
