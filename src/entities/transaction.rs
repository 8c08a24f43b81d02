use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use sea_orm::{QueryOrder, Select};
use serde::{Deserialize, Serialize};

use crate::traits::FilterableResource;

/// Spending category of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    #[sea_orm(string_value = "other")]
    Other,
    #[sea_orm(string_value = "groceries")]
    Groceries,
    #[sea_orm(string_value = "housing")]
    Housing,
    #[sea_orm(string_value = "utilities")]
    Utilities,
    #[sea_orm(string_value = "transportation")]
    Transportation,
    #[sea_orm(string_value = "entertainment")]
    Entertainment,
    #[sea_orm(string_value = "healthcare")]
    Healthcare,
    #[sea_orm(string_value = "gifts")]
    Gifts,
    #[sea_orm(string_value = "debt")]
    Debt,
    #[sea_orm(string_value = "subscriptions")]
    Subscriptions,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub balance_id: i64,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub description: String,
    pub date: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::balance::Entity",
        from = "Column::BalanceId",
        to = "super::balance::Column::Id"
    )]
    Balance,
}

impl Related<super::balance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Balance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[async_trait::async_trait]
impl FilterableResource for Entity {
    const RESOURCE_NAME_PLURAL: &'static str = "transactions";

    fn filterable_columns() -> Vec<&'static str> {
        vec!["type", "amount", "description", "date"]
    }

    fn date_filterable_columns() -> Vec<&'static str> {
        vec!["date"]
    }

    fn like_filterable_columns() -> Vec<&'static str> {
        vec!["description"]
    }

    fn owned_by(user_id: i64) -> Select<Self> {
        Self::find()
            .inner_join(super::balance::Entity)
            .filter(super::balance::Column::UserId.eq(user_id))
    }

    fn ordered(select: Select<Self>) -> Select<Self> {
        select
            .order_by_desc(Column::Date)
            .order_by_desc(Column::Id)
    }
}
