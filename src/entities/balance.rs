use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Select};
use serde::{Deserialize, Serialize};

use crate::traits::FilterableResource;

/// Currency assigned when none is given
pub const DEFAULT_CURRENCY: &str = "TND";

/// An account a user records transactions against.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "balances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub balance: f64,
    pub description: String,
    /// ISO 4217 code
    pub currency: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[async_trait::async_trait]
impl FilterableResource for Entity {
    const RESOURCE_NAME_PLURAL: &'static str = "balances";

    fn filterable_columns() -> Vec<&'static str> {
        vec!["user_id", "balance", "description", "currency"]
    }

    fn like_filterable_columns() -> Vec<&'static str> {
        vec!["description"]
    }

    fn owned_by(user_id: i64) -> Select<Self> {
        Self::find().filter(Column::UserId.eq(user_id))
    }

    fn ordered(select: Select<Self>) -> Select<Self> {
        select.order_by_desc(Column::Id)
    }
}
