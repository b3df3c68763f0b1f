use sea_orm::entity::prelude::*;

/// Append-only purchase ledger. Line items are frozen copies embedded as
/// JSON (`crate::models::order::OrderItem`); they never track later product
/// mutations.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    #[sea_orm(column_type = "Text")]
    pub items_json: String,

    pub total: f64,

    pub status: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
