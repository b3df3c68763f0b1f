use sea_orm::entity::prelude::*;

/// One cart per user. Items are an embedded JSON document
/// (`crate::models::cart::CartItem`) rather than a join table, so a cart
/// mutation stays a single-row write.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "carts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub user_id: i32,

    #[sea_orm(column_type = "Text")]
    pub items_json: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
