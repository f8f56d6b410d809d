//! Named monotonic sequences.
//!
//! A row only ever moves forward, so values handed out are never reused even
//! when the record holding them is deleted.

use sea_orm::entity::prelude::*;

pub(crate) const MEMBER_CODE: &str = "member_code";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "counters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub value: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
