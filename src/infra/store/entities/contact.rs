//! Contact database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Contact;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "contacts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone_number: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Contact {
    fn from(model: Model) -> Self {
        Contact {
            id: model.id,
            full_name: model.full_name,
            address: model.address,
            city: model.city,
            state: model.state,
            zip_code: model.zip_code,
            phone_number: model.phone_number,
        }
    }
}
