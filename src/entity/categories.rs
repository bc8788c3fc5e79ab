//! 评分类别实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub period_id: i64,
    pub name: String,
    pub weight: f64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::periods::Entity",
        from = "Column::PeriodId",
        to = "super::periods::Column::Id"
    )]
    Period,
    #[sea_orm(has_many = "super::tasks::Entity")]
    Tasks,
}

impl Related<super::periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Period.def()
    }
}

impl Related<super::tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_category(self) -> crate::models::categories::entities::Category {
        crate::models::categories::entities::Category {
            id: self.id,
            class_id: self.class_id,
            period_id: self.period_id,
            name: self.name,
            weight: self.weight,
            created_at: super::timestamp(self.created_at),
        }
    }
}
