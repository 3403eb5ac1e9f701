//! 测验实体
//!
//! 引擎只读取该表，例外是 result_count / last_marks_update
//! 两个反规范化统计列。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub subject_id: Option<i64>,
    // 自由文本科目，与 subject_id 互斥使用
    #[sea_orm(nullable)]
    pub subject_label: Option<String>,
    pub test_type: String,
    pub test_date: i64,
    pub max_marks: f64,
    pub passing_marks: f64,
    pub result_count: i64,
    pub last_marks_update: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
    #[sea_orm(has_many = "super::grade_records::Entity")]
    GradeRecords,
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::grade_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GradeRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_snapshot(self) -> crate::models::tests::entities::TestSnapshot {
        use crate::models::subjects::entities::SubjectRef;
        use crate::models::tests::entities::{TestSnapshot, TestType};
        use chrono::{DateTime, Utc};

        TestSnapshot {
            id: self.id,
            title: self.title,
            subject: SubjectRef::from_columns(self.subject_id, self.subject_label.as_deref()),
            test_type: self
                .test_type
                .parse::<TestType>()
                .unwrap_or(TestType::Other),
            test_date: DateTime::<Utc>::from_timestamp(self.test_date, 0).unwrap_or_default(),
            max_marks: self.max_marks,
            passing_marks: self.passing_marks,
            result_count: self.result_count,
            last_marks_update: self
                .last_marks_update
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            is_active: self.is_active,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
