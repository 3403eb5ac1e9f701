//! 成绩记录实体
//!
//! 引擎唯一拥有写权限的表，(test_id, student_id) 上有唯一索引，
//! upsert 依赖该索引保证原子性。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grade_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub test_id: i64,
    pub student_id: i64,
    pub marks_obtained: f64,
    pub max_marks: f64,
    pub passing_marks: f64,
    pub percentage: f64,
    pub grade: String,
    pub is_passed: bool,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub remarks: Option<String>,
    pub graded_by: i64,
    pub graded_at: i64,
    pub submitted_at: i64,
    pub academic_year: String,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tests::Entity",
        from = "Column::TestId",
        to = "super::tests::Column::Id"
    )]
    Test,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl Related<super::tests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Test.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_record(self) -> crate::models::grades::entities::GradeRecord {
        use crate::models::grades::entities::{GradeRecord, GradeStatus, LetterGrade};
        use chrono::{DateTime, Utc};

        GradeRecord {
            id: self.id,
            test_id: self.test_id,
            student_id: self.student_id,
            marks_obtained: self.marks_obtained,
            max_marks: self.max_marks,
            passing_marks: self.passing_marks,
            percentage: self.percentage,
            grade: self.grade.parse::<LetterGrade>().unwrap_or(LetterGrade::F),
            is_passed: self.is_passed,
            status: self
                .status
                .parse::<GradeStatus>()
                .unwrap_or(GradeStatus::Failed),
            remarks: self.remarks,
            graded_by: self.graded_by,
            graded_at: DateTime::<Utc>::from_timestamp(self.graded_at, 0).unwrap_or_default(),
            submitted_at: DateTime::<Utc>::from_timestamp(self.submitted_at, 0).unwrap_or_default(),
            academic_year: self.academic_year,
            is_active: self.is_active,
        }
    }
}
