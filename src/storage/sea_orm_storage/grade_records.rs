//! 成绩记录存储操作

use super::{SeaOrmStorage, map_db_err};
use crate::entity::grade_records::{ActiveModel, Column, Entity as GradeRecords};
use crate::errors::{GradeSystemError, Result};
use crate::models::{
    PaginationInfo,
    grades::{
        entities::{GradeOrder, GradeRecord},
        requests::{GradeListQuery, NewGradeRecord},
        responses::GradeListResponse,
    },
};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 原子写入成绩（插入或按唯一键替换）
    ///
    /// 整个 upsert 是一条 INSERT .. ON CONFLICT 语句，靠
    /// (test_id, student_id) 唯一索引保证并发安全。更新列表不含
    /// submitted_at 与 academic_year，重复提交保留首次提交信息；
    /// is_active 在列表内，重新提交会激活已软删除的记录。
    pub async fn upsert_grade_impl(&self, record: NewGradeRecord) -> Result<GradeRecord> {
        let test_id = record.test_id;
        let student_id = record.student_id;

        let model = ActiveModel {
            test_id: Set(record.test_id),
            student_id: Set(record.student_id),
            marks_obtained: Set(record.marks_obtained),
            max_marks: Set(record.max_marks),
            passing_marks: Set(record.passing_marks),
            percentage: Set(record.percentage),
            grade: Set(record.grade.to_string()),
            is_passed: Set(record.is_passed),
            status: Set(record.status.to_string()),
            remarks: Set(record.remarks),
            graded_by: Set(record.graded_by),
            graded_at: Set(record.graded_at.timestamp()),
            submitted_at: Set(record.submitted_at.timestamp()),
            academic_year: Set(record.academic_year),
            is_active: Set(true),
            ..Default::default()
        };

        let on_conflict = OnConflict::columns([Column::TestId, Column::StudentId])
            .update_columns([
                Column::MarksObtained,
                Column::MaxMarks,
                Column::PassingMarks,
                Column::Percentage,
                Column::Grade,
                Column::IsPassed,
                Column::Status,
                Column::Remarks,
                Column::GradedBy,
                Column::GradedAt,
                Column::IsActive,
            ])
            .to_owned();

        GradeRecords::insert(model)
            .on_conflict(on_conflict)
            .exec(&self.db)
            .await
            .map_err(|e| map_db_err("写入成绩失败", e))?;

        // 回读落库结果，返回含保留字段在内的真实存储值
        self.get_grade_impl(test_id, student_id)
            .await?
            .ok_or_else(|| {
                GradeSystemError::database_operation(format!(
                    "写入后读取成绩失败: test={test_id} student={student_id}"
                ))
            })
    }

    /// 按唯一键读取成绩（包含已停用记录）
    pub async fn get_grade_impl(
        &self,
        test_id: i64,
        student_id: i64,
    ) -> Result<Option<GradeRecord>> {
        let result = GradeRecords::find()
            .filter(Column::TestId.eq(test_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| map_db_err("查询成绩失败", e))?;

        Ok(result.map(|m| m.into_record()))
    }

    /// 一个测验的全部活跃成绩
    pub async fn find_by_test_impl(
        &self,
        test_id: i64,
        order: GradeOrder,
    ) -> Result<Vec<GradeRecord>> {
        let select = GradeRecords::find()
            .filter(Column::TestId.eq(test_id))
            .filter(Column::IsActive.eq(true));

        let select = match order {
            GradeOrder::MarksDesc => select.order_by_desc(Column::MarksObtained),
            GradeOrder::RecentFirst => select.order_by_desc(Column::SubmittedAt),
        };

        let results = select
            .all(&self.db)
            .await
            .map_err(|e| map_db_err("查询测验成绩失败", e))?;

        Ok(results.into_iter().map(|m| m.into_record()).collect())
    }

    /// 一个学生的全部活跃成绩
    pub async fn find_by_student_impl(
        &self,
        student_id: i64,
        order: GradeOrder,
    ) -> Result<Vec<GradeRecord>> {
        let select = GradeRecords::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::IsActive.eq(true));

        let select = match order {
            GradeOrder::MarksDesc => select.order_by_desc(Column::MarksObtained),
            GradeOrder::RecentFirst => select.order_by_desc(Column::SubmittedAt),
        };

        let results = select
            .all(&self.db)
            .await
            .map_err(|e| map_db_err("查询学生成绩失败", e))?;

        Ok(results.into_iter().map(|m| m.into_record()).collect())
    }

    /// 列出成绩（分页）
    pub async fn list_grades_impl(&self, query: GradeListQuery) -> Result<GradeListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(20).clamp(1, 100) as u64;

        let mut select = GradeRecords::find();

        // 测验筛选
        if let Some(test_id) = query.test_id {
            select = select.filter(Column::TestId.eq(test_id));
        }

        // 学生筛选
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        // 学年筛选
        if let Some(ref academic_year) = query.academic_year {
            select = select.filter(Column::AcademicYear.eq(academic_year.clone()));
        }

        // 默认只看活跃记录
        if !query.include_inactive {
            select = select.filter(Column::IsActive.eq(true));
        }

        // 排序
        select = select.order_by_desc(Column::GradedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| map_db_err("查询成绩总数失败", e))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| map_db_err("查询成绩页数失败", e))?;

        let records = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| map_db_err("查询成绩列表失败", e))?;

        Ok(GradeListResponse {
            items: records.into_iter().map(|m| m.into_record()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 一个测验的活跃成绩数
    pub async fn count_active_for_test_impl(&self, test_id: i64) -> Result<i64> {
        let count = GradeRecords::find()
            .filter(Column::TestId.eq(test_id))
            .filter(Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| map_db_err("统计测验成绩数失败", e))?;

        Ok(count as i64)
    }

    /// 测验是否还有活跃成绩
    pub async fn has_active_records_for_test_impl(&self, test_id: i64) -> Result<bool> {
        Ok(self.count_active_for_test_impl(test_id).await? > 0)
    }

    /// 软删除成绩
    pub async fn deactivate_grade_impl(&self, test_id: i64, student_id: i64) -> Result<bool> {
        let result = GradeRecords::update_many()
            .col_expr(Column::IsActive, sea_orm::sea_query::Expr::value(false))
            .filter(Column::TestId.eq(test_id))
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| map_db_err("停用成绩失败", e))?;

        Ok(result.rows_affected > 0)
    }
}
