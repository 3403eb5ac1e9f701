use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建科目表
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subjects::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Subjects::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Subjects::Code).string().null())
                    .col(
                        ColumnDef::new(Subjects::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学生表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(ColumnDef::new(Students::RollNumber).string().null())
                    .col(
                        ColumnDef::new(Students::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建测验表
        // subject_id 与 subject_label 二选一：前者关联科目表，后者保存自由文本科目
        manager
            .create_table(
                Table::create()
                    .table(Tests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tests::Title).string().not_null())
                    .col(ColumnDef::new(Tests::SubjectId).big_integer().null())
                    .col(ColumnDef::new(Tests::SubjectLabel).string().null())
                    .col(ColumnDef::new(Tests::TestType).string().not_null())
                    .col(ColumnDef::new(Tests::TestDate).big_integer().not_null())
                    .col(ColumnDef::new(Tests::MaxMarks).double().not_null())
                    .col(ColumnDef::new(Tests::PassingMarks).double().not_null())
                    .col(
                        ColumnDef::new(Tests::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Tests::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Tests::Table, Tests::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建成绩记录表
        // 不加外键：测验/学生被上层硬删除后，历史成绩记录仍需保留并可被聚合层跳过
        manager
            .create_table(
                Table::create()
                    .table(GradeRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradeRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GradeRecords::TestId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradeRecords::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradeRecords::MarksObtained)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GradeRecords::MaxMarks).double().not_null())
                    .col(
                        ColumnDef::new(GradeRecords::PassingMarks)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GradeRecords::Percentage).double().not_null())
                    .col(ColumnDef::new(GradeRecords::Grade).string().not_null())
                    .col(ColumnDef::new(GradeRecords::IsPassed).boolean().not_null())
                    .col(ColumnDef::new(GradeRecords::Status).string().not_null())
                    .col(ColumnDef::new(GradeRecords::Remarks).text().null())
                    .col(
                        ColumnDef::new(GradeRecords::GradedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradeRecords::GradedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradeRecords::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradeRecords::AcademicYear)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradeRecords::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        // (test_id, student_id) 唯一索引：同一测验同一学生至多一条成绩记录，
        // upsert 的原子性依赖此约束
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_grade_records_test_student")
                    .table(GradeRecords::Table)
                    .col(GradeRecords::TestId)
                    .col(GradeRecords::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_grade_records_test_id")
                    .table(GradeRecords::Table)
                    .col(GradeRecords::TestId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_grade_records_student_id")
                    .table(GradeRecords::Table)
                    .col(GradeRecords::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_grade_records_academic_year")
                    .table(GradeRecords::Table)
                    .col(GradeRecords::AcademicYear)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tests_subject_id")
                    .table(Tests::Table)
                    .col(Tests::SubjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tests_test_date")
                    .table(Tests::Table)
                    .col(Tests::TestDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(GradeRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Subjects {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
    Name,
    Code,
    IsActive,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    Name,
    RollNumber,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tests {
    #[sea_orm(iden = "tests")]
    Table,
    Id,
    Title,
    SubjectId,
    SubjectLabel,
    TestType,
    TestDate,
    MaxMarks,
    PassingMarks,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GradeRecords {
    #[sea_orm(iden = "grade_records")]
    Table,
    Id,
    TestId,
    StudentId,
    MarksObtained,
    MaxMarks,
    PassingMarks,
    Percentage,
    Grade,
    IsPassed,
    Status,
    Remarks,
    GradedBy,
    GradedAt,
    SubmittedAt,
    AcademicYear,
    IsActive,
}
