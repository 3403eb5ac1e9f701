use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 测验表补充冗余统计列：已录入成绩数与最近成绩更新时间，
        // 由批量提交流程尽力维护，仪表盘列表页免去逐行 count
        manager
            .alter_table(
                Table::alter()
                    .table(Tests::Table)
                    .add_column(
                        ColumnDef::new(Tests::ResultCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Tests::Table)
                    .add_column(ColumnDef::new(Tests::LastMarksUpdate).big_integer().null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Tests::Table)
                    .drop_column(Tests::LastMarksUpdate)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Tests::Table)
                    .drop_column(Tests::ResultCount)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Tests {
    #[sea_orm(iden = "tests")]
    Table,
    ResultCount,
    LastMarksUpdate,
}
