use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServicePages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServicePages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ServicePages::Title)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServicePages::Heading)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ServicePages::Content).text().not_null())
                    // 唯一索引保证该表至多一行
                    .col(
                        ColumnDef::new(ServicePages::SingletonGuard)
                            .boolean()
                            .not_null()
                            .default(true)
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ServicePages::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServicePages::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ServicePages {
    Table,
    Id,
    Title,
    Heading,
    Content,
    SingletonGuard,
    UpdatedAt,
}
