use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PartnerLogos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PartnerLogos::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PartnerLogos::ServicePageId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PartnerLogos::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PartnerLogos::ImageUrl)
                            .string_len(500)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PartnerLogos::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PartnerLogos::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PartnerLogos::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_partner_logos_service_page_id")
                            .from(PartnerLogos::Table, PartnerLogos::ServicePageId)
                            .to(ServicePages::Table, ServicePages::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_partner_logos_display_order")
                    .table(PartnerLogos::Table)
                    .col(PartnerLogos::DisplayOrder)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PartnerLogos::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PartnerLogos {
    Table,
    Id,
    ServicePageId,
    Name,
    ImageUrl,
    DisplayOrder,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ServicePages {
    Table,
    Id,
}
