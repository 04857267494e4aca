use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_clients_table::Migration),
            Box::new(m20250101_000002_create_projects_table::Migration),
            Box::new(m20250101_000003_create_documents_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250101_000001_create_clients_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_clients_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Clients::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Clients::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Clients::Rut)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Clients::LegalName).string().not_null())
                        .col(ColumnDef::new(Clients::BusinessActivity).string().null())
                        .col(ColumnDef::new(Clients::Phone).string().null())
                        .col(ColumnDef::new(Clients::Email).string().null())
                        .col(ColumnDef::new(Clients::Address).string().null())
                        .col(ColumnDef::new(Clients::Commune).string().null())
                        .col(ColumnDef::new(Clients::AccountNumber).string().null())
                        .col(
                            ColumnDef::new(Clients::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Clients::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_clients_is_active")
                        .table(Clients::Table)
                        .col(Clients::IsActive)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Clients::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Clients {
        Table,
        Id,
        Rut,
        LegalName,
        BusinessActivity,
        Phone,
        Email,
        Address,
        Commune,
        AccountNumber,
        IsActive,
        CreatedAt,
    }
}

mod m20250101_000002_create_projects_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_projects_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Projects::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Projects::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Projects::Code)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Projects::Name).string().not_null())
                        .col(ColumnDef::new(Projects::Description).string().null())
                        .col(ColumnDef::new(Projects::ClientRut).string().not_null())
                        .col(
                            ColumnDef::new(Projects::Budget)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Projects::StartDate).date().not_null())
                        .col(ColumnDef::new(Projects::EndDate).date().null())
                        .col(ColumnDef::new(Projects::Status).string().not_null())
                        .col(ColumnDef::new(Projects::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_projects_client_rut")
                        .table(Projects::Table)
                        .col(Projects::ClientRut)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Projects::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Projects {
        Table,
        Id,
        Code,
        Name,
        Description,
        ClientRut,
        Budget,
        StartDate,
        EndDate,
        Status,
        CreatedAt,
    }
}

mod m20250101_000003_create_documents_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000003_create_documents_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Documents::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Documents::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Documents::DocumentNumber)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Documents::DocumentType).string().not_null())
                        .col(ColumnDef::new(Documents::IssueDate).date().not_null())
                        .col(ColumnDef::new(Documents::ClientRut).string().not_null())
                        .col(ColumnDef::new(Documents::ProjectCode).string().null())
                        .col(ColumnDef::new(Documents::Description).string().null())
                        .col(
                            ColumnDef::new(Documents::NetAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Documents::TaxAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Documents::TotalAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Documents::Status).string().not_null())
                        .col(ColumnDef::new(Documents::PaymentTerms).string().null())
                        .col(ColumnDef::new(Documents::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            // Useful indexes for ledger filters and reconciliation
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_documents_client_rut")
                        .table(Documents::Table)
                        .col(Documents::ClientRut)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_documents_project_code")
                        .table(Documents::Table)
                        .col(Documents::ProjectCode)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_documents_status")
                        .table(Documents::Table)
                        .col(Documents::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_documents_issue_date")
                        .table(Documents::Table)
                        .col(Documents::IssueDate)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Documents::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Documents {
        Table,
        Id,
        DocumentNumber,
        DocumentType,
        IssueDate,
        ClientRut,
        ProjectCode,
        Description,
        NetAmount,
        TaxAmount,
        TotalAmount,
        Status,
        PaymentTerms,
        CreatedAt,
    }
}
