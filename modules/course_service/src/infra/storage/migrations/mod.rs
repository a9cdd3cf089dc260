//! Database migrations for course service

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_courses::Migration),
            Box::new(m20250301_000002_create_modules::Migration),
            Box::new(m20250301_000003_create_items::Migration),
            Box::new(m20250301_000004_create_contents::Migration),
        ]
    }
}

mod m20250301_000001_create_courses {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_courses"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
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
                        .col(ColumnDef::new(Subjects::Title).string_len(200).not_null())
                        .col(
                            ColumnDef::new(Subjects::Slug)
                                .string_len(200)
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Courses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Courses::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Courses::OwnerId).uuid().not_null())
                        .col(ColumnDef::new(Courses::SubjectId).big_integer().not_null())
                        .col(ColumnDef::new(Courses::Title).string_len(200).not_null())
                        .col(
                            ColumnDef::new(Courses::Slug)
                                .string_len(200)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Courses::Overview).text().not_null())
                        .col(
                            ColumnDef::new(Courses::Created)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_courses_subject")
                                .from(Courses::Table, Courses::SubjectId)
                                .to(Subjects::Table, Subjects::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_courses_owner_id")
                        .table(Courses::Table)
                        .col(Courses::OwnerId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Courses::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Subjects::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Subjects {
        Table,
        Id,
        Title,
        Slug,
    }

    #[derive(DeriveIden)]
    enum Courses {
        Table,
        Id,
        OwnerId,
        SubjectId,
        Title,
        Slug,
        Overview,
        Created,
    }
}

mod m20250301_000002_create_modules {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_modules"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Modules::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Modules::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Modules::CourseId).big_integer().not_null())
                        .col(ColumnDef::new(Modules::Title).string_len(200).not_null())
                        .col(
                            ColumnDef::new(Modules::Description)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .col(ColumnDef::new(Modules::Order).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_modules_course")
                                .from(Modules::Table, Modules::CourseId)
                                .to(Courses::Table, Courses::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Losing writers of a concurrent order assignment fail here
            manager
                .create_index(
                    Index::create()
                        .name("uq_modules_course_order")
                        .table(Modules::Table)
                        .col(Modules::CourseId)
                        .col(Modules::Order)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Modules::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Modules {
        Table,
        Id,
        CourseId,
        Title,
        Description,
        Order,
    }

    #[derive(DeriveIden)]
    enum Courses {
        Table,
        Id,
    }
}

mod m20250301_000003_create_items {
    use super::*;

    /// One table per content kind, all with the same layout
    const ITEM_TABLES: [&str; 4] = ["texts", "videos", "images", "files"];

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_items"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for table in ITEM_TABLES {
                manager
                    .create_table(
                        Table::create()
                            .table(Alias::new(table))
                            .if_not_exists()
                            .col(
                                ColumnDef::new(Item::Id)
                                    .big_integer()
                                    .not_null()
                                    .auto_increment()
                                    .primary_key(),
                            )
                            .col(ColumnDef::new(Item::OwnerId).uuid().not_null())
                            .col(ColumnDef::new(Item::Title).string_len(250).not_null())
                            .col(ColumnDef::new(Item::Content).text().not_null())
                            .col(
                                ColumnDef::new(Item::Created)
                                    .timestamp_with_time_zone()
                                    .not_null()
                                    .default(Expr::current_timestamp()),
                            )
                            .col(
                                ColumnDef::new(Item::Updated)
                                    .timestamp_with_time_zone()
                                    .not_null()
                                    .default(Expr::current_timestamp()),
                            )
                            .to_owned(),
                    )
                    .await?;
            }
            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for table in ITEM_TABLES {
                manager
                    .drop_table(Table::drop().table(Alias::new(table)).to_owned())
                    .await?;
            }
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    enum Item {
        Id,
        OwnerId,
        Title,
        Content,
        Created,
        Updated,
    }
}

mod m20250301_000004_create_contents {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000004_create_contents"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Contents::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Contents::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Contents::ModuleId).big_integer().not_null())
                        .col(ColumnDef::new(Contents::ContentType).string_len(16).not_null())
                        .col(ColumnDef::new(Contents::ObjectId).big_integer().not_null())
                        .col(ColumnDef::new(Contents::Order).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_contents_module")
                                .from(Contents::Table, Contents::ModuleId)
                                .to(Modules::Table, Modules::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_contents_module_order")
                        .table(Contents::Table)
                        .col(Contents::ModuleId)
                        .col(Contents::Order)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_contents_item")
                        .table(Contents::Table)
                        .col(Contents::ContentType)
                        .col(Contents::ObjectId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Contents::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Contents {
        Table,
        Id,
        ModuleId,
        ContentType,
        ObjectId,
        Order,
    }

    #[derive(DeriveIden)]
    enum Modules {
        Table,
        Id,
    }
}
