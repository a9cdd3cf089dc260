//! SeaORM entities for database tables

/// Subjects table entity
pub mod subject {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "subjects")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub title: String,
        #[sea_orm(unique)]
        pub slug: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::course::Entity")]
        Courses,
    }

    impl Related<super::course::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Courses.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Courses table entity
pub mod course {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "courses")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub owner_id: Uuid,
        pub subject_id: i64,
        pub title: String,
        #[sea_orm(unique)]
        pub slug: String,
        #[sea_orm(column_type = "Text")]
        pub overview: String,
        /// Set on insert only
        pub created: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::subject::Entity",
            from = "Column::SubjectId",
            to = "super::subject::Column::Id",
            on_delete = "Cascade"
        )]
        Subject,
        #[sea_orm(has_many = "super::module::Entity")]
        Modules,
    }

    impl Related<super::subject::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Subject.def()
        }
    }

    impl Related<super::module::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Modules.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Course modules table entity; (course_id, order) is unique
pub mod module {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "modules")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub course_id: i64,
        pub title: String,
        #[sea_orm(column_type = "Text")]
        pub description: String,
        pub order: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::course::Entity",
            from = "Column::CourseId",
            to = "super::course::Column::Id",
            on_delete = "Cascade"
        )]
        Course,
        #[sea_orm(has_many = "super::content::Entity")]
        Contents,
    }

    impl Related<super::course::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Course.def()
        }
    }

    impl Related<super::content::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Contents.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Module contents table entity; (module_id, order) is unique
///
/// `content_type` selects the item table `object_id` points into. There is
/// no foreign key on `object_id`.
pub mod content {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "contents")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        pub module_id: i64,
        pub content_type: String,
        pub object_id: i64,
        pub order: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::module::Entity",
            from = "Column::ModuleId",
            to = "super::module::Column::Id",
            on_delete = "Cascade"
        )]
        Module,
    }

    impl Related<super::module::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Module.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

// Item tables share one layout; only the meaning of `content` differs.
macro_rules! item_entity {
    ($(#[$doc:meta])* $name:ident, $table:literal) => {
        $(#[$doc])*
        pub mod $name {
            use sea_orm::entity::prelude::*;

            #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
            #[sea_orm(table_name = $table)]
            pub struct Model {
                #[sea_orm(primary_key)]
                pub id: i64,
                pub owner_id: Uuid,
                pub title: String,
                #[sea_orm(column_type = "Text")]
                pub content: String,
                pub created: DateTimeUtc,
                pub updated: DateTimeUtc,
            }

            #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
            pub enum Relation {}

            impl ActiveModelBehavior for ActiveModel {}
        }
    };
}

item_entity!(
    /// Text items; `content` is the body
    text,
    "texts"
);
item_entity!(
    /// Video items; `content` is the URL
    video,
    "videos"
);
item_entity!(
    /// Image items; `content` is the stored file reference
    image,
    "images"
);
item_entity!(
    /// File items; `content` is the stored file reference
    file,
    "files"
);
