//! SeaORM repository implementations

use super::entity;
use super::mapper::{db_order, stored_order};
use crate::contract::{
    Content, ContentKind, Course, CourseUpdate, Item, ItemPayload, ItemRef, Module, ModuleUpdate,
    NewContent, NewCourse, NewItem, NewModule, NewSubject, OrderScope, Subject,
};
use crate::domain::repository::{
    ContentRepository, CourseRepository, ItemRepository, ModuleRepository, OrderTaken,
    SubjectRepository,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_orm::{
    prelude::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Map a failed ordered write to [`OrderTaken`] when the unique index rejected it
fn ordered_write_error(err: DbErr, scope: OrderScope, order: u32) -> anyhow::Error {
    if is_unique_violation(&err) {
        OrderTaken { scope, order }.into()
    } else {
        err.into()
    }
}

// ===== Subject Repository =====

pub struct SeaOrmSubjectRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmSubjectRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubjectRepository for SeaOrmSubjectRepository {
    async fn create(&self, subject: &NewSubject) -> Result<Subject> {
        let active: entity::subject::ActiveModel = subject.into();
        Ok(active.insert(&*self.db).await?.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Subject>> {
        let result = entity::subject::Entity::find_by_id(id)
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Subject>> {
        let result = entity::subject::Entity::find()
            .filter(entity::subject::Column::Slug.eq(slug))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<Subject>> {
        let results = entity::subject::Entity::find()
            .order_by_asc(entity::subject::Column::Title)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }
}

// ===== Course Repository =====

pub struct SeaOrmCourseRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmCourseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CourseRepository for SeaOrmCourseRepository {
    async fn create(&self, course: &NewCourse) -> Result<Course> {
        let active: entity::course::ActiveModel = course.into();
        Ok(active.insert(&*self.db).await?.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Course>> {
        let result = entity::course::Entity::find_by_id(id)
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Course>> {
        let result = entity::course::Entity::find()
            .filter(entity::course::Column::Slug.eq(slug))
            .one(&*self.db)
            .await?;
        Ok(result.map(Into::into))
    }

    async fn list(&self, owner_id: Option<Uuid>) -> Result<Vec<Course>> {
        let mut query = entity::course::Entity::find();
        if let Some(owner_id) = owner_id {
            query = query.filter(entity::course::Column::OwnerId.eq(owner_id));
        }

        let results = query
            .order_by_desc(entity::course::Column::Created)
            .order_by_desc(entity::course::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, update: &CourseUpdate) -> Result<Course> {
        use sea_orm::ActiveValue::{Set, Unchanged};

        let active = entity::course::ActiveModel {
            id: Unchanged(id),
            subject_id: Set(update.subject_id),
            title: Set(update.title.clone()),
            slug: Set(update.slug.clone()),
            overview: Set(update.overview.clone()),
            ..Default::default()
        };
        Ok(active.update(&*self.db).await?.into())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        entity::course::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }
}

// ===== Module Repository =====

pub struct SeaOrmModuleRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmModuleRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ModuleRepository for SeaOrmModuleRepository {
    async fn insert(&self, module: NewModule) -> Result<Module> {
        use sea_orm::ActiveValue::{NotSet, Set};

        let order = module
            .order
            .context("module order must be assigned before insert")?;
        let active = entity::module::ActiveModel {
            id: NotSet,
            course_id: Set(module.course_id),
            title: Set(module.title),
            description: Set(module.description),
            order: Set(db_order(order)?),
        };

        let model = active
            .insert(&*self.db)
            .await
            .map_err(|err| ordered_write_error(err, OrderScope::Course(module.course_id), order))?;
        model.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Module>> {
        entity::module::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn list_by_course(&self, course_id: i64) -> Result<Vec<Module>> {
        entity::module::Entity::find()
            .filter(entity::module::Column::CourseId.eq(course_id))
            .order_by_asc(entity::module::Column::Order)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }

    async fn max_order(&self, course_id: i64) -> Result<Option<u32>> {
        let max: Option<Option<i32>> = entity::module::Entity::find()
            .select_only()
            .column_as(entity::module::Column::Order.max(), "max_order")
            .filter(entity::module::Column::CourseId.eq(course_id))
            .into_tuple()
            .one(&*self.db)
            .await?;
        max.flatten().map(stored_order).transpose()
    }

    async fn update(&self, id: i64, update: &ModuleUpdate) -> Result<Module> {
        use sea_orm::ActiveValue::{Set, Unchanged};

        let active = entity::module::ActiveModel {
            id: Unchanged(id),
            title: Set(update.title.clone()),
            description: Set(update.description.clone()),
            ..Default::default()
        };
        active.update(&*self.db).await?.try_into()
    }

    async fn delete(&self, id: i64) -> Result<()> {
        entity::module::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    async fn reorder(&self, course_id: i64, orders: &[(i64, u32)]) -> Result<()> {
        use entity::module::{Column, Entity};

        let scope = OrderScope::Course(course_id);
        let txn = self.db.begin().await?;

        // Park the moved modules on negative orders first so that swapping
        // two positions never collides with itself halfway through.
        for (parked, (module_id, _)) in (1..).zip(orders) {
            Entity::update_many()
                .col_expr(Column::Order, Expr::value(-parked))
                .filter(Column::Id.eq(*module_id))
                .filter(Column::CourseId.eq(course_id))
                .exec(&txn)
                .await?;
        }

        for &(module_id, order) in orders {
            Entity::update_many()
                .col_expr(Column::Order, Expr::value(db_order(order)?))
                .filter(Column::Id.eq(module_id))
                .filter(Column::CourseId.eq(course_id))
                .exec(&txn)
                .await
                .map_err(|err| ordered_write_error(err, scope, order))?;
        }

        txn.commit().await?;
        Ok(())
    }
}

// ===== Content Repository =====

pub struct SeaOrmContentRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmContentRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContentRepository for SeaOrmContentRepository {
    async fn insert(&self, content: NewContent) -> Result<Content> {
        use sea_orm::ActiveValue::{NotSet, Set};

        let order = content
            .order
            .context("content order must be assigned before insert")?;
        let active = entity::content::ActiveModel {
            id: NotSet,
            module_id: Set(content.module_id),
            content_type: Set(content.item.kind.as_str().to_string()),
            object_id: Set(content.item.id),
            order: Set(db_order(order)?),
        };

        let model = active
            .insert(&*self.db)
            .await
            .map_err(|err| ordered_write_error(err, OrderScope::Module(content.module_id), order))?;
        model.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Content>> {
        entity::content::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn list_by_module(&self, module_id: i64) -> Result<Vec<Content>> {
        entity::content::Entity::find()
            .filter(entity::content::Column::ModuleId.eq(module_id))
            .order_by_asc(entity::content::Column::Order)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }

    async fn max_order(&self, module_id: i64) -> Result<Option<u32>> {
        let max: Option<Option<i32>> = entity::content::Entity::find()
            .select_only()
            .column_as(entity::content::Column::Order.max(), "max_order")
            .filter(entity::content::Column::ModuleId.eq(module_id))
            .into_tuple()
            .one(&*self.db)
            .await?;
        max.flatten().map(stored_order).transpose()
    }

    async fn delete(&self, id: i64) -> Result<()> {
        entity::content::Entity::delete_by_id(id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Content>> {
        entity::content::Entity::find()
            .order_by_asc(entity::content::Column::Id)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }
}

// ===== Item Repository =====

/// Run `$body` with `$store` bound to the entity module of `$kind`
macro_rules! with_item_store {
    ($kind:expr, $store:ident => $body:block) => {
        match $kind {
            ContentKind::Text => {
                use entity::text as $store;
                $body
            }
            ContentKind::Video => {
                use entity::video as $store;
                $body
            }
            ContentKind::Image => {
                use entity::image as $store;
                $body
            }
            ContentKind::File => {
                use entity::file as $store;
                $body
            }
        }
    };
}

pub struct SeaOrmItemRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmItemRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemRepository for SeaOrmItemRepository {
    async fn create(&self, item: &NewItem) -> Result<Item> {
        use sea_orm::ActiveValue::{NotSet, Set};

        let now = chrono::Utc::now();
        with_item_store!(item.payload.kind(), store => {
            let active = store::ActiveModel {
                id: NotSet,
                owner_id: Set(item.owner_id),
                title: Set(item.title.clone()),
                content: Set(item.payload.raw().to_string()),
                created: Set(now),
                updated: Set(now),
            };
            Ok(active.insert(&*self.db).await?.into())
        })
    }

    async fn find(&self, item: ItemRef) -> Result<Option<Item>> {
        with_item_store!(item.kind, store => {
            let result = store::Entity::find_by_id(item.id).one(&*self.db).await?;
            Ok(result.map(Into::into))
        })
    }

    async fn update(&self, item: ItemRef, title: &str, payload: &ItemPayload) -> Result<Item> {
        use sea_orm::ActiveValue::{Set, Unchanged};

        anyhow::ensure!(
            payload.kind() == item.kind,
            "{} payload cannot be stored as {}",
            payload.kind(),
            item
        );
        with_item_store!(item.kind, store => {
            let active = store::ActiveModel {
                id: Unchanged(item.id),
                title: Set(title.to_string()),
                content: Set(payload.raw().to_string()),
                updated: Set(chrono::Utc::now()),
                ..Default::default()
            };
            Ok(active.update(&*self.db).await?.into())
        })
    }

    async fn delete(&self, item: ItemRef) -> Result<()> {
        with_item_store!(item.kind, store => {
            store::Entity::delete_by_id(item.id).exec(&*self.db).await?;
            Ok(())
        })
    }

    async fn list_ids(&self, kind: ContentKind) -> Result<Vec<i64>> {
        with_item_store!(kind, store => {
            let ids = store::Entity::find()
                .select_only()
                .column(store::Column::Id)
                .order_by_asc(store::Column::Id)
                .into_tuple()
                .all(&*self.db)
                .await?;
            Ok(ids)
        })
    }
}
