//! Domain service - business logic orchestration

use super::ordering::OrderAssigner;
use super::repository::{
    ContentRepository, CourseRepository, ItemRepository, ModuleRepository, OrderTaken,
    SubjectRepository,
};
use super::storage_error;
use super::validation::{
    validate_item_fields, validate_order, validate_reorder, validate_slug, validate_title,
    MAX_TITLE_LEN,
};
use crate::config::Config;
use crate::contract::{
    Content, ContentKind, Course, CourseError, CourseUpdate, IntegrityReport, Item, ItemFields,
    ItemRef, Module, ModuleUpdate, NewContent, NewCourse, NewItem, NewModule, NewSubject,
    OrderScope, Subject,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// Storage handles the service works against
#[derive(Clone)]
pub struct Repositories {
    pub subjects: Arc<dyn SubjectRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub modules: Arc<dyn ModuleRepository>,
    pub contents: Arc<dyn ContentRepository>,
    pub items: Arc<dyn ItemRepository>,
}

/// Domain service for courses, modules and their contents
pub struct Service {
    subjects: Arc<dyn SubjectRepository>,
    courses: Arc<dyn CourseRepository>,
    modules: Arc<dyn ModuleRepository>,
    contents: Arc<dyn ContentRepository>,
    items: Arc<dyn ItemRepository>,
    orders: OrderAssigner,
    validate_video_urls: bool,
}

impl Service {
    /// Create a new service instance
    pub fn new(repos: Repositories, config: &Config) -> Self {
        Self {
            subjects: repos.subjects,
            courses: repos.courses,
            modules: repos.modules,
            contents: repos.contents,
            items: repos.items,
            orders: OrderAssigner::new(config.order_retry_limit),
            validate_video_urls: config.validate_video_urls,
        }
    }

    // ===== Subject Operations =====

    pub async fn create_subject(&self, subject: NewSubject) -> Result<Subject, CourseError> {
        validate_title("title", &subject.title, MAX_TITLE_LEN)?;
        validate_slug(&subject.slug)?;

        if self
            .subjects
            .find_by_slug(&subject.slug)
            .await
            .map_err(storage_error)?
            .is_some()
        {
            return Err(CourseError::Conflict {
                reason: format!("Subject slug already exists: {}", subject.slug),
            });
        }

        self.subjects.create(&subject).await.map_err(storage_error)
    }

    /// List subjects ordered by title
    pub async fn list_subjects(&self) -> Result<Vec<Subject>, CourseError> {
        self.subjects.list_all().await.map_err(storage_error)
    }

    // ===== Course Operations =====

    pub async fn create_course(&self, course: NewCourse) -> Result<Course, CourseError> {
        validate_title("title", &course.title, MAX_TITLE_LEN)?;
        validate_slug(&course.slug)?;
        self.require_subject(course.subject_id).await?;
        self.ensure_course_slug_free(&course.slug, None).await?;

        let created = self.courses.create(&course).await.map_err(storage_error)?;
        tracing::info!(course_id = created.id, owner_id = %created.owner_id, "course created");
        Ok(created)
    }

    pub async fn get_course(&self, course_id: i64) -> Result<Course, CourseError> {
        self.courses
            .find_by_id(course_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| CourseError::not_found("course", course_id))
    }

    /// List courses newest first, optionally for one owner
    pub async fn list_courses(&self, owner_id: Option<Uuid>) -> Result<Vec<Course>, CourseError> {
        self.courses.list(owner_id).await.map_err(storage_error)
    }

    pub async fn update_course(
        &self,
        course_id: i64,
        update: CourseUpdate,
    ) -> Result<Course, CourseError> {
        validate_title("title", &update.title, MAX_TITLE_LEN)?;
        validate_slug(&update.slug)?;
        self.get_course(course_id).await?;
        self.require_subject(update.subject_id).await?;
        self.ensure_course_slug_free(&update.slug, Some(course_id))
            .await?;

        self.courses
            .update(course_id, &update)
            .await
            .map_err(storage_error)
    }

    /// Delete a course together with the items of all its contents.
    ///
    /// The course lock and every module lock are held throughout, so no
    /// module or content can be added behind the listing.
    pub async fn delete_course(&self, course_id: i64) -> Result<(), CourseError> {
        self.get_course(course_id).await?;
        let _course_guard = self.orders.lock(OrderScope::Course(course_id)).await;

        let modules = self
            .modules
            .list_by_course(course_id)
            .await
            .map_err(storage_error)?;
        let mut module_guards = Vec::with_capacity(modules.len());
        for module in &modules {
            module_guards.push(self.orders.lock(OrderScope::Module(module.id)).await);
        }
        for module in &modules {
            self.delete_module_items(module.id).await?;
        }

        self.courses.delete(course_id).await.map_err(storage_error)?;

        tracing::info!(course_id, modules = modules.len(), "course deleted");
        Ok(())
    }

    // ===== Module Operations =====

    /// Create a module, assigning the next order of its course unless one is given
    pub async fn create_module(&self, module: NewModule) -> Result<Module, CourseError> {
        validate_title("title", &module.title, MAX_TITLE_LEN)?;
        if let Some(order) = module.order {
            validate_order(order)?;
        }
        self.get_course(module.course_id).await?;

        let course_id = module.course_id;
        let modules: &dyn ModuleRepository = self.modules.as_ref();
        let created = self
            .orders
            .insert(
                module,
                move |_| modules.max_order(course_id),
                move |module| modules.insert(module),
            )
            .await?;

        tracing::info!(
            module_id = created.id,
            course_id,
            order = created.order,
            "module created"
        );
        Ok(created)
    }

    pub async fn get_module(&self, module_id: i64) -> Result<Module, CourseError> {
        self.modules
            .find_by_id(module_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| CourseError::not_found("module", module_id))
    }

    /// List the modules of a course by ascending order
    pub async fn list_course_modules(&self, course_id: i64) -> Result<Vec<Module>, CourseError> {
        self.get_course(course_id).await?;
        self.modules
            .list_by_course(course_id)
            .await
            .map_err(storage_error)
    }

    /// Update title and description; the order is left as is
    pub async fn update_module(
        &self,
        module_id: i64,
        update: ModuleUpdate,
    ) -> Result<Module, CourseError> {
        validate_title("title", &update.title, MAX_TITLE_LEN)?;
        self.get_module(module_id).await?;

        self.modules
            .update(module_id, &update)
            .await
            .map_err(storage_error)
    }

    /// Delete a module together with the items of its contents
    pub async fn delete_module(&self, module_id: i64) -> Result<(), CourseError> {
        let module = self.get_module(module_id).await?;
        let _guard = self.orders.lock(OrderScope::Module(module_id)).await;

        self.delete_module_items(module_id).await?;
        self.modules.delete(module_id).await.map_err(storage_error)?;

        tracing::info!(module_id, course_id = module.course_id, "module deleted");
        Ok(())
    }

    /// Explicitly set module orders within a course, bypassing assignment.
    ///
    /// Every module must belong to the course. Modules not listed keep their
    /// order, and the final orders must not collide with them.
    pub async fn reorder_module(
        &self,
        course_id: i64,
        orders: Vec<(i64, u32)>,
    ) -> Result<(), CourseError> {
        validate_reorder(&orders)?;
        self.get_course(course_id).await?;
        if orders.is_empty() {
            return Ok(());
        }

        let scope = OrderScope::Course(course_id);
        let _guard = self.orders.lock(scope).await;

        let existing: HashSet<i64> = self
            .modules
            .list_by_course(course_id)
            .await
            .map_err(storage_error)?
            .into_iter()
            .map(|m| m.id)
            .collect();
        if let Some((missing, _)) = orders.iter().find(|(id, _)| !existing.contains(id)) {
            return Err(CourseError::not_found("module", missing));
        }

        if let Err(err) = self.modules.reorder(course_id, &orders).await {
            return Err(match err.downcast_ref::<OrderTaken>() {
                Some(taken) => {
                    tracing::warn!(
                        %scope,
                        order = taken.order,
                        "reorder collides with existing module"
                    );
                    CourseError::OrderConflict {
                        scope,
                        order: taken.order,
                    }
                }
                None => storage_error(err),
            });
        }

        tracing::info!(course_id, modules = orders.len(), "modules reordered");
        Ok(())
    }

    // ===== Content Operations =====

    /// Create an item of `type_name` and link it at the end of the module.
    ///
    /// The type name is checked before anything is written. The item is
    /// stored first so the content slot can point at it; if linking fails the
    /// item is removed again.
    pub async fn create_content(
        &self,
        module_id: i64,
        type_name: &str,
        fields: ItemFields,
        owner_id: Uuid,
    ) -> Result<Content, CourseError> {
        let kind: ContentKind = type_name.parse()?;
        let (title, payload) = validate_item_fields(kind, fields, self.validate_video_urls)?;
        self.get_module(module_id).await?;

        let item = self
            .items
            .create(&NewItem {
                owner_id,
                title,
                payload,
            })
            .await
            .map_err(storage_error)?
            .item_ref();

        let contents: &dyn ContentRepository = self.contents.as_ref();
        let linked = self
            .orders
            .insert(
                NewContent {
                    module_id,
                    item,
                    order: None,
                },
                move |_| contents.max_order(module_id),
                move |content| contents.insert(content),
            )
            .await;

        match linked {
            Ok(content) => {
                tracing::info!(
                    content_id = content.id,
                    module_id,
                    item = %item,
                    order = content.order,
                    "content created"
                );
                Ok(content)
            }
            Err(err) => {
                self.discard_item(item).await;
                // the module may have been deleted while the item was written
                if err == CourseError::Internal
                    && matches!(self.modules.find_by_id(module_id).await, Ok(None))
                {
                    return Err(CourseError::not_found("module", module_id));
                }
                Err(err)
            }
        }
    }

    /// Update the item behind a content slot in place; the order is unchanged
    pub async fn update_content(
        &self,
        content_id: i64,
        type_name: &str,
        fields: ItemFields,
    ) -> Result<Content, CourseError> {
        let kind: ContentKind = type_name.parse()?;
        let (title, payload) = validate_item_fields(kind, fields, self.validate_video_urls)?;

        let content = self.get_content(content_id).await?;
        if content.kind != kind {
            return Err(CourseError::not_found(
                "content",
                format!("{}/{}", kind, content_id),
            ));
        }

        let item = content.item_ref();
        self.require_item(item).await?;
        self.items
            .update(item, &title, &payload)
            .await
            .map_err(storage_error)?;

        tracing::debug!(content_id, item = %item, "content updated");
        Ok(content)
    }

    /// Delete the item a content slot points at, then the slot itself
    pub async fn delete_content(&self, content_id: i64) -> Result<(), CourseError> {
        let content = self.get_content(content_id).await?;
        let item = content.item_ref();

        self.items.delete(item).await.map_err(storage_error)?;
        if let Err(err) = self.contents.delete(content_id).await {
            tracing::error!(content_id, item = %item, "item deleted but content remains");
            return Err(storage_error(err));
        }

        tracing::info!(content_id, module_id = content.module_id, item = %item, "content deleted");
        Ok(())
    }

    /// List the contents of a module by ascending order
    pub async fn list_module_contents(&self, module_id: i64) -> Result<Vec<Content>, CourseError> {
        self.get_module(module_id).await?;
        self.contents
            .list_by_module(module_id)
            .await
            .map_err(storage_error)
    }

    pub async fn get_content(&self, content_id: i64) -> Result<Content, CourseError> {
        self.contents
            .find_by_id(content_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| CourseError::not_found("content", content_id))
    }

    /// Resolve the item a content slot points at
    pub async fn get_content_item(&self, content_id: i64) -> Result<Item, CourseError> {
        let content = self.get_content(content_id).await?;
        self.require_item(content.item_ref()).await
    }

    // ===== Integrity =====

    /// Find items without a content slot and slots without an item
    pub async fn audit_items(&self) -> Result<IntegrityReport, CourseError> {
        let contents = self.contents.list_all().await.map_err(storage_error)?;
        let referenced: HashSet<ItemRef> = contents.iter().map(Content::item_ref).collect();

        let mut report = IntegrityReport::default();
        let mut present: HashMap<ContentKind, HashSet<i64>> = HashMap::new();
        for kind in ContentKind::ALL {
            let ids = self.items.list_ids(kind).await.map_err(storage_error)?;
            for &id in &ids {
                let item = ItemRef { kind, id };
                if !referenced.contains(&item) {
                    tracing::warn!(%item, "{}", CourseError::OrphanedItem { item });
                    report.orphaned_items.push(item);
                }
            }
            present.insert(kind, ids.into_iter().collect());
        }

        for content in contents {
            let exists = present
                .get(&content.kind)
                .is_some_and(|ids| ids.contains(&content.object_id));
            if !exists {
                tracing::warn!(
                    content_id = content.id,
                    item = %content.item_ref(),
                    "content points at a missing item"
                );
                report.dangling_contents.push(content);
            }
        }

        report.orphaned_items.sort();
        Ok(report)
    }

    // ===== Helper Methods =====

    async fn require_subject(&self, subject_id: i64) -> Result<Subject, CourseError> {
        self.subjects
            .find_by_id(subject_id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| CourseError::not_found("subject", subject_id))
    }

    async fn require_item(&self, item: ItemRef) -> Result<Item, CourseError> {
        self.items
            .find(item)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| CourseError::not_found("item", item))
    }

    async fn ensure_course_slug_free(
        &self,
        slug: &str,
        course_id: Option<i64>,
    ) -> Result<(), CourseError> {
        let existing = self
            .courses
            .find_by_slug(slug)
            .await
            .map_err(storage_error)?;
        match existing {
            Some(course) if Some(course.id) != course_id => Err(CourseError::Conflict {
                reason: format!("Course slug already exists: {}", slug),
            }),
            _ => Ok(()),
        }
    }

    /// Items are not linked by a storage foreign key, so they go first
    async fn delete_module_items(&self, module_id: i64) -> Result<(), CourseError> {
        let contents = self
            .contents
            .list_by_module(module_id)
            .await
            .map_err(storage_error)?;
        for content in contents {
            self.items
                .delete(content.item_ref())
                .await
                .map_err(storage_error)?;
        }
        Ok(())
    }

    async fn discard_item(&self, item: ItemRef) {
        if let Err(err) = self.items.delete(item).await {
            tracing::error!(error = ?err, "{}", CourseError::OrphanedItem { item });
        }
    }
}
