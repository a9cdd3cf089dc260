//! Shared test fixtures: in-memory repositories and service builders

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use course_service::config::Config;
use course_service::contract::*;
use course_service::domain::repository::*;
use course_service::domain::{Repositories, Service};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

#[derive(Default)]
struct State {
    next_id: i64,
    subjects: BTreeMap<i64, Subject>,
    courses: BTreeMap<i64, Course>,
    modules: BTreeMap<i64, Module>,
    contents: BTreeMap<i64, Content>,
    items: BTreeMap<ItemRef, Item>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn drop_module(&mut self, module_id: i64) {
        self.modules.remove(&module_id);
        self.contents.retain(|_, c| c.module_id != module_id);
    }
}

/// In-memory storage implementing every repository trait.
///
/// Enforces unique orders per scope like the database indexes do, and can be
/// told to fail selected writes.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
    /// Content inserts that find their order taken by an outside writer
    stolen_content_orders: AtomicU32,
    fail_content_insert: AtomicBool,
    fail_content_delete: AtomicBool,
    fail_item_delete: AtomicBool,
    item_creates: AtomicU32,
    /// Pause after reading a module's contents, before returning them
    content_list_delay: Mutex<Option<Duration>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            subjects: self.clone(),
            courses: self.clone(),
            modules: self.clone(),
            contents: self.clone(),
            items: self.clone(),
        }
    }

    pub fn steal_content_orders(&self, times: u32) {
        self.stolen_content_orders.store(times, Ordering::SeqCst);
    }

    pub fn fail_content_insert(&self, fail: bool) {
        self.fail_content_insert.store(fail, Ordering::SeqCst);
    }

    pub fn fail_content_delete(&self, fail: bool) {
        self.fail_content_delete.store(fail, Ordering::SeqCst);
    }

    pub fn fail_item_delete(&self, fail: bool) {
        self.fail_item_delete.store(fail, Ordering::SeqCst);
    }

    pub fn delay_content_listing(&self, delay: Duration) {
        *self.content_list_delay.lock() = Some(delay);
    }

    pub fn item_creates(&self) -> u32 {
        self.item_creates.load(Ordering::SeqCst)
    }

    pub fn item_count(&self) -> usize {
        self.state.read().items.len()
    }

    pub fn content_count(&self) -> usize {
        self.state.read().contents.len()
    }

    pub fn has_item(&self, item: ItemRef) -> bool {
        self.state.read().items.contains_key(&item)
    }

    /// Remove an item behind the service's back
    pub fn remove_item_raw(&self, item: ItemRef) {
        self.state.write().items.remove(&item);
    }

    /// Store an item no content points at
    pub fn insert_item_raw(&self, kind: ContentKind, title: &str) -> ItemRef {
        let mut state = self.state.write();
        let id = state.next_id();
        let now = Utc::now();
        let item = Item {
            id,
            owner_id: Uuid::nil(),
            title: title.to_string(),
            created: now,
            updated: now,
            payload: ItemPayload::from_raw(kind, "raw".to_string()),
        };
        let item_ref = item.item_ref();
        state.items.insert(item_ref, item);
        item_ref
    }
}

#[async_trait]
impl SubjectRepository for MemoryStore {
    async fn create(&self, subject: &NewSubject) -> Result<Subject> {
        let mut state = self.state.write();
        let created = Subject {
            id: state.next_id(),
            title: subject.title.clone(),
            slug: subject.slug.clone(),
        };
        state.subjects.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Subject>> {
        Ok(self.state.read().subjects.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Subject>> {
        Ok(self
            .state
            .read()
            .subjects
            .values()
            .find(|s| s.slug == slug)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Subject>> {
        let mut subjects: Vec<Subject> = self.state.read().subjects.values().cloned().collect();
        subjects.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(subjects)
    }
}

#[async_trait]
impl CourseRepository for MemoryStore {
    async fn create(&self, course: &NewCourse) -> Result<Course> {
        let mut state = self.state.write();
        let created = Course {
            id: state.next_id(),
            owner_id: course.owner_id,
            subject_id: course.subject_id,
            title: course.title.clone(),
            slug: course.slug.clone(),
            overview: course.overview.clone(),
            created: Utc::now(),
        };
        state.courses.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Course>> {
        Ok(self.state.read().courses.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Course>> {
        Ok(self
            .state
            .read()
            .courses
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn list(&self, owner_id: Option<Uuid>) -> Result<Vec<Course>> {
        let mut courses: Vec<Course> = self
            .state
            .read()
            .courses
            .values()
            .filter(|c| owner_id.map_or(true, |owner| c.owner_id == owner))
            .cloned()
            .collect();
        courses.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        Ok(courses)
    }

    async fn update(&self, id: i64, update: &CourseUpdate) -> Result<Course> {
        let mut state = self.state.write();
        let course = state
            .courses
            .get_mut(&id)
            .ok_or_else(|| anyhow!("course {} vanished", id))?;
        course.subject_id = update.subject_id;
        course.title = update.title.clone();
        course.slug = update.slug.clone();
        course.overview = update.overview.clone();
        Ok(course.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut state = self.state.write();
        state.courses.remove(&id);
        let modules: Vec<i64> = state
            .modules
            .values()
            .filter(|m| m.course_id == id)
            .map(|m| m.id)
            .collect();
        for module_id in modules {
            state.drop_module(module_id);
        }
        Ok(())
    }
}

#[async_trait]
impl ModuleRepository for MemoryStore {
    async fn insert(&self, module: NewModule) -> Result<Module> {
        let order = module.order.ok_or_else(|| anyhow!("order not assigned"))?;
        let mut state = self.state.write();
        if state
            .modules
            .values()
            .any(|m| m.course_id == module.course_id && m.order == order)
        {
            return Err(OrderTaken {
                scope: OrderScope::Course(module.course_id),
                order,
            }
            .into());
        }
        let created = Module {
            id: state.next_id(),
            course_id: module.course_id,
            title: module.title,
            description: module.description,
            order,
        };
        state.modules.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Module>> {
        Ok(self.state.read().modules.get(&id).cloned())
    }

    async fn list_by_course(&self, course_id: i64) -> Result<Vec<Module>> {
        let mut modules: Vec<Module> = self
            .state
            .read()
            .modules
            .values()
            .filter(|m| m.course_id == course_id)
            .cloned()
            .collect();
        modules.sort_by_key(|m| m.order);
        Ok(modules)
    }

    async fn max_order(&self, course_id: i64) -> Result<Option<u32>> {
        Ok(self
            .state
            .read()
            .modules
            .values()
            .filter(|m| m.course_id == course_id)
            .map(|m| m.order)
            .max())
    }

    async fn update(&self, id: i64, update: &ModuleUpdate) -> Result<Module> {
        let mut state = self.state.write();
        let module = state
            .modules
            .get_mut(&id)
            .ok_or_else(|| anyhow!("module {} vanished", id))?;
        module.title = update.title.clone();
        module.description = update.description.clone();
        Ok(module.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.state.write().drop_module(id);
        Ok(())
    }

    async fn reorder(&self, course_id: i64, orders: &[(i64, u32)]) -> Result<()> {
        let mut state = self.state.write();
        let mut seen = HashSet::new();
        let mut finals = Vec::new();
        for module in state.modules.values().filter(|m| m.course_id == course_id) {
            let order = orders
                .iter()
                .find(|(id, _)| *id == module.id)
                .map_or(module.order, |(_, order)| *order);
            if !seen.insert(order) {
                return Err(OrderTaken {
                    scope: OrderScope::Course(course_id),
                    order,
                }
                .into());
            }
            finals.push((module.id, order));
        }
        for (id, order) in finals {
            if let Some(module) = state.modules.get_mut(&id) {
                module.order = order;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for MemoryStore {
    async fn insert(&self, content: NewContent) -> Result<Content> {
        if self.fail_content_insert.load(Ordering::SeqCst) {
            return Err(anyhow!("connection reset"));
        }
        let order = content.order.ok_or_else(|| anyhow!("order not assigned"))?;
        let mut state = self.state.write();
        if !state.modules.contains_key(&content.module_id) {
            return Err(anyhow!(
                "FOREIGN KEY constraint failed: module {}",
                content.module_id
            ));
        }

        // An outside writer grabs the slot between lookup and insert
        let stolen = self
            .stolen_content_orders
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if stolen {
            let id = state.next_id();
            state.contents.insert(
                id,
                Content {
                    id,
                    module_id: content.module_id,
                    kind: ContentKind::Text,
                    object_id: -id,
                    order,
                },
            );
        }

        if state
            .contents
            .values()
            .any(|c| c.module_id == content.module_id && c.order == order)
        {
            return Err(OrderTaken {
                scope: OrderScope::Module(content.module_id),
                order,
            }
            .into());
        }
        let created = Content {
            id: state.next_id(),
            module_id: content.module_id,
            kind: content.item.kind,
            object_id: content.item.id,
            order,
        };
        state.contents.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Content>> {
        Ok(self.state.read().contents.get(&id).cloned())
    }

    async fn list_by_module(&self, module_id: i64) -> Result<Vec<Content>> {
        let mut contents: Vec<Content> = self
            .state
            .read()
            .contents
            .values()
            .filter(|c| c.module_id == module_id)
            .cloned()
            .collect();
        contents.sort_by_key(|c| c.order);

        let delay = *self.content_list_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(contents)
    }

    async fn max_order(&self, module_id: i64) -> Result<Option<u32>> {
        Ok(self
            .state
            .read()
            .contents
            .values()
            .filter(|c| c.module_id == module_id)
            .map(|c| c.order)
            .max())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        if self.fail_content_delete.load(Ordering::SeqCst) {
            return Err(anyhow!("connection reset"));
        }
        self.state.write().contents.remove(&id);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Content>> {
        Ok(self.state.read().contents.values().cloned().collect())
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn create(&self, item: &NewItem) -> Result<Item> {
        self.item_creates.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write();
        let now = Utc::now();
        let created = Item {
            id: state.next_id(),
            owner_id: item.owner_id,
            title: item.title.clone(),
            created: now,
            updated: now,
            payload: item.payload.clone(),
        };
        state.items.insert(created.item_ref(), created.clone());
        Ok(created)
    }

    async fn find(&self, item: ItemRef) -> Result<Option<Item>> {
        Ok(self.state.read().items.get(&item).cloned())
    }

    async fn update(&self, item: ItemRef, title: &str, payload: &ItemPayload) -> Result<Item> {
        let mut state = self.state.write();
        let stored = state
            .items
            .get_mut(&item)
            .ok_or_else(|| anyhow!("item {} vanished", item))?;
        stored.title = title.to_string();
        stored.payload = payload.clone();
        stored.updated = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, item: ItemRef) -> Result<()> {
        if self.fail_item_delete.load(Ordering::SeqCst) {
            return Err(anyhow!("connection reset"));
        }
        self.state.write().items.remove(&item);
        Ok(())
    }

    async fn list_ids(&self, kind: ContentKind) -> Result<Vec<i64>> {
        Ok(self
            .state
            .read()
            .items
            .keys()
            .filter(|item| item.kind == kind)
            .map(|item| item.id)
            .collect())
    }
}

// ===== Fixtures =====

pub fn create_test_service() -> (Arc<Service>, Arc<MemoryStore>) {
    create_test_service_with(Config::default())
}

pub fn create_test_service_with(config: Config) -> (Arc<Service>, Arc<MemoryStore>) {
    let store = MemoryStore::new();
    let service = Arc::new(Service::new(store.repositories(), &config));
    (service, store)
}

pub fn fields(title: &str, content: &str) -> ItemFields {
    ItemFields {
        title: title.to_string(),
        content: content.to_string(),
    }
}

/// Subject plus course, returning the course
pub async fn seed_course(service: &Service, slug: &str) -> Course {
    let subject = service
        .create_subject(NewSubject {
            title: format!("Subject {}", slug),
            slug: format!("{}-subject", slug),
        })
        .await
        .unwrap();
    service
        .create_course(NewCourse {
            owner_id: Uuid::new_v4(),
            subject_id: subject.id,
            title: format!("Course {}", slug),
            slug: slug.to_string(),
            overview: String::new(),
        })
        .await
        .unwrap()
}

pub async fn seed_module(service: &Service, course_id: i64, title: &str) -> Module {
    service
        .create_module(NewModule {
            course_id,
            title: title.to_string(),
            description: String::new(),
            order: None,
        })
        .await
        .unwrap()
}
