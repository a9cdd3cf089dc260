//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity;
use crate::contract::{
    Content, ContentKind, Course, Item, ItemPayload, Module, NewCourse, NewSubject, Subject,
};
use anyhow::Context;

// ===== Subject Conversions =====

impl From<entity::subject::Model> for Subject {
    fn from(entity: entity::subject::Model) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            slug: entity.slug,
        }
    }
}

impl From<&NewSubject> for entity::subject::ActiveModel {
    fn from(model: &NewSubject) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            title: Set(model.title.clone()),
            slug: Set(model.slug.clone()),
        }
    }
}

// ===== Course Conversions =====

impl From<entity::course::Model> for Course {
    fn from(entity: entity::course::Model) -> Self {
        Self {
            id: entity.id,
            owner_id: entity.owner_id,
            subject_id: entity.subject_id,
            title: entity.title,
            slug: entity.slug,
            overview: entity.overview,
            created: entity.created,
        }
    }
}

impl From<&NewCourse> for entity::course::ActiveModel {
    fn from(model: &NewCourse) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: NotSet,
            owner_id: Set(model.owner_id),
            subject_id: Set(model.subject_id),
            title: Set(model.title.clone()),
            slug: Set(model.slug.clone()),
            overview: Set(model.overview.clone()),
            created: Set(chrono::Utc::now()),
        }
    }
}

// ===== Module Conversions =====

impl TryFrom<entity::module::Model> for Module {
    type Error = anyhow::Error;

    fn try_from(entity: entity::module::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            course_id: entity.course_id,
            title: entity.title,
            description: entity.description,
            order: stored_order(entity.order)?,
        })
    }
}

// ===== Content Conversions =====

impl TryFrom<entity::content::Model> for Content {
    type Error = anyhow::Error;

    fn try_from(entity: entity::content::Model) -> Result<Self, Self::Error> {
        let kind: ContentKind = entity
            .content_type
            .parse()
            .with_context(|| format!("content {} has an unknown type", entity.id))?;

        Ok(Self {
            id: entity.id,
            module_id: entity.module_id,
            kind,
            object_id: entity.object_id,
            order: stored_order(entity.order)?,
        })
    }
}

/// Stored orders are non-negative outside of a running reorder
pub(super) fn stored_order(order: i32) -> anyhow::Result<u32> {
    u32::try_from(order).with_context(|| format!("negative order {} in storage", order))
}

pub(super) fn db_order(order: u32) -> anyhow::Result<i32> {
    i32::try_from(order).with_context(|| format!("order {} does not fit the order column", order))
}

// ===== Item Conversions =====

macro_rules! item_from_model {
    ($($name:ident => $kind:expr),+ $(,)?) => {
        $(
            impl From<entity::$name::Model> for Item {
                fn from(entity: entity::$name::Model) -> Self {
                    Self {
                        id: entity.id,
                        owner_id: entity.owner_id,
                        title: entity.title,
                        created: entity.created,
                        updated: entity.updated,
                        payload: ItemPayload::from_raw($kind, entity.content),
                    }
                }
            }
        )+
    };
}

item_from_model!(
    text => ContentKind::Text,
    video => ContentKind::Video,
    image => ContentKind::Image,
    file => ContentKind::File,
);
