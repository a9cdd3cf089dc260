//! Mapper implementations for converting between DTOs and contract models

use super::dto::*;
use crate::contract;

// ===== Subject conversions =====

impl From<contract::Subject> for SubjectDto {
    fn from(subject: contract::Subject) -> Self {
        Self {
            id: subject.id,
            title: subject.title,
            slug: subject.slug,
        }
    }
}

impl From<CreateSubjectRequest> for contract::NewSubject {
    fn from(req: CreateSubjectRequest) -> Self {
        Self {
            title: req.title,
            slug: req.slug,
        }
    }
}

// ===== Course conversions =====

impl From<contract::Course> for CourseDto {
    fn from(course: contract::Course) -> Self {
        Self {
            id: course.id,
            owner_id: course.owner_id,
            subject_id: course.subject_id,
            title: course.title,
            slug: course.slug,
            overview: course.overview,
            created: course.created,
        }
    }
}

impl From<CreateCourseRequest> for contract::NewCourse {
    fn from(req: CreateCourseRequest) -> Self {
        Self {
            owner_id: req.owner_id,
            subject_id: req.subject_id,
            title: req.title,
            slug: req.slug,
            overview: req.overview,
        }
    }
}

impl From<UpdateCourseRequest> for contract::CourseUpdate {
    fn from(req: UpdateCourseRequest) -> Self {
        Self {
            subject_id: req.subject_id,
            title: req.title,
            slug: req.slug,
            overview: req.overview,
        }
    }
}

// ===== Module conversions =====

impl From<contract::Module> for ModuleDto {
    fn from(module: contract::Module) -> Self {
        Self {
            id: module.id,
            course_id: module.course_id,
            title: module.title,
            description: module.description,
            order: module.order,
        }
    }
}

impl From<UpdateModuleRequest> for contract::ModuleUpdate {
    fn from(req: UpdateModuleRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
        }
    }
}

impl CreateModuleRequest {
    pub fn into_new_module(self, course_id: i64) -> contract::NewModule {
        contract::NewModule {
            course_id,
            title: self.title,
            description: self.description,
            order: self.order,
        }
    }
}

impl From<ReorderModulesRequest> for Vec<(i64, u32)> {
    fn from(req: ReorderModulesRequest) -> Self {
        req.modules
            .into_iter()
            .map(|m| (m.module_id, m.order))
            .collect()
    }
}

// ===== Content conversions =====

impl From<contract::Content> for ContentDto {
    fn from(content: contract::Content) -> Self {
        Self {
            id: content.id,
            module_id: content.module_id,
            content_type: content.kind.to_string(),
            object_id: content.object_id,
            order: content.order,
        }
    }
}

impl From<CreateContentRequest> for contract::ItemFields {
    fn from(req: CreateContentRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
        }
    }
}

impl From<UpdateContentRequest> for contract::ItemFields {
    fn from(req: UpdateContentRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
        }
    }
}

impl From<contract::Item> for ItemDto {
    fn from(item: contract::Item) -> Self {
        Self {
            id: item.id,
            content_type: item.payload.kind().to_string(),
            owner_id: item.owner_id,
            title: item.title,
            content: item.payload.raw().to_string(),
            created: item.created,
            updated: item.updated,
        }
    }
}

// ===== Integrity conversions =====

impl From<contract::ItemRef> for ItemRefDto {
    fn from(item: contract::ItemRef) -> Self {
        Self {
            content_type: item.kind.to_string(),
            object_id: item.id,
        }
    }
}

impl From<contract::IntegrityReport> for IntegrityReportDto {
    fn from(report: contract::IntegrityReport) -> Self {
        Self {
            orphaned_items: report.orphaned_items.into_iter().map(Into::into).collect(),
            dangling_contents: report
                .dangling_contents
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}
