//! Polymorphic content tests: create, resolve, update and delete items through content slots

use course_service::config::Config;
use course_service::contract::*;
use std::time::Duration;
use uuid::Uuid;

mod common;
use common::*;

#[tokio::test]
async fn test_unknown_content_type_writes_nothing() {
    print_test_header(
        "test_unknown_content_type_writes_nothing",
        &[
            "Type names outside text/video/image/file are rejected",
            "Neither an item nor a content slot is stored",
        ],
    );

    let (service, store) = create_test_service();
    let course = seed_course(&service, "rust-101").await;
    let module = seed_module(&service, course.id, "Intro").await;

    let result = service
        .create_content(module.id, "audio", fields("Podcast", "ep1.mp3"), Uuid::new_v4())
        .await;

    assert_eq!(
        result.unwrap_err(),
        CourseError::InvalidContentType {
            name: "audio".to_string()
        }
    );
    assert_eq!(store.item_creates(), 0);
    assert_eq!(store.content_count(), 0);
}

#[tokio::test]
async fn test_type_names_are_case_sensitive() {
    print_test_header(
        "test_type_names_are_case_sensitive",
        &["Only the lowercase names are accepted"],
    );

    let (service, _store) = create_test_service();
    let course = seed_course(&service, "rust-101").await;
    let module = seed_module(&service, course.id, "Intro").await;

    let result = service
        .create_content(module.id, "Text", fields("Page", "body"), Uuid::new_v4())
        .await;
    assert!(matches!(result, Err(CourseError::InvalidContentType { .. })));
}

#[tokio::test]
async fn test_content_in_missing_module_writes_nothing() {
    print_test_header(
        "test_content_in_missing_module_writes_nothing",
        &["Unknown modules are rejected before the item is stored"],
    );

    let (service, store) = create_test_service();
    let result = service
        .create_content(404, "text", fields("Page", "body"), Uuid::new_v4())
        .await;

    assert!(matches!(result, Err(CourseError::NotFound { .. })));
    assert_eq!(store.item_creates(), 0);
}

#[tokio::test]
async fn test_invalid_item_fields_are_rejected() {
    print_test_header(
        "test_invalid_item_fields_are_rejected",
        &[
            "Video content must be an http(s) URL",
            "Image and file references cannot be empty",
            "URL checks can be switched off in config",
        ],
    );

    let (service, store) = create_test_service();
    let course = seed_course(&service, "rust-101").await;
    let module = seed_module(&service, course.id, "Intro").await;
    let owner = Uuid::new_v4();

    let video = service
        .create_content(module.id, "video", fields("Demo", "not a url"), owner)
        .await;
    assert!(matches!(video, Err(CourseError::Validation { .. })));

    let image = service
        .create_content(module.id, "image", fields("Diagram", "  "), owner)
        .await;
    assert!(matches!(image, Err(CourseError::Validation { .. })));

    let untitled = service
        .create_content(module.id, "text", fields("", "body"), owner)
        .await;
    assert!(matches!(untitled, Err(CourseError::Validation { .. })));
    assert_eq!(store.item_creates(), 0);

    let (lenient, _store) = create_test_service_with(Config {
        validate_video_urls: false,
        ..Config::default()
    });
    let course = seed_course(&lenient, "rust-101").await;
    let module = seed_module(&lenient, course.id, "Intro").await;
    assert!(lenient
        .create_content(module.id, "video", fields("Demo", "local:demo"), owner)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_mixed_content_lifecycle() {
    print_test_header(
        "test_mixed_content_lifecycle",
        &[
            "Text, video and image contents get orders 0, 1, 2",
            "Each slot resolves to an item of its own type",
            "Deleting the middle slot removes its item and leaves a gap",
        ],
    );

    let (service, store) = create_test_service();
    let course = seed_course(&service, "rust-101").await;
    let module = seed_module(&service, course.id, "Intro").await;
    let owner = Uuid::new_v4();

    let text = service
        .create_content(module.id, "text", fields("Welcome", "Hello"), owner)
        .await
        .unwrap();
    let video = service
        .create_content(
            module.id,
            "video",
            fields("Tour", "https://videos.example.com/tour"),
            owner,
        )
        .await
        .unwrap();
    let image = service
        .create_content(module.id, "image", fields("Diagram", "images/d.png"), owner)
        .await
        .unwrap();

    assert_eq!((text.order, video.order, image.order), (0, 1, 2));
    assert_eq!(video.kind, ContentKind::Video);

    let item = service.get_content_item(video.id).await.unwrap();
    println!("   video item: {:?}", item);
    assert_eq!(item.owner_id, owner);
    assert_eq!(item.title, "Tour");
    assert_eq!(
        item.payload,
        ItemPayload::Video {
            url: "https://videos.example.com/tour".to_string()
        }
    );

    service.delete_content(video.id).await.unwrap();
    assert!(!store.has_item(video.item_ref()));

    let remaining: Vec<(ContentKind, u32)> = service
        .list_module_contents(module.id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| (c.kind, c.order))
        .collect();
    assert_eq!(
        remaining,
        vec![(ContentKind::Text, 0), (ContentKind::Image, 2)]
    );

    // Appending continues after the highest order, the gap stays
    let file = service
        .create_content(module.id, "file", fields("Slides", "files/s.pdf"), owner)
        .await
        .unwrap();
    assert_eq!(file.order, 3);
}

#[tokio::test]
async fn test_update_content_keeps_order() {
    print_test_header(
        "test_update_content_keeps_order",
        &["Updating an item changes its fields but not the slot"],
    );

    let (service, _store) = create_test_service();
    let course = seed_course(&service, "rust-101").await;
    let module = seed_module(&service, course.id, "Intro").await;
    let owner = Uuid::new_v4();

    service
        .create_content(module.id, "text", fields("First", "one"), owner)
        .await
        .unwrap();
    let second = service
        .create_content(module.id, "text", fields("Second", "two"), owner)
        .await
        .unwrap();
    let before = service.get_content_item(second.id).await.unwrap();

    let updated = service
        .update_content(second.id, "text", fields("Second, revised", "two and a half"))
        .await
        .unwrap();
    assert_eq!(updated, second);

    let item = service.get_content_item(second.id).await.unwrap();
    assert_eq!(item.id, before.id);
    assert_eq!(item.title, "Second, revised");
    assert_eq!(item.payload.raw(), "two and a half");
    assert_eq!(item.created, before.created);
    assert!(item.updated >= before.updated);
}

#[tokio::test]
async fn test_update_content_with_other_type_is_not_found() {
    print_test_header(
        "test_update_content_with_other_type_is_not_found",
        &["A text slot cannot be addressed as a video"],
    );

    let (service, _store) = create_test_service();
    let course = seed_course(&service, "rust-101").await;
    let module = seed_module(&service, course.id, "Intro").await;
    let text = service
        .create_content(module.id, "text", fields("Page", "body"), Uuid::new_v4())
        .await
        .unwrap();

    let result = service
        .update_content(text.id, "video", fields("Page", "https://v.example/1"))
        .await;
    assert!(matches!(result, Err(CourseError::NotFound { .. })));

    let unknown = service
        .update_content(text.id, "audio", fields("Page", "body"))
        .await;
    assert!(matches!(unknown, Err(CourseError::InvalidContentType { .. })));
}

#[tokio::test]
async fn test_failed_link_removes_created_item() {
    print_test_header(
        "test_failed_link_removes_created_item",
        &[
            "Storing the content slot fails after the item was written",
            "The item is deleted again and the error is reported",
        ],
    );

    let (service, store) = create_test_service();
    let course = seed_course(&service, "rust-101").await;
    let module = seed_module(&service, course.id, "Intro").await;

    store.fail_content_insert(true);
    let result = service
        .create_content(module.id, "text", fields("Page", "body"), Uuid::new_v4())
        .await;

    assert_eq!(result.unwrap_err(), CourseError::Internal);
    assert_eq!(store.item_creates(), 1);
    assert_eq!(store.item_count(), 0);
}

#[tokio::test]
async fn test_orphan_left_by_failed_cleanup_shows_in_audit() {
    print_test_header(
        "test_orphan_left_by_failed_cleanup_shows_in_audit",
        &[
            "Linking and the compensating delete both fail",
            "The caller sees the link error",
            "The leftover item is reported by the integrity audit",
        ],
    );

    let (service, store) = create_test_service();
    let course = seed_course(&service, "rust-101").await;
    let module = seed_module(&service, course.id, "Intro").await;

    store.fail_content_insert(true);
    store.fail_item_delete(true);
    let result = service
        .create_content(module.id, "image", fields("Diagram", "d.png"), Uuid::new_v4())
        .await;
    assert_eq!(result.unwrap_err(), CourseError::Internal);

    let report = service.audit_items().await.unwrap();
    assert!(!report.is_clean());
    assert_eq!(report.orphaned_items.len(), 1);
    assert_eq!(report.orphaned_items[0].kind, ContentKind::Image);
    assert!(report.dangling_contents.is_empty());
}

#[tokio::test]
async fn test_audit_reports_orphans_and_dangling_contents() {
    print_test_header(
        "test_audit_reports_orphans_and_dangling_contents",
        &[
            "Items nobody points at are orphaned",
            "Slots whose item vanished are dangling",
        ],
    );

    let (service, store) = create_test_service();
    let course = seed_course(&service, "rust-101").await;
    let module = seed_module(&service, course.id, "Intro").await;
    let owner = Uuid::new_v4();

    let kept = service
        .create_content(module.id, "text", fields("Kept", "body"), owner)
        .await
        .unwrap();
    let broken = service
        .create_content(module.id, "file", fields("Slides", "s.pdf"), owner)
        .await
        .unwrap();
    assert!(service.audit_items().await.unwrap().is_clean());

    let orphan = store.insert_item_raw(ContentKind::Video, "Stray");
    store.remove_item_raw(broken.item_ref());

    let report = service.audit_items().await.unwrap();
    assert_eq!(report.orphaned_items, vec![orphan]);
    assert_eq!(report.dangling_contents, vec![broken.clone()]);

    // Resolving the broken slot reports the missing item
    let missing = service.get_content_item(broken.id).await;
    assert!(matches!(missing, Err(CourseError::NotFound { .. })));
    assert!(service.get_content_item(kept.id).await.is_ok());
}

#[tokio::test]
async fn test_delete_module_removes_items() {
    print_test_header(
        "test_delete_module_removes_items",
        &["Deleting a module deletes its contents and their items"],
    );

    let (service, store) = create_test_service();
    let course = seed_course(&service, "rust-101").await;
    let doomed = seed_module(&service, course.id, "Intro").await;
    let survivor = seed_module(&service, course.id, "Ownership").await;
    let owner = Uuid::new_v4();

    for kind in ["text", "image", "file"] {
        service
            .create_content(doomed.id, kind, fields("Doomed", "x"), owner)
            .await
            .unwrap();
    }
    service
        .create_content(survivor.id, "text", fields("Kept", "body"), owner)
        .await
        .unwrap();

    service.delete_module(doomed.id).await.unwrap();

    assert_eq!(store.item_count(), 1);
    assert_eq!(store.content_count(), 1);
    assert!(matches!(
        service.get_module(doomed.id).await,
        Err(CourseError::NotFound { .. })
    ));
    assert!(service.audit_items().await.unwrap().is_clean());
}

#[tokio::test]
async fn test_delete_course_removes_everything_below() {
    print_test_header(
        "test_delete_course_removes_everything_below",
        &["Deleting a course deletes its modules, contents and items"],
    );

    let (service, store) = create_test_service();
    let course = seed_course(&service, "rust-101").await;
    let owner = Uuid::new_v4();
    for title in ["Intro", "Ownership"] {
        let module = seed_module(&service, course.id, title).await;
        service
            .create_content(module.id, "text", fields(title, "body"), owner)
            .await
            .unwrap();
    }

    service.delete_course(course.id).await.unwrap();

    assert_eq!(store.item_count(), 0);
    assert_eq!(store.content_count(), 0);
    assert!(matches!(
        service.list_course_modules(course.id).await,
        Err(CourseError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_delete_module_blocks_concurrent_create_content() {
    print_test_header(
        "test_delete_module_blocks_concurrent_create_content",
        &[
            "A content created while its module is being deleted is not linked",
            "Its item is removed again and nothing is left orphaned",
        ],
    );

    let (service, store) = create_test_service();
    let course = seed_course(&service, "rust-101").await;
    let module_id = seed_module(&service, course.id, "Intro").await.id;
    store.delay_content_listing(Duration::from_millis(100));

    let deleting = {
        let service = service.clone();
        tokio::spawn(async move { service.delete_module(module_id).await })
    };
    // the delete is now holding the module while it lists the contents
    tokio::time::sleep(Duration::from_millis(20)).await;

    let created = service
        .create_content(module_id, "text", fields("Late", "body"), Uuid::new_v4())
        .await;
    deleting.await.unwrap().unwrap();

    assert_eq!(
        created.unwrap_err(),
        CourseError::not_found("module", module_id)
    );
    assert_eq!(store.item_creates(), 1);
    assert_eq!(store.item_count(), 0);
    assert_eq!(store.content_count(), 0);
    assert!(service.audit_items().await.unwrap().is_clean());
}

#[tokio::test]
async fn test_delete_course_blocks_concurrent_create_content() {
    print_test_header(
        "test_delete_course_blocks_concurrent_create_content",
        &["Deleting a course holds its modules until their contents are gone"],
    );

    let (service, store) = create_test_service();
    let course = seed_course(&service, "rust-101").await;
    let module = seed_module(&service, course.id, "Intro").await;
    service
        .create_content(module.id, "image", fields("Diagram", "d.png"), Uuid::new_v4())
        .await
        .unwrap();
    store.delay_content_listing(Duration::from_millis(100));

    let deleting = {
        let service = service.clone();
        let course_id = course.id;
        tokio::spawn(async move { service.delete_course(course_id).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    let created = service
        .create_content(module.id, "text", fields("Late", "body"), Uuid::new_v4())
        .await;
    deleting.await.unwrap().unwrap();

    assert!(matches!(created, Err(CourseError::NotFound { .. })));
    assert_eq!(store.item_count(), 0);
    assert_eq!(store.content_count(), 0);
    assert!(service.audit_items().await.unwrap().is_clean());
}

#[tokio::test]
async fn test_failed_content_delete_is_reported() {
    print_test_header(
        "test_failed_content_delete_is_reported",
        &["The item is gone but the slot stays when its delete fails"],
    );

    let (service, store) = create_test_service();
    let course = seed_course(&service, "rust-101").await;
    let module = seed_module(&service, course.id, "Intro").await;
    let content = service
        .create_content(module.id, "text", fields("Page", "body"), Uuid::new_v4())
        .await
        .unwrap();

    store.fail_content_delete(true);
    assert_eq!(
        service.delete_content(content.id).await.unwrap_err(),
        CourseError::Internal
    );

    let report = service.audit_items().await.unwrap();
    assert_eq!(report.dangling_contents, vec![content]);
}
