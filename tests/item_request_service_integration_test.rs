mod common;

use shareit::application::{ApplicationError, item, item_request};
use shareit::domain::{
    ItemRequestId, UserId,
    commands::{CreateItem, CreateItemRequest},
};

use common::{create_user, in_memory_deps};

#[tokio::test]
async fn test_create_item_request_returns_empty_items() {
    // Arrange
    let deps = in_memory_deps();
    let requester = create_user(&deps, "Requester").await;

    // Act
    let created = item_request::create_item_request(
        &deps,
        CreateItemRequest {
            requester_id: requester.id,
            description: "Need a ladder".to_string(),
        },
    )
    .await
    .unwrap();

    // Assert
    assert_eq!(created.request.requester_id, requester.id);
    assert_eq!(created.request.description, "Need a ladder");
    assert!(created.items.is_empty());
}

#[tokio::test]
async fn test_create_item_request_for_unknown_user_fails() {
    let deps = in_memory_deps();

    let result = item_request::create_item_request(
        &deps,
        CreateItemRequest {
            requester_id: UserId::new(1),
            description: "Need a ladder".to_string(),
        },
    )
    .await;

    assert!(matches!(
        result.unwrap_err(),
        ApplicationError::UserNotFound(_)
    ));
}

#[tokio::test]
async fn test_find_item_request_includes_fulfilling_items() {
    // Arrange
    let deps = in_memory_deps();
    let requester = create_user(&deps, "Requester").await;
    let owner = create_user(&deps, "Owner").await;
    let request = item_request::create_item_request(
        &deps,
        CreateItemRequest {
            requester_id: requester.id,
            description: "Need a ladder".to_string(),
        },
    )
    .await
    .unwrap()
    .request;

    let ladder = item::create_item(
        &deps,
        CreateItem {
            owner_id: owner.id,
            name: "Ladder".to_string(),
            description: "Three metres".to_string(),
            available: true,
            request_id: Some(request.id),
        },
    )
    .await
    .unwrap();

    // Act: リクエストの作成者以外も閲覧できる
    let found = item_request::find_item_request(&deps, owner.id, request.id)
        .await
        .unwrap();

    // Assert
    assert_eq!(found.request, request);
    assert_eq!(found.items, vec![ladder]);
}

#[tokio::test]
async fn test_find_unknown_item_request_is_not_found() {
    let deps = in_memory_deps();
    let viewer = create_user(&deps, "Viewer").await;

    let result = item_request::find_item_request(&deps, viewer.id, ItemRequestId::new(9)).await;

    assert!(matches!(
        result.unwrap_err(),
        ApplicationError::ItemRequestNotFound(_)
    ));
}

#[tokio::test]
async fn test_list_own_and_other_item_requests() {
    // Arrange
    let deps = in_memory_deps();
    let alice = create_user(&deps, "Alice").await;
    let bob = create_user(&deps, "Bob").await;

    let mut alice_requests = Vec::new();
    for description in ["Need a ladder", "Need a tent"] {
        let created = item_request::create_item_request(
            &deps,
            CreateItemRequest {
                requester_id: alice.id,
                description: description.to_string(),
            },
        )
        .await
        .unwrap();
        alice_requests.push(created.request.id);
    }
    item_request::create_item_request(
        &deps,
        CreateItemRequest {
            requester_id: bob.id,
            description: "Need a bike".to_string(),
        },
    )
    .await
    .unwrap();

    // Act
    let own = item_request::list_own_item_requests(&deps, alice.id)
        .await
        .unwrap();
    let others = item_request::list_other_item_requests(&deps, bob.id, 0, 10)
        .await
        .unwrap();
    let first_only = item_request::list_other_item_requests(&deps, bob.id, 0, 1)
        .await
        .unwrap();

    // Assert: 新しい順
    let own_ids: Vec<_> = own.iter().map(|r| r.request.id).collect();
    assert_eq!(own_ids, vec![alice_requests[1], alice_requests[0]]);

    let other_ids: Vec<_> = others.iter().map(|r| r.request.id).collect();
    assert_eq!(other_ids, vec![alice_requests[1], alice_requests[0]]);

    assert_eq!(first_only.len(), 1);
}

#[tokio::test]
async fn test_list_other_item_requests_zero_size_fails() {
    let deps = in_memory_deps();
    let viewer = create_user(&deps, "Viewer").await;

    let result = item_request::list_other_item_requests(&deps, viewer.id, 0, 0).await;

    assert!(matches!(
        result.unwrap_err(),
        ApplicationError::InvalidPagination(_)
    ));
}
