// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn create_links_both_devices() {
    let rooms = Rooms::new();
    let id = rooms.create("desktop-1".to_owned(), "phone-1".to_owned()).await;

    assert_eq!(rooms.room_for_device("desktop-1").await, Some(id.clone()));
    assert_eq!(rooms.room_for_device("phone-1").await, Some(id.clone()));

    let room = rooms.get(&id).await.unwrap();
    assert_eq!(room.peer_of("desktop-1"), Some("phone-1"));
    assert_eq!(room.peer_of("phone-1"), Some("desktop-1"));
    assert_eq!(room.peer_of("someone-else"), None);
}

#[tokio::test]
async fn remove_clears_reverse_index() {
    let rooms = Rooms::new();
    let id = rooms.create("desktop-1".to_owned(), "phone-1".to_owned()).await;
    rooms.remove(&id).await.unwrap();

    assert!(rooms.get(&id).await.is_none());
    assert_eq!(rooms.room_for_device("desktop-1").await, None);
    assert_eq!(rooms.room_for_device("phone-1").await, None);
}

#[tokio::test]
async fn idle_since_zero_reports_every_room() {
    let rooms = Rooms::new();
    rooms.create("d1".to_owned(), "p1".to_owned()).await;
    rooms.create("d2".to_owned(), "p2".to_owned()).await;
    assert_eq!(rooms.idle_since(std::time::Duration::from_secs(0)).await.len(), 2);
    assert!(rooms.idle_since(std::time::Duration::from_secs(3600)).await.is_empty());
}
