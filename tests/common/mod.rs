#![allow(dead_code)]

use roomwire::config::EngineConfig;
use roomwire::model::{Room, RoomVisibility, User};
use roomwire::Engine;
use uuid::Uuid;

/// A fresh all-in-memory engine with the default configuration, the way
/// each test in this suite starts from a clean slate rather than sharing
/// state across cases.
pub fn engine() -> Engine {
    Engine::new(EngineConfig::default())
}

pub async fn register(engine: &Engine, username: &str) -> User {
    engine
        .users
        .register_user(username, "correct horse battery staple")
        .await
        .expect("registration should succeed")
}

pub async fn create_public_room(engine: &Engine, creator: Uuid, name: &str) -> Room {
    engine
        .rooms
        .create_room(name, None, RoomVisibility::Public, creator)
        .await
        .expect("room creation should succeed")
}

pub async fn create_private_room(engine: &Engine, creator: Uuid, name: &str) -> Room {
    engine
        .rooms
        .create_room(name, None, RoomVisibility::Private, creator)
        .await
        .expect("room creation should succeed")
}
