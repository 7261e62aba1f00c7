//! Test helpers para statcache-server.

#![allow(dead_code, unused_imports)]

pub mod client;
pub mod fixtures;

pub use client::{TestClient, TestResponse, client, client_for, player_client, state_with};
pub use fixtures::{FakeUpstream, FixedResolver, bedwars_document};
