//! Centra player-count relay.
//!
//! Holds the current online population of the game server in memory.
//! The game server script publishes it with `POST /api/players`; the
//! marketing site polls it with `GET /api/players`.

pub mod counter;
pub mod routes;
