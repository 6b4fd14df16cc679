//! # tsmp-minecraft
//!
//! Outbound clients for the two Minecraft-side systems the website talks to:
//!
//! - **Mojang** (`profile.rs`): resolves an in-game name to the persistent
//!   account UUID and back.
//! - **The TSMP server** (`server.rs`): an HTTP bridge plugin exposing live
//!   player inventories and taking items out of them when they are published
//!   to the market.
//!
//! Both are reached through traits ([`ProfileResolver`], [`MinecraftServer`])
//! so the HTTP layer can be exercised against in-memory fakes.

pub mod error;
pub mod profile;
pub mod server;

pub use error::MinecraftError;
pub use profile::{MinecraftProfile, MojangClient, ProfileResolver};
pub use server::{MinecraftServer, ServerApiClient, SlotStack, TakeOutcome};
