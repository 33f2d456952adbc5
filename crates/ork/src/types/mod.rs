//! The in-memory design graph built by the loader.

mod appearance;
mod component;
mod configuration;
mod document;
mod enums;
mod flight_data;
mod ids;
mod material;
mod motor;
mod preset;
mod rocket;
mod simulation;
mod warning;

pub use appearance::*;
pub use component::*;
pub use configuration::*;
pub use document::*;
pub use enums::*;
pub use flight_data::*;
pub use ids::*;
pub use material::*;
pub use motor::*;
pub use preset::*;
pub use rocket::*;
pub use simulation::*;
pub use warning::*;
