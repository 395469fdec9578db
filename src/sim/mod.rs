pub mod achievement;
pub mod economy;
pub mod engine;
pub mod offline;
pub mod player;
pub mod state;
pub mod tick;
pub mod upgrade;
pub mod world;
pub mod worlds;

