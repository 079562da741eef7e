// Domain layer - Tile and request models
pub mod request;
pub mod tile;
