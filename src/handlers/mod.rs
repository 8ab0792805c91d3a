pub mod auth;
pub mod geocode;
pub mod map;
pub mod photos;
pub mod profile;
