pub mod directory;
pub mod router;
