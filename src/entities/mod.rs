pub mod prelude;

pub mod albums;
pub mod photos;
pub mod users;
