pub mod airbnb;
pub mod lodgify;
