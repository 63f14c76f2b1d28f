pub mod record;
pub mod resolver;
pub mod selector;
