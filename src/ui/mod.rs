pub mod animate;
pub mod components;
pub mod layout;
pub mod theme;
