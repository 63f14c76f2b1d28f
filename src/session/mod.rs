pub mod controller;
pub mod readiness;
pub mod result;
pub mod timer;
