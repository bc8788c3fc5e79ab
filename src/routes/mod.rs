pub mod categories;

pub mod classes;

pub mod gradebook;

pub mod grades;

pub mod periods;

pub mod system;

pub mod tasks;

pub use classes::configure_classes_routes;
pub use system::configure_system_routes;
