pub mod health;
pub mod seed;
pub mod students;

// Re-export handler functions for use in routing
pub use health::get as health_get;
pub use seed::post as seed_post;
pub use students::create as student_create;
pub use students::delete as student_delete;
pub use students::edit as student_edit;
pub use students::get as student_get;
pub use students::list as student_list;
