pub mod error_handler;
pub mod json_body;
pub mod path_id;
pub mod response;

pub use json_body::JsonObject;
pub use path_id::PathId;
pub use response::{ApiResponse, ApiResult, MessageBody};
