mod model;
mod reader;

pub use model::{RequestDescription, RequestHeaders};
pub use reader::{parse_request_contents, parse_request_file};
