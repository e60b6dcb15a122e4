pub mod file_source;
pub mod http_client;

pub use file_source::JsonFileSource;
pub use http_client::ReqwestStudentSource;
