mod list_request;
mod messages;
mod operations;

pub use list_request::ListRequest;
pub use messages::GlobalMessages;
pub use operations::OperationPanel;
