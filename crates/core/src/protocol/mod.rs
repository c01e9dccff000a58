mod command;
mod response;
mod transport;

pub use command::{Command, Request};
pub use response::{check_result, expect_result_count, CommandResult, HttpResponse};
pub use transport::{HttpRequest, Transport};
