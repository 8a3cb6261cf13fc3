#[path = "http_request.struct.rs"]
mod http_request;
pub use self::http_request::HttpRequest;

#[path = "http_response.struct.rs"]
mod http_response;
pub use self::http_response::HttpResponse;

#[path = "send_value.enum.rs"]
mod send_value;
pub use self::send_value::SendValue;
pub(crate) use self::send_value::format_float;
