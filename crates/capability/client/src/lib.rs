//! WineSystem REST 客户端。
//!
//! - [`ApiClient`]：通用请求封装（Bearer 注入、JSON 编解码、错误翻译）
//! - [`WineApi`]：全部业务端点的类型化方法

mod api;
mod error;
mod http;

pub use api::WineApi;
pub use error::{Alert, ApiError};
pub use http::{ApiClient, REQUEST_ID_HEADER};
