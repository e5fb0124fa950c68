//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod console_cleanup_reporter;
mod json_user_record_file;
mod system_runtime;
mod xml_rpc;
mod xml_rpc_account_api;

pub use console_cleanup_reporter::ConsoleCleanupReporter;
pub use json_user_record_file::JsonUserRecordFile;
pub use system_runtime::{SystemClock, TokioPauser};
pub use xml_rpc::{MethodCall, MethodResponse, XmlRpcValue};
pub use xml_rpc_account_api::{DEFAULT_ACCOUNT_API_URL, XmlRpcAccountApi, XmlRpcClientConfig};
