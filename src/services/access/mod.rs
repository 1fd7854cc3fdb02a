pub mod remote;
pub mod request;
pub mod transport;

pub use remote::{
    AccessError, FailureMode, RemoteAccessEvaluator, RemoteAccessPolicy, UnknownFailureMode,
};
pub use request::AccessRequest;
pub use transport::{HttpTransport, ReqwestTransport, TransportError};
