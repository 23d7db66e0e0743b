pub mod channel;
pub mod direct;
pub mod http;
pub mod stomp;

pub use channel::{StompChannel, StompConnector};
pub use direct::DirectSimulation;
pub use http::HttpUploader;
pub use stomp::Frame;
