pub mod controller;
pub mod live;
pub mod protocol;
pub mod sink;
pub mod state;
pub mod transport;

pub use controller::*;
pub use live::apply_update;
pub use protocol::*;
pub use sink::*;
pub use state::*;
pub use transport::*;
