pub mod conversion;
pub mod ids;
pub mod placement;
pub mod store;
pub mod types;
pub mod validator;

pub use conversion::*;
pub use ids::*;
pub use placement::*;
pub use store::*;
pub use types::*;
pub use validator::*;
