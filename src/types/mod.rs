//! Batch submission types.

mod batch;
pub use batch::*;

mod call;
pub use call::*;

mod gas;
pub use gas::*;

mod session;
pub use session::*;
