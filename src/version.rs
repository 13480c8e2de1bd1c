//! Build version.

/// The short version information.
pub const BATCH_SHORT_VERSION: &str = env!("BATCH_SHORT_VERSION");

/// The long version information.
pub const BATCH_LONG_VERSION: &str = concat!(
    env!("BATCH_LONG_VERSION_0"),
    "\n",
    env!("BATCH_LONG_VERSION_1"),
    "\n",
    env!("BATCH_LONG_VERSION_2"),
    "\n",
    env!("BATCH_LONG_VERSION_3"),
    "\n",
    env!("BATCH_LONG_VERSION_4")
);
