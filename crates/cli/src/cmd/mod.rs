mod build;
mod init;
mod setup;

pub use build::cmd_build;
pub use init::cmd_init;
pub use setup::cmd_setup;
