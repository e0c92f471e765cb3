pub mod init;
pub mod simulate;

pub use init::cmd_init;
pub use simulate::cmd_simulate;
