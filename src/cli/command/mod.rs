pub mod fetch;
pub mod transcode;

pub use fetch::fetch;
pub use transcode::transcode;
