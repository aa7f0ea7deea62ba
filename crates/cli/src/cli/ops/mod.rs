pub mod decrypt;
pub mod encrypt;
pub mod identity;
pub mod init;
pub mod read;
pub mod receive;
pub mod resolve;
pub mod send;
pub mod upload;
pub mod version;

pub use decrypt::Decrypt;
pub use encrypt::Encrypt;
pub use identity::Identity;
pub use init::Init;
pub use read::Read;
pub use receive::ReceiveMessage;
pub use resolve::Resolve;
pub use send::SendMessage;
pub use upload::Upload;
pub use version::Version;
