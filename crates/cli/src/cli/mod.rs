pub mod args;
pub mod io;
pub mod op;
pub mod ops;

pub use ops::{
    Decrypt, Encrypt, Identity, Init, Read, ReceiveMessage, Resolve, SendMessage, Upload,
    Version,
};
