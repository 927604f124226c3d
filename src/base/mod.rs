mod channel;
mod error;
mod frame;
mod traits;

pub use self::channel::{Channel, SDM15_DEFAULT_TIMEOUT};
pub use self::error::{Error, Result};
pub use self::frame::Frame;
pub use self::traits::Transport;
