mod buf;
mod buf_mut;
mod stream;

pub use buf::Buf;
pub use buf_mut::BufMut;
pub use stream::{Packet, PacketStream};
