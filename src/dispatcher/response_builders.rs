use crate::protocol::{PongPayload, ServerFrame};

pub fn pong(timestamp: i64) -> ServerFrame {
    ServerFrame::Pong(PongPayload { timestamp })
}
