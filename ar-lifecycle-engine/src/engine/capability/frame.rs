use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Future that stays pending for exactly one poll.
///
/// Polled once per frame by the transition driver, so awaiting it waits one
/// frame tick. Under a blocking executor it wakes itself and completes on the
/// next poll.
#[derive(Debug, Default)]
pub struct NextFrame {
    yielded: bool,
}

impl Future for NextFrame {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

pub fn next_frame() -> NextFrame {
    NextFrame::default()
}

/// Wait `frames` frame ticks.
pub async fn settle_frames(frames: u32) {
    for _ in 0..frames {
        next_frame().await;
    }
}
