//! Boxed stream alias and an in-memory stream for fakes.
//!
//! ```rust
//! use hprovider::{BoxedStream, VecStream};
//!
//! let stream = VecStream::new(vec![1_u32, 2, 3]);
//! let _boxed: BoxedStream<'static, u32> = Box::pin(stream);
//! ```

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

pub type BoxedStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Yields pre-built items in order and then ends.
#[derive(Debug)]
pub struct VecStream<T> {
    items: VecDeque<T>,
}

impl<T> VecStream<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into(),
        }
    }
}

impl<T: Unpin> Stream for VecStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<T>> {
        Poll::Ready(self.items.pop_front())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.items.len(), Some(self.items.len()))
    }
}
