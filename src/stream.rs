//! Double-buffered streams over lines, gathers, depth slices, traces and headers
//!
//! A [`Stream`] owns two buffers of the same shape. Each [`Stream::step`]
//! fills the spare buffer and swaps it in only once the fill succeeded, so a
//! failed read never clobbers the buffer the caller is looking at. The
//! `&mut A` returned by `step` borrows the stream and cannot outlive the next
//! step; callers that want to keep a value clone it, or use the
//! [`Iterator`] impl, which yields copies.

use crate::error::Result;
use std::fmt;

/// Where a stream is in its life cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// No element produced yet
    Created,
    /// Produced element `i` (0-based)
    Yielding(usize),
    /// All keys consumed
    Exhausted,
    /// A fill failed; the stream is finished
    Failed,
}

type Fill<K, A> = Box<dyn FnMut(&K, &mut A) -> Result<()>>;

/// Lazy, double-buffered sequence of `A` values, one per key
pub struct Stream<K, A> {
    keys: std::vec::IntoIter<K>,
    current: A,
    spare: A,
    current_key: Option<K>,
    fill: Fill<K, A>,
    state: StreamState,
}

impl<K, A: Clone> Stream<K, A> {
    /// Build a stream over `keys`; `buffer` fixes the shape of both slots
    pub fn new<F>(keys: Vec<K>, buffer: A, fill: F) -> Self
    where
        F: FnMut(&K, &mut A) -> Result<()> + 'static,
    {
        Self {
            keys: keys.into_iter(),
            current: buffer.clone(),
            spare: buffer,
            current_key: None,
            fill: Box::new(fill),
            state: StreamState::Created,
        }
    }
}

impl<K, A> Stream<K, A> {
    /// Advance to the next element
    ///
    /// Returns `None` once the keys are exhausted or after a failed step.
    pub fn step(&mut self) -> Option<Result<&mut A>> {
        if matches!(self.state, StreamState::Exhausted | StreamState::Failed) {
            return None;
        }

        let Some(key) = self.keys.next() else {
            self.state = StreamState::Exhausted;
            return None;
        };

        if let Err(err) = (self.fill)(&key, &mut self.spare) {
            self.state = StreamState::Failed;
            return Some(Err(err));
        }

        std::mem::swap(&mut self.current, &mut self.spare);
        self.current_key = Some(key);
        self.state = match self.state {
            StreamState::Yielding(i) => StreamState::Yielding(i + 1),
            _ => StreamState::Yielding(0),
        };
        Some(Ok(&mut self.current))
    }

    /// The most recently produced element, if any
    pub fn current(&self) -> Option<&A> {
        self.current_key.as_ref().map(|_| &self.current)
    }

    /// Key of the most recently produced element
    pub fn current_key(&self) -> Option<&K> {
        self.current_key.as_ref()
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Keys not yet visited
    pub fn remaining(&self) -> usize {
        match self.state {
            StreamState::Exhausted | StreamState::Failed => 0,
            _ => self.keys.len(),
        }
    }
}

impl<K, A: Clone> Iterator for Stream<K, A> {
    type Item = Result<A>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step().map(|res| res.map(|value| value.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining()))
    }
}

impl<K: fmt::Debug, A> fmt::Debug for Stream<K, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("state", &self.state)
            .field("current_key", &self.current_key)
            .field("remaining", &self.remaining())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SegyError;

    fn counting(keys: Vec<i32>) -> Stream<i32, Vec<i32>> {
        Stream::new(keys, vec![0; 3], |&k, buf: &mut Vec<i32>| {
            if k < 0 {
                return Err(SegyError::UnknownLine(k));
            }
            buf.iter_mut().enumerate().for_each(|(i, v)| *v = k * 10 + i as i32);
            Ok(())
        })
    }

    #[test]
    fn test_step_swaps_buffers() {
        let mut stream = counting(vec![1, 2]);
        assert_eq!(stream.state(), StreamState::Created);
        assert!(stream.current().is_none());

        let first = stream.step().unwrap().unwrap();
        assert_eq!(first, &vec![10, 11, 12]);
        first[0] = 99;
        assert_eq!(stream.state(), StreamState::Yielding(0));
        assert_eq!(stream.current_key(), Some(&1));

        assert_eq!(stream.step().unwrap().unwrap(), &vec![20, 21, 22]);
        assert_eq!(stream.state(), StreamState::Yielding(1));
        assert!(stream.step().is_none());
        assert_eq!(stream.state(), StreamState::Exhausted);
        assert!(stream.step().is_none());
    }

    #[test]
    fn test_failed_step_keeps_current() {
        let mut stream = counting(vec![1, -5, 3]);
        stream.step().unwrap().unwrap();

        assert!(matches!(
            stream.step(),
            Some(Err(SegyError::UnknownLine(-5)))
        ));
        assert_eq!(stream.state(), StreamState::Failed);
        assert_eq!(stream.current(), Some(&vec![10, 11, 12]));
        assert_eq!(stream.current_key(), Some(&1));
        assert!(stream.step().is_none());
        assert_eq!(stream.remaining(), 0);
    }

    #[test]
    fn test_iterator_yields_independent_copies() {
        let values: Vec<Vec<i32>> = counting(vec![3, 4, 5]).collect::<Result<_>>().unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[0], vec![30, 31, 32]);
        assert_eq!(values[2], vec![50, 51, 52]);
    }

    #[test]
    fn test_abandoned_stream_is_harmless() {
        let mut stream = counting(vec![1, 2, 3]);
        stream.step();
        assert_eq!(stream.remaining(), 2);
        assert_eq!(stream.size_hint(), (0, Some(2)));
        drop(stream);
    }
}
