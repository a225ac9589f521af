//! Alternation checks with instrumented sources.

use decoy_core::prelude::*;
use decoy_runtime::prelude::*;

/// Yields `(stream, sequence)` markers; `sequence` keeps counting across passes.
struct Counting {
    name: &'static str,
    per_pass: usize,
    in_pass: usize,
    sequence: usize,
}

impl Counting {
    fn new(name: &'static str, per_pass: usize) -> Self {
        Self {
            name,
            per_pass,
            in_pass: 0,
            sequence: 0,
        }
    }
}

impl BatchSource for Counting {
    type Batch = (&'static str, usize);

    fn next_batch(&mut self) -> Option<Result<Self::Batch>> {
        if self.in_pass == self.per_pass {
            return None;
        }
        self.in_pass += 1;
        self.sequence += 1;
        Some(Ok((self.name, self.sequence)))
    }

    fn reset(&mut self) {
        self.in_pass = 0;
    }
}

#[test]
fn two_n_calls_draw_n_from_each_in_order() {
    for n in [1usize, 2, 7, 50] {
        let mut stream = BidirectionalStream::new(Counting::new("a", 3), Counting::new("b", 4));
        let draws: Vec<_> = (0..2 * n).map(|_| stream.next_batch().unwrap()).collect();

        let a: Vec<usize> = draws.iter().step_by(2).map(|&(name, seq)| {
            assert_eq!(name, "a");
            seq
        }).collect();
        let b: Vec<usize> = draws.iter().skip(1).step_by(2).map(|&(name, seq)| {
            assert_eq!(name, "b");
            seq
        }).collect();

        assert_eq!(a, (1..=n).collect::<Vec<_>>(), "n = {}", n);
        assert_eq!(b, (1..=n).collect::<Vec<_>>(), "n = {}", n);
    }
}

#[test]
fn restarts_are_independent_per_stream() {
    let mut stream = BidirectionalStream::new(Counting::new("a", 1), Counting::new("b", 5));
    for _ in 0..10 {
        stream.next_batch().unwrap();
    }
    // 5 draws each
    assert_eq!(stream.first().restarts(), 4);
    assert_eq!(stream.second().restarts(), 0);
}

#[test]
fn empty_stream_surfaces_error_on_its_turn() {
    let mut stream = BidirectionalStream::new(Counting::new("a", 2), Counting::new("b", 0));
    assert!(stream.next_batch().is_ok());
    assert_eq!(stream.next_batch(), Err(DecoyError::EmptySource));
    assert!(stream.next_batch().is_ok());
}
