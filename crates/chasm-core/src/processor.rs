//! The per-sample processing trait and its series combinator.
//!
//! Every mono DSP stage in chasm (allpass, one-pole, biquad, the diffusion
//! chain, the tone shaper) implements [`SampleProcessor`]. Stages compose
//! with [`ProcessorExt::chain`] into a [`Chain`], which is resolved at
//! compile time.
//!
//! Sample rate is not part of the trait: every stage is constructed already
//! prepared and exposes its own `prepare` with whatever arguments it needs
//! (maximum delay, filter type, ...).

use crate::Sample;

/// A mono stage that consumes and produces one sample at a time.
///
/// # Example
///
/// ```rust
/// use chasm_core::{ProcessorExt, SampleProcessor};
///
/// struct Gain(f32);
///
/// impl SampleProcessor<f32> for Gain {
///     fn process_sample(&mut self, input: f32) -> f32 {
///         input * self.0
///     }
///     fn reset(&mut self) {}
/// }
///
/// let mut chain = Gain(2.0).chain(Gain(3.0));
/// assert_eq!(chain.process_sample(1.0), 6.0);
/// ```
pub trait SampleProcessor<T: Sample> {
    /// Process one sample, advancing internal state by one step.
    fn process_sample(&mut self, input: T) -> T;

    /// Process a buffer in place.
    fn process_block(&mut self, buffer: &mut [T]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    /// Clear internal state (delay lines, filter history) without changing
    /// parameters.
    fn reset(&mut self);

    /// Processing latency in samples.
    fn latency_samples(&self) -> usize {
        0
    }
}

/// Extension trait for building static chains.
pub trait ProcessorExt<T: Sample>: SampleProcessor<T> + Sized {
    /// Feed the output of `self` into `next`.
    fn chain<P: SampleProcessor<T>>(self, next: P) -> Chain<Self, P> {
        Chain {
            first: self,
            second: next,
        }
    }
}

impl<T: Sample, P: SampleProcessor<T>> ProcessorExt<T> for P {}

/// Two stages in series.
///
/// Created by [`ProcessorExt::chain`] or [`Chain::new`].
#[derive(Debug, Clone)]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A, B> Chain<A, B> {
    /// Put `first` before `second`.
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// The first stage.
    pub fn first(&self) -> &A {
        &self.first
    }

    /// The first stage, mutably.
    pub fn first_mut(&mut self) -> &mut A {
        &mut self.first
    }

    /// The second stage.
    pub fn second(&self) -> &B {
        &self.second
    }

    /// The second stage, mutably.
    pub fn second_mut(&mut self) -> &mut B {
        &mut self.second
    }
}

impl<T: Sample, A: SampleProcessor<T>, B: SampleProcessor<T>> SampleProcessor<T> for Chain<A, B> {
    #[inline]
    fn process_sample(&mut self, input: T) -> T {
        let mid = self.first.process_sample(input);
        self.second.process_sample(mid)
    }

    fn process_block(&mut self, buffer: &mut [T]) {
        self.first.process_block(buffer);
        self.second.process_block(buffer);
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }

    fn latency_samples(&self) -> usize {
        self.first.latency_samples() + self.second.latency_samples()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gain(f64);

    impl SampleProcessor<f64> for Gain {
        fn process_sample(&mut self, input: f64) -> f64 {
            input * self.0
        }
        fn reset(&mut self) {}
    }

    struct Latent(usize);

    impl SampleProcessor<f64> for Latent {
        fn process_sample(&mut self, input: f64) -> f64 {
            input
        }
        fn reset(&mut self) {}
        fn latency_samples(&self) -> usize {
            self.0
        }
    }

    #[test]
    fn test_chain() {
        let mut chain = Gain(2.0).chain(Gain(3.0));
        assert_eq!(chain.process_sample(1.0), 6.0);
    }

    #[test]
    fn test_chain_block() {
        let mut chain = Gain(2.0).chain(Gain(0.5));
        let mut buffer = [1.0, 2.0, 3.0];
        chain.process_block(&mut buffer);
        assert_eq!(buffer, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_chain_latency() {
        let chain = Latent(10).chain(Latent(5));
        assert_eq!(chain.latency_samples(), 15);
    }

    #[test]
    fn test_chain_accessors() {
        let mut chain = Chain::new(Gain(2.0), Gain(3.0));
        chain.first_mut().0 = 4.0;
        assert_eq!(chain.first().0, 4.0);
        assert_eq!(chain.second().0, 3.0);
        chain.second_mut().0 = 1.0;
        assert_eq!(chain.process_sample(1.0), 4.0);
    }
}
