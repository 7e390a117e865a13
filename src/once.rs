//! One-time method guards

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};

/// Guard for methods that may run only once per instance
///
/// The guard lives as a field of the owning type; the guarded method calls
/// `enter` first. The first call marks the guard as used even if the method
/// body later fails.
#[derive(Debug)]
pub struct OnceGuard {
    method: &'static str,
    invoked: AtomicBool,
}

impl OnceGuard {
    pub const fn new(method: &'static str) -> Self {
        Self {
            method,
            invoked: AtomicBool::new(false),
        }
    }

    /// Mark the guarded method as invoked, failing if it already was
    pub fn enter(&self) -> Result<()> {
        if self.invoked.swap(true, Ordering::AcqRel) {
            return Err(Error::state_error(format!(
                "One-time method '{}' cannot be re-run for this instance.",
                self.method
            )));
        }
        Ok(())
    }

    /// Run `body` behind the guard
    pub fn run<T, F: FnOnce() -> T>(&self, body: F) -> Result<T> {
        self.enter()?;
        Ok(body())
    }

    pub fn has_run(&self) -> bool {
        self.invoked.load(Ordering::Acquire)
    }

    pub fn method(&self) -> &'static str {
        self.method
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Model {
        weights: Vec<f64>,
        fit_guard: OnceGuard,
    }

    impl Model {
        fn new() -> Self {
            Self {
                weights: Vec::new(),
                fit_guard: OnceGuard::new("fit"),
            }
        }

        fn fit(&mut self, data: &[f64]) -> Result<()> {
            self.fit_guard.enter()?;
            if data.is_empty() {
                return Err(Error::value_error("no data"));
            }
            self.weights = data.to_vec();
            Ok(())
        }
    }

    #[test]
    fn test_second_call_fails() {
        let mut model = Model::new();
        assert!(model.fit(&[1.0, 2.0]).is_ok());
        let err = model.fit(&[3.0]).unwrap_err();
        assert!(matches!(err, Error::State(_)));
        assert_eq!(
            err.to_string(),
            "One-time method 'fit' cannot be re-run for this instance."
        );
        assert_eq!(model.weights, vec![1.0, 2.0]);
    }

    #[test]
    fn test_instances_are_independent() {
        let mut first = Model::new();
        let mut second = Model::new();
        assert!(first.fit(&[1.0]).is_ok());
        assert!(second.fit(&[2.0]).is_ok());
        assert!(first.fit(&[1.0]).is_err());
        assert!(second.fit(&[2.0]).is_err());
    }

    #[test]
    fn test_failed_first_call_still_counts() {
        let mut model = Model::new();
        assert!(matches!(model.fit(&[]), Err(Error::Value(_))));
        assert!(model.fit_guard.has_run());
        assert!(matches!(model.fit(&[1.0]), Err(Error::State(_))));
    }

    #[test]
    fn test_run_wraps_body() {
        let guard = OnceGuard::new("setup");
        assert_eq!(guard.run(|| 5).unwrap(), 5);
        assert!(guard.run(|| 6).is_err());
        assert_eq!(guard.method(), "setup");
    }
}
