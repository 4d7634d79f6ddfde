use std::sync::Arc;

/// The closure behind a mocked binding method.
pub type MockClosureSignature<I, R> = Box<dyn Fn(I) -> R + Send + Sync>;
/// A shared handle to the closure, which can be called without holding the mock instance.
pub type SharedMockClosure<I, R> = Arc<dyn Fn(I) -> R + Send + Sync>;

/// A mocked binding method. It forwards each call to a closure, and counts the calls so a test
/// can assert that a path did (or did not) reach the binding.
pub struct MockMethod<I, R> {
    closure: SharedMockClosure<I, R>,
    call_count: usize,
}

impl<I, R> std::default::Default for MockMethod<I, R> {
    fn default() -> Self {
        Self::new_unimplemented()
    }
}

impl<I, R> MockMethod<I, R> {
    pub fn new_unimplemented() -> Self {
        Self::new_fixed(Box::new(|_| unimplemented!()))
    }

    pub fn new_default() -> Self
    where
        R: Default,
    {
        Self::new_fixed(Box::new(|_| R::default()))
    }

    pub fn new_fixed(closure: MockClosureSignature<I, R>) -> Self {
        Self {
            closure: Arc::from(closure),
            call_count: 0,
        }
    }

    pub fn call(&mut self, args: I) -> R {
        self.prepare_call()(args)
    }

    /// Count a call, and return the closure for the caller to run. The mock binding uses this to
    /// run the closure after releasing the global mock instance.
    pub fn prepare_call(&mut self) -> SharedMockClosure<I, R> {
        self.call_count += 1;
        self.closure.clone()
    }

    pub fn is_called(&self) -> bool {
        self.call_count > 0
    }

    pub fn call_count(&self) -> usize {
        self.call_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_fixed_single_arg() {
        let mut mock = MockMethod::new_fixed(Box::new(|a: usize| -> usize { a + 1 }));
        assert_eq!(mock.call_count(), 0);
        let ret = mock.call(0);
        assert_eq!(ret, 1);
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn mock_fixed_multi_args() {
        let mut mock = MockMethod::new_fixed(Box::new(|(a, b): (usize, usize)| -> usize { a + b }));
        assert!(!mock.is_called());
        assert_eq!(mock.call((1, 1)), 2);
        assert!(mock.is_called());
    }

    #[test]
    fn mock_default() {
        let mut mock = MockMethod::<usize, bool>::new_default();
        assert!(!mock.call(42));
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn prepared_call_runs_without_the_mock() {
        let mut mock = MockMethod::new_fixed(Box::new(|a: usize| a * 2));
        let closure = mock.prepare_call();
        assert_eq!(mock.call_count(), 1);
        drop(mock);
        assert_eq!(closure(21), 42);
    }
}
