//! Recording executor for tests: nothing is spawned.

use std::collections::VecDeque;

use crate::environment::Environment;
use crate::error::ExecStatus;
use super::executor::{Executor, Invocation};

pub struct MockExecutor {
    pub invocations: Vec<Invocation>,
    codes: VecDeque<i32>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self {
            invocations: Vec::new(),
            codes: VecDeque::new(),
        }
    }

    /// Exit codes handed out in order; once exhausted every call returns 0.
    pub fn with_codes(codes: Vec<i32>) -> Self {
        Self {
            invocations: Vec::new(),
            codes: codes.into(),
        }
    }

    pub fn last(&self) -> Option<&Invocation> {
        self.invocations.last()
    }
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for MockExecutor {
    fn exec(&mut self, invocation: &Invocation, _env: &Environment) -> ExecStatus {
        self.invocations.push(invocation.clone());
        Ok(self.codes.pop_front().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_invocations_in_order() {
        let env = Environment::empty();
        let mut mock = MockExecutor::new();
        mock.exec(&Invocation::launch("/bin/sh", ["-c", "one"]), &env).unwrap();
        mock.exec(&Invocation::script("/bin/sh", "two", ""), &env).unwrap();
        assert_eq!(mock.invocations.len(), 2);
        assert_eq!(mock.last(), Some(&Invocation::script("/bin/sh", "two", "")));
    }

    #[test]
    fn returns_codes_then_zero() {
        let env = Environment::empty();
        let mut mock = MockExecutor::with_codes(vec![2, 9]);
        let inv = Invocation::launch("/bin/sh", Vec::<String>::new());
        assert_eq!(mock.exec(&inv, &env).unwrap(), 2);
        assert_eq!(mock.exec(&inv, &env).unwrap(), 9);
        assert_eq!(mock.exec(&inv, &env).unwrap(), 0);
    }
}
