//! RAII guard marking a path as being resolved

use std::rc::Rc;

use super::{Key, Runtime, Scope};
use crate::error::{dotted, EvalError, Result};

/// Holds a `(scope, path)` pair in the runtime's in-progress set and
/// removes it when dropped, including on early return with an error.
///
/// Entering a pair that is already held is a resolution cycle.
pub(crate) struct ResolutionGuard {
    runtime: Rc<Runtime>,
    key: (usize, Vec<Key>),
}

impl ResolutionGuard {
    pub(crate) fn enter(scope: &Scope, path: &[Key]) -> Result<Self> {
        let runtime = scope.runtime();
        let key = (scope.id(), path.to_vec());
        if !runtime.resolving.borrow_mut().insert(key.clone()) {
            return Err(EvalError::Cycle {
                path: dotted(path),
                scope: scope.label().to_string(),
            });
        }
        Ok(Self { runtime, key })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        self.runtime.resolving.borrow_mut().remove(&self.key);
    }
}
