//! Credential store that lives only as long as the process.

use std::sync::{Mutex, MutexGuard, PoisonError};

use futures_util::FutureExt;
use futures_util::future::{self, BoxFuture};
use zeroize::Zeroizing;

use lattice_core::ShapePolicy;
use lattice_engine::{Pattern, Validator};
use lattice_types::ShapeVerdict;

pub struct MemoryValidator {
    policy: ShapePolicy,
    credential: Mutex<Option<Zeroizing<Vec<u8>>>>,
}

impl MemoryValidator {
    pub fn new(policy: ShapePolicy) -> Self {
        Self {
            policy,
            credential: Mutex::new(None),
        }
    }

    pub fn with_credential(policy: ShapePolicy, credential: &Pattern) -> Self {
        let validator = Self::new(policy);
        validator.store(credential);
        validator
    }

    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }

    fn credential(&self) -> MutexGuard<'_, Option<Zeroizing<Vec<u8>>>> {
        self.credential
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Validator for MemoryValidator {
    fn store(&self, pattern: &Pattern) {
        *self.credential() = Some(Zeroizing::new(pattern.to_ordinals()));
        tracing::info!(points = pattern.len(), "Credential stored in memory");
    }

    fn validate(&self, pattern: Pattern) -> BoxFuture<'static, bool> {
        let valid = self
            .credential()
            .as_ref()
            .is_some_and(|stored| stored.iter().copied().eq(pattern.ordinals()));
        future::ready(valid).boxed()
    }

    fn check_shape(&self, pattern: &Pattern) -> ShapeVerdict {
        self.policy.check(pattern)
    }
}
