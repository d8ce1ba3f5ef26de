//! Access gate port - authorization predicates checked at the repository
//! boundary. The engine does not authenticate; it only refuses authoring
//! mutations the gate denies. Reader-side interactions (views, likes,
//! comments) are not gated.

pub trait AccessGate: Send + Sync {
    fn can_mutate(&self) -> bool;

    fn can_delete(&self) -> bool {
        self.can_mutate()
    }
}

/// Permits everything - the default for embedded single-user use.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessGate for AllowAll {
    fn can_mutate(&self) -> bool {
        true
    }
}
