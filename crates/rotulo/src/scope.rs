//! Thread-scoped session for step-definition glue.
//!
//! Step functions are free functions without a place to carry state, so the
//! scenario's [`Session`] can be parked in a per-thread slot. Each scenario
//! thread sees only its own session.

use crate::navigation::Session;
use crate::result::{RotuloError, RotuloResult};
use std::cell::RefCell;

thread_local! {
    static CURRENT_SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
}

fn busy() -> RotuloError {
    RotuloError::init("session is already in use on this thread")
}

/// Park `session` in this thread's slot, returning the previous one
pub fn install(session: Session) -> RotuloResult<Option<Session>> {
    CURRENT_SESSION.with(|slot| {
        let mut slot = slot.try_borrow_mut().map_err(|_| busy())?;
        Ok(slot.replace(session))
    })
}

/// Run `f` against this thread's session
pub fn with_session<T, F>(f: F) -> RotuloResult<T>
where
    F: FnOnce(&mut Session) -> RotuloResult<T>,
{
    CURRENT_SESSION.with(|slot| {
        let mut slot = slot
            .try_borrow_mut()
            .map_err(|_| busy())?;
        let session = slot
            .as_mut()
            .ok_or_else(|| RotuloError::init("no session installed on this thread"))?;
        f(session)
    })
}

/// Whether this thread has a session
#[must_use]
pub fn is_active() -> bool {
    CURRENT_SESSION.with(|slot| slot.try_borrow().map(|s| s.is_some()).unwrap_or(true))
}

/// Title of the current page of this thread's session
#[must_use]
pub fn current_title() -> Option<String> {
    CURRENT_SESSION.with(|slot| {
        slot.try_borrow()
            .ok()?
            .as_ref()?
            .current_title()
            .map(str::to_string)
    })
}

/// Tear down and remove this thread's session
pub fn teardown() -> Option<Session> {
    CURRENT_SESSION.with(|slot| {
        let mut session = slot.try_borrow_mut().ok()?.take()?;
        session.teardown();
        Some(session)
    })
}
