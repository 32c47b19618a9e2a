//! Bridges the synchronous terminal views to the async stores.

use std::future::Future;
use tokio::runtime::Runtime;

use crate::app::Crm;
use crate::error::StoreError;
use crate::scope::Scope;

/// One CLI invocation: the shared `Crm`, the runtime driving it and the root
/// scope that Ctrl+C cancels.
pub struct Session {
    pub crm: Crm,
    runtime: Runtime,
    root: Scope,
}

impl Session {
    pub fn new(crm: Crm, runtime: Runtime, root: Scope) -> Self {
        Self { crm, runtime, root }
    }

    pub fn is_cancelled(&self) -> bool {
        self.root.is_cancelled()
    }

    /// Scope for one view. Work started through it stops when the view
    /// returns or the session is cancelled.
    pub fn view(&self) -> View<'_> {
        View {
            session: self,
            scope: self.root.child(),
        }
    }
}

pub struct View<'a> {
    session: &'a Session,
    scope: Scope,
}

impl<'a> View<'a> {
    pub fn crm(&self) -> &'a Crm {
        &self.session.crm
    }

    pub fn today(&self) -> chrono::NaiveDate {
        self.session.crm.today()
    }

    /// Block on a store operation, giving up if the view's scope is cancelled.
    pub fn run<T, F>(&self, operation: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        self.session.runtime.block_on(self.scope.run(operation))
    }

    /// Block on a read that cannot fail.
    pub fn read<T, F>(&self, read: F) -> T
    where
        F: Future<Output = T>,
    {
        self.session.runtime.block_on(read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::EntityStore;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn session() -> Session {
        let clock = Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 17).unwrap()));
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        Session::new(Crm::mock(clock), runtime, Scope::new())
    }

    #[test]
    fn test_views_share_one_crm() {
        let session = session();
        {
            let view = session.view();
            assert!(view.run(view.crm().leads.remove(1)).unwrap());
        }
        let view = session.view();
        assert_eq!(view.read(view.crm().leads.list()).len(), 4);
    }

    #[test]
    fn test_cancelled_session_refuses_work() {
        let session = session();
        session.root.cancel();
        assert!(session.is_cancelled());

        let view = session.view();
        assert_eq!(
            view.run(view.crm().leads.remove(1)),
            Err(StoreError::Cancelled)
        );
        assert_eq!(view.read(view.crm().leads.list()).len(), 5);
    }
}
